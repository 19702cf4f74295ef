use anyhow::Result;
use reqwest::Client as HTTPClient;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;

/// JSON transport to the station provider.
///
/// `path` is relative to the provider base URL and starts with `/`.
pub trait Api: Send + Sync + 'static {
    fn get_json<T>(&self, path: &str) -> impl Future<Output = Result<T>> + Send
    where
        T: DeserializeOwned + Send;
}

impl<T: Api> Api for Arc<T> {
    fn get_json<U>(&self, path: &str) -> impl Future<Output = Result<U>> + Send
    where
        U: DeserializeOwned + Send,
    {
        (**self).get_json(path)
    }
}

pub struct HttpApi {
    client: HTTPClient,
    api_base: String,
}

impl HttpApi {
    pub fn new(client: HTTPClient, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
        }
    }
}

impl Api for HttpApi {
    async fn get_json<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned + Send,
    {
        let url = format!("{}{path}", self.api_base);
        let response = self.client.get(&url).send().await?;
        response.error_for_status_ref()?;
        Ok(response.json::<T>().await?)
    }
}

/// HTTP status carried by a failed request, if the failure had one.
pub(crate) fn status_of(err: &anyhow::Error) -> Option<u16> {
    err.downcast_ref::<reqwest::Error>()
        .and_then(|err| err.status())
        .map(|status| status.as_u16())
}
