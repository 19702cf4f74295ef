use anyhow::{Context, Result, bail};
use std::time::Duration;
use windy_core::{ExclusionList, Position};

const DEFAULT_API_BASE: &str = "https://stations.windy.com/api/v1";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CONCURRENCY: usize = 40;
const MAX_CONCURRENCY: usize = 100;

pub(crate) const EXCLUDED_STATIONS_VAR: &str = "WINDY_EXCLUDED_STATIONS";
pub(crate) const API_BASE_VAR: &str = "WINDY_API_BASE";
pub(crate) const HTTP_TIMEOUT_VAR: &str = "WINDY_HTTP_TIMEOUT_SECS";
pub(crate) const CONCURRENCY_VAR: &str = "WINDY_CONCURRENCY";
pub(crate) const POSITION_VAR: &str = "WINDY_POSITION";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub http_timeout: Duration,
    pub concurrency: usize,
    pub exclusions: ExclusionList,
    pub initial_position: Option<Position>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_base = read(API_BASE_VAR)
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();
        if !api_base.starts_with("http://") && !api_base.starts_with("https://") {
            bail!("{API_BASE_VAR} must be an http(s) URL, got '{api_base}'");
        }

        let http_timeout = match read(HTTP_TIMEOUT_VAR) {
            Some(value) => Duration::from_secs(
                value
                    .parse::<u64>()
                    .with_context(|| format!("Invalid {HTTP_TIMEOUT_VAR}: '{value}'"))?,
            ),
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let concurrency = match read(CONCURRENCY_VAR) {
            Some(value) => value
                .parse::<usize>()
                .with_context(|| format!("Invalid {CONCURRENCY_VAR}: '{value}'"))?,
            None => DEFAULT_CONCURRENCY,
        }
        .clamp(1, MAX_CONCURRENCY);

        let exclusions = ExclusionList::parse(&read(EXCLUDED_STATIONS_VAR).unwrap_or_default());

        let initial_position = match read(POSITION_VAR) {
            Some(value) => Some(
                Position::parse(&value)
                    .with_context(|| format!("Invalid {POSITION_VAR}: '{value}'"))?,
            ),
            None => None,
        };

        Ok(Self {
            api_base,
            http_timeout,
            concurrency,
            exclusions,
            initial_position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert_eq!(config.concurrency, 40);
        assert!(config.exclusions.is_empty());
        assert!(config.initial_position.is_none());
    }

    #[test]
    fn reads_every_variable() {
        let config = config_from(&[
            (API_BASE_VAR, "http://localhost:8080/api/"),
            (HTTP_TIMEOUT_VAR, "3"),
            (CONCURRENCY_VAR, "500"),
            (EXCLUDED_STATIONS_VAR, "ABC, DEF"),
            (POSITION_VAR, "47.0,-122.0"),
        ])
        .unwrap();
        assert_eq!(config.api_base, "http://localhost:8080/api");
        assert_eq!(config.http_timeout, Duration::from_secs(3));
        assert_eq!(config.concurrency, MAX_CONCURRENCY);
        assert!(config.exclusions.is_excluded("ABC"));
        assert!(config.exclusions.is_excluded("DEF"));
        assert_eq!(config.initial_position, Some(Position::new(47.0, -122.0)));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[(API_BASE_VAR, "  "), (CONCURRENCY_VAR, "")]).unwrap();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(config_from(&[(HTTP_TIMEOUT_VAR, "ten")]).is_err());
        assert!(config_from(&[(API_BASE_VAR, "ftp://example.com")]).is_err());
        assert!(config_from(&[(POSITION_VAR, "somewhere")]).is_err());
    }
}
