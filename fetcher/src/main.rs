use anyhow::{Context, Result};
use reqwest::Client as HTTPClient;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::{
    api::HttpApi, config::Config, pipeline::Pipeline, position::SharedPosition,
    publish::StdoutPublisher, scheduler::Scheduler,
};
mod api;
mod config;
mod directory;
mod logging;
mod pipeline;
mod position;
mod publish;
mod scheduler;
mod station;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env()) // Enable log level filtering via `RUST_LOG` env var
        .json()
        .with_current_span(false)
        .with_span_list(false)
        .with_target(false)
        .with_writer(std::io::stderr) // stdout carries the deltas
        .init();

    let config = Config::from_env()?;
    logging::Logger::new()
        .count(config.exclusions.len())
        .info("fetcher.configured", &format!("Using {}", config.api_base));

    let http_client = HTTPClient::builder()
        .timeout(config.http_timeout)
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")?;

    let position = SharedPosition::new(config.initial_position);
    tokio::spawn(position::feed_lines(
        BufReader::new(tokio::io::stdin()),
        position.clone(),
    ));

    let pipeline = Pipeline::new(
        HttpApi::new(http_client, config.api_base.clone()),
        StdoutPublisher,
        config.exclusions.clone(),
    )
    .with_concurrency(config.concurrency);

    let shutdown = CancellationToken::new();
    let scheduler = tokio::spawn(Scheduler::new(pipeline, position).run(shutdown.clone()));

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    shutdown.cancel();
    scheduler.await?;
    Ok(())
}
