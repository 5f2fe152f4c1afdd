//! Lambda entry point for one image conversion variant.
//!
//! Cold start resolves the variant's configuration from the environment,
//! builds the S3 client and the dispatcher once, then serves invocations.

mod dispatcher;
mod envelope;
mod processor;

use std::sync::Arc;

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use dispatcher::Dispatcher;
use picflow_core::Config;
use picflow_storage::S3ObjectStore;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .with_target(false)
        // the log ingest adds its own timestamps
        .without_time()
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        output_bucket = %config.convert.output_bucket,
        format = ?config.convert.format,
        resize = ?config.convert.resize,
        use_sqs = config.use_sqs,
        "Conversion variant configured"
    );

    let store = Arc::new(S3ObjectStore::new().await);
    let dispatcher = Arc::new(Dispatcher::new(config, store));

    run(service_fn(move |event: LambdaEvent<Value>| {
        let dispatcher = Arc::clone(&dispatcher);
        async move { dispatcher.handle(event.payload).await }
    }))
    .await
}
