//! Deployment-time configuration.
//!
//! One conversion variant is deployed per (format, resize) combination; its
//! parameters are resolved once at cold start from environment variables and
//! are immutable afterwards.
//!
//! - `BUCKET_NAME` — destination bucket (required; missing is fatal)
//! - `APP_FORMAT` — target codec, e.g. `jpeg` or `webp` (unknown = passthrough)
//! - `APP_RESIZE` — maximum output dimension in pixels (unparsable = no resize)
//! - `APP_USE_SQS` — transport selector: queue-buffered when truthy, direct otherwise

use std::env;

use anyhow::Context;

use crate::format::Format;

/// Immutable parameters of one deployed conversion variant.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Destination bucket for converted objects.
    pub output_bucket: String,
    /// Target codec; `None` keeps the source codec.
    pub format: Option<Format>,
    /// Maximum output dimension; `None` keeps the source dimensions.
    pub resize: Option<u32>,
}

/// Full handler configuration resolved at cold start.
#[derive(Debug, Clone)]
pub struct Config {
    pub convert: ConvertConfig,
    /// Queue-buffered transport when true, direct notification otherwise.
    pub use_sqs: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let output_bucket =
            env::var("BUCKET_NAME").context("BUCKET_NAME environment variable must be set")?;

        let format = parse_format(env::var("APP_FORMAT").ok().as_deref());
        let resize = parse_resize(env::var("APP_RESIZE").ok().as_deref());
        let use_sqs = parse_bool(env::var("APP_USE_SQS").ok().as_deref());

        Ok(Config {
            convert: ConvertConfig {
                output_bucket,
                format,
                resize,
            },
            use_sqs,
        })
    }
}

/// Parse the target format; anything unrecognized (including the literal
/// `original` used by deployments) means passthrough.
fn parse_format(value: Option<&str>) -> Option<Format> {
    value.and_then(|v| v.parse().ok())
}

/// Parse the resize target. Unparsable or non-positive values mean no resize.
fn parse_resize(value: Option<&str>) -> Option<u32> {
    value
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|&r| r > 0)
}

fn parse_bool(value: Option<&str>) -> bool {
    match value {
        Some(v) => matches!(
            v.to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "on"
        ),
        None => false,
    }
}
