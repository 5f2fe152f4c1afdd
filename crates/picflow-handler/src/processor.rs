//! Shared per-object conversion body.
//!
//! Both transport adapters unwrap their envelopes down to S3 event records
//! and hand them here: fetch the source object, run the conversion routine,
//! write the result to the destination bucket. A failure on one object is
//! reported as that object's failure and never aborts its siblings.

use std::sync::Arc;

use anyhow::anyhow;
use aws_lambda_events::event::s3::{S3Event, S3EventRecord};

use picflow_core::{ConvertConfig, ItemError, ItemResultExt};
use picflow_processing::convert;
use picflow_storage::ObjectStore;

/// Executes the fetch → convert → store body for each referenced object.
pub struct ImageConvertProcessor {
    config: ConvertConfig,
    store: Arc<dyn ObjectStore>,
}

impl ImageConvertProcessor {
    pub fn new(config: ConvertConfig, store: Arc<dyn ObjectStore>) -> Self {
        Self { config, store }
    }

    /// Process every record of one unwrapped S3 event.
    ///
    /// All records are attempted; the returned error summarizes the failures
    /// and is recoverable if any individual failure was.
    pub async fn process_s3_event(&self, event: &S3Event) -> Result<(), ItemError> {
        let total = event.records.len();
        let mut failed = 0usize;
        let mut any_recoverable = false;

        for record in &event.records {
            if let Err(e) = self.process_record(record).await {
                if e.is_recoverable() {
                    tracing::error!(error = %e, "Record processing failed, will be retried on redelivery");
                } else {
                    tracing::warn!(error = %e, "Record processing failed permanently");
                }
                any_recoverable |= e.is_recoverable();
                failed += 1;
            }
        }

        if failed == 0 {
            return Ok(());
        }

        let summary = anyhow!("{} of {} records failed", failed, total);
        if any_recoverable {
            Err(ItemError::recoverable(summary))
        } else {
            Err(ItemError::unrecoverable(summary))
        }
    }

    /// Fetch, convert, and store one referenced object.
    async fn process_record(&self, record: &S3EventRecord) -> Result<(), ItemError> {
        let bucket = record
            .s3
            .bucket
            .name
            .as_deref()
            .ok_or_else(|| ItemError::unrecoverable(anyhow!("event record missing bucket name")))?;
        let key = record
            .s3
            .object
            .key
            .as_deref()
            .ok_or_else(|| ItemError::unrecoverable(anyhow!("event record missing object key")))?;

        tracing::debug!(bucket = %bucket, key = %key, "Processing object-created record");

        let source = self
            .store
            .fetch(bucket, key)
            .await
            .map_err(ItemError::recoverable)?;

        let output = convert(&source.data, &source.metadata, &self.config).unrecoverable()?;

        self.store
            .store(
                &self.config.output_bucket,
                &output.key,
                output.data.to_vec(),
                &output.content_type,
                &source.metadata,
            )
            .await
            .map_err(ItemError::recoverable)?;

        tracing::info!(
            source_bucket = %bucket,
            source_key = %key,
            output_bucket = %self.config.output_bucket,
            output_key = %output.key,
            content_type = %output.content_type,
            "Object converted"
        );

        Ok(())
    }
}
