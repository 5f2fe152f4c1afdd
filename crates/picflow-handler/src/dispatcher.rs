//! Transport adapters and the dispatch boundary.
//!
//! One conversion variant is deployed per transport: either subscribed
//! straight to the notification topic (direct), or behind a durable queue
//! (queue-buffered). The transport is selected once at cold start; the
//! dispatcher only routes the raw invocation payload to the matching adapter.
//! Retry policy lives entirely in the delivery infrastructure: topic fan-out
//! is one-shot best-effort, the queue redelivers exactly the messages we
//! report failed.

use aws_lambda_events::event::sns::SnsEvent;
use aws_lambda_events::event::sqs::{BatchItemFailure, SqsBatchResponse, SqsEvent, SqsMessage};
use lambda_runtime::Error;
use serde_json::Value;

use picflow_core::{Config, ItemError};
use picflow_storage::ObjectStore;

use crate::envelope::{parse_embedded_s3_event, EnvelopeError};
use crate::processor::ImageConvertProcessor;

/// Delivery path this deployment is wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Subscribed straight to the notification topic.
    Direct,
    /// A durable queue sits between the topic and the handler, enabling
    /// per-message redelivery of failures.
    QueueBuffered,
}

/// Queue batch result: which message ids succeeded and which must be
/// redelivered.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
}

impl BatchOutcome {
    /// Convert to the partial-batch-failure response the delivery system
    /// consumes; only failures are listed, success is implied.
    pub fn into_response(self) -> SqsBatchResponse {
        SqsBatchResponse {
            batch_item_failures: self
                .failed
                .into_iter()
                .map(|id| BatchItemFailure {
                    item_identifier: id,
                })
                .collect(),
        }
    }
}

/// Routes inbound batches to the adapter matching the configured transport.
pub struct Dispatcher {
    transport: Transport,
    processor: ImageConvertProcessor,
}

impl Dispatcher {
    pub fn new(config: Config, store: std::sync::Arc<dyn ObjectStore>) -> Self {
        let transport = if config.use_sqs {
            Transport::QueueBuffered
        } else {
            Transport::Direct
        };
        Self {
            transport,
            processor: ImageConvertProcessor::new(config.convert, store),
        }
    }

    /// Handle one invocation payload.
    ///
    /// The payload shape depends on the transport, so it arrives untyped and
    /// is deserialized here. A payload that does not match the configured
    /// transport's envelope fails the whole invocation: that is a wiring
    /// error, not a per-item failure.
    pub async fn handle(&self, payload: Value) -> Result<Value, Error> {
        match self.transport {
            Transport::Direct => {
                let event: SnsEvent = serde_json::from_value(payload)?;
                self.process_notification_batch(event).await;
                Ok(Value::Null)
            }
            Transport::QueueBuffered => {
                let event: SqsEvent = serde_json::from_value(payload)?;
                let outcome = self.process_queue_batch(event).await;
                Ok(serde_json::to_value(outcome.into_response())?)
            }
        }
    }

    /// Direct adapter: each record wraps one embedded S3 event. There is no
    /// redelivery control on this path, so failures are logged and dropped;
    /// a record whose envelope fails to parse aborts only that record.
    async fn process_notification_batch(&self, event: SnsEvent) {
        for record in event.records {
            match parse_embedded_s3_event(&record.sns.message) {
                Ok(s3_event) => {
                    if let Err(e) = self.processor.process_s3_event(&s3_event).await {
                        tracing::error!(
                            error = %e,
                            message_id = %record.sns.message_id,
                            "Notification processing failed"
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        message_id = %record.sns.message_id,
                        "Skipping malformed notification envelope"
                    );
                }
            }
        }
    }

    /// Queue adapter: messages are processed individually and failures are
    /// collected so the queue redelivers only the failed subset. Parse
    /// failures and processing failures are both reported as failed and
    /// retried identically.
    async fn process_queue_batch(&self, event: SqsEvent) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for message in &event.records {
            let message_id = message.message_id.clone().unwrap_or_default();
            match self.process_queue_message(message).await {
                Ok(()) => outcome.succeeded.push(message_id),
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        message_id = %message_id,
                        recoverable = e.is_recoverable(),
                        "Queue message failed, reporting for redelivery"
                    );
                    outcome.failed.push(message_id);
                }
            }
        }

        outcome
    }

    async fn process_queue_message(&self, message: &SqsMessage) -> Result<(), ItemError> {
        let body = message
            .body
            .as_deref()
            .ok_or_else(|| ItemError::unrecoverable(EnvelopeError::MissingBody))?;
        let s3_event = parse_embedded_s3_event(body).map_err(ItemError::unrecoverable)?;
        self.processor.process_s3_event(&s3_event).await
    }
}
