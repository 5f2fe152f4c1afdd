//! Notification envelope unwrapping.
//!
//! Both transports carry the same inner payload: the JSON text of one S3
//! "object created" event, wrapped either in an SNS record's `Message` field
//! or an SQS message's `body`.

use aws_lambda_events::event::s3::S3Event;
use thiserror::Error;

/// Malformed event payload. Permanent for the item that carried it: the same
/// bytes will never parse on redelivery.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("malformed notification payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("queue message has no body")]
    MissingBody,
}

/// Parse the S3 event JSON embedded in a notification message body.
pub fn parse_embedded_s3_event(body: &str) -> Result<S3Event, EnvelopeError> {
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_event() {
        let event = parse_embedded_s3_event(r#"{"Records": []}"#).unwrap();
        assert!(event.records.is_empty());
    }

    #[test]
    fn test_parse_garbage_is_malformed() {
        let err = parse_embedded_s3_event("not json at all").unwrap_err();
        assert!(matches!(err, EnvelopeError::Malformed(_)));
    }
}
