//! Destination key construction for converted objects.
//!
//! Key format: `{format|original}/{resize|original}/{userid|anonymous}/{imageid}`.
//! A fresh UUID stands in for `imageid` only when the source object carries
//! none, so keys are deterministic whenever an image id is present.

use uuid::Uuid;

use crate::format::Format;
use crate::metadata::ObjectMetadata;

/// Build the output object key for a conversion variant.
pub fn destination_key(
    format: Option<Format>,
    resize: Option<u32>,
    metadata: &ObjectMetadata,
) -> String {
    let format_segment = format.map(|f| f.as_str().to_string());
    let resize_segment = resize.map(|r| r.to_string());

    [
        format_segment.unwrap_or_else(|| "original".to_string()),
        resize_segment.unwrap_or_else(|| "original".to_string()),
        metadata.get("userid").unwrap_or("anonymous").to_string(),
        metadata
            .get("imageid")
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
    ]
    .join("/")
}
