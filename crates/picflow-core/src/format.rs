//! Target output formats for image conversion.

use std::fmt;
use std::str::FromStr;

/// Supported target codecs for a conversion variant.
///
/// A variant with no configured format passes the source codec through
/// unchanged; that case is represented as `Option<Format>::None` on the
/// conversion config rather than a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Jpeg,
    Webp,
}

impl Format {
    /// Lowercase codec name, used in destination keys and content types.
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Jpeg => "jpeg",
            Format::Webp => "webp",
        }
    }

    /// Content type of the encoded output, `image/{codec}`.
    pub fn content_type(&self) -> String {
        format!("image/{}", self.as_str())
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Format::Jpeg),
            "webp" => Ok(Format::Webp),
            other => Err(format!("unsupported target format: {}", other)),
        }
    }
}
