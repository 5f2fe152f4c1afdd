//! Picflow Core Library
//!
//! This crate provides the domain types shared across all picflow components:
//! conversion configuration, output format model, object metadata, destination
//! key construction, and the per-item error wrapper.

pub mod config;
pub mod format;
pub mod item_error;
pub mod keys;
pub mod metadata;

// Re-export commonly used types
pub use config::{Config, ConvertConfig};
pub use format::Format;
pub use item_error::{ItemError, ItemResultExt};
pub use keys::destination_key;
pub use metadata::ObjectMetadata;
