//! Picflow Storage Library
//!
//! Object-store abstraction and the S3 implementation. The conversion
//! pipeline reads source objects (bytes plus user metadata) and writes
//! converted objects through the `ObjectStore` trait, so adapter tests can
//! substitute an in-memory store.

pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use s3::S3ObjectStore;
pub use traits::{ObjectStore, SourceObject, StorageError, StorageResult};
