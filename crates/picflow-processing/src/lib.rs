//! Picflow Processing Library
//!
//! The pure image conversion routine: decode, optional shrink, optional
//! format conversion, re-encode. No storage I/O happens here.

pub mod convert;

pub use convert::{convert, ConvertError, ConvertOutput};
