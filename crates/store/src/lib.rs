//! Store - Project persistence
//!
//! Serializes a scene into the versioned JSON project shape and imports
//! it back via a history-snapshotted bulk replace. The payload is
//! treated as an opaque blob by whatever transports it; everything
//! written here must round-trip unchanged.

mod error;
mod format;
mod serializer;

pub use error::*;
pub use format::*;
pub use serializer::*;
