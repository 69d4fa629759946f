//! In-memory adapters for tests.
//!
//! Available to this crate's unit tests and, through the `test-utils`
//! feature, to dependent crates.

mod blobs;
mod catalog;

pub use blobs::MemoryBlobStore;
pub use catalog::InMemoryCatalog;
