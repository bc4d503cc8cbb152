//! Infrastructure adapters for karaoke-sync.
//!
//! The only external collaborator is the alignment store, reached over its
//! HTTP JSON API.

pub mod store;

pub use store::HttpAlignmentStore;
