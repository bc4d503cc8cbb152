//! HTTP adapter for the alignment store.

mod http_store;
mod mapper;
mod models;

pub use http_store::HttpAlignmentStore;
pub use mapper::ProjectDtoMapper;
pub use models::{ProjectDto, SegmentDto, WordDto};
