//! Reconciles a source collection of album folders against a sync target:
//! resolves which albums are already present, keeps the user's selection,
//! and applies add/remove batches through an [`AlbumService`].

pub mod catalog;
pub mod concurrency;
pub mod http;
pub mod orchestrator;
pub mod resolver;
pub mod selection;
pub mod service;
pub mod session;

#[cfg(test)]
mod mock;

pub use catalog::{stats, view, SelectionStats, SortDir, SortKey, ViewOptions};
pub use concurrency::{map_bounded, try_map_bounded, DEFAULT_CONCURRENCY};
pub use http::{HttpAlbumService, DEFAULT_SERVER_URL};
pub use orchestrator::{
    ItemOutcome, Progress, ProgressHandle, SyncAction, SyncError, SyncOrchestrator, SyncSummary,
};
pub use resolver::{invalidate, resolve_status};
pub use selection::Selection;
pub use service::{AlbumService, ServiceError};
pub use session::Session;
