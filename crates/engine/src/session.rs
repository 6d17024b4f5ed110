use common::AlbumRecord;
use tracing::{info, warn};

use crate::catalog::{self, SelectionStats, ViewOptions};
use crate::orchestrator::{ProgressHandle, SyncError, SyncOrchestrator, SyncSummary};
use crate::resolver::{invalidate, resolve_status};
use crate::selection::Selection;
use crate::service::{AlbumService, ServiceError};

/// Everything a front end holds between user actions: the chosen source and
/// target, the current catalog snapshot, the selection, and view options.
pub struct Session<S> {
    service: S,
    source: Option<String>,
    target: Option<String>,
    catalog: Vec<AlbumRecord>,
    selection: Selection,
    progress: ProgressHandle,
    pub options: ViewOptions,
}

impl<S: AlbumService> Session<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            source: None,
            target: None,
            catalog: Vec::new(),
            selection: Selection::new(),
            progress: ProgressHandle::new(),
            options: ViewOptions::default(),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn catalog(&self) -> &[AlbumRecord] {
        &self.catalog
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn progress(&self) -> ProgressHandle {
        self.progress.clone()
    }

    /// Switches the source and loads it. Returns the number of albums found.
    /// A blank directory clears the source along with its catalog.
    pub async fn scan(&mut self, directory: &str) -> Result<usize, ServiceError> {
        self.source = non_blank(directory);
        if self.source.is_none() {
            self.catalog.clear();
            return Ok(0);
        }
        self.refresh().await?;
        Ok(self.catalog.len())
    }

    /// Replaces the catalog with a fresh scan of the source, resolved
    /// against the current target. On failure the previous catalog stays.
    pub async fn refresh(&mut self) -> Result<(), ServiceError> {
        let Some(source) = self.source.clone() else {
            return Ok(());
        };
        let scanned = self.service.scan(&source).await?;
        self.catalog = resolve_status(&self.service, scanned, self.target.as_deref()).await;
        info!("Catalog loaded: {} albums from {}", self.catalog.len(), source);
        Ok(())
    }

    /// Sync flags are dropped as soon as the target changes, so a failed
    /// refresh can never leave flags from the previous target behind.
    pub async fn set_target(&mut self, target: &str) -> Result<(), ServiceError> {
        let target = non_blank(target);
        if target == self.target {
            return Ok(());
        }
        self.target = target;
        invalidate(&mut self.catalog);
        if self.catalog.is_empty() {
            return Ok(());
        }
        self.refresh().await
    }

    pub fn toggle(&mut self, path: &str) -> bool {
        self.selection.toggle(path)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn view(&self) -> Vec<AlbumRecord> {
        catalog::view(&self.catalog, &self.options)
    }

    pub fn stats(&self) -> SelectionStats {
        catalog::stats(&self.catalog, &self.selection)
    }

    pub fn needs_unsync(&self) -> bool {
        catalog::needs_unsync(&self.catalog, &self.selection)
    }

    /// Applies the selection to the target, then rescans so the catalog
    /// shows what the service reports rather than what was attempted.
    pub async fn run_sync(&mut self) -> Result<SyncSummary, SyncError> {
        let orchestrator = SyncOrchestrator::new(&self.service, self.progress.clone());
        let summary = orchestrator
            .dispatch(&self.catalog, &self.selection, self.target.as_deref())
            .await?;

        self.selection.clear();
        if let Err(err) = self.refresh().await {
            warn!("Rescan after sync failed: {}", err);
        }
        self.progress.reset();
        Ok(summary)
    }
}

fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
