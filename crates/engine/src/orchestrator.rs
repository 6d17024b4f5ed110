use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use common::AlbumRecord;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::selection::Selection;
use crate::service::AlbumService;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn is_idle(&self) -> bool {
        self.total == 0
    }

    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.completed, self.total)
    }
}

/// Shared view of a running batch. Cloned handles observe the same counter.
#[derive(Clone, Debug, Default)]
pub struct ProgressHandle {
    inner: Arc<RwLock<Progress>>,
}

impl ProgressHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Progress {
        *self.inner.read()
    }

    fn start(&self, total: usize) {
        *self.inner.write() = Progress { completed: 0, total };
    }

    fn advance(&self) -> Progress {
        let mut guard = self.inner.write();
        guard.completed += 1;
        *guard
    }

    pub(crate) fn reset(&self) {
        *self.inner.write() = Progress::default();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncAction {
    Add,
    Remove,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemOutcome {
    Added { artist: String, album: String },
    Removed { artist: String, album: String },
    Failed {
        action: SyncAction,
        name: String,
        detail: String,
    },
}

impl ItemOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ItemOutcome::Failed { .. })
    }
}

impl fmt::Display for ItemOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemOutcome::Added { artist, album } => write!(f, "Synced: {} - {}", artist, album),
            ItemOutcome::Removed { artist, album } => {
                write!(f, "Removed: {} - {}", artist, album)
            }
            ItemOutcome::Failed {
                action: SyncAction::Add,
                name,
                detail,
            } => write!(f, "Error syncing {}: {}", name, detail),
            ItemOutcome::Failed {
                action: SyncAction::Remove,
                name,
                detail,
            } => write!(f, "Error removing {}: {}", name, detail),
        }
    }
}

/// Result of one batch, reported as a whole once every item was attempted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub added: usize,
    pub removed: usize,
    pub outcomes: Vec<ItemOutcome>,
}

impl SyncSummary {
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.is_failure()).count()
    }

    pub fn messages(&self) -> Vec<String> {
        self.outcomes.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sync complete")?;
        writeln!(f)?;
        writeln!(f, "{} albums added to target", self.added)?;
        write!(f, "{} albums removed from target", self.removed)?;
        if !self.outcomes.is_empty() {
            writeln!(f)?;
            writeln!(f)?;
            write!(f, "Details:")?;
            for outcome in &self.outcomes {
                write!(f, "\n{}", outcome)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    TargetMissing,
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::TargetMissing => write!(f, "a target directory must be selected first"),
        }
    }
}

impl std::error::Error for SyncError {}

/// Applies a selection to the target one album at a time: synced albums are
/// removed, the rest are added.
pub struct SyncOrchestrator<'a, S: ?Sized> {
    service: &'a S,
    progress: ProgressHandle,
}

impl<'a, S> SyncOrchestrator<'a, S>
where
    S: AlbumService + ?Sized,
{
    pub fn new(service: &'a S, progress: ProgressHandle) -> Self {
        Self { service, progress }
    }

    /// Runs the whole batch, then clears the selection and resets progress.
    /// Only a missing target is an error; item failures land in the summary.
    pub async fn run(
        &self,
        catalog: &[AlbumRecord],
        selection: &mut Selection,
        target: Option<&str>,
    ) -> Result<SyncSummary, SyncError> {
        let summary = self.dispatch(catalog, selection, target).await?;
        selection.clear();
        self.progress.reset();
        Ok(summary)
    }

    /// The batch loop alone. Leaves the selection and the final progress in
    /// place so the caller can refresh state before going idle.
    pub async fn dispatch(
        &self,
        catalog: &[AlbumRecord],
        selection: &Selection,
        target: Option<&str>,
    ) -> Result<SyncSummary, SyncError> {
        let target = target
            .filter(|value| !value.trim().is_empty())
            .ok_or(SyncError::TargetMissing)?;

        let by_path: HashMap<&str, &AlbumRecord> = catalog
            .iter()
            .map(|album| (album.path.as_str(), album))
            .collect();

        self.progress.start(selection.len());
        let mut summary = SyncSummary::default();

        for path in selection.iter() {
            let progress = self.progress.advance();
            let Some(album) = by_path.get(path).copied() else {
                debug!("Skipping {} (no longer in catalog)", path);
                continue;
            };
            debug!("Processing {} ({})", album.name, progress);

            let outcome = if album.is_synced {
                self.remove(album, target).await
            } else {
                self.add(album, target).await
            };
            match &outcome {
                ItemOutcome::Added { .. } => summary.added += 1,
                ItemOutcome::Removed { .. } => summary.removed += 1,
                ItemOutcome::Failed { .. } => {}
            }
            summary.outcomes.push(outcome);
        }

        info!(
            "Sync finished: {} added, {} removed, {} failed",
            summary.added,
            summary.removed,
            summary.failures()
        );
        Ok(summary)
    }

    async fn add(&self, album: &AlbumRecord, target: &str) -> ItemOutcome {
        match self.service.sync_album(&album.path, target).await {
            Ok(result) => {
                info!("{}", result);
                ItemOutcome::Added {
                    artist: album.artist.clone(),
                    album: album.album.clone(),
                }
            }
            Err(err) => {
                warn!("Failed to sync {}: {}", album.name, err);
                ItemOutcome::Failed {
                    action: SyncAction::Add,
                    name: album.name.clone(),
                    detail: err.to_string(),
                }
            }
        }
    }

    async fn remove(&self, album: &AlbumRecord, target: &str) -> ItemOutcome {
        match self.service.unsync_album(target, &album.name).await {
            Ok(result) => {
                info!("{}", result);
                ItemOutcome::Removed {
                    artist: album.artist.clone(),
                    album: album.album.clone(),
                }
            }
            Err(err) => {
                warn!("Failed to remove {}: {}", album.name, err);
                ItemOutcome::Failed {
                    action: SyncAction::Remove,
                    name: album.name.clone(),
                    detail: err.to_string(),
                }
            }
        }
    }
}
