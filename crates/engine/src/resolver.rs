use common::AlbumRecord;
use tracing::{debug, warn};

use crate::concurrency::{map_bounded, DEFAULT_CONCURRENCY};
use crate::service::AlbumService;

/// Annotates each album with whether it is present on `target`. A blank or
/// missing target returns the catalog untouched. A failed check leaves that
/// one album as it was.
pub async fn resolve_status<S>(
    service: &S,
    catalog: Vec<AlbumRecord>,
    target: Option<&str>,
) -> Vec<AlbumRecord>
where
    S: AlbumService + ?Sized,
{
    let Some(target) = target.filter(|value| !value.trim().is_empty()) else {
        return catalog;
    };

    debug!("Checking {} albums against {}", catalog.len(), target);
    map_bounded(catalog, DEFAULT_CONCURRENCY, move |album| async move {
        match service.check_synced(&album.path, target).await {
            Ok(synced) => AlbumRecord {
                is_synced: synced,
                ..album
            },
            Err(err) => {
                warn!("Failed to check sync status for {}: {}", album.name, err);
                album
            }
        }
    })
    .await
}

/// Drops every sync flag; they only hold for the target they were resolved
/// against.
pub fn invalidate(catalog: &mut [AlbumRecord]) {
    for album in catalog {
        album.is_synced = false;
    }
}
