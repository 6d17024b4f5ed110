use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use common::AlbumRecord;
use parking_lot::Mutex;

use crate::service::{AlbumService, ServiceError};

/// In-memory album service. Albums live "on a target" as `(name, target)`
/// pairs, the same way the real service matches them by folder.
pub struct MockAlbumService {
    state: Mutex<MockState>,
    delay: Duration,
}

#[derive(Default)]
struct MockState {
    albums: Vec<AlbumRecord>,
    on_target: HashSet<(String, String)>,
    failing_checks: HashSet<String>,
    failing_mutations: HashSet<String>,
    scan_fails: bool,
    checks_in_flight: usize,
    mutations_in_flight: usize,
    calls: MockCalls,
}

#[derive(Clone, Debug, Default)]
pub struct MockCalls {
    pub scan: usize,
    pub check: usize,
    pub sync: usize,
    pub unsync: usize,
    pub cover: usize,
    pub peak_in_flight: usize,
    pub peak_mutations_in_flight: usize,
    pub mutation_log: Vec<String>,
}

impl MockCalls {
    pub fn total(&self) -> usize {
        self.scan + self.check + self.sync + self.unsync + self.cover
    }
}

impl MockAlbumService {
    pub fn new(albums: Vec<AlbumRecord>) -> Self {
        Self {
            state: Mutex::new(MockState {
                albums,
                ..MockState::default()
            }),
            delay: Duration::from_millis(2),
        }
    }

    pub fn albums(&self) -> Vec<AlbumRecord> {
        self.state.lock().albums.clone()
    }

    pub fn set_albums(&self, albums: Vec<AlbumRecord>) {
        self.state.lock().albums = albums;
    }

    pub fn calls(&self) -> MockCalls {
        self.state.lock().calls.clone()
    }

    pub fn put_on_target(&self, path: &str, target: &str) {
        let mut state = self.state.lock();
        let name = name_for(&state.albums, path);
        state.on_target.insert((name, target.to_string()));
    }

    pub fn is_on_target(&self, path: &str, target: &str) -> bool {
        let state = self.state.lock();
        let name = name_for(&state.albums, path);
        state.on_target.contains(&(name, target.to_string()))
    }

    pub fn fail_check(&self, path: &str) {
        self.state.lock().failing_checks.insert(path.to_string());
    }

    pub fn fail_mutation(&self, path: &str) {
        self.state.lock().failing_mutations.insert(path.to_string());
    }

    pub fn fail_scan(&self, fails: bool) {
        self.state.lock().scan_fails = fails;
    }

    async fn pause(&self) {
        tokio::time::sleep(self.delay).await;
    }

    fn begin_mutation(&self, label: String) {
        let mut state = self.state.lock();
        state.mutations_in_flight += 1;
        state.calls.peak_mutations_in_flight = state
            .calls
            .peak_mutations_in_flight
            .max(state.mutations_in_flight);
        state.calls.mutation_log.push(label);
    }

    fn end_mutation(&self) {
        self.state.lock().mutations_in_flight -= 1;
    }
}

fn name_for(albums: &[AlbumRecord], path: &str) -> String {
    albums
        .iter()
        .find(|album| album.path == path)
        .map(|album| album.name.clone())
        .unwrap_or_else(|| path.to_string())
}

fn path_for(albums: &[AlbumRecord], name: &str) -> Option<String> {
    albums
        .iter()
        .find(|album| album.name == name)
        .map(|album| album.path.clone())
}

#[async_trait]
impl AlbumService for MockAlbumService {
    async fn scan(&self, _directory: &str) -> Result<Vec<AlbumRecord>, ServiceError> {
        let (albums, fails) = {
            let mut state = self.state.lock();
            state.calls.scan += 1;
            (state.albums.clone(), state.scan_fails)
        };
        self.pause().await;
        if fails {
            return Err(ServiceError::Transport("connection refused".to_string()));
        }
        // The scan side never knows about targets.
        Ok(albums
            .into_iter()
            .map(|album| AlbumRecord {
                is_synced: false,
                ..album
            })
            .collect())
    }

    async fn check_synced(
        &self,
        source_path: &str,
        target_directory: &str,
    ) -> Result<bool, ServiceError> {
        {
            let mut state = self.state.lock();
            state.calls.check += 1;
            state.checks_in_flight += 1;
            state.calls.peak_in_flight = state.calls.peak_in_flight.max(state.checks_in_flight);
        }
        self.pause().await;
        let mut state = self.state.lock();
        state.checks_in_flight -= 1;
        if state.failing_checks.contains(source_path) {
            return Err(ServiceError::Transport("timed out".to_string()));
        }
        let name = name_for(&state.albums, source_path);
        Ok(state
            .on_target
            .contains(&(name, target_directory.to_string())))
    }

    async fn sync_album(
        &self,
        source_path: &str,
        target_directory: &str,
    ) -> Result<String, ServiceError> {
        self.state.lock().calls.sync += 1;
        self.begin_mutation(format!("sync {}", source_path));
        self.pause().await;
        self.end_mutation();

        let mut state = self.state.lock();
        if state.failing_mutations.contains(source_path) {
            return Err(ServiceError::Status {
                status: 500,
                message: "failed to copy files: disk full".to_string(),
            });
        }
        let name = name_for(&state.albums, source_path);
        state
            .on_target
            .insert((name.clone(), target_directory.to_string()));
        Ok(format!("Successfully synced {} to {}/{}", name, target_directory, name))
    }

    async fn unsync_album(
        &self,
        target_directory: &str,
        album_name: &str,
    ) -> Result<String, ServiceError> {
        self.state.lock().calls.unsync += 1;
        self.begin_mutation(format!("unsync {}", album_name));
        self.pause().await;
        self.end_mutation();

        let mut state = self.state.lock();
        let failing = path_for(&state.albums, album_name)
            .map(|path| state.failing_mutations.contains(&path))
            .unwrap_or(false);
        let key = (album_name.to_string(), target_directory.to_string());
        if failing || !state.on_target.remove(&key) {
            return Err(ServiceError::Status {
                status: 500,
                message: format!("album {} not found in target directory", album_name),
            });
        }
        Ok(format!("Successfully removed {}", album_name))
    }

    async fn cover_image(&self, source_path: &str) -> Result<Option<Bytes>, ServiceError> {
        let mut state = self.state.lock();
        state.calls.cover += 1;
        let has_cover = state
            .albums
            .iter()
            .any(|album| album.path == source_path && album.has_cover);
        Ok(has_cover.then(|| Bytes::from_static(b"\xFF\xD8\xFF")))
    }
}
