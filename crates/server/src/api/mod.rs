pub mod albums;
pub mod browse;
pub mod settings;

use axum::{
    routing::{get, post},
    Json, Router,
};

use crate::state::{AppState, HealthResponse};

pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/scan", post(albums::scan))
        .route("/check-sync", post(albums::check_sync))
        .route("/sync", post(albums::sync))
        .route("/unsync", post(albums::unsync))
        .route("/cover/*album_path", get(albums::cover))
        .route("/drives", get(browse::drives))
        .route("/browse", post(browse::browse))
        .route("/settings", get(settings::get_settings).post(settings::save_settings))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::time::Duration;

    use axum::Router;
    use common::AppSettings;
    use engine::{AlbumService, HttpAlbumService, ServiceError, Session};

    use super::api_router;
    use crate::config::ServerConfig;
    use crate::state::AppState;

    async fn serve(config_dir: &Path) -> HttpAlbumService {
        let state = AppState::new(config_dir.join("config.yaml"), ServerConfig::default());
        let app = Router::new().nest("/api", api_router(state));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        HttpAlbumService::new(&format!("http://{}", addr), Duration::from_secs(10)).unwrap()
    }

    fn write_album(root: &Path, rel: &str, files: &[&str]) -> String {
        let dir = root.join(rel);
        fs::create_dir_all(&dir).unwrap();
        for file in files {
            fs::write(dir.join(file), b"jpeg").unwrap();
        }
        dir.to_string_lossy().into_owned()
    }

    #[tokio::test]
    async fn session_syncs_and_removes_through_the_api() {
        let temp = tempfile::tempdir().unwrap();
        let abbey = write_album(
            temp.path(),
            "source/Beatles/Abbey Road",
            &["01 Come Together.mp3", "02 Something.mp3", "cover.jpg"],
        );
        write_album(temp.path(), "source/Radiohead/Kid A", &["01 Everything.flac"]);
        let target_dir = temp.path().join("target");
        fs::create_dir_all(&target_dir).unwrap();
        let source = temp.path().join("source").to_string_lossy().into_owned();
        let target = target_dir.to_string_lossy().into_owned();

        let service = serve(temp.path()).await;
        let mut session = Session::new(service);
        session.set_target(&target).await.unwrap();
        assert_eq!(session.scan(&source).await.unwrap(), 2);
        let scanned = &session.catalog()[0];
        assert_eq!(scanned.path, abbey);
        assert_eq!(scanned.artist, "Beatles");
        assert_eq!(scanned.track_count, 2);
        assert!(scanned.has_cover);
        assert!(!scanned.fingerprint.is_empty());
        assert!(session.catalog().iter().all(|album| !album.is_synced));

        session.toggle(&abbey);
        let summary = session.run_sync().await.unwrap();
        assert_eq!(summary.added, 1);
        assert_eq!(summary.failures(), 0);
        assert!(target_dir.join("Abbey Road/cover.jpg").is_file());
        assert!(session.catalog()[0].is_synced);
        assert!(!session.catalog()[1].is_synced);

        session.toggle(&abbey);
        assert!(session.needs_unsync());
        let summary = session.run_sync().await.unwrap();
        assert_eq!(summary.removed, 1);
        assert!(!target_dir.join("Abbey Road").exists());
        assert!(!session.catalog()[0].is_synced);

        let err = session
            .service()
            .unsync_album(&target, "Ghost")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ServiceError::Status {
                status: 404,
                message: "album Ghost not found in target directory".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn covers_and_settings_round_trip_over_http() {
        let temp = tempfile::tempdir().unwrap();
        let abbey = write_album(temp.path(), "music/Beatles/Abbey Road", &["cover.jpg"]);
        let kid_a = write_album(temp.path(), "music/Radiohead/Kid A", &["01.mp3"]);
        let service = serve(temp.path()).await;

        let cover = service.cover_image(&abbey).await.unwrap().unwrap();
        assert_eq!(cover.to_vec(), b"jpeg".to_vec());
        assert_eq!(service.cover_image(&kid_a).await.unwrap(), None);

        assert_eq!(service.load_settings().await.unwrap(), AppSettings::default());
        let settings = AppSettings {
            last_source_directory: temp.path().join("music").to_string_lossy().into_owned(),
            last_target_directory: "/media/usb".to_string(),
        };
        service.save_settings(&settings).await.unwrap();
        assert_eq!(service.load_settings().await.unwrap(), settings);

        let drives = service.drives().await.unwrap();
        assert!(!drives.is_empty());
        let listed = service
            .browse(&temp.path().join("music").to_string_lossy())
            .await
            .unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|item| item.is_directory));
    }
}
