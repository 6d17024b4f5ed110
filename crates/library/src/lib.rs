mod browse;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use common::{folder_fingerprint, AlbumRecord};
use parking_lot::RwLock;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

pub use browse::{browse_directory, list_drives};

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "m4a", "aac", "ogg", "wav", "wma"];
const ROOT_FOLDER_NAMES: &[&str] = &["music", "songs", "audio", "media"];
const COVER_FILE: &str = "cover.jpg";
const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Filesystem side of the album service: scanning, fingerprinting and
/// moving album folders between a source collection and a target.
#[derive(Clone, Default)]
pub struct Library {
    fingerprints: Arc<RwLock<HashMap<PathBuf, String>>>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scan(&self, directory: &Path) -> Result<Vec<AlbumRecord>, LibraryError> {
        if !directory.is_dir() {
            return Err(LibraryError::NotFound(format!(
                "directory not found: {}",
                directory.display()
            )));
        }

        let mut albums = Vec::new();
        for entry in WalkDir::new(directory)
            .follow_links(false)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
        {
            if !entry.file_type().is_dir() {
                continue;
            }
            if let Some(album) = self.album_from_dir(entry.path()) {
                albums.push(album);
            }
        }

        info!(
            "Scanned {}: {} albums",
            directory.display(),
            albums.len()
        );
        Ok(albums)
    }

    fn album_from_dir(&self, path: &Path) -> Option<AlbumRecord> {
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(err) => {
                debug!("Skipping unreadable folder {}: {}", path.display(), err);
                return None;
            }
        };

        let mut audio_count = 0u32;
        let mut mp3_count = 0u32;
        for entry in entries.filter_map(Result::ok) {
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(true) {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().to_ascii_lowercase();
            let Some(ext) = Path::new(&file_name).extension().and_then(|e| e.to_str()) else {
                continue;
            };
            if ext == "mp3" {
                mp3_count += 1;
                audio_count += 1;
            } else if AUDIO_EXTENSIONS.contains(&ext) {
                audio_count += 1;
            }
        }
        if audio_count == 0 {
            return None;
        }

        let name = file_name_string(path);
        let parent_name = path.parent().map(file_name_string).unwrap_or_default();
        let (artist, album) = parse_artist_and_album(&parent_name, &name);

        Some(AlbumRecord {
            path: path.to_string_lossy().to_string(),
            name,
            artist,
            album,
            track_count: mp3_count,
            has_cover: find_cover_image(path).is_some(),
            size_mb: folder_size_mb(path),
            is_synced: false,
            fingerprint: self.fingerprint(path),
        })
    }

    /// Cached fingerprint of a folder. An unreadable folder yields an empty
    /// string, which is never cached.
    pub fn fingerprint(&self, folder: &Path) -> String {
        if let Some(cached) = self.fingerprints.read().get(folder) {
            return cached.clone();
        }

        let entries = match fs::read_dir(folder) {
            Ok(entries) => entries,
            Err(_) => return String::new(),
        };
        let files: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().map(|t| !t.is_dir()).unwrap_or(false))
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect();

        let fingerprint = folder_fingerprint(&file_name_string(folder), &files);
        self.fingerprints
            .write()
            .insert(folder.to_path_buf(), fingerprint.clone());
        fingerprint
    }

    pub fn forget(&self, folder: &Path) {
        self.fingerprints.write().remove(folder);
    }

    pub fn find_by_fingerprint(&self, target: &Path, fingerprint: &str) -> Option<PathBuf> {
        let entries = fs::read_dir(target).ok()?;
        for entry in entries.filter_map(Result::ok) {
            if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }
            let folder = entry.path();
            if self.fingerprint(&folder) == fingerprint {
                return Some(folder);
            }
        }
        None
    }

    pub fn check_synced(&self, source: &Path, target: &Path) -> bool {
        let fingerprint = self.fingerprint(source);
        if fingerprint.is_empty() {
            return false;
        }
        self.find_by_fingerprint(target, &fingerprint).is_some()
    }

    /// Copies the album folder to `target/<folder name>`.
    pub fn sync_album(&self, source: &Path, target: &Path) -> Result<String, LibraryError> {
        let folder_name = file_name_string(source);
        if folder_name.is_empty() || !source.is_dir() {
            return Err(LibraryError::NotFound(format!(
                "album folder not found: {}",
                source.display()
            )));
        }
        let target_path = target.join(&folder_name);
        fs::create_dir_all(&target_path)?;
        copy_directory(source, &target_path)?;
        self.forget(&target_path);
        info!("Synced {} to {}", folder_name, target_path.display());
        Ok(format!(
            "Successfully synced {} to {}",
            folder_name,
            target_path.display()
        ))
    }

    /// Removes `target/<album_name>` recursively.
    pub fn unsync_album(&self, target: &Path, album_name: &str) -> Result<String, LibraryError> {
        validate_album_name(album_name)?;
        let target_path = target.join(album_name);
        if !target_path.exists() {
            return Err(LibraryError::NotFound(format!(
                "album {} not found in target directory",
                album_name
            )));
        }
        fs::remove_dir_all(&target_path)?;
        self.forget(&target_path);
        info!("Removed {} from {}", album_name, target.display());
        Ok(format!("Successfully removed {}", album_name))
    }
}

#[derive(Debug)]
pub enum LibraryError {
    Io(std::io::Error),
    Walk(walkdir::Error),
    NotFound(String),
    InvalidName(String),
}

impl std::fmt::Display for LibraryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LibraryError::Io(err) => write!(f, "io error: {}", err),
            LibraryError::Walk(err) => write!(f, "walk error: {}", err),
            LibraryError::NotFound(message) => write!(f, "{}", message),
            LibraryError::InvalidName(name) => write!(f, "invalid album name: {}", name),
        }
    }
}

impl std::error::Error for LibraryError {}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        LibraryError::Io(err)
    }
}

impl From<walkdir::Error> for LibraryError {
    fn from(err: walkdir::Error) -> Self {
        LibraryError::Walk(err)
    }
}

/// Derives `(artist, album)` from folder names. The parent folder is the
/// artist unless it is a generic collection root; otherwise the album folder
/// is split on " - ", "-" or "_".
pub fn parse_artist_and_album(parent_name: &str, folder_name: &str) -> (String, String) {
    if !parent_name.is_empty() && !is_root_level_folder(parent_name) {
        return (parent_name.to_string(), folder_name.to_string());
    }

    for separator in [" - ", "-", "_"] {
        if let Some((artist, album)) = folder_name.split_once(separator) {
            let artist = artist.trim();
            let album = album.trim();
            if !artist.is_empty() && !album.is_empty() {
                return (artist.to_string(), album.to_string());
            }
        }
    }

    (UNKNOWN_ARTIST.to_string(), folder_name.to_string())
}

fn is_root_level_folder(name: &str) -> bool {
    ROOT_FOLDER_NAMES
        .iter()
        .any(|root| name.eq_ignore_ascii_case(root))
}

pub fn folder_size_mb(path: &Path) -> f64 {
    let bytes: u64 = WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|meta| meta.len())
        .sum();
    bytes as f64 / 1024.0 / 1024.0
}

/// `cover.jpg` in the album folder, falling back to its parent folder.
pub fn find_cover_image(album: &Path) -> Option<PathBuf> {
    let own = album.join(COVER_FILE);
    if own.is_file() {
        return Some(own);
    }
    let parent = album.parent()?.join(COVER_FILE);
    if parent.is_file() {
        return Some(parent);
    }
    None
}

fn copy_directory(src: &Path, dst: &Path) -> Result<(), LibraryError> {
    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry?;
        let rel = match entry.path().strip_prefix(src) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let dst_path = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dst_path)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &dst_path)?;
        } else {
            warn!("Skipping non-regular file {}", entry.path().display());
        }
    }
    Ok(())
}

fn validate_album_name(name: &str) -> Result<(), LibraryError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || name.contains('/')
        || name.contains('\\')
    {
        return Err(LibraryError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn file_name_string(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}
