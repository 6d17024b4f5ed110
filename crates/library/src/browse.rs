use std::fs;
use std::path::{Path, PathBuf};

use common::DirectoryItem;

use crate::LibraryError;

/// Lists the visible entries of a directory; dot-entries are skipped.
pub fn browse_directory(path: &Path) -> Result<Vec<DirectoryItem>, LibraryError> {
    let mut items = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        let is_directory = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        items.push(DirectoryItem {
            path: path.join(&name).to_string_lossy().to_string(),
            name,
            is_directory,
        });
    }
    Ok(items)
}

#[cfg(windows)]
pub fn list_drives() -> Vec<String> {
    (b'A'..=b'Z')
        .map(|letter| format!("{}:\\", letter as char))
        .filter(|drive| PathBuf::from(drive).exists())
        .collect()
}

#[cfg(not(windows))]
pub fn list_drives() -> Vec<String> {
    let mut drives = vec!["/".to_string()];
    if PathBuf::from("/Volumes").exists() {
        drives.push("/Volumes".to_string());
    }
    drives
}
