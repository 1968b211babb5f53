//! Media store keeping uploaded files in a local directory

use std::path::{Path, PathBuf};

use super::{MediaError, MediaKey, MediaStore};

pub const MUSIC_EXTENSIONS: &[&str] = &["mp3", "flac", "wav", "m4a", "ogg", "aac"];

/// lowercased extension of a file name, if it has one
pub fn extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

pub fn is_music_file(file_name: &str) -> bool {
    extension(file_name)
        .map(|ext| MUSIC_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Stores every object as `{root}/{folder}/{id}.{ext}`.
///
/// Urls are built from `base_url`, which is expected to point at
/// the route serving `root` (see the `/media` route of the http server).
#[derive(Debug, Clone)]
pub struct FsMediaStore {
    root: PathBuf,
    base_url: String,
}

impl FsMediaStore {
    pub fn new(root: PathBuf, base_url: String) -> Self {
        Self { root, base_url }
    }

    /// files currently stored for the key, whatever their extension
    fn existing(&self, key: &MediaKey) -> Result<Vec<PathBuf>, MediaError> {
        let dir = self.root.join(&key.folder);
        if !dir.is_dir() {
            return Ok(vec![]);
        }

        let mut found = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            let stem = path.file_stem().and_then(|s| s.to_str());
            if path.is_file() && stem == Some(key.id.as_str()) {
                found.push(path);
            }
        }
        Ok(found)
    }
}

impl MediaStore for FsMediaStore {
    fn upload(&self, key: &MediaKey, file_name: &str, data: &[u8]) -> Result<String, MediaError> {
        let dir = self.root.join(&key.folder);
        std::fs::create_dir_all(&dir)?;

        for old in self.existing(key)? {
            std::fs::remove_file(old)?;
        }

        let ext = extension(file_name).unwrap_or_else(|| "bin".to_string());
        let stored_name = format!("{}.{ext}", key.id);
        let path = dir.join(&stored_name);
        std::fs::write(&path, data)?;

        log::debug!(
            "stored {} bytes for {key} at {}",
            data.len(),
            path.to_string_lossy()
        );

        Ok(format!(
            "{}/{}/{stored_name}",
            self.base_url.trim_end_matches('/'),
            key.folder
        ))
    }

    fn delete(&self, key: &MediaKey) -> Result<(), MediaError> {
        let files = self.existing(key)?;
        if files.is_empty() {
            return Err(MediaError::NotFound(key.clone()));
        }
        for file in files {
            std::fs::remove_file(file)?;
        }
        Ok(())
    }
}
