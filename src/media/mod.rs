//! Hosting of uploaded audio files outside of the track database

use std::fmt::Display;

use thiserror::Error;

use crate::{config::MediaConfig, config::MediaBackend, domain::id::TrackId};

pub mod cloudinary;
pub mod fs;
#[cfg(test)]
pub mod memory;

/// Where an object lives in the media store
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaKey {
    pub folder: String,
    pub id: String,
}

impl MediaKey {
    pub fn new(folder: &str, id: &TrackId) -> Self {
        Self {
            folder: folder.to_string(),
            id: id.to_string(),
        }
    }
}

impl Display for MediaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.folder, self.id)
    }
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media object {0} not found")]
    NotFound(MediaKey),

    #[error("media host rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    ParseJSON(#[from] serde_json::Error),

    #[error("filesystem error: {0}")]
    Fs(#[from] std::io::Error),
}

/// An external host for binary objects.
///
/// Uploading to an existing key replaces the object.
pub trait MediaStore: Send {
    /// stores `data` under `key` and returns the public url of the object
    fn upload(&self, key: &MediaKey, file_name: &str, data: &[u8]) -> Result<String, MediaError>;

    fn delete(&self, key: &MediaKey) -> Result<(), MediaError>;
}

/// builds the store selected in the configuration
pub fn from_config(config: &MediaConfig) -> Box<dyn MediaStore> {
    match &config.backend {
        MediaBackend::Cloudinary {
            cloud_name,
            api_key,
            api_secret,
            api_base,
        } => Box::new(cloudinary::CloudinaryStore::new(
            api_base.clone(),
            cloud_name.clone(),
            api_key.clone(),
            api_secret.clone(),
        )),
        MediaBackend::Local { root, base_url } => {
            Box::new(fs::FsMediaStore::new(root.clone(), base_url.clone()))
        }
    }
}
