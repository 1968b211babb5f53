use anyhow::{Context, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub version: u32,
    pub database: Database,
    pub http: HttpConfig,
    pub media: MediaConfig,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.to_string_lossy()))?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> anyhow::Result<Config> {
        let config: Config =
            toml::from_str(contents).with_context(|| "Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !self.database.in_memory && self.database.path.is_none() {
            bail!("database.path is required unless database.in_memory = true");
        }
        if self.media.folder.trim().is_empty() {
            bail!("media.folder must not be empty");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub bind_addr: String,
    pub port: u16,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}

fn default_max_upload_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}

#[derive(Debug, Deserialize, Clone)]
pub struct Database {
    pub in_memory: bool,
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MediaConfig {
    /// every uploaded object is stored under this folder
    pub folder: String,
    #[serde(flatten)]
    pub backend: MediaBackend,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum MediaBackend {
    Cloudinary {
        cloud_name: String,
        api_key: String,
        api_secret: String,
        api_base: Option<String>,
    },
    Local {
        root: PathBuf,
        base_url: String,
    },
}

impl MediaBackend {
    /// directory served under `/media`, only the local backend has one
    pub fn local_root(&self) -> Option<&Path> {
        match self {
            MediaBackend::Local { root, .. } => Some(root),
            MediaBackend::Cloudinary { .. } => None,
        }
    }
}
