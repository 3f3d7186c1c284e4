use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a byte source.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("{key}: not found")]
    NotFound { key: String },

    #[error("{key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{key}: {message}")]
    Remote { key: String, message: String },
}

/// An asynchronous capability that reads raw bytes by key.
///
/// How the key resolves (a path, a bundled asset name, a URL path) is up to
/// the implementation.
#[async_trait]
pub trait ByteSource: Send + Sync {
    /// Read every byte stored under `key`.
    async fn read(&self, key: &str) -> Result<Vec<u8>, SourceError>;
}

/// Reads keys as filesystem paths, optionally relative to a root directory.
#[derive(Debug, Clone, Default)]
pub struct FsSource {
    root: Option<PathBuf>,
}

impl FsSource {
    /// Resolve keys relative to the working directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve keys relative to `root`.
    #[must_use]
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, key: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(key),
            None => PathBuf::from(key),
        }
    }
}

#[async_trait]
impl ByteSource for FsSource {
    async fn read(&self, key: &str) -> Result<Vec<u8>, SourceError> {
        let path = self.resolve(key);
        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => SourceError::NotFound {
                key: path.display().to_string(),
            },
            _ => SourceError::Io {
                key: path.display().to_string(),
                source: e,
            },
        })
    }
}

/// In-memory assets, for workbooks bundled into the binary or built in tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    assets: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with_asset(mut self, key: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(key, bytes);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.assets.insert(key.into(), bytes.into());
    }
}

#[async_trait]
impl ByteSource for MemorySource {
    async fn read(&self, key: &str) -> Result<Vec<u8>, SourceError> {
        self.assets
            .get(key)
            .cloned()
            .ok_or_else(|| SourceError::NotFound { key: key.to_string() })
    }
}
