use crate::source::ByteSource;
use crate::xlsx::{parse_workbook, ReadOptions};
use ridership_core::{DashboardConfig, LoadFailure, LoadResult, NamedTableSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Reads and parses workbooks from a byte source.
///
/// Every call to [`WorkbookLoader::load`] re-reads and re-parses from
/// scratch; nothing is cached between loads.
#[derive(Clone)]
pub struct WorkbookLoader {
    source: Arc<dyn ByteSource>,
    options: ReadOptions,
    timeout: Option<Duration>,
}

impl WorkbookLoader {
    /// Create a loader with no timeout and default read options.
    pub fn new<S: ByteSource + 'static>(source: S) -> Self {
        Self::from_shared(Arc::new(source))
    }

    /// Create a loader over a source that is shared with other owners.
    pub fn from_shared(source: Arc<dyn ByteSource>) -> Self {
        Self {
            source,
            options: ReadOptions::default(),
            timeout: None,
        }
    }

    /// Create a loader using the timeout and load policy from `config`.
    pub fn from_config<S: ByteSource + 'static>(source: S, config: &DashboardConfig) -> Self {
        Self::new(source)
            .with_timeout(config.timeout())
            .with_options(ReadOptions::default().with_policy(config.load_policy))
    }

    /// Bound the read step; `None` waits indefinitely.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: ReadOptions) -> Self {
        self.options = options;
        self
    }

    /// Read and parse the workbook stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadFailure`] if the read fails or times out, or the bytes
    /// do not parse as a workbook.
    pub async fn load(&self, key: &str) -> LoadResult<NamedTableSet> {
        tracing::info!(source = %key, "loading workbook");

        let bytes = self.read(key).await?;
        let options = self.options.clone();
        let size = bytes.len();

        let tables = tokio::task::spawn_blocking(move || parse_workbook(bytes, &options))
            .await
            .map_err(|e| LoadFailure::new(key, format!("workbook parser stopped: {e}")))?
            .map_err(|e| LoadFailure::new(key, e.to_string()))?;

        tracing::info!(
            source = %key,
            bytes = size,
            sheets = tables.len(),
            rows = tables.total_rows(),
            skipped = tables.skipped().len(),
            "workbook loaded"
        );
        Ok(tables)
    }

    /// Like [`WorkbookLoader::load`], but gives up as soon as `cancel`
    /// completes.
    ///
    /// Use this when the consumer of the data can go away before the load
    /// finishes: pass a future that resolves on teardown.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadFailure`] if the load fails or is cancelled.
    pub async fn load_until<C>(&self, key: &str, cancel: C) -> LoadResult<NamedTableSet>
    where
        C: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            () = cancel => {
                tracing::warn!(source = %key, "workbook load cancelled");
                Err(LoadFailure::new(key, "load cancelled before completion"))
            }
            result = self.load(key) => result,
        }
    }

    async fn read(&self, key: &str) -> LoadResult<Vec<u8>> {
        let read = self.source.read(key);
        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, read).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(source = %key, timeout_ms = limit.as_millis() as u64, "workbook read timed out");
                    return Err(LoadFailure::new(
                        key,
                        format!("reading {key} timed out after {} ms", limit.as_millis()),
                    ));
                }
            },
            None => read.await,
        };
        result.map_err(|e| LoadFailure::new(key, format!("failed to read {e}")))
    }
}

impl std::fmt::Debug for WorkbookLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkbookLoader")
            .field("options", &self.options)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
