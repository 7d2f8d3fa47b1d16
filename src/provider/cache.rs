//! provider::cache
//!
//! Per-adapter in-memory cache of fetched files.
//!
//! # Design
//!
//! The cache is keyed by full repository path (after `root_dir` prefixing)
//! and lives exactly as long as the adapter that owns it. Nothing is
//! persisted.
//!
//! The lock is held only for a lookup or an insert, never across a network
//! call. Two overlapping cached reads of the same path can therefore both
//! miss and both fetch; the later insert wins.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use super::traits::ProviderError;
use super::types::GitFile;

/// In-memory file cache owned by one adapter instance.
#[derive(Debug, Default)]
pub struct FileCache {
    files: Mutex<HashMap<String, GitFile>>,
}

impl FileCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a file by full path.
    pub fn get(&self, full_path: &str) -> Option<GitFile> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(full_path)
            .cloned()
    }

    /// Store a file under its full path, replacing any previous entry.
    pub fn insert(&self, full_path: impl Into<String>, file: GitFile) {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(full_path.into(), file);
    }

    /// Number of cached files.
    pub fn len(&self) -> usize {
        self.files.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached file.
    pub fn clear(&self) {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Run a read through the cache.
    ///
    /// With `cached` set, a hit returns immediately and a successful fetch
    /// is stored. Without it the cache is neither read nor written.
    /// Misses (`Ok(None)`) and errors are never cached.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        full_path: &str,
        cached: bool,
        fetch: F,
    ) -> Result<Option<GitFile>, ProviderError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<GitFile>, ProviderError>>,
    {
        if cached {
            if let Some(file) = self.get(full_path) {
                debug!(path = full_path, "file served from cache");
                return Ok(Some(file));
            }
        }

        let file = fetch().await?;

        if cached {
            if let Some(ref f) = file {
                self.insert(full_path, f.clone());
            }
        }

        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ContentEncoding, ProviderType};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sample(path: &str) -> GitFile {
        GitFile {
            provider: ProviderType::GitLab,
            name: crate::provider::file_name(path),
            path: path.to_string(),
            sha: "blob".into(),
            size: 2,
            url: String::new(),
            content: "hi".into(),
            encoding: ContentEncoding::Utf8,
        }
    }

    #[tokio::test]
    async fn cached_read_fetches_once() {
        let cache = FileCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let file = cache
                .get_or_fetch("content/a.md", true, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Some(sample("content/a.md")))
                })
                .await
                .unwrap();
            assert_eq!(file, Some(sample("content/a.md")));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn uncached_read_bypasses_cache() {
        let cache = FileCache::new();
        cache.insert("content/a.md", sample("content/a.md"));
        let calls = AtomicUsize::new(0);

        cache
            .get_or_fetch("content/a.md", false, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn misses_and_errors_are_not_cached() {
        let cache = FileCache::new();

        let miss = cache
            .get_or_fetch("a.md", true, || async { Ok(None) })
            .await
            .unwrap();
        assert!(miss.is_none());

        let err = cache
            .get_or_fetch("b.md", true, || async {
                Err(ProviderError::Network("down".into()))
            })
            .await;
        assert!(err.is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_empties_cache() {
        let cache = FileCache::new();
        cache.insert("a.md", sample("a.md"));
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
    }
}
