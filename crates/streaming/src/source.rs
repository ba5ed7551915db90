//! Byte sources for the index and chunk documents.
//!
//! The loader only needs "give me the bytes at this relative path"; retry and
//! timeout policy belong to the transport behind this trait.

use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use crate::error::LoadError;

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait ResourceSource: Send + Sync {
    /// Short description used in logs.
    fn describe(&self) -> String;

    /// Fetch the resource at `path`, relative to the source root.
    fn fetch(&self, path: &str) -> BoxFuture<'_, Result<Vec<u8>, LoadError>>;
}

impl<S: ResourceSource + ?Sized> ResourceSource for Box<S> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn fetch(&self, path: &str) -> BoxFuture<'_, Result<Vec<u8>, LoadError>> {
        (**self).fetch(path)
    }
}

/// Resources under a local directory.
#[derive(Debug, Clone)]
pub struct FilesystemSource {
    root: PathBuf,
}

impl FilesystemSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ResourceSource for FilesystemSource {
    fn describe(&self) -> String {
        format!("file://{}", self.root.display())
    }

    fn fetch(&self, path: &str) -> BoxFuture<'_, Result<Vec<u8>, LoadError>> {
        let resource = path.to_string();
        let full = self.root.join(path);
        Box::pin(async move {
            tokio::fs::read(&full)
                .await
                .map_err(|e| LoadError::fetch_with_source(resource, "failed to read file", e))
        })
    }
}

/// Resources below an HTTP base URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl ResourceSource for HttpSource {
    fn describe(&self) -> String {
        self.base_url.clone()
    }

    fn fetch(&self, path: &str) -> BoxFuture<'_, Result<Vec<u8>, LoadError>> {
        let resource = path.to_string();
        let url = self.url_for(path);
        Box::pin(async move {
            let resp = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| LoadError::fetch_with_source(&resource, "HTTP request failed", e))?;

            if !resp.status().is_success() {
                return Err(LoadError::fetch(
                    resource,
                    format!("HTTP error: {}", resp.status()),
                ));
            }

            let bytes = resp
                .bytes()
                .await
                .map_err(|e| LoadError::fetch_with_source(&resource, "failed to read body", e))?;
            Ok(bytes.to_vec())
        })
    }
}

/// In-memory resources, keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    resources: BTreeMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.resources.insert(path.into(), bytes.into());
    }

    pub fn with(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }
}

impl ResourceSource for MemorySource {
    fn describe(&self) -> String {
        format!("memory ({} resources)", self.resources.len())
    }

    fn fetch(&self, path: &str) -> BoxFuture<'_, Result<Vec<u8>, LoadError>> {
        let found = self
            .resources
            .get(path)
            .cloned()
            .ok_or_else(|| LoadError::fetch(path, "not found"));
        Box::pin(async move { found })
    }
}

#[cfg(test)]
mod tests {
    use super::{FilesystemSource, HttpSource, MemorySource, ResourceSource};

    #[tokio::test]
    async fn memory_source_serves_inserted_paths() {
        let src = MemorySource::new().with("h3.json", b"[]".to_vec());
        assert_eq!(src.fetch("h3.json").await.unwrap(), b"[]".to_vec());

        let err = src.fetch("missing.json").await.unwrap_err();
        assert!(err.is_fetch());
        assert_eq!(err.resource(), "missing.json");
    }

    #[tokio::test]
    async fn filesystem_source_reads_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("h3")).unwrap();
        std::fs::write(dir.path().join("h3").join("a.json"), b"[1]").unwrap();

        let src = FilesystemSource::new(dir.path());
        assert_eq!(src.fetch("h3/a.json").await.unwrap(), b"[1]".to_vec());
        assert!(src.fetch("h3/b.json").await.unwrap_err().is_fetch());
    }

    #[test]
    fn http_source_joins_urls() {
        let src = HttpSource::new("https://example.org/data/");
        assert_eq!(
            src.url_for("/h3/a.json"),
            "https://example.org/data/h3/a.json"
        );
        assert_eq!(src.url_for("h3.json"), "https://example.org/data/h3.json");
    }
}
