use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::document::Document;
use crate::error::Error;

pub const DEFAULT_CACHE_PATH: &str = "data/data.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Cache,
    Upload(PathBuf),
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DataSource::Cache => write!(f, "cached data"),
            DataSource::Upload(path) => write!(f, "uploaded file {path:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug)]
pub struct Loader {
    cache_path: PathBuf,
    generation: AtomicU64,
}

impl Loader {
    pub fn new<P: Into<PathBuf>>(cache_path: P) -> Self {
        Self {
            cache_path: cache_path.into(),
            generation: AtomicU64::new(0),
        }
    }

    pub fn path<'a>(&'a self, source: &'a DataSource) -> &'a Path {
        match source {
            DataSource::Cache => &self.cache_path,
            DataSource::Upload(path) => path,
        }
    }

    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    pub fn finish(
        &self,
        ticket: Ticket,
        source: &DataSource,
        document: Document,
    ) -> Result<Arc<Document>, Error> {
        if !self.is_current(ticket) {
            log::warn!("discard {source}, a later load was started");
            return Err(Error::Superseded(source.to_string()));
        }
        log::info!(
            "loaded {source}: {} upstream, {} downstream commits",
            document.upstream_commits.len(),
            document.downstream_commits.len()
        );
        Ok(Arc::new(document))
    }

    pub async fn load(&self, source: &DataSource) -> Result<Arc<Document>, Error> {
        let ticket = self.begin();
        let document = read_document(self.path(source)).await?;
        self.finish(ticket, source, document)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Loader::new(DEFAULT_CACHE_PATH)
    }
}

pub async fn read_document(path: &Path) -> Result<Document, Error> {
    log::debug!("read document from file: {path:?}");
    let content = tokio::fs::read(path).await?;
    let document: Document = serde_json::from_slice(&content)?;
    for sha in document.duplicate_shas() {
        log::warn!("duplicate sha {sha} in {path:?}");
    }
    Ok(document)
}
