//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external
//! systems. Adapters implement these traits to connect to real
//! infrastructure.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::model::{Resource, ResourceId};

/// Error type for page fetch operations
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Request timed out")]
    Timeout,
}

/// A fetched page: status plus the body both as raw bytes (for type
/// sniffing) and as decoded text (for parsing and hashing).
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub bytes: Vec<u8>,
    pub text: String,
}

/// Port for fetching pages over HTTP
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a URL. Non-2xx statuses are returned as data, not errors;
    /// only transport-level failures produce a `FetchError`.
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// A hyperlink-bearing element as found in the markup: raw href plus every
/// text node inside the element, in document order.
#[derive(Debug, Clone)]
pub struct Anchor {
    pub href: String,
    pub text_parts: Vec<String>,
}

/// Title candidates extracted from a fetched page.
#[derive(Debug, Clone, Default)]
pub struct PageTitles {
    /// `og:title` meta value, preferred when present
    pub og_title: Option<String>,
    /// `<title>` element text
    pub title: Option<String>,
}

/// Port for querying a parsed markup document
pub trait MarkupParser: Send + Sync {
    /// All hyperlink-bearing elements in document order
    fn anchors(&self, html: &str) -> Vec<Anchor>;

    /// Title candidates for resolved-title extraction
    fn titles(&self, html: &str) -> PageTitles;
}

/// Port for detecting binary/media content
pub trait ContentSniffer: Send + Sync {
    /// Returns the type extension (e.g. "pdf") when the bytes are a known
    /// binary/media format, `None` when they look like markup or text.
    fn detect(&self, bytes: &[u8]) -> Option<String>;
}

/// Port for rendering markup to plain text (rendered-text mode)
pub trait TextRenderer: Send + Sync {
    fn render(&self, html: &str) -> String;
}

/// Error type for registry/snapshot store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Port for persisting the resource registry and cached snapshots.
///
/// Records must round-trip exactly across save/load. Snapshot bodies are
/// keyed by resource identifier.
#[async_trait]
pub trait RegistryStore: Send + Sync {
    /// Load all persisted resources
    async fn load(&self) -> Result<Vec<Resource>, StoreError>;

    /// Persist the full resource set (batched write at end of cycle)
    async fn save(&self, resources: &[Resource]) -> Result<(), StoreError>;

    /// Read the last stored body for a resource, if any
    async fn read_snapshot(&self, id: &ResourceId) -> Result<Option<String>, StoreError>;

    /// Replace the stored body for a resource
    async fn write_snapshot(&self, id: &ResourceId, body: &str) -> Result<(), StoreError>;

    /// Delete the stored body for a deregistered resource
    async fn delete_snapshot(&self, id: &ResourceId) -> Result<(), StoreError>;

    /// Make a full backup copy of the cache, for crash recovery before a
    /// mutating run
    async fn backup(&self) -> Result<(), StoreError>;
}

/// Port for time/clock operations (enables deterministic testing)
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> OffsetDateTime;
}

/// Real clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
