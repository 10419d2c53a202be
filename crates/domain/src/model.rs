//! Domain models and value objects

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use time::OffsetDateTime;

/// Separator between a label (or resolved title) and its URL in a summary
/// line. Labels are whitespace-folded and control-stripped before joining,
/// so normal label text can never produce this token and identity strings
/// stay collision-free across distinct (label, url) pairs.
pub const LINE_SEPARATOR: &str = " ---- ";

/// Stable identifier for a monitored page, derived from its URL.
///
/// Identical URLs always map to the same identifier regardless of display
/// name, so renaming a resource keeps its cached snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn from_url(url: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check state of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "code", rename_all = "snake_case")]
pub enum CheckStatus {
    /// Never checked, or not yet checked in the current run
    #[default]
    Pending,
    /// Checked; holds the last HTTP status code
    Checked(u16),
    /// Present in the cache but absent from the current registry
    Removed,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Pending => f.write_str("pending"),
            CheckStatus::Checked(code) => write!(f, "{}", code),
            CheckStatus::Removed => f.write_str("removed"),
        }
    }
}

/// A monitored web page and its last known check state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Content hash of the URL; stable across renames
    pub id: ResourceId,
    /// Display name
    pub name: String,
    /// Page URL
    pub url: String,
    #[serde(default)]
    pub status: CheckStatus,
    /// Hash of the last stored snapshot body; updated atomically with it
    #[serde(default)]
    pub content_hash: Option<String>,
    /// When the content hash last changed
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
    /// Change summary from the last cycle that detected a change
    #[serde(default)]
    pub log: String,
}

impl Resource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            id: ResourceId::from_url(&url),
            name: name.into(),
            url,
            status: CheckStatus::Pending,
            content_hash: None,
            updated_at: None,
            log: String::new(),
        }
    }
}

/// A registry entry as supplied by the CLI/config layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEntry {
    pub name: String,
    pub url: String,
}

/// Raw body of a resource at a point in time.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub body: String,
    /// Set when the body was replaced this cycle and must be persisted
    pub dirty: bool,
}

/// Join a label (or resolved title) with a URL into a summary line.
///
/// The leading space before the separator is omitted when the label is
/// empty.
pub fn join_line(label: &str, url: &str) -> String {
    if label.is_empty() {
        format!("{}{}", LINE_SEPARATOR.trim_start(), url)
    } else {
        format!("{}{}{}", label, LINE_SEPARATOR, url)
    }
}

/// A normalized comparable unit extracted from a page's hyperlinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDescriptor {
    /// Cleaned anchor text (text nodes joined with `::`)
    pub label: String,
    /// Absolute URL resolved against the page base
    pub url: String,
}

impl LinkDescriptor {
    /// Full rendered identity. Uniqueness is by label + URL together, not
    /// by URL alone.
    pub fn identity(&self) -> String {
        join_line(&self.label, &self.url)
    }
}

/// Link descriptors of one snapshot in document order, plus a lookup from
/// identity string back to the descriptor for later title resolution.
#[derive(Debug, Clone, Default)]
pub struct LinkSet {
    pub identities: Vec<String>,
    index: HashMap<String, LinkDescriptor>,
}

impl LinkSet {
    pub fn push(&mut self, link: LinkDescriptor) {
        let identity = link.identity();
        self.identities.push(identity.clone());
        self.index.insert(identity, link);
    }

    pub fn get(&self, identity: &str) -> Option<&LinkDescriptor> {
        self.index.get(identity)
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

/// Result of one check cycle for one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Body hash matches the stored hash; nothing else changed
    Unchanged { status: u16 },
    /// Content changed; summary may legitimately be empty
    Updated { status: u16, summary: String },
    /// Primary fetch failed; the rest of the batch still runs
    Failed { error: String },
}
