//! Check loop use case - orchestrates fetching, change detection, diffing,
//! and title resolution for the whole registry
//!
//! Resources are processed one at a time; network calls are the only
//! suspension points. No failure inside a cycle is fatal: the batch always
//! completes and persists whatever progress was made.

use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    content_hash,
    model::{CheckOutcome, CheckStatus, PageEntry, Resource, ResourceId, Snapshot},
    ports::{Clock, ContentSniffer, FetchedPage, MarkupParser, PageFetcher, RegistryStore, TextRenderer},
    usecases::{diff, normalize, resolve::TitleResolver, summarize},
};

/// Normalization strategy for snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckMode {
    /// Compare canonicalized link lists and resolve titles for additions
    #[default]
    Links,
    /// Compare rendered plain-text lines; no title resolution
    Rendered,
}

/// Configuration for the check loop
#[derive(Debug, Clone, Default)]
pub struct CheckLoopConfig {
    pub mode: CheckMode,
    /// Inspect without mutating the cache (no backup, no flush)
    pub dry_run: bool,
}

/// Check loop orchestrator
pub struct CheckLoop<F, M, Sn, R, St, Cl>
where
    F: PageFetcher + ?Sized,
    M: MarkupParser + ?Sized,
    Sn: ContentSniffer + ?Sized,
    R: TextRenderer + ?Sized,
    St: RegistryStore + ?Sized,
    Cl: Clock + ?Sized,
{
    fetcher: Arc<F>,
    parser: Arc<M>,
    sniffer: Arc<Sn>,
    renderer: Arc<R>,
    store: Arc<St>,
    clock: Arc<Cl>,
    config: CheckLoopConfig,
}

impl<F, M, Sn, R, St, Cl> CheckLoop<F, M, Sn, R, St, Cl>
where
    F: PageFetcher + ?Sized,
    M: MarkupParser + ?Sized,
    Sn: ContentSniffer + ?Sized,
    R: TextRenderer + ?Sized,
    St: RegistryStore + ?Sized,
    Cl: Clock + ?Sized,
{
    pub fn new(
        fetcher: Arc<F>,
        parser: Arc<M>,
        sniffer: Arc<Sn>,
        renderer: Arc<R>,
        store: Arc<St>,
        clock: Arc<Cl>,
        config: CheckLoopConfig,
    ) -> Self {
        Self {
            fetcher,
            parser,
            sniffer,
            renderer,
            store,
            clock,
            config,
        }
    }

    /// Run one update cycle over the registry.
    ///
    /// `registry` is the authoritative (name, url) list for this run.
    /// Cached resources absent from it are marked `Removed` and their
    /// snapshots deleted. All mutations are flushed in one batch at the
    /// end; a full cache backup is taken first.
    pub async fn update(
        &self,
        registry: &[PageEntry],
    ) -> Result<Vec<(String, CheckOutcome)>, CheckLoopError> {
        if !self.config.dry_run {
            if let Err(error) = self.store.backup().await {
                tracing::warn!(%error, "Cache backup failed, continuing without one");
            }
        }

        let mut resources = self.merge_registry(registry).await?;
        let mut outcomes = Vec::with_capacity(registry.len());
        let mut snapshots: Vec<(ResourceId, Snapshot)> = Vec::new();

        for resource in resources
            .iter_mut()
            .filter(|r| r.status != CheckStatus::Removed)
        {
            tracing::info!(name = %resource.name, url = %resource.url, "Checking resource");
            let (outcome, snapshot) = self.check_resource(resource).await;
            if let Some(snapshot) = snapshot {
                snapshots.push((resource.id.clone(), snapshot));
            }

            match &outcome {
                CheckOutcome::Unchanged { status } => {
                    tracing::debug!(name = %resource.name, status, "No change");
                }
                CheckOutcome::Updated { status, summary } => {
                    tracing::info!(
                        name = %resource.name,
                        status,
                        lines = summary.lines().count(),
                        "Content changed"
                    );
                }
                CheckOutcome::Failed { error } => {
                    tracing::warn!(name = %resource.name, %error, "Check failed");
                }
            }

            outcomes.push((resource.name.clone(), outcome));
        }

        if !self.config.dry_run {
            self.flush(&resources, &snapshots).await;
        }

        Ok(outcomes)
    }

    /// Rebaseline every resource: refetch, store body and hash, clear the
    /// change log. No diffing and no title resolution.
    pub async fn recheck(
        &self,
        registry: &[PageEntry],
    ) -> Result<Vec<(String, CheckOutcome)>, CheckLoopError> {
        if !self.config.dry_run {
            if let Err(error) = self.store.backup().await {
                tracing::warn!(%error, "Cache backup failed, continuing without one");
            }
        }

        let mut resources = self.merge_registry(registry).await?;
        let mut outcomes = Vec::with_capacity(registry.len());
        let mut snapshots: Vec<(ResourceId, Snapshot)> = Vec::new();

        for resource in resources
            .iter_mut()
            .filter(|r| r.status != CheckStatus::Removed)
        {
            let page = match self.fetcher.fetch(&resource.url).await {
                Ok(page) => page,
                Err(error) => {
                    tracing::warn!(name = %resource.name, %error, "Fetch failed during recheck");
                    outcomes.push((
                        resource.name.clone(),
                        CheckOutcome::Failed {
                            error: error.to_string(),
                        },
                    ));
                    continue;
                }
            };

            resource.status = CheckStatus::Checked(page.status);
            if page.status >= 400 {
                outcomes.push((
                    resource.name.clone(),
                    CheckOutcome::Failed {
                        error: format!("HTTP status {}", page.status),
                    },
                ));
                continue;
            }

            resource.content_hash = Some(content_hash(&page.text));
            resource.updated_at = Some(self.clock.now());
            resource.log = String::new();
            snapshots.push((
                resource.id.clone(),
                Snapshot {
                    body: page.text.clone(),
                    dirty: true,
                },
            ));
            outcomes.push((
                resource.name.clone(),
                CheckOutcome::Updated {
                    status: page.status,
                    summary: String::new(),
                },
            ));
        }

        if !self.config.dry_run {
            self.flush(&resources, &snapshots).await;
        }

        Ok(outcomes)
    }

    /// Merge the current registry into the cached resource set.
    ///
    /// Registry order wins; cached check state is carried over by id.
    /// Cached entries missing from the registry are kept with status
    /// `Removed` so callers can see what was dropped.
    async fn merge_registry(
        &self,
        registry: &[PageEntry],
    ) -> Result<Vec<Resource>, CheckLoopError> {
        let cached = self
            .store
            .load()
            .await
            .map_err(|e| CheckLoopError::Store(e.to_string()))?;

        let mut by_id: std::collections::HashMap<_, _> =
            cached.into_iter().map(|r| (r.id.clone(), r)).collect();

        let mut resources = Vec::with_capacity(registry.len());
        let mut seen = HashSet::new();

        for entry in registry {
            let mut resource = match by_id.remove(&ResourceId::from_url(&entry.url)) {
                Some(existing) => existing,
                None => Resource::new(&entry.name, &entry.url),
            };
            resource.name = entry.name.clone();
            // A record left behind by deregistration comes back to life when
            // its URL shows up in the registry again.
            if resource.status == CheckStatus::Removed {
                resource.status = CheckStatus::Pending;
            }
            if !seen.insert(resource.id.clone()) {
                tracing::warn!(name = %entry.name, url = %entry.url, "Duplicate URL in registry, skipping");
                continue;
            }
            resources.push(resource);
        }

        for (id, mut removed) in by_id {
            tracing::info!(name = %removed.name, "Resource no longer registered");
            removed.status = CheckStatus::Removed;
            if !self.config.dry_run {
                if let Err(error) = self.store.delete_snapshot(&id).await {
                    tracing::warn!(%id, %error, "Failed to delete snapshot of removed resource");
                }
            }
            resources.push(removed);
        }

        Ok(resources)
    }

    /// Check one resource: fetch, hash-compare, and on change diff and
    /// summarize. Mutates the resource in place and returns the outcome
    /// plus the snapshot for this cycle (dirty when it must be persisted).
    async fn check_resource(&self, resource: &mut Resource) -> (CheckOutcome, Option<Snapshot>) {
        let page = match self.fetcher.fetch(&resource.url).await {
            Ok(page) => page,
            Err(error) => {
                return (
                    CheckOutcome::Failed {
                        error: error.to_string(),
                    },
                    None,
                );
            }
        };

        resource.status = CheckStatus::Checked(page.status);

        if page.status >= 400 {
            return (
                CheckOutcome::Failed {
                    error: format!("HTTP status {}", page.status),
                },
                None,
            );
        }

        // Fast path: unchanged hash means no diffing and no resolution.
        let new_hash = content_hash(&page.text);
        if resource.content_hash.as_deref() == Some(new_hash.as_str()) {
            return (
                CheckOutcome::Unchanged {
                    status: page.status,
                },
                Some(Snapshot {
                    body: page.text,
                    dirty: false,
                }),
            );
        }

        let old_body = match self.store.read_snapshot(&resource.id).await {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!(name = %resource.name, %error, "Failed to read cached snapshot, treating as first check");
                None
            }
        };

        let summary = self
            .summarize_change(resource, old_body.as_deref(), &page)
            .await;

        resource.content_hash = Some(new_hash);
        resource.updated_at = Some(self.clock.now());
        resource.log = summary.clone();

        (
            CheckOutcome::Updated {
                status: page.status,
                summary,
            },
            Some(Snapshot {
                body: page.text,
                dirty: true,
            }),
        )
    }

    async fn summarize_change(
        &self,
        resource: &Resource,
        old_body: Option<&str>,
        page: &FetchedPage,
    ) -> String {
        match self.config.mode {
            CheckMode::Links => {
                let new_links =
                    normalize::link_set(&self.parser.anchors(&page.text), &resource.url);
                let added = match old_body {
                    Some(old) => {
                        let old_links =
                            normalize::link_set(&self.parser.anchors(old), &resource.url);
                        diff::added_units(&old_links.identities, &new_links.identities)
                    }
                    // First successful check: everything is new.
                    None => new_links.identities.clone(),
                };

                let resolver = TitleResolver::new(
                    self.fetcher.as_ref(),
                    self.parser.as_ref(),
                    self.sniffer.as_ref(),
                );
                let lines = resolver.resolve_all(&new_links, &added).await;
                summarize::assemble(&lines)
            }
            CheckMode::Rendered => match old_body {
                // No per-line reporting on the first check in this mode.
                None => "Initial update.".to_string(),
                Some(old) => {
                    let old_lines: Vec<String> =
                        self.renderer.render(old).lines().map(String::from).collect();
                    let new_lines: Vec<String> = self
                        .renderer
                        .render(&page.text)
                        .lines()
                        .map(String::from)
                        .collect();
                    let added = diff::added_units(&old_lines, &new_lines);
                    summarize::assemble(&added)
                }
            },
        }
    }

    /// Batched end-of-cycle write: registry records first, then dirty
    /// snapshot bodies. I/O failures are warnings; in-memory state already
    /// reflects the change.
    async fn flush(&self, resources: &[Resource], snapshots: &[(ResourceId, Snapshot)]) {
        if let Err(error) = self.store.save(resources).await {
            tracing::warn!(%error, "Failed to persist registry records");
        }
        for (id, snapshot) in snapshots.iter().filter(|(_, s)| s.dirty) {
            if let Err(error) = self.store.write_snapshot(id, &snapshot.body).await {
                tracing::warn!(%id, %error, "Failed to persist snapshot");
            }
        }
    }
}

/// Errors from the check loop
#[derive(Debug, thiserror::Error)]
pub enum CheckLoopError {
    #[error("Store error: {0}")]
    Store(String),
}
