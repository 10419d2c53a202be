//! Title resolution for added links
//!
//! Each added link costs one network round-trip; this is the dominant
//! latency of an update cycle. Every failure degrades to the original
//! anchor label so one unreachable link never aborts the batch.

use crate::model::{LinkDescriptor, LinkSet, join_line};
use crate::ports::{ContentSniffer, MarkupParser, PageFetcher};
use crate::usecases::normalize;

/// Resolves added links into human-readable summary lines.
pub struct TitleResolver<'a, F, M, Sn>
where
    F: PageFetcher + ?Sized,
    M: MarkupParser + ?Sized,
    Sn: ContentSniffer + ?Sized,
{
    fetcher: &'a F,
    parser: &'a M,
    sniffer: &'a Sn,
}

impl<'a, F, M, Sn> TitleResolver<'a, F, M, Sn>
where
    F: PageFetcher + ?Sized,
    M: MarkupParser + ?Sized,
    Sn: ContentSniffer + ?Sized,
{
    pub fn new(fetcher: &'a F, parser: &'a M, sniffer: &'a Sn) -> Self {
        Self {
            fetcher,
            parser,
            sniffer,
        }
    }

    /// Resolve one link into its summary line. Never fails: every error
    /// path falls back to the original anchor label.
    pub async fn resolve(&self, link: &LinkDescriptor) -> String {
        let page = match self.fetcher.fetch(&link.url).await {
            Ok(page) => page,
            Err(error) => {
                tracing::warn!(url = %link.url, %error, "Link fetch failed, keeping anchor label");
                return join_line(&link.label, &link.url);
            }
        };

        if page.status >= 400 {
            tracing::warn!(url = %link.url, status = page.status, "Link target returned an error status");
            return join_line(&link.label, &link.url);
        }

        if let Some(ext) = self.sniffer.detect(&page.bytes) {
            return join_line(&format!("[{}]{}", ext, link.label), &link.url);
        }

        let titles = self.parser.titles(&page.text);
        let title = titles
            .og_title
            .map(|t| normalize::clean_title(&t))
            .filter(|t| !t.is_empty())
            .or_else(|| {
                titles
                    .title
                    .map(|t| normalize::clean_title(&t))
                    .filter(|t| !t.is_empty())
            })
            .unwrap_or_else(|| link.label.clone());

        join_line(&title, &link.url)
    }

    /// Resolve all added identities in the differ's output order.
    /// Resolutions are sequential and independent.
    pub async fn resolve_all(&self, links: &LinkSet, added: &[String]) -> Vec<String> {
        let mut lines = Vec::with_capacity(added.len());
        for identity in added {
            match links.get(identity) {
                Some(link) => lines.push(self.resolve(link).await),
                // Identities come from the set itself; keep the raw line
                // rather than dropping a reported addition.
                None => lines.push(identity.clone()),
            }
        }
        lines
    }
}
