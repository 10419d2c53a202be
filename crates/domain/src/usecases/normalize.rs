//! Snapshot normalization: reduce raw markup to comparable link descriptors
//!
//! Raw anchor data comes from the markup parser port; everything here is
//! the cleanup that makes identity strings stable: control-character
//! stripping, whitespace folding, and href resolution against the page
//! base URL.

use url::Url;

use crate::model::{LinkDescriptor, LinkSet};
use crate::ports::Anchor;

/// Full-width space (U+3000); folded together with ASCII spaces, since
/// Japanese pages commonly pad anchor text with it.
const IDEOGRAPHIC_SPACE: char = '\u{3000}';

/// Drop code points below U+0020. Newlines and tabs inside anchor text are
/// markup churn, and control characters in hrefs break URL comparison.
fn strip_control(s: &str) -> String {
    s.chars().filter(|c| *c >= ' ').collect()
}

/// Collapse runs of ASCII and full-width spaces into a single ASCII space.
fn fold_spaces(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_run = false;
    for c in s.chars() {
        if c == ' ' || c == IDEOGRAPHIC_SPACE {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Build a label from the text nodes of one anchor element: trim each,
/// drop empties, join with a double colon, then normalize whitespace.
pub fn clean_label(parts: &[String]) -> String {
    let joined = parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("::");
    fold_spaces(&strip_control(&joined))
        .trim()
        .to_string()
}

/// Resolve an href against the page base URL into an absolute URL,
/// stripping control characters first. Unresolvable hrefs keep the
/// stripped raw string so the unit is still comparable.
pub fn clean_href(href: &str, base: &Url) -> String {
    let stripped = strip_control(href);
    match base.join(&stripped) {
        Ok(url) => url.to_string(),
        Err(_) => stripped,
    }
}

/// Normalize a snapshot's anchors into a link set in document order.
pub fn link_set(anchors: &[Anchor], base_url: &str) -> LinkSet {
    let base = Url::parse(base_url).ok();
    let mut set = LinkSet::default();

    for anchor in anchors {
        let label = clean_label(&anchor.text_parts);
        let url = match &base {
            Some(base) => clean_href(&anchor.href, base),
            None => strip_control(&anchor.href),
        };
        set.push(LinkDescriptor { label, url });
    }

    set
}

/// Clean a resolved page title the same way labels are cleaned, so the
/// separator token stays unforgeable in resolved lines too.
pub fn clean_title(title: &str) -> String {
    fold_spaces(&strip_control(title)).trim().to_string()
}
