//! infer-based binary/media type sniffer

use infer::MatcherType;
use pagewatch_domain::ContentSniffer;

/// Sniffer over `infer`'s magic-number matchers.
///
/// Markup and plain text are not sniffable types here; they return `None`
/// so the resolver proceeds to title extraction.
pub struct InferSniffer;

impl ContentSniffer for InferSniffer {
    fn detect(&self, bytes: &[u8]) -> Option<String> {
        let kind = infer::get(bytes)?;
        match kind.matcher_type() {
            MatcherType::App
            | MatcherType::Archive
            | MatcherType::Audio
            | MatcherType::Book
            | MatcherType::Doc
            | MatcherType::Font
            | MatcherType::Image
            | MatcherType::Video => Some(kind.extension().to_string()),
            MatcherType::Text | MatcherType::Custom => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_bytes_detect_as_pdf() {
        let bytes = b"%PDF-1.4 rest of document";
        assert_eq!(InferSniffer.detect(bytes).as_deref(), Some("pdf"));
    }

    #[test]
    fn png_bytes_detect_as_png() {
        let bytes = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0];
        assert_eq!(InferSniffer.detect(&bytes).as_deref(), Some("png"));
    }

    #[test]
    fn html_is_not_a_media_type() {
        assert!(InferSniffer.detect(b"<html><body>hi</body></html>").is_none());
    }

    #[test]
    fn empty_input_is_not_a_media_type() {
        assert!(InferSniffer.detect(b"").is_none());
    }
}
