//! html2text renderer for rendered-text mode

use pagewatch_domain::TextRenderer;

/// Plain-text renderer at a fixed column width.
pub struct Html2textRenderer {
    width: usize,
}

impl Html2textRenderer {
    pub fn new(width: usize) -> Self {
        Self { width }
    }
}

impl Default for Html2textRenderer {
    fn default() -> Self {
        Self::new(80)
    }
}

impl TextRenderer for Html2textRenderer {
    fn render(&self, html: &str) -> String {
        match html2text::from_read(html.as_bytes(), self.width) {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(%error, "Text rendering failed, diffing raw markup");
                html.to_string()
            }
        }
    }
}
