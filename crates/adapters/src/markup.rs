//! scraper-based markup parser

use pagewatch_domain::{Anchor, MarkupParser, PageTitles};
use scraper::{Html, Selector};

/// Markup parser over `scraper`'s HTML tree.
///
/// Selectors are compiled per call; documents are parsed and queried
/// entirely inside each method so the non-`Send` tree never crosses an
/// await point.
pub struct ScraperParser;

impl ScraperParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ScraperParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupParser for ScraperParser {
    fn anchors(&self, html: &str) -> Vec<Anchor> {
        let document = Html::parse_document(html);
        let selector = Selector::parse("a[href]").expect("valid selector");

        document
            .select(&selector)
            .map(|element| Anchor {
                href: element.value().attr("href").unwrap_or_default().to_string(),
                text_parts: element.text().map(String::from).collect(),
            })
            .collect()
    }

    fn titles(&self, html: &str) -> PageTitles {
        let document = Html::parse_document(html);
        let title_selector = Selector::parse("title").expect("valid selector");
        let og_selector =
            Selector::parse(r#"meta[property="og:title"]"#).expect("valid selector");

        let title = document
            .select(&title_selector)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty());

        let og_title = document
            .select(&og_selector)
            .next()
            .and_then(|element| element.value().attr("content"))
            .map(|content| content.trim().to_string())
            .filter(|t| !t.is_empty());

        PageTitles { og_title, title }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_in_document_order_with_nested_text() {
        let html = r#"
            <html><body>
                <a href="/b"><span>B</span> item</a>
                <a href="http://other.example/a">A</a>
                <a name="no-href">skipped</a>
            </body></html>
        "#;

        let anchors = ScraperParser.anchors(html);

        assert_eq!(anchors.len(), 2);
        assert_eq!(anchors[0].href, "/b");
        assert!(anchors[0].text_parts.iter().any(|t| t.contains('B')));
        assert_eq!(anchors[1].href, "http://other.example/a");
    }

    #[test]
    fn titles_extracts_both_candidates() {
        let html = r#"
            <html><head>
                <title>Site | Home</title>
                <meta property="og:title" content="Big Announcement">
            </head></html>
        "#;

        let titles = ScraperParser.titles(html);

        assert_eq!(titles.og_title.as_deref(), Some("Big Announcement"));
        assert_eq!(titles.title.as_deref(), Some("Site | Home"));
    }

    #[test]
    fn missing_titles_yield_none() {
        let titles = ScraperParser.titles("<html><body>no head</body></html>");
        assert!(titles.og_title.is_none());
        assert!(titles.title.is_none());
    }

    #[test]
    fn empty_title_element_yields_none() {
        let titles = ScraperParser.titles("<html><head><title>  </title></head></html>");
        assert!(titles.title.is_none());
    }
}
