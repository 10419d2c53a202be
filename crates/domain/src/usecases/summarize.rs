//! Summary assembly: dedup resolved lines and join into the change log

use std::collections::HashSet;

/// Deduplicate lines preserving first-occurrence order and join with
/// newlines. Empty output is a valid outcome (changed hash, nothing new
/// to report).
pub fn assemble(lines: &[String]) -> String {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(lines.len());

    for line in lines {
        if seen.insert(line.as_str()) {
            kept.push(line.as_str());
        }
    }

    kept.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn dedup_preserves_first_occurrence_order() {
        let input = lines(&["b", "a", "b", "c", "a"]);
        assert_eq!(assemble(&input), "b\na\nc");
    }

    #[test]
    fn no_duplicates_in_output() {
        let input = lines(&["x", "x", "x"]);
        assert_eq!(assemble(&input), "x");
    }

    #[test]
    fn empty_input_yields_empty_summary() {
        assert_eq!(assemble(&[]), "");
    }

    #[test]
    fn single_line_passes_through() {
        let input = lines(&["Page B ---- http://x/b"]);
        assert_eq!(assemble(&input), "Page B ---- http://x/b");
    }
}
