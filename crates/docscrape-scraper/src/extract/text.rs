//! Text helpers shared by the field rules and the address resolver.

use scraper::{ElementRef, Html};

/// Cut-off marker for the marketing tail of product titles
/// (`"Aspirin 500mg - Jetzt bestellen"`).
const TITLE_SUFFIX_MARKER: &str = " - Jetzt";

/// Elements whose text is never shown to a visitor.
const INVISIBLE_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// How multi-node text is joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Join {
    /// Titles and labels: keeps sentences on one line.
    Space,
    /// Long-form sections: keeps list items apart.
    Newline,
}

impl Join {
    fn separator(self) -> &'static str {
        match self {
            Join::Space => " ",
            Join::Newline => "\n",
        }
    }
}

/// Text of `element`: every text node trimmed, empty nodes dropped, the
/// rest joined with `join`.
pub(crate) fn element_text(element: ElementRef<'_>, join: Join) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(join.separator())
}

/// All visible text of the document, one text node per line.
pub(crate) fn visible_text(document: &Html) -> String {
    document
        .root_element()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|a| {
                a.value()
                    .as_element()
                    .is_some_and(|e| INVISIBLE_ELEMENTS.contains(&e.name()))
            });
            if hidden {
                return None;
            }
            let trimmed = text.trim();
            (!trimmed.is_empty()).then_some(trimmed)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Drops the `" - Jetzt …"` marketing tail from a product title.
pub(crate) fn strip_title_suffix(name: &str) -> String {
    match name.split_once(TITLE_SUFFIX_MARKER) {
        Some((head, _)) => head.trim().to_string(),
        None => name.to_string(),
    }
}

/// Truncates to at most `max_chars` characters (not bytes).
pub(crate) fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Collapses every whitespace run into a single space.
pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
