//! A parsed product page plus the derived views the rules query.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde_json::Value;

use super::text::visible_text;

static JSON_LD_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("valid json-ld selector")
});
static SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script").expect("valid script selector"));

pub(crate) struct Page {
    pub(crate) document: Html,
    /// Visible text, one text node per line.
    pub(crate) text: String,
    /// Every JSON-LD node typed `Product`, in document order.
    pub(crate) products: Vec<Value>,
}

impl Page {
    pub(crate) fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);
        let text = visible_text(&document);
        let products = json_ld_blocks(&document)
            .iter()
            .flat_map(flatten_json_ld)
            .filter(is_product_node)
            .collect();
        Self {
            document,
            text,
            products,
        }
    }

    /// Raw contents of inline scripts that are not JSON-LD.
    pub(crate) fn inline_scripts(&self) -> Vec<String> {
        self.document
            .select(&SCRIPT_SELECTOR)
            .filter(|el| {
                !el.value()
                    .attr("type")
                    .is_some_and(|t| t.eq_ignore_ascii_case("application/ld+json"))
            })
            .map(|el| el.text().collect::<String>())
            .filter(|s| !s.trim().is_empty())
            .collect()
    }
}

/// Parses every JSON-LD block; malformed blocks are skipped.
fn json_ld_blocks(document: &Html) -> Vec<Value> {
    document
        .select(&JSON_LD_SELECTOR)
        .filter_map(|el| {
            let raw = el.text().collect::<String>();
            match serde_json::from_str::<Value>(raw.trim()) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping malformed JSON-LD block");
                    None
                }
            }
        })
        .collect()
}

/// Expands top-level arrays and `@graph` containers into individual nodes.
fn flatten_json_ld(value: &Value) -> Vec<Value> {
    let mut out = Vec::new();
    match value {
        Value::Array(items) => {
            for item in items {
                out.extend(flatten_json_ld(item));
            }
        }
        Value::Object(map) => {
            if let Some(graph) = map.get("@graph") {
                out.extend(flatten_json_ld(graph));
            }
            out.push(value.clone());
        }
        _ => {}
    }
    out
}

/// `@type` may be a string or an array of strings.
fn is_product_node(node: &Value) -> bool {
    match node.get("@type") {
        Some(Value::String(s)) => s.eq_ignore_ascii_case("Product"),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|s| s.eq_ignore_ascii_case("Product")),
        _ => false,
    }
}

/// A string-ish JSON value: strings are trimmed, numbers rendered.
pub(crate) fn json_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// The first object in `value` when it is an array, otherwise `value`.
pub(crate) fn first_object(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.iter().find(|v| v.is_object()),
        Value::Object(_) => Some(value),
        _ => None,
    }
}
