//! Manufacturer name and postal address resolution.
//!
//! The address is taken from the first tier that yields one:
//!
//! 1. JSON-LD `Product` → `manufacturer` → `address`
//! 2. address-like key/value pairs in inline script state
//! 3. the regulatory boilerplate in the visible text
//!    ("Pharmazeutischer Unternehmer: …")
//!
//! Markup on the product page is inconsistent across products, so every
//! tier is best-effort and silently yields to the next one.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Selector;
use serde_json::Value;

use super::page::{first_object, json_text, Page};
use super::text::{collapse_whitespace, element_text, Join};

/// Plausible length of a boilerplate address span, in characters.
const BOILERPLATE_MIN_CHARS: usize = 5;
const BOILERPLATE_MAX_CHARS: usize = 150;

static MANUFACTURER_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("#Hersteller-content strong, #Hersteller-content h3")
        .expect("valid manufacturer selector")
});

static SCRIPT_STREET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\\?"(?:streetAddress|street_address|street|strasse|straße)\\?"\s*:\s*\\?"([^"\\]*)"#,
    )
    .expect("valid street regex")
});
static SCRIPT_POSTAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\\?"(?:postalCode|postal_code|zipCode|zip_code|zip|postcode|plz)\\?"\s*:\s*\\?"?(\d{4,5})"#,
    )
    .expect("valid postal code regex")
});
static SCRIPT_LOCALITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\\?"(?:addressLocality|locality|city|ort)\\?"\s*:\s*\\?"([^"\\]+)"#)
        .expect("valid locality regex")
});

static BOILERPLATE_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:pharmazeutischer\s+unternehmer|zulassungsinhaber|hersteller)\b\s*:?")
        .expect("valid boilerplate label regex")
});
static BOILERPLATE_END_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\btelefon|\btel\.|\bfax\b|\be-?mail\b|\bstand\s+der\s+information|\bzu\s+risiken\s+und\s+nebenwirkungen|\bwww\.|https?://",
    )
    .expect("valid boilerplate end regex")
});

/// Which tier produced an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AddressSource {
    StructuredData,
    ScriptState,
    Boilerplate,
}

/// Resolves the manufacturer's postal address, or `None` when no tier
/// finds one.
pub(crate) fn resolve_address(page: &Page) -> Option<(String, AddressSource)> {
    if let Some(address) = from_structured_data(page) {
        return Some((address, AddressSource::StructuredData));
    }
    if let Some(address) = from_script_state(page) {
        return Some((address, AddressSource::ScriptState));
    }
    from_boilerplate(&page.text).map(|a| (a, AddressSource::Boilerplate))
}

/// Manufacturer name from its labelled heading, else from the JSON-LD
/// `Product` → `manufacturer` node.
pub(crate) fn manufacturer_name(page: &Page) -> Option<String> {
    page.document
        .select(&MANUFACTURER_SELECTOR)
        .map(|el| element_text(el, Join::Space))
        .find(|s| !s.is_empty())
        .or_else(|| {
            page.products.iter().find_map(|product| match product.get("manufacturer")? {
                name @ Value::String(_) => json_text(name),
                other => first_object(other)?.get("name").and_then(json_text),
            })
        })
}

/// `"{street}, {postal_code} {locality}"`, leaving out missing parts and
/// their separators.
pub(crate) fn compose_address(street: &str, postal_code: &str, locality: &str) -> String {
    let city = [postal_code.trim(), locality.trim()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    [street.trim(), city.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
        .trim_matches(|c: char| c == ',' || c.is_whitespace())
        .to_string()
}

fn from_structured_data(page: &Page) -> Option<String> {
    page.products.iter().find_map(|product| {
        let manufacturer = first_object(product.get("manufacturer")?)?;
        let address = first_object(manufacturer.get("address")?)?;
        address_from_object(address)
    })
}

fn address_from_object(address: &Value) -> Option<String> {
    let field = |key: &str| address.get(key).and_then(json_text).unwrap_or_default();
    let postal_code = field("postalCode");
    let locality = field("addressLocality");
    if postal_code.is_empty() && locality.is_empty() {
        return None;
    }
    Some(compose_address(
        &field("streetAddress"),
        &postal_code,
        &locality,
    ))
}

fn from_script_state(page: &Page) -> Option<String> {
    page.inline_scripts().iter().find_map(|script| {
        let capture = |re: &Regex| {
            re.captures(script)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let postal_code = capture(&*SCRIPT_POSTAL_RE)?;
        let locality = capture(&*SCRIPT_LOCALITY_RE)?;
        let street = capture(&*SCRIPT_STREET_RE).unwrap_or_default();
        Some(compose_address(&street, &postal_code, &locality))
    })
}

/// Tries the text after each label on its own. A span runs to the first
/// contact marker; one that reaches the next label first has no marker of
/// its own and is skipped.
fn from_boilerplate(text: &str) -> Option<String> {
    let labels: Vec<_> = BOILERPLATE_LABEL_RE.find_iter(text).collect();
    labels.iter().enumerate().find_map(|(i, label)| {
        let window_end = labels.get(i + 1).map_or(text.len(), |next| next.start());
        let window = &text[label.end()..window_end];
        let marker = BOILERPLATE_END_RE.find(window)?;
        let candidate = collapse_whitespace(&window[..marker.start()])
            .trim_matches(|c: char| matches!(c, ',' | ';' | ':' | '-') || c.is_whitespace())
            .to_string();
        let len = candidate.chars().count();
        if (BOILERPLATE_MIN_CHARS..=BOILERPLATE_MAX_CHARS).contains(&len) {
            Some(candidate)
        } else {
            tracing::debug!(len, "rejecting implausible boilerplate address span");
            None
        }
    })
}

#[cfg(test)]
#[path = "address_test.rs"]
mod tests;
