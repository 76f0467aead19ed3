//! Declarative field rules for the product detail page.
//!
//! Each rule lists strategies in priority order. The first strategy that
//! yields a non-empty, non-sentinel value wins; a rule with no hit stores
//! the sentinel. Section bodies on the product page carry ids of the form
//! `#<Heading>-content`.

use docscrape_core::Field;
use regex::Regex;
use scraper::Selector;
use serde_json::Value;

use super::page::{first_object, json_text, Page};
use super::text::{collapse_whitespace, element_text, strip_title_suffix, Join};

/// Longest stored value for ingredient and dosage sections.
pub(crate) const SECTION_MAX_CHARS: usize = 500;
/// Longest stored product description.
pub(crate) const DESCRIPTION_MAX_CHARS: usize = 1000;

/// A property of the page's JSON-LD `Product` node.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ProductProperty {
    Name,
    Brand,
    Price,
    Description,
    Image,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Strategy {
    /// Text of the first element matching the selector.
    Css(&'static str),
    /// Attribute of the first element matching the selector.
    Attr(&'static str, &'static str),
    /// Capture group 1 of a regex run over the visible page text.
    PageText(&'static str),
    /// A property of the first JSON-LD `Product` node that has it.
    Product(ProductProperty),
}

pub(crate) struct FieldRule {
    pub(crate) field: Field,
    pub(crate) strategies: &'static [Strategy],
    pub(crate) join: Join,
    pub(crate) max_chars: Option<usize>,
    pub(crate) cleanup: Option<fn(&str) -> String>,
}

const fn section(field: Field, strategies: &'static [Strategy]) -> FieldRule {
    FieldRule {
        field,
        strategies,
        join: Join::Newline,
        max_chars: None,
        cleanup: None,
    }
}

pub(crate) static PRODUCT_RULES: &[FieldRule] = &[
    FieldRule {
        field: Field::Name,
        strategies: &[
            Strategy::Css("h1"),
            Strategy::Product(ProductProperty::Name),
            Strategy::Attr(r#"meta[property="og:title"]"#, "content"),
        ],
        join: Join::Space,
        max_chars: None,
        cleanup: Some(strip_title_suffix),
    },
    FieldRule {
        field: Field::Brand,
        strategies: &[
            Strategy::Css("a.underline.text-neutral-700"),
            Strategy::Product(ProductProperty::Brand),
        ],
        join: Join::Space,
        max_chars: None,
        cleanup: None,
    },
    FieldRule {
        field: Field::Price,
        strategies: &[
            Strategy::Css("div.mr-2"),
            Strategy::Product(ProductProperty::Price),
            Strategy::PageText(r"(\d{1,5},\d{2}\s?€)"),
        ],
        join: Join::Space,
        max_chars: None,
        cleanup: Some(collapse_whitespace),
    },
    FieldRule {
        field: Field::ActiveIngredients,
        strategies: &[
            Strategy::Css("#Wirkstoffe-content"),
            Strategy::Css("div.p-0.rounded-lg"),
        ],
        join: Join::Newline,
        max_chars: Some(SECTION_MAX_CHARS),
        cleanup: None,
    },
    FieldRule {
        field: Field::Dosage,
        strategies: &[Strategy::Css("#Dosierung-content")],
        join: Join::Newline,
        max_chars: Some(SECTION_MAX_CHARS),
        cleanup: None,
    },
    section(
        Field::Indications,
        &[Strategy::Css("#Anwendungsgebiete-content")],
    ),
    section(
        Field::Usage,
        &[
            Strategy::Css("#Anwendung-content"),
            Strategy::Css("#Art-der-Anwendung-content"),
        ],
    ),
    section(
        Field::PatientNotes,
        &[Strategy::Css("#Patientenhinweise-content")],
    ),
    section(
        Field::SideEffects,
        &[Strategy::Css("#Nebenwirkungen-content")],
    ),
    section(
        Field::Contraindications,
        &[Strategy::Css("#Gegenanzeigen-content")],
    ),
    section(
        Field::Interactions,
        &[Strategy::Css("#Wechselwirkungen-content")],
    ),
    section(
        Field::Warnings,
        &[Strategy::Css("#Warnhinweise-content")],
    ),
    section(
        Field::Excipients,
        &[Strategy::Css("#Hilfsstoffe-content")],
    ),
    section(
        Field::Breastfeeding,
        &[
            Strategy::Css("#Schwangerschaft-und-Stillzeit-content"),
            Strategy::Css("#Stillzeit-content"),
        ],
    ),
    FieldRule {
        field: Field::Description,
        strategies: &[
            Strategy::Css("#Produktbeschreibung-content"),
            Strategy::Css("#Beschreibung-content"),
            Strategy::Product(ProductProperty::Description),
            Strategy::Attr(r#"meta[name="description"]"#, "content"),
        ],
        join: Join::Newline,
        max_chars: Some(DESCRIPTION_MAX_CHARS),
        cleanup: None,
    },
];

pub(crate) static IMAGE_RULE: FieldRule = FieldRule {
    field: Field::ImageUrl,
    strategies: &[
        Strategy::Product(ProductProperty::Image),
        Strategy::Attr(r#"meta[property="og:image"]"#, "content"),
    ],
    join: Join::Space,
    max_chars: None,
    cleanup: None,
};

/// Runs one strategy against the page. `None` means "no usable value".
pub(crate) fn apply_strategy(page: &Page, strategy: Strategy, join: Join) -> Option<String> {
    match strategy {
        Strategy::Css(css) => {
            let selector = parse_selector(css)?;
            page.document
                .select(&selector)
                .next()
                .map(|el| element_text(el, join))
        }
        Strategy::Attr(css, attr) => {
            let selector = parse_selector(css)?;
            page.document
                .select(&selector)
                .find_map(|el| el.value().attr(attr))
                .map(|v| v.trim().to_string())
        }
        Strategy::PageText(pattern) => {
            let re = match Regex::new(pattern) {
                Ok(re) => re,
                Err(e) => {
                    tracing::warn!(pattern, error = %e, "invalid page-text pattern");
                    return None;
                }
            };
            re.captures(&page.text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
        }
        Strategy::Product(property) => page
            .products
            .iter()
            .find_map(|node| product_property(node, property)),
    }
}

fn parse_selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::warn!(selector = css, error = %e, "invalid CSS selector in field rule");
            None
        }
    }
}

fn product_property(node: &Value, property: ProductProperty) -> Option<String> {
    match property {
        ProductProperty::Name => node.get("name").and_then(json_text),
        ProductProperty::Description => node.get("description").and_then(json_text),
        ProductProperty::Brand => match node.get("brand")? {
            brand @ Value::String(_) => json_text(brand),
            other => first_object(other)?.get("name").and_then(json_text),
        },
        ProductProperty::Image => match node.get("image")? {
            Value::Array(items) => items.iter().find_map(image_url_of),
            other => image_url_of(other),
        },
        ProductProperty::Price => {
            let offer = first_object(node.get("offers")?)?;
            let price = offer
                .get("price")
                .or_else(|| offer.get("lowPrice"))
                .and_then(json_text)?;
            let currency = offer.get("priceCurrency").and_then(json_text);
            Some(format_price(&price, currency.as_deref()))
        }
    }
}

/// `image` entries are either URLs or `ImageObject`s.
fn image_url_of(value: &Value) -> Option<String> {
    match value {
        Value::String(_) => json_text(value),
        Value::Object(_) => value
            .get("url")
            .or_else(|| value.get("contentUrl"))
            .and_then(json_text),
        _ => None,
    }
}

/// Renders a structured-data price the way the page shows it (`4,99 €`).
fn format_price(price: &str, currency: Option<&str>) -> String {
    match currency {
        Some(c) if c.eq_ignore_ascii_case("EUR") => {
            let amount = price.parse::<f64>().map_or_else(
                |_| price.replace('.', ","),
                |v| format!("{v:.2}").replace('.', ","),
            );
            format!("{amount} €")
        }
        Some(c) => format!("{price} {c}"),
        None => price.to_string(),
    }
}
