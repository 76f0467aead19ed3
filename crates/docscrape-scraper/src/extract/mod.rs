//! Per-product extraction: one fetch, then the field rules.

mod address;
mod page;
mod rules;
mod text;

use docscrape_core::{AppConfig, Field, Pzn, Record, Sentinel, StatusMarker};

use crate::fetch::PageFetcher;

use self::address::{manufacturer_name, resolve_address};
use self::page::Page;
use self::rules::{apply_strategy, FieldRule, IMAGE_RULE, PRODUCT_RULES};
use self::text::truncate_chars;

/// Knobs that change the shape of successful records.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    pub sentinel: Sentinel,
    /// Adds the [`Field::ImageUrl`] column to successful records.
    pub include_image_url: bool,
}

impl ExtractOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            sentinel: config.missing_sentinel,
            include_image_url: config.include_image_url,
        }
    }
}

/// Why a product page did not yield a full record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractFailure {
    /// HTTP 404: the product number does not resolve to a product.
    NotFound,
    /// HTTP 403: upstream bot mitigation or proxy quota.
    Blocked,
    /// Any other non-200 status.
    Status(u16),
    /// DNS, connection, TLS or timeout failure.
    Transport(String),
}

impl ExtractFailure {
    #[must_use]
    pub fn marker(&self) -> StatusMarker {
        match self {
            ExtractFailure::NotFound => StatusMarker::NotFound,
            ExtractFailure::Blocked => StatusMarker::Blocked,
            ExtractFailure::Status(code) => StatusMarker::HttpStatus(*code),
            ExtractFailure::Transport(_) => StatusMarker::Error,
        }
    }

    /// The degraded record for this failure: product number, marker and
    /// link, plus the message for transport failures.
    #[must_use]
    pub fn into_record(self, pzn: &Pzn, link: &str) -> Record {
        let marker = self.marker();
        match self {
            ExtractFailure::Transport(message) => Record::builder(pzn, link)
                .field(Field::Name, marker.to_string())
                .field(Field::Error, message)
                .build(),
            _ => Record::degraded(pzn, marker, link),
        }
    }
}

/// Builds one [`Record`] per product number from a single page fetch.
pub struct RecordExtractor<F> {
    fetcher: F,
    url_template: String,
    options: ExtractOptions,
}

impl<F: PageFetcher> RecordExtractor<F> {
    /// `url_template` is the product page URL with a `{pzn}` placeholder.
    pub fn new(fetcher: F, url_template: impl Into<String>, options: ExtractOptions) -> Self {
        Self {
            fetcher,
            url_template: url_template.into(),
            options,
        }
    }

    /// Canonical product page URL for `pzn`.
    #[must_use]
    pub fn link_for(&self, pzn: &Pzn) -> String {
        pzn.fill_template(&self.url_template)
    }

    /// Fetches and extracts one product, never failing: every failure is
    /// folded into a degraded record.
    pub async fn extract(&self, pzn: &Pzn) -> Record {
        let link = self.link_for(pzn);
        match self.try_extract(pzn).await {
            Ok(record) => record,
            Err(failure) => {
                tracing::warn!(pzn = %pzn, marker = %failure.marker(), "degraded record");
                failure.into_record(pzn, &link)
            }
        }
    }

    /// Fetches the product page once and runs the field rules on a 200.
    ///
    /// # Errors
    ///
    /// Returns the [`ExtractFailure`] matching the HTTP outcome; no retries
    /// are attempted.
    pub async fn try_extract(&self, pzn: &Pzn) -> Result<Record, ExtractFailure> {
        let link = self.link_for(pzn);
        let page = self
            .fetcher
            .fetch(&link)
            .await
            .map_err(|e| ExtractFailure::Transport(e.to_string()))?;

        match page.status {
            200 => {
                let html = String::from_utf8_lossy(&page.body);
                Ok(parse_product_page(pzn, &link, &html, self.options))
            }
            404 => Err(ExtractFailure::NotFound),
            403 => Err(ExtractFailure::Blocked),
            other => Err(ExtractFailure::Status(other)),
        }
    }
}

/// Runs every field rule and the manufacturer resolver against a product
/// page that was fetched successfully.
#[must_use]
pub fn parse_product_page(pzn: &Pzn, link: &str, html: &str, options: ExtractOptions) -> Record {
    let page = Page::parse(html);
    let sentinel = options.sentinel;
    let mut builder = Record::builder(pzn, link);

    let mut brand = None;
    for rule in PRODUCT_RULES {
        let value = run_rule(&page, rule, sentinel);
        if rule.field == Field::Brand {
            brand.clone_from(&value);
        }
        builder = builder.field(
            rule.field,
            value.unwrap_or_else(|| sentinel.as_str().to_string()),
        );
    }

    let manufacturer = manufacturer_name(&page)
        .or(brand)
        .unwrap_or_else(|| sentinel.as_str().to_string());
    builder = builder.field(Field::Manufacturer, manufacturer);

    let address = match resolve_address(&page) {
        Some((address, source)) => {
            tracing::debug!(pzn = %pzn, ?source, "manufacturer address resolved");
            address
        }
        None => sentinel.as_str().to_string(),
    };
    builder = builder.field(Field::ManufacturerAddress, address);

    if options.include_image_url {
        let image = run_rule(&page, &IMAGE_RULE, sentinel)
            .unwrap_or_else(|| sentinel.as_str().to_string());
        builder = builder.field(Field::ImageUrl, image);
    }

    builder.build()
}

/// First non-empty, non-sentinel strategy result, cleaned and truncated.
fn run_rule(page: &Page, rule: &FieldRule, sentinel: Sentinel) -> Option<String> {
    rule.strategies.iter().find_map(|strategy| {
        let raw = apply_strategy(page, *strategy, rule.join)?;
        let cleaned = match rule.cleanup {
            Some(cleanup) => cleanup(&raw),
            None => raw,
        };
        let value = match rule.max_chars {
            Some(max) => truncate_chars(&cleaned, max),
            None => cleaned,
        };
        // Pages sometimes print the placeholder themselves.
        let placeholder =
            sentinel.is_sentinel(&value) || Sentinel::NotAvailable.is_sentinel(&value);
        (!value.is_empty() && !placeholder).then_some(value)
    })
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
