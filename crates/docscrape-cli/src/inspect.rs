//! `inspect` command: offline extraction against a saved page.

use std::path::Path;

use anyhow::Context;
use docscrape_core::{AppConfig, Pzn, Record};
use docscrape_scraper::{parse_product_page, ExtractOptions};

pub(crate) fn run_inspect(
    config: &AppConfig,
    raw_pzn: &str,
    html_path: &Path,
) -> anyhow::Result<()> {
    let record = inspect_page(config, raw_pzn, html_path)?;
    print!("{}", render_record(&record));
    Ok(())
}

fn inspect_page(config: &AppConfig, raw_pzn: &str, html_path: &Path) -> anyhow::Result<Record> {
    let Some(pzn) = Pzn::from_token(raw_pzn) else {
        anyhow::bail!("{raw_pzn:?} is not a product number");
    };
    let html = std::fs::read_to_string(html_path)
        .with_context(|| format!("reading {}", html_path.display()))?;
    let link = pzn.fill_template(&config.product_url_template);
    Ok(parse_product_page(
        &pzn,
        &link,
        &html,
        ExtractOptions::from_config(config),
    ))
}

/// One `Header: value` line per field; multi-line values are indented.
pub(crate) fn render_record(record: &Record) -> String {
    record
        .iter()
        .map(|(field, value)| format!("{}: {}\n", field.header(), value.replace('\n', "\n    ")))
        .collect()
}
