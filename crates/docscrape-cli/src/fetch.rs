//! `fetch` command: pipeline run plus the requested exports.
//!
//! Every precondition (proxy key, spreadsheet credentials, image template)
//! is checked before the first request so a long run never fails at the
//! export step for a configuration reason.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use docscrape_core::{AppConfig, FetchMode, Field, Pzn, SheetsSettings};
use docscrape_export::{build_image_zip, write_csv, SheetsClient, Table};
use docscrape_scraper::{
    fetch_images, run_pipeline, CourtesyDelay, DirectFetcher, ExtractOptions, Fetcher,
    RecordExtractor,
};

#[derive(Debug)]
pub(crate) struct FetchOptions {
    pub(crate) output: PathBuf,
    pub(crate) images: Option<PathBuf>,
    pub(crate) sheet: bool,
    pub(crate) proxy: bool,
}

pub(crate) async fn run_fetch(
    config: &AppConfig,
    pzns: &[Pzn],
    options: &FetchOptions,
) -> anyhow::Result<()> {
    let mode = if options.proxy {
        FetchMode::Proxy
    } else {
        config.fetch_mode
    };
    let fetcher = Fetcher::from_config(config, mode)?;
    let sheets = if options.sheet {
        Some(sheets_settings(config)?)
    } else {
        None
    };
    let image_template = match &options.images {
        Some(_) => Some(image_template(config)?),
        None => None,
    };

    let delay = CourtesyDelay::from_config(config);
    let extractor = RecordExtractor::new(
        fetcher,
        config.product_url_template.clone(),
        ExtractOptions::from_config(config),
    );
    tracing::info!(count = pzns.len(), %mode, "starting run");
    let records = run_pipeline(&extractor, pzns, &delay).await;

    let table = Table::from_records(&records);
    let file = File::create(&options.output)
        .with_context(|| format!("creating {}", options.output.display()))?;
    write_csv(BufWriter::new(file), &table)?;

    let degraded = records
        .iter()
        .filter(|r| !r.contains(Field::Brand))
        .count();
    println!(
        "wrote {} records to {} ({degraded} without product details)",
        records.len(),
        options.output.display()
    );

    if let (Some(path), Some(template)) = (&options.images, image_template) {
        let direct = DirectFetcher::new(config.request_timeout_secs, &config.user_agent)?;
        let images = fetch_images(&direct, template, pzns, &delay).await;
        let bundle = build_image_zip(images.iter().map(|i| (i.file_name(), i.bytes.as_slice())))?;
        std::fs::write(path, bundle).with_context(|| format!("writing {}", path.display()))?;
        println!("wrote {} images to {}", images.len(), path.display());
    }

    if let Some(settings) = sheets {
        let client = SheetsClient::with_base_url(
            &settings.access_token,
            &settings.spreadsheet_id,
            config.request_timeout_secs,
            &settings.base_url,
        )?;
        client.overwrite(&settings.worksheet, &table).await?;
        println!("uploaded {} rows to worksheet {}", table.rows().len(), settings.worksheet);
    }

    Ok(())
}

fn sheets_settings(config: &AppConfig) -> anyhow::Result<&SheetsSettings> {
    match &config.sheets {
        Some(settings) => Ok(settings),
        None => anyhow::bail!(
            "--sheet needs DOCSCRAPE_SHEETS_ACCESS_TOKEN and DOCSCRAPE_SHEETS_SPREADSHEET_ID"
        ),
    }
}

fn image_template(config: &AppConfig) -> anyhow::Result<&str> {
    match config.image_url_template.as_deref() {
        Some(template) => Ok(template),
        None => anyhow::bail!("--images needs DOCSCRAPE_IMAGE_URL_TEMPLATE"),
    }
}
