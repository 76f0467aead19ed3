mod fetch;
mod input;
mod inspect;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "docscrape")]
#[command(about = "Product detail export for German pharmacy product numbers (PZN)")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the product numbers come from; stdin when neither is given.
#[derive(Debug, Args)]
struct InputArgs {
    /// File with product numbers separated by commas or newlines
    #[arg(long, conflicts_with = "pzns")]
    input: Option<PathBuf>,
    /// Product numbers inline, e.g. "40554, 3161577"
    #[arg(long)]
    pzns: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the canonical product numbers, one per line
    Normalize {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Fetch every product page and export the results
    Fetch {
        #[command(flatten)]
        input: InputArgs,
        /// CSV output path
        #[arg(long, default_value = "doc_export.csv")]
        output: PathBuf,
        /// Also download product images into this ZIP file
        #[arg(long)]
        images: Option<PathBuf>,
        /// Overwrite the configured spreadsheet with the results
        #[arg(long)]
        sheet: bool,
        /// Route requests through the scraping proxy
        #[arg(long)]
        proxy: bool,
    },
    /// Run extraction against a saved product page
    Inspect {
        /// Product number the page belongs to
        #[arg(long)]
        pzn: String,
        /// Saved HTML file
        #[arg(long)]
        html: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = docscrape_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(env = %config.env, mode = %config.fetch_mode, "configuration loaded");

    match cli.command {
        Commands::Normalize { input: source } => {
            let pzns = input::load_pzns(&source)?;
            for pzn in &pzns {
                println!("{pzn}");
            }
        }
        Commands::Fetch {
            input: source,
            output,
            images,
            sheet,
            proxy,
        } => {
            let pzns = input::load_pzns(&source)?;
            let options = fetch::FetchOptions {
                output,
                images,
                sheet,
                proxy,
            };
            fetch::run_fetch(&config, &pzns, &options).await?;
        }
        Commands::Inspect { pzn, html } => inspect::run_inspect(&config, &pzn, &html)?,
    }

    Ok(())
}
