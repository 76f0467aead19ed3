//! Reading and normalizing the product number list.

use std::io::Read;

use anyhow::Context;
use docscrape_core::{normalize_pzns, Pzn};

use crate::InputArgs;

/// Reads the raw input from `--input`, `--pzns` or stdin and normalizes it.
///
/// # Errors
///
/// Fails if the input cannot be read or holds no product number at all.
pub(crate) fn load_pzns(args: &InputArgs) -> anyhow::Result<Vec<Pzn>> {
    let raw = match (&args.input, &args.pzns) {
        (Some(path), _) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        (None, Some(inline)) => inline.clone(),
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading product numbers from stdin")?;
            buf
        }
    };
    parse_pzns(&raw)
}

/// Normalizes `raw`, refusing input that yields nothing to fetch.
pub(crate) fn parse_pzns(raw: &str) -> anyhow::Result<Vec<Pzn>> {
    let pzns = normalize_pzns(raw);
    if pzns.is_empty() {
        anyhow::bail!("no product numbers found in input");
    }
    tracing::debug!(count = pzns.len(), "input normalized");
    Ok(pzns)
}
