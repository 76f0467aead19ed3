//! In-memory ZIP bundle of product images.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ExportError;

/// Packs `(entry name, bytes)` pairs into a ZIP archive held in memory.
///
/// Entries keep the input order. A repeated name is written once; later
/// duplicates are skipped with a warning.
///
/// # Errors
///
/// Returns [`ExportError::Zip`] or [`ExportError::Io`] if an entry cannot
/// be written.
pub fn build_image_zip<'a, I>(entries: I) -> Result<Vec<u8>, ExportError>
where
    I: IntoIterator<Item = (String, &'a [u8])>,
{
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut written = HashSet::new();

    for (name, bytes) in entries {
        if !written.insert(name.clone()) {
            tracing::warn!(name = %name, "duplicate image entry skipped");
            continue;
        }
        zip.start_file(name, options)?;
        zip.write_all(bytes)?;
    }

    let cursor = zip.finish()?;
    tracing::debug!(entries = written.len(), "image bundle built");
    Ok(cursor.into_inner())
}
