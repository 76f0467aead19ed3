use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Network or TLS failure talking to the spreadsheet service.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The spreadsheet service answered with a non-2xx status.
    #[error("spreadsheet API returned {status}: {body}")]
    SheetsApi { status: u16, body: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error(transparent)]
    Core(#[from] docscrape_core::CoreError),
}
