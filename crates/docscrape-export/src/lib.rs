pub mod delimited;
pub mod error;
pub mod sheets;
pub mod table;
pub mod zip_bundle;

pub use delimited::{read_csv, to_csv_bytes, write_csv, CSV_DELIMITER, UTF8_BOM};
pub use error::ExportError;
pub use sheets::SheetsClient;
pub use table::Table;
pub use zip_bundle::build_image_zip;
