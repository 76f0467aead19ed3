pub mod error;
pub mod extract;
pub mod fetch;
pub mod image;
pub mod pipeline;

pub use error::ScraperError;
pub use extract::{parse_product_page, ExtractFailure, ExtractOptions, RecordExtractor};
pub use fetch::{DirectFetcher, FetchedPage, Fetcher, PageFetcher, ProxyFetcher};
pub use image::{fetch_images, image_url, ProductImage};
pub use pipeline::{run_pipeline, CourtesyDelay};
