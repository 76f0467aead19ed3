//! Product image download for the ZIP bundle.

use docscrape_core::Pzn;

use crate::fetch::PageFetcher;
use crate::pipeline::CourtesyDelay;

/// Downloaded image bytes for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductImage {
    pub pzn: Pzn,
    pub bytes: Vec<u8>,
}

impl ProductImage {
    /// Entry name inside the bundle.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.jpg", self.pzn)
    }
}

/// Deterministic image URL for `pzn`.
#[must_use]
pub fn image_url(template: &str, pzn: &Pzn) -> String {
    pzn.fill_template(template)
}

/// Fetches the image of each product once; failures are logged and skipped.
pub async fn fetch_images<F: PageFetcher>(
    fetcher: &F,
    template: &str,
    pzns: &[Pzn],
    delay: &CourtesyDelay,
) -> Vec<ProductImage> {
    let mut images = Vec::new();

    for pzn in pzns {
        let url = image_url(template, pzn);
        match fetcher.fetch(&url).await {
            Ok(page) if page.is_ok() && !page.body.is_empty() => {
                tracing::debug!(pzn = %pzn, bytes = page.body.len(), "image fetched");
                images.push(ProductImage {
                    pzn: pzn.clone(),
                    bytes: page.body,
                });
            }
            Ok(page) => {
                tracing::warn!(pzn = %pzn, status = page.status, "skipping image");
            }
            Err(e) => {
                tracing::warn!(pzn = %pzn, error = %e, "image fetch failed");
            }
        }
        delay.wait().await;
    }

    images
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_url_substitutes_every_placeholder() {
        let pzn = Pzn::parse("00040554").unwrap();
        assert_eq!(
            image_url("https://cdn.example/{pzn}/{pzn}.jpg", &pzn),
            "https://cdn.example/00040554/00040554.jpg"
        );
    }

    #[test]
    fn file_name_uses_product_number() {
        let image = ProductImage {
            pzn: Pzn::parse("03161577").unwrap(),
            bytes: vec![0xFF, 0xD8],
        };
        assert_eq!(image.file_name(), "03161577.jpg");
    }
}
