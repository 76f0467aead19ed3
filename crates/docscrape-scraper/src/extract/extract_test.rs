use super::*;
use crate::error::ScraperError;
use crate::fetch::FetchedPage;

const TEMPLATE: &str = "https://www.docmorris.de/{pzn}";
const LINK: &str = "https://www.docmorris.de/00040554";

const PRODUCT_PAGE: &str = r#"<!DOCTYPE html>
<html lang="de"><head>
<title>Aspirin 500 mg Tabletten - Jetzt bestellen | DocMorris</title>
<meta property="og:image" content="https://cdn.example/aspirin.jpg">
<script type="application/ld+json">{
    "@context": "https://schema.org",
    "@type": "Product",
    "name": "Aspirin JSON",
    "brand": {"@type": "Brand", "name": "Bayer"},
    "offers": {"@type": "Offer", "price": "5.49", "priceCurrency": "EUR"},
    "manufacturer": {
        "@type": "Organization",
        "name": "Bayer Vital GmbH",
        "address": {
            "streetAddress": "Kaiser-Wilhelm-Allee 70",
            "postalCode": "51373",
            "addressLocality": "Leverkusen"
        }
    }
}</script>
</head><body>
<h1>Aspirin 500 mg Tabletten - Jetzt bestellen</h1>
<a class="underline text-neutral-700" href="/marken/bayer">Bayer</a>
<div class="mr-2">5,49 €</div>
<div id="Wirkstoffe-content"><p>Acetylsalicylsäure 500 mg</p></div>
<div id="Dosierung-content"><ul><li>Erwachsene: 1-2 Tabletten</li><li>max. 6 Tabletten täglich</li></ul></div>
<div id="Nebenwirkungen-content"><p>Magenbeschwerden</p></div>
<div id="Hersteller-content"><strong>Bayer Vital GmbH</strong></div>
</body></html>"#;

fn pzn() -> Pzn {
    Pzn::parse("00040554").unwrap()
}

fn parse(html: &str) -> Record {
    parse_product_page(&pzn(), LINK, html, ExtractOptions::default())
}

struct StubFetcher {
    status: u16,
    body: &'static str,
    transport_error: bool,
}

impl StubFetcher {
    fn respond(status: u16, body: &'static str) -> Self {
        Self {
            status,
            body,
            transport_error: false,
        }
    }

    fn unreachable() -> Self {
        Self {
            status: 0,
            body: "",
            transport_error: true,
        }
    }
}

impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, ScraperError> {
        if self.transport_error {
            return Err(ScraperError::InvalidUrl {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        Ok(FetchedPage {
            status: self.status,
            body: self.body.as_bytes().to_vec(),
        })
    }
}

fn extractor(fetcher: StubFetcher) -> RecordExtractor<StubFetcher> {
    RecordExtractor::new(fetcher, TEMPLATE, ExtractOptions::default())
}

// -----------------------------------------------------------------------
// parse_product_page
// -----------------------------------------------------------------------

#[test]
fn full_page_fills_every_field() {
    let record = parse(PRODUCT_PAGE);
    assert_eq!(record.pzn(), Some("00040554"));
    assert_eq!(record.name(), Some("Aspirin 500 mg Tabletten"));
    assert_eq!(record.get(Field::Brand), Some("Bayer"));
    assert_eq!(record.get(Field::Price), Some("5,49 €"));
    assert_eq!(
        record.get(Field::ActiveIngredients),
        Some("Acetylsalicylsäure 500 mg")
    );
    assert_eq!(
        record.get(Field::Dosage),
        Some("Erwachsene: 1-2 Tabletten\nmax. 6 Tabletten täglich")
    );
    assert_eq!(record.get(Field::SideEffects), Some("Magenbeschwerden"));
    assert_eq!(record.get(Field::Manufacturer), Some("Bayer Vital GmbH"));
    assert_eq!(
        record.get(Field::ManufacturerAddress),
        Some("Kaiser-Wilhelm-Allee 70, 51373 Leverkusen")
    );
    assert_eq!(record.get(Field::Link), Some(LINK));
}

#[test]
fn missing_sections_hold_the_sentinel() {
    let record = parse(PRODUCT_PAGE);
    assert_eq!(record.get(Field::Indications), Some("n.a."));
    assert_eq!(record.get(Field::Warnings), Some("n.a."));
    assert_eq!(record.get(Field::Description), Some("n.a."));
    assert!(!record.contains(Field::Error));
}

#[test]
fn image_url_only_when_requested() {
    assert!(!parse(PRODUCT_PAGE).contains(Field::ImageUrl));

    let options = ExtractOptions {
        include_image_url: true,
        ..ExtractOptions::default()
    };
    let record = parse_product_page(&pzn(), LINK, PRODUCT_PAGE, options);
    assert_eq!(
        record.get(Field::ImageUrl),
        Some("https://cdn.example/aspirin.jpg")
    );
}

#[test]
fn empty_sentinel_policy() {
    let options = ExtractOptions {
        sentinel: Sentinel::Empty,
        include_image_url: false,
    };
    let record = parse_product_page(&pzn(), LINK, "<html><body></body></html>", options);
    assert_eq!(record.name(), Some(""));
    assert_eq!(record.get(Field::Brand), Some(""));
    assert_eq!(record.get(Field::ManufacturerAddress), Some(""));
}

#[test]
fn structured_data_backs_up_missing_markup() {
    let html = r#"<html><head><script type="application/ld+json">{
        "@type": "Product",
        "name": "Ibuprofen 400",
        "brand": "ratiopharm",
        "description": "Bei Schmerzen und Fieber.",
        "offers": [{"price": 3.2, "priceCurrency": "EUR"}]
    }</script></head><body><h1>  </h1></body></html>"#;
    let record = parse(html);
    assert_eq!(record.name(), Some("Ibuprofen 400"));
    assert_eq!(record.get(Field::Brand), Some("ratiopharm"));
    assert_eq!(record.get(Field::Price), Some("3,20 €"));
    assert_eq!(
        record.get(Field::Description),
        Some("Bei Schmerzen und Fieber.")
    );
}

#[test]
fn manufacturer_falls_back_to_brand_then_sentinel() {
    let with_brand = parse(r#"<body><a class="underline text-neutral-700">Hexal</a></body>"#);
    assert_eq!(with_brand.get(Field::Manufacturer), Some("Hexal"));

    let without = parse("<body><h1>Nur ein Titel</h1></body>");
    assert_eq!(without.get(Field::Manufacturer), Some("n.a."));
}

#[test]
fn printed_placeholder_counts_as_a_miss() {
    let html = r#"<html><head><script type="application/ld+json">
        {"@type":"Product","brand":{"name":"Stada"}}</script></head>
        <body><a class="underline text-neutral-700">n.a.</a></body></html>"#;
    assert_eq!(parse(html).get(Field::Brand), Some("Stada"));
}

#[test]
fn price_from_page_text_as_last_resort() {
    let record = parse("<body><p>Jetzt nur 12,95 € statt 15,00 €</p></body>");
    assert_eq!(record.get(Field::Price), Some("12,95 €"));
}

#[test]
fn active_ingredients_alternate_container() {
    let record = parse(r#"<body><div class="p-0 rounded-lg">Paracetamol 500 mg</div></body>"#);
    assert_eq!(
        record.get(Field::ActiveIngredients),
        Some("Paracetamol 500 mg")
    );
}

#[test]
fn long_sections_are_truncated_by_characters() {
    let body = format!(r#"<body><div id="Wirkstoffe-content">{}</div></body>"#, "ä".repeat(600));
    let record = parse(&body);
    let value = record.get(Field::ActiveIngredients).unwrap();
    assert_eq!(value.chars().count(), rules::SECTION_MAX_CHARS);
}

// -----------------------------------------------------------------------
// RecordExtractor
// -----------------------------------------------------------------------

#[test]
fn link_substitutes_the_product_number() {
    let extractor = extractor(StubFetcher::respond(200, ""));
    assert_eq!(extractor.link_for(&pzn()), LINK);
}

#[tokio::test]
async fn ok_status_parses_the_page() {
    let extractor = extractor(StubFetcher::respond(200, PRODUCT_PAGE));
    let record = extractor.try_extract(&pzn()).await.unwrap();
    assert_eq!(record.get(Field::Brand), Some("Bayer"));
}

#[tokio::test]
async fn statuses_map_to_failures() {
    let cases = [
        (404, ExtractFailure::NotFound),
        (403, ExtractFailure::Blocked),
        (503, ExtractFailure::Status(503)),
        (301, ExtractFailure::Status(301)),
    ];
    for (status, expected) in cases {
        let extractor = extractor(StubFetcher::respond(status, "<html></html>"));
        assert_eq!(extractor.try_extract(&pzn()).await, Err(expected));
    }
}

#[tokio::test]
async fn not_found_record_has_no_details() {
    let extractor = extractor(StubFetcher::respond(404, ""));
    let record = extractor.extract(&pzn()).await;
    assert_eq!(record.name(), Some("❌ Not found"));
    assert_eq!(record.get(Field::Link), Some(LINK));
    assert!(!record.contains(Field::Brand));
    assert!(!record.contains(Field::Price));
    assert!(!record.contains(Field::Error));
}

#[tokio::test]
async fn blocked_and_other_statuses_use_their_markers() {
    let blocked = extractor(StubFetcher::respond(403, "")).extract(&pzn()).await;
    assert_eq!(blocked.name(), Some("⛔ Blocked (WAF active)"));

    let unavailable = extractor(StubFetcher::respond(503, "")).extract(&pzn()).await;
    assert_eq!(unavailable.name(), Some("Error 503"));
}

#[tokio::test]
async fn transport_failure_keeps_the_message() {
    let record = extractor(StubFetcher::unreachable()).extract(&pzn()).await;
    assert_eq!(record.name(), Some("Error"));
    let message = record.get(Field::Error).unwrap();
    assert!(message.contains("connection refused"), "{message}");
    assert!(!record.contains(Field::Brand));
}
