use std::io::Cursor;
use std::path::Path;

use serde_json::json;
use wbscrape_core::AppConfig;
use wbscrape_export::ExportError;
use wbscrape_scraper::ScraperError;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::session::{read_request, run_session, InputError, ScrapeRequest};

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["wbscrape"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_session_command() {
    let cli = Cli::try_parse_from(["wbscrape", "session"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Session)));
}

#[test]
fn scrape_defaults_match_interactive_defaults() {
    let cli = Cli::try_parse_from(["wbscrape", "scrape", "--url", "/catalog/obuv"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Scrape {
            ref url,
            min_price: 1,
            max_price: 1_000_000,
            discount: 0
        }) if url == "/catalog/obuv"
    ));
}

#[test]
fn scrape_accepts_filters() {
    let cli = Cli::try_parse_from([
        "wbscrape",
        "scrape",
        "--url",
        "https://www.wildberries.ru/catalog/obuv",
        "--min-price",
        "500",
        "--max-price",
        "3000",
        "--discount",
        "25",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Scrape {
            min_price: 500,
            max_price: 3000,
            discount: 25,
            ..
        })
    ));
}

#[test]
fn scrape_requires_url() {
    assert!(Cli::try_parse_from(["wbscrape", "scrape"]).is_err());
}

#[test]
fn scrape_rejects_negative_price() {
    assert!(Cli::try_parse_from(["wbscrape", "scrape", "--url", "/x", "--min-price", "-1"]).is_err());
}

#[test]
fn parses_categories_filter() {
    let cli = Cli::try_parse_from(["wbscrape", "categories", "--contains", "obuv"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Categories { contains: Some(ref c) }) if c == "obuv"
    ));
}

// ---------------------------------------------------------------------------
// Session prompts
// ---------------------------------------------------------------------------

#[test]
fn read_request_parses_all_fields() {
    let mut input = Cursor::new("https://www.wildberries.ru/catalog/obuv\n100\n2000\n10\n");
    let mut out = Vec::new();
    let request = read_request(&mut input, &mut out).unwrap().unwrap();
    assert_eq!(
        request,
        ScrapeRequest {
            url: "https://www.wildberries.ru/catalog/obuv".to_owned(),
            filter: PriceFilter::new(100, 2000, 10).unwrap(),
        }
    );
    let prompts = String::from_utf8(out).unwrap();
    assert!(prompts.contains("minimum price"), "{prompts}");
}

#[test]
fn read_request_exit_token_ends_session() {
    let mut input = Cursor::new("q\n");
    let mut out = Vec::new();
    assert!(read_request(&mut input, &mut out).unwrap().is_none());
}

#[test]
fn read_request_end_of_input_ends_session() {
    let mut input = Cursor::new("/catalog/obuv\n100\n");
    let mut out = Vec::new();
    assert!(read_request(&mut input, &mut out).unwrap().is_none());
}

#[test]
fn read_request_rejects_non_numeric_price() {
    let mut input = Cursor::new("/catalog/obuv\ncheap\n");
    let mut out = Vec::new();
    let err = read_request(&mut input, &mut out).unwrap_err();
    assert!(
        matches!(err, InputError::NotANumber { field: "min price", ref value } if value == "cheap"),
        "expected NotANumber, got: {err:?}"
    );
}

#[test]
fn read_request_rejects_inverted_range() {
    let mut input = Cursor::new("/catalog/obuv\n500\n100\n0\n");
    let mut out = Vec::new();
    let err = read_request(&mut input, &mut out).unwrap_err();
    assert!(matches!(err, InputError::InvalidFilter(_)));
}

// ---------------------------------------------------------------------------
// Failure messages
// ---------------------------------------------------------------------------

#[test]
fn structural_failure_mentions_filtered_link() {
    let err = anyhow::Error::from(ScraperError::CategoryNotFound {
        url: "/nowhere".to_owned(),
    });
    let message = scrape::failure_message(&err);
    assert!(message.contains("no filters"), "{message}");
}

#[test]
fn busy_file_failure_asks_to_close_it() {
    let err = anyhow::Error::from(ExportError::FileBusy {
        path: "Shoes_from_1_to_10.xlsx".into(),
    });
    let message = scrape::failure_message(&err);
    assert!(message.contains("Close the previously opened file"), "{message}");
}

#[test]
fn other_failures_show_the_error_chain() {
    let err = anyhow::Error::from(ScraperError::UnexpectedStatus {
        status: 503,
        url: "https://example.com/menu.json".to_owned(),
    });
    let message = scrape::failure_message(&err);
    assert!(message.starts_with("Error: unexpected HTTP status 503"), "{message}");
}

// ---------------------------------------------------------------------------
// End-to-end against a mock storefront
// ---------------------------------------------------------------------------

fn test_config(server: &MockServer, output_dir: &Path) -> AppConfig {
    AppConfig {
        catalog_url: format!("{}/menu.json", server.uri()),
        listing_base_url: format!("{}/catalog", server.uri()),
        site_origin: "https://example.com".to_owned(),
        dest: -1_257_786,
        user_agent: "wbscrape-test/0.1".to_owned(),
        request_timeout_secs: 5,
        max_pages: 50,
        max_retries: Some(2),
        retry_backoff_base_ms: 0,
        output_dir: output_dir.to_path_buf(),
        log_level: "info".to_owned(),
    }
}

async fn mount_storefront(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/menu.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Root",
            "url": "/root",
            "childs": [{"name": "Shoes", "url": "/shoes", "shard": "s1", "query": "q=1"}]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/catalog/s1/catalog"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"products": [
            {"id": 1, "name": "A", "priceU": 10_000, "salePriceU": 9_000},
            {"id": 2, "name": "B", "priceU": 20_000, "salePriceU": 18_000},
            {"id": 3, "name": "C", "priceU": 30_000, "salePriceU": 27_000}
        ]}})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/catalog/s1/catalog"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"products": []}})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn scrape_resolves_collects_and_exports() {
    let server = MockServer::start().await;
    mount_storefront(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let scraper = Scraper::from_config(&test_config(&server, dir.path())).unwrap();

    let filter = PriceFilter::new(1, 1000, 0).unwrap();
    let mut out = Vec::new();
    let summary = scraper
        .run("https://example.com/shoes", &filter, &mut out)
        .await
        .unwrap();

    assert_eq!(summary.category, "Shoes");
    assert_eq!(summary.collected, 3);
    assert_eq!(summary.export_path, dir.path().join("Shoes_from_1_to_1000.xlsx"));
    assert!(summary.export_path.exists());

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("Match found: Shoes"), "{printed}");
    assert!(printed.contains("Page 1: added 3 products"), "{printed}");
    assert!(!printed.contains("Page 2"), "{printed}");
    assert!(printed.contains("Collected: 3 products"), "{printed}");
    assert!(
        printed.contains("https://example.com/shoes?priceU=100;100000&discount=0"),
        "{printed}"
    );
}

#[tokio::test]
async fn scrape_of_unknown_category_is_structural() {
    let server = MockServer::start().await;
    mount_storefront(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let scraper = Scraper::from_config(&test_config(&server, dir.path())).unwrap();

    let mut out = Vec::new();
    let err = scraper
        .run("https://example.com/hats", &PriceFilter::default(), &mut out)
        .await
        .unwrap_err();

    let scraper_err = err.downcast_ref::<ScraperError>().unwrap();
    assert!(matches!(scraper_err, ScraperError::CategoryNotFound { .. }));
}

#[tokio::test]
async fn session_survives_failures_and_exits_on_token() {
    let server = MockServer::start().await;
    mount_storefront(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let scraper = Scraper::from_config(&test_config(&server, dir.path())).unwrap();

    let input = Cursor::new(
        "https://example.com/hats\n1\n100\n0\n\
         https://example.com/shoes\nabc\n\
         https://example.com/shoes\n1\n100\n0\n\
         q\n",
    );
    let mut out = Vec::new();
    run_session(&scraper, input, &mut out).await.unwrap();

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("Make sure the link has no filters"), "{printed}");
    assert!(printed.contains("Input error"), "{printed}");
    assert!(printed.contains("Collected: 3 products"), "{printed}");
    assert!(dir.path().join("Shoes_from_1_to_100.xlsx").exists());
}

#[tokio::test]
async fn categories_are_listed_with_filter() {
    let server = MockServer::start().await;
    mount_storefront(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let scraper = Scraper::from_config(&test_config(&server, dir.path())).unwrap();

    let mut out = Vec::new();
    let shown = scraper.print_categories(Some("SHO"), &mut out).await.unwrap();

    assert_eq!(shown, 1);
    assert_eq!(String::from_utf8(out).unwrap(), "Shoes\t/shoes\ts1\n");
}
