//! Integration tests for the scraper
//!
//! These tests use wiremock to stand in for the mod site and run whole
//! scrapes end-to-end into a CSV file in a temporary directory.

use base64::engine::general_purpose;
use base64::Engine;
use mcmod_harvest::config::{Config, FetcherConfig};
use mcmod_harvest::crawler::{run_scrape, Coordinator, FetchResult, Fetcher};
use mcmod_harvest::state::{RangePlan, ScrapeRange};
use mcmod_harvest::storage::{CsvStore, RecordStore};
use mcmod_harvest::{HarvestError, RangeRequest};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HEADER: &str = "mcmod_id,curseforge_slug,modrinth_slug,name,subname,abbr";

/// Creates a test configuration pointing at the mock server, with no waiting
fn create_test_config(base_url: &str, csv_path: &Path) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.fetcher.max_retries = 3;
    config.fetcher.backoff_base_ms = 0;
    config.fetcher.jitter_ms = 0;
    config.scraper.delay_min_ms = 0;
    config.scraper.delay_max_ms = 0;
    config.output.csv_path = csv_path.display().to_string();
    config
}

fn encoded_link(url: &str) -> String {
    format!(
        r#"<a href="//link.mcmod.cn/target/{}">link</a>"#,
        general_purpose::STANDARD.encode(url)
    )
}

fn detail_page(name: &str, subname: &str, links: &[&str]) -> String {
    let links: String = links.iter().map(|url| encoded_link(url)).collect();
    format!(
        r#"<html><body>
        <div class="class-title"><h3>{}</h3><h4>{}</h4></div>
        <div class="common-link-frame"><ul><li>{}</li></ul></div>
        </body></html>"#,
        name, subname, links
    )
}

fn listing_page(latest_id: u32) -> String {
    format!(
        r#"<html><body><div class="modlist-block">
        <a href="/class/{}.html">newest</a>
        <a href="/class/{}.html">older</a>
        </div></body></html>"#,
        latest_id,
        latest_id.saturating_sub(1)
    )
}

async fn mount_detail(server: &MockServer, id: u32, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/class/{}.html", id)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_listing(server: &MockServer, latest_id: u32) {
    Mock::given(method("GET"))
        .and(path("/modlist.html"))
        .and(query_param("sort", "createtime"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(latest_id)))
        .mount(server)
        .await;
}

/// Reads the store back as lines, with the byte-order mark checked and removed
fn read_rows(csv_path: &Path) -> Vec<String> {
    let content = std::fs::read_to_string(csv_path).expect("Failed to read CSV");
    let content = content
        .strip_prefix('\u{feff}')
        .expect("CSV should start with a byte-order mark");
    content.lines().map(str::to_string).collect()
}

fn write_existing_store(csv_path: &Path, last_id: u32) {
    let mut content = format!("\u{feff}{}\r\n", HEADER);
    for id in 1..=last_id {
        content.push_str(&format!("{},,,Mod {},,\r\n", id, id));
    }
    std::fs::write(csv_path, content).expect("Failed to seed CSV");
}

#[tokio::test]
async fn test_explicit_range_with_failing_id() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("mod_data.csv");

    mount_detail(
        &mock_server,
        1,
        detail_page(
            "JEI物品管理器",
            "Just Enough Items",
            &[
                "https://www.curseforge.com/minecraft/mc-mods/jei",
                "https://modrinth.com/mod/jei?tab=versions",
            ],
        ),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/class/2.html"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    mount_detail(&mock_server, 3, detail_page("钠", "Sodium", &[])).await;

    let config = create_test_config(&mock_server.uri(), &csv_path);
    let stats = run_scrape(
        config,
        RangeRequest::Explicit {
            start: 1,
            end: 3,
            append: false,
        },
    )
    .await
    .expect("Scrape should succeed");

    assert_eq!(stats.requested, 3);
    assert_eq!(stats.succeeded, 2);
    assert_eq!(stats.failed, 1);

    assert_eq!(
        read_rows(&csv_path),
        vec![
            HEADER.to_string(),
            "1,jei,jei,JEI物品管理器,Just Enough Items,".to_string(),
            "2,,,Mod2(failed),,".to_string(),
            "3,,,钠,Sodium,".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_fetch_recovers_after_transient_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/class/4.html"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/class/4.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new(&FetcherConfig {
        max_retries: 3,
        backoff_base_ms: 0,
        jitter_ms: 0,
    })
    .unwrap();

    let url = format!("{}/class/4.html", mock_server.uri());
    match fetcher.fetch(&url, "mod 4").await {
        FetchResult::Success { body } => assert_eq!(body, "ok"),
        FetchResult::Failed { attempts, error } => {
            panic!("expected success, failed after {} attempts: {}", attempts, error)
        }
    }
}

#[tokio::test]
async fn test_transient_errors_do_not_produce_placeholder() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("mod_data.csv");

    Mock::given(method("GET"))
        .and(path("/class/1.html"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;
    mount_detail(&mock_server, 1, detail_page("钠", "Sodium", &[])).await;

    let config = create_test_config(&mock_server.uri(), &csv_path);
    let stats = run_scrape(
        config,
        RangeRequest::Explicit {
            start: 1,
            end: 1,
            append: false,
        },
    )
    .await
    .unwrap();

    assert_eq!(stats.succeeded, 1);
    assert_eq!(stats.failed, 0);
    assert_eq!(
        read_rows(&csv_path),
        vec![HEADER.to_string(), "1,,,钠,Sodium,".to_string()]
    );
}

#[tokio::test]
async fn test_page_without_title_is_marked_failed() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("mod_data.csv");

    mount_detail(
        &mock_server,
        7,
        format!(
            r#"<html><body><div class="common-link-frame">{}</div></body></html>"#,
            encoded_link("https://modrinth.com/mod/lithium")
        ),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), &csv_path);
    let stats = run_scrape(
        config,
        RangeRequest::Explicit {
            start: 7,
            end: 7,
            append: true,
        },
    )
    .await
    .unwrap();

    assert_eq!(stats.succeeded, 1);
    assert_eq!(stats.failed, 0);
    assert_eq!(
        read_rows(&csv_path),
        vec![HEADER.to_string(), "7,,lithium,Mod7(failed),,".to_string()]
    );
}

#[tokio::test]
async fn test_auto_range_resumes_after_last_row() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("mod_data.csv");
    write_existing_store(&csv_path, 3);

    mount_listing(&mock_server, 5).await;
    mount_detail(&mock_server, 4, detail_page("四", "Four", &[])).await;
    mount_detail(&mock_server, 5, detail_page("五", "Five", &[])).await;

    let config = create_test_config(&mock_server.uri(), &csv_path);
    let stats = run_scrape(config, RangeRequest::Auto).await.unwrap();
    assert_eq!(stats.requested, 2);
    assert_eq!(stats.succeeded, 2);

    let rows = read_rows(&csv_path);
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[3], "3,,,Mod 3,,");
    assert_eq!(rows[4], "4,,,四,Four,");
    assert_eq!(rows[5], "5,,,五,Five,");

    let store = CsvStore::new(&csv_path);
    assert_eq!(store.last_recorded_id().unwrap(), 5);
}

#[tokio::test]
async fn test_auto_range_up_to_date_makes_no_detail_requests() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("mod_data.csv");
    write_existing_store(&csv_path, 5);
    let before = std::fs::read(&csv_path).unwrap();

    mount_listing(&mock_server, 5).await;
    Mock::given(method("GET"))
        .and(path("/class/6.html"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), &csv_path);
    let stats = run_scrape(config, RangeRequest::Auto).await.unwrap();

    assert_eq!(stats.processed(), 0);
    assert_eq!(std::fs::read(&csv_path).unwrap(), before);
}

#[tokio::test]
async fn test_auto_range_on_empty_store_starts_at_one() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("db").join("mod_data.csv");

    mount_listing(&mock_server, 2).await;
    mount_detail(&mock_server, 1, detail_page("一", "One", &[])).await;
    mount_detail(&mock_server, 2, detail_page("二", "Two", &[])).await;

    let config = create_test_config(&mock_server.uri(), &csv_path);
    let store = CsvStore::new(&csv_path);
    let coordinator = Coordinator::new(config, store).unwrap();

    let plan = coordinator.plan(RangeRequest::Auto).await.unwrap();
    assert_eq!(
        plan,
        RangePlan::Scrape(ScrapeRange {
            start: 1,
            end: 2,
            append: true,
        })
    );
}

#[tokio::test]
async fn test_auto_range_is_capped() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("mod_data.csv");
    write_existing_store(&csv_path, 50);

    mount_listing(&mock_server, 400).await;

    let mut config = create_test_config(&mock_server.uri(), &csv_path);
    config.scraper.auto_range_cap = 300;
    let coordinator = Coordinator::new(config, CsvStore::new(&csv_path)).unwrap();

    let plan = coordinator.plan(RangeRequest::Auto).await.unwrap();
    assert_eq!(
        plan,
        RangePlan::Scrape(ScrapeRange {
            start: 51,
            end: 350,
            append: true,
        })
    );
}

#[tokio::test]
async fn test_auto_range_fails_without_listing_block() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("mod_data.csv");

    Mock::given(method("GET"))
        .and(path("/modlist.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>maintenance</body></html>"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), &csv_path);
    let result = run_scrape(config, RangeRequest::Auto).await;

    assert!(matches!(result, Err(HarvestError::FrontierUnknown(_))));
    assert!(!csv_path.exists());
}

#[tokio::test]
async fn test_start_one_truncates_and_later_start_appends() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("mod_data.csv");
    write_existing_store(&csv_path, 3);

    mount_detail(&mock_server, 1, detail_page("一", "One", &[])).await;
    mount_detail(&mock_server, 9, detail_page("九", "Nine", &[])).await;

    let config = create_test_config(&mock_server.uri(), &csv_path);
    run_scrape(
        config.clone(),
        RangeRequest::Explicit {
            start: 1,
            end: 1,
            append: false,
        },
    )
    .await
    .unwrap();
    assert_eq!(
        read_rows(&csv_path),
        vec![HEADER.to_string(), "1,,,一,One,".to_string()]
    );

    run_scrape(
        config,
        RangeRequest::Explicit {
            start: 9,
            end: 9,
            append: false,
        },
    )
    .await
    .unwrap();
    assert_eq!(
        read_rows(&csv_path),
        vec![
            HEADER.to_string(),
            "1,,,一,One,".to_string(),
            "9,,,九,Nine,".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_invalid_explicit_range_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("mod_data.csv");
    let config = create_test_config("http://127.0.0.1:1", &csv_path);

    let result = run_scrape(
        config,
        RangeRequest::Explicit {
            start: 0,
            end: 5,
            append: false,
        },
    )
    .await;

    assert!(matches!(result, Err(HarvestError::InvalidStart { start: 0 })));
    assert!(!csv_path.exists());
}
