//! Integration tests for the harvester
//!
//! These tests use wiremock to serve a small DBLP-shaped hierarchy and run
//! the full fetch → snapshot → extract cycle against a temporary directory.

use dblp_harvest::config::{parse_config, Config};
use dblp_harvest::crawler::{crawl_venues, CrawlRequest, FetchError, Fetcher, HttpFetcher};
use dblp_harvest::search::{search_venue, KeywordQuery};
use dblp_harvest::storage::FsStore;
use dblp_harvest::{resolve_venue, PageRecords};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, root: &Path) -> Config {
    parse_config(&format!(
        r#"
[fetcher]
user-agent = "dblp-harvest-test/1.0"
timeout-secs = 5
politeness-delay-ms = 100

[fetcher.headers]
Accept-Language = "en"

[storage]
root-dir = '{root}'

[venues]
TEST = "{base}/db/conf/test/index.html"
TJ = "{base}/db/journals/tj/index.html"
"#,
        root = root.display(),
        base = base_url
    ))
    .expect("Failed to build test config")
}

fn request(venues: &[&str]) -> CrawlRequest {
    CrawlRequest {
        venues: venues.iter().map(|v| v.to_string()).collect(),
        ..Default::default()
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body.to_string())
        .insert_header("content-type", "text/html")
}

fn conf_index(pages: &[&str]) -> String {
    let entries: String = pages
        .iter()
        .map(|p| {
            format!(
                r#"<li class="entry"><nav class="publ"><a class="toc-link" href="{}.html">[contents]</a></nav></li>"#,
                p
            )
        })
        .collect();
    format!(
        r#"<html><body><div id="main"><header class="h2"><h2>Test Conference</h2></header><ul class="publ-list">{}</ul></div></body></html>"#,
        entries
    )
}

fn edition(track: &str, title: &str, author: &str, pid: &str) -> String {
    format!(
        r#"<html><body><div id="main">
        <header class="h2"><h2>{track}</h2></header>
        <ul class="publ-list">
          <li class="entry inproceedings"><cite class="data">
            <span itemprop="author"><a itemprop="url" href="https://dblp.org/pid/{pid}.html"><span itemprop="name">{author}</span></a></span>:
            <span class="title" itemprop="name">{title}</span>
          </cite></li>
        </ul>
        </div></body></html>"#
    )
}

/// Mounts a conference with editions test2023 (404), test2024 and test2025
async fn mount_conference(server: &MockServer, edition_hits: u64) {
    Mock::given(method("GET"))
        .and(path("/db/conf/test/index.html"))
        .respond_with(html(&conf_index(&["test2023", "test2024", "test2025"])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/db/conf/test/test2023.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/db/conf/test/test2024.html"))
        .respond_with(html(&edition("Main Track", "Paper X", "Jane Doe", "1/23")))
        .expect(edition_hits)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/db/conf/test/test2025.html"))
        .respond_with(html(&edition(
            "Demo Track",
            "Graph Demos",
            "John Roe",
            "45/678",
        )))
        .expect(edition_hits)
        .mount(server)
        .await;
}

fn read_ledger(path: &Path) -> BTreeMap<String, bool> {
    let content = std::fs::read_to_string(path).expect("Failed to read ledger");
    toml::from_str(&content).expect("Failed to decode ledger")
}

fn read_records(path: &Path) -> PageRecords {
    let content = std::fs::read_to_string(path).expect("Failed to read records");
    serde_json::from_str(&content).expect("Failed to decode records")
}

#[tokio::test]
async fn test_full_crawl_single_venue() {
    let mock_server = MockServer::start().await;
    mount_conference(&mock_server, 1).await;

    let root = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), root.path());

    let reports = crawl_venues(&config, &request(&["test"]))
        .await
        .expect("Harvest failed");

    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert!(report.index_fetched);
    assert_eq!(report.pages_total, 3);
    assert_eq!(report.fetched, 2);
    assert_eq!(report.parsed, 2);
    assert_eq!(report.fetch_failures, 1);

    let venue_dir = root.path().join("conf-test");
    let base = mock_server.uri();

    let fetched = read_ledger(&venue_dir.join(".meta.download.toml"));
    assert_eq!(fetched.len(), 2);
    assert_eq!(
        fetched.get(&format!("{}/db/conf/test/test2024.html", base)),
        Some(&true)
    );
    assert!(!fetched.contains_key(&format!("{}/db/conf/test/test2023.html", base)));

    let parsed = read_ledger(&venue_dir.join(".meta.parse.toml"));
    assert_eq!(parsed.len(), 2);

    assert!(venue_dir.join("test2024.html").exists());
    assert!(!venue_dir.join("test2023.html").exists());

    let records = read_records(&venue_dir.join("test2024.json"));
    let papers = records.track("Main Track").expect("Missing track");
    assert_eq!(papers.len(), 1);
    assert_eq!(papers[0].title, "Paper X");
    assert_eq!(papers[0].authors[0].name, "Jane Doe");
    assert_eq!(papers[0].authors[0].pid.as_deref(), Some("1-23"));

    let records = read_records(&venue_dir.join("test2025.json"));
    assert_eq!(
        records.track("Demo Track").unwrap()[0].authors[0].pid.as_deref(),
        Some("45-678")
    );
}

#[tokio::test]
async fn test_second_run_resumes_without_refetching() {
    let mock_server = MockServer::start().await;
    // Each successful edition is fetched exactly once across both runs
    mount_conference(&mock_server, 1).await;

    let root = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), root.path());

    crawl_venues(&config, &request(&["TEST"])).await.unwrap();
    let reports = crawl_venues(&config, &request(&["TEST"])).await.unwrap();

    let report = &reports[0];
    assert_eq!(report.fetched, 0);
    assert_eq!(report.fetch_skipped, 2);
    assert_eq!(report.parse_skipped, 2);
    // The missing edition is retried and still fails
    assert_eq!(report.fetch_failures, 1);
}

#[tokio::test]
async fn test_force_refresh_refetches() {
    let mock_server = MockServer::start().await;
    mount_conference(&mock_server, 2).await;

    let root = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), root.path());

    crawl_venues(&config, &request(&["TEST"])).await.unwrap();

    let mut refresh = request(&["TEST"]);
    refresh.force_refresh = true;
    let reports = crawl_venues(&config, &refresh).await.unwrap();

    assert_eq!(reports[0].fetched, 2);
    assert_eq!(reports[0].parsed, 2);
}

#[tokio::test]
async fn test_journal_volumes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/db/journals/tj/index.html"))
        .respond_with(html(
            r#"<html><body><div id="main">
            <p>Test Journal</p>
            <ul>
              <li><a href="tj1.html">Volume 1: 2024</a></li>
              <li><a href="tj2.html">Volume 2: 2025</a></li>
            </ul>
            </div></body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    for (volume, title) in [("tj1", "Volume One Paper"), ("tj2", "Volume Two Paper")] {
        Mock::given(method("GET"))
            .and(path(format!("/db/journals/tj/{}.html", volume)))
            .respond_with(html(&edition("Issue 1", title, "Jane Doe", "1/23")))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let root = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), root.path());

    let reports = crawl_venues(&config, &request(&["TJ"])).await.unwrap();
    assert_eq!(reports[0].pages_total, 2);
    assert_eq!(reports[0].parsed, 2);

    let records = read_records(&root.path().join("journals-tj").join("tj2.json"));
    assert_eq!(records.track("Issue 1").unwrap()[0].title, "Volume Two Paper");
}

#[tokio::test]
async fn test_unreachable_index_writes_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/db/conf/test/index.html"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let root = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), root.path());

    let reports = crawl_venues(&config, &request(&["TEST", "MISSING"]))
        .await
        .unwrap();

    assert_eq!(reports.len(), 1);
    assert!(!reports[0].index_fetched);
    assert!(!root.path().join("conf-test").exists());
}

#[tokio::test]
async fn test_search_after_crawl() {
    let mock_server = MockServer::start().await;
    mount_conference(&mock_server, 1).await;

    let root = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), root.path());
    crawl_venues(&config, &request(&["TEST"])).await.unwrap();

    let store = Arc::new(FsStore::new(root.path()));
    let venue = resolve_venue(config.venue_locator("test").unwrap()).unwrap();

    let hits = search_venue(store.clone(), &venue, &KeywordQuery::parse("graph")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].page_name, "test2025");
    assert_eq!(hits[0].track, "Demo Track");

    let hits = search_venue(store, &venue, &KeywordQuery::parse("paper|demos")).unwrap();
    assert_eq!(hits.len(), 2);
}

#[tokio::test]
async fn test_http_fetcher_sends_configured_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/db/conf/test/index.html"))
        .and(header("user-agent", "dblp-harvest-test/1.0"))
        .and(header("accept-language", "en"))
        .respond_with(html("<html>ok</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let root = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), root.path());
    let fetcher = HttpFetcher::new(&config.fetcher).unwrap();

    let body = fetcher
        .fetch(&format!("{}/db/conf/test/index.html", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(body, "<html>ok</html>");
}

#[tokio::test]
async fn test_http_fetcher_reports_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let root = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), root.path());
    let fetcher = HttpFetcher::new(&config.fetcher).unwrap();

    let url = format!("{}/db/conf/test/test2024.html", mock_server.uri());
    let result = fetcher.fetch(&url).await;
    assert_eq!(result, Err(FetchError::Status { url, status: 500 }));
}
