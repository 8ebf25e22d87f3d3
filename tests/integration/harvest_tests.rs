//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for the legislature website and run
//! full harvests into temporary data directories.

use bill_harvest::config::{
    Config, ExtractionConfig, FoundationsConfig, ListingConfig, OutputConfig, ScraperConfig,
    SiteConfig, UserAgentConfig,
};
use bill_harvest::extract::Extraction;
use bill_harvest::harvest::HarvestController;
use bill_harvest::storage::{BillStore, DedupStore, StorageError, StorageResult, TextExport};
use bill_harvest::{BillRecord, BillSummary, TextSource};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SESSION: &str = "194th (2023-2024)";

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, data_dir: &Path, end_page: u32) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
            session_label: SESSION.to_string(),
            session_filter: "194th (Current)".to_string(),
            jurisdiction: "MA".to_string(),
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestHarvest".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        scraper: ScraperConfig {
            start_page: 1,
            end_page,
            request_delay_ms: 0, // No pause in tests
            timeout_secs: 5,
            skip_existing: true,
        },
        extraction: ExtractionConfig::default(),
        listing: ListingConfig::default(),
        output: OutputConfig {
            data_dir: data_dir.to_string_lossy().into_owned(),
        },
        foundations: FoundationsConfig::default(),
    }
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

/// A search-results table listing the given bill numbers
fn listing(numbers: &[&str]) -> String {
    let rows: String = numbers
        .iter()
        .map(|number| {
            let slug = number.replace('.', "");
            format!(
                r#"<tr><td></td><td><a href="/Bills/194/{slug}">{number}</a></td>
                   <td><a href="/Legislators/{slug}">Sponsor of {number}</a></td>
                   <td><a href="/Bills/194/{slug}">An Act numbered {number}</a></td></tr>"#
            )
        })
        .collect();
    format!(
        "<table><tr><th></th><th>Bill</th><th>Sponsor</th><th>Title</th></tr>{}</table>",
        rows
    )
}

/// Bill text of roughly `words * 5` characters
fn bill_text(words: usize) -> String {
    vec!["lorem"; words].join(" ")
}

fn summary(number: &str, detail_url: &str) -> BillSummary {
    BillSummary {
        number: number.to_string(),
        sponsor: None,
        title: None,
        detail_url: detail_url.to_string(),
        session_label: SESSION.to_string(),
    }
}

/// A store whose writes fail for one bill number
struct UnwritableBillStore {
    inner: DedupStore,
    unwritable: &'static str,
}

impl BillStore for UnwritableBillStore {
    fn exists(&self, session_label: &str, number: &str) -> bool {
        self.inner.exists(session_label, number)
    }

    fn load_all(&self) -> Vec<BillRecord> {
        self.inner.load_all()
    }

    fn save(&mut self, record: &BillRecord) -> StorageResult<PathBuf> {
        if record.number == self.unwritable {
            return Err(StorageError::Persist {
                path: PathBuf::from("raw/unwritable.json"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        self.inner.save(record)
    }

    fn record_count(&self) -> usize {
        self.inner.record_count()
    }

    fn has_text_file(&self, session_label: &str, number: &str) -> bool {
        self.inner.has_text_file(session_label, number)
    }

    fn save_text(&mut self, record: &BillRecord) -> StorageResult<PathBuf> {
        self.inner.save_text(record)
    }

    fn load_text(&self, session_label: &str, number: &str) -> StorageResult<TextExport> {
        self.inner.load_text(session_label, number)
    }
}

async fn mount_listing(server: &MockServer, page: &str, numbers: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/Bills/Search"))
        .and(query_param("Page", page))
        .respond_with(html_page(&listing(numbers)))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html_page(body))
        .mount(server)
        .await;
}

/// Mounts a listing of five bills covering every text source
///
/// - H.1: "View Text" page with long text
/// - H.2: "View Text" page fails, "Print Preview" page has enough text
/// - H.3: only a "Download PDF" link
/// - S.4: detail page returns 404
/// - S.5: no links and a short content region
async fn mount_five_bill_site(server: &MockServer) {
    mount_listing(server, "1", &["H.1", "H.2", "H.3", "S.4", "S.5"]).await;

    mount_page(
        server,
        "/Bills/194/H1",
        r#"<a href="/Bills/194/H1/Text">View Text</a>
           <a href="/Bills/194/H1/Print">Print Preview</a>"#,
    )
    .await;
    mount_page(
        server,
        "/Bills/194/H1/Text",
        &format!(r#"<div class="billDocument"><p>{}</p></div>"#, bill_text(300)),
    )
    .await;
    // Never consulted: "View Text" already succeeded
    Mock::given(method("GET"))
        .and(path("/Bills/194/H1/Print"))
        .respond_with(html_page("unused"))
        .expect(0)
        .mount(server)
        .await;

    mount_page(
        server,
        "/Bills/194/H2",
        r#"<a href="/Bills/194/H2/Text">View Text</a>
           <a href="/Bills/194/H2/Print">Print Preview</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/Bills/194/H2/Text"))
        .respond_with(ResponseTemplate::new(500))
        .mount(server)
        .await;
    mount_page(
        server,
        "/Bills/194/H2/Print",
        &format!(r#"<div class="content"><p>{}</p></div>"#, bill_text(120)),
    )
    .await;

    mount_page(
        server,
        "/Bills/194/H3",
        &format!(
            r#"<a href="/Bills/194/H3.pdf">Download PDF</a><div class="content">{}</div>"#,
            bill_text(10)
        ),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/Bills/194/S4"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;

    mount_page(
        server,
        "/Bills/194/S5",
        &format!(r#"<div class="content">{}</div>"#, "x".repeat(300)),
    )
    .await;
}

#[tokio::test]
async fn test_full_harvest_covers_every_text_source() {
    let mock_server = MockServer::start().await;
    mount_five_bill_site(&mock_server).await;
    Mock::given(method("GET"))
        .and(path("/Bills/Search"))
        .and(query_param("Page", "2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let data_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), data_dir.path(), 2);
    let store = DedupStore::open(data_dir.path()).unwrap();

    let mut controller = HarvestController::new(config, store).unwrap();
    let report = controller.run().await;

    assert_eq!(report.pages_visited, 2);
    assert_eq!(report.page_failures, 1);
    assert_eq!(report.bills_listed, 5);
    assert_eq!(report.persisted, 5);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.persist_failures, 0);
    assert_eq!(report.texts_exported, 1);
    assert!(!report.stopped_early);
    for source in [
        TextSource::ViewText,
        TextSource::PrintPreview,
        TextSource::Pdf,
        TextSource::Error,
        TextSource::Failed,
    ] {
        assert_eq!(report.count(source), 1, "count of {}", source);
    }

    let records = controller.store().load_all();
    assert_eq!(records.len(), 5);

    let h1 = &records[0];
    assert_eq!(h1.number, "H.1");
    assert_eq!(h1.text_source, TextSource::ViewText);
    assert_eq!(h1.full_text, bill_text(300));
    assert_eq!(h1.text_length, bill_text(300).len());
    assert_eq!(h1.sponsor.as_deref(), Some("Sponsor of H.1"));
    assert_eq!(h1.metadata.bill_id, "MA_194th_H_1");
    assert!(h1.text_url.as_deref().unwrap().ends_with("/Bills/194/H1/Text"));

    let h2 = &records[1];
    assert_eq!(h2.text_source, TextSource::PrintPreview);
    assert!(h2.text_url.as_deref().unwrap().ends_with("/Bills/194/H2/Print"));

    let h3 = &records[2];
    assert_eq!(h3.text_source, TextSource::Pdf);
    assert_eq!(h3.text_length, 0);
    assert!(h3.full_text.starts_with("PDF available at: "));
    assert!(h3.full_text.ends_with("/Bills/194/H3.pdf"));

    let s4 = &records[3];
    assert_eq!(s4.text_source, TextSource::Error);
    assert!(s4.full_text.starts_with("Error: "));

    let s5 = &records[4];
    assert_eq!(s5.text_source, TextSource::Failed);
    assert_eq!(s5.full_text, "Could not extract bill text");
    assert_eq!(s5.text_url, None);

    // Only H.1 is long enough for a text export
    assert!(data_dir
        .path()
        .join("processed/text_files/194th_H_1.txt")
        .exists());
    assert!(!data_dir
        .path()
        .join("processed/text_files/194th_H_2.txt")
        .exists());

    // One progress row for the page that was processed
    let progress = std::fs::read_to_string(data_dir.path().join("progress_log.csv")).unwrap();
    let lines: Vec<&str> = progress.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "timestamp,page,bills_scraped");
    assert!(lines[1].ends_with(",1,5"));
}

#[tokio::test]
async fn test_second_run_persists_nothing_and_stops_early() {
    let mock_server = MockServer::start().await;
    mount_five_bill_site(&mock_server).await;
    mount_listing(&mock_server, "2", &["H.6"]).await;
    mount_page(&mock_server, "/Bills/194/H6", "<p>nothing</p>").await;

    let data_dir = TempDir::new().unwrap();

    let first = {
        let config = create_test_config(&mock_server.uri(), data_dir.path(), 1);
        let store = DedupStore::open(data_dir.path()).unwrap();
        HarvestController::new(config, store).unwrap().run().await
    };
    assert_eq!(first.persisted, 5);

    let config = create_test_config(&mock_server.uri(), data_dir.path(), 2);
    let store = DedupStore::open(data_dir.path()).unwrap();
    let mut controller = HarvestController::new(config, store).unwrap();
    let second = controller.run().await;

    assert_eq!(second.persisted, 0);
    assert_eq!(second.skipped, 5);
    assert!(second.stopped_early);
    assert_eq!(second.pages_visited, 1);
    assert_eq!(controller.store().record_count(), 5);
}

#[tokio::test]
async fn test_fresh_run_harvests_stored_bills_again() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, "1", &["H.7"]).await;
    Mock::given(method("GET"))
        .and(path("/Bills/194/H7"))
        .respond_with(html_page(&format!(
            r#"<div class="content">{}</div>"#,
            bill_text(150)
        )))
        .expect(2)
        .mount(&mock_server)
        .await;

    let data_dir = TempDir::new().unwrap();
    for _ in 0..2 {
        let mut config = create_test_config(&mock_server.uri(), data_dir.path(), 1);
        config.scraper.skip_existing = false;
        let store = DedupStore::open(data_dir.path()).unwrap();
        let report = HarvestController::new(config, store).unwrap().run().await;

        assert_eq!(report.persisted, 1);
        assert_eq!(report.count(TextSource::DirectPage), 1);
        assert!(!report.stopped_early);
    }
}

#[tokio::test]
async fn test_text_export_is_reused_without_fetching() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, "1", &["H.8"]).await;
    Mock::given(method("GET"))
        .and(path("/Bills/194/H8"))
        .respond_with(html_page("unused"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let data_dir = TempDir::new().unwrap();
    let detail_url = format!("{}/Bills/194/H8", mock_server.uri());
    let text = bill_text(250);

    // A previous run exported the text but its record was lost
    {
        let mut store = DedupStore::open(data_dir.path()).unwrap();
        let record = BillRecord::new(
            summary("H.8", &detail_url),
            Extraction::accepted(
                TextSource::ViewText,
                text.clone(),
                Some(format!("{}/text", detail_url)),
            ),
            "MA",
        );
        store.save_text(&record).unwrap();
    }

    let config = create_test_config(&mock_server.uri(), data_dir.path(), 1);
    let store = DedupStore::open(data_dir.path()).unwrap();
    let mut controller = HarvestController::new(config, store).unwrap();
    let report = controller.run().await;

    assert_eq!(report.persisted, 1);
    assert_eq!(report.texts_exported, 0);

    let records = controller.store().load_all();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text_source, TextSource::ViewText);
    assert_eq!(records[0].full_text, text);
    assert_eq!(records[0].sponsor.as_deref(), Some("Sponsor of H.8"));
    assert_eq!(
        records[0].text_url.as_deref(),
        Some(format!("{}/text", detail_url).as_str())
    );
}

#[tokio::test]
async fn test_page_without_table_is_skipped() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/Bills/Search", "<p>Service unavailable</p>").await;

    let data_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), data_dir.path(), 3);
    let store = DedupStore::open(data_dir.path()).unwrap();
    let report = HarvestController::new(config, store).unwrap().run().await;

    assert_eq!(report.pages_visited, 3);
    assert_eq!(report.page_failures, 3);
    assert_eq!(report.persisted, 0);
    assert!(!data_dir.path().join("progress_log.csv").exists());
}

#[tokio::test]
async fn test_fresh_run_refetches_and_replaces_text_export() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, "1", &["H.9"]).await;

    let fresh_text = bill_text(400);
    Mock::given(method("GET"))
        .and(path("/Bills/194/H9"))
        .respond_with(html_page(r#"<a href="/Bills/194/H9/Text">View Text</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(
        &mock_server,
        "/Bills/194/H9/Text",
        &format!(r#"<div class="billDocument">{}</div>"#, fresh_text),
    )
    .await;

    let data_dir = TempDir::new().unwrap();
    let detail_url = format!("{}/Bills/194/H9", mock_server.uri());
    let stale_text = vec!["stale"; 300].join(" ");

    // A previous run stored both the record and its export
    {
        let mut store = DedupStore::open(data_dir.path()).unwrap();
        let record = BillRecord::new(
            summary("H.9", &detail_url),
            Extraction::accepted(
                TextSource::ViewText,
                stale_text.clone(),
                Some(format!("{}/Text", detail_url)),
            ),
            "MA",
        );
        store.save(&record).unwrap();
        store.save_text(&record).unwrap();
    }

    let mut config = create_test_config(&mock_server.uri(), data_dir.path(), 1);
    config.scraper.skip_existing = false;
    let store = DedupStore::open(data_dir.path()).unwrap();
    let mut controller = HarvestController::new(config, store).unwrap();
    let report = controller.run().await;

    assert_eq!(report.persisted, 1);
    assert_eq!(report.texts_exported, 1);

    let records = controller.store().load_all();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text_source, TextSource::ViewText);
    assert_eq!(records[0].full_text, fresh_text);

    let export = controller.store().load_text(SESSION, "H.9").unwrap();
    assert_eq!(export.text, fresh_text);
}

#[tokio::test]
async fn test_persist_failure_is_counted_and_run_continues() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, "1", &["H.10", "H.11", "H.12"]).await;
    for slug in ["H10", "H11", "H12"] {
        mount_page(
            &mock_server,
            &format!("/Bills/194/{}", slug),
            &format!(r#"<div class="content">{}</div>"#, bill_text(150)),
        )
        .await;
    }

    let data_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), data_dir.path(), 1);
    let store = UnwritableBillStore {
        inner: DedupStore::open(data_dir.path()).unwrap(),
        unwritable: "H.11",
    };
    let mut controller = HarvestController::new(config, store).unwrap();
    let report = controller.run().await;

    assert_eq!(report.bills_listed, 3);
    assert_eq!(report.persisted, 2);
    assert_eq!(report.persist_failures, 1);
    assert_eq!(report.texts_exported, 0);

    let numbers: Vec<String> = controller
        .store()
        .load_all()
        .into_iter()
        .map(|record| record.number)
        .collect();
    assert_eq!(numbers, vec!["H.10", "H.12"]);

    let progress = std::fs::read_to_string(data_dir.path().join("progress_log.csv")).unwrap();
    let lines: Vec<&str> = progress.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].ends_with(",1,2"));
}
