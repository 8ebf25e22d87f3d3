//! Integration tests for the federal foundations helper
//!
//! A wiremock server stands in for the dataset server's rows endpoint.

use bill_harvest::config::{DatasetEntry, DatasetKind, FoundationsConfig, UserAgentConfig};
use bill_harvest::foundations::{
    setup_foundations, CONSTITUTIONAL_PRINCIPLES_FILE, INTERPRETATION_PRINCIPLES_FILE,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestHarvest".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    }
}

fn dataset(name: &str, limit: usize, kind: DatasetKind, output_file: &str) -> DatasetEntry {
    DatasetEntry {
        name: name.to_string(),
        config: "default".to_string(),
        split: "train".to_string(),
        limit,
        kind,
        output_file: output_file.to_string(),
        fallbacks: Vec::new(),
    }
}

/// A rows payload with `count` bill rows starting at `offset`
fn bill_rows(offset: usize, count: usize) -> Value {
    let rows: Vec<Value> = (offset..offset + count)
        .map(|i| {
            json!({
                "row_idx": i,
                "row": {
                    "text": format!("SECTION {}.", i),
                    "summary": "Summary",
                    "title": format!("Bill {}", i),
                    "bill_id": format!("hr{}", i),
                },
                "truncated_cells": []
            })
        })
        .collect();
    json!({ "features": [], "rows": rows })
}

fn read_array(path: &std::path::Path) -> Vec<Value> {
    let content = std::fs::read_to_string(path).unwrap();
    match serde_json::from_str(&content).unwrap() {
        Value::Array(items) => items,
        other => panic!("expected an array, got {}", other),
    }
}

#[tokio::test]
async fn test_dataset_is_paged_and_written() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rows"))
        .and(query_param("dataset", "billsum"))
        .and(query_param("offset", "0"))
        .and(query_param("length", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bill_rows(0, 100)))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rows"))
        .and(query_param("dataset", "billsum"))
        .and(query_param("offset", "100"))
        .and(query_param("length", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bill_rows(100, 50)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let output = TempDir::new().unwrap();
    let config = FoundationsConfig {
        output_dir: output.path().to_string_lossy().into_owned(),
        rows_endpoint: format!("{}/rows", mock_server.uri()),
        datasets: vec![dataset(
            "billsum",
            150,
            DatasetKind::BillSummary,
            "billsum_congressional.json",
        )],
    };

    let report = setup_foundations(&config, &user_agent()).await.unwrap();

    assert_eq!(report.datasets.len(), 1);
    assert_eq!(report.datasets[0].1, 150);
    assert!(report.unavailable.is_empty());

    let items = read_array(&output.path().join("billsum_congressional.json"));
    assert_eq!(items.len(), 150);
    assert_eq!(items[149]["bill_id"], "hr149");
    assert_eq!(items[0]["metadata"]["source"], "BillSum");
    assert_eq!(items[0]["metadata"]["length"], 10);

    assert!(output.path().join(CONSTITUTIONAL_PRINCIPLES_FILE).exists());
    assert!(output.path().join(INTERPRETATION_PRINCIPLES_FILE).exists());
}

#[tokio::test]
async fn test_unavailable_dataset_tries_every_fallback() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rows"))
        .and(query_param("dataset", "cornell-legal/legal_corpus"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rows"))
        .and(query_param("dataset", "pile-of-law/pile-of-law"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rows": [{ "row": { "text": "Opinion", "source": "courtlistener" } }]
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rows"))
        .and(query_param("dataset", "harvard-lil/legal-corpus"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let output = TempDir::new().unwrap();
    let mut primary = dataset(
        "cornell-legal/legal_corpus",
        500,
        DatasetKind::LegalDocument,
        "cornell_legal_corpus.json",
    );
    primary.fallbacks = vec![
        dataset(
            "pile-of-law/pile-of-law",
            100,
            DatasetKind::LegalDocument,
            "pile_of_law_sample.json",
        ),
        dataset(
            "harvard-lil/legal-corpus",
            100,
            DatasetKind::LegalDocument,
            "harvard_legal_corpus.json",
        ),
    ];
    let config = FoundationsConfig {
        output_dir: output.path().to_string_lossy().into_owned(),
        rows_endpoint: format!("{}/rows", mock_server.uri()),
        datasets: vec![primary],
    };

    let report = setup_foundations(&config, &user_agent()).await.unwrap();

    assert_eq!(
        report.unavailable,
        vec!["cornell-legal/legal_corpus", "harvard-lil/legal-corpus"]
    );
    assert_eq!(report.datasets.len(), 1);
    assert_eq!(report.references.len(), 2);
    assert!(!output.path().join("cornell_legal_corpus.json").exists());

    let items = read_array(&output.path().join("pile_of_law_sample.json"));
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["metadata"]["source"], "courtlistener");
    assert_eq!(items[0]["metadata"]["jurisdiction"], "federal");
}
