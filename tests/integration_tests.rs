//! Integration tests for NinjaDorks
//!
//! These tests run the public API end to end (search, export, download)
//! against a local mock of the Custom Search API and a mock file server.

use mockito::{Matcher, Server};
use ninjadorks::config::{load_config, save_credentials, Credentials};
use ninjadorks::download::{DownloadOutcome, ExtensionFilter, FileDownloader};
use ninjadorks::models::{SearchQuery, SearchResult};
use ninjadorks::report::{export_html, export_json, render_table};
use ninjadorks::sources::{search, GoogleSearch, SourceError};
use ninjadorks::utils::{HttpClient, DEFAULT_TIMEOUT};
use tempfile::tempdir;

fn client() -> HttpClient {
    HttpClient::new(DEFAULT_TIMEOUT).expect("client")
}

fn page_body(items: &[(&str, &str, &str)]) -> String {
    let items: Vec<serde_json::Value> = items
        .iter()
        .map(|(title, snippet, link)| {
            serde_json::json!({ "title": title, "snippet": snippet, "link": link })
        })
        .collect();
    serde_json::json!({ "kind": "customsearch#search", "items": items }).to_string()
}

#[tokio::test]
async fn test_two_page_search_export_and_download() {
    let mut api = Server::new_async().await;
    let mut files = Server::new_async().await;
    let dir = tempdir().unwrap();

    let a_link = format!("{}/docs/a.pdf", files.url());
    let b_link = format!("{}/docs/b.txt", files.url());

    let page1 = api
        .mock("GET", "/customsearch/v1")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "test".into()),
            Matcher::UrlEncoded("start".into(), "1".into()),
            Matcher::UrlEncoded("key".into(), "k".into()),
            Matcher::UrlEncoded("cx".into(), "cx".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page_body(&[("A", "first", &a_link)]))
        .expect(1)
        .create_async()
        .await;
    let page2 = api
        .mock("GET", "/customsearch/v1")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "test".into()),
            Matcher::UrlEncoded("start".into(), "11".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page_body(&[("B", "second", &b_link)]))
        .expect(1)
        .create_async()
        .await;

    let pdf = files
        .mock("GET", "/docs/a.pdf")
        .with_status(200)
        .with_body("%PDF-1.4 test")
        .expect(1)
        .create_async()
        .await;
    let txt = files
        .mock("GET", "/docs/b.txt")
        .with_status(200)
        .with_body("text")
        .expect(0)
        .create_async()
        .await;

    let engine = GoogleSearch::with_base_url(
        client(),
        Credentials::new("k", "cx"),
        format!("{}/customsearch/v1", api.url()),
    );
    let results = search(&engine, &SearchQuery::new("test").pages(2))
        .await
        .unwrap();

    page1.assert_async().await;
    page2.assert_async().await;
    let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["A", "B"]);

    // JSON export mirrors the result set
    let json_path = dir.path().join("results.json");
    export_json(&results, &json_path).unwrap();
    let exported: Vec<SearchResult> =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(exported, results.results());
    assert_eq!(exported[0].description, "first");

    // Only the PDF passes the filter
    let downloads = dir.path().join("downloads");
    let report = FileDownloader::new(client(), &downloads)
        .quiet(true)
        .download(results.links(), &ExtensionFilter::Only(vec!["pdf".to_string()]))
        .await
        .unwrap();

    pdf.assert_async().await;
    txt.assert_async().await;
    assert_eq!(report.saved(), 1);
    assert_eq!(report.skipped(), 1);
    assert_eq!(
        std::fs::read(downloads.join("a.pdf")).unwrap(),
        b"%PDF-1.4 test"
    );
    assert!(!downloads.join("b.txt").exists());
}

#[tokio::test]
async fn test_search_failure_on_second_page() {
    let mut api = Server::new_async().await;

    let _page1 = api
        .mock("GET", "/")
        .match_query(Matcher::UrlEncoded("start".into(), "1".into()))
        .with_status(200)
        .with_body(page_body(&[("A", "first", "http://example.com/a.pdf")]))
        .create_async()
        .await;
    let _page2 = api
        .mock("GET", "/")
        .match_query(Matcher::UrlEncoded("start".into(), "11".into()))
        .with_status(429)
        .with_body(r#"{"error":{"code":429,"message":"Quota exceeded"}}"#)
        .create_async()
        .await;

    let engine = GoogleSearch::with_base_url(client(), Credentials::new("k", "cx"), api.url());
    let err = search(&engine, &SearchQuery::new("test").pages(2))
        .await
        .unwrap_err();

    match err {
        SourceError::Api(msg) => assert!(msg.contains("Quota exceeded")),
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_download_all_isolates_failures() {
    let mut files = Server::new_async().await;
    let dir = tempdir().unwrap();

    let _ok = files
        .mock("GET", "/one.sql")
        .with_status(200)
        .with_body("dump")
        .create_async()
        .await;
    let _missing = files
        .mock("GET", "/two.pdf")
        .with_status(404)
        .create_async()
        .await;
    let _also_ok = files
        .mock("GET", "/three.doc")
        .with_status(200)
        .with_body("doc")
        .create_async()
        .await;

    let urls = [
        format!("{}/one.sql", files.url()),
        format!("{}/two.pdf", files.url()),
        format!("{}/three.doc", files.url()),
    ];
    let report = FileDownloader::new(client(), dir.path())
        .quiet(true)
        .download(&urls, &ExtensionFilter::All)
        .await
        .unwrap();

    assert_eq!(report.attempted(), 3);
    assert_eq!(report.saved(), 2);
    assert!(matches!(
        report.outcomes[1],
        DownloadOutcome::Failed { .. }
    ));
    assert!(dir.path().join("one.sql").exists());
    assert!(dir.path().join("three.doc").exists());
}

#[test]
fn test_saved_credentials_are_loaded() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ninjadorks.toml");

    save_credentials(&path, &Credentials::new("saved-key", "saved-cx")).unwrap();

    let config = load_config(&path).unwrap();
    let credentials = config.credentials.resolve().unwrap();
    assert_eq!(credentials, Credentials::new("saved-key", "saved-cx"));
}

#[test]
fn test_reports_from_same_results() {
    let dir = tempdir().unwrap();
    let template = dir.path().join("template.html");
    let output = dir.path().join("report.html");
    std::fs::write(&template, "<main>{{ results }}</main>").unwrap();

    let results = ninjadorks::ResultSet::from_results(
        "intitle:index.of",
        vec![
            SearchResult::new("Index of /backup", "", "http://example.com/backup/"),
            SearchResult::new("Index of /logs", "server logs", "http://example.com/logs/"),
        ],
    );

    export_html(&results, &template, &output).unwrap();
    let html = std::fs::read_to_string(&output).unwrap();
    assert!(html.starts_with("<main><div class=\"result\">"));
    assert!(html.contains("Index of /logs"));

    let table = render_table(&results).to_string();
    assert!(table.contains("Index of /backup"));
}
