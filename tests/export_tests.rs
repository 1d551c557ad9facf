//! Integration tests for the export driver
//!
//! These tests run the full export pipeline against wiremock servers that
//! stand in for both the Omnivore GraphQL endpoint and the article pages
//! being archived.

use omnivore_export::{export, ExportConfig, ExportError};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_TOKEN: &str = "test-token";

/// Builds a config pointing at the mock GraphQL server and a temp dir
fn test_config(server: &MockServer, output_dir: &std::path::Path) -> ExportConfig {
    std::env::set_var("OMNIVORE_API_TOKEN", TEST_TOKEN);
    ExportConfig {
        output_dir: output_dir.to_path_buf(),
        color: false,
        api_url: format!("{}/api/graphql", server.uri()),
        ..ExportConfig::default()
    }
}

/// A successful search page with the given (id, title, url) items
fn search_page(items: &[(&str, &str, String)], next_cursor: Option<&str>) -> serde_json::Value {
    let edges: Vec<_> = items
        .iter()
        .map(|(id, title, url)| {
            json!({"node": {
                "id": id,
                "title": title,
                "url": url,
                "savedAt": "2024-03-01T12:00:00Z",
                "labels": [],
            }})
        })
        .collect();

    json!({"data": {"search": {
        "edges": edges,
        "pageInfo": {
            "hasNextPage": next_cursor.is_some(),
            "endCursor": next_cursor,
        },
    }}})
}

/// Mounts an article page at `route` with the given HTML body
async fn mount_article(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_export_happy_path() {
    let server = MockServer::start().await;
    let base = server.uri();

    let items = [
        ("id-1", "First Article", format!("{base}/article-1")),
        ("id-2", "Second Article", format!("{base}/article-2")),
    ];

    Mock::given(method("POST"))
        .and(path("/api/graphql"))
        .and(header("Authorization", TEST_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(&items, None)))
        .mount(&server)
        .await;

    mount_article(&server, "/article-1", "<html><body>first body</body></html>").await;
    mount_article(&server, "/article-2", "<html><body>second body</body></html>").await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, dir.path());

    let report = export::run(&config).await.unwrap();
    assert_eq!(report.exported, 2);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.failed, 0);

    let first = std::fs::read_to_string(dir.path().join("First Article.html")).unwrap();
    assert!(first.contains("first body"));
    let second = std::fs::read_to_string(dir.path().join("Second Article.html")).unwrap();
    assert!(second.contains("second body"));
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let server = MockServer::start().await;
    let base = server.uri();

    let items = [("id-1", "Stable Article", format!("{base}/article"))];

    Mock::given(method("POST"))
        .and(path("/api/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(&items, None)))
        .mount(&server)
        .await;
    mount_article(&server, "/article", "<html>stable</html>").await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, dir.path());

    let first_run = export::run(&config).await.unwrap();
    assert_eq!(first_run.exported, 1);

    let written = std::fs::read_to_string(dir.path().join("Stable Article.html")).unwrap();

    let second_run = export::run(&config).await.unwrap();
    assert_eq!(second_run.exported, 0);
    assert_eq!(second_run.skipped, 1);
    assert_eq!(second_run.failed, 0);

    // The existing file was not rewritten.
    let after = std::fs::read_to_string(dir.path().join("Stable Article.html")).unwrap();
    assert_eq!(written, after);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_partial_failure_does_not_abort_the_loop() {
    let server = MockServer::start().await;
    let base = server.uri();

    let items = [
        ("id-1", "Good One", format!("{base}/good-1")),
        ("id-2", "Broken One", format!("{base}/broken")),
        ("id-3", "Good Two", format!("{base}/good-2")),
    ];

    Mock::given(method("POST"))
        .and(path("/api/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(&items, None)))
        .mount(&server)
        .await;
    mount_article(&server, "/good-1", "<html>good one</html>").await;
    mount_article(&server, "/good-2", "<html>good two</html>").await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, dir.path());

    let report = export::run(&config).await.unwrap();
    assert_eq!(report.exported, 2);
    assert_eq!(report.failed, 1);

    // The file written before the failure is intact, and the item after the
    // failure was still processed.
    let good_one = std::fs::read_to_string(dir.path().join("Good One.html")).unwrap();
    assert!(good_one.contains("good one"));
    assert!(dir.path().join("Good Two.html").is_file());
    assert!(!dir.path().join("Broken One.html").exists());
}

#[tokio::test]
async fn test_compressed_output_round_trips() {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let server = MockServer::start().await;
    let base = server.uri();
    let body = "<html><body>compress me</body></html>";

    let items = [("id-1", "Zipped", format!("{base}/article"))];
    Mock::given(method("POST"))
        .and(path("/api/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(&items, None)))
        .mount(&server)
        .await;
    mount_article(&server, "/article", body).await;

    let dir = tempfile::tempdir().unwrap();
    let config = ExportConfig {
        compress: true,
        ..test_config(&server, dir.path())
    };

    let report = export::run(&config).await.unwrap();
    assert_eq!(report.exported, 1);

    let dest = dir.path().join("Zipped.html.gz");
    assert!(dest.is_file());

    let mut decoder = GzDecoder::new(std::fs::File::open(&dest).unwrap());
    let mut decompressed = String::new();
    decoder.read_to_string(&mut decompressed).unwrap();
    assert_eq!(decompressed, body);
}

#[tokio::test]
async fn test_pagination_concatenates_pages_in_order() {
    let server = MockServer::start().await;
    let base = server.uri();

    let page_one = [("id-1", "Page One Item", format!("{base}/one"))];
    let page_two = [("id-2", "Page Two Item", format!("{base}/two"))];

    // More specific mock first: the request carrying the cursor.
    Mock::given(method("POST"))
        .and(path("/api/graphql"))
        .and(body_string_contains("cursor-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(&page_two, None)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/graphql"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(search_page(&page_one, Some("cursor-1"))),
        )
        .mount(&server)
        .await;

    mount_article(&server, "/one", "<html>one</html>").await;
    mount_article(&server, "/two", "<html>two</html>").await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, dir.path());

    let report = export::run(&config).await.unwrap();
    assert_eq!(report.exported, 2);
    assert!(dir.path().join("Page One Item.html").is_file());
    assert!(dir.path().join("Page Two Item.html").is_file());
}

#[tokio::test]
async fn test_search_api_error_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"search": {"errorCodes": ["UNAUTHORIZED"]}}
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, dir.path());

    let err = export::run(&config).await.unwrap_err();
    assert!(matches!(err, ExportError::SearchApi { .. }));
    assert!(err.to_string().contains("UNAUTHORIZED"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_search_transport_failure_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/graphql"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, dir.path());

    let err = export::run(&config).await.unwrap_err();
    assert!(matches!(err, ExportError::SearchStatus { status: 500 }));
}

#[tokio::test]
async fn test_include_labels_take_precedence_on_the_wire() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(&[], None)))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = ExportConfig {
        labels: vec!["reading".to_string()],
        skip_labels: vec!["archive".to_string()],
        ..test_config(&server, dir.path())
    };

    let report = export::run(&config).await.unwrap();
    assert_eq!(report.exported, 0);

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("label:reading"));
    assert!(!body.contains("-label:archive"));
}

#[tokio::test]
async fn test_missing_external_command_fails_items() {
    // Only meaningful when monolith is actually absent.
    let monolith_installed = std::process::Command::new("which")
        .arg("monolith")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);
    if monolith_installed {
        return;
    }

    let server = MockServer::start().await;
    let base = server.uri();

    let items = [("id-1", "Needs Monolith", format!("{base}/article"))];
    Mock::given(method("POST"))
        .and(path("/api/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(&items, None)))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = ExportConfig {
        use_monolith: true,
        ..test_config(&server, dir.path())
    };

    // Not a silent skip: the item is recorded as failed, the run completes.
    let report = export::run(&config).await.unwrap();
    assert_eq!(report.exported, 0);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.failed, 1);
}

#[tokio::test]
async fn test_title_with_path_separator_fails_that_item() {
    let server = MockServer::start().await;
    let base = server.uri();

    let items = [
        ("id-1", "A/B Test", format!("{base}/nested")),
        ("id-2", "Plain", format!("{base}/plain")),
    ];
    Mock::given(method("POST"))
        .and(path("/api/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(&items, None)))
        .mount(&server)
        .await;
    mount_article(&server, "/nested", "<html>nested</html>").await;
    mount_article(&server, "/plain", "<html>plain</html>").await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, dir.path());

    // The unsanitized title yields a nested path whose parent does not
    // exist; that surfaces as a per-item file-creation failure, not a crash.
    let report = export::run(&config).await.unwrap();
    assert_eq!(report.failed, 1);
    assert_eq!(report.exported, 1);
    assert!(dir.path().join("Plain.html").is_file());
}

#[tokio::test]
async fn test_snapshot_inlines_subresources() {
    let server = MockServer::start().await;
    let base = server.uri();

    let html = format!(
        r#"<html><head><link rel="stylesheet" href="{base}/style.css"></head>
        <body><img src="/logo.png">article text</body></html>"#
    );

    let items = [("id-1", "Inlined", format!("{base}/article"))];
    Mock::given(method("POST"))
        .and(path("/api/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(&items, None)))
        .mount(&server)
        .await;
    mount_article(&server, "/article", &html).await;

    Mock::given(method("GET"))
        .and(path("/style.css"))
        .respond_with(
            // set_body_string would force content-type to text/plain;
            // set_body_raw is how wiremock attaches a custom mime type.
            ResponseTemplate::new(200).set_body_raw("body { color: red }", "text/css"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0x89u8, 0x50, 0x4e, 0x47])
                .insert_header("content-type", "image/png"),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, dir.path());

    let report = export::run(&config).await.unwrap();
    assert_eq!(report.exported, 1);

    let snapshot = std::fs::read_to_string(dir.path().join("Inlined.html")).unwrap();
    assert!(snapshot.contains("data:text/css;base64,"));
    assert!(snapshot.contains("data:image/png;base64,"));
    assert!(snapshot.contains("article text"));
    // The original remote references are gone.
    assert!(!snapshot.contains("/style.css"));
}
