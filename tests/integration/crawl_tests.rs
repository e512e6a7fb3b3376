//! Integration tests for the validator
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full validation cycle end-to-end.

use sitemap_link_validator::config::Config;
use sitemap_link_validator::crawler::{Coordinator, RequestClient, RetryPolicy};
use sitemap_link_validator::ValidatorError;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(site_url: &str, workers: usize) -> Config {
    Config {
        site_url: site_url.to_string(),
        workers,
        ..Config::default()
    }
}

/// Builds a coordinator with a short retry delay
fn create_coordinator(config: Config) -> Coordinator {
    let client = RequestClient::new(RetryPolicy {
        max_attempts: 2,
        delay: Duration::from_millis(10),
    })
    .expect("Failed to build HTTP client");
    Coordinator::with_client(config, client)
}

fn urlset(locs: &[String]) -> String {
    let entries: String = locs
        .iter()
        .map(|loc| format!("<url><loc>{}</loc></url>", loc))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

fn sitemap_index(locs: &[String]) -> String {
    let entries: String = locs
        .iter()
        .map(|loc| format!("<sitemap><loc>{}</loc></sitemap>", loc))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</sitemapindex>"#,
        entries
    )
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

async fn mount_xml(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "application/xml"),
        )
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_nested_sitemap_index_is_flattened() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        sitemap_index(&[
            format!("{}/sitemap-pages.xml", base_url),
            format!("{}/sitemap-nested.xml", base_url),
        ]),
    )
    .await;
    mount_xml(
        &mock_server,
        "/sitemap-pages.xml",
        urlset(&[format!("{}/a", base_url), format!("{}/b", base_url)]),
    )
    .await;
    // An index with a single child
    mount_xml(
        &mock_server,
        "/sitemap-nested.xml",
        sitemap_index(&[format!("{}/sitemap-blog.xml", base_url)]),
    )
    .await;
    mount_xml(
        &mock_server,
        "/sitemap-blog.xml",
        urlset(&[format!("{}/blog/1", base_url)]),
    )
    .await;

    let coordinator = create_coordinator(create_test_config(&base_url, 2));
    let mut pages = coordinator
        .resolve_pages()
        .await
        .expect("Failed to resolve sitemap");
    pages.sort();

    assert_eq!(
        pages,
        vec![
            format!("{}/a", base_url),
            format!("{}/b", base_url),
            format!("{}/blog/1", base_url),
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_full_run_reports_broken_sitemap_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let missing = format!("{}/missing", base_url);

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        urlset(&[
            format!("{}/a", base_url),
            format!("{}/b", base_url),
            format!("{}/c", base_url),
            missing.clone(),
        ]),
    )
    .await;

    for page in ["/a", "/b", "/c"] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(html("<p>No links here</p>"))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let coordinator = create_coordinator(create_test_config(&base_url, 2));
    let report = coordinator.run().await.expect("Run failed");

    assert_eq!(report.pages, 4);
    assert_eq!(report.passed, 3);
    assert_eq!(report.errors.len(), 1);

    let error = &report.errors[0];
    assert_eq!(error.page, missing);
    assert_eq!(error.url, missing);
    assert_eq!(error.status, Some(404));
    assert_eq!(error.reason.as_deref(), Some("Not Found"));
    assert_eq!(report.exit_code(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_broken_link_is_attributed_to_its_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        urlset(&[format!("{}/home", base_url)]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/home"))
        .respond_with(html(
            r#"<a href="/ok">ok</a><a href="gone">gone</a><a href="/blocked">blocked</a>"#,
        ))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(html(r#"<a href="/never-followed">deep</a>"#))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&mock_server)
        .await;
    // 403 counts as a pass by default
    Mock::given(method("GET"))
        .and(path("/blocked"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;
    // Links are only followed one level deep
    Mock::given(method("GET"))
        .and(path("/never-followed"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let coordinator = create_coordinator(create_test_config(&base_url, 1));
    let report = coordinator.run().await.expect("Run failed");

    assert_eq!(report.passed, 3);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].page, format!("{}/home", base_url));
    assert_eq!(report.errors[0].url, format!("{}/gone", base_url));
    assert_eq!(report.errors[0].status, Some(410));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_shared_link_is_requested_once_per_worker() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        urlset(&[format!("{}/one", base_url), format!("{}/two", base_url)]),
    )
    .await;

    for page in ["/one", "/two"] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(html(r#"<a href="/shared">shared</a><a href="/shared#again">again</a>"#))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/shared"))
        .respond_with(html(""))
        .expect(1)
        .mount(&mock_server)
        .await;

    let coordinator = create_coordinator(create_test_config(&base_url, 1));
    let report = coordinator.run().await.expect("Run failed");

    assert!(report.is_success());
    assert_eq!(report.passed, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_pages_of_other_shards_are_not_rechecked_as_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        urlset(&[format!("{}/first", base_url), format!("{}/second", base_url)]),
    )
    .await;

    // Each page links to the other, which lives in the other shard
    Mock::given(method("GET"))
        .and(path("/first"))
        .respond_with(html(r#"<a href="/second">second</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/second"))
        .respond_with(html(r#"<a href="/first">first</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let coordinator = create_coordinator(create_test_config(&base_url, 2));
    let report = coordinator.run().await.expect("Run failed");

    assert!(report.is_success());
    assert_eq!(report.passed, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_ignored_urls_are_never_requested() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        urlset(&[
            format!("{}/page", base_url),
            format!("{}/private/listed", base_url),
        ]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(html(
            r#"<a href="/private/secret">secret</a><a href="/report.pdf">pdf</a>"#,
        ))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/private/secret"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/private/listed"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url, 2);
    config.ignore_urls = vec!["*/private/*".to_string(), "*.pdf".to_string()];

    let coordinator = create_coordinator(config);
    let report = coordinator.run().await.expect("Run failed");

    assert!(report.is_success());
    assert_eq!(report.passed, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_repeated_runs_report_the_same_errors() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        urlset(&[
            format!("{}/p1", base_url),
            format!("{}/p2", base_url),
            format!("{}/p3", base_url),
        ]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/p1"))
        .respond_with(html(r#"<a href="/dead-1">x</a><a href="/live">y</a>"#))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p2"))
        .respond_with(html(r#"<a href="/dead-2">x</a>"#))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p3"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/live"))
        .respond_with(html(""))
        .mount(&mock_server)
        .await;
    for dead in ["/dead-1", "/dead-2"] {
        Mock::given(method("GET"))
            .and(path(dead))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;
    }

    let coordinator = create_coordinator(create_test_config(&base_url, 3));

    let mut first = coordinator.run().await.expect("First run failed").errors;
    let mut second = coordinator.run().await.expect("Second run failed").errors;
    first.sort();
    second.sort();

    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_missing_sitemap_fails_the_run() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let coordinator = create_coordinator(create_test_config(&base_url, 2));
    let result = coordinator.run().await;

    assert!(matches!(
        result,
        Err(ValidatorError::SitemapStatus { status: 404, .. })
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_custom_success_status_codes() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        urlset(&[format!("{}/page", base_url)]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(html(r#"<a href="/moved">moved</a><a href="/forbidden">f</a>"#))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forbidden"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url, 1);
    config.success_status_codes = vec!["200".to_string(), "204".to_string()];

    let coordinator = create_coordinator(config);
    let report = coordinator.run().await.expect("Run failed");

    assert_eq!(report.passed, 2);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].status, Some(403));
    assert_eq!(report.errors[0].reason.as_deref(), Some("Forbidden"));
}
