//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! document scouting, link fan-out and the frontier loop end-to-end.

use tokio_util::sync::CancellationToken;
use web_scout::config::{Config, CrawlerConfig, StorageConfig, UserAgentConfig};
use web_scout::crawler::{build_http_client, crawl, DocumentManager, Frontier};
use web_scout::output::load_statistics;
use web_scout::state::DocumentState;
use web_scout::storage::{
    lock, share, DocumentFilter, DocumentRecord, DomainFilter, SqliteStorage,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Any wildcard directive other than `Allow: /` makes the domain restricted,
/// and restricted domains are fetched without pattern checks.
const RESTRICTED_ROBOTS: &str = "User-agent: *\nDisallow: /private";

fn user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    }
}

fn create_manager() -> DocumentManager {
    let storage = share(SqliteStorage::open_in_memory().expect("Failed to open storage"));
    let client = build_http_client(&user_agent()).expect("Failed to build client");
    DocumentManager::new(storage, client)
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "text/html")
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

fn find(manager: &DocumentManager, url: &str) -> Option<DocumentRecord> {
    lock(manager.storage())
        .unwrap()
        .find_document(DocumentFilter::Url(url))
        .unwrap()
}

fn count_documents(manager: &DocumentManager, filter: DocumentFilter<'_>) -> u64 {
    lock(manager.storage())
        .unwrap()
        .count_documents(filter)
        .unwrap()
}

fn count_domains(manager: &DocumentManager) -> u64 {
    lock(manager.storage())
        .unwrap()
        .count_domains(DomainFilter::All)
        .unwrap()
}

async fn create_and_scout(manager: &DocumentManager, url: &str) -> DocumentRecord {
    manager.create(url, "").await.expect("create failed");
    let document = find(manager, url).expect("document missing");
    manager.scout(document).await.expect("scout failed")
}

#[tokio::test]
async fn test_http_error_is_persisted() {
    let server = MockServer::start().await;
    mount_robots(&server, RESTRICTED_ROBOTS).await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .expect(1)
        .mount(&server)
        .await;

    let manager = create_manager();
    let url = format!("{}/missing", server.uri());
    create_and_scout(&manager, &url).await;

    let stored = find(&manager, &url).unwrap();
    assert!(stored.scouted);
    assert!(stored.allowed);
    assert!(!stored.alive);
    assert_eq!(stored.status_code, 404);
    assert!(stored.data.is_empty());
    assert_eq!(stored.url_count, 0);
    assert_eq!(DocumentState::of(&stored), DocumentState::HttpError);
}

#[tokio::test]
async fn test_link_fan_out() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;
    mount_robots(&server, RESTRICTED_ROBOTS).await;
    mount_robots(&other, RESTRICTED_ROBOTS).await;

    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(html(format!(
            r#"<html><body><a href="/one">One</a><a href="{}/two">Two</a></body></html>"#,
            other.uri()
        )))
        .expect(1)
        .mount(&server)
        .await;

    let manager = create_manager();
    let start = format!("{}/start", server.uri());
    let scouted = create_and_scout(&manager, &start).await;

    assert!(scouted.alive);
    assert_eq!(scouted.url_count, 2);

    let stored = find(&manager, &start).unwrap();
    assert_eq!(stored.url_count, 2);
    assert_eq!(stored.status_code, 200);
    assert_eq!(stored.content_type, "text/html");
    assert!(!stored.data.is_empty());

    // Relative values are appended to the full document URL
    let relative = find(&manager, &format!("{}/start/one", server.uri())).unwrap();
    let absolute = find(&manager, &format!("{}/two", other.uri())).unwrap();
    for child in [&relative, &absolute] {
        assert!(!child.scouted);
        assert_eq!(child.url_parent, start);
    }
    assert_ne!(relative.domain_id, absolute.domain_id);

    assert_eq!(count_documents(&manager, DocumentFilter::All), 3);
    assert_eq!(count_domains(&manager), 2);
}

#[tokio::test]
async fn test_dedup_across_pages() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_robots(&server, RESTRICTED_ROBOTS).await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(format!(
            r#"<a href="{base}/b">B</a><a href="{base}/c">C</a><a href="{base}/c">C again</a>"#
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html(format!(r#"<a href="{base}/c">C</a><a href="{base}/a">A</a>"#)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/c"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"leaf".to_vec(), "text/plain"))
        .expect(1)
        .mount(&server)
        .await;

    let manager = create_manager();
    let frontier = Frontier::new(manager, None, CancellationToken::new());
    frontier.seed(&format!("{base}/a")).await.unwrap();

    let report = frontier.run().await.unwrap();
    assert_eq!(report.scouted, 3);
    assert_eq!(report.alive, 3);
    assert_eq!(report.errors, 0);
    assert_eq!(report.cycles, 2);
}

#[tokio::test]
async fn test_domain_is_registered_once() {
    let server = MockServer::start().await;
    mount_robots(&server, RESTRICTED_ROBOTS).await;

    let manager = create_manager();
    for page in ["/x", "/y", "/z"] {
        manager
            .create(&format!("{}{}", server.uri(), page), "")
            .await
            .unwrap();
    }

    assert_eq!(count_domains(&manager), 1);
    assert_eq!(count_documents(&manager, DocumentFilter::All), 3);

    let domain = lock(manager.storage())
        .unwrap()
        .find_domain(DomainFilter::All)
        .unwrap()
        .unwrap();
    assert!(domain.robots_file);
    assert!(domain.policy.restricted);
    assert_eq!(domain.policy.disallowed, vec!["/private"]);
    assert_eq!(domain.address, server.uri());
}

#[tokio::test]
async fn test_missing_robots_denies_every_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(html("<p>never fetched</p>".to_string()))
        .expect(0)
        .mount(&server)
        .await;

    let manager = create_manager();
    let url = format!("{}/page", server.uri());
    let scouted = create_and_scout(&manager, &url).await;

    assert_eq!(DocumentState::of(&scouted), DocumentState::Denied);
    let stored = find(&manager, &url).unwrap();
    assert!(stored.scouted);
    assert!(!stored.allowed);
    assert!(!stored.alive);
    assert_eq!(stored.status_code, 0);
}

#[tokio::test]
async fn test_full_access_robots_denies_every_url() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(html("<p>never fetched</p>".to_string()))
        .expect(0)
        .mount(&server)
        .await;

    let manager = create_manager();
    let url = format!("{}/page", server.uri());
    let scouted = create_and_scout(&manager, &url).await;

    assert!(!scouted.allowed);
    let domain = lock(manager.storage())
        .unwrap()
        .find_domain(DomainFilter::Id(scouted.domain_id))
        .unwrap()
        .unwrap();
    assert!(domain.robots_file);
    assert!(!domain.policy.restricted);
}

#[tokio::test]
async fn test_non_html_body_is_not_scanned() {
    let server = MockServer::start().await;
    mount_robots(&server, RESTRICTED_ROBOTS).await;

    let body = r#"this mentions href="/looks-like-a-link" but is plain text"#;
    Mock::given(method("GET"))
        .and(path("/notes.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/plain"),
        )
        .mount(&server)
        .await;

    let manager = create_manager();
    let url = format!("{}/notes.txt", server.uri());
    let scouted = create_and_scout(&manager, &url).await;

    assert!(scouted.alive);
    assert_eq!(scouted.url_count, 0);
    assert_eq!(scouted.data, body.as_bytes());
    assert_eq!(count_documents(&manager, DocumentFilter::All), 1);
}

#[tokio::test]
async fn test_malformed_link_is_skipped() {
    let server = MockServer::start().await;
    mount_robots(&server, RESTRICTED_ROBOTS).await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(html(format!(
            r#"<a href="httpbroken">bad</a><a href="{}/good">good</a>"#,
            server.uri()
        )))
        .mount(&server)
        .await;

    let manager = create_manager();
    let url = format!("{}/page", server.uri());
    let scouted = create_and_scout(&manager, &url).await;

    // Every match is counted, but only the well-formed link is created
    assert_eq!(scouted.url_count, 2);
    assert!(find(&manager, "httpbroken").is_none());
    assert!(find(&manager, &format!("{}/good", server.uri())).is_some());
    assert_eq!(count_documents(&manager, DocumentFilter::All), 2);
}

#[tokio::test]
async fn test_transport_failure_marks_unreachable() {
    let server = MockServer::start().await;
    mount_robots(&server, RESTRICTED_ROBOTS).await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(60)),
        )
        .mount(&server)
        .await;

    let storage = share(SqliteStorage::open_in_memory().unwrap());
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_millis(200))
        .build()
        .unwrap();
    let manager = DocumentManager::new(storage, client);

    let url = format!("{}/slow", server.uri());
    let scouted = create_and_scout(&manager, &url).await;

    assert!(scouted.scouted);
    assert!(scouted.allowed);
    assert!(!scouted.alive);
    assert_eq!(scouted.status_code, 0);
    assert_eq!(DocumentState::of(&find(&manager, &url).unwrap()), DocumentState::Unreachable);
}

#[tokio::test]
async fn test_max_cycles_bounds_the_run() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_robots(&server, RESTRICTED_ROBOTS).await;

    Mock::given(method("GET"))
        .and(path("/root"))
        .respond_with(html(format!(r#"<a href="{base}/next">next</a>"#)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html("<p>leaf</p>".to_string()))
        .expect(0)
        .mount(&server)
        .await;

    let frontier = Frontier::new(create_manager(), Some(1), CancellationToken::new());
    frontier.seed(&format!("{base}/root")).await.unwrap();

    let report = frontier.run().await.unwrap();
    assert_eq!(report.cycles, 1);
    assert_eq!(report.scouted, 1);
}

#[tokio::test]
async fn test_crawl_end_to_end() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_robots(&server, RESTRICTED_ROBOTS).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(format!(
            r#"<a href="{base}/page1">1</a><a href="{base}/page2">2</a>"#
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html("<p>one</p>".to_string()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("crawl.db");
    let config = Config {
        crawler: CrawlerConfig {
            seed_url: format!("{base}/"),
            max_cycles: None,
        },
        user_agent: user_agent(),
        storage: StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
        },
    };

    let report = crawl(&config, CancellationToken::new()).await.unwrap();
    assert_eq!(report.scouted, 3);
    assert_eq!(report.alive, 2);
    assert_eq!(report.failed, 1);

    // A second run finds nothing to seed and nothing to scout
    let again = crawl(&config, CancellationToken::new()).await.unwrap();
    assert_eq!(again.scouted, 0);

    let storage = SqliteStorage::open(&db_path).unwrap();
    let stats = load_statistics(&storage).unwrap();
    assert_eq!(stats.total_documents, 3);
    assert_eq!(stats.total_domains, 1);
    assert_eq!(stats.total_links, 2);
    assert_eq!(stats.count(DocumentState::Alive), 2);
    assert_eq!(stats.count(DocumentState::HttpError), 1);
}
