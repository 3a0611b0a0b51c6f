//! End-to-end crawl tests against a mock file server

use mirror_crawl::config::Config;
use mirror_crawl::crawler::Crawler;
use mirror_crawl::url::mirror_dir_name;
use std::path::Path;
use tempfile::tempdir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Creates a test configuration mirroring `root` into `output`
fn create_test_config(root: &str, output: &Path, max_depth: u32) -> Config {
    let mut config = Config::default();
    config.crawler.root = root.to_string();
    config.crawler.workers = 4;
    config.crawler.max_depth = max_depth;
    config.crawler.request_timeout = 5;
    config.output.directory = output.display().to_string();
    config
}

/// Directory name the crawler uses for the mock server
fn host_dir(mock_server: &MockServer) -> String {
    let url = url::Url::parse(&mock_server.uri()).expect("Failed to parse base URL");
    mirror_dir_name(&url).expect("Failed to extract host")
}

/// An HTML directory listing with the given hrefs
fn listing(hrefs: &[&str]) -> ResponseTemplate {
    let items: String = hrefs
        .iter()
        .map(|href| format!(r#"<li><a href="{}">{}</a></li>"#, href, href))
        .collect();
    let body = format!(
        "<html><head><title>Directory listing</title></head><body><ul>{}</ul></body></html>",
        items
    );
    ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "text/html; charset=utf-8")
}

fn png(etag: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("etag", etag)
        .set_body_raw(PNG_BYTES.to_vec(), "image/png")
}

async fn mount_get(mock_server: &MockServer, route: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(times)
        .mount(mock_server)
        .await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_mirror_saves_resources_not_pages() {
    let mock_server = MockServer::start().await;
    let output = tempdir().unwrap();

    mount_get(
        &mock_server,
        "/",
        listing(&[
            "child/",
            "image.png",
            "../outside",
            "mailto:admin@example.com",
            "http://google.com",
            "#top",
            "?C=M;O=A",
        ]),
        1,
    )
    .await;
    mount_get(&mock_server, "/child/", listing(&["nested.png", "../image.png"]), 1).await;
    mount_get(&mock_server, "/image.png", png("\"v1\""), 1).await;

    // Depth 3 with max depth 2: discarded without a request
    mount_get(&mock_server, "/child/nested.png", png("\"n1\""), 0).await;

    let root = format!("{}/", mock_server.uri());
    let crawler = Crawler::new(create_test_config(&root, output.path(), 2))
        .await
        .expect("Failed to create crawler");
    let report = crawler.run().await.expect("Crawl failed");

    assert_eq!(report.saved, 1);
    assert_eq!(report.bytes, PNG_BYTES.len() as u64);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(report.unmodified, 0);

    let mirror = output.path().join(host_dir(&mock_server));
    assert_eq!(std::fs::read(mirror.join("image.png")).unwrap(), PNG_BYTES);
    assert!(mirror.join("child").is_dir());
    assert!(!mirror.join("child").join("nested.png").exists());

    // HTML pages become directories, never files
    let mut entries: Vec<String> = std::fs::read_dir(&mirror)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    entries.sort();
    assert_eq!(entries, vec!["child", "image.png"]);

    // Only the image has a cache entry
    assert_eq!(crawler.cache().lookup("image.png").await.unwrap(), "\"v1\"");
    assert_eq!(crawler.cache().lookup("").await.unwrap(), "");
    assert_eq!(crawler.cache().lookup("child/").await.unwrap(), "");
    let shadow = output.path().join(".meta").join(host_dir(&mock_server));
    assert!(shadow.join("image.png").join("tag.txt").is_file());
    assert!(shadow.join("image.png").join("meta.txt").is_file());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_rerun_uses_conditional_requests() {
    let mock_server = MockServer::start().await;
    let output = tempdir().unwrap();
    let root = format!("{}/", mock_server.uri());

    mount_get(&mock_server, "/", listing(&["image.png"]), 1).await;
    mount_get(&mock_server, "/image.png", png("\"v1\""), 1).await;

    let first = Crawler::new(create_test_config(&root, output.path(), 2))
        .await
        .expect("Failed to create crawler")
        .run()
        .await
        .expect("First crawl failed");
    assert_eq!(first.saved, 1);

    mock_server.verify().await;
    mock_server.reset().await;

    mount_get(&mock_server, "/", listing(&["image.png"]), 1).await;
    Mock::given(method("GET"))
        .and(path("/image.png"))
        .and(header("If-None-Match", "\"v1\""))
        .respond_with(ResponseTemplate::new(304))
        .expect(1)
        .mount(&mock_server)
        .await;

    let crawler = Crawler::new(create_test_config(&root, output.path(), 2))
        .await
        .expect("Failed to create crawler");
    let second = crawler.run().await.expect("Second crawl failed");

    assert_eq!(second.saved, 0);
    assert_eq!(second.unmodified, 1);
    assert_eq!(second.failed, 0);

    let mirror = output.path().join(host_dir(&mock_server));
    assert_eq!(std::fs::read(mirror.join("image.png")).unwrap(), PNG_BYTES);
    assert_eq!(crawler.cache().lookup("image.png").await.unwrap(), "\"v1\"");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_changed_resource_is_refreshed() {
    let mock_server = MockServer::start().await;
    let output = tempdir().unwrap();
    let root = format!("{}/", mock_server.uri());

    mount_get(&mock_server, "/", listing(&["notes.txt"]), 1).await;
    mount_get(
        &mock_server,
        "/notes.txt",
        ResponseTemplate::new(200)
            .insert_header("etag", "\"v1\"")
            .set_body_raw(b"first draft".to_vec(), "text/plain"),
        1,
    )
    .await;

    let crawler = Crawler::new(create_test_config(&root, output.path(), 2))
        .await
        .unwrap();
    crawler.run().await.unwrap();

    mock_server.reset().await;
    mount_get(&mock_server, "/", listing(&["notes.txt"]), 1).await;
    Mock::given(method("GET"))
        .and(path("/notes.txt"))
        .and(header("If-None-Match", "\"v1\""))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("etag", "\"v2\"")
                .set_body_raw(b"final".to_vec(), "text/plain"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = crawler.run().await.unwrap();
    assert_eq!(report.saved, 1);

    let mirror = crawler.mirror_root();
    assert_eq!(std::fs::read(mirror.join("notes.txt")).unwrap(), b"final");
    assert_eq!(crawler.cache().lookup("notes.txt").await.unwrap(), "\"v2\"");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_depth_limit_discards_without_fetching() {
    let mock_server = MockServer::start().await;
    let output = tempdir().unwrap();

    mount_get(&mock_server, "/", listing(&["image.png", "sub/"]), 1).await;
    mount_get(&mock_server, "/image.png", png("\"v1\""), 0).await;
    mount_get(&mock_server, "/sub/", listing(&[]), 0).await;

    let root = format!("{}/", mock_server.uri());
    let report = Crawler::new(create_test_config(&root, output.path(), 1))
        .await
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.saved, 0);
    assert_eq!(report.skipped, 2);
    assert_eq!(report.failed, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_nested_resources_follow_tree_shape() {
    let mock_server = MockServer::start().await;
    let output = tempdir().unwrap();

    mount_get(&mock_server, "/", listing(&["docs/"]), 1).await;
    mount_get(&mock_server, "/docs/", listing(&["img/", "readme.txt"]), 1).await;
    mount_get(&mock_server, "/docs/img/", listing(&["logo.png"]), 1).await;
    mount_get(
        &mock_server,
        "/docs/readme.txt",
        ResponseTemplate::new(200).set_body_raw(b"hello".to_vec(), "text/plain"),
        1,
    )
    .await;
    mount_get(&mock_server, "/docs/img/logo.png", png("\"logo\""), 1).await;

    let root = format!("{}/", mock_server.uri());
    let crawler = Crawler::new(create_test_config(&root, output.path(), 4))
        .await
        .unwrap();
    let report = crawler.run().await.unwrap();

    assert_eq!(report.saved, 2);

    let mirror = crawler.mirror_root();
    assert_eq!(std::fs::read(mirror.join("docs/readme.txt")).unwrap(), b"hello");
    assert_eq!(std::fs::read(mirror.join("docs/img/logo.png")).unwrap(), PNG_BYTES);
    assert_eq!(
        crawler.cache().lookup("docs/img/logo.png").await.unwrap(),
        "\"logo\""
    );
    // No etag header: the entry exists but is empty
    assert_eq!(crawler.cache().lookup("docs/readme.txt").await.unwrap(), "");
    assert!(crawler
        .cache()
        .last_fetch("docs/readme.txt")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_duplicate_links_fetched_once() {
    let mock_server = MockServer::start().await;
    let output = tempdir().unwrap();

    mount_get(
        &mock_server,
        "/",
        listing(&["file.bin", "./file.bin", "/file.bin", "file.bin", "dir/", "./dir/"]),
        1,
    )
    .await;
    mount_get(
        &mock_server,
        "/file.bin",
        ResponseTemplate::new(200).set_body_raw(vec![1, 2, 3], "application/octet-stream"),
        1,
    )
    .await;
    mount_get(&mock_server, "/dir/", listing(&["/dir/"]), 1).await;
    // Root-relative links are taken relative to the current page
    mount_get(&mock_server, "/dir/dir/", listing(&[]), 1).await;

    let root = format!("{}/", mock_server.uri());
    let report = Crawler::new(create_test_config(&root, output.path(), 3))
        .await
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.saved, 1);
    assert_eq!(report.failed, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_failures_do_not_stop_crawl() {
    let mock_server = MockServer::start().await;
    let output = tempdir().unwrap();

    mount_get(
        &mock_server,
        "/",
        listing(&["missing.bin", "broken/", "untyped.dat", "good.txt"]),
        1,
    )
    .await;
    mount_get(&mock_server, "/missing.bin", ResponseTemplate::new(404), 1).await;
    mount_get(&mock_server, "/broken/", ResponseTemplate::new(500), 1).await;
    mount_get(
        &mock_server,
        "/untyped.dat",
        ResponseTemplate::new(200).insert_header("content-type", "garbage"),
        1,
    )
    .await;
    mount_get(
        &mock_server,
        "/good.txt",
        ResponseTemplate::new(200).set_body_raw(b"ok".to_vec(), "text/plain"),
        1,
    )
    .await;

    let root = format!("{}/", mock_server.uri());
    let crawler = Crawler::new(create_test_config(&root, output.path(), 2))
        .await
        .unwrap();
    let report = crawler.run().await.unwrap();

    assert_eq!(report.saved, 1);
    assert_eq!(report.failed, 3);

    let mirror = crawler.mirror_root();
    assert!(mirror.join("good.txt").is_file());
    assert!(!mirror.join("missing.bin").exists());
    assert!(!mirror.join("broken").exists());
    assert!(!mirror.join("untyped.dat").exists());
    assert_eq!(crawler.cache().lookup("missing.bin").await.unwrap(), "");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_encoded_names_are_decoded_on_disk() {
    let mock_server = MockServer::start().await;
    let output = tempdir().unwrap();

    mount_get(
        &mock_server,
        "/",
        listing(&["my%20notes.txt", "%2e%2e/escape.txt"]),
        1,
    )
    .await;
    mount_get(
        &mock_server,
        "/my%20notes.txt",
        ResponseTemplate::new(200).set_body_raw(b"notes".to_vec(), "text/plain"),
        1,
    )
    .await;
    mount_get(
        &mock_server,
        "/escape.txt",
        ResponseTemplate::new(200).set_body_raw(b"nope".to_vec(), "text/plain"),
        0,
    )
    .await;

    let root = format!("{}/", mock_server.uri());
    let crawler = Crawler::new(create_test_config(&root, output.path(), 2))
        .await
        .unwrap();
    let report = crawler.run().await.unwrap();

    assert_eq!(report.saved, 1);
    assert_eq!(
        std::fs::read(crawler.mirror_root().join("my notes.txt")).unwrap(),
        b"notes"
    );
    assert!(!output.path().join("escape.txt").exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_multi_segment_links_create_parent_dirs() {
    let mock_server = MockServer::start().await;
    let output = tempdir().unwrap();

    mount_get(
        &mock_server,
        "/",
        listing(&["docs/guide.txt", "top.txt", "./a/b/c/deep.bin"]),
        1,
    )
    .await;
    mount_get(
        &mock_server,
        "/docs/guide.txt",
        ResponseTemplate::new(200).set_body_raw(b"guide".to_vec(), "text/plain"),
        1,
    )
    .await;
    mount_get(
        &mock_server,
        "/top.txt",
        ResponseTemplate::new(200).set_body_raw(b"top".to_vec(), "text/plain"),
        1,
    )
    .await;
    mount_get(
        &mock_server,
        "/a/b/c/deep.bin",
        ResponseTemplate::new(200).set_body_raw(vec![7, 7, 7], "application/octet-stream"),
        1,
    )
    .await;
    // The intermediate directories are never listed
    mount_get(&mock_server, "/docs/", listing(&[]), 0).await;

    let root = format!("{}/", mock_server.uri());
    let crawler = Crawler::new(create_test_config(&root, output.path(), 3))
        .await
        .unwrap();
    let report = crawler.run().await.unwrap();

    assert_eq!(report.saved, 3);
    assert_eq!(report.failed, 0);

    let mirror = crawler.mirror_root();
    assert_eq!(std::fs::read(mirror.join("docs/guide.txt")).unwrap(), b"guide");
    assert_eq!(std::fs::read(mirror.join("top.txt")).unwrap(), b"top");
    assert_eq!(std::fs::read(mirror.join("a/b/c/deep.bin")).unwrap(), vec![7, 7, 7]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_undecodable_link_drops_only_itself() {
    let mock_server = MockServer::start().await;
    let output = tempdir().unwrap();

    mount_get(
        &mock_server,
        "/",
        listing(&["bad%FF.bin", "good.bin", "dir%FE/", "also%20good.bin"]),
        1,
    )
    .await;
    mount_get(
        &mock_server,
        "/good.bin",
        ResponseTemplate::new(200).set_body_raw(vec![1], "application/octet-stream"),
        1,
    )
    .await;
    mount_get(
        &mock_server,
        "/also%20good.bin",
        ResponseTemplate::new(200).set_body_raw(vec![2], "application/octet-stream"),
        1,
    )
    .await;

    let root = format!("{}/", mock_server.uri());
    let crawler = Crawler::new(create_test_config(&root, output.path(), 2))
        .await
        .unwrap();
    let report = crawler.run().await.unwrap();

    // An unmatched request would surface as a 404 failure
    assert_eq!(report.saved, 2);
    assert_eq!(report.failed, 0);

    let mirror = crawler.mirror_root();
    assert!(mirror.join("good.bin").is_file());
    assert!(mirror.join("also good.bin").is_file());
}
