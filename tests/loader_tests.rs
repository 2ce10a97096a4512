//! Integration tests for catalog loading from files and over HTTP

use std::fs;
use std::path::Path;
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tagpick::{
    CatalogLoader, FileSource, HttpSource, LoaderOptions, TagNode, TagPickError, TagPickResult,
    TagSource,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write(dir: &Path, name: &str, content: &str) {
    let full = dir.join(name);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(full, content).unwrap();
}

fn file_loader(dir: &Path, options: LoaderOptions) -> CatalogLoader {
    CatalogLoader::new(Box::new(FileSource::new(dir)), options)
}

#[tokio::test]
async fn test_empty_manifest_gives_empty_catalog() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "manifest.txt", "");

    let report = file_loader(dir.path(), LoaderOptions::default())
        .load("manifest.txt")
        .await
        .unwrap();

    assert!(report.catalog.is_empty());
    assert!(report.failures.is_empty());
}

#[tokio::test]
async fn test_loads_every_manifest_entry_in_order() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "manifest.txt", "tags/hair.yml\r\ntags/eyes.yaml\n");
    write(dir.path(), "tags/hair.yml", "color:\n  - red hair\n  - neg-bald\n");
    write(dir.path(), "tags/eyes.yaml", "blue: blue eyes\n");

    let report = file_loader(dir.path(), LoaderOptions::default())
        .load("manifest.txt")
        .await
        .unwrap();

    let names: Vec<_> = report.catalog.names().collect();
    assert_eq!(names, vec!["hair", "eyes"]);
    assert_eq!(
        report.catalog.get("eyes"),
        Some(&TagNode::Group(vec![(
            "blue".to_string(),
            TagNode::Leaf("blue eyes".to_string())
        )]))
    );
}

#[tokio::test]
async fn test_duplicate_keys_last_write_wins() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "manifest.txt", "a/style.yml\nb/style.yml\n");
    write(dir.path(), "a/style.yml", "- old\n");
    write(dir.path(), "b/style.yml", "- new\n");

    let report = file_loader(dir.path(), LoaderOptions::default())
        .load("manifest.txt")
        .await
        .unwrap();

    assert_eq!(report.catalog.len(), 1);
    assert_eq!(
        report.catalog.get("style"),
        Some(&TagNode::List(vec![TagNode::Leaf("new".to_string())]))
    );
}

#[tokio::test]
async fn test_multi_document_file_keeps_last() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "manifest.txt", "pose.yml");
    write(dir.path(), "pose.yml", "- sitting\n---\n- standing\n");

    let report = file_loader(dir.path(), LoaderOptions::default())
        .load("manifest.txt")
        .await
        .unwrap();

    assert_eq!(
        report.catalog.get("pose"),
        Some(&TagNode::List(vec![TagNode::Leaf("standing".to_string())]))
    );
}

#[tokio::test]
async fn test_missing_file_aborts_load_by_default() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "manifest.txt", "ok.yml\nmissing.yml\n");
    write(dir.path(), "ok.yml", "- fine\n");

    let err = file_loader(dir.path(), LoaderOptions::default())
        .load("manifest.txt")
        .await
        .unwrap_err();

    assert_eq!(err.failing_path(), Some("missing.yml"));
}

#[tokio::test]
async fn test_broken_files_can_be_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "manifest.txt", "ok.yml\nbroken.yml\nmissing.yml\n");
    write(dir.path(), "ok.yml", "- fine\n");
    write(dir.path(), "broken.yml", "a: [unclosed\n");

    let options = LoaderOptions {
        skip_broken_files: true,
        ..LoaderOptions::default()
    };
    let report = file_loader(dir.path(), options)
        .load("manifest.txt")
        .await
        .unwrap();

    assert_eq!(report.catalog.names().collect::<Vec<_>>(), vec!["ok"]);
    let failed: Vec<_> = report
        .failures
        .iter()
        .filter_map(TagPickError::failing_path)
        .collect();
    assert_eq!(failed, vec!["broken.yml", "missing.yml"]);
}

#[tokio::test]
async fn test_missing_manifest_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = file_loader(dir.path(), LoaderOptions::default())
        .load("nope.txt")
        .await
        .unwrap_err();
    assert_matches!(err, TagPickError::CatalogLoad { ref path, .. } if path == "nope.txt");
}

struct StalledSource;

#[async_trait]
impl TagSource for StalledSource {
    async fn read_text(&self, _path: &str) -> TagPickResult<String> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(String::new())
    }

    fn describe(&self) -> String {
        "stalled".to_string()
    }
}

#[tokio::test]
async fn test_stalled_fetch_times_out() {
    let loader = CatalogLoader::new(
        Box::new(StalledSource),
        LoaderOptions {
            fetch_timeout: Duration::from_millis(50),
            skip_broken_files: false,
        },
    );

    let err = loader.load("manifest.txt").await.unwrap_err();
    assert_matches!(err, TagPickError::CatalogLoad { ref reason, .. } if reason.contains("timed out"));
}

#[tokio::test]
async fn test_http_source_loads_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/file=tmp/easyPromptSelector.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("tags/quality.yml\n"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/file=tmp/tags/quality.yml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("- masterpiece\n- neg-worst quality\n"))
        .mount(&server)
        .await;

    let source = HttpSource::new(&format!("{}/file=tmp", server.uri())).unwrap();
    let loader = CatalogLoader::new(Box::new(source), LoaderOptions::default());
    let report = loader.load("easyPromptSelector.txt").await.unwrap();

    assert_eq!(
        report.catalog.get("quality"),
        Some(&TagNode::List(vec![
            TagNode::Leaf("masterpiece".to_string()),
            TagNode::Leaf("neg-worst quality".to_string()),
        ]))
    );

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    for request in requests {
        let query = request.url.query().unwrap_or_default();
        assert!(query.parse::<i64>().is_ok(), "missing cache-busting query: {query}");
    }
}

#[tokio::test]
async fn test_http_error_status_names_the_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/manifest.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("gone.yml\n"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone.yml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let source = HttpSource::new(&server.uri()).unwrap();
    let loader = CatalogLoader::new(Box::new(source), LoaderOptions::default());
    let err = loader.load("manifest.txt").await.unwrap_err();

    assert_matches!(
        err,
        TagPickError::CatalogLoad { ref path, ref reason } if path == "gone.yml" && reason.contains("404")
    );
}
