//! End-to-end generation against a mock origin.
//!
//! Each test serves a page (and sometimes an icon) from wiremock, runs the
//! public [`Pipeline`], then inspects the project directory on disk.

use image::{ImageFormat, Rgb, RgbImage};
use pwa_shell::config::GeneratorConfig;
use pwa_shell::generate::{PROJECT_FILES, WebManifest};
use pwa_shell::project::Pipeline;
use pwa_shell::types::{GenerationRequest, GenerationResult};
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ===========================================================================
// Helpers
// ===========================================================================

fn pipeline(output: &Path) -> Pipeline {
    let config = GeneratorConfig {
        output_root: output.display().to_string(),
        ..GeneratorConfig::default()
    };
    Pipeline::new(&config).unwrap()
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 90]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

fn icon_dimensions(project_dir: &Path) -> (u32, u32) {
    let bytes = std::fs::read(project_dir.join("icons/icon-512x512.png")).unwrap();
    let img = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
    (img.width(), img.height())
}

fn manifest(project_dir: &Path) -> WebManifest {
    let text = std::fs::read_to_string(project_dir.join("manifest.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn project_dir(result: &GenerationResult) -> &Path {
    match result {
        GenerationResult::Success { project_dir, .. } => Path::new(project_dir),
        GenerationResult::Failure { error, .. } => panic!("generation failed: {error}"),
    }
}

async fn serve_page(server: &MockServer, html: &str) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html; charset=utf-8")
                .set_body_string(html),
        )
        .mount(server)
        .await;
}

// ===========================================================================
// wrap
// ===========================================================================

#[tokio::test]
async fn wrap_uses_page_title_and_ranked_icon() {
    let server = MockServer::start().await;
    serve_page(
        &server,
        r#"<!DOCTYPE html><html><head><title>Mock Mail</title></head>
        <body><img src="/banner.png"><img class="app-icon" src="/logo.png"></body></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "image/png")
                .set_body_bytes(png(200, 100)),
        )
        .mount(&server)
        .await;

    let out = TempDir::new().unwrap();
    let result = pipeline(out.path()).wrap(&server.uri(), None, None).await;

    let dir = project_dir(&result);
    assert_eq!(dir, out.path().join("mock-mail"));
    for file in PROJECT_FILES {
        assert!(dir.join(file).is_file(), "missing {file}");
    }
    assert_eq!(icon_dimensions(dir), (512, 512));

    let manifest = manifest(dir);
    assert_eq!(manifest.name, "Mock Mail");
    assert_eq!(manifest.short_name, "Mock Mail");
    assert_eq!(manifest.start_url, "/");
    assert_eq!(manifest.display, "standalone");
    assert_eq!(manifest.icons.len(), 1);
    assert_eq!(manifest.icons[0].src, "icons/icon-512x512.png");
    assert_eq!(manifest.icons[0].sizes, "512x512");
    assert_eq!(manifest.icons[0].mime_type, "image/png");

    let shell = std::fs::read_to_string(dir.join("index.html")).unwrap();
    assert!(shell.contains(&format!("src=\"{}/\"", server.uri())));
    assert!(shell.contains("<title>Mock Mail</title>"));
}

#[tokio::test]
async fn wrap_without_title_or_icon_falls_back_to_host_and_placeholder() {
    let server = MockServer::start().await;
    serve_page(&server, "<!DOCTYPE html><html><head></head><body><p>hi</p></body></html>").await;
    Mock::given(method("GET"))
        .and(path("/favicon.ico"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let out = TempDir::new().unwrap();
    let result = pipeline(out.path()).wrap(&server.uri(), None, None).await;

    let dir = project_dir(&result);
    assert_eq!(dir, out.path().join("127.0.0.1"));
    assert_eq!(icon_dimensions(dir), (1, 1));

    let manifest = manifest(dir);
    assert_eq!(manifest.name, "127.0.0.1");
    assert_eq!(manifest.icons[0].sizes, "512x512");
}

#[tokio::test]
async fn wrap_prefers_explicit_name() {
    let server = MockServer::start().await;
    serve_page(&server, "<html><head><title>Ignored Title</title></head></html>").await;

    let out = TempDir::new().unwrap();
    let result = pipeline(out.path())
        .wrap(&server.uri(), Some("Inbox Zero Deluxe"), Some("default"))
        .await;

    let dir = project_dir(&result);
    assert_eq!(dir, out.path().join("inbox-zero-deluxe"));
    let manifest = manifest(dir);
    assert_eq!(manifest.name, "Inbox Zero Deluxe");
    assert_eq!(manifest.short_name, "Inbox Zero D...");
}

// ===========================================================================
// generate
// ===========================================================================

#[tokio::test]
async fn unreachable_icon_url_still_generates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone.png"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let out = TempDir::new().unwrap();
    let request = GenerationRequest {
        url: "https://mail.example.com/".into(),
        name: "Mail".into(),
        icon: Some(format!("{}/gone.png", server.uri())),
    };
    let result = pipeline(out.path()).run(&request).await;

    let dir = project_dir(&result);
    assert_eq!(icon_dimensions(dir), (1, 1));
}

#[tokio::test]
async fn regenerating_same_slug_overwrites() {
    let out = TempDir::new().unwrap();
    let pipeline = pipeline(out.path());

    for name in ["My App", "my   app"] {
        let request = GenerationRequest {
            url: "https://example.com/".into(),
            name: name.into(),
            icon: None,
        };
        assert!(pipeline.run(&request).await.is_success());
    }

    let entries: Vec<_> = std::fs::read_dir(out.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(manifest(&out.path().join("my-app")).name, "my   app");
}

#[tokio::test]
async fn invalid_request_writes_nothing() {
    let out = TempDir::new().unwrap();
    let request = GenerationRequest {
        url: String::new(),
        name: "Mail".into(),
        icon: None,
    };
    let result = pipeline(out.path()).run(&request).await;

    assert_eq!(
        result,
        GenerationResult::failure("Missing required parameter: url")
    );
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn result_serializes_with_success_flag() {
    let out = TempDir::new().unwrap();
    let request = GenerationRequest {
        url: "https://example.com/".into(),
        name: "Json".into(),
        icon: None,
    };
    let result = pipeline(out.path()).run(&request).await;

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["files"].as_array().unwrap().len(), 4);
    assert!(value["projectDir"].as_str().unwrap().ends_with("json"));
}
