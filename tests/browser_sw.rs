//! Service worker integration tests: the generated worker in a real browser.
//!
//! A project is generated with the CLI into a temp directory and served over
//! a local HTTP server (service workers require HTTP, not file://) from a
//! sub-directory, so every assertion also covers scope-relative paths.
//!
//! Run with: `cargo test --test browser_sw -- --ignored`

use headless_chrome::{Browser, LaunchOptions, Tab};
use std::io::{Read as _, Write as _};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

const PROJECT: &str = "sw-test";

// ===========================================================================
// Minimal HTTP server for SW testing (SWs require HTTP, not file://)
// ===========================================================================

struct TestServer {
    port: u16,
    offline: Arc<AtomicBool>,
    _stop: std::sync::mpsc::Sender<()>,
}

impl TestServer {
    fn start(root: PathBuf) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = std::sync::mpsc::channel::<()>();
        let offline = Arc::new(AtomicBool::new(false));
        let offline_flag = Arc::clone(&offline);

        thread::spawn(move || {
            listener.set_nonblocking(true).unwrap();
            loop {
                if rx.try_recv().is_ok() {
                    break;
                }
                match listener.accept() {
                    Ok((stream, _)) => {
                        if offline_flag.load(Ordering::SeqCst) {
                            // Dropping the stream unanswered makes fetch() reject.
                            drop(stream);
                            continue;
                        }
                        let root = root.clone();
                        thread::spawn(move || serve_request(stream, &root));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
        });

        Self {
            port,
            offline,
            _stop: tx,
        }
    }

    fn project_url(&self) -> String {
        format!("http://127.0.0.1:{}/{PROJECT}/", self.port)
    }

    fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }
}

fn serve_request(mut stream: std::net::TcpStream, root: &Path) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let mut buf = [0u8; 4096];
    let n = match stream.read(&mut buf) {
        Ok(n) if n > 0 => n,
        _ => return,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    let path = request.split_whitespace().nth(1).unwrap_or("/");
    let rel = path.trim_start_matches('/');
    let file_path = if rel.is_empty() || rel.ends_with('/') {
        root.join(rel).join("index.html")
    } else {
        root.join(rel)
    };

    let (status, body, ct) = if file_path.is_file() {
        let body = std::fs::read(&file_path).unwrap_or_default();
        let ext = file_path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let ct = match ext {
            "html" => "text/html; charset=utf-8",
            "js" => "application/javascript",
            "json" => "application/json",
            "png" => "image/png",
            _ => "application/octet-stream",
        };
        ("200 OK", body, ct)
    } else {
        ("404 Not Found", b"Not Found".to_vec(), "text/plain")
    };

    let header = format!(
        "HTTP/1.1 {status}\r\n\
         Content-Type: {ct}\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n",
        body.len()
    );
    let _ = stream.write_all(header.as_bytes());
    let _ = stream.write_all(&body);
}

// ===========================================================================
// Setup helpers
// ===========================================================================

/// Output root holding the generated project, built once per test binary.
fn generated_root() -> &'static Path {
    static ROOT: OnceLock<TempDir> = OnceLock::new();
    ROOT.get_or_init(|| {
        let dir = TempDir::new().unwrap();
        let status = Command::new(env!("CARGO_BIN_EXE_pwa-shell"))
            .args([
                "--output",
                dir.path().to_str().unwrap(),
                "generate",
                "https://example.com/",
                "SW Test",
                "--icon",
                "default",
            ])
            .status()
            .expect("failed to run pwa-shell");
        assert!(status.success(), "project generation failed");
        dir
    })
    .path()
}

fn browser() -> &'static Browser {
    static B: OnceLock<Browser> = OnceLock::new();
    B.get_or_init(|| {
        Browser::new(LaunchOptions {
            window_size: Some((1280, 800)),
            ..Default::default()
        })
        .expect("failed to launch Chrome")
    })
}

fn start_server() -> TestServer {
    TestServer::start(generated_root().to_path_buf())
}

/// Wait for the service worker to reach the `activated` state.
/// Panics after 10 s if the SW never activates (install/activate failed).
fn wait_for_sw(tab: &Tab) {
    tab.evaluate(
        r#"Promise.race([
            navigator.serviceWorker.ready.then((reg) => {
                const sw = reg.active;
                if (sw && sw.state === 'activated') return 'ok';
                return new Promise((resolve) => {
                    sw.addEventListener('statechange', () => {
                        if (sw.state === 'activated') resolve('ok');
                    });
                });
            }),
            new Promise((_, reject) =>
                setTimeout(() => reject('SW activation timeout (10 s)'), 10000)
            ),
        ])"#,
        true,
    )
    .expect("service worker failed to activate");
}

/// Load the shell, wait for activation, then reload so the worker controls the page.
fn controlled_tab(server: &TestServer) -> Arc<Tab> {
    let tab = browser().new_tab().unwrap();
    tab.navigate_to(&server.project_url())
        .unwrap()
        .wait_until_navigated()
        .unwrap();
    wait_for_sw(&tab);
    tab.navigate_to(&server.project_url())
        .unwrap()
        .wait_until_navigated()
        .unwrap();
    thread::sleep(Duration::from_millis(300));
    tab
}

fn eval_string(tab: &Tab, js: &str) -> String {
    tab.evaluate(js, true)
        .unwrap()
        .value
        .unwrap()
        .as_str()
        .unwrap()
        .to_string()
}

fn eval_bool(tab: &Tab, js: &str) -> bool {
    tab.evaluate(js, true)
        .unwrap()
        .value
        .unwrap()
        .as_bool()
        .unwrap()
}

// ===========================================================================
// Install and activate
// ===========================================================================

#[test]
#[ignore]
fn sw_activates_on_first_load() {
    let server = start_server();
    let tab = browser().new_tab().unwrap();
    tab.navigate_to(&server.project_url())
        .unwrap()
        .wait_until_navigated()
        .unwrap();

    wait_for_sw(&tab);
}

#[test]
#[ignore]
fn sw_precaches_static_assets_relative_to_scope() {
    let server = start_server();
    let tab = browser().new_tab().unwrap();
    tab.navigate_to(&server.project_url())
        .unwrap()
        .wait_until_navigated()
        .unwrap();
    wait_for_sw(&tab);

    let result = eval_string(
        &tab,
        r#"(async () => {
            const cache = await caches.open('pwa-cache-v1');
            const keys = await cache.keys();
            return JSON.stringify(keys.map(r => new URL(r.url).pathname).sort());
        })()"#,
    );
    let urls: Vec<String> = serde_json::from_str(&result).unwrap();
    assert_eq!(
        urls,
        vec![
            format!("/{PROJECT}/"),
            format!("/{PROJECT}/icons/icon-512x512.png"),
            format!("/{PROJECT}/index.html"),
            format!("/{PROJECT}/manifest.json"),
        ]
    );
}

#[test]
#[ignore]
fn sw_activation_leaves_only_current_cache() {
    let server = start_server();
    let tab = controlled_tab(&server);

    let keys = eval_string(&tab, "caches.keys().then(k => JSON.stringify(k))");
    let keys: Vec<String> = serde_json::from_str(&keys).unwrap();
    assert_eq!(keys, vec!["pwa-cache-v1"]);
}

#[test]
#[ignore]
fn sw_controls_page_after_reload() {
    let server = start_server();
    let tab = controlled_tab(&server);

    let controlled = tab
        .evaluate("!!navigator.serviceWorker.controller", false)
        .unwrap()
        .value
        .unwrap()
        .as_bool()
        .unwrap();
    assert!(controlled, "SW should control page after reload");
}

// ===========================================================================
// Fetch strategies
// ===========================================================================

#[test]
#[ignore]
fn sw_does_not_cache_missing_icons() {
    let server = start_server();
    let tab = controlled_tab(&server);

    let status = tab
        .evaluate(
            &format!("fetch('/{PROJECT}/icons/missing.png').then(r => r.status)"),
            true,
        )
        .unwrap()
        .value
        .unwrap()
        .as_u64()
        .unwrap();
    assert_eq!(status, 404);

    let cached = eval_bool(
        &tab,
        &format!(
            r#"(async () => {{
                const cache = await caches.open('pwa-cache-v1');
                return !!(await cache.match('/{PROJECT}/icons/missing.png'));
            }})()"#
        ),
    );
    assert!(!cached, "404 responses should NOT be cached");
}

#[test]
#[ignore]
fn sw_serves_shell_page_when_offline() {
    let server = start_server();
    let tab = controlled_tab(&server);
    server.go_offline();

    let body = eval_string(
        &tab,
        &format!("fetch('/{PROJECT}/inbox/42').then(r => r.text())"),
    );
    assert!(body.contains("<iframe"), "expected the shell page, got: {body}");

    let icon_ok = eval_bool(
        &tab,
        &format!("fetch('/{PROJECT}/icons/other.png').then(r => r.ok)"),
    );
    assert!(icon_ok, "offline icon requests fall back to the cached icon");
}
