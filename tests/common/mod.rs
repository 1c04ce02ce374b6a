#![allow(dead_code)]

use anyhow::Result;
use serde_json::Value;
use std::fs;
use std::io::{BufRead, BufReader, Write as IoWrite};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc, Mutex, Once};
use std::thread;
use std::time::Duration;

pub const TOOLKIT_APP_ID: &str = "com.elfilibustero.toolkit";

pub fn ensure_test_env() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

pub fn tmp_output_path(test_name: &str) -> PathBuf {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("tmp")
        .join(test_name);
    let _ = fs::remove_dir_all(&dir);
    dir.join("assets").join("app.json")
}

pub fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

#[derive(Clone)]
pub struct ProviderStubResponses {
    pub app_id: String,
    pub app_json: String,
    pub reviews_json: String,
}

impl ProviderStubResponses {
    pub fn toolkit() -> Self {
        let reviews: Vec<Value> = (0..7)
            .map(|idx| {
                serde_json::json!({
                    "reviewId": format!("gp-{idx}"),
                    "content": "Great",
                    "score": 4,
                    "thumbsUpCount": idx,
                    "at": format!("2024-06-{:02}T12:00:00.000+00:00", 20 - idx),
                    "repliedAt": null
                })
            })
            .collect();
        Self {
            app_id: TOOLKIT_APP_ID.to_string(),
            app_json: serde_json::json!({
                "title": "Toolkit",
                "description": "A set of handy tools",
                "version": "2.1.0",
                "score": 4.5,
                "realInstalls": 15_320,
                "installs": "10,000+",
                "released": "Feb 3, 2022",
                "lastUpdatedOn": 1_718_443_800,
                "genre": "Tools"
            })
            .to_string(),
            reviews_json: serde_json::json!({
                "reviews": reviews,
                "continuationToken": "opaque-token"
            })
            .to_string(),
        }
    }
}

pub struct ProviderStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    shutdown: mpsc::Sender<()>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ProviderStub {
    pub fn start(responses: ProviderStubResponses) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        listener.set_nonblocking(true)?;
        let addr = listener.local_addr()?;
        let base_url = format!("http://{}/api", addr);
        let (shutdown, shutdown_rx) = mpsc::channel();
        let shared = Arc::new(responses);
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        let handle = thread::spawn(move || loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }
            match listener.accept() {
                Ok((stream, _)) => {
                    let _ = stream.set_nonblocking(false);
                    let _ = handle_provider_request(stream, &shared, &seen);
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(_) => {
                    thread::sleep(Duration::from_millis(10));
                }
            }
        });

        Ok(Self {
            base_url,
            requests,
            shutdown,
            handle: Some(handle),
        })
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for ProviderStub {
    fn drop(&mut self) {
        let _ = self.shutdown.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn handle_provider_request(
    mut stream: std::net::TcpStream,
    responses: &ProviderStubResponses,
    seen: &Mutex<Vec<String>>,
) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut request_line = String::new();
    if reader.read_line(&mut request_line)? == 0 {
        return Ok(());
    }

    let parts: Vec<&str> = request_line.split_whitespace().collect();
    if parts.len() < 2 {
        return Ok(());
    }
    let method = parts[0];
    let target = origin_form(parts[1]);
    let path_only = target.split('?').next().unwrap_or(&target);

    loop {
        let mut header = String::new();
        if reader.read_line(&mut header)? == 0 {
            break;
        }
        if header == "\r\n" {
            break;
        }
    }

    seen.lock().unwrap().push(target.clone());

    let app_path = format!("/api/apps/{}", responses.app_id);
    let reviews_path = format!("{}/reviews", app_path);
    match method {
        "GET" if path_only == app_path => {
            write_json_response(&mut stream, "200 OK", &responses.app_json)
        }
        "GET" if path_only == reviews_path => {
            write_json_response(&mut stream, "200 OK", &responses.reviews_json)
        }
        _ => write_empty_response(&mut stream, "404 Not Found"),
    }
}

// Normalize absolute-form request targets (proxies).
fn origin_form(raw_target: &str) -> String {
    match raw_target
        .strip_prefix("http://")
        .or_else(|| raw_target.strip_prefix("https://"))
    {
        Some(stripped) => match stripped.find('/') {
            Some(idx) => stripped[idx..].to_string(),
            None => "/".to_string(),
        },
        None => raw_target.to_string(),
    }
}

fn write_json_response(
    stream: &mut std::net::TcpStream,
    status: &str,
    body: &str,
) -> std::io::Result<()> {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes())
}

fn write_empty_response(stream: &mut std::net::TcpStream, status: &str) -> std::io::Result<()> {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        status
    );
    stream.write_all(response.as_bytes())
}
