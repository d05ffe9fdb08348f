use std::collections::BTreeMap;
use std::path::Path;

use tempfile::TempDir;
use triton::config::VirtualHosts;
use triton::http::mime::format_time;
use triton::http::request::{Request, RequestBuilder};
use triton::http::response::{Response, ResponseBuilder, StatusCode};
use triton::http::writer::ResponseWriter;

fn site() -> (TempDir, VirtualHosts) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), b"<h1>hello</h1>").unwrap();
    std::fs::create_dir(dir.path().join("docs")).unwrap();
    std::fs::write(dir.path().join("docs/notes.txt"), b"some notes\n").unwrap();

    let mut hosts = VirtualHosts::new();
    hosts.insert("website1", dir.path());
    hosts.canonicalize().unwrap();
    (dir, hosts)
}

fn get(host: &str, target: &str, close: bool) -> Request {
    RequestBuilder::new()
        .host(host)
        .target(target)
        .close(close)
        .build()
        .unwrap()
}

/// Splits serialized bytes back into status, headers and body.
fn parse_wire(bytes: &[u8]) -> (u16, BTreeMap<String, String>, Vec<u8>) {
    let end = bytes
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("header terminator");
    let head = std::str::from_utf8(&bytes[..end]).unwrap();
    let mut lines = head.split("\r\n");

    let status_line = lines.next().unwrap();
    let mut parts = status_line.splitn(3, ' ');
    assert_eq!(parts.next(), Some("HTTP/1.1"));
    let status = parts.next().unwrap().parse().unwrap();

    let headers = lines
        .map(|l| {
            let (k, v) = l.split_once(": ").unwrap();
            (k.to_string(), v.to_string())
        })
        .collect();
    (status, headers, bytes[end + 4..].to_vec())
}

async fn wire(resp: &Response) -> Vec<u8> {
    let mut out = Vec::new();
    ResponseWriter::new(resp)
        .await
        .unwrap()
        .write_to_stream(&mut out)
        .await
        .unwrap();
    out
}

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
}

#[test]
fn test_response_builder_keeps_explicit_date() {
    let response = ResponseBuilder::new(StatusCode::NotFound)
        .header("Date", "Sun, 06 Nov 1994 08:49:37 GMT")
        .build();

    assert_eq!(response.header("Date"), Some("Sun, 06 Nov 1994 08:49:37 GMT"));
    assert_eq!(response.headers.len(), 1);
}

#[test]
fn test_not_found_echoes_close() {
    let keep = Response::not_found(&get("website1", "/x", false));
    assert_eq!(keep.header("Connection"), None);
    assert!(!keep.closes_connection());

    let close = Response::not_found(&get("website1", "/x", true));
    assert_eq!(close.header("Connection"), Some("close"));
    assert!(close.closes_connection());
}

#[tokio::test]
async fn test_serve_existing_file() {
    let (dir, hosts) = site();
    let resp = Response::serve(&get("website1", "/index.html", false), &hosts).await;

    assert_eq!(resp.status, StatusCode::Ok);
    assert_eq!(resp.header("Content-Type"), Some("text/html"));
    assert_eq!(resp.header("Content-Length"), Some("14"));
    let modified = std::fs::metadata(dir.path().join("index.html"))
        .unwrap()
        .modified()
        .unwrap();
    assert_eq!(resp.header("Last-Modified"), Some(format_time(modified).as_str()));
    assert!(resp.header("Date").is_some());
    assert_eq!(resp.header("Connection"), None);
    assert_eq!(
        resp.file_path.as_deref(),
        Some(std::fs::canonicalize(dir.path()).unwrap().join("index.html").as_path())
    );
}

#[tokio::test]
async fn test_serve_nested_file_with_close() {
    let (_dir, hosts) = site();
    let resp = Response::serve(&get("website1", "/docs/../docs/./notes.txt", true), &hosts).await;

    assert_eq!(resp.status, StatusCode::Ok);
    assert_eq!(resp.header("Content-Type"), Some("text/plain"));
    assert_eq!(resp.header("Connection"), Some("close"));
    assert!(resp.closes_connection());
}

#[tokio::test]
async fn test_serve_not_found_cases() {
    let (_dir, hosts) = site();

    for (host, target) in [
        ("website1", "/missing.html"),
        ("website1", "/docs"),
        ("website1", "/"),
        ("website1", "/../../etc/passwd"),
        ("unknown", "/index.html"),
    ] {
        let resp = Response::serve(&get(host, target, false), &hosts).await;
        assert_eq!(resp.status, StatusCode::NotFound, "{host} {target}");
        assert_eq!(resp.file_path, None);
        let names: Vec<_> = resp.headers.keys().map(String::as_str).collect();
        assert_eq!(names, ["Date"]);
    }
}

#[tokio::test]
async fn test_ok_response_round_trip() {
    let (dir, hosts) = site();
    let resp = Response::serve(&get("website1", "/docs/notes.txt", true), &hosts).await;

    let (status, headers, body) = parse_wire(&wire(&resp).await);

    assert_eq!(status, 200);
    assert_eq!(headers, resp.headers);
    assert_eq!(body, std::fs::read(dir.path().join("docs/notes.txt")).unwrap());
    assert_eq!(headers["Content-Length"], body.len().to_string());
}

#[tokio::test]
async fn test_headers_written_in_name_order() {
    let (_dir, hosts) = site();
    let resp = Response::serve(&get("website1", "/index.html", true), &hosts).await;

    let bytes = wire(&resp).await;
    let head = String::from_utf8_lossy(&bytes);
    let names: Vec<&str> = head
        .split("\r\n")
        .skip(1)
        .take_while(|l| !l.is_empty())
        .map(|l| l.split(':').next().unwrap())
        .collect();

    assert_eq!(
        names,
        ["Connection", "Content-Length", "Content-Type", "Date", "Last-Modified"]
    );
}

#[tokio::test]
async fn test_bad_request_wire_format() {
    let bytes = wire(&Response::bad_request()).await;
    let (status, headers, body) = parse_wire(&bytes);

    assert!(bytes.starts_with(b"HTTP/1.1 400 Bad Request\r\n"));
    assert_eq!(status, 400);
    assert_eq!(headers["Connection"], "close");
    assert!(headers.contains_key("Date"));
    assert!(body.is_empty());
}

#[test]
fn test_doc_root_lookup() {
    let mut hosts = VirtualHosts::new();
    hosts.insert("a", "/srv/a");
    assert_eq!(hosts.doc_root("a"), Some(Path::new("/srv/a")));
    assert_eq!(hosts.doc_root("b"), None);
}

#[tokio::test]
async fn test_serve_from_uncanonicalized_root() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), b"<h1>hello</h1>").unwrap();
    let mut hosts = VirtualHosts::new();
    hosts.insert("website1", dir.path().join("."));

    let resp = Response::serve(&get("website1", "/index.html", false), &hosts).await;
    assert_eq!(resp.status, StatusCode::Ok);

    let escape = Response::serve(&get("website1", "/../index.html", false), &hosts).await;
    assert_eq!(escape.status, StatusCode::NotFound);
}
