//! End-to-end HTTP scenarios driven over real TCP sockets, matching
//! spec.md §8's literal-byte scenarios and testable properties.

use std::time::Duration;

use objectstored::session::PortRange;
use objectstored::Server;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

async fn spawn_server(authenticate: bool) -> std::net::SocketAddr {
    let server = Server::new("127.0.0.1", 0, authenticate, PortRange { min: 0, max: 0 });
    let listener = server.bind().await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = server.serve(listener).await;
    });
    // give the accept loop a tick to start selecting.
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

async fn roundtrip(addr: std::net::SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();
    stream.shutdown().await.ok();
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    String::from_utf8_lossy(&buf).into_owned()
}

async fn send_and_read_status(addr: std::net::SocketAddr, request: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();
    let mut buf = vec![0u8; 4096];
    let n = stream.read(&mut buf).await.unwrap();
    String::from_utf8_lossy(&buf[..n]).into_owned()
}

#[tokio::test]
async fn put_then_get_round_trips() {
    let addr = spawn_server(false).await;

    let body = "hello world";
    let put = format!(
        "PUT /a HTTP/1.1\r\nContent-Length: {}\r\n\r\n{}",
        body.len(),
        body
    );
    let resp = send_and_read_status(addr, put.as_bytes()).await;
    assert!(resp.starts_with("HTTP/1.1 201 Created\r\n"), "{resp}");

    let get = "GET /a HTTP/1.1\r\n\r\n";
    let resp = send_and_read_status(addr, get.as_bytes()).await;
    assert!(resp.starts_with("HTTP/1.1 200 OK\r\n"), "{resp}");
    assert!(resp.ends_with(body), "{resp}");
}

#[tokio::test]
async fn put_twice_is_not_found_quirk() {
    let addr = spawn_server(false).await;

    let put = "PUT /b HTTP/1.1\r\nContent-Length: 1\r\n\r\nx";
    let first = send_and_read_status(addr, put.as_bytes()).await;
    assert!(first.starts_with("HTTP/1.1 201 Created\r\n"));

    let second = send_and_read_status(addr, put.as_bytes()).await;
    assert!(second.starts_with("HTTP/1.1 404 Not Found\r\n"), "{second}");
}

#[tokio::test]
async fn get_missing_is_not_found() {
    let addr = spawn_server(false).await;
    let resp = send_and_read_status(addr, b"GET /missing HTTP/1.1\r\n\r\n").await;
    assert!(resp.starts_with("HTTP/1.1 404 Not Found\r\n"), "{resp}");
}

#[tokio::test]
async fn delete_is_idempotent_on_status() {
    let addr = spawn_server(false).await;
    let put = "PUT /c HTTP/1.1\r\nContent-Length: 1\r\n\r\ny";
    send_and_read_status(addr, put.as_bytes()).await;

    let first = send_and_read_status(addr, b"DELETE /c HTTP/1.1\r\n\r\n").await;
    assert!(first.starts_with("HTTP/1.1 200 OK\r\n"), "{first}");

    let second = send_and_read_status(addr, b"DELETE /c HTTP/1.1\r\n\r\n").await;
    assert!(second.starts_with("HTTP/1.1 404 Not Found\r\n"), "{second}");
}

#[tokio::test]
async fn auth_required_rejects_then_accepts() {
    let addr = spawn_server(true).await;

    let no_auth = send_and_read_status(addr, b"GET / HTTP/1.1\r\n\r\n").await;
    assert!(no_auth.starts_with("HTTP/1.1 401 Unauthorized\r\n"), "{no_auth}");
    assert!(no_auth.contains("WWW-Authenticate: Basic\r\n"));

    // "Nord":"VPN" is the operator account the CLI seeds at startup; here
    // we just exercise the auth gate with the anonymous carve-out instead
    // since no users are pre-registered in this harness.
    let creds = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, b"anonymous:anything");
    let req = format!("GET / HTTP/1.1\r\nAuthorization: Basic {}\r\n\r\n", creds);
    let resp = roundtrip(addr, &req).await;
    assert!(resp.starts_with("HTTP/1.1 200 OK\r\n"), "{resp}");
}

#[tokio::test]
async fn malformed_request_line_is_bad_request() {
    let addr = spawn_server(false).await;
    let resp = send_and_read_status(addr, b"GET /a\r\n\r\n").await;
    assert!(resp.starts_with("HTTP/1.1 400 Bad Request\r\n"), "{resp}");
}

#[tokio::test]
async fn cross_protocol_visibility_put_http_get_http() {
    // Confirms objects written over HTTP are visible via HTTP listing.
    let addr = spawn_server(false).await;
    let put = "PUT /x HTTP/1.1\r\nContent-Length: 1\r\n\r\nz";
    send_and_read_status(addr, put.as_bytes()).await;

    let resp = send_and_read_status(addr, b"GET / HTTP/1.1\r\n\r\n").await;
    assert!(resp.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(resp.ends_with("/x"), "{resp}");
}
