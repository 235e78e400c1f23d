// Integration tests for the HTTP client.
//
// Each test starts a throwaway TCP listener that answers one request with a
// canned HTTP response and hands the raw request text back for inspection.

use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use cybermetrics_core::actions::{auth, health, players};
use cybermetrics_core::api::{ApiClient, ApiError, AuthApi, PlayerApi};
use cybermetrics_core::config::ApiConfig;
use cybermetrics_core::models::LoginRequest;
use cybermetrics_core::session::{Session, SessionContext};

// ===========================================================================
// Test helpers
// ===========================================================================

/// Serve exactly one request with `status` and a JSON `body`. Returns the
/// base URL and a receiver for the raw request.
async fn serve_once(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.ok();
        let _ = tx.send(request);
    });

    (format!("http://{addr}"), rx)
}

/// Read headers plus a Content-Length body.
async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        if let Some(end) = text.find("\r\n\r\n") {
            let content_length = text[..end]
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn client(base_url: &str, session: SessionContext) -> ApiClient {
    let config = ApiConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
    };
    ApiClient::new(&config, session).unwrap()
}

fn logged_in(token: &str) -> SessionContext {
    let session = SessionContext::in_memory();
    session
        .establish(Session {
            token: token.into(),
            user_id: "uid-1".into(),
            email: "scout@example.com".into(),
        })
        .unwrap();
    session
}

fn has_header(request: &str, name: &str) -> bool {
    request
        .lines()
        .any(|l| l.to_ascii_lowercase().starts_with(&format!("{}:", name.to_ascii_lowercase())))
}

// ===========================================================================
// Tests
// ===========================================================================

#[tokio::test]
async fn bearer_header_sent_when_token_present() {
    let (url, rx) = serve_once("200 OK", "[]").await;
    let api = client(&url, logged_in("secret-token"));

    let saved = api.saved_players().await.unwrap();
    assert!(saved.is_empty());

    let request = rx.await.unwrap();
    assert!(request.starts_with("GET /api/players/saved HTTP/1.1"));
    assert!(request
        .lines()
        .any(|l| l.to_ascii_lowercase() == "authorization: bearer secret-token"));
}

#[tokio::test]
async fn no_bearer_header_without_token() {
    let (url, rx) = serve_once("200 OK", r#"{"status": "healthy", "firebase_connected": false}"#).await;
    let api = client(&url, SessionContext::in_memory());

    let health = health::check_health(&api).await.unwrap();
    assert_eq!(health.summary(), "Server is healthy, Firebase is disconnected");

    let request = rx.await.unwrap();
    assert!(request.starts_with("GET /health HTTP/1.1"));
    assert!(!has_header(&request, "authorization"));
}

#[tokio::test]
async fn detail_body_becomes_error_message() {
    let (url, _rx) = serve_once("401 Unauthorized", r#"{"detail": "Invalid email or password"}"#).await;
    let session = SessionContext::in_memory();
    let api = client(&url, session.clone());

    let err = auth::login(&api, &session, "a@b.co", "nope").await.unwrap_err();
    assert_eq!(err.message, "Invalid email or password");
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn server_error_keeps_status() {
    let (url, _rx) = serve_once("403 Forbidden", r#"{"detail": "Not authenticated"}"#).await;
    let api = client(&url, SessionContext::in_memory());

    let err = api.verify().await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Server {
            status: 403,
            detail: Some("Not authenticated".into())
        }
    );
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn error_without_detail_uses_fallback() {
    let (url, _rx) = serve_once("500 Internal Server Error", r#"{"error": "boom"}"#).await;
    let api = client(&url, logged_in("t"));

    let err = players::saved_players(&api).await.unwrap_err();
    assert_eq!(err.message, "Failed to fetch saved players");
}

#[tokio::test]
async fn login_posts_json_and_stores_session() {
    let (url, rx) = serve_once(
        "200 OK",
        r#"{"message": "Login successful", "user_id": "uid-9", "email": "casey@mudville.org", "token": "tok-9"}"#,
    )
    .await;
    let session = SessionContext::in_memory();
    let api = client(&url, session.clone());

    auth::login(&api, &session, "casey@mudville.org", "strike3").await.unwrap();
    assert_eq!(session.token().as_deref(), Some("tok-9"));
    assert_eq!(session.current_user().display_name(), "casey");

    let request = rx.await.unwrap();
    assert!(request.starts_with("POST /api/auth/login HTTP/1.1"));
    assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
    assert!(request.contains(r#""email":"casey@mudville.org""#));
}

#[tokio::test]
async fn search_query_is_percent_encoded() {
    let (url, rx) = serve_once(
        "200 OK",
        r#"[{"id": 1, "name": "Ken Griffey Jr.", "score": 88.2, "image_url": "", "years_active": "1989-2010"}]"#,
    )
    .await;
    let api = client(&url, logged_in("t"));

    let results = api.search("Ken Griffey & Son").await.unwrap();
    assert_eq!(results[0].name, "Ken Griffey Jr.");

    let request = rx.await.unwrap();
    let line = request.lines().next().unwrap();
    assert!(line.starts_with("GET /api/players/search?q=Ken"));
    assert!(line.contains("%26"), "ampersand must be encoded: {line}");
}

#[tokio::test]
async fn put_sends_json_body_with_bearer() {
    let (url, rx) = serve_once("200 OK", r#"{"message": "updated"}"#).await;
    let api = client(&url, logged_in("tok-put"));

    let resp: Value = api
        .put("/api/players/saved/545361", &json!({"name": "Mike Trout", "years_active": "2011-2024"}))
        .await
        .unwrap();
    assert_eq!(resp["message"], "updated");

    let request = rx.await.unwrap();
    assert!(request.starts_with("PUT /api/players/saved/545361 HTTP/1.1"));
    assert!(request
        .lines()
        .any(|l| l.to_ascii_lowercase() == "authorization: bearer tok-put"));
    assert!(request.contains(r#""name":"Mike Trout""#));
    assert!(request.contains(r#""years_active":"2011-2024""#));
}

#[tokio::test]
async fn patch_sends_json_body_and_maps_errors() {
    let (url, rx) = serve_once("404 Not Found", r#"{"detail": "Player not found"}"#).await;
    let api = client(&url, logged_in("t"));

    let err = api
        .patch::<Value, _>("/api/players/saved/1", &json!({"image_url": null}))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ApiError::Server {
            status: 404,
            detail: Some("Player not found".into())
        }
    );

    let request = rx.await.unwrap();
    assert!(request.starts_with("PATCH /api/players/saved/1 HTTP/1.1"));
    assert!(request.contains(r#""image_url":null"#));
}

#[tokio::test]
async fn no_response_is_a_transport_error() {
    // Bind then drop so nothing is listening on the port.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ApiConfig {
        base_url: format!("http://{addr}"),
        timeout_secs: 1,
    };
    let api = ApiClient::new(&config, SessionContext::in_memory()).unwrap();

    let err = api
        .login(&LoginRequest {
            email: "a@b.co".into(),
            password: "pw".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
    assert_eq!(err.user_message("Login failed"), "No response from server");
}

#[tokio::test]
async fn hung_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (_stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
    });

    let config = ApiConfig {
        base_url: format!("http://{addr}"),
        timeout_secs: 1,
    };
    let api = ApiClient::new(&config, SessionContext::in_memory()).unwrap();
    let err = health::check_health(&api).await.unwrap_err();
    assert_eq!(err.message, "No response from server");
}
