//! Dispatcher behaviour against a live HTTP server on loopback

use std::collections::HashMap;
use std::time::Duration;

use axum::body::Bytes as Body;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use reqwest::Method;
use serde_json::{json, Value};
use url::Url;

use freezer::api::client::{
    ApiClient, ApiError, Dispatch, DispatchRequest, RequestBody, TlsIdentity,
};
use freezer::{Credentials, Session, SessionError};

async fn spawn_server(app: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Url::parse(&format!("http://{}", addr)).unwrap()
}

async fn echo(headers: HeaderMap, body: Body) -> Json<Value> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    Json(json!({
        "authorization": header("authorization"),
        "contentType": header("content-type"),
        "body": String::from_utf8_lossy(&body),
    }))
}

fn test_router() -> Router {
    Router::new()
        .route("/api/echo", post(echo).delete(echo).get(echo))
        .route(
            "/api/forbidden",
            get(|| async { (StatusCode::FORBIDDEN, "no such user") }),
        )
        .route(
            "/api/created",
            post(|| async { (StatusCode::CREATED, "{}") }),
        )
        .route(
            "/api/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        )
        .route(
            "/api/users/login",
            post(|Form(fields): Form<HashMap<String, String>>| async move {
                if fields.get("user").map(String::as_str) == Some("alice")
                    && fields.get("password").map(String::as_str) == Some("hunter2")
                {
                    (
                        StatusCode::OK,
                        Json(json!({
                            "token": "session-token",
                            "cryptoHash": "salt",
                            "capabilities": { "chunkSize": 1024 }
                        })),
                    )
                } else {
                    (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({ "error": "bad credentials" })),
                    )
                }
            }),
        )
}

fn request(method: Method, base: &Url, path: &str, body: RequestBody) -> DispatchRequest {
    DispatchRequest {
        method,
        url: base.join(path).unwrap(),
        token: Some("abc123".to_string()),
        body,
        timeout: None,
    }
}

fn parse(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

#[tokio::test]
async fn test_ok_returns_body_and_sends_bearer_token() {
    let base = spawn_server(test_router()).await;
    let client = ApiClient::new(None).unwrap();

    let bytes = client
        .dispatch(request(Method::GET, &base, "/api/echo", RequestBody::Empty))
        .await
        .unwrap();

    let echoed = parse(&bytes);
    assert_eq!(echoed["authorization"], "Bearer abc123");
    assert_eq!(echoed["body"], "");
}

#[tokio::test]
async fn test_json_body_sets_content_type() {
    let base = spawn_server(test_router()).await;
    let client = ApiClient::new(None).unwrap();

    let body = RequestBody::json(&json!({ "minVersion": 0, "maxVersion": 2 })).unwrap();
    let bytes = client
        .dispatch(request(Method::DELETE, &base, "/api/echo", body))
        .await
        .unwrap();

    let echoed = parse(&bytes);
    assert_eq!(echoed["contentType"], "application/json");
    let sent: Value = serde_json::from_str(echoed["body"].as_str().unwrap()).unwrap();
    assert_eq!(sent, json!({ "minVersion": 0, "maxVersion": 2 }));
}

#[tokio::test]
async fn test_raw_body_is_sent_untouched() {
    let base = spawn_server(test_router()).await;
    let client = ApiClient::new(None).unwrap();

    let raw = b"{not json at all".to_vec();
    let bytes = client
        .dispatch(request(
            Method::POST,
            &base,
            "/api/echo",
            RequestBody::Raw(raw),
        ))
        .await
        .unwrap();

    let echoed = parse(&bytes);
    assert_eq!(echoed["body"], "{not json at all");
    assert!(echoed["contentType"].is_null());
}

#[tokio::test]
async fn test_non_200_is_an_error_with_body_text() {
    let base = spawn_server(test_router()).await;
    let client = ApiClient::new(None).unwrap();

    let err = client
        .dispatch(request(
            Method::GET,
            &base,
            "/api/forbidden",
            RequestBody::Empty,
        ))
        .await
        .unwrap_err();

    match &err {
        ApiError::HttpStatus { status, body, .. } => {
            assert_eq!(*status, StatusCode::FORBIDDEN);
            assert_eq!(body, "no such user");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("403"));
    assert!(err.to_string().contains("no such user"));
}

#[tokio::test]
async fn test_other_2xx_is_not_success() {
    let base = spawn_server(test_router()).await;
    let client = ApiClient::new(None).unwrap();

    let err = client
        .dispatch(request(
            Method::POST,
            &base,
            "/api/created",
            RequestBody::Empty,
        ))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::CREATED));
}

#[tokio::test]
async fn test_request_timeout_is_a_transport_error() {
    let base = spawn_server(test_router()).await;
    let client = ApiClient::new(None).unwrap();

    let mut slow = request(Method::GET, &base, "/api/slow", RequestBody::Empty);
    slow.timeout = Some(Duration::from_millis(100));
    let err = client.dispatch(slow).await.unwrap_err();

    match err {
        ApiError::Transport { source, .. } => assert!(source.is_timeout()),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    // bind and drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base = Url::parse(&format!("http://{}", addr)).unwrap();
    let client = ApiClient::new(None).unwrap();
    let err = client
        .dispatch(request(Method::GET, &base, "/api/echo", RequestBody::Empty))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Transport { .. }));
}

#[tokio::test]
async fn test_login_round_trip() {
    let base = spawn_server(test_router()).await;
    let client = ApiClient::new(None).unwrap();
    let credentials = Credentials {
        user: "alice".to_string(),
        password: "hunter2".to_string(),
        crypto_pass: "secret".to_string(),
    };

    let session = Session::login(&client, base.clone(), &credentials, None, None)
        .await
        .unwrap();

    assert_eq!(session.token, "session-token");
    assert_eq!(session.crypto_hash, "salt");
    assert_eq!(session.capabilities.chunk_size, 1024);

    let encrypted = session.key.encrypt_string("a.txt").unwrap();
    assert_eq!(session.key.decrypt_string(&encrypted).unwrap(), "a.txt");
}

#[tokio::test]
async fn test_login_bad_credentials() {
    let base = spawn_server(test_router()).await;
    let client = ApiClient::new(None).unwrap();
    let credentials = Credentials {
        user: "alice".to_string(),
        password: "wrong".to_string(),
        crypto_pass: "secret".to_string(),
    };

    let err = Session::login(&client, base, &credentials, None, None)
        .await
        .unwrap_err();

    match err {
        SessionError::Api(api) => assert_eq!(api.status(), Some(StatusCode::UNAUTHORIZED)),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_missing_tls_files_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let identity = TlsIdentity {
        cert_path: dir.path().join("client.crt"),
        key_path: dir.path().join("client.key"),
    };

    let err = ApiClient::new(Some(&identity)).unwrap_err();
    match err {
        ApiError::TlsConfig { path, .. } => assert_eq!(path, identity.cert_path),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_garbage_certificate_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let identity = TlsIdentity {
        cert_path: dir.path().join("client.crt"),
        key_path: dir.path().join("client.key"),
    };
    std::fs::write(&identity.cert_path, "this is not a certificate").unwrap();
    std::fs::write(&identity.key_path, "nor is this a key").unwrap();

    let err = ApiClient::new(Some(&identity)).unwrap_err();
    assert!(matches!(err, ApiError::TlsConfig { .. }));
}

/// Write a fresh self-signed certificate and its key into `dir`.
fn self_signed_identity(dir: &std::path::Path, stem: &str) -> TlsIdentity {
    let cert = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let identity = TlsIdentity {
        cert_path: dir.join(format!("{stem}.crt")),
        key_path: dir.join(format!("{stem}.key")),
    };
    std::fs::write(&identity.cert_path, cert.serialize_pem().unwrap()).unwrap();
    std::fs::write(&identity.key_path, cert.serialize_private_key_pem()).unwrap();
    identity
}

#[test]
fn test_valid_tls_identity_builds_client() {
    let dir = tempfile::tempdir().unwrap();
    let identity = self_signed_identity(dir.path(), "client");

    assert!(ApiClient::new(Some(&identity)).is_ok());
}

#[test]
fn test_mismatched_tls_key_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let first = self_signed_identity(dir.path(), "first");
    let second = self_signed_identity(dir.path(), "second");
    let identity = TlsIdentity {
        cert_path: first.cert_path,
        key_path: second.key_path,
    };

    let err = ApiClient::new(Some(&identity)).unwrap_err();
    assert!(matches!(err, ApiError::TlsConfig { .. }));
}
