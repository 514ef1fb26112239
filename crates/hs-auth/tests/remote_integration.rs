//! Remote verification integration tests
//!
//! Runs the authenticator and login handler against axum stub endpoints
//! bound to ephemeral localhost ports.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Form, Json, Router};
use serde_json::json;
use url::Url;

use hs_auth::{HostOutcome, LoginHandler, RemoteAuthenticator, UserProvisioner};
use hs_core::config::{ProvisioningConfig, RemoteConfig, TransportCredentials};
use hs_core::error::VerifyError;
use hs_core::password::verify_password;
use hs_core::store::MemoryUserStore;
use hs_core::traits::{CredentialVerifier, UserStore};
use hs_core::{Credentials, Role, Secret};

const SITE_URL: &str = "https://shop.example.com";

/// A request as seen by the stub endpoint
#[derive(Debug, Clone)]
struct Captured {
    authorization: Option<String>,
    form: HashMap<String, String>,
}

type Captures = Arc<Mutex<Vec<Captured>>>;

/// Serve `router` on an ephemeral port and return its address
async fn spawn_stub(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub listener");
    let addr = listener.local_addr().expect("Failed to read stub address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Stub server failed");
    });
    addr
}

/// Stub that accepts exactly `hypradmin` / `correct` and records requests
async fn spawn_auth_stub() -> (SocketAddr, Captures) {
    async fn handle(
        State(captures): State<Captures>,
        headers: HeaderMap,
        Form(form): Form<HashMap<String, String>>,
    ) -> Json<serde_json::Value> {
        let accepted = form.get("action").map(String::as_str) == Some("authenticate")
            && form.get("username").map(String::as_str) == Some("hypradmin")
            && form.get("password").map(String::as_str) == Some("correct");

        captures.lock().unwrap().push(Captured {
            authorization: headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            form,
        });

        if accepted {
            Json(json!({ "success": true }))
        } else {
            Json(json!({ "success": false, "message": "bad creds" }))
        }
    }

    let captures: Captures = Arc::new(Mutex::new(Vec::new()));
    let router = Router::new()
        .route("/sso", post(handle))
        .with_state(Arc::clone(&captures));
    (spawn_stub(router).await, captures)
}

/// Stub that always answers with a fixed status and body
async fn spawn_fixed_stub(status: StatusCode, body: &'static str) -> SocketAddr {
    let router = Router::new().route("/sso", post(move || async move { (status, body) }));
    spawn_stub(router).await
}

/// Stub that answers only after `delay`
async fn spawn_slow_stub(delay: Duration) -> SocketAddr {
    let router = Router::new().route(
        "/sso",
        post(move || async move {
            tokio::time::sleep(delay).await;
            Json(json!({ "success": true }))
        }),
    );
    spawn_stub(router).await
}

fn remote_config(addr: SocketAddr) -> RemoteConfig {
    RemoteConfig {
        endpoint: Url::parse(&format!("http://{}/sso", addr)).unwrap(),
        timeout: Duration::from_secs(5),
        credentials: Some(TransportCredentials {
            username: "hypr".to_string(),
            password: Secret::from("hypr"),
        }),
        ..RemoteConfig::default()
    }
}

fn authenticator(remote: &RemoteConfig) -> RemoteAuthenticator {
    RemoteAuthenticator::new(remote, SITE_URL).expect("Failed to build authenticator")
}

fn login_handler(remote: &RemoteConfig, store: Arc<MemoryUserStore>) -> LoginHandler {
    LoginHandler::new(
        "hypradmin",
        Arc::new(authenticator(remote)),
        UserProvisioner::new(store, ProvisioningConfig::default()),
    )
}

#[tokio::test]
async fn test_verify_accepts_success_true() {
    let (addr, captures) = spawn_auth_stub().await;
    let auth = authenticator(&remote_config(addr));

    assert!(auth.verify(&Credentials::new("hypradmin", "correct")).await);

    let captured = captures.lock().unwrap().clone();
    assert_eq!(captured.len(), 1);
    let form = &captured[0].form;
    assert_eq!(form["action"], "authenticate");
    assert_eq!(form["username"], "hypradmin");
    assert_eq!(form["password"], "correct");
    assert_eq!(form["site_url"], SITE_URL);
    assert!(form["timestamp"].parse::<u64>().unwrap() > 0);
}

#[tokio::test]
async fn test_transport_credentials_use_basic_auth_header() {
    let (addr, captures) = spawn_auth_stub().await;
    let auth = authenticator(&remote_config(addr));
    assert!(!auth.endpoint().as_str().contains('@'));

    auth.verify(&Credentials::new("hypradmin", "correct")).await;

    let captured = captures.lock().unwrap().clone();
    // base64("hypr:hypr")
    assert_eq!(captured[0].authorization.as_deref(), Some("Basic aHlwcjpoeXBy"));
}

#[tokio::test]
async fn test_no_authorization_header_without_transport_credentials() {
    let (addr, captures) = spawn_auth_stub().await;
    let mut remote = remote_config(addr);
    remote.credentials = None;

    assert!(authenticator(&remote).verify(&Credentials::new("hypradmin", "correct")).await);
    assert!(captures.lock().unwrap()[0].authorization.is_none());
}

#[tokio::test]
async fn test_verify_rejects_success_false_and_surfaces_message() {
    let (addr, _) = spawn_auth_stub().await;
    let auth = authenticator(&remote_config(addr));
    let creds = Credentials::new("hypradmin", "wrong");

    assert!(!auth.verify(&creds).await);
    match auth.check(&creds).await {
        Err(VerifyError::Rejected { message }) => assert_eq!(message.as_deref(), Some("bad creds")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_verify_rejects_non_json_body() {
    let addr = spawn_fixed_stub(StatusCode::OK, "<html>maintenance</html>").await;
    let auth = authenticator(&remote_config(addr));
    let creds = Credentials::new("hypradmin", "correct");

    assert!(!auth.verify(&creds).await);
    assert!(matches!(auth.check(&creds).await, Err(VerifyError::Protocol(_))));
}

#[tokio::test]
async fn test_verify_rejects_missing_success_field() {
    let addr = spawn_fixed_stub(StatusCode::OK, r#"{"message":"ok"}"#).await;
    let auth = authenticator(&remote_config(addr));
    assert!(!auth.verify(&Credentials::new("hypradmin", "correct")).await);
}

#[tokio::test]
async fn test_verify_rejects_http_error() {
    let addr = spawn_fixed_stub(StatusCode::INTERNAL_SERVER_ERROR, r#"{"success":true}"#).await;
    let auth = authenticator(&remote_config(addr));
    let creds = Credentials::new("hypradmin", "correct");

    assert!(!auth.verify(&creds).await);
    assert!(matches!(auth.check(&creds).await, Err(VerifyError::Status(500))));
}

#[tokio::test]
async fn test_verify_rejects_on_timeout() {
    let addr = spawn_slow_stub(Duration::from_secs(3)).await;
    let mut remote = remote_config(addr);
    remote.timeout = Duration::from_millis(200);
    let auth = authenticator(&remote);
    let creds = Credentials::new("hypradmin", "correct");

    match auth.check(&creds).await {
        Err(VerifyError::Transport(reason)) => assert!(reason.contains("timed out")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_verify_rejects_when_endpoint_unreachable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let auth = authenticator(&remote_config(addr));
    assert!(!auth.verify(&Credentials::new("hypradmin", "correct")).await);
}

#[tokio::test]
async fn test_login_success_creates_administrator() {
    let (addr, _) = spawn_auth_stub().await;
    let store = Arc::new(MemoryUserStore::new());
    let handler = login_handler(&remote_config(addr), store.clone());

    let outcome = handler
        .authenticate(HostOutcome::Unresolved, &Credentials::new("hypradmin", "correct"))
        .await;

    let user = match outcome {
        HostOutcome::Resolved(user) => user,
        other => panic!("expected resolved outcome, got {:?}", other),
    };
    assert_eq!(user.login, "hypradmin");
    assert_eq!(user.role, Role::Administrator);
    assert!(user.provenance().sso_user);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_login_wrong_password_fails_without_record() {
    let (addr, _) = spawn_auth_stub().await;
    let store = Arc::new(MemoryUserStore::new());
    let handler = login_handler(&remote_config(addr), store.clone());

    let outcome = handler
        .authenticate(HostOutcome::Unresolved, &Credentials::new("hypradmin", "wrong"))
        .await;

    let error = match outcome {
        HostOutcome::Failed(error) => error,
        other => panic!("expected failure, got {:?}", other),
    };
    assert_eq!(error.code, "authentication_failed");
    assert!(!error.message.contains("bad creds"));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_login_timeout_fails_without_record() {
    let addr = spawn_slow_stub(Duration::from_secs(3)).await;
    let mut remote = remote_config(addr);
    remote.timeout = Duration::from_millis(200);
    let store = Arc::new(MemoryUserStore::new());
    let handler = login_handler(&remote, store.clone());

    let outcome = handler
        .authenticate(HostOutcome::Unresolved, &Credentials::new("hypradmin", "correct"))
        .await;

    assert!(matches!(outcome, HostOutcome::Failed(ref e) if e.code == "authentication_failed"));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_second_login_leaves_record_unchanged() {
    let (addr, captures) = spawn_auth_stub().await;
    let store = Arc::new(MemoryUserStore::new());
    let handler = login_handler(&remote_config(addr), store.clone());
    let creds = Credentials::new("hypradmin", "correct");

    let HostOutcome::Resolved(first) = handler.authenticate(HostOutcome::Unresolved, &creds).await
    else {
        panic!("first login should succeed");
    };

    let HostOutcome::Resolved(second) = handler.authenticate(HostOutcome::Unresolved, &creds).await
    else {
        panic!("second login should succeed");
    };

    assert_eq!(first, second);
    assert_eq!(captures.lock().unwrap().len(), 2);

    let stored = store.find_by_login("hypradmin").await.unwrap().unwrap();
    assert_eq!(stored.role, Role::Administrator);
    assert_eq!(stored.email, "secure-sso@hyperuix.com.au");
    assert!(verify_password(&Secret::from("correct"), &stored.password_hash));
}

#[tokio::test]
async fn test_non_admin_login_never_calls_endpoint() {
    let (addr, captures) = spawn_auth_stub().await;
    let store = Arc::new(MemoryUserStore::new());
    let handler = login_handler(&remote_config(addr), store.clone());

    let outcome = handler
        .authenticate(HostOutcome::Unresolved, &Credentials::new("editor", "correct"))
        .await;

    assert_eq!(outcome, HostOutcome::Unresolved);
    assert!(captures.lock().unwrap().is_empty());
    assert!(store.is_empty());
}
