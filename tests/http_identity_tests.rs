//! HTTP identity client tests
//! Runs an in-process axum server standing in for the userinfo endpoint.

use authsession::auth::{MemoryNavigator, SessionController, SessionPhase};
use authsession::config::IdentityConfig;
use authsession::error::Error;
use authsession::identity::{HttpIdentityClient, IdentityProvider};
use authsession::storage::{FileStorage, Storage};
use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

async fn userinfo(headers: HeaderMap) -> Response {
    let auth = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    match auth {
        Some("Bearer good") => Json(json!({
            "data": {
                "id": 42,
                "avatar_id": 1,
                "avatar": "a.png",
                "name": "Bob",
                "intro": "hello",
                "background_image_id": 3,
                "background_image": "bg.png"
            }
        }))
        .into_response(),
        Some("Bearer garbled") => (StatusCode::OK, "not json").into_response(),
        _ => StatusCode::UNAUTHORIZED.into_response(),
    }
}

async fn spawn_identity_server() -> String {
    let app = Router::new().route("/api/userinfo", get(userinfo));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn identity_config(base_url: String) -> IdentityConfig {
    IdentityConfig {
        base_url,
        ..IdentityConfig::default()
    }
}

#[tokio::test]
async fn test_fetch_profile_with_token() {
    let base = spawn_identity_server().await;
    let client = HttpIdentityClient::new(&identity_config(base.clone())).unwrap();
    assert_eq!(client.url(), format!("{}/api/userinfo", base));

    let profile = client.fetch_profile(Some("good")).await.unwrap();

    assert_eq!(profile.id, 42);
    assert_eq!(profile.avatar, "a.png");
    assert_eq!(profile.intro.as_deref(), Some("hello"));
    assert_eq!(profile.background_image_id, Some(3));
    assert_eq!(profile.note, None);
}

#[tokio::test]
async fn test_rejected_token() {
    let base = spawn_identity_server().await;
    let client = HttpIdentityClient::new(&identity_config(base)).unwrap();

    let result = client.fetch_profile(Some("bad")).await;
    assert!(matches!(result, Err(Error::IdentityStatus(401))));

    let result = client.fetch_profile(None).await;
    assert!(matches!(result, Err(Error::IdentityStatus(401))));
}

#[tokio::test]
async fn test_malformed_body() {
    let base = spawn_identity_server().await;
    let client = HttpIdentityClient::new(&identity_config(base)).unwrap();

    let result = client.fetch_profile(Some("garbled")).await;
    assert!(matches!(result, Err(Error::Json(_))));
}

#[tokio::test]
async fn test_unreachable_endpoint() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpIdentityClient::new(&identity_config(format!("http://{}", addr))).unwrap();
    let result = client.fetch_profile(Some("good")).await;
    assert!(matches!(result, Err(Error::Http(_))));
}

fn file_backed_session(dir: &TempDir, base: &str) -> (SessionController, Arc<MemoryNavigator>) {
    let storage = Arc::new(FileStorage::open(dir.path()).unwrap());
    let identity = Arc::new(HttpIdentityClient::new(&identity_config(base.to_string())).unwrap());
    let navigator = Arc::new(MemoryNavigator::new("/"));
    let session = SessionController::builder(storage, identity)
        .navigator(navigator.clone())
        .build();
    (session, navigator)
}

#[tokio::test]
async fn test_session_survives_reload() {
    let base = spawn_identity_server().await;
    let dir = TempDir::new().unwrap();

    let (session, _) = file_backed_session(&dir, &base);
    session.login("good", true).unwrap().await.unwrap();
    assert!(session.is_authenticated());
    drop(session);

    // A fresh controller over the same storage restores from the token
    let (reloaded, _) = file_backed_session(&dir, &base);
    assert_eq!(reloaded.phase(), SessionPhase::Pending);
    reloaded.mount().expect("restore should start").await.unwrap();

    assert!(reloaded.is_authenticated());
    assert_eq!(reloaded.user().name, "Bob");
    assert_eq!(reloaded.user().background_img.as_deref(), Some("bg.png"));
    assert!(reloaded.is_remember_me_set().unwrap());
}

#[tokio::test]
async fn test_rejected_token_is_forgotten() {
    let base = spawn_identity_server().await;
    let dir = TempDir::new().unwrap();
    let (session, navigator) = file_backed_session(&dir, &base);

    session.login("bad", true).unwrap().await.unwrap();

    assert_eq!(session.phase(), SessionPhase::Anonymous);
    assert_eq!(navigator.current(), "/");

    let storage = FileStorage::open(dir.path()).unwrap();
    assert_eq!(storage.get("token").unwrap(), None);
    assert_eq!(storage.get("remember_me").unwrap(), None);
}
