//! End-to-end API integration tests
//!
//! These tests drive the full router against the in-memory store:
//! - Registration, login and token claims
//! - The authorization gate's header handling
//! - Profile upsert and experience/education history
//! - Account deletion cascade
//! - Posts and the GitHub proxy (stubbed upstream)

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Duration;
use devconnect_api::api;
use devconnect_api::auth::jwt::{create_token, verify_token};
use devconnect_api::config::JwtConfig;
use devconnect_api::domain::user::Email;
use devconnect_api::infrastructure::github::{GithubClient, GithubError};
use devconnect_api::state::AppState;
use serde_json::{json, Value};
use tower::util::ServiceExt; // for oneshot
use uuid::Uuid;

const TEST_SECRET: &str = "integration-test-secret";

/// GitHub stand-in keyed on username
#[derive(Default)]
struct StubGithub {
    calls: AtomicUsize,
}

#[async_trait]
impl GithubClient for StubGithub {
    async fn user_repos(&self, username: &str) -> Result<Value, GithubError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match username {
            "octocat" => Ok(json!([{ "name": "hello-world", "stargazers_count": 42 }])),
            "limited" => Err(GithubError::RateLimited),
            "broken" => Err(GithubError::Status(500)),
            "offline" => Err(GithubError::Transport("connection refused".into())),
            _ => Err(GithubError::NotFound),
        }
    }
}

struct TestApp {
    router: Router,
    state: AppState,
    github: Arc<StubGithub>,
}

/// Setup test application with the in-memory store
fn setup_app() -> TestApp {
    let github = Arc::new(StubGithub::default());
    let jwt = JwtConfig {
        secret: TEST_SECRET.to_string(),
        expiration: Duration::hours(1),
    };
    let state = AppState::in_memory(jwt, github.clone());

    TestApp {
        router: api::router(state.clone()),
        state,
        github,
    }
}

/// Send a request and decode the JSON response
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

/// Register a user and return (token, user id)
async fn register(app: &Router, name: &str, email: &str) -> (String, Uuid) {
    let (status, json) = send(
        app,
        "POST",
        "/api/users",
        None,
        Some(json!({ "name": name, "email": email, "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {}", json);

    let token = json["token"].as_str().unwrap().to_string();
    let user_id = verify_token(&token, TEST_SECRET).unwrap().user.id;
    (token, user_id)
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

async fn create_profile(app: &Router, token: &str) -> Value {
    let (status, json) = send(
        app,
        "POST",
        "/api/profile",
        Some(&bearer(token)),
        Some(json!({ "status": "Developer", "skills": "rust, sql" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "profile upsert failed: {}", json);
    json
}

async fn add_experience(app: &Router, token: &str, title: &str) -> Value {
    let (status, json) = send(
        app,
        "PUT",
        "/api/profile/experience",
        Some(&bearer(token)),
        Some(json!({ "title": title, "company": "Acme", "from": "2019-01-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "add experience failed: {}", json);
    json
}

fn titles(profile: &Value) -> Vec<String> {
    profile["experience"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_and_index() {
    let app = setup_app();

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"API Running");

    let response = app
        .router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_and_login_resolve_same_user() {
    let app = setup_app();

    let (_, user_id) = register(&app.router, "A", "a@x.com").await;

    let (status, json) = send(
        &app.router,
        "POST",
        "/api/auth",
        None,
        Some(json!({ "email": "a@x.com", "password": "secret1" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let token = json["token"].as_str().unwrap();
    let claims = verify_token(token, TEST_SECRET).unwrap();
    assert_eq!(claims.user.id, user_id);
}

#[tokio::test]
async fn test_register_duplicate_email_rejected() {
    let app = setup_app();
    let (_, first_id) = register(&app.router, "A", "a@x.com").await;

    let (status, json) = send(
        &app.router,
        "POST",
        "/api/users",
        None,
        Some(json!({ "name": "B", "email": "A@x.com", "password": "another1" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "errors": [{ "msg": "User already exists" }] }));

    // Still exactly the first record
    let email = Email::new("a@x.com").unwrap();
    let stored = app.state.users.find_by_email(&email).await.unwrap().unwrap();
    assert_eq!(stored.id, first_id);
    assert_eq!(stored.name, "A");
}

#[tokio::test]
async fn test_register_validation_lists_all_fields() {
    let app = setup_app();

    let (status, json) = send(
        &app.router,
        "POST",
        "/api/users",
        None,
        Some(json!({ "email": "not-an-email", "password": "12345" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = json["errors"].as_array().unwrap();
    let params: Vec<_> = errors.iter().map(|e| e["param"].as_str().unwrap()).collect();
    assert_eq!(params, vec!["name", "email", "password"]);
    assert_eq!(
        errors[2]["msg"],
        "Please enter a password with 6 or more characters"
    );
}

#[tokio::test]
async fn test_malformed_body_is_a_validation_error() {
    let app = setup_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/users")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["errors"][0]["param"], "body");
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = setup_app();
    register(&app.router, "A", "a@x.com").await;

    for payload in [
        json!({ "email": "a@x.com", "password": "wrong-password" }),
        json!({ "email": "nobody@x.com", "password": "secret1" }),
    ] {
        let (status, json) = send(&app.router, "POST", "/api/auth", None, Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["errors"][0]["msg"], "Invalid Credentials");
    }

    let (status, json) = send(
        &app.router,
        "POST",
        "/api/auth",
        None,
        Some(json!({ "email": "a@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["errors"][0]["msg"], "Password is required");
}

#[tokio::test]
async fn test_gate_header_variants() {
    let app = setup_app();
    let (token, user_id) = register(&app.router, "A", "a@x.com").await;

    // No header
    let (status, json) = send(&app.router, "GET", "/api/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["msg"], "Missing auth token");

    // Raw token
    let (status, json) = send(&app.router, "GET", "/api/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["_id"], user_id.to_string());

    // Bearer token
    let (status, _) = send(&app.router, "GET", "/api/users", Some(&bearer(&token)), None).await;
    assert_eq!(status, StatusCode::OK);

    // Empty after stripping
    let (status, json) = send(&app.router, "GET", "/api/users", Some("Bearer "), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["msg"], "Missing auth token");

    // Garbage
    let (status, json) = send(&app.router, "GET", "/api/users", Some("Bearer abc"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["msg"], "Invalid auth token");
}

#[tokio::test]
async fn test_gate_rejects_expired_and_foreign_tokens() {
    let app = setup_app();
    let (_, user_id) = register(&app.router, "A", "a@x.com").await;

    let expired = create_token(user_id, TEST_SECRET, Duration::seconds(-30)).unwrap();
    let (status, _) = send(&app.router, "GET", "/api/users", Some(&bearer(&expired)), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let foreign = create_token(user_id, "some-other-secret", Duration::hours(1)).unwrap();
    let (status, _) = send(&app.router, "GET", "/api/users", Some(&bearer(&foreign)), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_current_user_hides_password() {
    let app = setup_app();
    let (token, _) = register(&app.router, "A", "a@x.com").await;

    let (status, json) = send(&app.router, "GET", "/api/users", Some(&bearer(&token)), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "A");
    assert_eq!(json["email"], "a@x.com");
    assert!(json["avatar"].as_str().unwrap().contains("gravatar.com"));
    assert!(json.get("password").is_none());
    assert!(json.get("password_hash").is_none());
}

#[tokio::test]
async fn test_profile_upsert_creates_then_updates_in_place() {
    let app = setup_app();
    let (token, user_id) = register(&app.router, "A", "a@x.com").await;

    let created = create_profile(&app.router, &token).await;
    assert_eq!(created["user"], user_id.to_string());
    assert_eq!(created["status"], "Developer");
    assert_eq!(created["skills"], json!(["rust", "sql"]));
    assert_eq!(created["experience"], json!([]));
    assert_eq!(created["education"], json!([]));

    let (status, updated) = send(
        &app.router,
        "POST",
        "/api/profile",
        Some(&bearer(&token)),
        Some(json!({ "status": "Lead", "skills": ["go"], "company": "Acme" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["_id"], created["_id"]);
    assert_eq!(updated["status"], "Lead");
    assert_eq!(updated["company"], "Acme");

    let (_, all) = send(&app.router, "GET", "/api/profile", None, None).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_profile_upsert_validation() {
    let app = setup_app();
    let (token, _) = register(&app.router, "A", "a@x.com").await;

    let (status, json) = send(
        &app.router,
        "POST",
        "/api/profile",
        Some(&bearer(&token)),
        Some(json!({ "company": "Acme" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["errors"][0]["msg"], "Status is required");
    assert_eq!(json["errors"][1]["msg"], "Skills is required");
}

#[tokio::test]
async fn test_profile_reads() {
    let app = setup_app();
    let (token, user_id) = register(&app.router, "A", "a@x.com").await;

    let (status, json) = send(&app.router, "GET", "/api/profile/me", Some(&bearer(&token)), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["errors"][0]["msg"], "There is no profile for this user");

    create_profile(&app.router, &token).await;

    let (status, me) = send(&app.router, "GET", "/api/profile/me", Some(&bearer(&token)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["user"]["_id"], user_id.to_string());
    assert_eq!(me["user"]["name"], "A");

    let uri = format!("/api/profile/user/{}", user_id);
    let (status, by_id) = send(&app.router, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_id["_id"], me["_id"]);

    let uri = format!("/api/profile/user/{}", Uuid::new_v4());
    let (status, json) = send(&app.router, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["msg"], "Profile not found");

    let (status, json) = send(&app.router, "GET", "/api/profile/user/not-an-id", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["msg"], "Profile not found");

    let (status, all) = send(&app.router, "GET", "/api/profile", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all[0]["user"]["name"], "A");
}

#[tokio::test]
async fn test_experience_requires_profile() {
    let app = setup_app();
    let (token, _) = register(&app.router, "A", "a@x.com").await;

    let (status, json) = send(
        &app.router,
        "PUT",
        "/api/profile/experience",
        Some(&bearer(&token)),
        Some(json!({ "title": "Dev", "company": "Acme", "from": "2019-01-01" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["errors"][0]["msg"], "There is no profile for this user");
}

#[tokio::test]
async fn test_experience_add_and_delete() {
    let app = setup_app();
    let (token, _) = register(&app.router, "A", "a@x.com").await;
    create_profile(&app.router, &token).await;

    add_experience(&app.router, &token, "first").await;
    add_experience(&app.router, &token, "second").await;
    let profile = add_experience(&app.router, &token, "third").await;
    assert_eq!(titles(&profile), vec!["third", "second", "first"]);

    // Unknown id: 400 and nothing removed
    let uri = format!("/api/profile/experience/{}", Uuid::new_v4());
    let (status, json) = send(&app.router, "DELETE", &uri, Some(&bearer(&token)), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["msg"], "Experience not found");

    let (_, me) = send(&app.router, "GET", "/api/profile/me", Some(&bearer(&token)), None).await;
    assert_eq!(titles(&me), vec!["third", "second", "first"]);

    // Known id: exactly one removed, order kept
    let middle = profile["experience"][1]["_id"].as_str().unwrap();
    let uri = format!("/api/profile/experience/{}", middle);
    let (status, after) = send(&app.router, "DELETE", &uri, Some(&bearer(&token)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&after), vec!["third", "first"]);
}

#[tokio::test]
async fn test_experience_validation() {
    let app = setup_app();
    let (token, _) = register(&app.router, "A", "a@x.com").await;
    create_profile(&app.router, &token).await;

    let (status, json) = send(
        &app.router,
        "PUT",
        "/api/profile/experience",
        Some(&bearer(&token)),
        Some(json!({ "title": "Dev" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let params: Vec<_> = json["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["param"].as_str().unwrap())
        .collect();
    assert_eq!(params, vec!["company", "from"]);
}

#[tokio::test]
async fn test_education_add_and_delete() {
    let app = setup_app();
    let (token, _) = register(&app.router, "A", "a@x.com").await;
    create_profile(&app.router, &token).await;

    let (status, profile) = send(
        &app.router,
        "PUT",
        "/api/profile/education",
        Some(&bearer(&token)),
        Some(json!({
            "school": "MIT",
            "degree": "BSc",
            "fieldOfStudy": "CS",
            "from": "2010-09-01",
            "to": "2014-06-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["education"][0]["fieldOfStudy"], "CS");
    assert_eq!(profile["education"][0]["current"], false);

    let (status, json) = send(
        &app.router,
        "DELETE",
        "/api/profile/education/not-an-id",
        Some(&bearer(&token)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["msg"], "Education not found");

    let id = profile["education"][0]["_id"].as_str().unwrap();
    let uri = format!("/api/profile/education/{}", id);
    let (status, after) = send(&app.router, "DELETE", &uri, Some(&bearer(&token)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["education"], json!([]));
}

#[tokio::test]
async fn test_create_post() {
    let app = setup_app();
    let (token, user_id) = register(&app.router, "A", "a@x.com").await;

    let (status, json) = send(
        &app.router,
        "POST",
        "/api/post",
        Some(&bearer(&token)),
        Some(json!({ "text": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["errors"][0]["msg"], "Text is required");

    let (status, post) = send(
        &app.router,
        "POST",
        "/api/post",
        Some(&bearer(&token)),
        Some(json!({ "text": "Hello world" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(post["text"], "Hello world");
    assert_eq!(post["user"], user_id.to_string());
    assert_eq!(post["name"], "A");
    assert_eq!(post["likes"], json!([]));
    assert_eq!(post["comments"], json!([]));

    let stored = app.state.posts.find_by_user(user_id).await.unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn test_post_requires_auth() {
    let app = setup_app();

    let (status, _) = send(
        &app.router,
        "POST",
        "/api/post",
        None,
        Some(json!({ "text": "Hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_account_cascades() {
    let app = setup_app();
    let (token, user_id) = register(&app.router, "A", "a@x.com").await;
    let (other_token, other_id) = register(&app.router, "B", "b@x.com").await;
    create_profile(&app.router, &token).await;

    for (t, text) in [(&token, "mine"), (&other_token, "theirs")] {
        let (status, _) = send(
            &app.router,
            "POST",
            "/api/post",
            Some(&bearer(t)),
            Some(json!({ "text": text })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, json) = send(&app.router, "DELETE", "/api/profile", Some(&bearer(&token)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["msg"], "User deleted");

    assert!(app.state.users.find_by_id(user_id).await.unwrap().is_none());
    assert!(app.state.profiles.find_by_user(user_id).await.unwrap().is_none());
    assert!(app.state.posts.find_by_user(user_id).await.unwrap().is_empty());
    assert_eq!(app.state.posts.find_by_user(other_id).await.unwrap().len(), 1);

    // Token still verifies but the user is gone
    let (status, json) = send(&app.router, "GET", "/api/users", Some(&bearer(&token)), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["msg"], "User not found");

    // The email is free again
    register(&app.router, "A again", "a@x.com").await;
}

#[tokio::test]
async fn test_profile_upsert_after_account_deletion_is_rejected() {
    let app = setup_app();
    let (token, user_id) = register(&app.router, "A", "a@x.com").await;

    let (status, _) = send(&app.router, "DELETE", "/api/profile", Some(&bearer(&token)), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(
        &app.router,
        "POST",
        "/api/profile",
        Some(&bearer(&token)),
        Some(json!({ "status": "Developer", "skills": "rust" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["msg"], "User not found");
    assert!(app.state.profiles.find_by_user(user_id).await.unwrap().is_none());

    let (_, all) = send(&app.router, "GET", "/api/profile", None, None).await;
    assert_eq!(all, json!([]));
}

#[tokio::test(flavor = "current_thread")]
async fn test_concurrent_logins_on_single_thread_runtime() {
    let app = setup_app();
    let (_, user_id) = register(&app.router, "A", "a@x.com").await;

    let login = || {
        send(
            &app.router,
            "POST",
            "/api/auth",
            None,
            Some(json!({ "email": "a@x.com", "password": "secret1" })),
        )
    };
    let (first, second, health) = tokio::join!(
        login(),
        login(),
        send(&app.router, "GET", "/health", None, None)
    );

    for (status, json) in [first, second] {
        assert_eq!(status, StatusCode::OK);
        let token = json["token"].as_str().unwrap();
        assert_eq!(verify_token(token, TEST_SECRET).unwrap().user.id, user_id);
    }
    assert_eq!(health.0, StatusCode::OK);
}

#[tokio::test]
async fn test_github_proxy() {
    let app = setup_app();

    let (status, json) = send(&app.router, "GET", "/api/profile/github/octocat", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json[0]["name"], "hello-world");

    let (status, json) = send(&app.router, "GET", "/api/profile/github/ghost", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["msg"], "No Github profile found");

    let (status, _) = send(&app.router, "GET", "/api/profile/github/limited", None, None).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    let (status, json) = send(&app.router, "GET", "/api/profile/github/broken", None, None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["upstreamStatus"], 500);

    let (status, _) = send(&app.router, "GET", "/api/profile/github/offline", None, None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    assert_eq!(app.github.calls.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_github_invalid_username_skips_upstream() {
    let app = setup_app();

    let (status, _) = send(&app.router, "GET", "/api/profile/github/-bad-", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.github.calls.load(Ordering::SeqCst), 0);
}
