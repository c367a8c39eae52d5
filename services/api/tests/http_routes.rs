//! HTTP-level tests: build the router over the in-memory store and a fake
//! image host, then drive it with `oneshot` requests.

use api_lib::config::Config;
use api_lib::web::{self, AppState};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use professor_directory_core::ports::{ImageHostService, PortResult};
use professor_directory_core::{
    AdminIdentity, AuthService, DirectoryService, ImageUpload, InMemoryProfessorStore,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const SECRET: &str = "route-test-secret";

#[derive(Default)]
struct FakeImageHost {
    received: Mutex<Vec<(String, String, usize)>>,
}

#[async_trait]
impl ImageHostService for FakeImageHost {
    async fn upload_image(&self, image: ImageUpload) -> PortResult<String> {
        let url = format!("https://images.example/professors/{}", image.file_name);
        self.received
            .lock()
            .unwrap()
            .push((image.file_name, image.content_type, image.data.len()));
        Ok(url)
    }
}

fn identity() -> AdminIdentity {
    AdminIdentity {
        username: "admin".into(),
        password: "correct horse".into(),
    }
}

fn config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        database_url: "postgres://unused".into(),
        database_max_connections: 1,
        log_level: tracing::Level::INFO,
        cors_origin: "http://localhost:5173".into(),
        admin: identity(),
        admin_is_default: false,
        jwt_secret: SECRET.into(),
        jwt_secret_is_fallback: false,
        image_host: None,
    }
}

struct Harness {
    app: Router,
    store: Arc<InMemoryProfessorStore>,
    images: Arc<FakeImageHost>,
}

fn harness() -> Harness {
    harness_with_images(true)
}

fn harness_with_images(enabled: bool) -> Harness {
    let store = Arc::new(InMemoryProfessorStore::new());
    let images = Arc::new(FakeImageHost::default());
    let image_host = enabled.then(|| images.clone() as Arc<dyn ImageHostService>);
    let state = Arc::new(AppState {
        directory: DirectoryService::new(store.clone()),
        auth: AuthService::new(identity(), SECRET.as_bytes()),
        image_host,
        config: Arc::new(config()),
    });
    Harness {
        app: web::router(state),
        store,
        images,
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.expect("request");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("parse JSON")
    };
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn login(app: &Router) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/admin/login",
            None,
            json!({"username": "admin", "password": "correct horse"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().expect("token").to_string()
}

async fn create(app: &Router, token: &str, name: &str, department: &str, email: &str) -> i64 {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/professors",
            Some(token),
            json!({"full_name": name, "department": department, "email": email}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body["data"]["id"].as_i64().expect("id")
}

#[tokio::test]
async fn login_returns_admin_token_that_verifies() {
    let h = harness();
    let (status, body) = send(
        &h.app,
        json_request(
            "POST",
            "/admin/login",
            None,
            json!({"username": "admin", "password": "correct horse"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["username"], "admin");
    assert_eq!(body["user"]["role"], "admin");

    let token = body["token"].as_str().unwrap();
    let (status, body) = send(
        &h.app,
        json_request("POST", "/admin/verify-token", None, json!({"token": token})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "admin");
    assert_eq!(body["user"]["role"], "admin");
}

#[tokio::test]
async fn bad_logins_and_tokens_are_rejected() {
    let h = harness();

    let (status, body) = send(
        &h.app,
        json_request(
            "POST",
            "/admin/login",
            None,
            json!({"username": "admin", "password": "wrong"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid credentials");

    let (status, _) = send(
        &h.app,
        json_request("POST", "/admin/login", None, json!({"username": "admin"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &h.app,
        json_request("POST", "/admin/verify-token", None, json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &h.app,
        json_request("POST", "/admin/verify-token", None, json!({"token": "junk"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn writes_require_a_bearer_token() {
    let h = harness();
    let payload = json!({"full_name": "Dr. A", "department": "Math", "email": "a@uni.edu"});

    let (status, body) = send(&h.app, json_request("POST", "/professors", None, payload.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = send(
        &h.app,
        json_request("POST", "/professors", Some("forged"), payload),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &h.app,
        json_request("PUT", "/professors/1", None, json!({"notes": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .method("DELETE")
        .uri("/professors/1")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&h.app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert!(h.store.is_empty());
}

#[tokio::test]
async fn expired_token_cannot_write() {
    let h = harness();
    let expired = AuthService::new(identity(), SECRET.as_bytes())
        .with_token_ttl(chrono::Duration::hours(-2))
        .authenticate("admin", "correct horse")
        .unwrap()
        .token;

    let (status, body) = send(
        &h.app,
        json_request(
            "POST",
            "/professors",
            Some(expired.as_str()),
            json!({"full_name": "Dr. A", "department": "Math", "email": "a@uni.edu"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token expired");
}

#[tokio::test]
async fn full_record_lifecycle() {
    let h = harness();
    let token = login(&h.app).await;

    let (status, body) = send(
        &h.app,
        json_request(
            "POST",
            "/professors",
            Some(token.as_str()),
            json!({
                "full_name": "Dr. Eleanor Vance",
                "department": "Physics",
                "email": "e.vance@uni.edu",
                "office_location": "B-204",
                "schedule_monday": "10:00 - 12:00",
                "schedule_tuesday": "Not Available"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Professor created successfully");
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(&h.app, get(&format!("/professors/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    let professor = &body["data"];
    assert_eq!(professor["full_name"], "Dr. Eleanor Vance");
    assert_eq!(professor["office_location"], "B-204");
    assert_eq!(professor["schedule_tuesday"], "Not Available");
    assert_eq!(professor["created_at"], professor["updated_at"]);
    assert_eq!(
        professor["office_hours"],
        json!([{"day": "monday", "hours": "10:00 - 12:00"}])
    );

    let (status, body) = send(
        &h.app,
        json_request(
            "PUT",
            &format!("/professors/{id}"),
            Some(token.as_str()),
            json!({"office_location": null, "notes": "Sabbatical"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Professor updated successfully");

    let (_, body) = send(&h.app, get(&format!("/professors/{id}"))).await;
    assert_eq!(body["data"]["office_location"], Value::Null);
    assert_eq!(body["data"]["notes"], "Sabbatical");
    assert_eq!(body["data"]["email"], "e.vance@uni.edu");

    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/professors/{id}"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&h.app, req).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&h.app, get(&format!("/professors/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Professor not found");
}

#[tokio::test]
async fn validation_failures_map_to_bad_request() {
    let h = harness();
    let token = login(&h.app).await;

    let (status, body) = send(
        &h.app,
        json_request(
            "POST",
            "/professors",
            Some(token.as_str()),
            json!({"full_name": "Dr. A", "department": "Math", "email": "not-an-email"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid email format");

    let (status, body) = send(
        &h.app,
        json_request("POST", "/professors", Some(token.as_str()), json!({"full_name": "Dr. A"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required fields: department, email");
    assert!(h.store.is_empty());

    let id = create(&h.app, &token, "Dr. A", "Math", "a@uni.edu").await;
    let (status, body) = send(
        &h.app,
        json_request("POST", "/professors", Some(token.as_str()), json!({
            "full_name": "Dr. B", "department": "Math", "email": "a@uni.edu"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "A professor with this email already exists.");
    assert_eq!(h.store.len(), 1);

    let (status, _) = send(
        &h.app,
        json_request("PUT", &format!("/professors/{id}"), Some(token.as_str()), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &h.app,
        json_request("PUT", "/professors/999", Some(token.as_str()), json!({"notes": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&h.app, get("/professors/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_filters_and_paginates() {
    let h = harness();
    let token = login(&h.app).await;
    for (name, department, email) in [
        ("Edgar Poe", "Literature", "poe@uni.edu"),
        ("Alice Vance", "Physics", "alice@uni.edu"),
        ("Dora Vance", "History", "dora@uni.edu"),
        ("Bruno Latour", "Physics", "bruno@uni.edu"),
        ("Carla Diaz", "Physics", "carla@uni.edu"),
    ] {
        create(&h.app, &token, name, department, email).await;
    }

    let (status, body) = send(&h.app, get("/professors")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 5);

    let (_, body) = send(&h.app, get("/professors?limit=2&offset=2")).await;
    let names: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["full_name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Carla Diaz", "Dora Vance"]);

    let (_, body) = send(&h.app, get("/professors?search=VANCE")).await;
    assert_eq!(body["count"], 2);

    let (_, body) = send(&h.app, get("/professors?q=vance&department=Physics")).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["full_name"], "Alice Vance");

    let (_, body) = send(&h.app, get("/professors?department=Physics&limit=abc")).await;
    assert_eq!(body["count"], 3);

    let (_, body) = send(&h.app, get("/professors/departments")).await;
    assert_eq!(body["data"], json!(["History", "Literature", "Physics"]));

    let (_, body) = send(&h.app, get("/professors/department/Physics")).await;
    assert_eq!(body["count"], 3);
    assert_eq!(body["data"][0]["full_name"], "Alice Vance");
}

#[tokio::test]
async fn image_upload_proxies_to_host() {
    let h = harness();
    let boundary = "XBOUNDARYX";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"vance.png\"\r\n\
         Content-Type: image/png\r\n\r\nPNGDATA\r\n--{b}--\r\n",
        b = boundary
    );
    let req = Request::builder()
        .method("POST")
        .uri("/images/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let (status, body) = send(&h.app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["url"], "https://images.example/professors/vance.png");

    let received = h.images.received.lock().unwrap();
    assert_eq!(
        received.as_slice(),
        &[("vance.png".to_string(), "image/png".to_string(), 7)]
    );
}

#[tokio::test]
async fn image_upload_rejects_non_images() {
    let h = harness();
    let body = "--B\r\nContent-Disposition: form-data; name=\"image\"; filename=\"notes.txt\"\r\n\
                Content-Type: text/plain\r\n\r\nhello\r\n--B--\r\n";
    let req = Request::builder()
        .method("POST")
        .uri("/images/upload")
        .header(header::CONTENT_TYPE, "multipart/form-data; boundary=B")
        .body(Body::from(body))
        .unwrap();

    let (status, body) = send(&h.app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Uploaded file must be an image");
    assert!(h.images.received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn image_upload_without_host_is_a_server_error() {
    let h = harness_with_images(false);
    let body = "--B\r\nContent-Disposition: form-data; name=\"image\"; filename=\"a.jpg\"\r\n\
                Content-Type: image/jpeg\r\n\r\nJPEG\r\n--B--\r\n";
    let req = Request::builder()
        .method("POST")
        .uri("/images/upload")
        .header(header::CONTENT_TYPE, "multipart/form-data; boundary=B")
        .body(Body::from(body))
        .unwrap();

    let (status, body) = send(&h.app, req).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal server error");
}

#[tokio::test]
async fn health_reports_store_reachability() {
    let h = harness();
    let (status, body) = send(&h.app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests_in_the_envelope() {
    let h = harness();
    let token = login(&h.app).await;

    let (status, body) = send(
        &h.app,
        json_request(
            "POST",
            "/professors",
            Some(token.as_str()),
            json!({"full_name": 42, "department": "Math", "email": "a@uni.edu"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid request body"));
    assert!(h.store.is_empty());

    let req = Request::builder()
        .method("POST")
        .uri("/admin/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&h.app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());

    let req = Request::builder()
        .method("PUT")
        .uri("/professors/1")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from("[1, 2"))
        .unwrap();
    let (status, body) = send(&h.app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}
