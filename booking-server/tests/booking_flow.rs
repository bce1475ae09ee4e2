//! End-to-end booking flow tests
//!
//! Drives the real router against an embedded database in a temp dir:
//! public booking requests, capacity conflicts, closed days, admin edits.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::util::ServiceExt;

use booking_server::core::server::build_router;
use booking_server::db::models::User;
use booking_server::db::repository::UserRepository;
use booking_server::{Config, ServerState};

struct TestApp {
    app: Router,
    // Keep the tempdir alive for the duration of the test
    _work_dir: tempfile::TempDir,
}

async fn spawn_app() -> TestApp {
    let work_dir = tempfile::tempdir().expect("tempdir");
    let config = Config::with_overrides(work_dir.path().to_string_lossy(), 0);
    let state = ServerState::initialize(&config).await;

    // Seed one admin and one staff account directly
    let users = UserRepository::new(state.get_db());
    let hash = User::hash_password("secret123").expect("hash");
    users
        .create("admin@example.com", &hash, "admin")
        .await
        .expect("seed admin");
    users
        .create("staff@example.com", &hash, "staff")
        .await
        .expect("seed staff");

    TestApp {
        app: build_router(state),
        _work_dir: work_dir,
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.expect("request");
    let status = response.status();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn post_json(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn put_json(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn login(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        post_json(
            "/api/auth/login",
            json!({"email": email, "password": "secret123"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().expect("token").to_string()
}

/// Record ids may contain ⟨⟩ brackets (keys starting with a digit), which
/// are not valid raw URI characters
fn encode_id(id: &str) -> String {
    id.replace('⟨', "%E2%9F%A8").replace('⟩', "%E2%9F%A9")
}

fn booking_payload(time: &str, party_size: u32) -> Value {
    json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "date": "2025-10-03",
        "time": time,
        "partySize": party_size,
    })
}

#[tokio::test]
async fn public_booking_accepts_until_capacity_then_conflicts() {
    let test = spawn_app().await;

    let (status, body) = send(&test.app, post_json("/api/bookings", booking_payload("12:00", 10), None)).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["partySize"], 10);
    assert!(body["reference"].as_str().unwrap().starts_with("BK-"));

    // 10 + 14 = 24 fills the slot exactly
    let (status, _) = send(&test.app, post_json("/api/bookings", booking_payload("12:00", 14), None)).await;
    assert_eq!(status, StatusCode::CREATED);

    // One more guest tips the first covered slot over the limit
    let (status, body) = send(&test.app, post_json("/api/bookings", booking_payload("12:00", 1), None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["details"]["slot"], "12:00");
    assert_eq!(body["details"]["load"], 25);
    assert_eq!(body["details"]["capacity"], 24);
}

#[tokio::test]
async fn overlapping_earlier_booking_counts_against_later_slots() {
    let test = spawn_app().await;

    // 11:00 + 20 people occupies 11:00 through 13:45
    let (status, _) = send(&test.app, post_json("/api/bookings", booking_payload("11:00", 20), None)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&test.app, post_json("/api/bookings", booking_payload("13:30", 10), None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["details"]["slot"], "13:30");
    assert_eq!(body["details"]["load"], 30);
}

#[tokio::test]
async fn off_grid_time_is_rejected_before_the_capacity_check() {
    let test = spawn_app().await;

    let (status, body) = send(&test.app, post_json("/api/bookings", booking_payload("09:00", 4), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["details"]["time"], "09:00");
}

#[tokio::test]
async fn closed_day_blocks_public_bookings() {
    let test = spawn_app().await;
    let admin = login(&test.app, "admin@example.com").await;

    let (status, _) = send(
        &test.app,
        post_json(
            "/api/closed-days",
            json!({"date": "2025-10-03", "note": "Private event"}),
            Some(&admin),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Listing is public
    let (status, body) = send(&test.app, get("/api/closed-days", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["date"], "2025-10-03");

    let (status, _) = send(&test.app, post_json("/api/bookings", booking_payload("12:00", 2), None)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Duplicate closed day conflicts too
    let (status, _) = send(
        &test.app,
        post_json("/api/closed-days", json!({"date": "2025-10-03"}), Some(&admin)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn editing_a_booking_excludes_its_own_footprint() {
    let test = spawn_app().await;
    let admin = login(&test.app, "admin@example.com").await;

    let (status, body) = send(&test.app, post_json("/api/bookings", booking_payload("18:00", 20), None)).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().expect("id").to_string();

    // Growing 20 -> 22 passes because its own 20 seats are excluded
    let (status, body) = send(
        &test.app,
        put_json(
            &format!("/api/bookings/{}", encode_id(&id)),
            json!({"partySize": 22}),
            Some(&admin),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["partySize"], 22);

    // 25 exceeds the per-slot capacity outright
    let (status, body) = send(
        &test.app,
        put_json(
            &format!("/api/bookings/{}", encode_id(&id)),
            json!({"partySize": 25}),
            Some(&admin),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["details"]["capacity"], 24);
}

#[tokio::test]
async fn arrived_flag_sets_and_toggles() {
    let test = spawn_app().await;
    let admin = login(&test.app, "admin@example.com").await;

    let (_, body) = send(&test.app, post_json("/api/bookings", booking_payload("15:00", 2), None)).await;
    let id = body["id"].as_str().expect("id").to_string();

    let (status, body) = send(
        &test.app,
        put_json(
            &format!("/api/bookings/{}/arrived", encode_id(&id)),
            json!({"arrived": true}),
            Some(&admin),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["arrived"], true);

    // Empty body toggles
    let (status, body) = send(
        &test.app,
        put_json(&format!("/api/bookings/{}/arrived", encode_id(&id)), json!({}), Some(&admin)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["arrived"], false);
}

#[tokio::test]
async fn admin_routes_require_admin_role() {
    let test = spawn_app().await;

    // No token at all
    let (status, _) = send(&test.app, get("/api/bookings/all", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Staff token is authenticated but not authorized
    let staff = login(&test.app, "staff@example.com").await;
    let (status, _) = send(&test.app, get("/api/bookings/all", Some(&staff))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = login(&test.app, "admin@example.com").await;
    let (status, body) = send(&test.app, get("/api/bookings/all", Some(&admin))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_array());
}
