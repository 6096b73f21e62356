use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shared::models::{User, UserRole, UserStatus};
use tower::ServiceExt;

use crate::core::server::build_app;
use crate::core::{Config, ServerState};
use crate::db::repository::food::tests::seed_food;
use crate::db::repository::user::{self, tests::seed_user};
use crate::db::test_pool;
use crate::utils::time::{format_date, today};

async fn setup() -> (ServerState, Router) {
    let state = ServerState::new(Config::default(), test_pool().await).unwrap();
    (state.clone(), build_app(state))
}

fn token(state: &ServerState, user: &User) -> String {
    state.jwt_service.generate_token(user).unwrap().0
}

async fn approved_user(state: &ServerState, email: &str) -> User {
    let created = seed_user(&state.pool, email, UserRole::User).await;
    user::set_status(&state.pool, created.id, UserStatus::Approved)
        .await
        .unwrap()
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn health_reports_database() {
    let (_, app) = setup().await;
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn catalog_requires_session() {
    let (_, app) = setup().await;
    let (status, body) = send(&app, "GET", "/api/foods", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    let (status, _) = send(&app, "GET", "/api/foods", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_reject_regular_users() {
    let (state, app) = setup().await;
    let regular = approved_user(&state, "user@example.com").await;
    let pending = seed_user(&state.pool, "pending@example.com", UserRole::User).await;
    let food = seed_food(&state.pool, "Lecsó", "MAIN_COURSE", 1400).await;
    let t = token(&state, &regular);

    let date = "2024-03-01";
    let routes: Vec<(&str, String, Option<Value>)> = vec![
        (
            "POST",
            "/api/foods".into(),
            Some(json!({ "full_name": "Rántott hús", "price": 1800 })),
        ),
        (
            "PUT",
            format!("/api/foods/{}", food.id),
            Some(json!({ "price": 1 })),
        ),
        ("POST", format!("/api/menus/{date}/foods/{}", food.id), None),
        ("DELETE", format!("/api/menus/{date}/foods/{}", food.id), None),
        ("GET", "/api/statistics".into(), None),
        ("GET", "/api/statistics/daily".into(), None),
        ("GET", format!("/api/statistics/users/{}", regular.id), None),
        ("GET", "/api/users/pending".into(), None),
        ("GET", format!("/api/users/{}", pending.id), None),
        ("POST", format!("/api/users/{}/approve", pending.id), None),
        ("POST", format!("/api/users/{}/reject", pending.id), None),
        (
            "POST",
            "/api/order-proof/verify".into(),
            Some(json!({ "code": "{}" })),
        ),
    ];

    for (method, uri, body) in routes {
        let (status, body) = send(&app, method, &uri, Some(&t), body).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
        assert_eq!(body["code"], 2002, "{method} {uri}");
    }

    // Nothing was written on the way to the rejections
    let food_uri = format!("/api/foods/{}", food.id);
    let (status, body) = send(&app, "GET", &food_uri, Some(&t), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], 1400);
    let (_, menu) = send(&app, "GET", &format!("/api/menus/{date}"), Some(&t), None).await;
    assert!(menu.is_null());
    let reloaded = user::get(&state.pool, pending.id).await.unwrap();
    assert_eq!(reloaded.status, UserStatus::Pending);
}

#[tokio::test]
async fn admin_composes_menu() {
    let (state, app) = setup().await;
    let admin = seed_user(&state.pool, "admin@example.com", UserRole::Admin).await;
    let t = token(&state, &admin);

    let (status, body) = send(
        &app,
        "POST",
        "/api/foods",
        Some(&t),
        Some(json!({
            "full_name": "Gulyásleves",
            "category": "SOUP",
            "price": 900,
            "date": "2024-03-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let food_id = body["food"]["id"].as_i64().unwrap();
    assert_eq!(body["menu"]["changed"], true);

    let other = seed_food(&state.pool, "Túrós csusza", "MAIN_COURSE", 1500).await;
    let add_uri = format!("/api/menus/2024-03-01/foods/{}", other.id);
    let (status, body) = send(&app, "POST", &add_uri, Some(&t), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], true);
    let (_, body) = send(&app, "POST", &add_uri, Some(&t), None).await;
    assert_eq!(body["changed"], false);

    let (status, body) = send(&app, "GET", "/api/menus/2024-03-01", Some(&t), None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body["foods"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![food_id, other.id]);

    let (status, body) = send(&app, "DELETE", &add_uri, Some(&t), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], true);

    let (status, body) = send(&app, "GET", "/api/menus/2024-03-02", Some(&t), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());
}

#[tokio::test]
async fn non_canonical_dates_are_rejected() {
    let (state, app) = setup().await;
    let admin = seed_user(&state.pool, "admin@example.com", UserRole::Admin).await;
    let t = token(&state, &admin);

    for uri in ["/api/menus/2024-3-1", "/api/statistics?from=2024-03-01T00:00:00Z"] {
        let (status, body) = send(&app, "GET", uri, Some(&t), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["code"], 5002, "{uri}");
    }

    let (status, body) = send(
        &app,
        "GET",
        "/api/statistics?from=2024-03-02&to=2024-03-01",
        Some(&t),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5003);
}

#[tokio::test]
async fn order_flow_uses_catalog_prices() {
    let (state, app) = setup().await;
    let soup = seed_food(&state.pool, "Gulyásleves", "SOUP", 900).await;
    let main = seed_food(&state.pool, "Pörkölt", "MAIN_COURSE", 1600).await;
    let pending = seed_user(&state.pool, "pending@example.com", UserRole::User).await;
    let date = format_date(today(state.tz()));

    let order = json!({
        "date": date,
        "items": [
            { "food_id": soup.id, "quantity": 2 },
            { "food_id": main.id, "quantity": 1 }
        ]
    });

    let t = token(&state, &pending);

    let mut wrong = order.clone();
    wrong["total_amount"] = json!(1);
    let (status, body) = send(&app, "POST", "/api/orders", Some(&t), Some(wrong)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4004);

    let (status, body) = send(&app, "POST", "/api/orders", Some(&t), Some(order)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_amount"], 3400);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    let order_id = body["id"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", "/api/orders/mine", Some(&t), None).await;
    assert_eq!(status, StatusCode::OK);
    let total: i64 = body
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["total_amount"].as_i64().unwrap())
        .sum();
    assert_eq!(total, 3400);

    let stranger = approved_user(&state, "stranger@example.com").await;
    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/orders/{order_id}"),
        Some(&token(&state, &stranger)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "GET", "/api/orders/1", Some(&t), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);
}

#[tokio::test]
async fn pre_orders_are_listed_under_the_day_they_were_placed() {
    let (state, app) = setup().await;
    let soup = seed_food(&state.pool, "Gulyásleves", "SOUP", 900).await;
    let regular = approved_user(&state, "user@example.com").await;
    let t = token(&state, &regular);
    let today = today(state.tz());
    let tomorrow = format_date(today.succ_opt().unwrap());

    let order = json!({
        "date": tomorrow,
        "items": [{ "food_id": soup.id, "quantity": 1 }]
    });
    let (status, body) = send(&app, "POST", "/api/orders", Some(&t), Some(order)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["menu_date"], tomorrow);

    let uri = format!("/api/orders/mine?date={}", format_date(today));
    let (_, placed_today) = send(&app, "GET", &uri, Some(&t), None).await;
    assert_eq!(placed_today.as_array().unwrap().len(), 1);

    let uri = format!("/api/orders/mine?date={tomorrow}");
    let (_, for_tomorrow) = send(&app, "GET", &uri, Some(&t), None).await;
    assert!(for_tomorrow.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn sign_up_then_sign_in() {
    let (_, app) = setup().await;
    let credentials = json!({
        "full_name": "Nagy Péter",
        "email": "Peter@Example.com",
        "password": "titkos123"
    });

    let (status, body) = send(&app, "POST", "/api/auth/sign-up", None, Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "PENDING");
    assert_eq!(body["role"], "USER");
    assert_eq!(body["image_url"], "");

    let (status, body) = send(&app, "POST", "/api/auth/sign-up", None, Some(credentials)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 3002);

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/sign-in",
        None,
        Some(json!({ "email": "peter@example.com", "password": "titkos123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let session = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&session), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "peter@example.com");

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/sign-in",
        None,
        Some(json!({ "email": "peter@example.com", "password": "rossz-jelszo" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1002);
}

#[tokio::test]
async fn external_bridge_requires_secret() {
    let (_, app) = setup().await;
    let identity = json!({ "email": "sso@example.com", "full_name": "Szabó Éva" });
    let (status, body) = send(&app, "POST", "/api/auth/external", None, Some(identity.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 1005);

    let config = Config {
        external_auth_secret: Some("bridge-secret".into()),
        ..Config::default()
    };
    let state = ServerState::new(config, test_pool().await).unwrap();
    let app = build_app(state);

    let (status, _) = send(&app, "POST", "/api/auth/external", Some("wrong"), Some(identity.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, first) = send(
        &app,
        "POST",
        "/api/auth/external",
        Some("bridge-secret"),
        Some(identity.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["user"]["status"], "PENDING");

    let (_, second) = send(&app, "POST", "/api/auth/external", Some("bridge-secret"), Some(identity)).await;
    assert_eq!(first["user"]["id"], second["user"]["id"]);
}

#[tokio::test]
async fn user_lookup_and_review() {
    let (state, app) = setup().await;
    let admin = seed_user(&state.pool, "admin@example.com", UserRole::Admin).await;
    let t = token(&state, &admin);
    let applicant = seed_user(&state.pool, "new@example.com", UserRole::User).await;

    let (_, body) = send(&app, "GET", "/api/users/pending", Some(&t), None).await;
    assert!(body.as_array().unwrap().iter().any(|u| u["id"] == applicant.id));

    let uri = format!("/api/users/{}", applicant.id);
    let (status, body) = send(&app, "GET", &uri, Some(&t), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "USER");
    assert_eq!(body["status"], "PENDING");
    assert_eq!(body["image_url"], "");

    let (status, body) = send(&app, "POST", &format!("{uri}/approve"), Some(&t), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "APPROVED");

    let (status, body) = send(&app, "GET", "/api/users/12345", Some(&t), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3001);

    let (status, body) = send(&app, "GET", "/api/statistics/users/12345", Some(&t), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3001);
}

#[tokio::test]
async fn own_image_is_resolved_against_endpoint() {
    let config = Config {
        image_url_endpoint: "https://cdn.example.com".into(),
        ..Config::default()
    };
    let state = ServerState::new(config, test_pool().await).unwrap();
    let app = build_app(state.clone());
    let member = approved_user(&state, "pic@example.com").await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/users/me/image",
        Some(&token(&state, &member)),
        Some(json!({ "image_path": "users/pic.jpg" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["image_url"], "https://cdn.example.com/users/pic.jpg");
}

#[tokio::test]
async fn order_proof_round_trip() {
    let (state, app) = setup().await;
    let admin = seed_user(&state.pool, "admin@example.com", UserRole::Admin).await;
    let member = approved_user(&state, "eater@example.com").await;
    let soup = seed_food(&state.pool, "Húsleves", "SOUP", 800).await;
    let member_token = token(&state, &member);
    let date = format_date(today(state.tz()));

    let (status, _) = send(
        &app,
        "POST",
        "/api/orders",
        Some(&member_token),
        Some(json!({ "date": date, "items": [{ "food_id": soup.id, "quantity": 1 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, issued) = send(&app, "GET", "/api/order-proof", Some(&member_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(issued["date"], date.as_str());

    let pending = seed_user(&state.pool, "pending@example.com", UserRole::User).await;
    let (status, body) = send(
        &app,
        "GET",
        "/api/order-proof",
        Some(&token(&state, &pending)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);

    let verify = json!({ "code": issued["code"] });
    let (status, _) = send(
        &app,
        "POST",
        "/api/order-proof/verify",
        Some(&member_token),
        Some(verify.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, scan) = send(
        &app,
        "POST",
        "/api/order-proof/verify",
        Some(&token(&state, &admin)),
        Some(verify),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(scan["user_id"], member.id);
    assert_eq!(scan["total_amount"], 800);
    assert_eq!(scan["image_url"], "");

    let (status, body) = send(
        &app,
        "POST",
        "/api/order-proof/verify",
        Some(&token(&state, &admin)),
        Some(json!({ "code": "forged" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4006);
}
