//! HTTP surface tests
//!
//! Drives the full router (middleware included) with `tower::ServiceExt::oneshot`
//! against a state initialized in a temp dir.

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shared::ErrorCode;
use shared::models::{ProductCreate, UserRole};
use shop_server::api::build_app;
use shop_server::db::repository::{product, user};
use shop_server::{Config, ServerState};
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "shop-test-boundary";

struct TestApp {
    _dir: TempDir,
    state: ServerState,
    app: Router,
}

impl TestApp {
    async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_overrides(dir.path().to_string_lossy(), 0);
        let state = ServerState::initialize(&config).await.unwrap();
        let app = build_app(state.clone());
        Self {
            _dir: dir,
            state,
            app,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn token_for(&self, email: &str, role: UserRole) -> String {
        let created = user::create(self.state.pool(), "Test User", email, "unused", role)
            .await
            .unwrap();
        self.state
            .get_jwt_service()
            .generate_token(created.id, role)
            .unwrap()
    }

    async fn product(&self, name: &str, price: f64, stock: i64) -> i64 {
        product::create(
            self.state.pool(),
            ProductCreate {
                name: name.to_string(),
                category: "Abayas".to_string(),
                price,
                description: None,
                image: None,
                stock: Some(stock),
            },
        )
        .await
        .unwrap()
        .id
    }

    fn uploads(&self) -> std::path::PathBuf {
        self.state.uploads_dir()
    }
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, ip: &str, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", ip);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Build a multipart body from text fields and an optional `(field, filename, bytes)` file
fn multipart(fields: &[(&str, String)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, filename, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn place_request(token: &str, payment: &str, items: Value, proof: Option<&[u8]>) -> Request<Body> {
    place_request_from(token, "03001234567", payment, items, proof)
}

fn place_request_from(
    token: &str,
    mobile: &str,
    payment: &str,
    items: Value,
    proof: Option<&[u8]>,
) -> Request<Body> {
    let fields = [
        ("name", "Ayesha Khan".to_string()),
        ("mobile", mobile.to_string()),
        ("address", "House 12, Street 4, Lahore".to_string()),
        ("payment", payment.to_string()),
        ("items", items.to_string()),
    ];
    let body = multipart(&fields, proof.map(|data| ("paymentProof", "receipt.png", data)));
    Request::post("/api/orders/place")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([20, 120, 60]));
    let mut buffer = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut buffer), image::ImageFormat::Png)
        .unwrap();
    buffer
}

fn files_in(dir: std::path::PathBuf) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

#[tokio::test]
async fn health_reports_database() {
    let app = TestApp::new().await;
    let (status, body) = app.send(get("/api/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "connected");
}

#[tokio::test]
async fn categories_are_listed() {
    let app = TestApp::new().await;
    let (status, body) = app.send(get("/api/categories", None)).await;

    assert_eq!(status, StatusCode::OK);
    let categories = body["data"].as_array().unwrap();
    assert!(categories.iter().any(|c| *c == "Abayas"));
}

#[tokio::test]
async fn register_login_and_me() {
    let app = TestApp::new().await;
    let ip = "10.1.0.1";

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/auth/register",
            None,
            ip,
            json!({"name": "Sara Ahmed", "email": "Sara@Example.com", "password": "secret123"}),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["email"], "sara@example.com");
    assert_eq!(body["data"]["user"]["role"], "user");

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/auth/register",
            None,
            ip,
            json!({"name": "Sara Again", "email": "sara@example.com", "password": "secret123"}),
        ))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], ErrorCode::EmailAlreadyRegistered.code());

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/auth/login",
            None,
            ip,
            json!({"email": "sara@example.com", "password": "secret123"}),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = app.send(get("/api/auth/me", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Sara Ahmed");

    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/auth/login",
            None,
            ip,
            json!({"email": "sara@example.com", "password": "wrong-password"}),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A regular account cannot use the admin login
    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/admin/login",
            None,
            ip,
            json!({"email": "sara@example.com", "password": "secret123"}),
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn auth_routes_are_rate_limited_per_ip() {
    let app = TestApp::new().await;
    let login = |ip: &str| {
        json_request(
            "POST",
            "/api/auth/login",
            None,
            ip,
            json!({"email": "nobody@example.com", "password": "whatever1"}),
        )
    };

    for _ in 0..5 {
        let (status, _) = app.send(login("10.2.0.1")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
    let (status, body) = app.send(login("10.2.0.1")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], ErrorCode::TooManyRequests.code());

    let (status, _) = app.send(login("10.2.0.2")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_require_admin_role() {
    let app = TestApp::new().await;
    let user_token = app.token_for("user@example.com", UserRole::User).await;
    let admin_token = app.token_for("admin@example.com", UserRole::Admin).await;

    let (status, _) = app.send(get("/api/admin/stats", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.send(get("/api/admin/stats", Some(&user_token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], ErrorCode::AdminRequired.code());

    let (status, _) = app.send(get("/api/admin/stats", Some("not-a-jwt"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    app.product("Silk Abaya", 500.0, 2).await;
    let (status, body) = app.send(get("/api/admin/stats", Some(&admin_token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["productsCount"], 1);
    assert_eq!(body["data"]["lowStock"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/products",
            Some(&user_token),
            "10.3.0.1",
            json!({"name": "Linen Kurta", "category": "Kurtas", "price": 1200}),
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_manages_catalog() {
    let app = TestApp::new().await;
    let admin = app.token_for("admin@example.com", UserRole::Admin).await;
    let ip = "10.4.0.1";

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/products",
            Some(&admin),
            ip,
            json!({"name": "Silk Abaya", "category": " abayas ", "price": 1000, "stock": 4}),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["category"], "Abayas");
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/products",
            Some(&admin),
            ip,
            json!({"name": "Gadget", "category": "Electronics", "price": 10}),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], ErrorCode::InvalidCategory.code());

    let (status, body) = app
        .send(json_request(
            "PUT",
            &format!("/api/products/sale/{id}"),
            Some(&admin),
            ip,
            json!({"isOnSale": true, "discountPercentage": 25}),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["effectivePrice"], 750.0);

    let (_, body) = app.send(get("/api/products/sale", None)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .send(json_request("DELETE", &format!("/api/products/{id}"), Some(&admin), ip, json!({})))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.send(get(&format!("/api/products/{id}"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], ErrorCode::ProductNotFound.code());

    let (_, body) = app.send(get("/api/products/admin/all", Some(&admin))).await;
    assert_eq!(body["data"][0]["isDeleted"], true);

    let (status, body) = app
        .send(json_request(
            "PATCH",
            &format!("/api/products/admin/restore/{id}"),
            Some(&admin),
            ip,
            json!({}),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isDeleted"], false);

    let (_, body) = app.send(get("/api/products", None)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn place_order_over_http() {
    let app = TestApp::new().await;
    let token = app.token_for("buyer@example.com", UserRole::User).await;
    let other = app.token_for("other@example.com", UserRole::User).await;
    let admin = app.token_for("admin@example.com", UserRole::Admin).await;
    let abaya = app.product("Silk Abaya", 500.0, 10).await;
    let scarf = app.product("Chiffon Scarf", 1500.0, 5).await;

    let items = json!([
        {"productId": abaya, "name": "Silk Abaya", "price": 500, "quantity": 2},
        {"productId": scarf, "name": "Chiffon Scarf", "price": 1500, "quantity": 1},
    ]);
    let (status, body) = app
        .send(place_request(&token, "Cash on Delivery", items, None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order placed successfully");
    assert_eq!(body["data"]["totalAmount"], 2700.0);
    assert_eq!(body["data"]["paymentStatus"], "verified");
    assert_eq!(body["data"]["status"], "pending");
    let order_id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = app.send(get(&format!("/api/products/{abaya}"), None)).await;
    assert_eq!(body["data"]["stock"], 8);

    let (status, body) = app.send(get("/api/orders/user", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .send(get(&format!("/api/orders/{order_id}"), Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(get(&format!("/api/orders/{order_id}"), Some(&other)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], ErrorCode::PermissionDenied.code());

    let (status, _) = app
        .send(get(&format!("/api/orders/{order_id}"), Some(&admin)))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(get("/api/orders/all?page=1&limit=5", Some(&admin)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["totalOrders"], 1);
    assert_eq!(body["data"]["pagination"]["ordersPerPage"], 5);

    let (status, body) = app
        .send(json_request(
            "PUT",
            &format!("/api/orders/status/{order_id}"),
            Some(&admin),
            "10.5.0.1",
            json!({"status": "shipped"}),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], ErrorCode::InvalidOrderStatus.code());

    let (status, body) = app
        .send(json_request(
            "PUT",
            &format!("/api/orders/status/{order_id}"),
            Some(&admin),
            "10.5.0.1",
            json!({"status": "approved", "adminResponse": "Packing today"}),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "approved");
    assert_eq!(body["data"]["adminResponse"], "Packing today");

    let (status, body) = app
        .send(json_request("PUT", "/api/orders/verify-payment/1", Some(&admin), "10.5.0.1", json!({})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], ErrorCode::OrderNotFound.code());
}

#[tokio::test]
async fn insufficient_stock_is_reported_with_details() {
    let app = TestApp::new().await;
    let token = app.token_for("buyer@example.com", UserRole::User).await;
    let abaya = app.product("Silk Abaya", 500.0, 10).await;
    let scarf = app.product("Chiffon Scarf", 1500.0, 1).await;

    let items = json!([
        {"productId": abaya, "name": "Silk Abaya", "price": 500, "quantity": 2},
        {"productId": scarf, "name": "Chiffon Scarf", "price": 1500, "quantity": 3},
    ]);
    let (status, body) = app
        .send(place_request(&token, "Cash on Delivery", items, None))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], ErrorCode::InsufficientStock.code());
    assert_eq!(body["details"]["productId"], scarf);
    assert_eq!(body["details"]["requested"], 3);
    assert_eq!(body["details"]["available"], 1);

    let (_, body) = app.send(get(&format!("/api/products/{abaya}"), None)).await;
    assert_eq!(body["data"]["stock"], 10);
}

#[tokio::test]
async fn placement_requires_authentication() {
    let app = TestApp::new().await;
    let body = multipart(&[("items", "[]".to_string())], None);
    let request = Request::post("/api/orders/place")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();

    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], ErrorCode::NotAuthenticated.code());
}

#[tokio::test]
async fn payment_proof_is_stored_and_served() {
    let app = TestApp::new().await;
    let token = app.token_for("buyer@example.com", UserRole::User).await;
    let abaya = app.product("Silk Abaya", 500.0, 10).await;
    let proof = png_bytes();

    let items = json!([{"productId": abaya, "name": "Silk Abaya", "price": 500, "quantity": 1}]);
    let (status, body) = app
        .send(place_request(&token, "JazzCash", items, Some(&proof)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["paymentStatus"], "unverified");
    let url = body["data"]["paymentProof"].as_str().unwrap().to_string();
    assert!(url.starts_with("/uploads/payments/"));

    let response = app.app.clone().oneshot(get(&url, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let served = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(served.as_ref(), proof.as_slice());
}

#[tokio::test]
async fn failed_placement_removes_new_proof() {
    let app = TestApp::new().await;
    let token = app.token_for("buyer@example.com", UserRole::User).await;
    let abaya = app.product("Silk Abaya", 500.0, 1).await;

    let items = json!([{"productId": abaya, "name": "Silk Abaya", "price": 500, "quantity": 5}]);
    let (status, _) = app
        .send(place_request(&token, "Bank Transfer", items, Some(&png_bytes())))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(files_in(app.uploads().join("payments")), 0);
}

#[tokio::test]
async fn invalid_checkout_stores_no_proof() {
    let app = TestApp::new().await;
    let token = app.token_for("buyer@example.com", UserRole::User).await;
    let abaya = app.product("Silk Abaya", 500.0, 10).await;

    let items = json!([{"productId": abaya, "name": "Silk Abaya", "price": 500, "quantity": 1}]);
    let (status, body) = app
        .send(place_request_from(&token, "12345", "JazzCash", items, Some(&png_bytes())))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], ErrorCode::ValidationFailed.code());
    assert_eq!(files_in(app.uploads().join("payments")), 0);
}

#[tokio::test]
async fn failed_order_keeps_proof_of_earlier_order() {
    let app = TestApp::new().await;
    let token = app.token_for("buyer@example.com", UserRole::User).await;
    let abaya = app.product("Silk Abaya", 500.0, 1).await;
    let proof = png_bytes();

    let items = json!([{"productId": abaya, "name": "Silk Abaya", "price": 500, "quantity": 1}]);
    let (status, body) = app
        .send(place_request(&token, "JazzCash", items.clone(), Some(&proof)))
        .await;
    assert_eq!(status, StatusCode::OK);
    let url = body["data"]["paymentProof"].as_str().unwrap().to_string();

    // Same receipt again, now out of stock
    let (status, _) = app
        .send(place_request(&token, "JazzCash", items, Some(&proof)))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let response = app.app.clone().oneshot(get(&url, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(files_in(app.uploads().join("payments")), 1);
}
