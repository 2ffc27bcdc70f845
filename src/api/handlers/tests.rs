//! Router tests over `MemoryStore`, driven in-process with `oneshot`.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use secrecy::SecretString;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use super::{
    auth::{bootstrap_admin, token::TokenConfig, AdminSeed},
    payments::{payment_signature, PaymentGateway},
};
use crate::{
    api::{
        cors_layer, router,
        storage::{MemoryStore, SharedStore},
        AppState,
    },
    model::{BlogCategory, BlogPostInput, ProjectInput, ProjectStatus},
};

const GATEWAY_SECRET: &str = "gateway-test-secret";
const ADMIN_EMAIL: &str = "admin@htyrealty.com";
const ADMIN_PASSWORD: &str = "admin-password";

struct Harness {
    app: Router,
    store: SharedStore,
}

impl Harness {
    async fn new() -> Self {
        Self::with_gateway(PaymentGateway::new(
            Some("rzp_test_key".to_string()),
            Some(SecretString::from(GATEWAY_SECRET.to_string())),
        ))
        .await
    }

    async fn with_gateway(gateway: PaymentGateway) -> Self {
        let store: SharedStore = Arc::new(MemoryStore::new());
        bootstrap_admin(
            store.as_ref(),
            &AdminSeed {
                name: "Admin".to_string(),
                email: ADMIN_EMAIL.to_string(),
                password: SecretString::from(ADMIN_PASSWORD.to_string()),
            },
        )
        .await
        .unwrap();
        let tokens = TokenConfig::new(SecretString::from("router-test-secret".to_string()), 30);
        let state = AppState::new(store.clone(), tokens, gateway);
        Self {
            app: router(state, cors_layer(&[]).unwrap()),
            store,
        }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    async fn register(&self, email: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({"name": "Asha", "email": email, "password": "longenough"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    async fn admin_token(&self) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD})),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    async fn create_order(&self, token: &str) -> String {
        let (status, order) = self
            .send(
                Method::POST,
                "/api/payments/create-order",
                Some(token),
                Some(json!({"amount": 25_000})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        order["id"].as_str().unwrap().to_string()
    }

    /// Verifies `order_id` with a signature made from `key_secret`.
    async fn verify(&self, token: &str, order_id: &str, key_secret: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/api/payments/verify",
            Some(token),
            Some(json!({
                "razorpay_order_id": order_id,
                "razorpay_payment_id": "pay_1",
                "razorpay_signature": payment_signature(key_secret, order_id, "pay_1")
            })),
        )
        .await
    }

    async fn seed_project(&self, slug: &str, status: ProjectStatus) -> Uuid {
        let project = project_input(slug, status).into_project(Uuid::new_v4(), slug.to_string(), Utc::now());
        self.store.insert_project(project).await.unwrap().id
    }
}

fn project_input(slug: &str, status: ProjectStatus) -> ProjectInput {
    ProjectInput {
        title: format!("Project {slug}"),
        slug: slug.to_string(),
        tagline: "Live by the river".to_string(),
        description: "Two and three BHK homes".to_string(),
        location: "Pune".to_string(),
        status,
        hero_image: "https://cdn.example.com/hero.jpg".to_string(),
        images: vec!["https://cdn.example.com/1.jpg".to_string()],
        amenities: vec!["Pool".to_string(), "Gym".to_string()],
        floor_plans: Vec::new(),
        coordinates: None,
    }
}

fn callback(name: &str) -> Value {
    json!({
        "name": name,
        "phone": "+91 98000 00000",
        "email": "lead@example.com",
        "message": "Please call me",
        "inquiry_type": "callback",
        "preferred_time": "Evening"
    })
}

#[tokio::test]
async fn register_then_me_returns_the_account() {
    let harness = Harness::new().await;
    let token = harness.register("asha@example.com").await;

    let (status, me) = harness.get("/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "asha@example.com");
    assert_eq!(me["role"], "user");
    assert!(me.get("password_hash").is_none());
}

#[tokio::test]
async fn register_rejects_duplicates_and_bad_input() {
    let harness = Harness::new().await;
    harness.register("dup@example.com").await;

    let (status, body) = harness
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"name": "Again", "email": "DUP@example.com", "password": "longenough"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Email already registered");

    let (status, body) = harness
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"name": "Short", "email": "short@example.com", "password": "short"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Password must be at least 8 characters");
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let harness = Harness::new().await;
    harness.register("login@example.com").await;

    let (status, body) = harness
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "login@example.com", "password": "wrong-password"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid credentials");

    let (status, _) = harness
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "nobody@example.com", "password": "whatever1"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_requires_a_valid_token() {
    let harness = Harness::new().await;
    let (status, _) = harness.get("/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = harness.get("/api/auth/me", Some("garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn project_listing_filters_by_status() {
    let harness = Harness::new().await;
    harness.seed_project("sky-villas", ProjectStatus::Ongoing).await;
    harness.seed_project("river-towers", ProjectStatus::Completed).await;
    harness.seed_project("hill-crest", ProjectStatus::Ongoing).await;

    let (status, all) = harness.get("/api/projects", None).await;
    assert_eq!(status, StatusCode::OK);
    let slugs: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["sky-villas", "river-towers", "hill-crest"]);

    let (_, ongoing) = harness.get("/api/projects?status=ongoing", None).await;
    assert_eq!(ongoing.as_array().unwrap().len(), 2);

    let (_, upcoming) = harness.get("/api/projects?status=upcoming", None).await;
    assert_eq!(upcoming, json!([]));

    let (_, blank) = harness.get("/api/projects?status=", None).await;
    assert_eq!(blank.as_array().unwrap().len(), 3);

    let (status, body) = harness.get("/api/projects?status=sold", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Unknown project status: sold");
}

#[tokio::test]
async fn project_lookup_by_slug() {
    let harness = Harness::new().await;
    harness.seed_project("sky-villas", ProjectStatus::Upcoming).await;

    let (status, project) = harness.get("/api/projects/sky-villas", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(project["status"], "upcoming");

    let (status, body) = harness.get("/api/projects/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Project not found");
}

#[tokio::test]
async fn admin_routes_reject_anonymous_and_plain_users() {
    let harness = Harness::new().await;
    let user = harness.register("plain@example.com").await;
    let body = serde_json::to_value(project_input("new-one", ProjectStatus::Ongoing)).unwrap();

    let (status, _) = harness
        .send(Method::POST, "/api/projects", None, Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, reply) = harness
        .send(Method::POST, "/api/projects", Some(&user), Some(body))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(reply["detail"], "Admin access required");

    for uri in ["/api/admin/analytics", "/api/contact"] {
        let (status, _) = harness.get(uri, Some(&user)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
        let (status, _) = harness.get(uri, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn admin_project_crud() {
    let harness = Harness::new().await;
    let admin = harness.admin_token().await;

    let mut input = project_input("  Sky Villas Phase II ", ProjectStatus::Upcoming);
    let (status, created) = harness
        .send(
            Method::POST,
            "/api/projects",
            Some(&admin),
            Some(serde_json::to_value(&input).unwrap()),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["slug"], "sky-villas-phase-ii");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, _) = harness
        .send(
            Method::POST,
            "/api/projects",
            Some(&admin),
            Some(serde_json::to_value(&input).unwrap()),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    input.status = ProjectStatus::Ongoing;
    let (status, updated) = harness
        .send(
            Method::PUT,
            &format!("/api/projects/{id}"),
            Some(&admin),
            Some(serde_json::to_value(&input).unwrap()),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "ongoing");
    assert_eq!(updated["created_at"], created["created_at"]);

    let (status, _) = harness
        .send(
            Method::PUT,
            &format!("/api/projects/{}", Uuid::new_v4()),
            Some(&admin),
            Some(serde_json::to_value(&input).unwrap()),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = harness
        .send(Method::DELETE, &format!("/api/projects/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = harness.get("/api/projects/sky-villas-phase-ii", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blog_lists_published_posts_newest_first() {
    let harness = Harness::new().await;
    let now = Utc::now();
    for (slug, category, published, age) in [
        ("old-news", BlogCategory::News, true, 3),
        ("fresh-news", BlogCategory::News, true, 1),
        ("draft-news", BlogCategory::News, false, 0),
        ("site-visit", BlogCategory::Events, true, 2),
    ] {
        let input = BlogPostInput {
            title: slug.to_string(),
            slug: slug.to_string(),
            excerpt: "excerpt".to_string(),
            content: String::new(),
            category,
            image: "img.jpg".to_string(),
            published,
        };
        harness
            .store
            .insert_post(input.into_post(Uuid::new_v4(), slug.to_string(), now - Duration::days(age)))
            .await
            .unwrap();
    }

    let (_, posts) = harness.get("/api/blog", None).await;
    let slugs: Vec<&str> = posts
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["fresh-news", "site-visit", "old-news"]);

    let (_, news) = harness.get("/api/blog?category=news&limit=1", None).await;
    assert_eq!(news.as_array().unwrap().len(), 1);
    assert_eq!(news[0]["slug"], "fresh-news");
    assert_eq!(news[0]["author"], "HTY REALTY");

    let (status, _) = harness.get("/api/blog?category=gossip", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn contact_submission_and_triage() {
    let harness = Harness::new().await;
    let admin = harness.admin_token().await;

    let mut missing = callback("Ravi");
    missing["phone"] = json!("");
    let (status, body) = harness
        .send(Method::POST, "/api/contact", None, Some(missing))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Phone is required");

    let (status, receipt) = harness
        .send(Method::POST, "/api/contact", None, Some(callback("Ravi")))
        .await;
    assert_eq!(status, StatusCode::OK);
    let id = receipt["id"].as_str().unwrap().to_string();

    let (_, inquiries) = harness.get("/api/contact", Some(&admin)).await;
    assert_eq!(inquiries[0]["status"], "new");
    assert_eq!(inquiries[0]["preferred_time"], "Evening");

    for status in ["contacted", "closed", "new", "new"] {
        let (code, _) = harness
            .send(
                Method::PUT,
                &format!("/api/contact/{id}/status?status={status}"),
                Some(&admin),
                None,
            )
            .await;
        assert_eq!(code, StatusCode::OK);
        let (_, listed) = harness.get("/api/contact", Some(&admin)).await;
        assert_eq!(listed[0]["status"], status);
    }

    let (code, _) = harness
        .send(
            Method::PUT,
            &format!("/api/contact/{id}/status?status=archived"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(code, StatusCode::BAD_REQUEST);

    let (code, body) = harness
        .send(
            Method::PUT,
            &format!("/api/contact/{}/status?status=closed", Uuid::new_v4()),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(code, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Inquiry not found");
}

#[tokio::test]
async fn gated_resources_need_a_token() {
    let harness = Harness::new().await;
    let admin = harness.admin_token().await;
    for (title, gated) in [("Brochure", false), ("Price list", true)] {
        let (status, _) = harness
            .send(
                Method::POST,
                "/api/resources",
                Some(&admin),
                Some(json!({
                    "title": title,
                    "description": "",
                    "file_url": "https://cdn.example.com/file.pdf",
                    "category": "brochure",
                    "requires_auth": gated
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, anonymous) = harness.get("/api/resources", None).await;
    assert_eq!(anonymous.as_array().unwrap().len(), 1);
    let (_, expired) = harness.get("/api/resources", Some("not-a-token")).await;
    assert_eq!(expired.as_array().unwrap().len(), 1);

    let user = harness.register("reader@example.com").await;
    let (_, signed_in) = harness
        .get("/api/resources?category=brochure", Some(&user))
        .await;
    assert_eq!(signed_in.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn favorites_are_idempotent() {
    let harness = Harness::new().await;
    let token = harness.register("fan@example.com").await;
    let id = harness.seed_project("sky-villas", ProjectStatus::Ongoing).await;
    let uri = format!("/api/users/favorites/{id}");

    for _ in 0..2 {
        let (status, _) = harness.send(Method::POST, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, favorites) = harness.get("/api/users/favorites", Some(&token)).await;
    assert_eq!(favorites.as_array().unwrap().len(), 1);
    assert_eq!(favorites[0]["slug"], "sky-villas");

    for _ in 0..2 {
        let (status, _) = harness.send(Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, favorites) = harness.get("/api/users/favorites", Some(&token)).await;
    assert_eq!(favorites, json!([]));

    let (status, _) = harness.get("/api/users/favorites", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn analytics_counts_and_payments() {
    let harness = Harness::new().await;
    let admin = harness.admin_token().await;
    let buyer = harness.register("buyer@example.com").await;
    harness.seed_project("sky-villas", ProjectStatus::Ongoing).await;
    harness
        .send(Method::POST, "/api/contact", None, Some(callback("Ravi")))
        .await;

    let (status, order) = harness
        .send(
            Method::POST,
            "/api/payments/create-order",
            Some(&buyer),
            Some(json!({"amount": 50_000})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["currency"], "INR");
    assert_eq!(order["status"], "created");
    assert_eq!(order["key_id"], "rzp_test_key");
    let order_id = order["id"].as_str().unwrap().to_string();

    let (status, body) = harness
        .send(
            Method::POST,
            "/api/payments/verify",
            Some(&buyer),
            Some(json!({
                "razorpay_order_id": order_id,
                "razorpay_payment_id": "pay_1",
                "razorpay_signature": payment_signature("wrong-secret", &order_id, "pay_1")
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Payment verification failed");

    // A failed order stays failed.
    let (status, _) = harness
        .send(
            Method::POST,
            "/api/payments/verify",
            Some(&buyer),
            Some(json!({
                "razorpay_order_id": order_id,
                "razorpay_payment_id": "pay_1",
                "razorpay_signature": payment_signature(GATEWAY_SECRET, &order_id, "pay_1")
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let retry_id = harness.create_order(&buyer).await;
    let (status, _) = harness.verify(&buyer, &retry_id, GATEWAY_SECRET).await;
    assert_eq!(status, StatusCode::OK);

    let (status, analytics) = harness.get("/api/admin/analytics", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        analytics,
        json!({
            "projects": 1,
            "inquiries": 1,
            "new_inquiries": 1,
            "users": 1,
            "transactions": 2,
            "successful_payments": 1
        })
    );
}

#[tokio::test]
async fn verify_is_limited_to_own_created_orders() {
    let harness = Harness::new().await;
    let admin = harness.admin_token().await;
    let owner = harness.register("owner@example.com").await;
    let intruder = harness.register("intruder@example.com").await;

    let order_id = harness.create_order(&owner).await;
    let (status, _) = harness.verify(&owner, &order_id, GATEWAY_SECRET).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = harness.verify(&intruder, &order_id, "wrong-secret").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Order not found");

    // The owner cannot downgrade a paid order either.
    let (status, _) = harness.verify(&owner, &order_id, "wrong-secret").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, analytics) = harness.get("/api/admin/analytics", Some(&admin)).await;
    assert_eq!(analytics["successful_payments"], 1);

    let pending = harness.create_order(&owner).await;
    let (status, _) = harness.verify(&intruder, &pending, GATEWAY_SECRET).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, analytics) = harness.get("/api/admin/analytics", Some(&admin)).await;
    assert_eq!(analytics["transactions"], 2);
    assert_eq!(analytics["successful_payments"], 1);
}

#[tokio::test]
async fn payments_unavailable_without_keys() {
    let harness = Harness::with_gateway(PaymentGateway::default()).await;
    let buyer = harness.register("buyer@example.com").await;
    let (status, body) = harness
        .send(
            Method::POST,
            "/api/payments/create-order",
            Some(&buyer),
            Some(json!({"amount": 100})),
        )
        .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["detail"], "Payment gateway not configured");
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let harness = Harness::new().await;
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = harness.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert!(response.headers().contains_key("x-app"));

    let (status, doc) = harness.get("/api/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/projects"].is_object());

    let (status, body) = harness.get("/api/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Not Found");
}
