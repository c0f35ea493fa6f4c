//! Admin dashboard page tests.
//!
//! The dashboard router runs in-process against a wiremock stand-in for
//! the Shopify Admin GraphQL endpoint; settings pages write real JSON
//! blobs under a per-test temp directory.
//!
//! The `#[ignore]`d tests at the bottom hit a live server instead. Point
//! `ADMIN_BASE_URL` at a running dashboard to exercise them.

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::http::{StatusCode, header};
use secrecy::SecretString;
use uuid::Uuid;
use wiremock::matchers::{header as header_matcher, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use eco_packaging_admin::config::{AdminConfig, ShopifyAdminConfig};
use eco_packaging_admin::routes;
use eco_packaging_admin::state::AppState;
use eco_packaging_integration_tests::support::{
    form_request, get_request, order_node, orders_body, send,
};

const TEST_TOKEN: &str = "shpat_4f2b9c81d7e3a605";
const GRAPHQL_PATH: &str = "/admin/api/2026-01/graphql.json";

fn test_config(store: &str, token: Option<&str>) -> AdminConfig {
    AdminConfig {
        host: "127.0.0.1".parse().expect("host"),
        port: 0,
        shopify: ShopifyAdminConfig {
            store: store.to_string(),
            api_version: "2026-01".to_string(),
            access_token: token.map(SecretString::from),
        },
        data_dir: std::env::temp_dir().join(format!("eco-admin-it-{}", Uuid::new_v4())),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

fn admin_app(config: AdminConfig) -> Router {
    let state = AppState::new(config).expect("admin state");
    routes::routes().with_state(state)
}

#[tokio::test]
async fn test_dashboard_renders_metrics_from_orders() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(header_matcher("X-Shopify-Access-Token", TEST_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(orders_body(&[
            order_node("#1001", true, 2, "200.00"),
            order_node("#1002", false, 1, "149.00"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let app = admin_app(test_config(&server.uri(), Some(TEST_TOKEN)));
    let (parts, body) = send(&app, get_request("/", None)).await;

    assert_eq!(parts.status, StatusCode::OK);
    assert!(body.contains("50.0% of total"));
    // 2 items saved at the default 8 kr packaging cost.
    assert!(body.contains("16,00 kr"));
    // 5% default discount on the 200.00 eco subtotal.
    assert!(body.contains("10,00 kr"));
    assert!(body.contains("Mette Jensen"));
    assert!(body.contains("20.08.2026"));
    assert!(!body.contains("No Shopify Admin API token configured"));
}

#[tokio::test]
async fn test_dashboard_renders_connect_notice_without_token() {
    let server = MockServer::start().await;
    // Without a token the client never leaves the process.
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = admin_app(test_config(&server.uri(), None));
    let (parts, body) = send(&app, get_request("/", None)).await;

    assert_eq!(parts.status, StatusCode::OK);
    assert!(body.contains("No Shopify Admin API token configured"));
    assert!(body.contains("No eco orders yet"));
}

#[tokio::test]
async fn test_dashboard_fails_open_when_token_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"errors": "Invalid API key or access token"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let app = admin_app(test_config(&server.uri(), Some(TEST_TOKEN)));
    let (parts, body) = send(&app, get_request("/", None)).await;

    assert_eq!(parts.status, StatusCode::OK, "auth failures degrade to empty data");
    assert!(body.contains("No eco orders yet"));
    assert!(!body.contains("No Shopify Admin API token configured"));
}

#[tokio::test]
async fn test_orders_page_lists_and_filters() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(orders_body(&[
            order_node("#1003", true, 2, "300.00"),
            order_node("#1002", true, 1, "99.00"),
            order_node("#1001", false, 3, "450.00"),
        ])))
        .expect(3)
        .mount(&server)
        .await;

    let app = admin_app(test_config(&server.uri(), Some(TEST_TOKEN)));

    let (parts, body) = send(&app, get_request("/orders", None)).await;
    assert_eq!(parts.status, StatusCode::OK);
    assert!(body.contains("Showing 3 of 3 orders"));
    assert_eq!(body.matches("✓ Eco").count(), 2);
    assert!(body.contains("mette@example.com"));

    let (_, body) = send(&app, get_request("/orders?filter=eco", None)).await;
    assert!(body.contains("Showing 2 of 3 orders"));
    assert_eq!(body.matches("✓ Eco").count(), 2);

    let (_, body) = send(&app, get_request("/orders?filter=standard", None)).await;
    assert!(body.contains("Showing 1 of 3 orders"));
    assert_eq!(body.matches("✓ Eco").count(), 0);
}

#[tokio::test]
async fn test_orders_page_unknown_filter_falls_back_to_all() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(orders_body(&[
            order_node("#1002", true, 1, "99.00"),
            order_node("#1001", false, 2, "120.00"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let app = admin_app(test_config(&server.uri(), Some(TEST_TOKEN)));
    let (parts, body) = send(&app, get_request("/orders?filter=bogus", None)).await;

    assert_eq!(parts.status, StatusCode::OK);
    assert!(body.contains("Showing 2 of 2 orders"));
}

#[tokio::test]
async fn test_settings_round_trip() {
    let app = admin_app(test_config("example.myshopify.com", None));

    let (parts, body) = send(&app, get_request("/settings", None)).await;
    assert_eq!(parts.status, StatusCode::OK);
    assert!(body.contains("value=\"5\""), "default discount percent");
    assert!(body.contains("value=\"8\""), "default packaging cost");
    assert!(!body.contains("Settings saved"));

    let form = "enabled=on&discount_percent=7&packaging_cost=12&language=da&show_on_product_page=on";
    let (parts, _) = send(&app, form_request("/settings", None, form)).await;
    assert_eq!(parts.status, StatusCode::SEE_OTHER);
    assert_eq!(
        parts.headers.get(header::LOCATION).and_then(|v| v.to_str().ok()),
        Some("/settings?saved=1")
    );

    let (_, body) = send(&app, get_request("/settings?saved=1", None)).await;
    assert!(body.contains("✓ Settings saved"));
    assert!(body.contains("value=\"7\""));
    assert!(body.contains("value=\"12\""));
    assert!(body.contains("value=\"da\" selected"));

    let (parts, _) = send(&app, form_request("/settings/reset", None, "")).await;
    assert_eq!(parts.status, StatusCode::SEE_OTHER);

    let (_, body) = send(&app, get_request("/settings", None)).await;
    assert!(body.contains("value=\"5\""));
    assert!(body.contains("value=\"en\" selected"));
}

#[tokio::test]
async fn test_settings_clamps_and_zeroes_junk_input() {
    let app = admin_app(test_config("example.myshopify.com", None));

    let form = "discount_percent=250&packaging_cost=junk&language=en";
    let (parts, _) = send(&app, form_request("/settings", None, form)).await;
    assert_eq!(parts.status, StatusCode::SEE_OTHER);

    let (_, body) = send(&app, get_request("/settings", None)).await;
    assert!(body.contains("value=\"100\""), "discount clamps to 100");
    assert!(body.contains("value=\"0\""), "junk cost becomes zero");
}

#[tokio::test]
async fn test_help_page_lists_faqs() {
    let app = admin_app(test_config("example.myshopify.com", None));

    let (parts, body) = send(&app, get_request("/help", None)).await;

    assert_eq!(parts.status, StatusCode::OK);
    assert!(body.contains("Quick Start Guide"));
    assert_eq!(body.matches("<details").count(), 6);
    assert!(body.contains("support@eco-packaging.app"));
}

// ============================================================================
// Live server tests
// ============================================================================

/// Base URL for the admin dashboard (configurable via environment).
fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

#[tokio::test]
#[ignore = "requires a running admin server (set ADMIN_BASE_URL)"]
async fn test_live_health_endpoint() {
    let response = reqwest::get(format!("{}/health", admin_base_url()))
        .await
        .expect("health request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires a running admin server (set ADMIN_BASE_URL)"]
async fn test_live_dashboard_page() {
    let client = reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("client");
    let response = client
        .get(format!("{}/", admin_base_url()))
        .send()
        .await
        .expect("dashboard request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body = response.text().await.expect("dashboard body");
    assert!(body.contains("Eco Packaging"));
}
