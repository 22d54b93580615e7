//! Router-level tests for the three services.
//!
//! Requests go through the full router (middleware included) via
//! `tower::ServiceExt::oneshot`; upstream services are `wiremock` servers.
//!
//! Run with: cargo test --test service_tests

use std::collections::HashSet;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pizzeria::config::{AppConfig, ConfigError, SECRET_PIZZA_PASSPHRASE};
use pizzeria::routes::{frontend_router, health_checker_router, suggestion_router};
use pizzeria::state::{FrontendState, HealthCheckerState, StateError, SuggestionState};
use pizzeria::templates::init_templates;
use pizzeria::toppings::{ToppingList, ToppingMode, SPICY_PREFIX};

const FIXTURE_TOPPINGS: &[&str] = &["mozzarella", "basil", "olives", "mushrooms", "pineapple"];

fn fixture_list(items: &[&str]) -> ToppingList {
    ToppingList::from_vec(items.iter().map(|s| s.to_string()).collect())
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let cache_control = response
        .headers()
        .get(header::CACHE_CONTROL)
        .map(|v| v.to_str().unwrap().to_string());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, cache_control, String::from_utf8(body.to_vec()).unwrap())
}

/// A base URL nothing is listening on.
async fn refused_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn frontend_app(suggester_url: &str, configure: impl FnOnce(&mut AppConfig)) -> Router {
    let mut config = AppConfig::default();
    config.frontend.topping_combo_suggester_url = suggester_url.to_string();
    configure(&mut config);
    let state = FrontendState::new(config, init_templates().unwrap()).unwrap();
    frontend_router(state)
}

fn health_checker_app(topping_suggestion_url: &str, webapp_url: &str) -> Router {
    let mut config = AppConfig::default();
    config.health_checker.topping_suggestion_url = Some(topping_suggestion_url.to_string());
    config.health_checker.webapp_url = Some(webapp_url.to_string());
    let state = HealthCheckerState::new(&config, init_templates().unwrap()).unwrap();
    health_checker_router(state)
}

// =============================================================================
// Topping suggestion service
// =============================================================================

#[tokio::test]
async fn suggestion_health_check_returns_true() {
    let app = suggestion_router(SuggestionState::new(fixture_list(FIXTURE_TOPPINGS), ToppingMode::Mild));
    let (status, cache_control, body) = get(app, "/health-check").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "True");
    assert_eq!(cache_control.as_deref(), Some("no-store"));
}

#[tokio::test]
async fn topping_combo_returns_three_distinct_toppings() {
    let state = SuggestionState::new(fixture_list(FIXTURE_TOPPINGS), ToppingMode::Mild);

    for _ in 0..20 {
        let (status, _, body) = get(suggestion_router(state.clone()), "/topping_combo").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        let toppings: Vec<String> = serde_json::from_value(json["toppings"].clone()).unwrap();
        assert_eq!(toppings.len(), 3);
        assert_eq!(toppings.iter().collect::<HashSet<_>>().len(), 3);
        assert!(toppings.iter().all(|t| FIXTURE_TOPPINGS.contains(&t.as_str())));

        let description = json["description"].as_str().unwrap();
        assert!(description.starts_with("Please enjoy this "));
        assert!(description.contains(&format!("{}, {}, and {}", toppings[0], toppings[1], toppings[2])));
        assert!(!description.contains("SPICY"));
    }
}

#[tokio::test]
async fn topping_combo_spicy_mode() {
    let app = suggestion_router(SuggestionState::new(fixture_list(FIXTURE_TOPPINGS), ToppingMode::Spicy));
    let (status, _, body) = get(app, "/topping_combo").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    let description = json["description"].as_str().unwrap();
    assert!(description.starts_with(&format!("Please enjoy this {}", SPICY_PREFIX)));
}

#[tokio::test]
async fn topping_combo_with_too_few_toppings_is_server_error() {
    let app = suggestion_router(SuggestionState::new(fixture_list(&["ham", "pineapple"]), ToppingMode::Mild));
    let (status, _, body) = get(app, "/topping_combo").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("Not enough toppings"));
    assert!(json["request_id"].is_string());
    assert!(json.get("toppings").is_none());
}

// =============================================================================
// Frontend service
// =============================================================================

#[tokio::test]
async fn frontend_renders_suggestion() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/topping_combo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "toppings": ["ham", "olives", "basil"],
            "description": "Please enjoy this ham, olives, and basil pizza!"
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let (status, cache_control, body) = get(frontend_app(&upstream.uri(), |_| {}), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache_control.as_deref(), Some("no-store"));
    assert!(body.contains("Please enjoy this ham, olives, and basil pizza!"));
    assert!(!body.contains("id=\"errors\""));
}

#[tokio::test]
async fn frontend_renders_upstream_error_status() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/topping_combo"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&upstream)
        .await;

    let (status, _, body) = get(frontend_app(&upstream.uri(), |_| {}), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("id=\"errors\""));
    assert!(body.contains("Received status 500"));
    assert!(!body.contains("id=\"topping-combo\""));
}

#[tokio::test]
async fn frontend_renders_when_upstream_unreachable() {
    let url = refused_url().await;

    let (status, _, body) = get(frontend_app(&url, |_| {}), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Received status ????"));
    assert!(!body.contains("id=\"topping-combo\""));
}

#[tokio::test]
async fn frontend_health_check_does_not_call_upstream() {
    let url = refused_url().await;
    let (status, _, body) = get(frontend_app(&url, |_| {}), "/health-check").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "True");
}

#[tokio::test]
async fn frontend_pizza_banner_follows_flag() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/topping_combo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"description": "X"})))
        .mount(&upstream)
        .await;

    let (_, _, hidden) = get(frontend_app(&upstream.uri(), |_| {}), "/").await;
    assert!(!hidden.contains("href=\"/pizza\""));

    let app = frontend_app(&upstream.uri(), |c| c.frontend.show_pizza = true);
    let (_, _, shown) = get(app.clone(), "/").await;
    assert!(shown.contains("href=\"/pizza\""));

    let (status, _, pizza) = get(app, "/pizza").await;
    assert_eq!(status, StatusCode::OK);
    assert!(pizza.starts_with("🍕🍕"));
}

#[tokio::test]
async fn frontend_secret_requires_configured_passphrase() {
    let url = refused_url().await;

    let (status, _, _) = get(frontend_app(&url, |_| {}), "/secret").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let wrong = frontend_app(&url, |c| c.frontend.secret_pizza_password = Some("guess".to_string()));
    let (status, _, _) = get(wrong, "/secret").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let right = frontend_app(&url, |c| {
        c.frontend.secret_pizza_password = Some(SECRET_PIZZA_PASSPHRASE.to_string())
    });
    let (status, _, body) = get(right, "/secret").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("id=\"secret-pizza\""));
}

// =============================================================================
// Health checker
// =============================================================================

async fn healthy_service() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health-check"))
        .respond_with(ResponseTemplate::new(200).set_body_string("True"))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn health_checker_reports_in_configured_order() {
    let healthy = healthy_service().await;
    let unreachable = refused_url().await;

    let app = health_checker_app(&healthy.uri(), &unreachable);
    let (status, _, body) = get(app, "/status.json").await;
    assert_eq!(status, StatusCode::OK);

    let results: serde_json::Value = serde_json::from_str(&body).unwrap();
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 2);

    assert_eq!(results[0]["label"], "topping-suggestion service");
    assert_eq!(results[0]["status_code"], 200);
    assert_eq!(results[0]["healthy"], true);
    assert_eq!(results[0]["status"], "ok");

    assert_eq!(results[1]["label"], "webapp service");
    assert_eq!(results[1]["endpoint"], format!("{}/health-check", unreachable));
    assert!(results[1]["status_code"].is_null());
    assert_eq!(results[1]["healthy"], false);
    assert_eq!(results[1]["status"], "danger");
}

#[tokio::test]
async fn health_checker_page_marks_unreachable_dependency() {
    let healthy = healthy_service().await;
    let unreachable = refused_url().await;

    let (status, _, body) = get(health_checker_app(&unreachable, &healthy.uri()), "/").await;
    assert_eq!(status, StatusCode::OK);

    let suggestion_row = body.find("topping-suggestion service").unwrap();
    let webapp_row = body.find("webapp service").unwrap();
    assert!(suggestion_row < webapp_row);

    assert!(body.contains("????"));
    assert!(body.contains("has-background-danger"));
    assert!(body.contains("has-background-success"));
    assert!(body.contains("data-status=\"danger\""));
    assert!(body.contains("data-status=\"ok\""));
}

#[tokio::test]
async fn health_checker_is_itself_probeable() {
    let unreachable = refused_url().await;
    let (status, _, body) = get(health_checker_app(&unreachable, &unreachable), "/health-check").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "True");
}

#[test]
fn health_checker_requires_dependency_urls() {
    let mut config = AppConfig::default();
    config.health_checker.webapp_url = Some("http://webapp".to_string());

    let err = match HealthCheckerState::new(&config, init_templates().unwrap()) {
        Ok(_) => panic!("expected missing configuration error"),
        Err(e) => e,
    };
    assert!(matches!(
        err,
        StateError::Config(ConfigError::Missing("TOPPING_SUGGESTION_URL"))
    ));
}
