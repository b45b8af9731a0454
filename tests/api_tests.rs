use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use rand::{rngs::StdRng, SeedableRng};
use serde_json::{json, Value};

use media_hub_api::{
    client::{ApiClient, ClientError, SearchParams},
    config::Config,
    create_router,
    db::{seed::seed_demo_data, ContentStore, MemoryContentStore, MemoryUserStore},
    models::{ContentAnalysis, ContentType, NewContent},
    services::{analysis::analyze_with, ClassificationPolicy},
    AppState,
};

/// Deterministic classifier so analysis responses are reproducible
struct SeededClassifier;

impl ClassificationPolicy for SeededClassifier {
    fn analyze(&self, text: &str) -> ContentAnalysis {
        analyze_with(text, &mut StdRng::seed_from_u64(17))
    }
}

fn test_config() -> Config {
    Config::from_iter(vec![("JWT_SECRET".to_string(), "test-secret".to_string())]).unwrap()
}

fn test_state(content: Arc<MemoryContentStore>) -> AppState {
    AppState::new(&test_config(), content, Arc::new(MemoryUserStore::new()))
        .with_classifier(Arc::new(SeededClassifier))
}

fn create_test_server() -> (TestServer, Arc<MemoryContentStore>) {
    let content = Arc::new(MemoryContentStore::new());
    let app = create_router(Arc::new(test_state(content.clone())));
    (TestServer::new(app).unwrap(), content)
}

fn new_item(title: &str, category: &str, tags: &[&str]) -> NewContent {
    NewContent {
        title: title.to_string(),
        description: "Sample description".to_string(),
        content_type: ContentType::Video,
        url: "https://example.com/watch".to_string(),
        category: category.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        thumbnail: None,
        duration: Some(300),
    }
}

async fn signup_token(server: &TestServer) -> String {
    let response = server
        .post("/api/auth/signup")
        .json(&json!({
            "email": "viewer@example.com",
            "username": "viewer",
            "password": "secret123"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["token"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_health_check() {
    let (server, _) = create_test_server();

    let response = server.get("/api/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert!(body["data"]["uptime"].is_u64());
    assert!(body["data"]["timestamp"].is_string());
    assert!(body["data"].get("message").is_none());
}

#[tokio::test]
async fn test_api_status() {
    let (server, _) = create_test_server();

    let response = server.get("/api/status").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["message"], "API is running");
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["data"]["timestamp"].is_string());
    assert!(body["data"].get("status").is_none());
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let (server, _) = create_test_server();

    let response = server.get("/api/does-not-exist").await;

    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({ "error": "Not found" }));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let (server, _) = create_test_server();

    let response = server
        .get("/api/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("abc-123"),
        )
        .await;

    assert_eq!(response.header("x-request-id"), "abc-123");
}

#[tokio::test]
async fn test_signup_signin_and_profile() {
    let (server, _) = create_test_server();
    let token = signup_token(&server).await;

    let response = server
        .post("/api/auth/signin")
        .json(&json!({ "email": "VIEWER@example.com", "password": "secret123" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["user"]["username"], "viewer");

    let response = server
        .get("/api/auth/profile")
        .authorization_bearer(&token)
        .await;
    response.assert_status_ok();
    let profile: Value = response.json();
    assert_eq!(profile["email"], "viewer@example.com");
    assert_eq!(profile["preferences"]["aiRecommendations"], true);
    assert!(profile.get("passwordHash").is_none());
}

#[tokio::test]
async fn test_duplicate_signup_is_rejected() {
    let (server, _) = create_test_server();
    signup_token(&server).await;

    let response = server
        .post("/api/auth/signup")
        .json(&json!({
            "email": "viewer@example.com",
            "username": "another",
            "password": "secret123"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "User already exists" }));
}

#[tokio::test]
async fn test_signup_validation_errors() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api/auth/signup")
        .json(&json!({ "email": "nope", "username": "ab", "password": "123" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Validation failed");
    assert!(body["errors"]["email"].is_array());
    assert!(body["errors"]["username"].is_array());
    assert!(body["errors"]["password"].is_array());
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let (server, _) = create_test_server();
    signup_token(&server).await;

    let response = server
        .post("/api/auth/signin")
        .json(&json!({ "email": "viewer@example.com", "password": "wrong-password" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    response.assert_json(&json!({ "error": "Invalid credentials" }));
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let (server, _) = create_test_server();

    let response = server.get("/api/auth/profile").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    response.assert_json(&json!({ "error": "No token provided" }));

    let response = server
        .post("/api/content")
        .authorization_bearer("garbage")
        .json(&new_item("Unauthorized upload", "News", &[]))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    response.assert_json(&json!({ "error": "Invalid token" }));
}

#[tokio::test]
async fn test_create_view_and_like_content() {
    let (server, _) = create_test_server();
    let token = signup_token(&server).await;

    let response = server
        .post("/api/content")
        .authorization_bearer(&token)
        .json(&new_item("Learning Axum", "Technology", &["rust"]))
        .await;
    response.assert_status(StatusCode::CREATED);
    let created: Value = response.json();
    assert_eq!(created["type"], "video");
    assert_eq!(created["views"], 0);
    let id = created["id"].as_str().unwrap().to_string();

    let response = server.get(&format!("/api/content/{}", id)).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["views"], 1);

    let response = server.get(&format!("/api/content/{}", id)).await;
    assert_eq!(response.json::<Value>()["views"], 2);

    let response = server.post(&format!("/api/content/{}/like", id)).await;
    response.assert_status_ok();
    response.assert_json(&json!({ "success": true, "likes": 1 }));
}

#[tokio::test]
async fn test_update_content() {
    let (server, store) = create_test_server();
    let token = signup_token(&server).await;
    let item = store
        .create(new_item("Original title", "News", &[]))
        .await
        .unwrap();

    let response = server
        .put(&format!("/api/content/{}", item.id))
        .authorization_bearer(&token)
        .json(&json!({ "title": "Revised title", "tags": ["update"] }))
        .await;

    response.assert_status_ok();
    let updated: Value = response.json();
    assert_eq!(updated["title"], "Revised title");
    assert_eq!(updated["tags"], json!(["update"]));
    assert_eq!(updated["category"], "News");
}

#[tokio::test]
async fn test_update_rejects_padded_short_title_and_oversized_duration() {
    let (server, store) = create_test_server();
    let token = signup_token(&server).await;
    let item = store
        .create(new_item("Original title", "News", &[]))
        .await
        .unwrap();

    let response = server
        .put(&format!("/api/content/{}", item.id))
        .authorization_bearer(&token)
        .json(&json!({ "title": "   ab   " }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Validation failed");

    let response = server
        .put(&format!("/api/content/{}", item.id))
        .authorization_bearer(&token)
        .json(&json!({ "duration": 3_000_000_000u32 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let stored = store.find(item.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Original title");
    assert_eq!(stored.duration, Some(300));
}

#[tokio::test]
async fn test_large_limits_are_not_capped() {
    let (server, store) = create_test_server();
    let token = signup_token(&server).await;
    for i in 0..120 {
        store
            .create(new_item(&format!("Catalogue clip {i}"), "Technology", &[]))
            .await
            .unwrap();
    }

    let response = server
        .get("/api/content/recommendations")
        .authorization_bearer(&token)
        .add_query_param("limit", 150)
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Vec<Value>>().len(), 120);

    let response = server
        .get("/api/content/trending")
        .add_query_param("limit", 110)
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Vec<Value>>().len(), 110);
}

#[tokio::test]
async fn test_missing_and_malformed_ids() {
    let (server, _) = create_test_server();

    let response = server
        .get("/api/content/00000000-0000-0000-0000-000000000000")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({ "error": "Content not found" }));

    let response = server.get("/api/content/not-a-uuid").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analyze_persists_result() {
    let (server, store) = create_test_server();
    let token = signup_token(&server).await;
    let item = store
        .create(new_item("Analyze this clip", "Technology", &[]))
        .await
        .unwrap();

    let response = server
        .post(&format!("/api/content/{}/analyze", item.id))
        .authorization_bearer(&token)
        .await;
    response.assert_status_ok();
    let analysis: ContentAnalysis = response.json();

    let expected = analyze_with(
        &item.analysis_text(),
        &mut StdRng::seed_from_u64(17),
    );
    assert_eq!(analysis.sentiment, expected.sentiment);
    assert_eq!(analysis.topics, expected.topics);
    assert_eq!(analysis.recommendations, expected.recommendations);
    assert_eq!(analysis.keyword_score.to_bits(), expected.keyword_score.to_bits());
    assert_eq!(analysis.engagement.to_bits(), expected.engagement.to_bits());
    assert!(analysis.topics.len() <= 3);
    assert_eq!(
        analysis.recommendations.last().map(String::as_str),
        Some("Optimize tags for better discoverability")
    );

    let stored = store.find(item.id).await.unwrap().unwrap();
    assert_eq!(stored.ai_analysis, Some(analysis));
}

#[tokio::test]
async fn test_analyze_requires_auth() {
    let (server, store) = create_test_server();
    let item = store
        .create(new_item("Analyze this clip", "Technology", &[]))
        .await
        .unwrap();

    let response = server
        .post(&format!("/api/content/{}/analyze", item.id))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(store.find(item.id).await.unwrap().unwrap().ai_analysis.is_none());
}

#[tokio::test]
async fn test_trending_orders_by_views() {
    let (server, store) = create_test_server();
    let quiet = store.create(new_item("Quiet video", "News", &[])).await.unwrap();
    let loud = store.create(new_item("Loud video", "News", &[])).await.unwrap();
    for _ in 0..3 {
        store.record_view(loud.id).await.unwrap();
    }

    let response = server
        .get("/api/content/trending")
        .add_query_param("limit", 1)
        .await;

    response.assert_status_ok();
    let items: Vec<Value> = response.json();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], loud.id.to_string());
    assert_ne!(items[0]["id"], quiet.id.to_string());
}

#[tokio::test]
async fn test_recommendations_ranked_for_signed_in_user() {
    let (server, store) = create_test_server();
    let token = signup_token(&server).await;

    let popular = store
        .create(new_item("Chart toppers", "Music", &[]))
        .await
        .unwrap();
    for _ in 0..10 {
        store.record_view(popular.id).await.unwrap();
    }
    let relevant = store
        .create(new_item("New gadgets", "Technology", &["Technology-news"]))
        .await
        .unwrap();

    let response = server
        .get("/api/content/recommendations")
        .authorization_bearer(&token)
        .await;
    response.assert_status_ok();
    let ranked: Vec<Value> = response.json();

    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0]["id"], relevant.id.to_string());
    let score = ranked[0]["recommendationScore"].as_f64().unwrap();
    assert!((score - 0.7).abs() < 1e-9);

    // Anonymous callers get popularity order instead
    let response = server.get("/api/content/recommendations").await;
    response.assert_status_ok();
    let anonymous: Vec<Value> = response.json();
    assert_eq!(anonymous[0]["id"], popular.id.to_string());
}

#[tokio::test]
async fn test_search_and_category() {
    let (server, store) = create_test_server();
    store
        .create(new_item("Rust async patterns", "Technology", &[]))
        .await
        .unwrap();
    store
        .create(new_item("Guitar basics", "Music", &[]))
        .await
        .unwrap();

    let response = server
        .get("/api/content/search")
        .add_query_param("q", "RUST")
        .await;
    response.assert_status_ok();
    let page: Value = response.json();
    assert_eq!(page["total"], 1);
    assert_eq!(page["page"], 1);
    assert_eq!(page["limit"], 10);
    assert_eq!(page["results"][0]["title"], "Rust async patterns");

    let response = server
        .get("/api/content/search")
        .add_query_param("limit", 500)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server.get("/api/content/category/Music").await;
    response.assert_status_ok();
    let items: Vec<Value> = response.json();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["category"], "Music");
}

#[tokio::test]
async fn test_analytics_envelopes() {
    let (server, store) = create_test_server();
    signup_token(&server).await;
    let item = store
        .create(new_item("Counted video", "Sports", &[]))
        .await
        .unwrap();
    store.record_view(item.id).await.unwrap();
    store.record_like(item.id).await.unwrap();

    let response = server.get("/api/analytics/stats").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["totalContent"], 1);
    assert_eq!(body["data"]["totalUsers"], 1);
    assert_eq!(body["data"]["totalViews"], 1);
    assert_eq!(body["data"]["totalLikes"], 1);

    let response = server.get("/api/analytics/content-stats").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["byType"][0]["type"], "video");
    assert_eq!(body["data"]["byCategory"][0]["category"], "Sports");
    assert_eq!(body["data"]["topContent"][0]["title"], "Counted video");
}

#[tokio::test]
async fn test_client_round_trip_over_tcp() {
    let content = Arc::new(MemoryContentStore::new());
    let users = Arc::new(MemoryUserStore::new());
    seed_demo_data(content.as_ref(), users.as_ref()).await.unwrap();

    let state = AppState::new(&test_config(), content, users)
        .with_classifier(Arc::new(SeededClassifier));
    let app = create_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = ApiClient::new(format!("http://{}", addr));

    let session = client.signin("demo@example.com", "demo123").await.unwrap();
    assert_eq!(session.user.username, "demouser");

    let profile = client.profile(&session).await.unwrap();
    assert_eq!(profile.email, "demo@example.com");

    let trending = client.trending(3).await.unwrap();
    assert_eq!(trending.len(), 3);

    let ranked = client.recommendations(Some(&session), 5).await.unwrap();
    assert_eq!(ranked.len(), 5);
    assert!(ranked
        .windows(2)
        .all(|w| w[0].recommendation_score >= w[1].recommendation_score));

    let created = client
        .create(&session, &new_item("Client uploaded clip", "Technology", &["client"]))
        .await
        .unwrap();
    let fetched = client.get(created.id).await.unwrap();
    assert_eq!(fetched.views, 1);

    let liked = client.like(created.id).await.unwrap();
    assert_eq!(liked.likes, 1);

    let analysis = client.analyze(&session, created.id).await.unwrap();
    assert!(analysis.keyword_score >= 0.3 && analysis.keyword_score < 1.0);

    let page = client
        .search(&SearchParams {
            q: Some("clip".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total, 1);

    let music = client.by_category("Music", 10).await.unwrap();
    assert!(music.iter().all(|item| item.category == "Music"));

    match client.signin("demo@example.com", "nope").await {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("expected 401, got {:?}", other),
    }
}
