//! Integration tests for the Radar API
//!
//! Two layers:
//! - Router-level tests: axum-test drives the real router, with a stub
//!   upstream Ethos API served from an ephemeral local port, so the reqwest
//!   adapter and its response parsing are exercised end to end.
//! - Service-level wiring tests against the real adapter type.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::extract::{Query, State};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::adapters::EthosClientImpl;
    use crate::app::R4rAnalyzerService;
    use crate::config::Config;
    use crate::{app, AppState};

    /// Seeded data behind the stub upstream
    #[derive(Clone)]
    struct StubState {
        reviews: Arc<Vec<Value>>,
    }

    async fn stub_reviews(
        State(state): State<StubState>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        let offset: usize = params
            .get("offset")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let values: Vec<Value> = if offset > 0 {
            vec![]
        } else {
            state
                .reviews
                .iter()
                .filter(|r| {
                    if let Some(author) = params.get("author") {
                        return r.get("author").and_then(Value::as_str) == Some(author);
                    }
                    if let Some(subject) = params.get("subject") {
                        return r.get("subject").and_then(Value::as_str) == Some(subject);
                    }
                    false
                })
                .cloned()
                .collect()
        };
        Json(json!({"ok": true, "data": {"values": values}}))
    }

    async fn stub_users_by_userkeys(Json(body): Json<Value>) -> Json<Value> {
        let userkey = body
            .get("userkeys")
            .and_then(Value::as_array)
            .and_then(|a| a.first())
            .and_then(Value::as_str)
            .unwrap_or_default();
        Json(json!({
            "users": [{
                "userkey": userkey,
                "displayName": "Stub User",
                "username": "stub",
                "avatarUrl": "https://img.test/stub.png"
            }]
        }))
    }

    async fn stub_search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        let query = params.get("query").cloned().unwrap_or_default();
        if query.starts_with("vit") {
            Json(json!({"ok": true, "data": {"values": [{
                "userkey": "profileId:7",
                "name": "Vitalik Buterin",
                "username": "vitalik",
                "avatar": "",
                "score": 1500,
                "description": ""
            }]}}))
        } else {
            Json(json!({"ok": true, "data": {"values": []}}))
        }
    }

    /// Serve a stub Ethos API on an ephemeral port; returns its base URL.
    async fn spawn_stub_upstream(reviews: Vec<Value>) -> String {
        let state = StubState {
            reviews: Arc::new(reviews),
        };
        let router = Router::new()
            .route("/api/v1/reviews", get(stub_reviews))
            .route("/api/v2/users/by/userkeys", post(stub_users_by_userkeys))
            .route("/api/v1/search", get(stub_search))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub upstream");
        let addr = listener.local_addr().expect("stub addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("stub serve");
        });
        format!("http://{}", addr)
    }

    fn test_state(base_url: String) -> AppState {
        let config = Config {
            ethos_api_url: base_url.clone(),
            ethos_client_header: "RadarAPI-tests".to_string(),
            fetch_timeout_secs: 2,
            port: 0,
        };
        let ethos = Arc::new(EthosClientImpl::new(
            base_url,
            config.ethos_client_header.clone(),
            Duration::from_secs(config.fetch_timeout_secs),
        ));
        AppState {
            analyzer: Arc::new(R4rAnalyzerService::new(ethos.clone())),
            ethos,
            config,
        }
    }

    /// alice and bob exchange reviews five minutes apart.
    fn mutual_pair_reviews() -> Vec<Value> {
        vec![
            json!({"id": 1, "author": "alice", "subject": "bob", "score": 2, "timestamp": 1717243200}),
            json!({"id": 2, "author": "bob", "subject": "alice", "score": 1, "timestamp": 1717243500}),
        ]
    }

    #[tokio::test]
    async fn services_can_be_created() {
        let state = test_state("http://localhost:0".to_string());
        let _router = app(state);
    }

    #[tokio::test]
    async fn health_endpoint_reports_ok() {
        let base_url = spawn_stub_upstream(vec![]).await;
        let server = TestServer::new(app(test_state(base_url))).unwrap();

        let response = server.get("/health").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn r4r_analysis_end_to_end() {
        let base_url = spawn_stub_upstream(mutual_pair_reviews()).await;
        let server = TestServer::new(app(test_state(base_url))).unwrap();

        let response = server.get("/api/r4r-analysis/alice").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["success"], true);
        let data = &body["data"];
        assert_eq!(data["userkey"], "alice");
        assert_eq!(data["totalReviewsGiven"], 1);
        assert_eq!(data["totalReviewsReceived"], 1);
        assert_eq!(data["reciprocalReviews"], 1);
        assert_eq!(data["quickReciprocalCount"], 1);
        assert_eq!(data["displayName"], "Stub User");
        assert!(data["r4rScore"].as_f64().unwrap() <= 100.0);
        assert!(data["riskLevel"].is_string());
        assert_eq!(data["networkConnections"][0]["userkey"], "bob");
    }

    #[tokio::test]
    async fn r4r_analysis_unknown_user_is_404() {
        let base_url = spawn_stub_upstream(mutual_pair_reviews()).await;
        let server = TestServer::new(app(test_state(base_url))).unwrap();

        let response = server.get("/api/r4r-analysis/ghost").await;
        response.assert_status_not_found();

        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn r4r_summary_unknown_user_is_neutral() {
        let base_url = spawn_stub_upstream(vec![]).await;
        let server = TestServer::new(app(test_state(base_url))).unwrap();

        let response = server.get("/api/r4r-summary/ghost").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["totalReviews"], 0);
        assert_eq!(body["data"]["riskLevel"], "Low");
    }

    #[tokio::test]
    async fn review_summary_end_to_end() {
        let base_url = spawn_stub_upstream(mutual_pair_reviews()).await;
        let server = TestServer::new(app(test_state(base_url))).unwrap();

        let response = server.get("/api/review-summary/bob").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["data"]["totalReviews"], 1);
        assert_eq!(body["data"]["positivePercentage"], 100.0);
    }

    #[tokio::test]
    async fn search_suggestions_short_query_returns_empty() {
        let base_url = spawn_stub_upstream(vec![]).await;
        let server = TestServer::new(app(test_state(base_url))).unwrap();

        let response = server
            .get("/api/search-suggestions")
            .add_query_param("q", "ab")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn search_suggestions_end_to_end() {
        let base_url = spawn_stub_upstream(vec![]).await;
        let server = TestServer::new(app(test_state(base_url))).unwrap();

        let response = server
            .get("/api/search-suggestions")
            .add_query_param("q", "vitalik")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"][0]["username"], "vitalik");
        assert_eq!(body["data"][0]["displayName"], "Vitalik Buterin");
    }

    #[tokio::test]
    async fn network_analysis_through_real_adapter() {
        let base_url = spawn_stub_upstream(mutual_pair_reviews()).await;
        let state = test_state(base_url);

        let network = state
            .analyzer
            .clone()
            .network_analysis(vec!["alice".to_string(), "bob".to_string()])
            .await
            .unwrap();

        assert_eq!(network.analyses.len(), 2);
        assert_eq!(network.cross_connections.len(), 1);
        assert!(network.cross_connections[0].is_mutual);
        assert!(network.network_suspicious_score > 0.0);
    }
}
