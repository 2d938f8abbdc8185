pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::warn;

use crate::auth::handlers as auth;
use crate::prep::handlers as prep;
use crate::resume::handlers as resume;
use crate::scheduler::handlers as scheduler;
use crate::state::AppState;

/// Upper bound for resume uploads.
const RESUME_UPLOAD_LIMIT: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Authentication
        .route("/auth/google/login", get(auth::handle_login))
        .route("/auth/google/callback", get(auth::handle_callback))
        .route("/auth/user/status", get(auth::handle_user_status))
        // Scheduler & tracking
        .route(
            "/api/scheduler/start-check",
            post(scheduler::handle_start_check),
        )
        .route(
            "/api/scheduler/applications/:user_id",
            get(scheduler::handle_list_applications),
        )
        .route(
            "/api/scheduler/mock-save-resume/:user_id",
            post(resume::handle_save_resume_text),
        )
        .route(
            "/api/scheduler/resume/:user_id",
            post(resume::handle_upload_resume).layer(DefaultBodyLimit::max(RESUME_UPLOAD_LIMIT)),
        )
        // AI preparation
        .route("/api/ai/prep", post(prep::handle_generate_prep_tips))
        .route("/api/ai/chat", post(prep::handle_practice_chat))
        .with_state(state)
}

/// CORS for the dashboard: listed origins only, credentials allowed,
/// requested methods and headers mirrored back.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::response::Response;
    use reqwest::Url;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::auth::google::{OAuthError, OAuthIdentity, OAuthProvider};
    use crate::auth::pending::PendingStates;
    use crate::config::Config;
    use crate::db::MockDb;
    use crate::errors::AppError;
    use crate::models::prep::PrepTipsResponse;
    use crate::prep::analyzer::{PrepAnalyzer, StubPrepAnalyzer};

    struct FakeOAuth {
        refresh_token: Option<String>,
    }

    #[async_trait]
    impl OAuthProvider for FakeOAuth {
        fn authorization_url(&self, state: &str) -> Result<String, OAuthError> {
            Ok(format!("https://accounts.example/auth?state={state}"))
        }

        async fn exchange_code(&self, code: &str) -> Result<OAuthIdentity, OAuthError> {
            if code == "bad" {
                return Err(OAuthError::Api {
                    status: 400,
                    message: "invalid_grant".to_string(),
                });
            }
            Ok(OAuthIdentity {
                user_id: "google-42".to_string(),
                email: Some("ada@example.com".to_string()),
                name: Some("Ada Lovelace".to_string()),
                refresh_token: self.refresh_token.clone(),
            })
        }
    }

    struct FailingAnalyzer;

    #[async_trait]
    impl PrepAnalyzer for FailingAnalyzer {
        async fn analyze(&self, _: &str, _: &str) -> Result<PrepTipsResponse, AppError> {
            Err(AppError::Ai("quota exceeded".to_string()))
        }

        fn backend(&self) -> &'static str {
            "failing"
        }
    }

    fn test_config() -> Config {
        let mut config = Config::from_lookup(|_| None).unwrap();
        config.checker.latency_ms = 0;
        config.checker.hit_rate = 1.0;
        config
    }

    fn test_state() -> AppState {
        AppState {
            db: Arc::new(MockDb::new()),
            config: test_config(),
            oauth: Arc::new(FakeOAuth {
                refresh_token: Some("refresh-xyz".to_string()),
            }),
            pending_states: Arc::new(PendingStates::default()),
            analyzer: Arc::new(StubPrepAnalyzer),
        }
    }

    async fn call(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn location(response: &Response) -> String {
        response.headers()[header::LOCATION]
            .to_str()
            .unwrap()
            .to_string()
    }

    async fn login_state(app: &Router) -> String {
        let response = call(app, get("/auth/google/login")).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        let url = Url::parse(&location(&response)).unwrap();
        url.query_pairs()
            .find(|(k, _)| k == "state")
            .map(|(_, v)| v.into_owned())
            .unwrap()
    }

    #[tokio::test]
    async fn test_root_and_health() {
        let app = build_router(test_state());

        let response = call(&app, get("/")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await["message"],
            "Smart Job Tracker API is running!"
        );

        let body = json_body(call(&app, get("/health")).await).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_applications_seeds_once_in_date_order() {
        let app = build_router(test_state());

        let body = json_body(call(&app, get("/api/scheduler/applications/u1")).await).await;
        let apps = body["applications"].as_array().unwrap();
        let companies: Vec<&str> = apps.iter().map(|a| a["company"].as_str().unwrap()).collect();
        assert_eq!(
            companies,
            vec!["TechCorp Solutions", "Innovate Systems", "Aurora Labs"]
        );
        assert!(apps.iter().all(|a| a["status"] == "Upcoming"));

        let again = json_body(call(&app, get("/api/scheduler/applications/u1")).await).await;
        assert_eq!(again["applications"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_prep_flow_for_seeded_application() {
        let app = build_router(test_state());

        let body = json_body(call(&app, get("/api/scheduler/applications/u1")).await).await;
        let backend_app = &body["applications"][0];
        assert_eq!(backend_app["role"], "Senior Backend Engineer");
        let app_id = backend_app["app_id"].as_str().unwrap().to_string();

        let saved = call(
            &app,
            post_json(
                "/api/scheduler/mock-save-resume/u1",
                json!({"user_id": "u1", "resume_text": "3 years of Python"}),
            ),
        )
        .await;
        assert_eq!(saved.status(), StatusCode::OK);
        assert_eq!(
            json_body(saved).await["message"],
            "Mock resume saved successfully."
        );

        let response = call(
            &app,
            post_json("/api/ai/prep", json!({"app_id": app_id, "user_id": "u1"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let tips = json_body(response).await;
        let confidence = tips["match_confidence"].as_f64().unwrap();
        assert!((0.40..=0.55).contains(&confidence));
        assert_eq!(tips["key_topics_to_revise"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_prep_without_resume_is_not_found() {
        let app = build_router(test_state());
        let response = call(
            &app,
            post_json("/api/ai/prep", json!({"app_id": "APP-1-100", "user_id": "u1"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(
            body["error"]["message"],
            "User resume not found. Please upload it via the dashboard."
        );
    }

    #[tokio::test]
    async fn test_prep_with_unknown_application_is_not_found() {
        let state = test_state();
        state.db.save_user_resume("u1", "resume");
        let app = build_router(state);

        let response = call(
            &app,
            post_json("/api/ai/prep", json!({"app_id": "APP-0-000", "user_id": "u1"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(response).await["error"]["message"],
            "Application data not found for ID: APP-0-000."
        );
    }

    #[tokio::test]
    async fn test_prep_analyzer_failure_is_server_error() {
        let mut state = test_state();
        state.analyzer = Arc::new(FailingAnalyzer);
        state.db.save_user_resume("u1", "resume");
        let app_id = state
            .db
            .add_application(crate::models::application::NewApplication {
                user_id: "u1".to_string(),
                company: "Acme".to_string(),
                role: "Engineer".to_string(),
                jd_text: "JD".to_string(),
                date: chrono::Utc::now(),
            })
            .app_id;
        let app = build_router(state);

        let response = call(
            &app,
            post_json("/api/ai/prep", json!({"app_id": app_id, "user_id": "u1"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["error"]["code"], "AI_ERROR");
    }

    #[tokio::test]
    async fn test_practice_chat_follows_keywords() {
        let state = test_state();
        state.db.save_user_profile("u1", None, Some("Ada Lovelace"));
        let app = build_router(state);

        let opening = call(
            &app,
            post_json("/api/ai/chat", json!({"user_id": "u1", "message": "Hello!"})),
        )
        .await;
        assert_eq!(opening.status(), StatusCode::OK);
        let reply = json_body(opening).await["reply"].as_str().unwrap().to_string();
        assert!(reply.starts_with("Hello, Ada Lovelace!"));

        let follow_up = json_body(
            call(
                &app,
                post_json(
                    "/api/ai/chat",
                    json!({"user_id": "u1", "message": "My STAR answer: the problem was..."}),
                ),
            )
            .await,
        )
        .await;
        assert!(follow_up["reply"]
            .as_str()
            .unwrap()
            .contains("dive deeper into the **Action** part"));

        let behavioral = json_body(
            call(
                &app,
                post_json("/api/ai/chat", json!({"user_id": "u1", "message": "Okay"})),
            )
            .await,
        )
        .await;
        assert!(behavioral["reply"]
            .as_str()
            .unwrap()
            .starts_with("Thank you. Let's move to a behavioral question"));
    }

    #[tokio::test]
    async fn test_practice_chat_greets_unknown_user_as_guest() {
        let app = build_router(test_state());
        let body = json_body(
            call(
                &app,
                post_json("/api/ai/chat", json!({"user_id": "nobody", "message": "start"})),
            )
            .await,
        )
        .await;
        assert!(body["reply"].as_str().unwrap().starts_with("Hello, Guest!"));
    }

    #[tokio::test]
    async fn test_practice_chat_rejects_blank_message_and_unknown_app() {
        let app = build_router(test_state());

        let blank = call(
            &app,
            post_json("/api/ai/chat", json!({"user_id": "u1", "message": "  "})),
        )
        .await;
        assert_eq!(blank.status(), StatusCode::BAD_REQUEST);

        let unknown = call(
            &app,
            post_json(
                "/api/ai/chat",
                json!({"user_id": "u1", "message": "hello", "app_id": "APP-0-000"}),
            ),
        )
        .await;
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_blank_resume_is_rejected() {
        let app = build_router(test_state());
        let response = call(
            &app,
            post_json(
                "/api/scheduler/mock-save-resume/u1",
                json!({"resume_text": "   "}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_user_status_defaults_to_mock_user() {
        let state = test_state();
        let app = build_router(state.clone());

        let body = json_body(call(&app, get("/auth/user/status")).await).await;
        assert_eq!(body["authenticated"], false);

        state.db.save_user_token("MOCK_USER_ID", "tok");
        let body = json_body(call(&app, get("/auth/user/status")).await).await;
        assert_eq!(body["authenticated"], true);
        assert_eq!(body["message"], "User token active.");
    }

    #[tokio::test]
    async fn test_oauth_round_trip_saves_token() {
        let state = test_state();
        let app = build_router(state.clone());

        let oauth_state = login_state(&app).await;
        assert_eq!(state.pending_states.len(), 1);

        let response = call(
            &app,
            get(&format!("/auth/google/callback?state={oauth_state}&code=ok")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Authentication successful!");
        assert_eq!(body["user_id"], "google-42");
        assert_eq!(body["name"], "Ada Lovelace");

        assert_eq!(state.db.get_user_token("google-42").as_deref(), Some("refresh-xyz"));
        let status = json_body(call(&app, get("/auth/user/status?user_id=google-42")).await).await;
        assert_eq!(status["authenticated"], true);
    }

    #[tokio::test]
    async fn test_oauth_state_cannot_be_replayed() {
        let app = build_router(test_state());
        let oauth_state = login_state(&app).await;
        let uri = format!("/auth/google/callback?state={oauth_state}&code=ok");

        assert_eq!(call(&app, get(&uri)).await.status(), StatusCode::OK);
        let replay = call(&app, get(&uri)).await;
        assert_eq!(replay.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(replay).await["error"]["code"], "STATE_MISMATCH");
    }

    #[tokio::test]
    async fn test_oauth_callback_without_state_is_rejected() {
        let app = build_router(test_state());
        let response = call(&app, get("/auth/google/callback?code=ok")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oauth_exchange_failure_is_bad_gateway() {
        let app = build_router(test_state());
        let oauth_state = login_state(&app).await;
        let response = call(
            &app,
            get(&format!("/auth/google/callback?state={oauth_state}&code=bad")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_oauth_callback_without_code_is_rejected() {
        let state = test_state();
        let app = build_router(state.clone());
        let oauth_state = login_state(&app).await;

        let response = call(&app, get(&format!("/auth/google/callback?state={oauth_state}"))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "Missing authorization code");
        assert!(state.db.get_user("google-42").is_none());
    }

    #[tokio::test]
    async fn test_oauth_callback_with_denied_consent_is_rejected() {
        let state = test_state();
        let app = build_router(state.clone());
        let oauth_state = login_state(&app).await;

        let response = call(
            &app,
            get(&format!(
                "/auth/google/callback?state={oauth_state}&error=access_denied"
            )),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(
            body["error"]["message"],
            "Google denied authorization: access_denied"
        );
        assert!(state.db.get_user("google-42").is_none());
        assert_eq!(state.pending_states.len(), 0);
    }

    #[tokio::test]
    async fn test_oauth_without_refresh_token_stays_unauthenticated() {
        let mut state = test_state();
        state.oauth = Arc::new(FakeOAuth {
            refresh_token: None,
        });
        let app = build_router(state.clone());
        let oauth_state = login_state(&app).await;

        let response = call(
            &app,
            get(&format!("/auth/google/callback?state={oauth_state}&code=ok")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(state.db.get_user_token("google-42").is_none());
        assert_eq!(
            state.db.get_user("google-42").unwrap().email.as_deref(),
            Some("ada@example.com")
        );
    }

    #[tokio::test]
    async fn test_oauth_callback_redirects_to_frontend() {
        let mut state = test_state();
        state.config.frontend_url = Some("http://localhost:8501/".to_string());
        let app = build_router(state);
        let oauth_state = login_state(&app).await;

        let response = call(
            &app,
            get(&format!("/auth/google/callback?state={oauth_state}&code=ok")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        let target = Url::parse(&location(&response)).unwrap();
        assert_eq!(target.host_str(), Some("localhost"));
        let params: std::collections::HashMap<String, String> =
            target.query_pairs().into_owned().collect();
        assert_eq!(params["auth_success"], "true");
        assert_eq!(params["user_id"], "google-42");
        assert_eq!(params["user_name"], "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_start_check_schedules_in_background() {
        let state = test_state();
        state.db.save_user_token("u1", "tok");
        let app = build_router(state.clone());

        let response = call(
            &app,
            post_json(
                "/api/scheduler/start-check",
                json!({"id": "u1", "email": "u1@example.com", "name": "U One"}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await["message"],
            "Background Gmail check initiated."
        );

        for _ in 0..100 {
            if !state.db.get_applications("u1").is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(state.db.get_applications("u1").len(), 1);
    }

    #[tokio::test]
    async fn test_start_check_requires_user_id() {
        let app = build_router(test_state());
        let response = call(
            &app,
            post_json(
                "/api/scheduler/start-check",
                json!({"id": "", "email": "", "name": ""}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    fn multipart_upload(uri: &str, file_name: &str, content: &str) -> Request<Body> {
        let boundary = "----tracker-test-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"resume\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             {content}\r\n\
             --{boundary}--\r\n"
        );
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_resume_file_upload_stores_text() {
        let state = test_state();
        let app = build_router(state.clone());

        let response = call(
            &app,
            multipart_upload("/api/scheduler/resume/u1", "cv.txt", "Jane Doe\nRust engineer"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["file_name"], "cv.txt");
        assert_eq!(body["characters"], 22);
        assert_eq!(
            state.db.get_user_resume("u1").as_deref(),
            Some("Jane Doe\nRust engineer")
        );
    }

    #[tokio::test]
    async fn test_resume_upload_rejects_unsupported_type() {
        let app = build_router(test_state());
        let response = call(
            &app,
            multipart_upload("/api/scheduler/resume/u1", "cv.docx", "binary"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_resume_upload_rejects_empty_text() {
        let app = build_router(test_state());
        let response = call(
            &app,
            multipart_upload("/api/scheduler/resume/u1", "cv.txt", "  "),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_cors_allows_dashboard_origin_only() {
        let config = test_config();
        let app = build_router(test_state()).layer(cors_layer(&config.cors_origins));

        let preflight = |origin: &str| {
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/ai/prep")
                .header(header::ORIGIN, origin)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap()
        };

        let allowed = call(&app, preflight("http://localhost:8501")).await;
        assert_eq!(
            allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:8501"
        );
        assert_eq!(
            allowed.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );

        let denied = call(&app, preflight("http://evil.example")).await;
        assert!(denied
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
