//! Integration tests for API route handlers
//!
//! Tests key endpoints:
//! - POST /api/requests - Store and dispatch a request (new or reused)
//! - GET /api/requests - History with search
//! - GET /api/requests/{id} - Single request
//! - GET /api/projects - Project picker entries
//! - POST /api/webhook-proxy - Pure relay to the automation webhook
//! - POST /api/callback - Results reported by the automation system
//! - GET /api/settings - Callback URL shown by the frontend
//!
//! The automation webhook is a local axum server that records what it receives.

use std::path::PathBuf;
use std::sync::{Arc, Mutex as StdMutex};

use axum::{
    Router,
    body::Body,
    extract::Json,
    http::{Request, StatusCode, header},
    routing::post,
};
use data_model_tkw::{
    db::DbPool,
    models::{
        CallbackResponse, GenerationRequest, ProjectListResponse, RequestListResponse, RequestState, RequestStatus,
        SettingsResponse, SubmitResponse,
    },
    test_helpers::{
        TestDbGuard, clean_test_db, count_requests_with_status, create_test_request, get_request_by_id,
        get_requests_by_name, seed_test_data, test_db_pool,
    },
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tower::ServiceExt;
use url::Url;
use uuid::Uuid;

use api_tkw::{routes::router, state::AppState};
use core_tkw::AutomationClient;

const CALLBACK_URL: &str = "https://words.example/api/callback";

/// Stand-in for the automation webhook.
struct MockAutomation {
    url: Url,
    received: Arc<StdMutex<Vec<Value>>>,
}

impl MockAutomation {
    /// Answers every POST to `/hook` with `status` and `answer`, keeping the bodies it was sent.
    async fn start(status: StatusCode, answer: Value) -> Self {
        let received = Arc::new(StdMutex::new(Vec::new()));
        let sink = received.clone();
        let app = Router::new().route(
            "/hook",
            post(move |Json(body): Json<Value>| {
                let sink = sink.clone();
                let answer = answer.clone();
                async move {
                    sink.lock().unwrap().push(body);
                    (status, Json(answer))
                }
            }),
        );

        MockAutomation {
            url: serve_hook(app).await,
            received,
        }
    }

    async fn accepting() -> Self {
        Self::start(StatusCode::OK, json!({"message": "Workflow was started"})).await
    }

    fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }
}

/// Serves `app` on an ephemeral port and returns the URL of its `/hook` route.
async fn serve_hook(app: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Url::parse(&format!("http://{}/hook", addr)).unwrap()
}

/// A webhook URL nothing listens on.
async fn unreachable_url() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{}/hook", addr)).unwrap()
}

fn static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../front-tkw/www")
}

/// Helper to create a router with test database (does NOT clean DB)
async fn test_router(automation_url: Url) -> Router {
    let pool = test_db_pool().await;
    let automation = AutomationClient::new(reqwest::Client::new(), automation_url);
    let state = AppState::new(pool, automation, Url::parse(CALLBACK_URL).unwrap());
    router(&static_dir()).with_state(state)
}

/// Clean database plus a router dispatching to `automation`
async fn setup(automation: &MockAutomation) -> (DbPool, Router) {
    let pool = test_db_pool().await;
    clean_test_db(&pool).await;
    (pool, test_router(automation.url.clone()).await)
}

/// Helper to parse JSON response body
async fn response_json<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn acme_submission() -> Value {
    json!({
        "projectName": "Acme",
        "businessDetails": "B2B SaaS",
        "websiteStructure": "Home, Pricing"
    })
}

/// Ensures tests that need sequential access work correctly.
static TEST_MUTEX: Mutex<()> = Mutex::const_new(());

//
// GET /health
//

#[tokio::test]
async fn test_health() {
    let _db = TestDbGuard::acquire().await;

    let automation = MockAutomation::accepting().await;
    let app = test_router(automation.url.clone()).await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"healthy");
}

#[tokio::test]
async fn test_settings_exposes_callback_url() {
    let _db = TestDbGuard::acquire().await;

    let automation = MockAutomation::accepting().await;
    let app = test_router(automation.url.clone()).await;

    let response = app.oneshot(get("/api/settings")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: SettingsResponse = response_json(response.into_body()).await;
    assert_eq!(body.callback_url, CALLBACK_URL);
}

#[tokio::test]
async fn test_unknown_path_serves_index_page() {
    let _db = TestDbGuard::acquire().await;

    let automation = MockAutomation::accepting().await;
    let app = test_router(automation.url.clone()).await;

    let response = app.oneshot(get("/history")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&bytes).contains("<html"));
}

//
// POST /api/requests
//

#[tokio::test]
async fn test_submit_new_project_creates_and_dispatches() {
    let _db = TestDbGuard::acquire().await;
    let _guard = TEST_MUTEX.lock().await;

    let automation = MockAutomation::accepting().await;
    let (pool, app) = setup(&automation).await;

    let response = app
        .oneshot(post_json("/api/requests", &acme_submission()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: SubmitResponse = response_json(response.into_body()).await;
    assert!(!body.reused);
    assert_eq!(body.automation, json!({"message": "Workflow was started"}));

    let stored = get_request_by_id(&pool, body.id).await.expect("request should be stored");
    assert_eq!(stored.state(), RequestState::Pending);
    assert_eq!(stored.project_name, "Acme");

    let received = automation.received();
    assert_eq!(received.len(), 1);
    assert_eq!(
        received[0],
        json!({
            "id": body.id,
            "projectName": "Acme",
            "businessDetails": "B2B SaaS",
            "websiteStructure": "Home, Pricing",
            "callbackUrl": CALLBACK_URL
        })
    );
}

#[tokio::test]
async fn test_submit_trims_fields() {
    let _db = TestDbGuard::acquire().await;
    let _guard = TEST_MUTEX.lock().await;

    let automation = MockAutomation::accepting().await;
    let (pool, app) = setup(&automation).await;

    let payload = json!({
        "projectName": "  Acme ",
        "businessDetails": "\tB2B SaaS\n",
        "websiteStructure": " Home "
    });
    let response = app.oneshot(post_json("/api/requests", &payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: SubmitResponse = response_json(response.into_body()).await;
    let stored = get_request_by_id(&pool, body.id).await.unwrap();
    assert_eq!(stored.project_name, "Acme");
    assert_eq!(stored.business_details, "B2B SaaS");
    assert_eq!(stored.website_structure, "Home");
    assert_eq!(automation.received()[0]["projectName"], "Acme");
}

#[tokio::test]
async fn test_submit_rejects_blank_fields() {
    let _db = TestDbGuard::acquire().await;
    let _guard = TEST_MUTEX.lock().await;

    let automation = MockAutomation::accepting().await;
    let (pool, app) = setup(&automation).await;

    let payload = json!({"projectName": "Acme", "businessDetails": "   "});
    let response = app.oneshot(post_json("/api/requests", &payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response_json(response.into_body()).await;
    assert_eq!(body["error"], "invalid_input");
    assert_eq!(body["details"], "Missing required fields: Business Details, Website Structure");

    assert_eq!(count_requests_with_status(&pool, RequestStatus::Pending).await, 0);
    assert!(automation.received().is_empty());
}

#[tokio::test]
async fn test_submit_existing_project_reuses_latest_record() {
    let _db = TestDbGuard::acquire().await;
    let _guard = TEST_MUTEX.lock().await;

    let automation = MockAutomation::accepting().await;
    let (pool, app) = setup(&automation).await;
    let seeded = seed_test_data(&pool).await;
    // seeded[3] is an older "Acme", seeded[0] the latest one
    let latest = &seeded[0];

    let payload = json!({
        "projectName": "Acme",
        "businessDetails": "Rewritten details",
        "websiteStructure": "Home, Pricing, Blog"
    });
    let response = app.oneshot(post_json("/api/requests", &payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: SubmitResponse = response_json(response.into_body()).await;
    assert!(body.reused);
    assert_eq!(body.id, latest.id);

    let stored = get_request_by_id(&pool, latest.id).await.unwrap();
    assert_eq!(stored.state(), RequestState::Pending);
    assert_eq!(stored.website_structure, "Home, Pricing, Blog");
    assert_eq!(stored.business_details, latest.business_details);
    assert_eq!(stored.created_at, latest.created_at);

    // No new record, and the older duplicate is untouched
    assert_eq!(get_requests_by_name(&pool, "Acme").await.len(), 2);
    let older = get_request_by_id(&pool, seeded[3].id).await.unwrap();
    assert_eq!(older.state(), seeded[3].state());

    // The dispatch carries the stored id with the values just submitted
    let received = automation.received();
    assert_eq!(received[0]["id"], json!(latest.id));
    assert_eq!(received[0]["businessDetails"], "Rewritten details");
}

#[tokio::test]
async fn test_resubmitting_a_finished_request_clears_its_outcome() {
    let _db = TestDbGuard::acquire().await;
    let _guard = TEST_MUTEX.lock().await;

    let automation = MockAutomation::accepting().await;
    let (pool, app) = setup(&automation).await;
    let globex = create_test_request(
        &pool,
        "Globex",
        "Consulting",
        "About",
        RequestState::Error {
            error_message: "LLM quota exceeded".to_string(),
        },
    )
    .await;

    let payload = json!({
        "projectName": "Globex",
        "businessDetails": "Consulting",
        "websiteStructure": "About, Team"
    });
    let response = app.oneshot(post_json("/api/requests", &payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stored = get_request_by_id(&pool, globex.id).await.unwrap();
    assert_eq!(stored.status, RequestStatus::Pending);
    assert_eq!(stored.error_message, None);
    assert_eq!(stored.output_link, None);
}

#[tokio::test]
async fn test_submit_propagates_automation_status() {
    let _db = TestDbGuard::acquire().await;
    let _guard = TEST_MUTEX.lock().await;

    let automation = MockAutomation::start(StatusCode::NOT_FOUND, json!({"message": "webhook not registered"})).await;
    let (pool, app) = setup(&automation).await;

    let response = app
        .oneshot(post_json("/api/requests", &acme_submission()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = response_json(response.into_body()).await;
    assert_eq!(body["error"], "service");
    assert_eq!(body["details"]["status"], 404);

    // The record was committed before dispatch and stays pending
    let stored = get_requests_by_name(&pool, "Acme").await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].state(), RequestState::Pending);
}

#[tokio::test]
async fn test_submit_with_unreachable_automation_is_bad_gateway() {
    let _db = TestDbGuard::acquire().await;
    let _guard = TEST_MUTEX.lock().await;

    let pool = test_db_pool().await;
    clean_test_db(&pool).await;
    let app = test_router(unreachable_url().await).await;

    let response = app
        .oneshot(post_json("/api/requests", &acme_submission()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body: Value = response_json(response.into_body()).await;
    assert_eq!(body["error"], "network");
    assert_eq!(count_requests_with_status(&pool, RequestStatus::Pending).await, 1);
}

//
// GET /api/requests
//

#[tokio::test]
async fn test_history_is_newest_first() {
    let _db = TestDbGuard::acquire().await;
    let _guard = TEST_MUTEX.lock().await;

    let automation = MockAutomation::accepting().await;
    let (pool, app) = setup(&automation).await;
    let seeded = seed_test_data(&pool).await;

    let response = app.oneshot(get("/api/requests")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: RequestListResponse = response_json(response.into_body()).await;
    let ids: Vec<Uuid> = body.items.iter().map(|r| r.id).collect();
    let expected: Vec<Uuid> = seeded.iter().map(|r| r.id).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn test_history_search() {
    let _db = TestDbGuard::acquire().await;
    let _guard = TEST_MUTEX.lock().await;

    let automation = MockAutomation::accepting().await;
    let (pool, app) = setup(&automation).await;
    let seeded = seed_test_data(&pool).await;

    let response = app.oneshot(get("/api/requests?search=SAAS")).await.unwrap();
    let body: RequestListResponse = response_json(response.into_body()).await;
    let ids: Vec<Uuid> = body.items.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![seeded[0].id, seeded[2].id]);
}

#[tokio::test]
async fn test_history_rows_carry_outcome() {
    let _db = TestDbGuard::acquire().await;
    let _guard = TEST_MUTEX.lock().await;

    let automation = MockAutomation::accepting().await;
    let (pool, app) = setup(&automation).await;
    seed_test_data(&pool).await;

    let response = app.oneshot(get("/api/requests?search=bakery")).await.unwrap();
    let body: Value = response_json(response.into_body()).await;
    let crumbs = &body["items"][0];
    assert_eq!(crumbs["status"], "ready");
    assert_eq!(crumbs["output_link"], "https://docs.example/crumbs");
    assert!(crumbs.get("error_message").is_none());
}

//
// GET /api/requests/{id}
//

#[tokio::test]
async fn test_get_request_by_id() {
    let _db = TestDbGuard::acquire().await;
    let _guard = TEST_MUTEX.lock().await;

    let automation = MockAutomation::accepting().await;
    let (pool, app) = setup(&automation).await;
    let seeded = seed_test_data(&pool).await;

    let response = app
        .oneshot(get(&format!("/api/requests/{}", seeded[2].id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: GenerationRequest = response_json(response.into_body()).await;
    assert_eq!(body.project_name, "Globex");
    assert_eq!(
        body.state(),
        RequestState::Error {
            error_message: "LLM quota exceeded".to_string()
        }
    );
}

#[tokio::test]
async fn test_get_request_invalid_and_unknown_id() {
    let _db = TestDbGuard::acquire().await;
    let _guard = TEST_MUTEX.lock().await;

    let automation = MockAutomation::accepting().await;
    let (_pool, app) = setup(&automation).await;

    let response = app.clone().oneshot(get("/api/requests/not-a-uuid")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response_json(response.into_body()).await;
    assert_eq!(body["error"], "invalid_id");

    let response = app
        .oneshot(get(&format!("/api/requests/{}", Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response_json(response.into_body()).await;
    assert_eq!(body["error"], "unknown_id");
}

//
// GET /api/projects
//

#[tokio::test]
async fn test_projects_one_per_name() {
    let _db = TestDbGuard::acquire().await;
    let _guard = TEST_MUTEX.lock().await;

    let automation = MockAutomation::accepting().await;
    let (pool, app) = setup(&automation).await;
    let seeded = seed_test_data(&pool).await;

    let response = app.oneshot(get("/api/projects")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: ProjectListResponse = response_json(response.into_body()).await;
    let names: Vec<&str> = body.items.iter().map(|p| p.project_name.as_str()).collect();
    assert_eq!(names, vec!["Acme", "Crumbs", "Globex"]);
    assert_eq!(body.items[0].id, seeded[0].id);
    assert_eq!(body.items[0].business_details, "B2B SaaS");
}

#[tokio::test]
async fn test_projects_search_applies_to_latest_records() {
    let _db = TestDbGuard::acquire().await;
    let _guard = TEST_MUTEX.lock().await;

    let automation = MockAutomation::accepting().await;
    let (pool, app) = setup(&automation).await;
    seed_test_data(&pool).await;

    // Only the older Acme record mentions "Old"
    let response = app.clone().oneshot(get("/api/projects?search=old")).await.unwrap();
    let body: ProjectListResponse = response_json(response.into_body()).await;
    assert!(body.items.is_empty());

    let response = app.oneshot(get("/api/projects?search=menu")).await.unwrap();
    let body: ProjectListResponse = response_json(response.into_body()).await;
    assert_eq!(body.items.len(), 1);
    assert_eq!(body.items[0].project_name, "Crumbs");
}

//
// POST /api/callback
//

#[tokio::test]
async fn test_callback_marks_request_ready() {
    let _db = TestDbGuard::acquire().await;
    let _guard = TEST_MUTEX.lock().await;

    let automation = MockAutomation::accepting().await;
    let (pool, app) = setup(&automation).await;
    let request = create_test_request(&pool, "Acme", "B2B SaaS", "Home", RequestState::Pending).await;

    let payload = json!({"id": request.id, "outputLink": "https://docs.example/acme"});
    let response = app.oneshot(post_json("/api/callback", &payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: CallbackResponse = response_json(response.into_body()).await;
    assert_eq!(body, CallbackResponse::ok());

    let stored = get_request_by_id(&pool, request.id).await.unwrap();
    assert_eq!(
        stored.state(),
        RequestState::Ready {
            output_link: "https://docs.example/acme".to_string()
        }
    );
    assert!(stored.updated_at > request.updated_at);
}

#[tokio::test]
async fn test_callback_error_wins_over_output_link() {
    let _db = TestDbGuard::acquire().await;
    let _guard = TEST_MUTEX.lock().await;

    let automation = MockAutomation::accepting().await;
    let (pool, app) = setup(&automation).await;
    let request = create_test_request(&pool, "Acme", "B2B SaaS", "Home", RequestState::Pending).await;

    let payload = json!({
        "id": request.id,
        "outputLink": "https://docs.example/acme",
        "error": "Document generation failed"
    });
    let response = app.oneshot(post_json("/api/callback", &payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stored = get_request_by_id(&pool, request.id).await.unwrap();
    assert_eq!(stored.status, RequestStatus::Error);
    assert_eq!(stored.error_message.as_deref(), Some("Document generation failed"));
    assert_eq!(stored.output_link, None);
}

#[tokio::test]
async fn test_callback_overwrites_finished_request() {
    let _db = TestDbGuard::acquire().await;
    let _guard = TEST_MUTEX.lock().await;

    let automation = MockAutomation::accepting().await;
    let (pool, app) = setup(&automation).await;
    let request = create_test_request(
        &pool,
        "Crumbs",
        "Bakery",
        "Menu",
        RequestState::Ready {
            output_link: "https://docs.example/first".to_string(),
        },
    )
    .await;

    let payload = json!({"id": request.id, "error": "Late failure"});
    let response = app.oneshot(post_json("/api/callback", &payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stored = get_request_by_id(&pool, request.id).await.unwrap();
    assert_eq!(
        stored.state(),
        RequestState::Error {
            error_message: "Late failure".to_string()
        }
    );
}

#[tokio::test]
async fn test_callback_rejections() {
    let _db = TestDbGuard::acquire().await;
    let _guard = TEST_MUTEX.lock().await;

    let automation = MockAutomation::accepting().await;
    let (pool, app) = setup(&automation).await;
    let request = create_test_request(&pool, "Acme", "B2B SaaS", "Home", RequestState::Pending).await;

    let cases = [
        (json!({"outputLink": "https://docs.example/x"}), "Invalid or missing id"),
        (json!({"id": 42, "outputLink": "https://docs.example/x"}), "Invalid or missing id"),
        (json!({"id": request.id}), "Invalid or missing outputLink"),
        (json!({"id": request.id, "outputLink": ""}), "Invalid or missing outputLink"),
        (json!({"id": request.id, "error": {"code": 1}}), "Invalid error message"),
        (json!(["not", "an", "object"]), "Invalid callback body"),
    ];

    for (payload, message) in cases {
        let response = app.clone().oneshot(post_json("/api/callback", &payload)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "payload: {}", payload);

        let body: CallbackResponse = response_json(response.into_body()).await;
        assert_eq!(body, CallbackResponse::failure(message), "payload: {}", payload);
    }

    // Nothing above touched the record
    let stored = get_request_by_id(&pool, request.id).await.unwrap();
    assert_eq!(stored.state(), RequestState::Pending);
}

#[tokio::test]
async fn test_callback_body_that_is_not_json() {
    let _db = TestDbGuard::acquire().await;
    let _guard = TEST_MUTEX.lock().await;

    let automation = MockAutomation::accepting().await;
    let (_pool, app) = setup(&automation).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/callback")
        .body(Body::from("id=123"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: CallbackResponse = response_json(response.into_body()).await;
    assert_eq!(body, CallbackResponse::failure("Invalid callback body"));
}

#[tokio::test]
async fn test_callback_for_unknown_id_is_a_no_op() {
    let _db = TestDbGuard::acquire().await;
    let _guard = TEST_MUTEX.lock().await;

    let automation = MockAutomation::accepting().await;
    let (pool, app) = setup(&automation).await;
    let request = create_test_request(&pool, "Acme", "B2B SaaS", "Home", RequestState::Pending).await;

    for id in [Uuid::new_v4().to_string(), "rec_123".to_string()] {
        let payload = json!({"id": id, "outputLink": "https://docs.example/x"});
        let response = app.clone().oneshot(post_json("/api/callback", &payload)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: CallbackResponse = response_json(response.into_body()).await;
        assert!(body.ok);
    }

    let stored = get_request_by_id(&pool, request.id).await.unwrap();
    assert_eq!(stored.state(), RequestState::Pending);
}

//
// POST /api/webhook-proxy
//

#[tokio::test]
async fn test_webhook_proxy_relays_answer() {
    let _db = TestDbGuard::acquire().await;
    let _guard = TEST_MUTEX.lock().await;

    let automation = MockAutomation::start(StatusCode::OK, json!({"accepted": true})).await;
    let (pool, app) = setup(&automation).await;

    let payload = json!({"anything": ["goes", 1, null]});
    let response = app.oneshot(post_json("/api/webhook-proxy", &payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response_json(response.into_body()).await;
    assert_eq!(body, json!({"accepted": true}));
    assert_eq!(automation.received(), vec![payload]);

    // A relay never stores anything
    assert_eq!(count_requests_with_status(&pool, RequestStatus::Pending).await, 0);
}

#[tokio::test]
async fn test_webhook_proxy_passes_upstream_status() {
    let _db = TestDbGuard::acquire().await;

    let automation = MockAutomation::start(StatusCode::NOT_FOUND, json!({"message": "not registered"})).await;
    let app = test_router(automation.url.clone()).await;

    let response = app
        .oneshot(post_json("/api/webhook-proxy", &json!({"id": 1})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = response_json(response.into_body()).await;
    assert_eq!(body, json!({"error": "Automation request failed: 404"}));
}

#[tokio::test]
async fn test_webhook_proxy_unreachable_is_internal_error() {
    let _db = TestDbGuard::acquire().await;

    let app = test_router(unreachable_url().await).await;

    let response = app
        .oneshot(post_json("/api/webhook-proxy", &json!({"id": 1})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response_json(response.into_body()).await;
    assert_eq!(body, json!({"error": "Internal server error"}));
}

#[tokio::test]
async fn test_webhook_proxy_non_json_answer_is_internal_error() {
    let _db = TestDbGuard::acquire().await;

    let hook = Router::new().route("/hook", post(|| async { (StatusCode::OK, "Workflow was started") }));
    let app = test_router(serve_hook(hook).await).await;

    let response = app
        .oneshot(post_json("/api/webhook-proxy", &json!({"id": 1})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response_json(response.into_body()).await;
    assert_eq!(body, json!({"error": "Internal server error"}));
}

//
// End to end
//

#[tokio::test]
async fn test_submit_then_callback_then_lookup() {
    let _db = TestDbGuard::acquire().await;
    let _guard = TEST_MUTEX.lock().await;

    let automation = MockAutomation::accepting().await;
    let (_pool, app) = setup(&automation).await;

    let response = app
        .clone()
        .oneshot(post_json("/api/requests", &acme_submission()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // The automation system answers through the callback with the id it was given
    let dispatched = &automation.received()[0];
    let callback = json!({"id": dispatched["id"], "outputLink": "https://docs.example/acme"});
    let response = app.clone().oneshot(post_json("/api/callback", &callback)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let id = dispatched["id"].as_str().unwrap();
    let response = app.clone().oneshot(get(&format!("/api/requests/{}", id))).await.unwrap();
    let body: GenerationRequest = response_json(response.into_body()).await;
    assert_eq!(body.status, RequestStatus::Ready);
    assert_eq!(body.output_link.as_deref(), Some("https://docs.example/acme"));

    // The history shows the finished run
    let response = app.oneshot(get("/api/requests")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let history: RequestListResponse = response_json(response.into_body()).await;
    assert_eq!(history.items.len(), 1);
    let acme = &history.items[0];
    assert_eq!(acme.id.to_string(), id);
    assert_eq!(acme.project_name, "Acme");
    assert_eq!(acme.status, RequestStatus::Ready);
    assert_eq!(acme.output_link.as_deref(), Some("https://docs.example/acme"));
    assert_eq!(acme.error_message, None);
}
