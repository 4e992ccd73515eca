//! Integration tests for the TestRail HTTP backend.
//!
//! Each test starts an in-process fake TestRail on an ephemeral port and
//! inspects the requests the backend sends to it.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};

use railyard_tracker::{
    CaseId, CaseResult, NewRun, ProjectId, ResultsForCases, RunId, StatusId, SuiteId, TrackerApi,
    TrackerError,
};
use railyard_tracker_http::{HttpTracker, HttpTrackerConfig};

#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    endpoint: String,
    authorization: Option<String>,
    content_type: Option<String>,
    body: serde_json::Value,
}

#[derive(Clone, Default)]
struct FakeRail {
    requests: Arc<Mutex<Vec<Recorded>>>,
    reject_add_run: bool,
}

impl FakeRail {
    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

async fn handle(
    State(rail): State<FakeRail>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let endpoint = uri
        .query()
        .unwrap_or_default()
        .trim_start_matches("/api/v2/")
        .to_string();
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);

    rail.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        endpoint: endpoint.clone(),
        authorization: header("authorization"),
        content_type: header("content-type"),
        body: body.clone(),
    });

    match endpoint.as_str() {
        "get_suite/3" => (
            StatusCode::OK,
            r#"{"id":3,"name":"Login","description":null,"project_id":1}"#.to_string(),
        ),
        "get_suite/5" => (StatusCode::OK, "<html>maintenance</html>".to_string()),
        e if e.starts_with("get_suite/") => (
            StatusCode::BAD_REQUEST,
            r#"{"error":"Field :suite_id is not a valid test suite."}"#.to_string(),
        ),
        "add_run/1" if rail.reject_add_run => (
            StatusCode::FORBIDDEN,
            r#"{"error":"You are not allowed to add test runs."}"#.to_string(),
        ),
        "add_run/1" => (
            StatusCode::OK,
            serde_json::json!({
                "id": 81,
                "name": body["name"],
                "suite_id": body["suite_id"],
                "is_completed": false,
                "url": "http://rail.local/index.php?/runs/view/81"
            })
            .to_string(),
        ),
        "add_results_for_cases/81" => (StatusCode::OK, "[]".to_string()),
        "close_run/81" => (
            StatusCode::OK,
            r#"{"id":81,"is_completed":true}"#.to_string(),
        ),
        _ => (
            StatusCode::NOT_FOUND,
            r#"{"error":"Unknown method"}"#.to_string(),
        ),
    }
}

async fn start(rail: FakeRail) -> SocketAddr {
    let app = Router::new().fallback(handle).with_state(rail);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn connect(addr: SocketAddr) -> HttpTracker {
    HttpTracker::new(HttpTrackerConfig {
        host: format!("http://{addr}/"),
        user: "ci".to_string(),
        password: "key".to_string(),
        ..Default::default()
    })
    .unwrap()
}

fn suite(id: u64) -> SuiteId {
    SuiteId::new(id).unwrap()
}

#[tokio::test]
async fn test_get_suite() {
    let rail = FakeRail::default();
    let tracker = connect(start(rail.clone()).await);

    let found = tracker.get_suite(suite(3)).await.unwrap();
    assert_eq!(found.name, "Login");
    assert_eq!(found.project_id, ProjectId::new(1).ok());

    let requests = rail.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::GET);
    assert_eq!(requests[0].endpoint, "get_suite/3");
    // base64("ci:key")
    assert_eq!(requests[0].authorization.as_deref(), Some("Basic Y2k6a2V5"));
}

#[tokio::test]
async fn test_full_pipeline_requests() {
    let rail = FakeRail::default();
    let tracker = connect(start(rail.clone()).await);
    let project = ProjectId::new(1).unwrap();

    let run = tracker
        .add_run(
            project,
            &NewRun::for_cases(suite(3), "Login - nightly", vec![CaseId::new(12).unwrap()]),
        )
        .await
        .unwrap();
    assert_eq!(run.id, RunId::new(81).unwrap());
    assert_eq!(run.name.as_deref(), Some("Login - nightly"));

    tracker
        .add_results_for_cases(
            run.id,
            &ResultsForCases {
                results: vec![CaseResult {
                    case_id: CaseId::new(12).unwrap(),
                    status_id: StatusId::Failed,
                    comment: "Expected true".to_string(),
                }],
            },
        )
        .await
        .unwrap();
    tracker.close_run(run.id).await.unwrap();

    let requests = rail.requests();
    let endpoints: Vec<&str> = requests.iter().map(|r| r.endpoint.as_str()).collect();
    assert_eq!(
        endpoints,
        vec!["add_run/1", "add_results_for_cases/81", "close_run/81"]
    );
    assert!(requests.iter().all(|r| r.method == Method::POST));
    assert!(
        requests
            .iter()
            .all(|r| r.content_type.as_deref() == Some("application/json"))
    );

    assert_eq!(
        requests[0].body,
        serde_json::json!({
            "suite_id": 3,
            "name": "Login - nightly",
            "include_all": false,
            "case_ids": [12]
        })
    );
    assert_eq!(
        requests[1].body,
        serde_json::json!({
            "results": [{ "case_id": 12, "status_id": 5, "comment": "Expected true" }]
        })
    );
}

#[tokio::test]
async fn test_api_error_carries_testrail_message() {
    let rail = FakeRail::default();
    let tracker = connect(start(rail).await);

    let err = tracker.get_suite(suite(9)).await.unwrap_err();
    match err {
        TrackerError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Field :suite_id is not a valid test suite.");
        }
        other => panic!("expected Api, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rejected_add_run() {
    let rail = FakeRail {
        reject_add_run: true,
        ..Default::default()
    };
    let tracker = connect(start(rail).await);

    let err = tracker
        .add_run(
            ProjectId::new(1).unwrap(),
            &NewRun::for_cases(suite(3), "denied", vec![]),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::Api { status: 403, .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_undecodable_body() {
    let rail = FakeRail::default();
    let tracker = connect(start(rail).await);

    let err = tracker.get_suite(suite(5)).await.unwrap_err();
    assert!(matches!(err, TrackerError::Decode(_)), "got: {err:?}");
}

#[tokio::test]
async fn test_unreachable_host() {
    let tracker = HttpTracker::new(HttpTrackerConfig {
        host: "http://127.0.0.1:1".to_string(),
        ..Default::default()
    })
    .unwrap();

    let err = tracker.close_run(RunId::new(1).unwrap()).await.unwrap_err();
    assert!(matches!(err, TrackerError::Connection(_)), "got: {err:?}");
}
