//! Wire-level tests for `HttpPolicyApi` against an in-process axum server
//! that records each request and answers from a script.

use axum::{
    Router,
    body::to_bytes,
    extract::{Request, State},
    http::{
        StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use client::{ApiError, HttpPolicyApi, PolicyApi};
use shared::models::{Credentials, NewPolicy, PolicyPatch, Role};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    path: String,
    content_type: Option<String>,
    authorization: Option<String>,
    body: String,
}

#[derive(Debug, Default)]
struct Recorder {
    requests: Mutex<Vec<Recorded>>,
    responses: HashMap<(String, String), (u16, String)>,
}

impl Recorder {
    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    fn only_request(&self) -> Recorded {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests[0].clone()
    }
}

async fn record(State(recorder): State<Arc<Recorder>>, request: Request) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(request.into_body(), usize::MAX).await.unwrap();

    recorder.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        content_type,
        authorization,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    });

    let (status, body) = recorder
        .responses
        .get(&(method, path))
        .cloned()
        .unwrap_or((404, r#"{"detail":"Not Found"}"#.to_string()));
    (
        StatusCode::from_u16(status).unwrap(),
        [(CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

/// Start a server answering `(method, path)` with `(status, body)`.
async fn serve(script: &[(&str, &str, u16, &str)]) -> (HttpPolicyApi, Arc<Recorder>) {
    let recorder = Arc::new(Recorder {
        requests: Mutex::default(),
        responses: script
            .iter()
            .map(|(method, path, status, body)| {
                (
                    ((*method).to_string(), (*path).to_string()),
                    (*status, (*body).to_string()),
                )
            })
            .collect(),
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new()
        .fallback(record)
        .with_state(Arc::clone(&recorder));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (HttpPolicyApi::new(&format!("http://{addr}")), recorder)
}

fn credentials(role: Role) -> Credentials {
    Credentials {
        username: "alice".into(),
        password: "secret".into(),
        role,
    }
}

#[tokio::test]
async fn test_login_posts_form_encoded_credentials() {
    let (api, recorder) = serve(&[(
        "POST",
        "/login",
        200,
        r#"{"access_token":"T","token_type":"bearer"}"#,
    )])
    .await;

    let body = api.login(&credentials(Role::User)).await.unwrap();
    assert_eq!(body.token(), Some("T"));

    let request = recorder.only_request();
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/login");
    assert_eq!(
        request.content_type.as_deref(),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(request.body, "username=alice&password=secret&role=user");
    assert_eq!(request.authorization, None);
}

#[tokio::test]
async fn test_register_posts_json_credentials() {
    let (api, recorder) = serve(&[("POST", "/register", 200, r#"{"access_token":"R"}"#)]).await;

    let body = api.register(&credentials(Role::Admin)).await.unwrap();
    assert_eq!(body.token(), Some("R"));

    let request = recorder.only_request();
    assert_eq!(request.path, "/register");
    assert_eq!(request.content_type.as_deref(), Some("application/json"));
    let json: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"username": "alice", "password": "secret", "role": "admin"})
    );
}

#[tokio::test]
async fn test_auth_body_without_token_is_not_an_error() {
    let (api, _recorder) = serve(&[("POST", "/login", 200, r#"{"message":"ok"}"#)]).await;
    let body = api.login(&credentials(Role::User)).await.unwrap();
    assert_eq!(body.token(), None);
}

#[tokio::test]
async fn test_rejected_login_carries_detail() {
    let (api, _recorder) = serve(&[(
        "POST",
        "/login",
        400,
        r#"{"detail":"Incorrect username or password"}"#,
    )])
    .await;

    let err = api.login(&credentials(Role::User)).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Status {
            status: 400,
            detail: Some("Incorrect username or password".into()),
        }
    );
}

#[tokio::test]
async fn test_list_policies_sends_bearer_token() {
    let (api, recorder) = serve(&[(
        "GET",
        "/policies",
        200,
        r#"[{"id":2,"name":"Home","details":"Fire","owner":"bob"},
            {"id":1,"name":"Life","details":"Term","owner":"alice"}]"#,
    )])
    .await;

    let policies = api.list_policies("T").await.unwrap();
    let ids: Vec<i64> = policies.iter().map(|policy| policy.id).collect();
    assert_eq!(ids, vec![2, 1]);

    let request = recorder.only_request();
    assert_eq!(request.method, "GET");
    assert_eq!(request.authorization.as_deref(), Some("Bearer T"));
}

#[tokio::test]
async fn test_create_policy_posts_draft_json() {
    let (api, recorder) = serve(&[(
        "POST",
        "/policies",
        200,
        r#"{"id":7,"name":"Car","details":"Full","owner":"alice"}"#,
    )])
    .await;

    let draft = NewPolicy {
        name: "Car".into(),
        details: "Full".into(),
    };
    let created = api.create_policy("T", &draft).await.unwrap();
    assert_eq!(created.id, 7);
    assert_eq!(created.owner, "alice");

    let request = recorder.only_request();
    assert_eq!(request.authorization.as_deref(), Some("Bearer T"));
    assert_eq!(request.content_type.as_deref(), Some("application/json"));
    let json: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(json, serde_json::json!({"name": "Car", "details": "Full"}));
}

#[tokio::test]
async fn test_update_policy_patches_only_changed_fields() {
    let (api, recorder) = serve(&[(
        "PATCH",
        "/policies/7",
        200,
        r#"{"id":7,"name":"Car Plus","details":"Full","owner":"alice"}"#,
    )])
    .await;

    let patch = PolicyPatch {
        name: Some("Car Plus".into()),
        ..PolicyPatch::default()
    };
    let updated = api.update_policy("T", 7, &patch).await.unwrap();
    assert_eq!(updated.name, "Car Plus");

    let request = recorder.only_request();
    assert_eq!(request.method, "PATCH");
    let json: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(json, serde_json::json!({"name": "Car Plus"}));
}

#[tokio::test]
async fn test_delete_policy_ignores_response_body() {
    let (api, recorder) = serve(&[(
        "DELETE",
        "/policies/5",
        200,
        r#"{"message":"Policy deleted"}"#,
    )])
    .await;

    api.delete_policy("T", 5).await.unwrap();

    let request = recorder.only_request();
    assert_eq!(request.method, "DELETE");
    assert_eq!(request.path, "/policies/5");
    assert_eq!(request.authorization.as_deref(), Some("Bearer T"));
}

#[tokio::test]
async fn test_forbidden_delete_reports_status() {
    let (api, _recorder) = serve(&[(
        "DELETE",
        "/policies/5",
        403,
        r#"{"detail":"Admin access required"}"#,
    )])
    .await;

    let err = api.delete_policy("T", 5).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 403, .. }));
    assert!(err.has_response());
    assert!(err.to_string().contains("Admin access required"));
}

#[tokio::test]
async fn test_validation_detail_list_is_flattened() {
    let (api, _recorder) = serve(&[(
        "POST",
        "/policies",
        422,
        r#"{"detail":[{"loc":["body","name"],"msg":"field required","type":"value_error"}]}"#,
    )])
    .await;

    let draft = NewPolicy {
        name: "x".into(),
        details: "y".into(),
    };
    let err = api.create_policy("T", &draft).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Status {
            status: 422,
            detail: Some("field required".into()),
        }
    );
}

#[tokio::test]
async fn test_non_json_error_body_has_no_detail() {
    let (api, _recorder) = serve(&[("GET", "/policies", 500, "Internal Server Error")]).await;
    let err = api.list_policies("T").await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Status {
            status: 500,
            detail: None,
        }
    );
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let (api, _recorder) = serve(&[("GET", "/policies", 200, r#"{"not":"a list"}"#)]).await;
    let err = api.list_policies("T").await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpPolicyApi::new(&format!("http://{addr}"));
    let err = api.list_policies("T").await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert!(!err.has_response());
}
