use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::app;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

/// Sends requests one after another against a single app instance.
struct Session {
    app: axum::Router,
}

impl Session {
    fn new() -> Self {
        Self { app: app() }
    }

    async fn send(&self, request: Request<String>) -> axum::response::Response {
        self.app.clone().oneshot(request).await.unwrap()
    }

    async fn create(&self, collection: &str, body: Value) -> Value {
        let resp = self
            .send(json_request("POST", &format!("/api/{collection}"), &body.to_string()))
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        body_json(resp).await
    }

    async fn list(&self, uri: &str) -> Vec<Value> {
        let resp = self.send(empty_request("GET", uri)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        body_json(resp).await
    }
}

fn metric(owner: &str, kind: &str, value: f64, measured_at: &str) -> Value {
    json!({
        "owner": owner,
        "metric_type": kind,
        "value": value,
        "unit": "kg",
        "measured_at": measured_at
    })
}

// --- list ---

#[tokio::test]
async fn list_empty_collection() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/medications"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let records: Vec<Value> = body_json(resp).await;
    assert!(records.is_empty());
}

#[tokio::test]
async fn unknown_collection_is_404_with_detail() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/prescriptions"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"detail": "Not Found"}));
}

#[tokio::test]
async fn list_filters_by_type_owner_and_dates() {
    let session = Session::new();
    session.create("health-metrics", metric("alice", "weight", 72.0, "2024-01-05T08:00:00")).await;
    session.create("health-metrics", metric("alice", "weight", 71.5, "2024-01-15T08:00:00")).await;
    session.create("health-metrics", metric("alice", "heart_rate", 64.0, "2024-01-15T08:00:00")).await;
    session.create("health-metrics", metric("bob", "weight", 90.0, "2024-01-15T08:00:00")).await;

    let weights = session
        .list("/api/health-metrics?metric_type=weight&owner=alice&start_date=2024-01-10&end_date=2024-01-31")
        .await;
    assert_eq!(weights.len(), 1);
    assert_eq!(weights[0]["value"], 71.5);

    let paged = session.list("/api/health-metrics?skip=1&limit=2").await;
    assert_eq!(paged.len(), 2);
    assert_eq!(paged[0]["value"], 71.5);
}

#[tokio::test]
async fn inactive_records_are_hidden_by_default() {
    let session = Session::new();
    let kept = session
        .create("supplements", json!({"owner": "alice", "name": "Vitamin D"}))
        .await;
    let archived = session
        .create("supplements", json!({"owner": "alice", "name": "Zinc", "is_active": false}))
        .await;

    let active = session.list("/api/supplements").await;
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["id"], kept["id"]);

    let inactive = session.list("/api/supplements?active=false").await;
    assert_eq!(inactive.len(), 1);
    assert_eq!(inactive[0]["id"], archived["id"]);
}

// --- create ---

#[tokio::test]
async fn create_assigns_server_fields() {
    let session = Session::new();
    let created = session
        .create("medications", json!({"owner": "alice", "name": "Metformin"}))
        .await;

    assert!(created["id"].as_i64().unwrap() > 0);
    assert_eq!(created["is_active"], true);
    assert_eq!(created["name"], "Metformin");
    assert_eq!(created["created_at"], created["updated_at"]);
}

#[tokio::test]
async fn create_without_owner_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/api/medications", r#"{"name":"Metformin"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = body_json(resp).await;
    assert_eq!(body["detail"], "owner is required");
}

#[tokio::test]
async fn create_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/api/symptoms", "{not json"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = body_json(resp).await;
    assert!(body["detail"].as_str().unwrap().starts_with("Invalid JSON"));
}

#[tokio::test]
async fn lab_values_get_row_ids_in_order() {
    let session = Session::new();
    let created = session
        .create(
            "lab-results",
            json!({
                "owner": "alice",
                "test_date": "2024-01-10",
                "values": [
                    {"test_name": "LDL Cholesterol", "value": "131", "unit": "mg/dL"},
                    {"test_name": "HDL Cholesterol", "value": "58", "unit": "mg/dL", "is_abnormal": true}
                ]
            }),
        )
        .await;

    let values = created["values"].as_array().unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(values[0]["test_name"], "LDL Cholesterol");
    assert_eq!(values[0]["lab_result_id"], created["id"]);
    assert_eq!(values[0]["is_abnormal"], false);
    assert_eq!(values[1]["is_abnormal"], true);
    assert!(values[0]["id"].as_i64() < values[1]["id"].as_i64());
}

// --- get / update / delete ---

#[tokio::test]
async fn get_missing_record_names_the_kind() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/medications/999"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["detail"], "Medication not found");
}

#[tokio::test]
async fn get_non_numeric_id_returns_400() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/medications/abc"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_missing_record_returns_404() {
    let resp = app()
        .oneshot(json_request("PUT", "/api/goals/12", r#"{"name":"Nope"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_missing_record_returns_404() {
    let resp = app()
        .oneshot(empty_request("DELETE", "/api/goals/12"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn crud_lifecycle() {
    let session = Session::new();

    // create
    let created = session
        .create(
            "medications",
            json!({
                "owner": "alice",
                "name": "Metformin",
                "dosage": "500",
                "unit": "mg",
                "frequency": "Twice daily",
                "start_date": "2024-01-01",
                "notes": "with food"
            }),
        )
        .await;
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/api/medications/{id}");

    // get
    let resp = session.send(empty_request("GET", &uri)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Value = body_json(resp).await;
    assert_eq!(fetched, created);

    // update: absent keys untouched, null clears, server fields protected
    let resp = session
        .send(json_request(
            "PUT",
            &uri,
            r#"{"dosage":"750","notes":null,"id":77}"#,
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = body_json(resp).await;
    assert_eq!(updated["id"], id);
    assert_eq!(updated["dosage"], "750");
    assert_eq!(updated["notes"], Value::Null);
    assert_eq!(updated["name"], "Metformin");
    assert_eq!(updated["created_at"], created["created_at"]);

    // soft delete hides it from the default listing
    let resp = session
        .send(json_request("PUT", &uri, r#"{"is_active":false}"#))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(session.list("/api/medications").await.is_empty());

    // delete
    let resp = session.send(empty_request("DELETE", &uri)).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // get after delete
    let resp = session.send(empty_request("GET", &uri)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- dashboard ---

#[tokio::test]
async fn dashboard_aggregates_active_records_for_owner() {
    let session = Session::new();
    session.create("health-metrics", metric("alice", "weight", 72.0, "2024-01-05T08:00:00")).await;
    session.create("health-metrics", metric("alice", "weight", 71.0, "2024-02-05T08:00:00")).await;
    session.create("health-metrics", metric("bob", "weight", 90.0, "2024-03-05T08:00:00")).await;
    session.create("medications", json!({"owner": "alice", "name": "A"})).await;
    session
        .create("medications", json!({"owner": "alice", "name": "B", "is_active": false}))
        .await;
    session
        .create("appointments", json!({"owner": "alice", "doctor_name": "Past", "appointment_date": "2000-01-01T09:00:00"}))
        .await;
    session
        .create("appointments", json!({"owner": "alice", "doctor_name": "Future", "appointment_date": "2999-01-01T09:00:00"}))
        .await;
    session
        .create("goals", json!({"owner": "alice", "name": "Run", "is_completed": true}))
        .await;
    session
        .create("goals", json!({"owner": "alice", "name": "Sleep"}))
        .await;

    let resp = session
        .send(empty_request("GET", "/api/dashboard?owner=alice"))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let dashboard: Value = body_json(resp).await;

    let vitals = dashboard["latest_vitals"].as_array().unwrap();
    assert_eq!(vitals.len(), 2);
    assert_eq!(vitals[0]["value"], 71.0);
    assert_eq!(dashboard["active_medications_count"], 1);
    assert_eq!(dashboard["active_medications"][0]["name"], "A");
    let upcoming = dashboard["upcoming_appointments"].as_array().unwrap();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0]["doctor_name"], "Future");
    assert_eq!(dashboard["health_goals"].as_array().unwrap().len(), 1);
    assert_eq!(dashboard["recent_lab_results"], json!([]));
}
