//! In-memory stand-in for the health API backend.
//!
//! Every collection shares one set of generic handlers over JSON objects;
//! the server only knows which collections exist, which field carries each
//! collection's date, and the few server-assigned fields (ids, timestamps,
//! `is_active`, lab value row ids). Records are otherwise stored as sent.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// Served collections: path segment, display name, date field used by the
/// `start_date`/`end_date` filters.
pub const COLLECTIONS: &[(&str, &str, &str)] = &[
    ("health-metrics", "Health metric", "measured_at"),
    ("medications", "Medication", "start_date"),
    ("supplements", "Supplement", "start_date"),
    ("lab-results", "Lab result", "test_date"),
    ("appointments", "Appointment", "appointment_date"),
    ("symptoms", "Symptom", "occurred_at"),
    ("goals", "Goal", "target_date"),
    ("conditions", "Condition", "diagnosis_date"),
    ("allergies", "Allergy", "identified_date"),
    ("vaccinations", "Vaccination", "date_administered"),
    ("medical-history", "Medical history entry", "event_date"),
];

const DEFAULT_LIMIT: usize = 100;
const DASHBOARD_VITALS: usize = 10;
const DASHBOARD_APPOINTMENTS: usize = 5;
const DASHBOARD_LAB_RESULTS: usize = 3;

/// Fields the client may not overwrite through an update.
const SERVER_FIELDS: &[&str] = &["id", "created_at", "updated_at", "values"];

type Object = Map<String, Value>;

#[derive(Debug, Default)]
pub struct Store {
    next_id: i64,
    next_value_id: i64,
    collections: HashMap<&'static str, BTreeMap<i64, Object>>,
}

impl Store {
    fn table(&mut self, collection: &str) -> Result<&mut BTreeMap<i64, Object>, Rejection> {
        let (name, _, _) = lookup(collection)?;
        Ok(self.collections.entry(name).or_default())
    }

    fn rows(&self, collection: &str) -> impl Iterator<Item = &Object> {
        self.collections
            .get(collection)
            .into_iter()
            .flat_map(|table| table.values())
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/api/dashboard", get(dashboard))
        .route("/api/{collection}", get(list_records).post(create_record))
        .route(
            "/api/{collection}/{id}",
            get(get_record).put(update_record).delete(delete_record),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// A failed request, answered as `{"detail": ...}`.
#[derive(Debug)]
pub struct Rejection {
    status: StatusCode,
    detail: String,
}

impl Rejection {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    fn unprocessable(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, detail)
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

fn lookup(collection: &str) -> Result<(&'static str, &'static str, &'static str), Rejection> {
    COLLECTIONS
        .iter()
        .copied()
        .find(|(name, _, _)| *name == collection)
        .ok_or_else(|| Rejection::new(StatusCode::NOT_FOUND, "Not Found"))
}

fn not_found(collection: &str) -> Rejection {
    let label = lookup(collection).map(|(_, label, _)| label).unwrap_or("Record");
    Rejection::new(StatusCode::NOT_FOUND, format!("{label} not found"))
}

fn timestamp() -> String {
    Utc::now().naive_utc().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

fn parse_object(body: &[u8]) -> Result<Object, Rejection> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(Rejection::unprocessable("Request body must be a JSON object")),
        Err(err) => Err(Rejection::unprocessable(format!("Invalid JSON: {err}"))),
    }
}

fn str_field<'a>(record: &'a Object, field: &str) -> Option<&'a str> {
    record.get(field).and_then(Value::as_str)
}

fn is_active(record: &Object) -> bool {
    record.get("is_active").and_then(Value::as_bool).unwrap_or(true)
}

/// The calendar-date part of a date or date-time string.
fn date_part(value: &str) -> &str {
    value.get(..10).unwrap_or(value)
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub active: Option<bool>,
    pub owner: Option<String>,
    pub metric_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

impl ListParams {
    fn matches(&self, record: &Object, date_field: &str) -> bool {
        // Soft-deleted records stay hidden unless asked for explicitly.
        if is_active(record) != self.active.unwrap_or(true) {
            return false;
        }
        if let Some(owner) = &self.owner {
            if str_field(record, "owner") != Some(owner.as_str()) {
                return false;
            }
        }
        if let Some(kind) = &self.metric_type {
            if str_field(record, "metric_type") != Some(kind.as_str()) {
                return false;
            }
        }
        let date = str_field(record, date_field).map(date_part);
        if let Some(start) = &self.start_date {
            if date.map_or(true, |d| d < date_part(start)) {
                return false;
            }
        }
        if let Some(end) = &self.end_date {
            if date.map_or(true, |d| d > date_part(end)) {
                return false;
            }
        }
        true
    }
}

async fn list_records(
    State(db): State<Db>,
    Path(collection): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Object>>, Rejection> {
    let (name, _, date_field) = lookup(&collection)?;
    let store = db.read().await;
    let records = store
        .rows(name)
        .filter(|record| params.matches(record, date_field))
        .skip(params.skip.unwrap_or(0))
        .take(params.limit.unwrap_or(DEFAULT_LIMIT))
        .cloned()
        .collect();
    Ok(Json(records))
}

async fn create_record(
    State(db): State<Db>,
    Path(collection): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<Object>), Rejection> {
    lookup(&collection)?;
    let mut record = parse_object(&body)?;
    if str_field(&record, "owner").map_or(true, |owner| owner.trim().is_empty()) {
        return Err(Rejection::unprocessable("owner is required"));
    }

    let mut store = db.write().await;
    store.table(&collection)?;
    store.next_id += 1;
    let id = store.next_id;

    if let Some(Value::Array(rows)) = record.get_mut("values") {
        for row in rows.iter_mut().filter_map(Value::as_object_mut) {
            store.next_value_id += 1;
            row.insert("id".to_string(), json!(store.next_value_id));
            row.insert("lab_result_id".to_string(), json!(id));
            row.entry("is_abnormal").or_insert(json!(false));
        }
    }
    let now = timestamp();
    record.insert("id".to_string(), json!(id));
    record.entry("is_active").or_insert(json!(true));
    record.insert("created_at".to_string(), json!(now));
    record.insert("updated_at".to_string(), json!(now));

    store.table(&collection)?.insert(id, record.clone());
    tracing::debug!(collection = %collection, id, "record created");
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_record(
    State(db): State<Db>,
    Path((collection, id)): Path<(String, i64)>,
) -> Result<Json<Object>, Rejection> {
    let (name, _, _) = lookup(&collection)?;
    let store = db.read().await;
    store
        .collections
        .get(name)
        .and_then(|table| table.get(&id))
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(name))
}

/// Merge-patch: keys present in the body replace stored values, explicit
/// `null` clears them, absent keys are left alone.
async fn update_record(
    State(db): State<Db>,
    Path((collection, id)): Path<(String, i64)>,
    body: Bytes,
) -> Result<Json<Object>, Rejection> {
    lookup(&collection)?;
    let patch = parse_object(&body)?;
    let mut store = db.write().await;
    let record = store
        .table(&collection)?
        .get_mut(&id)
        .ok_or_else(|| not_found(&collection))?;
    for (key, value) in patch {
        if !SERVER_FIELDS.contains(&key.as_str()) {
            record.insert(key, value);
        }
    }
    record.insert("updated_at".to_string(), json!(timestamp()));
    tracing::debug!(collection = %collection, id, "record updated");
    Ok(Json(record.clone()))
}

async fn delete_record(
    State(db): State<Db>,
    Path((collection, id)): Path<(String, i64)>,
) -> Result<StatusCode, Rejection> {
    let mut store = db.write().await;
    store
        .table(&collection)?
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| not_found(&collection))
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    pub owner: Option<String>,
}

async fn dashboard(State(db): State<Db>, Query(params): Query<DashboardParams>) -> Json<Value> {
    let store = db.read().await;
    let owned = |collection: &'static str| {
        store
            .rows(collection)
            .filter(|record| {
                params
                    .owner
                    .as_deref()
                    .map_or(true, |owner| str_field(record, "owner") == Some(owner))
            })
            .filter(|record| is_active(record))
            .cloned()
            .collect::<Vec<Object>>()
    };
    let by_field_desc = |field: &'static str| {
        move |a: &Object, b: &Object| str_field(b, field).cmp(&str_field(a, field))
    };

    let mut vitals = owned("health-metrics");
    vitals.sort_by(by_field_desc("measured_at"));
    vitals.truncate(DASHBOARD_VITALS);

    let medications = owned("medications");

    let now = Utc::now().naive_utc().format("%Y-%m-%dT%H:%M:%S").to_string();
    let mut appointments: Vec<Object> = owned("appointments")
        .into_iter()
        .filter(|a| a.get("is_completed").and_then(Value::as_bool) != Some(true))
        .filter(|a| str_field(a, "appointment_date").is_some_and(|d| d >= now.as_str()))
        .collect();
    appointments.sort_by(|a, b| str_field(a, "appointment_date").cmp(&str_field(b, "appointment_date")));
    appointments.truncate(DASHBOARD_APPOINTMENTS);

    let mut labs = owned("lab-results");
    labs.sort_by(by_field_desc("test_date"));
    labs.truncate(DASHBOARD_LAB_RESULTS);

    let goals: Vec<Object> = owned("goals")
        .into_iter()
        .filter(|g| g.get("is_completed").and_then(Value::as_bool) != Some(true))
        .collect();

    Json(json!({
        "latest_vitals": vitals,
        "active_medications_count": medications.len(),
        "active_medications": medications,
        "upcoming_appointments": appointments,
        "recent_lab_results": labs,
        "health_goals": goals,
    }))
}
