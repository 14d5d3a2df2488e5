//! Verify request building, response parsing and formatting against the JSON
//! test vectors stored in `test-vectors/`.
//!
//! Comparing parsed JSON (not raw strings) avoids false negatives from
//! field-ordering differences.

use chrono::NaiveDateTime;
use health_core::format::{
    format_blood_pressure, format_goal_progress, format_metric_value, get_relative_time_at,
    is_upcoming_date_at, parse_timestamp,
};
use health_core::{
    parse_response, ErrorBody, HealthClient, HttpMethod, HttpResponse, UreqTransport,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:8000";

fn load(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap()
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/requests.json"));
    let client = HealthClient::with_transport(BASE_URL, UreqTransport::new());

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let method = parse_method(case["method"].as_str().unwrap());
        let body = case["body"].as_object().map(|_| &case["body"]);

        let req = client
            .build_request(method, case["path"].as_str().unwrap(), body)
            .unwrap();
        assert_eq!(req.method, method, "{name}: method");
        assert_eq!(req.url, case["expected_url"].as_str().unwrap(), "{name}: url");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())],
            "{name}: headers"
        );
        match req.body.as_deref() {
            Some(sent) => assert_eq!(load(sent), case["body"], "{name}: body"),
            None => assert!(case["body"].is_null(), "{name}: missing body"),
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/responses.json"));

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = HttpResponse::new(
            case["response"]["status"].as_u64().unwrap() as u16,
            case["response"]["body"].as_str().unwrap(),
        );
        let expected = &case["expected"];

        match parse_response::<Value>(&response) {
            Ok(value) => assert_eq!(&value, &expected["ok"], "{name}: value"),
            Err(err) => {
                assert_eq!(
                    u64::from(err.status()),
                    expected["error_status"].as_u64().unwrap(),
                    "{name}: status"
                );
                if let Some(message) = expected["message"].as_str() {
                    assert_eq!(err.to_string(), message, "{name}: message");
                }
                match (&expected["body"], err.body()) {
                    (Value::Null, _) => {}
                    (Value::String(text), Some(body)) => {
                        assert_eq!(body, &ErrorBody::Text(text.clone()), "{name}: text body")
                    }
                    (json, Some(body)) => {
                        assert_eq!(body, &ErrorBody::Json(json.clone()), "{name}: json body")
                    }
                    (_, None) => panic!("{name}: expected an error body"),
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

fn now(vectors: &Value) -> NaiveDateTime {
    parse_timestamp(vectors["now"].as_str().unwrap()).unwrap()
}

#[test]
fn metric_value_vectors() {
    let vectors = load(include_str!("../../test-vectors/formatting.json"));
    for case in vectors["metric_values"].as_array().unwrap() {
        let unit = case["unit"].as_str().unwrap();
        let rendered = match &case["value"] {
            Value::String(text) => format_metric_value(text.as_str(), unit),
            number => format_metric_value(number.as_f64().unwrap(), unit),
        };
        assert_eq!(rendered, case["expected"].as_str().unwrap());
    }
}

#[test]
fn blood_pressure_and_goal_vectors() {
    let vectors = load(include_str!("../../test-vectors/formatting.json"));
    for case in vectors["blood_pressure"].as_array().unwrap() {
        let rendered = format_blood_pressure(
            case["systolic"].as_f64().unwrap(),
            case["diastolic"].as_f64().unwrap(),
        );
        assert_eq!(rendered, case["expected"].as_str().unwrap());
    }
    for case in vectors["goal_progress"].as_array().unwrap() {
        let rendered = format_goal_progress(
            case["current"].as_f64().unwrap(),
            case["target"].as_f64().unwrap(),
            case["start"].as_f64().unwrap(),
        );
        assert_eq!(rendered, case["expected"].as_str().unwrap(), "{case}");
    }
}

#[test]
fn relative_time_vectors() {
    let vectors = load(include_str!("../../test-vectors/formatting.json"));
    let now = now(&vectors);
    for case in vectors["relative_time"].as_array().unwrap() {
        let input = case["input"].as_str().unwrap();
        assert_eq!(
            get_relative_time_at(input, now),
            case["expected"].as_str().unwrap(),
            "{input}"
        );
    }
}

#[test]
fn upcoming_window_vectors() {
    let vectors = load(include_str!("../../test-vectors/formatting.json"));
    let now = now(&vectors);
    for case in vectors["upcoming"].as_array().unwrap() {
        let input = case["input"].as_str().unwrap();
        let days = case["days"].as_i64().unwrap();
        assert_eq!(
            is_upcoming_date_at(input, days, now),
            case["expected"].as_bool().unwrap(),
            "{input} within {days} days"
        );
    }
}
