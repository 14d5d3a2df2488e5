//! JSON request builder and response parser for the health API.
//!
//! # Design
//! `HealthClient` holds only a base URL and a [`Transport`]; it carries no
//! mutable state between calls. Every call is split into building an
//! `HttpRequest` ([`HealthClient::build_request`]) and interpreting an
//! `HttpResponse` ([`parse_response`]); the transport performs the
//! round-trip in between. Both halves are plain functions of their input,
//! so status handling is tested without a server.
//!
//! A 204 response is decoded from JSON `null`. Callers ask for a type that
//! accepts null (`Option<T>`, `()`, `Value`, `IgnoredAny`) when an endpoint
//! may answer without content.

use std::marker::PhantomData;

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use serde_json::Value;

use crate::config::{ClientConfig, Context};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, JSON_CONTENT_TYPE};
use crate::transport::{Transport, UreqTransport};
use crate::types::{Dashboard, Entity, NewRecord, Record};

/// Blocking client for the health API.
#[derive(Debug, Clone)]
pub struct HealthClient<T = UreqTransport> {
    base_url: String,
    transport: T,
}

impl HealthClient<UreqTransport> {
    /// Client for the base URL that `config` resolves in `context`.
    pub fn from_config(config: &ClientConfig, context: Context) -> Self {
        Self::with_transport(config.base_url(context), UreqTransport::new())
    }

    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, UreqTransport::new())
    }
}

impl<T: Transport> HealthClient<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request for `path` (relative to the base URL, leading `/`).
    /// Every request declares a JSON content type, bodies or not.
    pub fn build_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
    ) -> Result<HttpRequest, ApiError> {
        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            headers: vec![("content-type".to_string(), JSON_CONTENT_TYPE.to_string())],
            body,
        })
    }

    fn send<R, B>(&self, method: HttpMethod, path: &str, body: Option<&B>) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.build_request(method, path, body)?;
        tracing::debug!(method = method.as_str(), url = %request.url, "sending request");
        let response = self.transport.execute(&request).map_err(|err| {
            tracing::debug!(url = %request.url, error = %err, "request failed before a response");
            ApiError::from(err)
        })?;
        tracing::debug!(url = %request.url, status = response.status, "received response");
        parse_response(&response)
    }

    pub fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.send::<R, Value>(HttpMethod::Get, path, None)
    }

    pub fn post<R, B>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(HttpMethod::Post, path, Some(body))
    }

    pub fn put<R, B>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(HttpMethod::Put, path, Some(body))
    }

    pub fn delete<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.send::<R, Value>(HttpMethod::Delete, path, None)
    }

    /// Typed CRUD over the collection of `E`.
    pub fn resource<E: Entity>(&self) -> Resource<'_, E, T> {
        Resource {
            client: self,
            entity: PhantomData,
        }
    }

    /// `GET /api/dashboard`, optionally scoped to one owner.
    pub fn dashboard(&self, owner: Option<&str>) -> Result<Dashboard, ApiError> {
        let query = ListQuery {
            owner: owner.map(str::to_string),
            ..ListQuery::default()
        };
        self.get(&format!("/api/dashboard{}", query.to_query_string()))
    }
}

/// Interpret a response: 2xx bodies are decoded (204 as JSON `null`), any
/// other status becomes [`ApiError::Rejected`].
pub fn parse_response<R: DeserializeOwned>(response: &HttpResponse) -> Result<R, ApiError> {
    if !response.is_success() {
        return Err(ApiError::rejected(response.status, &response.body));
    }
    let decoded = if response.status == 204 {
        serde_json::from_value(Value::Null)
    } else {
        serde_json::from_str(&response.body)
    };
    decoded.map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Typed access to `/api/{E::COLLECTION}`.
#[derive(Debug)]
pub struct Resource<'a, E, T> {
    client: &'a HealthClient<T>,
    entity: PhantomData<fn() -> E>,
}

impl<E: Entity, T: Transport> Resource<'_, E, T> {
    fn collection_path(&self) -> String {
        format!("/api/{}", E::COLLECTION)
    }

    fn record_path(&self, id: i64) -> String {
        format!("/api/{}/{id}", E::COLLECTION)
    }

    pub fn list(&self, query: &ListQuery) -> Result<Vec<Record<E>>, ApiError> {
        self.client
            .get(&format!("{}{}", self.collection_path(), query.to_query_string()))
    }

    pub fn get(&self, id: i64) -> Result<Record<E>, ApiError> {
        self.client.get(&self.record_path(id))
    }

    pub fn create(&self, new: &NewRecord<E>) -> Result<Record<E>, ApiError> {
        self.client.post(&self.collection_path(), new)
    }

    pub fn update(&self, id: i64, patch: &E::Patch) -> Result<Record<E>, ApiError> {
        self.client.put(&self.record_path(id), patch)
    }

    /// Accepts both an empty 204 and a JSON acknowledgement body.
    pub fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .delete::<IgnoredAny>(&self.record_path(id))
            .map(|_| ())
    }

    /// Soft-delete (`false`) or restore (`true`) a record.
    pub fn set_active(&self, id: i64, active: bool) -> Result<Record<E>, ApiError> {
        self.update(id, &E::activity_patch(active))
    }
}

/// Filters for list endpoints. Unset filters are omitted from the URL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub active: Option<bool>,
    pub owner: Option<String>,
    pub metric_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl ListQuery {
    pub fn active(active: bool) -> Self {
        Self {
            active: Some(active),
            ..Self::default()
        }
    }

    /// `?key=value&...`, or an empty string when nothing is set.
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if let Some(active) = self.active {
            pairs.push(("active", active.to_string()));
        }
        if let Some(owner) = &self.owner {
            pairs.push(("owner", owner.clone()));
        }
        if let Some(metric_type) = &self.metric_type {
            pairs.push(("metric_type", metric_type.clone()));
        }
        if let Some(start) = &self.start_date {
            pairs.push(("start_date", start.clone()));
        }
        if let Some(end) = &self.end_date {
            pairs.push(("end_date", end.clone()));
        }
        if let Some(skip) = self.skip {
            pairs.push(("skip", skip.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if pairs.is_empty() {
            return String::new();
        }
        let joined: Vec<String> = pairs
            .into_iter()
            .map(|(key, value)| format!("{key}={}", percent_encode(&value)))
            .collect();
        format!("?{}", joined.join("&"))
    }
}

fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
