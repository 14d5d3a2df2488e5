//! Typed client core for the personal health-tracking API.
//!
//! # Overview
//! Wire contracts for every record kind, advisory validation, display
//! formatting, typed form parsing and a blocking JSON client. Request
//! building and response parsing are plain functions of plain data; the
//! network round-trip sits behind the [`Transport`] trait.
//!
//! # Design
//! - `HealthClient` is stateless: a base URL plus a transport.
//! - Each record kind is declared once; its read, create and patch shapes
//!   are derived from that declaration (see [`types`]).
//! - Failures carry an HTTP status, `0` when no response was obtained.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod form;
pub mod format;
pub mod http;
pub mod transport;
pub mod types;
pub mod validation;

pub use client::{parse_response, HealthClient, ListQuery, Resource};
pub use config::{ClientConfig, Context};
pub use constants::MetricType;
pub use error::{ApiError, ErrorBody};
pub use form::{FormData, DEFAULT_OWNER};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, TransportError, UreqTransport};
pub use types::{Dashboard, Entity, NewRecord, Record};
pub use validation::{FieldError, FieldErrors, Validate};
