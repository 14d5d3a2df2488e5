//! Server-side page loaders and form actions for the health tracker.
//!
//! # Overview
//! Loaders fetch what a page renders; actions turn a submitted form into a
//! backend mutation. Both sit on top of `health_core::HealthClient`.
//!
//! # Design
//! - Loaders degrade: on a backend error they log a structured `tracing`
//!   event and return empty data.
//! - Actions return an [`ActionOutcome`] instead of an error. Form parsing is
//!   typed and fails closed; creates are validated before any network call.
//! - One generic [`RecordPage`] serves every record kind; the dedicated
//!   loaders in [`loaders`] only add page-specific queries.

pub mod loaders;
pub mod outcome;
pub mod record_page;

pub use loaders::{MetricsPage, MetricsQuery};
pub use outcome::ActionOutcome;
pub use record_page::RecordPage;
