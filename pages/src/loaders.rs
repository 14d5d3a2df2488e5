//! Page-load data for the dedicated pages.
//!
//! Loaders never fail: a backend error is logged and the page renders
//! empty.

use health_core::types::{HealthMetric, LabResult, Medication, Supplement};
use health_core::{Dashboard, HealthClient, ListQuery, MetricType, Record, Transport};
use serde::{Deserialize, Serialize};

use crate::record_page::RecordPage;

pub fn dashboard<T: Transport>(client: &HealthClient<T>) -> Dashboard {
    client.dashboard(None).unwrap_or_else(|err| {
        tracing::error!(
            page = "dashboard",
            status = err.status(),
            error = %err,
            "failed to load page data"
        );
        Dashboard::default()
    })
}

/// Query parameters of the metrics page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MetricsQuery {
    #[serde(rename = "type", default)]
    pub metric_type: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsPage {
    pub metrics: Vec<Record<HealthMetric>>,
    /// The chart being shown; `weight` when the query names none.
    pub selected_type: String,
}

pub fn metrics<T: Transport>(client: &HealthClient<T>, query: &MetricsQuery) -> MetricsPage {
    let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());
    let selected_type =
        non_empty(&query.metric_type).unwrap_or_else(|| MetricType::default().to_string());
    let list = ListQuery {
        metric_type: Some(selected_type.clone()),
        start_date: non_empty(&query.start_date),
        end_date: non_empty(&query.end_date),
        ..ListQuery::default()
    };
    MetricsPage {
        metrics: RecordPage::<HealthMetric, T>::new(client).load(&list),
        selected_type,
    }
}

pub fn medications<T: Transport>(client: &HealthClient<T>) -> Vec<Record<Medication>> {
    RecordPage::new(client).load(&ListQuery::active(true))
}

pub fn supplements<T: Transport>(client: &HealthClient<T>) -> Vec<Record<Supplement>> {
    RecordPage::new(client).load(&ListQuery::active(true))
}

pub fn lab_results<T: Transport>(client: &HealthClient<T>) -> Vec<Record<LabResult>> {
    RecordPage::new(client).load(&ListQuery::default())
}
