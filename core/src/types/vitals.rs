health_entity! {
    /// A single vital-sign or body measurement, e.g. weight or heart rate.
    pub struct HealthMetric => HealthMetricPatch in "health-metrics" as "metric" {
        required {
            /// One of the [`MetricType`](crate::constants::MetricType) keys;
            /// free-form values are accepted.
            metric_type: String,
            value: f64,
            unit: String,
            measured_at: String,
        }
        optional {
            notes: String,
        }
    }
}
