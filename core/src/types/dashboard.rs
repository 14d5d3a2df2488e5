use serde::{Deserialize, Serialize};

use crate::types::{Appointment, HealthGoal, HealthMetric, LabResult, Medication, Record};

/// Aggregate read behind `GET /api/dashboard`.
///
/// Every section defaults to empty so a partial or empty body still parses,
/// and `Dashboard::default()` is the "nothing to show" page state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dashboard {
    pub latest_vitals: Vec<Record<HealthMetric>>,
    pub active_medications_count: u32,
    pub active_medications: Vec<Record<Medication>>,
    pub upcoming_appointments: Vec<Record<Appointment>>,
    pub recent_lab_results: Vec<Record<LabResult>>,
    pub health_goals: Vec<Record<HealthGoal>>,
}

impl Dashboard {
    pub fn is_empty(&self) -> bool {
        self.latest_vitals.is_empty()
            && self.active_medications.is_empty()
            && self.upcoming_appointments.is_empty()
            && self.recent_lab_results.is_empty()
            && self.health_goals.is_empty()
    }
}
