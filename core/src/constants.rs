//! Known vital-sign kinds. The backend stores `metric_type` as free text;
//! these are the kinds the pages offer and chart.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricType {
    BloodPressureSystolic,
    BloodPressureDiastolic,
    HeartRate,
    Weight,
    Bmi,
    Glucose,
    Spo2,
    Temperature,
    SleepHours,
    Steps,
    Hrv,
}

impl MetricType {
    pub const ALL: [MetricType; 11] = [
        MetricType::BloodPressureSystolic,
        MetricType::BloodPressureDiastolic,
        MetricType::HeartRate,
        MetricType::Weight,
        MetricType::Bmi,
        MetricType::Glucose,
        MetricType::Spo2,
        MetricType::Temperature,
        MetricType::SleepHours,
        MetricType::Steps,
        MetricType::Hrv,
    ];

    /// The `metric_type` key stored by the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricType::BloodPressureSystolic => "blood_pressure_systolic",
            MetricType::BloodPressureDiastolic => "blood_pressure_diastolic",
            MetricType::HeartRate => "heart_rate",
            MetricType::Weight => "weight",
            MetricType::Bmi => "bmi",
            MetricType::Glucose => "glucose",
            MetricType::Spo2 => "spo2",
            MetricType::Temperature => "temperature",
            MetricType::SleepHours => "sleep_hours",
            MetricType::Steps => "steps",
            MetricType::Hrv => "hrv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MetricType::BloodPressureSystolic => "Blood Pressure (Systolic)",
            MetricType::BloodPressureDiastolic => "Blood Pressure (Diastolic)",
            MetricType::HeartRate => "Heart Rate",
            MetricType::Weight => "Weight",
            MetricType::Bmi => "BMI",
            MetricType::Glucose => "Blood Glucose",
            MetricType::Spo2 => "SpO2",
            MetricType::Temperature => "Temperature",
            MetricType::SleepHours => "Sleep Hours",
            MetricType::Steps => "Steps",
            MetricType::Hrv => "Heart Rate Variability",
        }
    }

    pub fn default_unit(self) -> &'static str {
        match self {
            MetricType::BloodPressureSystolic | MetricType::BloodPressureDiastolic => "mmHg",
            MetricType::HeartRate => "bpm",
            MetricType::Weight => "kg",
            MetricType::Bmi => "kg/m²",
            MetricType::Glucose => "mg/dL",
            MetricType::Spo2 => "%",
            MetricType::Temperature => "°C",
            MetricType::SleepHours => "hours",
            MetricType::Steps => "count",
            MetricType::Hrv => "ms",
        }
    }
}

impl Default for MetricType {
    fn default() -> Self {
        MetricType::Weight
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown metric type: {0}")]
pub struct UnknownMetricType(pub String);

impl FromStr for MetricType {
    type Err = UnknownMetricType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownMetricType(s.to_string()))
    }
}
