//! Client-side checks on create payloads and update patches.
//!
//! These catch obviously malformed input before a request is sent. A patch
//! is held to the same rules as a create, but only for the fields it sets.
//! The backend remains the authority: passing here does not mean the
//! backend will accept the payload.

use serde::Serialize;
use thiserror::Error;

use crate::format::parse_timestamp;
use crate::types::{
    Allergy, AllergyPatch, Appointment, AppointmentPatch, HealthGoal, HealthGoalPatch,
    HealthMetric, HealthMetricPatch, LabResult, LabResultPatch, LabResultValue, MedicalCondition,
    MedicalConditionPatch, MedicalHistory, MedicalHistoryPatch, Medication, MedicationPatch,
    NewRecord, Supplement, SupplementPatch, Symptom, SymptomPatch, Vaccination, VaccinationPatch,
};

pub const MAX_OWNER_LEN: usize = 100;
pub const MAX_NAME_LEN: usize = 200;
pub const MAX_TYPE_LEN: usize = 100;
pub const MAX_UNIT_LEN: usize = 50;
pub const MAX_RANGE_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// One or more rejected fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Error)]
#[error("{} invalid field(s): {}", .0.len(), summarize(.0))]
#[serde(transparent)]
pub struct FieldErrors(pub Vec<FieldError>);

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl FieldErrors {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldErrors(vec![FieldError {
            field: field.into(),
            message: message.into(),
        }])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn first_message(&self) -> Option<&str> {
        self.0.first().map(|e| e.message.as_str())
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut rules = Rules::default();
        self.check(&mut rules);
        rules.finish()
    }

    fn check(&self, rules: &mut Rules);
}

/// Accumulates field errors; a field that already failed is not reported
/// twice.
#[derive(Debug, Default)]
pub struct Rules {
    prefix: String,
    errors: Vec<FieldError>,
}

impl Rules {
    fn path(&self, field: &str) -> String {
        if self.prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{field}", self.prefix)
        }
    }

    pub fn fail(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        let path = self.path(field);
        if !self.errors.iter().any(|e| e.field == path) {
            self.errors.push(FieldError {
                field: path,
                message: message.into(),
            });
        }
        self
    }

    pub fn required(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.fail(field, message);
        }
        self
    }

    /// A required field in a patch: only checked when the patch sets it.
    pub fn required_opt(&mut self, field: &str, value: Option<&String>, message: &str) -> &mut Self {
        if let Some(value) = value {
            self.required(field, value, message);
        }
        self
    }

    pub fn max_len(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        if value.chars().count() > max {
            self.fail(field, format!("Must be at most {max} characters"));
        }
        self
    }

    pub fn max_len_opt(&mut self, field: &str, value: Option<&String>, max: usize) -> &mut Self {
        if let Some(value) = value {
            self.max_len(field, value, max);
        }
        self
    }

    pub fn non_negative(&mut self, field: &str, value: f64, message: &str) -> &mut Self {
        if !value.is_finite() || value < 0.0 {
            self.fail(field, message);
        }
        self
    }

    pub fn between(&mut self, field: &str, value: i64, min: i64, max: i64, message: &str) -> &mut Self {
        if value < min || value > max {
            self.fail(field, message);
        }
        self
    }

    pub fn date(&mut self, field: &str, value: &str) -> &mut Self {
        if !value.trim().is_empty() && parse_timestamp(value).is_none() {
            self.fail(field, "Must be a valid date");
        }
        self
    }

    pub fn date_opt(&mut self, field: &str, value: Option<&String>) -> &mut Self {
        if let Some(value) = value {
            self.date(field, value);
        }
        self
    }

    pub fn not_empty<T>(&mut self, field: &str, items: &[T], message: &str) -> &mut Self {
        if items.is_empty() {
            self.fail(field, message);
        }
        self
    }

    /// Check a nested value with its errors reported under `field`.
    pub fn nested<V: Validate>(&mut self, field: &str, value: &V) -> &mut Self {
        let mut inner = Rules {
            prefix: self.path(field),
            errors: Vec::new(),
        };
        value.check(&mut inner);
        self.errors.extend(inner.errors);
        self
    }

    pub fn finish(self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(FieldErrors(self.errors))
        }
    }
}

impl<E: Validate> Validate for NewRecord<E> {
    fn check(&self, rules: &mut Rules) {
        rules
            .required("owner", &self.owner, "Owner is required")
            .max_len("owner", &self.owner, MAX_OWNER_LEN);
        self.fields.check(rules);
    }
}

impl Validate for HealthMetric {
    fn check(&self, rules: &mut Rules) {
        rules
            .required("metric_type", &self.metric_type, "Metric type is required")
            .max_len("metric_type", &self.metric_type, MAX_TYPE_LEN)
            .non_negative("value", self.value, "Value must be positive")
            .required("unit", &self.unit, "Unit is required")
            .max_len("unit", &self.unit, MAX_UNIT_LEN)
            .required("measured_at", &self.measured_at, "Measurement date is required")
            .date("measured_at", &self.measured_at);
    }
}

impl Validate for Medication {
    fn check(&self, rules: &mut Rules) {
        rules
            .required("name", &self.name, "Medication name is required")
            .max_len("name", &self.name, MAX_NAME_LEN)
            .required("dosage", &self.dosage, "Dosage is required")
            .required("unit", &self.unit, "Unit is required")
            .max_len("unit", &self.unit, MAX_UNIT_LEN)
            .required("frequency", &self.frequency, "Frequency is required")
            .required("start_date", &self.start_date, "Start date is required")
            .date("start_date", &self.start_date)
            .date_opt("end_date", self.end_date.as_ref())
            .date_opt("refill_reminder_date", self.refill_reminder_date.as_ref())
            .max_len_opt("prescribing_doctor", self.prescribing_doctor.as_ref(), MAX_NAME_LEN);
    }
}

impl Validate for Supplement {
    fn check(&self, rules: &mut Rules) {
        rules
            .required("name", &self.name, "Supplement name is required")
            .max_len("name", &self.name, MAX_NAME_LEN)
            .required("dosage", &self.dosage, "Dosage is required")
            .required("unit", &self.unit, "Unit is required")
            .max_len("unit", &self.unit, MAX_UNIT_LEN)
            .required("frequency", &self.frequency, "Frequency is required")
            .required("start_date", &self.start_date, "Start date is required")
            .date("start_date", &self.start_date)
            .date_opt("end_date", self.end_date.as_ref())
            .max_len_opt("brand", self.brand.as_ref(), MAX_NAME_LEN);
    }
}

impl Validate for LabResultValue {
    fn check(&self, rules: &mut Rules) {
        rules
            .required("test_name", &self.test_name, "Test name is required")
            .max_len("test_name", &self.test_name, MAX_NAME_LEN)
            .required("value", &self.value, "Value is required")
            .required("unit", &self.unit, "Unit is required")
            .max_len("unit", &self.unit, MAX_UNIT_LEN)
            .max_len_opt("reference_range", self.reference_range.as_ref(), MAX_RANGE_LEN);
    }
}

impl Validate for LabResult {
    fn check(&self, rules: &mut Rules) {
        rules
            .required("test_date", &self.test_date, "Test date is required")
            .date("test_date", &self.test_date)
            .max_len_opt("lab_name", self.lab_name.as_ref(), MAX_NAME_LEN)
            .max_len_opt("ordering_doctor", self.ordering_doctor.as_ref(), MAX_NAME_LEN)
            .not_empty("values", &self.values, "At least one test value is required");
        for (index, row) in self.values.iter().enumerate() {
            rules.nested(&format!("values[{index}]"), row);
        }
    }
}

impl Validate for Appointment {
    fn check(&self, rules: &mut Rules) {
        rules
            .required("doctor_name", &self.doctor_name, "Doctor name is required")
            .max_len("doctor_name", &self.doctor_name, MAX_NAME_LEN)
            .required("appointment_date", &self.appointment_date, "Appointment date is required")
            .date("appointment_date", &self.appointment_date)
            .max_len_opt("specialty", self.specialty.as_ref(), MAX_TYPE_LEN)
            .max_len_opt("location", self.location.as_ref(), MAX_NAME_LEN);
    }
}

impl Validate for Symptom {
    fn check(&self, rules: &mut Rules) {
        rules
            .required("symptom_type", &self.symptom_type, "Symptom type is required")
            .max_len("symptom_type", &self.symptom_type, MAX_NAME_LEN)
            .between(
                "severity",
                i64::from(self.severity),
                1,
                10,
                "Severity must be between 1 and 10",
            )
            .required("occurred_at", &self.occurred_at, "Occurrence date is required")
            .date("occurred_at", &self.occurred_at);
        if let Some(minutes) = self.duration_minutes {
            rules.between(
                "duration_minutes",
                i64::from(minutes),
                0,
                i64::from(i32::MAX),
                "Duration cannot be negative",
            );
        }
    }
}

impl Validate for HealthGoal {
    fn check(&self, rules: &mut Rules) {
        rules
            .required("name", &self.name, "Goal name is required")
            .max_len("name", &self.name, MAX_NAME_LEN)
            .required("goal_type", &self.goal_type, "Goal type is required")
            .max_len("goal_type", &self.goal_type, MAX_TYPE_LEN)
            .non_negative("target_value", self.target_value, "Target value must be positive")
            .required("target_unit", &self.target_unit, "Target unit is required")
            .max_len("target_unit", &self.target_unit, MAX_UNIT_LEN)
            .date_opt("target_date", self.target_date.as_ref());
    }
}

impl Validate for MedicalCondition {
    fn check(&self, rules: &mut Rules) {
        rules
            .required("name", &self.name, "Condition name is required")
            .max_len("name", &self.name, MAX_NAME_LEN)
            .date_opt("diagnosis_date", self.diagnosis_date.as_ref())
            .max_len_opt("diagnosed_by", self.diagnosed_by.as_ref(), MAX_NAME_LEN);
    }
}

impl Validate for Allergy {
    fn check(&self, rules: &mut Rules) {
        rules
            .required("allergen", &self.allergen, "Allergen is required")
            .max_len("allergen", &self.allergen, MAX_NAME_LEN)
            .max_len_opt("reaction_type", self.reaction_type.as_ref(), MAX_NAME_LEN)
            .max_len_opt("severity", self.severity.as_ref(), MAX_UNIT_LEN)
            .date_opt("identified_date", self.identified_date.as_ref());
    }
}

impl Validate for Vaccination {
    fn check(&self, rules: &mut Rules) {
        rules
            .required("vaccine_name", &self.vaccine_name, "Vaccine name is required")
            .max_len("vaccine_name", &self.vaccine_name, MAX_NAME_LEN)
            .required("date_administered", &self.date_administered, "Administration date is required")
            .date("date_administered", &self.date_administered)
            .date_opt("next_due_date", self.next_due_date.as_ref());
    }
}

impl Validate for MedicalHistory {
    fn check(&self, rules: &mut Rules) {
        rules
            .required("event_type", &self.event_type, "Event type is required")
            .max_len("event_type", &self.event_type, MAX_TYPE_LEN)
            .required("description", &self.description, "Description is required")
            .required("event_date", &self.event_date, "Event date is required")
            .date("event_date", &self.event_date);
    }
}

/// The new value of a clearable patch field, if it sets one.
fn assigned<T>(value: &Option<Option<T>>) -> Option<&T> {
    value.as_ref().and_then(Option::as_ref)
}

impl Validate for HealthMetricPatch {
    fn check(&self, rules: &mut Rules) {
        rules
            .required_opt("metric_type", self.metric_type.as_ref(), "Metric type is required")
            .max_len_opt("metric_type", self.metric_type.as_ref(), MAX_TYPE_LEN)
            .required_opt("unit", self.unit.as_ref(), "Unit is required")
            .max_len_opt("unit", self.unit.as_ref(), MAX_UNIT_LEN)
            .required_opt("measured_at", self.measured_at.as_ref(), "Measurement date is required")
            .date_opt("measured_at", self.measured_at.as_ref());
        if let Some(value) = self.value {
            rules.non_negative("value", value, "Value must be positive");
        }
    }
}

impl Validate for MedicationPatch {
    fn check(&self, rules: &mut Rules) {
        rules
            .required_opt("name", self.name.as_ref(), "Medication name is required")
            .max_len_opt("name", self.name.as_ref(), MAX_NAME_LEN)
            .required_opt("dosage", self.dosage.as_ref(), "Dosage is required")
            .required_opt("unit", self.unit.as_ref(), "Unit is required")
            .max_len_opt("unit", self.unit.as_ref(), MAX_UNIT_LEN)
            .required_opt("frequency", self.frequency.as_ref(), "Frequency is required")
            .required_opt("start_date", self.start_date.as_ref(), "Start date is required")
            .date_opt("start_date", self.start_date.as_ref())
            .date_opt("end_date", assigned(&self.end_date))
            .date_opt("refill_reminder_date", assigned(&self.refill_reminder_date))
            .max_len_opt("prescribing_doctor", assigned(&self.prescribing_doctor), MAX_NAME_LEN);
    }
}

impl Validate for SupplementPatch {
    fn check(&self, rules: &mut Rules) {
        rules
            .required_opt("name", self.name.as_ref(), "Supplement name is required")
            .max_len_opt("name", self.name.as_ref(), MAX_NAME_LEN)
            .required_opt("dosage", self.dosage.as_ref(), "Dosage is required")
            .required_opt("unit", self.unit.as_ref(), "Unit is required")
            .max_len_opt("unit", self.unit.as_ref(), MAX_UNIT_LEN)
            .required_opt("frequency", self.frequency.as_ref(), "Frequency is required")
            .required_opt("start_date", self.start_date.as_ref(), "Start date is required")
            .date_opt("start_date", self.start_date.as_ref())
            .date_opt("end_date", assigned(&self.end_date))
            .max_len_opt("brand", assigned(&self.brand), MAX_NAME_LEN);
    }
}

/// Lab rows are not patchable; only the visit fields are checked.
impl Validate for LabResultPatch {
    fn check(&self, rules: &mut Rules) {
        rules
            .required_opt("test_date", self.test_date.as_ref(), "Test date is required")
            .date_opt("test_date", self.test_date.as_ref())
            .max_len_opt("lab_name", assigned(&self.lab_name), MAX_NAME_LEN)
            .max_len_opt("ordering_doctor", assigned(&self.ordering_doctor), MAX_NAME_LEN);
    }
}

impl Validate for AppointmentPatch {
    fn check(&self, rules: &mut Rules) {
        rules
            .required_opt("doctor_name", self.doctor_name.as_ref(), "Doctor name is required")
            .max_len_opt("doctor_name", self.doctor_name.as_ref(), MAX_NAME_LEN)
            .required_opt(
                "appointment_date",
                self.appointment_date.as_ref(),
                "Appointment date is required",
            )
            .date_opt("appointment_date", self.appointment_date.as_ref())
            .max_len_opt("specialty", assigned(&self.specialty), MAX_TYPE_LEN)
            .max_len_opt("location", assigned(&self.location), MAX_NAME_LEN);
    }
}

impl Validate for SymptomPatch {
    fn check(&self, rules: &mut Rules) {
        rules
            .required_opt("symptom_type", self.symptom_type.as_ref(), "Symptom type is required")
            .max_len_opt("symptom_type", self.symptom_type.as_ref(), MAX_NAME_LEN)
            .required_opt("occurred_at", self.occurred_at.as_ref(), "Occurrence date is required")
            .date_opt("occurred_at", self.occurred_at.as_ref());
        if let Some(severity) = self.severity {
            rules.between(
                "severity",
                i64::from(severity),
                1,
                10,
                "Severity must be between 1 and 10",
            );
        }
        if let Some(minutes) = assigned(&self.duration_minutes) {
            rules.between(
                "duration_minutes",
                i64::from(*minutes),
                0,
                i64::from(i32::MAX),
                "Duration cannot be negative",
            );
        }
    }
}

impl Validate for HealthGoalPatch {
    fn check(&self, rules: &mut Rules) {
        rules
            .required_opt("name", self.name.as_ref(), "Goal name is required")
            .max_len_opt("name", self.name.as_ref(), MAX_NAME_LEN)
            .required_opt("goal_type", self.goal_type.as_ref(), "Goal type is required")
            .max_len_opt("goal_type", self.goal_type.as_ref(), MAX_TYPE_LEN)
            .required_opt("target_unit", self.target_unit.as_ref(), "Target unit is required")
            .max_len_opt("target_unit", self.target_unit.as_ref(), MAX_UNIT_LEN)
            .date_opt("target_date", assigned(&self.target_date));
        if let Some(target) = self.target_value {
            rules.non_negative("target_value", target, "Target value must be positive");
        }
    }
}

impl Validate for MedicalConditionPatch {
    fn check(&self, rules: &mut Rules) {
        rules
            .required_opt("name", self.name.as_ref(), "Condition name is required")
            .max_len_opt("name", self.name.as_ref(), MAX_NAME_LEN)
            .date_opt("diagnosis_date", assigned(&self.diagnosis_date))
            .max_len_opt("diagnosed_by", assigned(&self.diagnosed_by), MAX_NAME_LEN);
    }
}

impl Validate for AllergyPatch {
    fn check(&self, rules: &mut Rules) {
        rules
            .required_opt("allergen", self.allergen.as_ref(), "Allergen is required")
            .max_len_opt("allergen", self.allergen.as_ref(), MAX_NAME_LEN)
            .max_len_opt("reaction_type", assigned(&self.reaction_type), MAX_NAME_LEN)
            .max_len_opt("severity", assigned(&self.severity), MAX_UNIT_LEN)
            .date_opt("identified_date", assigned(&self.identified_date));
    }
}

impl Validate for VaccinationPatch {
    fn check(&self, rules: &mut Rules) {
        rules
            .required_opt("vaccine_name", self.vaccine_name.as_ref(), "Vaccine name is required")
            .max_len_opt("vaccine_name", self.vaccine_name.as_ref(), MAX_NAME_LEN)
            .required_opt(
                "date_administered",
                self.date_administered.as_ref(),
                "Administration date is required",
            )
            .date_opt("date_administered", self.date_administered.as_ref())
            .date_opt("next_due_date", assigned(&self.next_due_date));
    }
}

impl Validate for MedicalHistoryPatch {
    fn check(&self, rules: &mut Rules) {
        rules
            .required_opt("event_type", self.event_type.as_ref(), "Event type is required")
            .max_len_opt("event_type", self.event_type.as_ref(), MAX_TYPE_LEN)
            .required_opt("description", self.description.as_ref(), "Description is required")
            .required_opt("event_date", self.event_date.as_ref(), "Event date is required")
            .date_opt("event_date", self.event_date.as_ref());
    }
}
