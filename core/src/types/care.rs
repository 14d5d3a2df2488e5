health_entity! {
    pub struct Appointment => AppointmentPatch in "appointments" as "appointment" {
        required {
            doctor_name: String,
            appointment_date: String,
        }
        optional {
            specialty: String,
            purpose: String,
            location: String,
            notes: String,
        }
        flags {
            follow_up_required: bool,
            is_completed: bool,
        }
    }
}

health_entity! {
    /// A symptom occurrence, optionally linked to a known condition.
    pub struct Symptom => SymptomPatch in "symptoms" as "symptom" {
        required {
            symptom_type: String,
            /// 1 (barely noticeable) to 10 (worst imaginable).
            severity: i32,
            occurred_at: String,
        }
        optional {
            duration_minutes: i32,
            notes: String,
            /// Id of a `MedicalCondition`; not checked client-side.
            related_condition_id: i64,
        }
    }
}

health_entity! {
    /// A numeric target, e.g. reach 75 kg by a date.
    pub struct HealthGoal => HealthGoalPatch in "goals" as "goal" {
        required {
            name: String,
            goal_type: String,
            target_value: f64,
            target_unit: String,
        }
        optional {
            target_date: String,
            current_value: f64,
            start_value: f64,
        }
        flags {
            is_completed: bool,
        }
    }
}

impl HealthGoal {
    /// Progress label via [`format_goal_progress`](crate::format::format_goal_progress).
    /// Missing readings fall back to the start value, and a missing start
    /// to the current value.
    pub fn progress(&self) -> Option<String> {
        let current = self.current_value.or(self.start_value)?;
        let start = self.start_value.unwrap_or(current);
        Some(crate::format::format_goal_progress(
            current,
            self.target_value,
            start,
        ))
    }
}
