health_entity! {
    /// A diagnosed condition. `status` is one of `active`, `resolved`,
    /// `managed` or `monitoring` by convention.
    pub struct MedicalCondition => MedicalConditionPatch in "conditions" as "condition" {
        required {
            name: String,
        }
        optional {
            condition_type: String,
            diagnosis_date: String,
            diagnosed_by: String,
            status: String,
            severity: String,
            notes: String,
        }
    }
}

health_entity! {
    pub struct Allergy => AllergyPatch in "allergies" as "allergy" {
        required {
            allergen: String,
        }
        optional {
            reaction_type: String,
            severity: String,
            identified_date: String,
            notes: String,
        }
    }
}

health_entity! {
    pub struct Vaccination => VaccinationPatch in "vaccinations" as "vaccination" {
        required {
            vaccine_name: String,
            date_administered: String,
        }
        optional {
            next_due_date: String,
            location: String,
            lot_number: String,
            notes: String,
        }
    }
}

health_entity! {
    /// A past surgery, hospitalization, injury, procedure or family-history
    /// entry.
    pub struct MedicalHistory => MedicalHistoryPatch in "medical-history" as "medical history entry" {
        required {
            event_type: String,
            description: String,
            event_date: String,
        }
        optional {
            provider: String,
            notes: String,
        }
    }
}
