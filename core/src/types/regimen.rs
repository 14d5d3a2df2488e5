health_entity! {
    /// A prescribed medication.
    pub struct Medication => MedicationPatch in "medications" as "medication" {
        required {
            name: String,
            dosage: String,
            unit: String,
            frequency: String,
            start_date: String,
        }
        optional {
            purpose: String,
            end_date: String,
            prescribing_doctor: String,
            refill_reminder_date: String,
            notes: String,
        }
    }
}

health_entity! {
    /// An over-the-counter supplement.
    pub struct Supplement => SupplementPatch in "supplements" as "supplement" {
        required {
            name: String,
            dosage: String,
            unit: String,
            frequency: String,
            start_date: String,
        }
        optional {
            purpose: String,
            end_date: String,
            brand: String,
            notes: String,
        }
    }
}
