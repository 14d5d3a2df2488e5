use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::form::FormValue;
use crate::types::Detach;

health_entity! {
    /// A lab visit and its ordered result rows.
    pub struct LabResult => LabResultPatch in "lab-results" as "lab result" {
        required {
            test_date: String,
        }
        optional {
            lab_name: String,
            ordering_doctor: String,
            notes: String,
        }
        nested {
            /// Created together with the parent; order is preserved.
            values: Vec<LabResultValue>,
        }
    }
}

/// One measured analyte within a [`LabResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabResultValue {
    /// Server-assigned; absent on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lab_result_id: Option<i64>,
    pub test_name: String,
    /// Kept as text so qualitative results ("negative", "<0.5") survive.
    /// Numeric JSON values are accepted and rendered exactly.
    #[serde(deserialize_with = "string_or_number")]
    pub value: String,
    pub unit: String,
    #[serde(default)]
    pub reference_range: Option<String>,
    #[serde(default)]
    pub is_abnormal: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

impl LabResultValue {
    pub fn display(&self) -> String {
        crate::format::format_lab_value(&self.value, &self.unit, self.reference_range.as_deref())
    }
}

impl Detach for LabResultValue {
    fn detached(&self) -> Self {
        Self {
            id: None,
            lab_result_id: None,
            ..self.clone()
        }
    }
}

/// Lab rows travel through forms as a JSON array.
impl FormValue for Vec<LabResultValue> {
    fn parse_form(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|_| "Invalid values format".to_string())
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrNumber;

    impl Visitor<'_> for StringOrNumber {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or a number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(StringOrNumber)
}
