//! Wire contracts for health records.
//!
//! # Design
//! Every record kind has three shapes: the read shape returned by the
//! backend, the create shape sent on insert, and a partial update shape.
//! Instead of hand-writing the triplet per kind, each kind declares its
//! domain fields once with `health_entity!`:
//!
//! - the declared struct (e.g. `Medication`) holds the domain fields;
//! - [`NewRecord<E>`] adds the owner, giving the create shape;
//! - [`Record<E>`] adds identity and server-assigned lifecycle fields,
//!   giving the read shape;
//! - the generated patch struct makes every field optional.
//!
//! Since all three shapes derive from one field list they cannot drift.
//! Date and date-time fields stay strings on the wire; validation checks that
//! they parse.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::form::FromForm;
use crate::validation::Validate;

/// Declares a record kind: its domain struct, its patch struct, and the
/// `Entity`/`FromForm` glue. Field groups:
///
/// - `required`: mandatory on create, plain types;
/// - `optional`: `Option<T>` on create, clearable (`Some(None)`) in patches;
/// - `flags`: defaulted on create (e.g. `bool` = false); in patches a missing
///   flag is unchanged, so clearing one needs an explicit `false`;
/// - `nested`: child rows created with the parent, not patchable.
macro_rules! health_entity {
    (
        $(#[$meta:meta])*
        pub struct $name:ident => $patch:ident in $collection:literal as $label:literal {
            required { $( $(#[$rmeta:meta])* $req:ident : $rty:ty ),* $(,)? }
            optional { $( $(#[$ometa:meta])* $opt:ident : $oty:ty ),* $(,)? }
            $( flags { $( $(#[$fmeta:meta])* $flag:ident : $fty:ty ),* $(,)? } )?
            $( nested { $( $(#[$nmeta:meta])* $nest:ident : $nty:ty ),* $(,)? } )?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $name {
            $( $(#[$rmeta])* pub $req: $rty, )*
            $( $(#[$ometa])* pub $opt: Option<$oty>, )*
            $($( $(#[$fmeta])* #[serde(default)] pub $flag: $fty, )*)?
            $($( $(#[$nmeta])* #[serde(default)] pub $nest: $nty, )*)?
        }

        #[doc = concat!(
            "Partial update for [`", stringify!($name), "`]. `None` leaves a field ",
            "unchanged; `Some(None)` clears an optional field."
        )]
        #[derive(Debug, Clone, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $patch {
            $(
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $req: Option<$rty>,
            )*
            $(
                #[serde(
                    default,
                    skip_serializing_if = "Option::is_none",
                    deserialize_with = "crate::types::nullable"
                )]
                pub $opt: Option<Option<$oty>>,
            )*
            $($(
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $flag: Option<$fty>,
            )*)?
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub is_active: Option<bool>,
        }

        impl $crate::types::Entity for $name {
            const COLLECTION: &'static str = $collection;
            const LABEL: &'static str = $label;
            type Patch = $patch;

            fn activity_patch(active: bool) -> $patch {
                $patch {
                    is_active: Some(active),
                    ..Default::default()
                }
            }

            fn to_create(&self) -> Self {
                Self {
                    $($( $nest: $crate::types::Detach::detached(&self.$nest), )*)?
                    ..self.clone()
                }
            }
        }

        impl $crate::form::FromForm for $name {
            fn from_form(reader: &mut $crate::form::FormReader<'_>) -> Self {
                Self {
                    $( $req: reader.required(stringify!($req)), )*
                    $( $opt: reader.optional(stringify!($opt)), )*
                    $($( $flag: reader.flag(stringify!($flag)), )*)?
                    $($( $nest: reader.optional(stringify!($nest)).unwrap_or_default(), )*)?
                }
            }
        }

        impl $crate::form::FromForm for $patch {
            fn from_form(reader: &mut $crate::form::FormReader<'_>) -> Self {
                Self {
                    $( $req: reader.optional(stringify!($req)), )*
                    $( $opt: reader.nullable(stringify!($opt)), )*
                    $($( $flag: reader.optional(stringify!($flag)), )*)?
                    is_active: reader.optional("is_active"),
                }
            }
        }
    };
}

mod care;
mod dashboard;
mod history;
mod lab_result;
mod regimen;
mod vitals;

pub use care::{Appointment, AppointmentPatch, HealthGoal, HealthGoalPatch, Symptom, SymptomPatch};
pub use dashboard::Dashboard;
pub use history::{
    Allergy, AllergyPatch, MedicalCondition, MedicalConditionPatch, MedicalHistory,
    MedicalHistoryPatch, Vaccination, VaccinationPatch,
};
pub use lab_result::{LabResult, LabResultPatch, LabResultValue};
pub use regimen::{Medication, MedicationPatch, Supplement, SupplementPatch};
pub use vitals::{HealthMetric, HealthMetricPatch};

/// A kind of health record served under `/api/{COLLECTION}`.
pub trait Entity:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + FromForm + Validate
{
    /// Path segment of the collection, e.g. `"lab-results"`.
    const COLLECTION: &'static str;
    /// Lower-case human name used in messages, e.g. `"lab result"`.
    const LABEL: &'static str;

    type Patch: Clone
        + fmt::Debug
        + Default
        + PartialEq
        + Serialize
        + DeserializeOwned
        + FromForm
        + Validate;

    /// A patch that only sets `is_active`.
    fn activity_patch(active: bool) -> Self::Patch;

    /// The domain fields as they would be submitted on create, with
    /// server-assigned child ids removed.
    fn to_create(&self) -> Self;
}

/// Strips server-assigned identity from child rows.
pub trait Detach {
    fn detached(&self) -> Self;
}

impl<T: Detach> Detach for Vec<T> {
    fn detached(&self) -> Self {
        self.iter().map(Detach::detached).collect()
    }
}

/// Read shape: a stored record as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<E> {
    pub id: i64,
    pub owner: String,
    #[serde(flatten)]
    pub fields: E,
    /// Some kinds (appointments, goals) do not carry the flag; they are
    /// treated as active.
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl<E: Entity> Record<E> {
    /// The create payload that would reproduce this record's domain fields.
    pub fn to_new(&self) -> NewRecord<E> {
        NewRecord {
            owner: self.owner.clone(),
            fields: self.fields.to_create(),
        }
    }
}

/// Create shape: owner plus domain fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecord<E> {
    pub owner: String,
    #[serde(flatten)]
    pub fields: E,
}

impl<E> NewRecord<E> {
    pub fn new(owner: impl Into<String>, fields: E) -> Self {
        Self {
            owner: owner.into(),
            fields,
        }
    }
}

fn default_active() -> bool {
    true
}

/// Deserialize a present-but-null patch field as `Some(None)`.
pub(crate) fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
