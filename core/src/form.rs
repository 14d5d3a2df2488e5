//! Typed parsing of submitted HTML form fields.
//!
//! Form transports only carry strings. `FormReader` converts them into the
//! create and patch shapes and fails closed: a malformed number or flag is a
//! field error, never a silent `NaN` or `null`. Blank values count as absent.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{Entity, NewRecord};
use crate::validation::{FieldError, FieldErrors};

/// Owner used when a form does not name one.
pub const DEFAULT_OWNER: &str = "default";

/// Submitted form fields by name. Deserializes from any string map, so it
/// can be extracted directly from a urlencoded body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData {
    fields: HashMap<String, String>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A type that can be parsed from one form field.
pub trait FormValue: Sized {
    fn parse_form(raw: &str) -> Result<Self, String>;
}

impl FormValue for String {
    fn parse_form(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }
}

impl FormValue for f64 {
    fn parse_form(raw: &str) -> Result<Self, String> {
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| "Must be a number".to_string())
    }
}

impl FormValue for i32 {
    fn parse_form(raw: &str) -> Result<Self, String> {
        raw.trim()
            .parse()
            .map_err(|_| "Must be a whole number".to_string())
    }
}

impl FormValue for i64 {
    fn parse_form(raw: &str) -> Result<Self, String> {
        raw.trim()
            .parse()
            .map_err(|_| "Must be a whole number".to_string())
    }
}

impl FormValue for bool {
    fn parse_form(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "on" | "1" | "yes" => Ok(true),
            "false" | "off" | "0" | "no" => Ok(false),
            _ => Err("Must be true or false".to_string()),
        }
    }
}

/// Builds a value out of form fields through a [`FormReader`].
pub trait FromForm: Sized {
    fn from_form(reader: &mut FormReader<'_>) -> Self;
}

/// Reads fields while collecting every failure, so one submission reports
/// all bad fields at once.
#[derive(Debug)]
pub struct FormReader<'a> {
    form: &'a FormData,
    errors: Vec<FieldError>,
}

impl<'a> FormReader<'a> {
    pub fn new(form: &'a FormData) -> Self {
        Self {
            form,
            errors: Vec::new(),
        }
    }

    fn present(&self, name: &str) -> Option<&'a str> {
        self.form.get(name).filter(|v| !v.trim().is_empty())
    }

    fn reject(&mut self, name: &str, message: String) {
        self.errors.push(FieldError {
            field: name.to_string(),
            message,
        });
    }

    fn parse<T: FormValue>(&mut self, name: &str, raw: &str) -> Option<T> {
        match T::parse_form(raw) {
            Ok(value) => Some(value),
            Err(message) => {
                self.reject(name, message);
                None
            }
        }
    }

    /// A mandatory field. Missing or malformed input is recorded and a
    /// placeholder default returned; `finish` then fails.
    pub fn required<T: FormValue + Default>(&mut self, name: &str) -> T {
        match self.present(name) {
            Some(raw) => self.parse(name, raw).unwrap_or_default(),
            None => {
                self.reject(name, "This field is required".to_string());
                T::default()
            }
        }
    }

    /// An optional field; blank or missing is `None`.
    pub fn optional<T: FormValue>(&mut self, name: &str) -> Option<T> {
        let raw = self.present(name)?;
        self.parse(name, raw)
    }

    /// A checkbox-style field on create; missing means the default
    /// (unchecked). Patches read flags with [`optional`](Self::optional)
    /// instead, so an update form must submit `false`/`off` to clear one.
    pub fn flag<T: FormValue + Default>(&mut self, name: &str) -> T {
        self.optional(name).unwrap_or_default()
    }

    /// A clearable patch field: missing is "unchanged" (`None`), submitted
    /// blank is "clear" (`Some(None)`).
    pub fn nullable<T: FormValue>(&mut self, name: &str) -> Option<Option<T>> {
        let raw = self.form.get(name)?;
        if raw.trim().is_empty() {
            return Some(None);
        }
        match self.parse(name, raw) {
            Some(value) => Some(Some(value)),
            None => None,
        }
    }

    /// The positive record id in the `id` field; `0` once rejected.
    pub fn record_id(&mut self) -> i64 {
        let Some(raw) = self.present("id") else {
            self.reject("id", "This field is required".to_string());
            return 0;
        };
        match self.parse::<i64>("id", raw) {
            Some(id) if id > 0 => id,
            Some(_) => {
                self.reject("id", "Must be a positive record id".to_string());
                0
            }
            None => 0,
        }
    }

    pub fn text_or(&self, name: &str, default: &str) -> String {
        self.present(name).unwrap_or(default).to_string()
    }

    pub fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(FieldErrors(self.errors))
        }
    }
}

/// Parse a create form for `E`. The owner falls back to [`DEFAULT_OWNER`].
pub fn parse_create<E: Entity>(form: &FormData) -> Result<NewRecord<E>, FieldErrors> {
    let mut reader = FormReader::new(form);
    let owner = reader.text_or("owner", DEFAULT_OWNER);
    let fields = E::from_form(&mut reader);
    reader.finish(NewRecord { owner, fields })
}

/// Parse an update form for `E` into a partial patch. A flag left out of
/// the form stays unchanged; clearing one takes an explicit `false`.
pub fn parse_patch<E: Entity>(form: &FormData) -> Result<E::Patch, FieldErrors> {
    let mut reader = FormReader::new(form);
    let patch = <E::Patch as FromForm>::from_form(&mut reader);
    reader.finish(patch)
}

/// The positive record id carried in the `id` field.
pub fn parse_id(form: &FormData) -> Result<i64, FieldErrors> {
    let mut reader = FormReader::new(form);
    let id = reader.record_id();
    reader.finish(id)
}

/// The record id and patch of an update form, with errors from both.
pub fn parse_update<E: Entity>(form: &FormData) -> Result<(i64, E::Patch), FieldErrors> {
    let mut reader = FormReader::new(form);
    let id = reader.record_id();
    let patch = <E::Patch as FromForm>::from_form(&mut reader);
    reader.finish((id, patch))
}

/// The record's current `is_active` value as submitted by a toggle form.
pub fn parse_active_flag(form: &FormData) -> Result<bool, FieldErrors> {
    let mut reader = FormReader::new(form);
    let active: bool = reader.required("is_active");
    reader.finish(active)
}

/// The record id and current `is_active` value of a toggle form.
pub fn parse_toggle(form: &FormData) -> Result<(i64, bool), FieldErrors> {
    let mut reader = FormReader::new(form);
    let id = reader.record_id();
    let active: bool = reader.required("is_active");
    reader.finish((id, active))
}
