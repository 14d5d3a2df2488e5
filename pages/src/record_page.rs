//! Loader and form actions shared by every record page.
//!
//! # Design
//! A page is parameterized by the record kind only: the collection path,
//! the human label used in messages and the form shapes all come from
//! [`Entity`]. Actions run parse, then validate, then the backend call,
//! and stop at the first failing step. Parsing reads the record id and the
//! fields through one reader, so every bad field is reported together.

use std::marker::PhantomData;

use health_core::form::{parse_create, parse_id, parse_toggle, parse_update};
use health_core::{Entity, FormData, HealthClient, ListQuery, Record, Transport, Validate};

use crate::outcome::{from_call, ActionOutcome};

/// The record page for kind `E`.
#[derive(Debug)]
pub struct RecordPage<'a, E, T> {
    client: &'a HealthClient<T>,
    entity: PhantomData<fn() -> E>,
}

impl<'a, E: Entity, T: Transport> RecordPage<'a, E, T> {
    pub fn new(client: &'a HealthClient<T>) -> Self {
        Self {
            client,
            entity: PhantomData,
        }
    }

    /// Records matching `query`; an empty list when the backend fails.
    pub fn load(&self, query: &ListQuery) -> Vec<Record<E>> {
        match self.client.resource::<E>().list(query) {
            Ok(records) => records,
            Err(err) => {
                tracing::error!(
                    page = E::COLLECTION,
                    status = err.status(),
                    error = %err,
                    "failed to load page data"
                );
                Vec::new()
            }
        }
    }

    pub fn create(&self, form: &FormData) -> ActionOutcome {
        let message = format!("Failed to create {}", E::LABEL);
        let new = match parse_create::<E>(form) {
            Ok(new) => new,
            Err(fields) => return ActionOutcome::invalid(message, fields),
        };
        if let Err(fields) = new.validate() {
            return ActionOutcome::invalid(message, fields);
        }
        from_call(
            self.client.resource::<E>().create(&new),
            E::COLLECTION,
            "create",
            message,
        )
    }

    /// Partial update of the record named by the form's `id`. Only fields
    /// present in the form are sent; an unchecked checkbox sends nothing, so
    /// forms clear a flag by submitting it as `false`.
    pub fn update(&self, form: &FormData) -> ActionOutcome {
        let message = format!("Failed to update {}", E::LABEL);
        let (id, patch) = match parse_update::<E>(form) {
            Ok(parsed) => parsed,
            Err(fields) => return ActionOutcome::invalid(message, fields),
        };
        if let Err(fields) = patch.validate() {
            return ActionOutcome::invalid(message, fields);
        }
        from_call(
            self.client.resource::<E>().update(id, &patch),
            E::COLLECTION,
            "update",
            message,
        )
    }

    pub fn delete(&self, form: &FormData) -> ActionOutcome {
        let message = format!("Failed to delete {}", E::LABEL);
        let id = match parse_id(form) {
            Ok(id) => id,
            Err(fields) => return ActionOutcome::invalid(message, fields),
        };
        from_call(
            self.client.resource::<E>().delete(id),
            E::COLLECTION,
            "delete",
            message,
        )
    }

    /// Flip `is_active`. The form carries the record's current value, so
    /// the caller never computes the new one.
    pub fn toggle_active(&self, form: &FormData) -> ActionOutcome {
        let message = format!("Failed to toggle {} status", E::LABEL);
        let (id, current) = match parse_toggle(form) {
            Ok(parsed) => parsed,
            Err(fields) => return ActionOutcome::invalid(message, fields),
        };
        from_call(
            self.client.resource::<E>().set_active(id, !current),
            E::COLLECTION,
            "toggle_active",
            message,
        )
    }
}
