use health_core::{ApiError, FieldErrors};
use serde::Serialize;

/// Status reported for every failed form action.
pub const FAILURE_STATUS: u16 = 400;

/// Result of a form action. Actions never return errors; a failure is data
/// the page renders next to the form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ActionOutcome {
    Success,
    Failure {
        status: u16,
        error: String,
        /// Per-field messages when the form itself was rejected.
        #[serde(skip_serializing_if = "FieldErrors::is_empty")]
        fields: FieldErrors,
    },
}

impl ActionOutcome {
    pub fn failure(error: impl Into<String>) -> Self {
        ActionOutcome::Failure {
            status: FAILURE_STATUS,
            error: error.into(),
            fields: FieldErrors::default(),
        }
    }

    pub fn invalid(error: impl Into<String>, fields: FieldErrors) -> Self {
        ActionOutcome::Failure {
            status: FAILURE_STATUS,
            error: error.into(),
            fields,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Success)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ActionOutcome::Success => None,
            ActionOutcome::Failure { error, .. } => Some(error),
        }
    }

    pub fn fields(&self) -> Option<&FieldErrors> {
        match self {
            ActionOutcome::Failure { fields, .. } if !fields.is_empty() => Some(fields),
            _ => None,
        }
    }
}

/// Collapse a client call into an outcome, logging the backend failure.
pub(crate) fn from_call<T>(
    result: Result<T, ApiError>,
    page: &'static str,
    action: &'static str,
    message: String,
) -> ActionOutcome {
    match result {
        Ok(_) => ActionOutcome::Success,
        Err(err) => {
            tracing::warn!(page, action, status = err.status(), error = %err, "form action failed");
            ActionOutcome::failure(message)
        }
    }
}
