//! Entity form state and submission lifecycle.
//!
//! A form owns its field values, validation errors, and busy flag. The busy
//! flag is the sole re-entrancy guard: callers are expected to disable their
//! submission triggers while a submit is in flight, but the form refuses
//! duplicate submits on its own as well.

use crate::api::EntityKind;
use crate::schema::FieldError;
use log::*;
use std::collections::HashMap;

/// Distinguishes create from edit submissions.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

/// Specifying form lifecycle phases.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FormPhase {
    Idle,
    Validating,
    Submitting,
    Error,
}

/// Holds current field values, validation errors, and the busy flag for one
/// entity form.
///
#[derive(Debug)]
pub struct Form {
    kind: EntityKind,
    mode: FormMode,
    phase: FormPhase,
    values: HashMap<String, String>,
    errors: HashMap<String, FieldError>,
    busy: bool,
}

impl Form {
    /// Return a create-mode form with empty defaults for every field.
    ///
    pub fn create(kind: EntityKind) -> Form {
        Form {
            kind,
            mode: FormMode::Create,
            phase: FormPhase::Idle,
            values: kind.schema().default_values(),
            errors: HashMap::new(),
            busy: false,
        }
    }

    /// Return an edit-mode form seeded from an existing entity's values.
    ///
    pub fn edit(kind: EntityKind, id: String, values: HashMap<String, String>) -> Form {
        Form {
            kind,
            mode: FormMode::Edit { id },
            phase: FormPhase::Idle,
            values,
            errors: HashMap::new(),
            busy: false,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Return the current value of a field.
    ///
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn values(&self) -> &HashMap<String, String> {
        &self.values
    }

    /// Return the validation failure recorded for a field, if any.
    ///
    pub fn error(&self, name: &str) -> Option<FieldError> {
        self.errors.get(name).copied()
    }

    /// Update a field value and clear that field's error. Ignored while a
    /// submission is in flight.
    ///
    pub fn change_field(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        if self.busy {
            warn!("Ignoring field change for '{}' while submitting.", name);
            return self;
        }
        self.values.insert(name.to_owned(), value.into());
        self.errors.remove(name);
        self
    }

    /// Validate and enter the submitting phase.
    ///
    /// Returns the values to submit when the gateway may be called. Returns
    /// `None` when validation failed (phase moves to `Error` with the error
    /// set, no gateway call) or when a submission is already in flight (the
    /// re-entrancy no-op).
    ///
    pub fn begin_submit(&mut self) -> Option<HashMap<String, String>> {
        if self.busy {
            debug!("Ignoring submit while a submission is in flight.");
            return None;
        }
        self.phase = FormPhase::Validating;
        match self.kind.schema().validate(&self.values) {
            Ok(()) => {
                self.errors.clear();
                self.phase = FormPhase::Submitting;
                self.busy = true;
                Some(self.values.clone())
            }
            Err(errors) => {
                self.errors = errors.into_inner();
                self.phase = FormPhase::Error;
                self.busy = false;
                None
            }
        }
    }

    /// Resolve an in-flight submission that succeeded.
    ///
    pub fn finish_success(&mut self) -> &mut Self {
        self.busy = false;
        self.phase = FormPhase::Idle;
        self
    }

    /// Resolve an in-flight submission that failed. Field values are
    /// preserved so the user can retry.
    ///
    pub fn finish_failure(&mut self) -> &mut Self {
        self.busy = false;
        self.phase = FormPhase::Error;
        self
    }
}
