//! Declarative validation schemas for entity forms.
//!
//! A schema describes the shape a submission must satisfy before it may be
//! handed to the gateway: which fields exist and that each is non-blank.
//! Validation is a pure function over the candidate values; no network or
//! cross-entity checks (e.g. uniqueness) happen client-side.

use std::collections::HashMap;

/// Specifying the role a field plays on an entity.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FieldKind {
    /// Free-form text entered by the user.
    Text,
    /// Foreign-key-like identifier referencing another entity.
    Reference,
}

/// Describes a single field on an entity form.
///
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

/// Validation failure kinds for a single field.
///
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// Field was missing or blank
    #[error("must not be empty")]
    EmptyField,
}

/// Collection of per-field validation failures keyed by field name.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorSet {
    errors: HashMap<String, FieldError>,
}

impl ErrorSet {
    /// Return the failure recorded for a field, if any.
    ///
    pub fn get(&self, field: &str) -> Option<FieldError> {
        self.errors.get(field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Consume the set into the underlying field -> failure mapping.
    ///
    pub fn into_inner(self) -> HashMap<String, FieldError> {
        self.errors
    }
}

/// Declarative shape describing the fields of an entity form.
///
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Return a new schema over the given field specs.
    ///
    pub fn new(fields: Vec<FieldSpec>) -> Schema {
        Schema { fields }
    }

    /// Return the field specs in declaration order.
    ///
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Return empty starting values for every declared field. Used to seed a
    /// form in create mode.
    ///
    pub fn default_values(&self) -> HashMap<String, String> {
        self.fields
            .iter()
            .map(|field| (field.name.to_owned(), String::new()))
            .collect()
    }

    /// Check the candidate values against the schema. Every declared field
    /// must be present and non-blank; whitespace-only input counts as blank.
    ///
    pub fn validate(&self, values: &HashMap<String, String>) -> Result<(), ErrorSet> {
        let mut errors = HashMap::new();
        for field in &self.fields {
            let blank = values
                .get(field.name)
                .map(|value| value.trim().is_empty())
                .unwrap_or(true);
            if blank {
                errors.insert(field.name.to_owned(), FieldError::EmptyField);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ErrorSet { errors })
        }
    }
}
