//! Request validation
//!
//! Synchronous checks applied to a [`GenerationRequest`] before it is
//! submitted. Every rule is evaluated so the caller can report all
//! offending fields at once; any error blocks submission.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::dto::generation::GenerationRequest;

pub const MIN_PROMPT_CHARS: usize = 3;
pub const MIN_DIMENSION: u32 = 512;
pub const MAX_DIMENSION: u32 = 2048;
pub const DIMENSION_STEP: u32 = 64;
pub const MIN_STEPS: u32 = 1;
pub const MAX_STEPS: u32 = 50;

/// Request field a validation error is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Prompt,
    Width,
    Height,
    Steps,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Prompt => "prompt",
            Field::Width => "width",
            Field::Height => "height",
            Field::Steps => "num_inference_steps",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-keyed validation failures, at most one message per field
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("invalid generation request: {}", summary(.errors))]
pub struct ValidationErrors {
    errors: BTreeMap<Field, String>,
}

fn summary(errors: &BTreeMap<Field, String>) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    /// Keeps the first message recorded for a field
    fn add(&mut self, field: Field, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }
}

/// Validates every field of `request`
pub fn validate(request: &GenerationRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if request.prompt.chars().count() < MIN_PROMPT_CHARS {
        errors.add(
            Field::Prompt,
            format!("Prompt must be at least {MIN_PROMPT_CHARS} characters"),
        );
    }

    check_dimension(&mut errors, Field::Width, "Width", request.width);
    check_dimension(&mut errors, Field::Height, "Height", request.height);

    if !(MIN_STEPS..=MAX_STEPS).contains(&request.steps) {
        errors.add(
            Field::Steps,
            format!("Inference steps must be between {MIN_STEPS} and {MAX_STEPS}"),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_dimension(errors: &mut ValidationErrors, field: Field, label: &str, value: u32) {
    if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&value) {
        errors.add(
            field,
            format!("{label} must be between {MIN_DIMENSION} and {MAX_DIMENSION}"),
        );
    } else if (value - MIN_DIMENSION) % DIMENSION_STEP != 0 {
        errors.add(
            field,
            format!("{label} must be a multiple of {DIMENSION_STEP}"),
        );
    }
}
