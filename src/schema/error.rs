// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::fmt;
use std::sync::Arc;

/// Decode failures reported by the populator and the params binder.
///
/// A decode produces at most one of these; the variants exist because the
/// rendered message is built compositionally while the failure bubbles out
/// of the value tree. Only the `Display` rendering is contractual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopulateError {
    /// A required field or argument position was not supplied.
    RequiredFieldMissing { field: Arc<str> },
    /// A named field's value failed to decode.
    FieldInvalid {
        field: Arc<str>,
        error: Box<PopulateError>,
    },
    /// A named field's list value failed element-wise.
    ArrayFieldInvalid {
        field: Arc<str>,
        error: Box<PopulateError>,
    },
    /// A list element failed to decode.
    ArrayItemInvalid {
        index: usize,
        error: Box<PopulateError>,
    },
    /// The value's tag differs from the expected type.
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    /// The value is not a member of the enumeration's allowed set.
    NotInEnum {
        field: Arc<str>,
        allowed: Arc<Vec<Arc<str>>>,
        actual: String,
    },
    /// No choice alternative's coarse tag matched the value.
    NoChoiceMatch {
        alternatives: Vec<Arc<str>>,
        actual: &'static str,
    },
    /// More positional arguments than declared positions.
    TooManyArguments { expected: usize, actual: usize },
}

impl PopulateError {
    /// Attribute an error raised while decoding the named field or key.
    ///
    /// Errors that already carry their own path segment (required-field
    /// messages, enum mismatches with their display name, and anything a
    /// deeper level qualified) pass through untouched; only bare messages
    /// pick up the field prefix, and element-level array failures pick up
    /// the `Error at key` form instead.
    pub(crate) fn qualify(self, field: &Arc<str>) -> PopulateError {
        match self {
            e @ PopulateError::ArrayItemInvalid { .. } => PopulateError::ArrayFieldInvalid {
                field: Arc::clone(field),
                error: Box::new(e),
            },
            e @ (PopulateError::TypeMismatch { .. } | PopulateError::NoChoiceMatch { .. }) => {
                PopulateError::FieldInvalid {
                    field: Arc::clone(field),
                    error: Box::new(e),
                }
            }
            e => e,
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[impl AsRef<str>], quoted: bool) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " or ")?;
        }
        if quoted {
            write!(f, "\"{}\"", item.as_ref())?;
        } else {
            write!(f, "{}", item.as_ref())?;
        }
    }
    Ok(())
}

impl fmt::Display for PopulateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PopulateError::RequiredFieldMissing { field } => {
                write!(f, "'{field}' is required")
            }
            PopulateError::FieldInvalid { field, error } => {
                write!(f, "'{field}': {error}")
            }
            PopulateError::ArrayFieldInvalid { field, error } => {
                write!(f, "Error at key '{field}': {error}")
            }
            PopulateError::ArrayItemInvalid { index, error } => {
                write!(f, "Parsing array failed at index {index}: {error}")
            }
            PopulateError::TypeMismatch { expected, actual } => {
                write!(f, "expected {expected}, got {actual}")
            }
            PopulateError::NotInEnum {
                field,
                allowed,
                actual,
            } => {
                write!(f, "'{field}': expected ")?;
                write_joined(f, allowed.as_slice(), true)?;
                write!(f, ", got \"{actual}\"")
            }
            PopulateError::NoChoiceMatch {
                alternatives,
                actual,
            } => {
                write!(f, "expected ")?;
                write_joined(f, alternatives.as_slice(), false)?;
                write!(f, ", got {actual}")
            }
            PopulateError::TooManyArguments { expected, actual } => {
                write!(f, "expected {expected} arguments, got {actual}")
            }
        }
    }
}

impl std::error::Error for PopulateError {}
