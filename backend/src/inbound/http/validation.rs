//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request bodies and paths carry identifiers as plain strings; these helpers
//! turn them into domain values and report failures with field context.

use serde_json::json;

use crate::domain::{DocId, Error, Shelf};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidId,
    InvalidShelf,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::InvalidShelf => "invalid_shelf",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_argument(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }

    fn with_index(self, code: ErrorCode, index: usize, value: impl Into<String>) -> Error {
        Error::invalid_argument(self.message).with_details(json!({
            "field": self.field,
            "index": index,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn parse_doc_id(value: &str, field: FieldName) -> Result<DocId, Error> {
    DocId::new(value).map_err(|_| {
        let name = field.as_str();
        ValidationError::new(name, format!("{name} must be a valid id"))
            .with_value(ErrorCode::InvalidId, value)
    })
}

pub(crate) fn parse_doc_id_list(values: &[String], field: FieldName) -> Result<Vec<DocId>, Error> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            DocId::new(value).map_err(|_| {
                let name = field.as_str();
                ValidationError::new(name, format!("{name} must contain valid ids"))
                    .with_index(ErrorCode::InvalidId, index, value.as_str())
            })
        })
        .collect()
}

pub(crate) fn parse_shelf(value: &str) -> Result<Shelf, Error> {
    value.parse::<Shelf>().map_err(|err| {
        ValidationError::new("shelf", err.to_string()).with_value(ErrorCode::InvalidShelf, value)
    })
}
