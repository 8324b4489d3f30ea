//! Generic document shapes shared by every concept.
//!
//! A stored [`Record`] wraps caller-owned fields with the bookkeeping triple
//! (`_id`, `dateCreated`, `dateUpdated`). Only stores write the triple.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Field name of the record identifier in the JSON projection.
pub const ID_FIELD: &str = "_id";
/// Field name of the creation timestamp in the JSON projection.
pub const DATE_CREATED_FIELD: &str = "dateCreated";
/// Field name of the last-update timestamp in the JSON projection.
pub const DATE_UPDATED_FIELD: &str = "dateUpdated";

/// Bookkeeping fields that callers may never write.
pub const RESERVED_FIELDS: [&str; 3] = [ID_FIELD, DATE_CREATED_FIELD, DATE_UPDATED_FIELD];

/// Shape persisted by a [`crate::domain::ports::DocumentStore`].
///
/// Field names produced by `Serialize` are the names filters, sorts and
/// patches address. Implementations must serialise as a JSON object and must
/// not reuse any of [`RESERVED_FIELDS`].
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection name used for logging and on-disk snapshots.
    const COLLECTION: &'static str;
}

/// Validation errors returned by [`DocId::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocIdValidationError {
    /// Identifier was blank.
    #[error("identifier must not be empty")]
    Empty,
    /// Identifier was not a lowercase hyphenated UUID.
    #[error("identifier must be a lowercase hyphenated UUID")]
    Invalid,
}

/// Opaque record identifier.
///
/// # Examples
/// ```
/// use shelfmates::domain::DocId;
///
/// let id = DocId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
/// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocId(Uuid);

impl DocId {
    /// Validate and construct a [`DocId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, DocIdValidationError> {
        let raw = id.as_ref();
        if raw.trim().is_empty() {
            return Err(DocIdValidationError::Empty);
        }
        let uuid = Uuid::try_parse(raw).map_err(|_| DocIdValidationError::Invalid)?;
        if uuid.hyphenated().to_string() != raw {
            return Err(DocIdValidationError::Invalid);
        }
        Ok(Self(uuid))
    }

    /// Generate a fresh random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocId {
    type Err = DocIdValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<DocId> for String {
    fn from(value: DocId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for DocId {
    type Error = DocIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DocId> for Value {
    fn from(value: DocId) -> Self {
        Value::String(value.to_string())
    }
}

/// A persisted document together with its bookkeeping fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<D> {
    #[serde(rename = "_id")]
    pub id: DocId,
    #[serde(rename = "dateCreated")]
    pub date_created: DateTime<Utc>,
    #[serde(rename = "dateUpdated")]
    pub date_updated: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: D,
}

impl<D: Document> Record<D> {
    /// Wrap freshly created fields, stamping both timestamps with `now`.
    pub fn stamped(id: DocId, fields: D, now: DateTime<Utc>) -> Self {
        Self {
            id,
            date_created: now,
            date_updated: now,
            fields,
        }
    }

    /// JSON view of the record used for filter evaluation and sorting.
    pub fn project(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Transform the document fields while keeping the bookkeeping triple.
    pub fn map<T, F>(self, f: F) -> Record<T>
    where
        F: FnOnce(D) -> T,
    {
        Record {
            id: self.id,
            date_created: self.date_created,
            date_updated: self.date_updated,
            fields: f(self.fields),
        }
    }
}

/// Plain acknowledgement returned by mutating concept operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub msg: String,
}

impl Message {
    /// Build an acknowledgement from any string-like message.
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}
