//! Filter, patch and sort primitives understood by every document store.
//!
//! Filters and sorts are evaluated against a record's JSON projection, so the
//! field names are the serialised names of the document (`_id`,
//! `dateUpdated`, `usersPending`, ...). Only equality and array membership are
//! supported.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::document::{DATE_CREATED_FIELD, DATE_UPDATED_FIELD, ID_FIELD, RESERVED_FIELDS};
use super::{DocId, Document, Record};

/// Predicate applied to one field of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field value equals the operand.
    Equals(Value),
    /// Field is an array containing the operand.
    Contains(Value),
}

impl Condition {
    fn holds(&self, field: Option<&Value>) -> bool {
        match (self, field) {
            (Self::Equals(expected), Some(actual)) => actual == expected,
            (Self::Equals(expected), None) => expected.is_null(),
            (Self::Contains(needle), Some(Value::Array(items))) => items.contains(needle),
            (Self::Contains(_), _) => false,
        }
    }
}

/// Conjunction of field conditions. An empty filter matches everything.
///
/// # Examples
/// ```
/// use shelfmates::domain::{DocId, Filter};
/// use serde_json::json;
///
/// let owner = DocId::random();
/// let filter = Filter::all().eq("owner", owner).eq("name", "toread");
/// assert!(filter.matches(&json!({ "owner": owner.to_string(), "name": "toread" })));
/// assert!(!filter.matches(&json!({ "owner": owner.to_string(), "name": "read" })));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Condition)>,
}

impl Filter {
    /// Filter matching every record.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter matching the record with the given identifier.
    #[must_use]
    pub fn by_id(id: DocId) -> Self {
        Self::all().eq(ID_FIELD, id)
    }

    /// Require `field` to equal `value`.
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses
            .push((field.into(), Condition::Equals(value.into())));
        self
    }

    /// Require the array stored in `field` to contain `value`.
    #[must_use]
    pub fn contains(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses
            .push((field.into(), Condition::Contains(value.into())));
        self
    }

    /// Identifier when the filter is exactly [`Filter::by_id`].
    pub fn single_id(&self) -> Option<DocId> {
        match self.clauses.as_slice() {
            [(field, Condition::Equals(Value::String(raw)))] if field == ID_FIELD => {
                DocId::new(raw).ok()
            }
            _ => None,
        }
    }

    /// Whether the filter has no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Evaluate the filter against a JSON projection.
    pub fn matches(&self, projection: &Value) -> bool {
        self.clauses
            .iter()
            .all(|(field, condition)| condition.holds(projection.get(field)))
    }
}

/// Sort direction for [`Sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Ordering applied by `read_many`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    field: String,
    direction: SortDirection,
}

impl Default for Sort {
    /// Most recently updated first.
    fn default() -> Self {
        Self::descending(DATE_UPDATED_FIELD)
    }
}

impl Sort {
    /// Sort by `field`, smallest first.
    #[must_use]
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Sort by `field`, largest first.
    #[must_use]
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Field the sort is keyed on.
    pub fn field(&self) -> &str {
        self.field.as_str()
    }

    /// Direction of the sort.
    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Compare two projected records.
    ///
    /// Timestamps compare chronologically rather than by their rendered text.
    pub fn compare<D: Document>(&self, left: &Projection<'_, D>, right: &Projection<'_, D>) -> Ordering {
        let ordering = match self.field.as_str() {
            DATE_UPDATED_FIELD => left.record.date_updated.cmp(&right.record.date_updated),
            DATE_CREATED_FIELD => left.record.date_created.cmp(&right.record.date_created),
            field => compare_values(left.json.get(field), right.json.get(field)),
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Options accepted by `read_many`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOptions {
    pub sort: Sort,
}

impl ReadOptions {
    /// Options using the supplied sort.
    #[must_use]
    pub fn sorted_by(sort: Sort) -> Self {
        Self { sort }
    }
}

/// A record paired with its JSON projection.
pub struct Projection<'a, D> {
    record: &'a Record<D>,
    json: Value,
}

impl<'a, D: Document> Projection<'a, D> {
    /// Project a record for filtering and sorting.
    pub fn of(record: &'a Record<D>) -> Result<Self, serde_json::Error> {
        let json = record.project()?;
        Ok(Self { record, json })
    }

    /// The underlying record.
    pub fn record(&self) -> &'a Record<D> {
        self.record
    }

    /// Whether the projection satisfies `filter`.
    pub fn matches(&self, filter: &Filter) -> bool {
        filter.matches(&self.json)
    }
}

fn rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

fn compare_values(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    match (left, right) {
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let a = a.as_f64().unwrap_or(f64::NAN);
            let b = b.as_f64().unwrap_or(f64::NAN);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Array(a)), Some(Value::Array(b))) => a.len().cmp(&b.len()),
        _ => rank(left).cmp(&rank(right)),
    }
}

/// Errors raised while applying a [`Patch`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatchError {
    /// The patch source did not serialise to a JSON object.
    #[error("patch must be a JSON object")]
    NotAnObject,
    /// The patch names a bookkeeping field.
    #[error("field '{field}' is maintained by the store")]
    ReservedField { field: String },
    /// The patch names a field the document does not have.
    #[error("unknown field '{field}'")]
    UnknownField { field: String },
    /// The merged document no longer matches its shape.
    #[error("patched document is malformed: {message}")]
    Malformed { message: String },
}

/// Partial update merged onto a document's top-level fields.
///
/// # Examples
/// ```
/// use shelfmates::domain::Patch;
///
/// let patch = Patch::new().set("avgRating", 4.5);
/// assert_eq!(patch.keys().collect::<Vec<_>>(), vec!["avgRating"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Patch(Map<String, Value>);

impl Patch {
    /// Empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `field` to `value`.
    #[must_use]
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Build a patch from any value serialising to a JSON object.
    ///
    /// Typed patch structs should skip `None` fields so that absent keys stay
    /// untouched.
    pub fn from_serializable<T: Serialize>(value: &T) -> Result<Self, PatchError> {
        match serde_json::to_value(value) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            Ok(_) => Err(PatchError::NotAnObject),
            Err(err) => Err(PatchError::Malformed {
                message: err.to_string(),
            }),
        }
    }

    /// Names of the fields this patch touches.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Value this patch assigns to `field`, if any.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Whether the patch touches no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge the patch onto `document`, returning the updated document.
    pub fn apply_to<D: Document>(&self, document: &D) -> Result<D, PatchError> {
        let mut fields = match serde_json::to_value(document) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(PatchError::NotAnObject),
            Err(err) => {
                return Err(PatchError::Malformed {
                    message: err.to_string(),
                });
            }
        };

        for (field, value) in &self.0 {
            if RESERVED_FIELDS.contains(&field.as_str()) {
                return Err(PatchError::ReservedField {
                    field: field.clone(),
                });
            }
            let Some(slot) = fields.get_mut(field) else {
                return Err(PatchError::UnknownField {
                    field: field.clone(),
                });
            };
            *slot = value.clone();
        }

        serde_json::from_value(Value::Object(fields)).map_err(|err| PatchError::Malformed {
            message: err.to_string(),
        })
    }
}
