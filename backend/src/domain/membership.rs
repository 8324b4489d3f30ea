//! Ordered, duplicate-free identifier sets.
//!
//! Folder contents, friend lists, shelves and invitation participant lists all
//! share these semantics: insertion order is preserved and an identifier
//! appears at most once.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::DocId;

/// Ordered set of record identifiers.
///
/// # Examples
/// ```
/// use shelfmates::domain::{DocId, MembershipSet};
///
/// let a = DocId::random();
/// let b = DocId::random();
/// let set = MembershipSet::from_ids([a, b, a]);
/// assert_eq!(set.len(), 2);
/// assert!(set.without_all([a]).iter().eq([b].iter()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<DocId>", into = "Vec<DocId>")]
pub struct MembershipSet(Vec<DocId>);

impl MembershipSet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from any identifiers, dropping repeats.
    pub fn from_ids(ids: impl IntoIterator<Item = DocId>) -> Self {
        Self::new().with_all(ids)
    }

    /// Union keeping existing order and appending unseen identifiers.
    #[must_use]
    pub fn with_all(mut self, ids: impl IntoIterator<Item = DocId>) -> Self {
        for id in ids {
            if !self.0.contains(&id) {
                self.0.push(id);
            }
        }
        self
    }

    /// Difference removing every listed identifier.
    #[must_use]
    pub fn without_all(mut self, ids: impl IntoIterator<Item = DocId>) -> Self {
        let removed: Vec<DocId> = ids.into_iter().collect();
        self.0.retain(|id| !removed.contains(id));
        self
    }

    pub fn contains(&self, id: &DocId) -> bool {
        self.0.contains(id)
    }

    /// Whether every listed identifier is present.
    pub fn contains_all<'a>(&self, ids: impl IntoIterator<Item = &'a DocId>) -> bool {
        ids.into_iter().all(|id| self.contains(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocId> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[DocId] {
        self.0.as_slice()
    }
}

impl From<Vec<DocId>> for MembershipSet {
    fn from(value: Vec<DocId>) -> Self {
        Self::from_ids(value)
    }
}

impl From<MembershipSet> for Vec<DocId> {
    fn from(value: MembershipSet) -> Self {
        value.0
    }
}

impl From<MembershipSet> for Value {
    fn from(value: MembershipSet) -> Self {
        Value::Array(value.0.into_iter().map(Value::from).collect())
    }
}

impl FromIterator<DocId> for MembershipSet {
    fn from_iter<T: IntoIterator<Item = DocId>>(iter: T) -> Self {
        Self::from_ids(iter)
    }
}

impl IntoIterator for MembershipSet {
    type Item = DocId;
    type IntoIter = std::vec::IntoIter<DocId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn union_preserves_order_and_skips_repeats() {
        let (a, b, c) = (DocId::random(), DocId::random(), DocId::random());
        let set = MembershipSet::from_ids([a, b]).with_all([b, c, a]);
        assert_eq!(set.as_slice(), &[a, b, c]);
    }

    #[rstest]
    fn difference_ignores_absent_ids() {
        let (a, b) = (DocId::random(), DocId::random());
        let set = MembershipSet::from_ids([a]).without_all([b]);
        assert_eq!(set.as_slice(), &[a]);
    }

    #[rstest]
    fn deserialising_drops_duplicates() {
        let a = DocId::random();
        let json = serde_json::json!([a.to_string(), a.to_string()]);
        let set: MembershipSet = serde_json::from_value(json).expect("decode");
        assert_eq!(set.len(), 1);
        assert!(set.contains(&a));
    }

    #[rstest]
    fn contains_all_checks_every_id() {
        let (a, b) = (DocId::random(), DocId::random());
        let set = MembershipSet::from_ids([a]);
        assert!(set.contains_all([&a]));
        assert!(!set.contains_all([&a, &b]));
    }
}
