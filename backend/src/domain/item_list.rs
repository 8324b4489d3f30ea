//! Named, owner-scoped lists of item references.
//!
//! Folders and rating lists share one shape: an owner, a name unique per
//! owner, and an ordered duplicate-free set of items. Each kind lives in its
//! own collection.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use super::{DocId, Document, MembershipSet, Record};

/// Field name of the owning user.
pub const OWNER_FIELD: &str = "owner";
/// Field name of the list name.
pub const NAME_FIELD: &str = "name";
/// Field name of the item set.
pub const ITEMS_FIELD: &str = "items";

/// Flavour of item list, selecting its collection and wording.
pub trait ListKind:
    std::fmt::Debug + Clone + Copy + Default + PartialEq + Send + Sync + 'static
{
    /// Backing collection name.
    const COLLECTION: &'static str;
    /// Capitalised label used in messages, e.g. `Folder`.
    const LABEL: &'static str;
    /// Lower-case noun used in messages, e.g. `folder`.
    const NOUN: &'static str;
}

/// Reading folders such as "toread" or "favourites".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Folders;

impl ListKind for Folders {
    const COLLECTION: &'static str = "folders";
    const LABEL: &'static str = "Folder";
    const NOUN: &'static str = "folder";
}

/// Rating lists grouping rated items under a name such as "5 stars".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ratings;

impl ListKind for Ratings {
    const COLLECTION: &'static str = "ratings";
    const LABEL: &'static str = "Rating";
    const NOUN: &'static str = "rating";
}

/// Stored item list of kind `K`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemListDoc<K> {
    pub owner: DocId,
    pub name: String,
    pub items: MembershipSet,
    #[serde(skip)]
    kind: PhantomData<K>,
}

impl<K: ListKind> ItemListDoc<K> {
    /// An empty list.
    pub fn empty(owner: DocId, name: impl Into<String>) -> Self {
        Self {
            owner,
            name: name.into(),
            items: MembershipSet::new(),
            kind: PhantomData,
        }
    }
}

impl<K: ListKind> Document for ItemListDoc<K> {
    const COLLECTION: &'static str = K::COLLECTION;
}

pub type FolderDoc = ItemListDoc<Folders>;
pub type RatingDoc = ItemListDoc<Ratings>;

/// Acknowledgement returned when a list is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "K: ListKind", deserialize = "K: ListKind"))]
pub struct ItemListCreated<K> {
    pub msg: String,
    pub folder: Record<ItemListDoc<K>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn kind_marker_is_not_serialised() {
        let owner = DocId::random();
        let value = serde_json::to_value(FolderDoc::empty(owner, "toread")).expect("serialise");
        assert_eq!(
            value,
            serde_json::json!({ "owner": owner.to_string(), "name": "toread", "items": [] })
        );
    }

    #[rstest]
    fn kinds_use_separate_collections() {
        assert_eq!(<FolderDoc as Document>::COLLECTION, "folders");
        assert_eq!(<RatingDoc as Document>::COLLECTION, "ratings");
    }
}
