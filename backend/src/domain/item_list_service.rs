//! Folder and rating-list concepts.
//!
//! Item mutations read the list, compute the new item set and write the
//! whole set back. The read and the write are separate store calls, so two
//! concurrent mutations of the same list can lose one of the updates.

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{info, warn};

use super::item_list::{ITEMS_FIELD, NAME_FIELD, OWNER_FIELD};
use super::ports::{DocumentStore, DocumentStoreError};
use super::store_support::{map_store_error, require_hit};
use super::{
    DocId, Document, Error, Filter, Folders, ItemListCreated, ItemListDoc, ListKind,
    MembershipSet, Message, Patch, Ratings, ReadOptions, Record,
};

/// Service owning one item-list collection.
pub struct ItemListService<K: ListKind> {
    lists: Arc<dyn DocumentStore<ItemListDoc<K>>>,
    kind: PhantomData<K>,
}

impl<K: ListKind> Clone for ItemListService<K> {
    fn clone(&self) -> Self {
        Self {
            lists: Arc::clone(&self.lists),
            kind: PhantomData,
        }
    }
}

pub type FolderService = ItemListService<Folders>;
pub type RatingService = ItemListService<Ratings>;

fn owned_by(owner: DocId, name: &str) -> Filter {
    Filter::all().eq(OWNER_FIELD, owner).eq(NAME_FIELD, name)
}

impl<K: ListKind> ItemListService<K> {
    pub fn new(lists: Arc<dyn DocumentStore<ItemListDoc<K>>>) -> Self {
        Self {
            lists,
            kind: PhantomData,
        }
    }

    fn store_error(err: DocumentStoreError) -> Error {
        map_store_error(<ItemListDoc<K> as Document>::COLLECTION, err)
    }

    fn missing(name: &str) -> Error {
        Error::not_found(format!("{} {name} not found!", K::LABEL))
    }

    /// Every list owned by `owner`, most recently updated first.
    pub async fn get_folders(&self, owner: DocId) -> Result<Vec<Record<ItemListDoc<K>>>, Error> {
        self.lists
            .read_many(&Filter::all().eq(OWNER_FIELD, owner), &ReadOptions::default())
            .await
            .map_err(Self::store_error)
    }

    /// Items of the owner's list called `name`.
    ///
    /// Should several lists share the pair, their items are concatenated
    /// without repeats. A missing list yields an empty set.
    pub async fn get_user_folder_contents(
        &self,
        owner: DocId,
        name: &str,
    ) -> Result<MembershipSet, Error> {
        let lists = self
            .lists
            .read_many(&owned_by(owner, name), &ReadOptions::default())
            .await
            .map_err(Self::store_error)?;
        Ok(lists
            .into_iter()
            .fold(MembershipSet::new(), |items, list| {
                items.with_all(list.fields.items)
            }))
    }

    /// Create an empty list; names are unique per owner.
    pub async fn add_new_folder(
        &self,
        owner: DocId,
        name: &str,
    ) -> Result<ItemListCreated<K>, Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid_argument(format!(
                "{} name must be non-empty!",
                K::LABEL
            )));
        }
        if self.find(owner, name).await?.is_some() {
            warn!(%owner, name, kind = K::NOUN, "list already exists");
            return Err(Error::already_exists(format!(
                "{} {name} already exists!",
                K::LABEL
            )));
        }

        let id = self
            .lists
            .create_one(ItemListDoc::empty(owner, name))
            .await
            .map_err(Self::store_error)?;
        info!(%owner, name, list_id = %id, kind = K::NOUN, "list created");

        let folder = self
            .lists
            .read_one_by_id(id)
            .await
            .map_err(Self::store_error)?
            .ok_or_else(|| Self::missing(name))?;
        Ok(ItemListCreated {
            msg: format!("{} successfully created!", K::LABEL),
            folder,
        })
    }

    /// Add `items`, ignoring ones already present.
    pub async fn add_to_folder(
        &self,
        owner: DocId,
        name: &str,
        items: &[DocId],
    ) -> Result<Message, Error> {
        self.rewrite_items(owner, name, |current| {
            current.with_all(items.iter().copied())
        })
        .await?;
        Ok(Message::new(format!("Added item to {}!", K::NOUN)))
    }

    /// Remove `items`, ignoring ones not present.
    pub async fn remove_from_folder(
        &self,
        owner: DocId,
        name: &str,
        items: &[DocId],
    ) -> Result<Message, Error> {
        self.rewrite_items(owner, name, |current| {
            current.without_all(items.iter().copied())
        })
        .await?;
        Ok(Message::new(format!("Removed item from {}!", K::NOUN)))
    }

    pub async fn delete_folder(&self, owner: DocId, name: &str) -> Result<Message, Error> {
        let outcome = self
            .lists
            .delete_one(&owned_by(owner, name))
            .await
            .map_err(Self::store_error)?;
        require_hit(outcome, format!("{} {name} not found!", K::LABEL))?;
        info!(%owner, name, kind = K::NOUN, "list deleted");
        Ok(Message::new(format!("{} deleted!", K::LABEL)))
    }

    async fn find(&self, owner: DocId, name: &str) -> Result<Option<Record<ItemListDoc<K>>>, Error> {
        self.lists
            .read_one(&owned_by(owner, name))
            .await
            .map_err(Self::store_error)
    }

    async fn rewrite_items<F>(&self, owner: DocId, name: &str, compute: F) -> Result<(), Error>
    where
        F: FnOnce(MembershipSet) -> MembershipSet + Send,
    {
        let list = self
            .find(owner, name)
            .await?
            .ok_or_else(|| Self::missing(name))?;
        let items = compute(list.fields.items);
        let count = items.len();
        let outcome = self
            .lists
            .update_one_by_id(list.id, &Patch::new().set(ITEMS_FIELD, items))
            .await
            .map_err(Self::store_error)?;
        require_hit(outcome, format!("{} {name} not found!", K::LABEL))?;
        info!(%owner, name, items = count, kind = K::NOUN, "list items written");
        Ok(())
    }
}

#[cfg(test)]
#[path = "item_list_service_tests.rs"]
mod tests;
