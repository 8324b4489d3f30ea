//! Profile concept: one profile per user with shelves and a friend list.
//!
//! Shelf and friend mutations follow the same read, compute, write-back
//! sequence as folders and share its lost-update window.

use std::sync::Arc;

use tracing::{info, warn};

use super::profile::{FRIENDS_FIELD, USER_FIELD};
use super::ports::{DocumentStore, DocumentStoreError};
use super::store_support::{map_store_error, require_hit};
use super::{
    DocId, Document, Error, Filter, MembershipSet, Message, Patch, ProfileCreated, ProfileDoc,
    Record, Shelf,
};

fn store_error(err: DocumentStoreError) -> Error {
    map_store_error(ProfileDoc::COLLECTION, err)
}

/// Service owning the `profiles` collection.
#[derive(Clone)]
pub struct ProfileService {
    profiles: Arc<dyn DocumentStore<ProfileDoc>>,
}

impl ProfileService {
    pub fn new(profiles: Arc<dyn DocumentStore<ProfileDoc>>) -> Self {
        Self { profiles }
    }

    /// Create the profile for `user`.
    pub async fn create_profile(&self, user: DocId, name: &str) -> Result<ProfileCreated, Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid_argument("Profile name must be non-empty!"));
        }
        if self.find(user).await?.is_some() {
            warn!(%user, "profile already exists");
            return Err(Error::already_exists("Profile already exists!"));
        }
        let id = self
            .profiles
            .create_one(ProfileDoc::blank(user, name))
            .await
            .map_err(store_error)?;
        info!(profile_id = %id, %user, "profile created");
        Ok(ProfileCreated {
            msg: "Profile successfully created!".to_owned(),
            profile: self.get_profile(user).await?,
        })
    }

    pub async fn get_profile(&self, user: DocId) -> Result<Record<ProfileDoc>, Error> {
        self.find(user)
            .await?
            .ok_or_else(|| Error::not_found("Profile not found!"))
    }

    pub async fn add_to_shelf(
        &self,
        user: DocId,
        shelf: Shelf,
        books: &[DocId],
    ) -> Result<Message, Error> {
        self.rewrite(user, shelf.field(), |profile| {
            profile.shelf(shelf).clone().with_all(books.iter().copied())
        })
        .await?;
        Ok(Message::new(format!("Added to {shelf} shelf!")))
    }

    pub async fn remove_from_shelf(
        &self,
        user: DocId,
        shelf: Shelf,
        books: &[DocId],
    ) -> Result<Message, Error> {
        self.rewrite(user, shelf.field(), |profile| {
            profile
                .shelf(shelf)
                .clone()
                .without_all(books.iter().copied())
        })
        .await?;
        Ok(Message::new(format!("Removed from {shelf} shelf!")))
    }

    pub async fn add_friend(&self, user: DocId, friend: DocId) -> Result<Message, Error> {
        if user == friend {
            return Err(Error::invalid_argument("Cannot befriend yourself!"));
        }
        self.rewrite(user, FRIENDS_FIELD, |profile| {
            profile.friends.clone().with_all([friend])
        })
        .await?;
        Ok(Message::new("Friend added!"))
    }

    pub async fn remove_friend(&self, user: DocId, friend: DocId) -> Result<Message, Error> {
        self.rewrite(user, FRIENDS_FIELD, |profile| {
            profile.friends.clone().without_all([friend])
        })
        .await?;
        Ok(Message::new("Friend removed!"))
    }

    async fn find(&self, user: DocId) -> Result<Option<Record<ProfileDoc>>, Error> {
        self.profiles
            .read_one(&Filter::all().eq(USER_FIELD, user))
            .await
            .map_err(store_error)
    }

    async fn rewrite<F>(&self, user: DocId, field: &'static str, compute: F) -> Result<(), Error>
    where
        F: FnOnce(&ProfileDoc) -> MembershipSet + Send,
    {
        let profile = self.get_profile(user).await?;
        let next = compute(&profile.fields);
        let count = next.len();
        let outcome = self
            .profiles
            .update_one_by_id(profile.id, &Patch::new().set(field, next))
            .await
            .map_err(store_error)?;
        require_hit(outcome, "Profile not found!")?;
        info!(%user, field, entries = count, "profile list written");
        Ok(())
    }
}
