//! User concept: account creation, lookup, authentication and updates.
//!
//! Usernames are unique. The check runs before any write and is not atomic
//! with it, so two concurrent creations of the same username can both pass.

use std::sync::Arc;

use tracing::{info, warn};

use super::ports::{DocumentStore, DocumentStoreError};
use super::store_support::{map_store_error, require_hit};
use super::{
    Credentials, DocId, Document, Error, Filter, Message, PublicUser, ReadOptions, Record,
    UserCreated, UserDoc, UserPatch,
};

fn store_error(err: DocumentStoreError) -> Error {
    map_store_error(UserDoc::COLLECTION, err)
}

/// Service owning the `users` collection.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn DocumentStore<UserDoc>>,
}

impl UserService {
    /// Create a service over the given store.
    pub fn new(users: Arc<dyn DocumentStore<UserDoc>>) -> Self {
        Self { users }
    }

    /// Register a new account.
    pub async fn create(&self, username: &str, password: &str) -> Result<UserCreated, Error> {
        let credentials = Credentials::try_from_parts(username, password)
            .map_err(|err| Error::invalid_argument(err.to_string()))?;
        self.ensure_username_free(credentials.username()).await?;

        let id = self
            .users
            .create_one(UserDoc {
                username: credentials.username().to_owned(),
                password: credentials.password().to_owned(),
                profile_picture_url: None,
            })
            .await
            .map_err(store_error)?;
        info!(user_id = %id, username = credentials.username(), "user created");

        let user = self.get_user_by_id(id).await?;
        Ok(UserCreated {
            msg: "User created successfully!".to_owned(),
            user,
        })
    }

    async fn find_by_id(&self, id: DocId) -> Result<Option<Record<UserDoc>>, Error> {
        self.users.read_one_by_id(id).await.map_err(store_error)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Record<UserDoc>>, Error> {
        self.users
            .read_one(&Filter::all().eq("username", username))
            .await
            .map_err(store_error)
    }

    pub async fn get_user_by_id(&self, id: DocId) -> Result<PublicUser, Error> {
        self.find_by_id(id)
            .await?
            .map(PublicUser::from)
            .ok_or_else(|| Error::not_found("User not found!"))
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<PublicUser, Error> {
        self.find_by_username(username.trim())
            .await?
            .map(PublicUser::from)
            .ok_or_else(|| Error::not_found(format!("User {} not found!", username.trim())))
    }

    /// All users, or only the one named `username`, newest first.
    pub async fn get_users(&self, username: Option<&str>) -> Result<Vec<PublicUser>, Error> {
        let filter = match username {
            Some(name) => Filter::all().eq("username", name.trim()),
            None => Filter::all(),
        };
        let users = self
            .users
            .read_many(&filter, &ReadOptions::default())
            .await
            .map_err(store_error)?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    /// Check a username/password pair.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<PublicUser, Error> {
        let credentials = Credentials::try_from_parts(username, password)
            .map_err(|err| Error::invalid_argument(err.to_string()))?;
        let found = self
            .users
            .read_one(
                &Filter::all()
                    .eq("username", credentials.username())
                    .eq("password", credentials.password()),
            )
            .await
            .map_err(store_error)?;
        match found {
            Some(record) => Ok(PublicUser::from(record)),
            None => {
                warn!(username = credentials.username(), "authentication failed");
                Err(Error::unauthorized("Username or password is incorrect."))
            }
        }
    }

    /// Apply a partial update to an existing account.
    ///
    /// Renaming to a username held by another account fails with
    /// `AlreadyExists`; keeping one's own username is allowed.
    pub async fn update(&self, id: DocId, update: &UserPatch) -> Result<Message, Error> {
        if update.has_blank_credentials() {
            return Err(Error::invalid_argument(
                "Username and password must be non-empty!",
            ));
        }
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("User not found!"))?;

        if let Some(username) = update.username.as_deref().map(str::trim)
            && username != current.fields.username
        {
            self.ensure_username_free(username).await?;
        }

        let patch = update
            .to_patch()
            .map_err(|err| Error::invalid_argument(err.to_string()))?;
        let outcome = self
            .users
            .update_one_by_id(id, &patch)
            .await
            .map_err(store_error)?;
        require_hit(outcome, "User not found!")?;
        info!(user_id = %id, fields = ?patch.keys().collect::<Vec<_>>(), "user updated");
        Ok(Message::new("User updated successfully!"))
    }

    pub async fn delete(&self, id: DocId) -> Result<Message, Error> {
        let outcome = self
            .users
            .delete_one_by_id(id)
            .await
            .map_err(store_error)?;
        require_hit(outcome, "User not found!")?;
        info!(user_id = %id, "user deleted");
        Ok(Message::new("User deleted!"))
    }

    /// Fail with `NotFound` unless the account exists.
    pub async fn user_exists(&self, id: DocId) -> Result<(), Error> {
        match self.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(Error::not_found("User not found!")),
        }
    }

    /// Usernames for `ids`, in the same order.
    pub async fn ids_to_usernames(&self, ids: &[DocId]) -> Result<Vec<String>, Error> {
        let mut usernames = Vec::with_capacity(ids.len());
        for id in ids {
            match self.find_by_id(*id).await? {
                Some(record) => usernames.push(record.fields.username),
                None => return Err(Error::not_found("Some users not found!")),
            }
        }
        Ok(usernames)
    }

    async fn ensure_username_free(&self, username: &str) -> Result<(), Error> {
        if self.find_by_username(username).await?.is_some() {
            warn!(username, "username already taken");
            return Err(Error::already_exists(format!(
                "User with username {username} already exists!"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
