//! Invitation concept: posting, answering and sanitised updates.

use std::sync::Arc;

use tracing::{info, warn};

use super::invitation::{USER_FROM_FIELD, USERS_ACCEPTED_FIELD, USERS_PENDING_FIELD};
use super::ports::{DocumentStore, DocumentStoreError};
use super::store_support::{map_store_error, require_hit};
use super::{
    DocId, Document, Error, Filter, InvitationDoc, InvitationPosted, InvitationQuery,
    MembershipSet, Message, Patch, ReadOptions, Record, ensure_allowed,
};

/// Fields callers may change through [`InvitationService::update_invitation`].
pub const INVITATION_UPDATABLE_FIELDS: [&str; 2] = [USERS_PENDING_FIELD, USERS_ACCEPTED_FIELD];

fn store_error(err: DocumentStoreError) -> Error {
    map_store_error(InvitationDoc::COLLECTION, err)
}

fn not_found() -> Error {
    Error::not_found("Invitation not found!")
}

/// Service owning the `invitations` collection.
#[derive(Clone)]
pub struct InvitationService {
    invitations: Arc<dyn DocumentStore<InvitationDoc>>,
}

impl InvitationService {
    pub fn new(invitations: Arc<dyn DocumentStore<InvitationDoc>>) -> Self {
        Self { invitations }
    }

    /// Invite `invitees` to read `book` with `user_from`.
    pub async fn post_invitation(
        &self,
        user_from: DocId,
        book: DocId,
        invitees: &[DocId],
    ) -> Result<InvitationPosted, Error> {
        if invitees.contains(&user_from) {
            return Err(Error::invalid_argument("Cannot invite yourself!"));
        }
        let id = self
            .invitations
            .create_one(InvitationDoc {
                user_from,
                book,
                users_pending: MembershipSet::from_ids(invitees.iter().copied()),
                users_accepted: MembershipSet::new(),
            })
            .await
            .map_err(store_error)?;
        info!(invitation_id = %id, %user_from, %book, invitees = invitees.len(), "invitation posted");
        Ok(InvitationPosted {
            msg: "Invitation successfully posted!".to_owned(),
            invitation: self.get_invitation_by_id(id).await?,
        })
    }

    /// Invitations matching `query`, most recently updated first.
    pub async fn get_invitations(
        &self,
        query: InvitationQuery,
    ) -> Result<Vec<Record<InvitationDoc>>, Error> {
        let filter = match query {
            InvitationQuery::ReceivedBy(user) => Filter::all().contains(USERS_PENDING_FIELD, user),
            InvitationQuery::PostedBy(user) => Filter::all().eq(USER_FROM_FIELD, user),
        };
        self.invitations
            .read_many(&filter, &ReadOptions::default())
            .await
            .map_err(store_error)
    }

    pub async fn get_invitation_by_id(&self, id: DocId) -> Result<Record<InvitationDoc>, Error> {
        self.invitations
            .read_one_by_id(id)
            .await
            .map_err(store_error)?
            .ok_or_else(not_found)
    }

    /// Move `user` from pending to accepted.
    pub async fn accept_invitation(&self, id: DocId, user: DocId) -> Result<Message, Error> {
        let invitation = self.pending_for(id, user).await?;
        let patch = Patch::new()
            .set(
                USERS_PENDING_FIELD,
                invitation.users_pending.without_all([user]),
            )
            .set(
                USERS_ACCEPTED_FIELD,
                invitation.users_accepted.with_all([user]),
            );
        self.write(id, &patch).await?;
        info!(invitation_id = %id, %user, "invitation accepted");
        Ok(Message::new("Invitation accepted!"))
    }

    /// Drop `user` from the pending set.
    pub async fn decline_invitation(&self, id: DocId, user: DocId) -> Result<Message, Error> {
        let invitation = self.pending_for(id, user).await?;
        let patch = Patch::new().set(
            USERS_PENDING_FIELD,
            invitation.users_pending.without_all([user]),
        );
        self.write(id, &patch).await?;
        info!(invitation_id = %id, %user, "invitation declined");
        Ok(Message::new("Invitation declined!"))
    }

    /// Apply a caller-supplied patch; only the participant sets may change.
    pub async fn update_invitation(&self, id: DocId, update: &Patch) -> Result<Message, Error> {
        if let Err(err) = ensure_allowed(update, &INVITATION_UPDATABLE_FIELDS) {
            warn!(invitation_id = %id, reason = err.message(), "invitation update rejected");
            return Err(err);
        }
        self.write(id, update).await?;
        info!(invitation_id = %id, "invitation updated");
        Ok(Message::new("Invitation successfully updated!"))
    }

    pub async fn delete_invitation(&self, id: DocId) -> Result<Message, Error> {
        let outcome = self
            .invitations
            .delete_one_by_id(id)
            .await
            .map_err(store_error)?;
        require_hit(outcome, "Invitation not found!")?;
        info!(invitation_id = %id, "invitation deleted");
        Ok(Message::new("Invitation deleted!"))
    }

    async fn pending_for(&self, id: DocId, user: DocId) -> Result<InvitationDoc, Error> {
        let invitation = self.get_invitation_by_id(id).await?.fields;
        if !invitation.users_pending.contains(&user) {
            warn!(invitation_id = %id, %user, "user has no pending invitation");
            return Err(Error::permission_denied(
                "User has no pending invitation to answer!",
            ));
        }
        Ok(invitation)
    }

    async fn write(&self, id: DocId, patch: &Patch) -> Result<(), Error> {
        let outcome = self
            .invitations
            .update_one_by_id(id, patch)
            .await
            .map_err(store_error)?;
        require_hit(outcome, "Invitation not found!")
    }
}

#[cfg(test)]
#[path = "invitation_service_tests.rs"]
mod tests;
