//! Reading invitations: one user invites others to read a book together.

use serde::{Deserialize, Serialize};

use super::{DocId, Document, MembershipSet, Record};

pub const USER_FROM_FIELD: &str = "userFrom";
pub const USERS_PENDING_FIELD: &str = "usersPending";
pub const USERS_ACCEPTED_FIELD: &str = "usersAccepted";

/// Stored invitation.
///
/// Inviter and book are fixed; only the two participant sets change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationDoc {
    pub user_from: DocId,
    pub book: DocId,
    pub users_pending: MembershipSet,
    pub users_accepted: MembershipSet,
}

impl Document for InvitationDoc {
    const COLLECTION: &'static str = "invitations";
}

/// Selects invitations by participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationQuery {
    /// Invitations still awaiting an answer from the user.
    ReceivedBy(DocId),
    /// Invitations the user sent.
    PostedBy(DocId),
}

/// Acknowledgement returned when an invitation is posted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvitationPosted {
    pub msg: String,
    pub invitation: Record<InvitationDoc>,
}
