//! Invitation API handlers.
//!
//! ```text
//! GET    /api/v1/user/{username}/invitations/received
//! GET    /api/v1/user/{username}/invitations/posted
//! GET    /api/v1/invitations/{id}
//! PATCH  /api/v1/invitations/{id} {"usersPending":[]}
//! DELETE /api/v1/invitations/{id}
//! PATCH  /api/v1/invitations/{id}/accept
//! PATCH  /api/v1/invitations/{id}/decline
//! ```

use actix_web::{delete, get, patch, web};

use crate::domain::{DocId, Error, InvitationDoc, InvitationQuery, Message, Patch, Record};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, InvitationSchema, MessageSchema, PatchSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::resolve_username;
use crate::inbound::http::validation::{FieldName, parse_doc_id};

const INVITATION_ID: FieldName = FieldName::new("id");

fn invitation_id(path: web::Path<String>) -> Result<DocId, Error> {
    parse_doc_id(&path.into_inner(), INVITATION_ID)
}

/// Only the poster may edit or withdraw an invitation.
async fn ensure_poster(state: &HttpState, id: DocId, user: DocId) -> Result<(), Error> {
    let invitation = state.invitations.get_invitation_by_id(id).await?;
    if invitation.fields.user_from != user {
        return Err(Error::permission_denied(
            "Only the poster can change this invitation!",
        ));
    }
    Ok(())
}

/// Invitations still awaiting an answer from `username`.
#[utoipa::path(
    get,
    path = "/api/v1/user/{username}/invitations/received",
    params(("username" = String, Path, description = "Invitee username")),
    responses(
        (status = 200, description = "Pending invitations", body = [InvitationSchema]),
        (status = 404, description = "Unknown username", body = ErrorSchema)
    ),
    tags = ["invitations"],
    operation_id = "listReceivedInvitations",
    security([])
)]
#[get("/user/{username}/invitations/received")]
pub async fn received_invitations(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Record<InvitationDoc>>>> {
    let user = resolve_username(&state, &path).await?;
    let invitations = state
        .invitations
        .get_invitations(InvitationQuery::ReceivedBy(user))
        .await?;
    Ok(web::Json(invitations))
}

/// Invitations sent by `username`.
#[utoipa::path(
    get,
    path = "/api/v1/user/{username}/invitations/posted",
    params(("username" = String, Path, description = "Poster username")),
    responses(
        (status = 200, description = "Posted invitations", body = [InvitationSchema]),
        (status = 404, description = "Unknown username", body = ErrorSchema)
    ),
    tags = ["invitations"],
    operation_id = "listPostedInvitations",
    security([])
)]
#[get("/user/{username}/invitations/posted")]
pub async fn posted_invitations(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Record<InvitationDoc>>>> {
    let user = resolve_username(&state, &path).await?;
    let invitations = state
        .invitations
        .get_invitations(InvitationQuery::PostedBy(user))
        .await?;
    Ok(web::Json(invitations))
}

#[utoipa::path(
    get,
    path = "/api/v1/invitations/{id}",
    params(("id" = String, Path, description = "Invitation id")),
    responses(
        (status = 200, description = "Invitation", body = InvitationSchema),
        (status = 404, description = "Unknown invitation", body = ErrorSchema)
    ),
    tags = ["invitations"],
    operation_id = "getInvitation",
    security([])
)]
#[get("/invitations/{id}")]
pub async fn get_invitation(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Record<InvitationDoc>>> {
    let id = invitation_id(path)?;
    Ok(web::Json(state.invitations.get_invitation_by_id(id).await?))
}

/// Sanitised update of the participant sets.
#[utoipa::path(
    patch,
    path = "/api/v1/invitations/{id}",
    params(("id" = String, Path, description = "Invitation id")),
    request_body = PatchSchema,
    responses(
        (status = 200, description = "Invitation updated", body = MessageSchema),
        (status = 403, description = "Not the poster, or field may not be updated", body = ErrorSchema),
        (status = 404, description = "Unknown invitation", body = ErrorSchema)
    ),
    tags = ["invitations"],
    operation_id = "updateInvitation"
)]
#[patch("/invitations/{id}")]
pub async fn update_invitation(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<Patch>,
) -> ApiResult<web::Json<Message>> {
    let user = session.require_user_id()?;
    let id = invitation_id(path)?;
    ensure_poster(&state, id, user).await?;
    Ok(web::Json(
        state.invitations.update_invitation(id, &payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/invitations/{id}",
    params(("id" = String, Path, description = "Invitation id")),
    responses(
        (status = 200, description = "Invitation deleted", body = MessageSchema),
        (status = 403, description = "Not the poster", body = ErrorSchema),
        (status = 404, description = "Unknown invitation", body = ErrorSchema)
    ),
    tags = ["invitations"],
    operation_id = "deleteInvitation"
)]
#[delete("/invitations/{id}")]
pub async fn delete_invitation(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Message>> {
    let user = session.require_user_id()?;
    let id = invitation_id(path)?;
    ensure_poster(&state, id, user).await?;
    Ok(web::Json(state.invitations.delete_invitation(id).await?))
}

/// Accept an invitation addressed to the session user.
#[utoipa::path(
    patch,
    path = "/api/v1/invitations/{id}/accept",
    params(("id" = String, Path, description = "Invitation id")),
    responses(
        (status = 200, description = "Invitation accepted", body = MessageSchema),
        (status = 403, description = "No pending invitation for this user", body = ErrorSchema),
        (status = 404, description = "Unknown invitation", body = ErrorSchema)
    ),
    tags = ["invitations"],
    operation_id = "acceptInvitation"
)]
#[patch("/invitations/{id}/accept")]
pub async fn accept_invitation(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Message>> {
    let user = session.require_user_id()?;
    let id = invitation_id(path)?;
    Ok(web::Json(
        state.invitations.accept_invitation(id, user).await?,
    ))
}

/// Decline an invitation addressed to the session user.
#[utoipa::path(
    patch,
    path = "/api/v1/invitations/{id}/decline",
    params(("id" = String, Path, description = "Invitation id")),
    responses(
        (status = 200, description = "Invitation declined", body = MessageSchema),
        (status = 403, description = "No pending invitation for this user", body = ErrorSchema),
        (status = 404, description = "Unknown invitation", body = ErrorSchema)
    ),
    tags = ["invitations"],
    operation_id = "declineInvitation"
)]
#[patch("/invitations/{id}/decline")]
pub async fn decline_invitation(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Message>> {
    let user = session.require_user_id()?;
    let id = invitation_id(path)?;
    Ok(web::Json(
        state.invitations.decline_invitation(id, user).await?,
    ))
}

#[cfg(test)]
mod tests;
