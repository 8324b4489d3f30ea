//! Profile API handlers: display name, reading shelves and friends.
//!
//! ```text
//! GET    /api/v1/user/{username}/profile
//! GET    /api/v1/user/{username}/friends
//! POST   /api/v1/profile {"name":"Ada Lovelace"}
//! PATCH  /api/v1/profile/shelves/{shelf} {"items":["<book id>"]}
//! DELETE /api/v1/profile/shelves/{shelf} {"items":["<book id>"]}
//! POST   /api/v1/profile/friends/{username}
//! DELETE /api/v1/profile/friends/{username}
//! ```
//!
//! `shelf` is one of `reading`, `read` or `to-read`.

use actix_web::{delete, get, patch, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Message, ProfileCreated, ProfileDoc, Record};
use crate::inbound::http::ApiResult;
use crate::inbound::http::item_lists::ItemsRequest;
use crate::inbound::http::schemas::{ErrorSchema, MessageSchema, ProfileSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::resolve_username;
use crate::inbound::http::validation::{FieldName, parse_doc_id_list, parse_shelf};

const ITEMS: FieldName = FieldName::new("items");

/// Body for `POST /api/v1/profile`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateProfileRequest {
    /// Display name shown on the profile.
    pub name: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/user/{username}/profile",
    params(("username" = String, Path, description = "Profile owner")),
    responses(
        (status = 200, description = "Profile", body = ProfileSchema),
        (status = 404, description = "Unknown username or no profile", body = ErrorSchema)
    ),
    tags = ["profiles"],
    operation_id = "getProfile",
    security([])
)]
#[get("/user/{username}/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Record<ProfileDoc>>> {
    let user = resolve_username(&state, &path).await?;
    Ok(web::Json(state.profiles.get_profile(user).await?))
}

/// Usernames of the user's friends.
#[utoipa::path(
    get,
    path = "/api/v1/user/{username}/friends",
    params(("username" = String, Path, description = "Profile owner")),
    responses(
        (status = 200, description = "Friend usernames", body = [String]),
        (status = 404, description = "Unknown username, no profile, or a friend account is gone", body = ErrorSchema)
    ),
    tags = ["profiles"],
    operation_id = "listFriends",
    security([])
)]
#[get("/user/{username}/friends")]
pub async fn list_friends(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<String>>> {
    let user = resolve_username(&state, &path).await?;
    let profile = state.profiles.get_profile(user).await?;
    let names = state
        .users
        .ids_to_usernames(profile.fields.friends.as_slice())
        .await?;
    Ok(web::Json(names))
}

/// Create the session user's profile.
#[utoipa::path(
    post,
    path = "/api/v1/profile",
    request_body = CreateProfileRequest,
    responses(
        (status = 200, description = "Profile created"),
        (status = 400, description = "Blank name", body = ErrorSchema),
        (status = 401, description = "Not logged in", body = ErrorSchema),
        (status = 409, description = "Profile already exists", body = ErrorSchema)
    ),
    tags = ["profiles"],
    operation_id = "createProfile"
)]
#[post("/profile")]
pub async fn create_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateProfileRequest>,
) -> ApiResult<web::Json<ProfileCreated>> {
    let user = session.require_user_id()?;
    state.users.user_exists(user).await?;
    Ok(web::Json(
        state.profiles.create_profile(user, &payload.name).await?,
    ))
}

/// Put books on one of the session user's shelves.
#[utoipa::path(
    patch,
    path = "/api/v1/profile/shelves/{shelf}",
    params(("shelf" = String, Path, description = "reading, read or to-read")),
    request_body = ItemsRequest,
    responses(
        (status = 200, description = "Books shelved", body = MessageSchema),
        (status = 400, description = "Unknown shelf or malformed id", body = ErrorSchema),
        (status = 404, description = "No profile", body = ErrorSchema)
    ),
    tags = ["profiles"],
    operation_id = "addToShelf"
)]
#[patch("/profile/shelves/{shelf}")]
pub async fn add_to_shelf(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ItemsRequest>,
) -> ApiResult<web::Json<Message>> {
    let user = session.require_user_id()?;
    let shelf = parse_shelf(&path)?;
    let books = parse_doc_id_list(&payload.items, ITEMS)?;
    Ok(web::Json(
        state.profiles.add_to_shelf(user, shelf, &books).await?,
    ))
}

/// Take books off one of the session user's shelves.
#[utoipa::path(
    delete,
    path = "/api/v1/profile/shelves/{shelf}",
    params(("shelf" = String, Path, description = "reading, read or to-read")),
    request_body = ItemsRequest,
    responses(
        (status = 200, description = "Books removed", body = MessageSchema),
        (status = 400, description = "Unknown shelf or malformed id", body = ErrorSchema),
        (status = 404, description = "No profile", body = ErrorSchema)
    ),
    tags = ["profiles"],
    operation_id = "removeFromShelf"
)]
#[delete("/profile/shelves/{shelf}")]
pub async fn remove_from_shelf(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ItemsRequest>,
) -> ApiResult<web::Json<Message>> {
    let user = session.require_user_id()?;
    let shelf = parse_shelf(&path)?;
    let books = parse_doc_id_list(&payload.items, ITEMS)?;
    Ok(web::Json(
        state.profiles.remove_from_shelf(user, shelf, &books).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/profile/friends/{username}",
    params(("username" = String, Path, description = "Friend to add")),
    responses(
        (status = 200, description = "Friend added", body = MessageSchema),
        (status = 400, description = "Befriending yourself", body = ErrorSchema),
        (status = 404, description = "Unknown username or no profile", body = ErrorSchema)
    ),
    tags = ["profiles"],
    operation_id = "addFriend"
)]
#[post("/profile/friends/{username}")]
pub async fn add_friend(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Message>> {
    let user = session.require_user_id()?;
    let friend = resolve_username(&state, &path).await?;
    Ok(web::Json(state.profiles.add_friend(user, friend).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/profile/friends/{username}",
    params(("username" = String, Path, description = "Friend to remove")),
    responses(
        (status = 200, description = "Friend removed", body = MessageSchema),
        (status = 404, description = "Unknown username or no profile", body = ErrorSchema)
    ),
    tags = ["profiles"],
    operation_id = "removeFriend"
)]
#[delete("/profile/friends/{username}")]
pub async fn remove_friend(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Message>> {
    let user = session.require_user_id()?;
    let friend = resolve_username(&state, &path).await?;
    Ok(web::Json(state.profiles.remove_friend(user, friend).await?))
}
