//! Users and session API handlers.
//!
//! ```text
//! GET    /api/v1/session
//! GET    /api/v1/users?username=ada
//! GET    /api/v1/users/{username}
//! POST   /api/v1/users {"username":"ada","password":"pw"}
//! PATCH  /api/v1/users {"profilePictureUrl":"https://example.org/ada.png"}
//! DELETE /api/v1/users
//! POST   /api/v1/login {"username":"ada","password":"pw"}
//! POST   /api/v1/logout
//! ```

use actix_web::{delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::domain::{
    Credentials, CredentialsValidationError, DocId, Error, Message, PublicUser, UserCreated,
    UserPatch,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, MessageSchema, PublicUserSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Credentials body for `POST /api/v1/users` and `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<&CredentialsRequest> for Credentials {
    type Error = CredentialsValidationError;

    fn try_from(value: &CredentialsRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

fn map_credentials_error(err: CredentialsValidationError) -> Error {
    match err {
        CredentialsValidationError::Empty => Error::invalid_argument(err.to_string())
            .with_details(json!({ "code": "empty_credentials" })),
    }
}

/// Body for `PATCH /api/v1/users`. Absent fields stay unchanged.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub profile_picture_url: Option<String>,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(value: UpdateUserRequest) -> Self {
        Self {
            username: value.username,
            password: value.password,
            profile_picture_url: value.profile_picture_url,
        }
    }
}

/// Query string for `GET /api/v1/users`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct UsersQuery {
    /// Restrict the listing to this exact username.
    pub username: Option<String>,
}

/// Resolve a username from a path or body to its account id.
pub(crate) async fn resolve_username(state: &HttpState, username: &str) -> Result<DocId, Error> {
    Ok(state.users.get_user_by_username(username).await?.id)
}

/// Return the user bound to the current session.
#[utoipa::path(
    get,
    path = "/api/v1/session",
    responses(
        (status = 200, description = "Session user", body = PublicUserSchema),
        (status = 401, description = "Not logged in", body = ErrorSchema),
        (status = 404, description = "Session user no longer exists", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getSessionUser"
)]
#[get("/session")]
pub async fn session_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<PublicUser>> {
    let user = session.require_user_id()?;
    Ok(web::Json(state.users.get_user_by_id(user).await?))
}

/// List users, optionally filtered by username.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(UsersQuery),
    responses(
        (status = 200, description = "Users", body = [PublicUserSchema]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security([])
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    query: web::Query<UsersQuery>,
) -> ApiResult<web::Json<Vec<PublicUser>>> {
    let users = state.users.get_users(query.username.as_deref()).await?;
    Ok(web::Json(users))
}

/// Fetch one user by username.
#[utoipa::path(
    get,
    path = "/api/v1/users/{username}",
    params(("username" = String, Path, description = "Exact username")),
    responses(
        (status = 200, description = "User", body = PublicUserSchema),
        (status = 404, description = "Unknown username", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security([])
)]
#[get("/users/{username}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PublicUser>> {
    let username = path.into_inner();
    Ok(web::Json(state.users.get_user_by_username(&username).await?))
}

/// Register a new account. Only available while logged out.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "User created"),
        (status = 400, description = "Blank username or password", body = ErrorSchema),
        (status = 403, description = "Already logged in", body = ErrorSchema),
        (status = 409, description = "Username taken", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser",
    security([])
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<UserCreated>> {
    session.require_logged_out()?;
    let credentials = Credentials::try_from(&*payload).map_err(map_credentials_error)?;
    let created = state
        .users
        .create(credentials.username(), credentials.password())
        .await?;
    Ok(web::Json(created))
}

/// Update the session user's account.
#[utoipa::path(
    patch,
    path = "/api/v1/users",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = MessageSchema),
        (status = 400, description = "Blank username or password", body = ErrorSchema),
        (status = 401, description = "Not logged in", body = ErrorSchema),
        (status = 409, description = "Username taken", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/users")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<Message>> {
    let user = session.require_user_id()?;
    let patch = UserPatch::from(payload.into_inner());
    Ok(web::Json(state.users.update(user, &patch).await?))
}

/// Delete the session user's account and end the session.
#[utoipa::path(
    delete,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "User deleted", body = MessageSchema),
        (status = 401, description = "Not logged in", body = ErrorSchema),
        (status = 404, description = "Session user no longer exists", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Message>> {
    let user = session.require_user_id()?;
    session.end();
    Ok(web::Json(state.users.delete(user).await?))
}

/// Authenticate and bind the user to the session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login success", body = MessageSchema,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Blank username or password", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<Message>> {
    let credentials = Credentials::try_from(&*payload).map_err(map_credentials_error)?;
    let user = state
        .users
        .authenticate(credentials.username(), credentials.password())
        .await?;
    session.persist_user(user.id)?;
    info!(user_id = %user.id, "session started");
    Ok(web::Json(Message::new("Logged in!")))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 200, description = "Logged out", body = MessageSchema)),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<web::Json<Message>> {
    session.end();
    Ok(web::Json(Message::new("Logged out!")))
}

#[cfg(test)]
mod tests;
