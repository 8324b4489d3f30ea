//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror the JSON shape of the corresponding domain values and
//! are registered with utoipa under the domain type's name.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// Required input is empty or malformed.
    #[schema(rename = "invalid_argument")]
    InvalidArgument,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The mutation is not allowed for this caller or field.
    #[schema(rename = "permission_denied")]
    PermissionDenied,
    /// The target record does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// A uniqueness rule would be violated.
    #[schema(rename = "already_exists")]
    AlreadyExists,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[serde(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Book not found!")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details such as the offending field.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Message`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Message)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct MessageSchema {
    #[schema(example = "Rating added!")]
    msg: String,
}

/// OpenAPI schema for [`crate::domain::PublicUser`].
///
/// Credentials are stripped before a user leaves the service.
#[derive(ToSchema)]
#[schema(as = crate::domain::PublicUser)]
#[serde(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PublicUserSchema {
    #[serde(rename = "_id")]
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    #[schema(example = "ada")]
    username: String,
    profile_picture_url: Option<String>,
    date_created: DateTime<Utc>,
    date_updated: DateTime<Utc>,
}

/// OpenAPI schema for a stored book record.
#[derive(ToSchema)]
#[schema(as = crate::domain::Book)]
#[serde(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct BookSchema {
    #[serde(rename = "_id")]
    id: String,
    date_created: DateTime<Utc>,
    date_updated: DateTime<Utc>,
    #[schema(example = "Dune")]
    title: String,
    #[schema(example = "Frank Herbert")]
    author: String,
    description: String,
    number_of_reviews: u32,
    #[schema(example = 4.5)]
    avg_rating: f64,
}

/// OpenAPI schema for a stored invitation record.
#[derive(ToSchema)]
#[schema(as = crate::domain::Invitation)]
#[serde(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct InvitationSchema {
    #[serde(rename = "_id")]
    id: String,
    date_created: DateTime<Utc>,
    date_updated: DateTime<Utc>,
    user_from: String,
    book: String,
    users_pending: Vec<String>,
    users_accepted: Vec<String>,
}

/// OpenAPI schema for a stored recommendation record.
#[derive(ToSchema)]
#[schema(as = crate::domain::Recommendation)]
#[serde(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct RecommendationSchema {
    #[serde(rename = "_id")]
    id: String,
    date_created: DateTime<Utc>,
    date_updated: DateTime<Utc>,
    user_from: String,
    user_to: String,
    book: String,
}

/// OpenAPI schema for a stored profile record.
#[derive(ToSchema)]
#[schema(as = crate::domain::Profile)]
#[serde(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ProfileSchema {
    #[serde(rename = "_id")]
    id: String,
    date_created: DateTime<Utc>,
    date_updated: DateTime<Utc>,
    user: String,
    #[schema(example = "Ada Lovelace")]
    name: String,
    friends: Vec<String>,
    books_reading: Vec<String>,
    books_read: Vec<String>,
    books_to_read: Vec<String>,
}

/// OpenAPI schema for [`crate::domain::Patch`]: field name to new value.
#[derive(ToSchema)]
#[schema(as = crate::domain::Patch)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PatchSchema(HashMap<String, serde_json::Value>);
