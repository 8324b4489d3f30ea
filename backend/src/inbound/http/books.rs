//! Book catalogue API handlers.
//!
//! ```text
//! GET    /api/v1/books?title=Dune
//! POST   /api/v1/books {"title":"Dune","author":"Frank Herbert","description":""}
//! GET    /api/v1/books/{id}
//! PATCH  /api/v1/books/{id} {"avgRating":4.5}
//! DELETE /api/v1/books/{id}
//! POST   /api/v1/books/{id}/rating {"score":4}
//! POST   /api/v1/books/{id} {"usernameTo":"grace"}
//! POST   /api/v1/books/{id}/invitation {"invitees":["grace"]}
//! ```
//!
//! Recommendation and invitation posting live under the book they refer to;
//! the sender is always the session user.

use actix_web::{delete, get, patch, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    BookCreated, BookDoc, DocId, Error, InvitationPosted, Message, Patch, Record,
    RecommendationSent,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{BookSchema, ErrorSchema, MessageSchema, PatchSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::resolve_username;
use crate::inbound::http::validation::{FieldName, parse_doc_id};

const BOOK_ID: FieldName = FieldName::new("id");

/// Body for `POST /api/v1/books`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: String,
}

/// Body for `POST /api/v1/books/{id}/rating`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RatingRequest {
    /// Review score between 0 and 5.
    #[schema(example = 4.0)]
    pub score: f64,
}

/// Body for `POST /api/v1/books/{id}`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    /// Username of the recipient.
    pub username_to: String,
}

/// Body for `POST /api/v1/books/{id}/invitation`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct InvitationRequest {
    /// Usernames invited to read the book together.
    #[serde(default)]
    pub invitees: Vec<String>,
}

/// Query string for `GET /api/v1/books`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct BooksQuery {
    /// Restrict the listing to this exact title.
    pub title: Option<String>,
}

fn book_id(path: web::Path<String>) -> Result<DocId, Error> {
    parse_doc_id(&path.into_inner(), BOOK_ID)
}

/// List books, optionally filtered by title.
#[utoipa::path(
    get,
    path = "/api/v1/books",
    params(BooksQuery),
    responses(
        (status = 200, description = "Books, most recently updated first", body = [BookSchema])
    ),
    tags = ["books"],
    operation_id = "listBooks",
    security([])
)]
#[get("/books")]
pub async fn list_books(
    state: web::Data<HttpState>,
    query: web::Query<BooksQuery>,
) -> ApiResult<web::Json<Vec<Record<BookDoc>>>> {
    Ok(web::Json(state.books.get_books(query.title.as_deref()).await?))
}

/// Add a book to the catalogue.
#[utoipa::path(
    post,
    path = "/api/v1/books",
    request_body = CreateBookRequest,
    responses(
        (status = 200, description = "Book created"),
        (status = 400, description = "Blank title or author", body = ErrorSchema),
        (status = 401, description = "Not logged in", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "createBook"
)]
#[post("/books")]
pub async fn create_book(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateBookRequest>,
) -> ApiResult<web::Json<BookCreated>> {
    session.require_user_id()?;
    let CreateBookRequest {
        title,
        author,
        description,
    } = payload.into_inner();
    Ok(web::Json(
        state.books.create(&title, &author, &description).await?,
    ))
}

/// Fetch one book.
#[utoipa::path(
    get,
    path = "/api/v1/books/{id}",
    params(("id" = String, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book", body = BookSchema),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Unknown book", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "getBook",
    security([])
)]
#[get("/books/{id}")]
pub async fn get_book(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Record<BookDoc>>> {
    let id = book_id(path)?;
    Ok(web::Json(state.books.get_book_by_id(id).await?))
}

/// Apply a sanitised update. Only `avgRating` may be written.
#[utoipa::path(
    patch,
    path = "/api/v1/books/{id}",
    params(("id" = String, Path, description = "Book id")),
    request_body = PatchSchema,
    responses(
        (status = 200, description = "Book updated", body = MessageSchema),
        (status = 403, description = "Field may not be updated", body = ErrorSchema),
        (status = 404, description = "Unknown book", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "updateBook"
)]
#[patch("/books/{id}")]
pub async fn update_book(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<Patch>,
) -> ApiResult<web::Json<Message>> {
    session.require_user_id()?;
    let id = book_id(path)?;
    Ok(web::Json(state.books.update_info(id, &payload).await?))
}

/// Remove a book from the catalogue.
#[utoipa::path(
    delete,
    path = "/api/v1/books/{id}",
    params(("id" = String, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book deleted", body = MessageSchema),
        (status = 404, description = "Unknown book", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "deleteBook"
)]
#[delete("/books/{id}")]
pub async fn delete_book(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Message>> {
    session.require_user_id()?;
    let id = book_id(path)?;
    Ok(web::Json(state.books.delete(id).await?))
}

/// Record a review score for a book.
#[utoipa::path(
    post,
    path = "/api/v1/books/{id}/rating",
    params(("id" = String, Path, description = "Book id")),
    request_body = RatingRequest,
    responses(
        (status = 200, description = "Rating added", body = MessageSchema),
        (status = 400, description = "Score out of range", body = ErrorSchema),
        (status = 404, description = "Unknown book", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "rateBook"
)]
#[post("/books/{id}/rating")]
pub async fn rate_book(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RatingRequest>,
) -> ApiResult<web::Json<Message>> {
    session.require_user_id()?;
    let id = book_id(path)?;
    Ok(web::Json(state.books.add_rating(id, payload.score).await?))
}

/// Recommend a book to another user.
#[utoipa::path(
    post,
    path = "/api/v1/books/{id}",
    params(("id" = String, Path, description = "Book id")),
    request_body = RecommendationRequest,
    responses(
        (status = 200, description = "Recommendation sent"),
        (status = 400, description = "Recommending to yourself", body = ErrorSchema),
        (status = 401, description = "Not logged in", body = ErrorSchema),
        (status = 404, description = "Unknown book or recipient", body = ErrorSchema)
    ),
    tags = ["recommendations"],
    operation_id = "sendRecommendation"
)]
#[post("/books/{id}")]
pub async fn send_recommendation(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RecommendationRequest>,
) -> ApiResult<web::Json<RecommendationSent>> {
    let user_from = session.require_user_id()?;
    let book = state.books.get_book_by_id(book_id(path)?).await?.id;
    let user_to = resolve_username(&state, &payload.username_to).await?;
    Ok(web::Json(
        state
            .recommendations
            .send_rec(user_from, user_to, book)
            .await?,
    ))
}

/// Invite users to read a book together.
#[utoipa::path(
    post,
    path = "/api/v1/books/{id}/invitation",
    params(("id" = String, Path, description = "Book id")),
    request_body = InvitationRequest,
    responses(
        (status = 200, description = "Invitation posted"),
        (status = 400, description = "Inviting yourself", body = ErrorSchema),
        (status = 401, description = "Not logged in", body = ErrorSchema),
        (status = 404, description = "Unknown book or invitee", body = ErrorSchema)
    ),
    tags = ["invitations"],
    operation_id = "postInvitation"
)]
#[post("/books/{id}/invitation")]
pub async fn post_invitation(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<InvitationRequest>,
) -> ApiResult<web::Json<InvitationPosted>> {
    let user_from = session.require_user_id()?;
    let book = state.books.get_book_by_id(book_id(path)?).await?.id;
    let mut invitees = Vec::with_capacity(payload.invitees.len());
    for username in &payload.invitees {
        invitees.push(resolve_username(&state, username).await?);
    }
    Ok(web::Json(
        state
            .invitations
            .post_invitation(user_from, book, &invitees)
            .await?,
    ))
}
