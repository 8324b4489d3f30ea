//! Recommendation API handlers.
//!
//! ```text
//! GET    /api/v1/user/{username}/recommendations
//! GET    /api/v1/user/{username}/recommendations/sent
//! GET    /api/v1/recommendations/{id}
//! DELETE /api/v1/recommendations/{id}
//! ```
//!
//! Sending lives under `POST /api/v1/books/{id}`.

use actix_web::{delete, get, web};

use crate::domain::{Error, Message, RecommendationDoc, Record};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, MessageSchema, RecommendationSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::resolve_username;
use crate::inbound::http::validation::{FieldName, parse_doc_id};

const REC_ID: FieldName = FieldName::new("id");

/// Recommendations received by `username`.
#[utoipa::path(
    get,
    path = "/api/v1/user/{username}/recommendations",
    params(("username" = String, Path, description = "Recipient username")),
    responses(
        (status = 200, description = "Received recommendations", body = [RecommendationSchema]),
        (status = 404, description = "Unknown username", body = ErrorSchema)
    ),
    tags = ["recommendations"],
    operation_id = "listRecommendations",
    security([])
)]
#[get("/user/{username}/recommendations")]
pub async fn received_recommendations(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Record<RecommendationDoc>>>> {
    let user = resolve_username(&state, &path).await?;
    Ok(web::Json(state.recommendations.get_user_recs(user).await?))
}

/// Recommendations sent by `username`.
#[utoipa::path(
    get,
    path = "/api/v1/user/{username}/recommendations/sent",
    params(("username" = String, Path, description = "Sender username")),
    responses(
        (status = 200, description = "Sent recommendations", body = [RecommendationSchema]),
        (status = 404, description = "Unknown username", body = ErrorSchema)
    ),
    tags = ["recommendations"],
    operation_id = "listSentRecommendations",
    security([])
)]
#[get("/user/{username}/recommendations/sent")]
pub async fn sent_recommendations(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Record<RecommendationDoc>>>> {
    let user = resolve_username(&state, &path).await?;
    Ok(web::Json(state.recommendations.get_recs_sent(user).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/recommendations/{id}",
    params(("id" = String, Path, description = "Recommendation id")),
    responses(
        (status = 200, description = "Recommendation", body = RecommendationSchema),
        (status = 404, description = "Unknown recommendation", body = ErrorSchema)
    ),
    tags = ["recommendations"],
    operation_id = "getRecommendation",
    security([])
)]
#[get("/recommendations/{id}")]
pub async fn get_recommendation(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Record<RecommendationDoc>>> {
    let id = parse_doc_id(&path, REC_ID)?;
    Ok(web::Json(state.recommendations.get_rec_by_id(id).await?))
}

/// Withdraw or dismiss a recommendation. Either participant may delete it.
#[utoipa::path(
    delete,
    path = "/api/v1/recommendations/{id}",
    params(("id" = String, Path, description = "Recommendation id")),
    responses(
        (status = 200, description = "Recommendation deleted", body = MessageSchema),
        (status = 403, description = "Not a participant", body = ErrorSchema),
        (status = 404, description = "Unknown recommendation", body = ErrorSchema)
    ),
    tags = ["recommendations"],
    operation_id = "deleteRecommendation"
)]
#[delete("/recommendations/{id}")]
pub async fn delete_recommendation(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Message>> {
    let user = session.require_user_id()?;
    let id = parse_doc_id(&path, REC_ID)?;
    let rec = state.recommendations.get_rec_by_id(id).await?.fields;
    if rec.user_from != user && rec.user_to != user {
        return Err(Error::permission_denied(
            "Only the sender or recipient can delete this recommendation!",
        ));
    }
    Ok(web::Json(state.recommendations.delete_rec(id).await?))
}
