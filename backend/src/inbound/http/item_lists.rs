//! Folder and rating-list API handlers.
//!
//! ```text
//! GET    /api/v1/user/{username}/folders
//! GET    /api/v1/user/{username}/folders/{name}
//! POST   /api/v1/user/{username}/folders/{name}
//! PATCH  /api/v1/user/{username}/folders/{name} {"items":["<book id>"]}
//! DELETE /api/v1/user/{username}/folders/{name}
//! DELETE /api/v1/user/{username}/folders/{name}/items {"items":["<book id>"]}
//! ```
//!
//! The same handlers serve `/ratings` for rating lists; the list kind is a
//! type parameter resolved in the route table. Reads are public, mutations
//! require the session user to own the list.

use actix_web::web;
use serde::{Deserialize, Serialize};

use crate::domain::{
    DocId, Error, Folders, ItemListCreated, ItemListDoc, ItemListService, ListKind,
    MembershipSet, Message, Ratings, Record,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::resolve_username;
use crate::inbound::http::validation::{FieldName, parse_doc_id_list};

const ITEMS: FieldName = FieldName::new("items");

/// Selects the concept service backing a list kind.
pub trait ListRoute: ListKind {
    fn service(state: &HttpState) -> &ItemListService<Self>;
}

impl ListRoute for Folders {
    fn service(state: &HttpState) -> &ItemListService<Self> {
        &state.folders
    }
}

impl ListRoute for Ratings {
    fn service(state: &HttpState) -> &ItemListService<Self> {
        &state.ratings
    }
}

/// Body for item mutations.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ItemsRequest {
    /// Ids of the items to add or remove.
    #[serde(default)]
    pub items: Vec<String>,
}

/// Path segments naming one list.
#[derive(Debug, Deserialize)]
pub struct ListPath {
    pub username: String,
    pub name: String,
}

async fn owner_of(
    state: &HttpState,
    session: &SessionContext,
    username: &str,
) -> Result<DocId, Error> {
    let user = session.require_user_id()?;
    let owner = resolve_username(state, username).await?;
    if owner != user {
        return Err(Error::permission_denied("Cannot modify another user's lists!"));
    }
    Ok(owner)
}

/// Every list owned by `username`.
pub async fn get_lists<K: ListRoute>(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Record<ItemListDoc<K>>>>> {
    let owner = resolve_username(&state, &path).await?;
    Ok(web::Json(K::service(&state).get_folders(owner).await?))
}

/// Items of one list; an unknown list name yields an empty array.
pub async fn get_list_contents<K: ListRoute>(
    state: web::Data<HttpState>,
    path: web::Path<ListPath>,
) -> ApiResult<web::Json<MembershipSet>> {
    let owner = resolve_username(&state, &path.username).await?;
    let items = K::service(&state)
        .get_user_folder_contents(owner, &path.name)
        .await?;
    Ok(web::Json(items))
}

pub async fn create_list<K: ListRoute>(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ListPath>,
) -> ApiResult<web::Json<ItemListCreated<K>>> {
    let owner = owner_of(&state, &session, &path.username).await?;
    let created = K::service(&state).add_new_folder(owner, &path.name).await?;
    Ok(web::Json(created))
}

pub async fn add_items<K: ListRoute>(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ListPath>,
    payload: web::Json<ItemsRequest>,
) -> ApiResult<web::Json<Message>> {
    let owner = owner_of(&state, &session, &path.username).await?;
    let items = parse_doc_id_list(&payload.items, ITEMS)?;
    let message = K::service(&state)
        .add_to_folder(owner, &path.name, &items)
        .await?;
    Ok(web::Json(message))
}

pub async fn remove_items<K: ListRoute>(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ListPath>,
    payload: web::Json<ItemsRequest>,
) -> ApiResult<web::Json<Message>> {
    let owner = owner_of(&state, &session, &path.username).await?;
    let items = parse_doc_id_list(&payload.items, ITEMS)?;
    let message = K::service(&state)
        .remove_from_folder(owner, &path.name, &items)
        .await?;
    Ok(web::Json(message))
}

pub async fn delete_list<K: ListRoute>(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ListPath>,
) -> ApiResult<web::Json<Message>> {
    let owner = owner_of(&state, &session, &path.username).await?;
    let message = K::service(&state).delete_folder(owner, &path.name).await?;
    Ok(web::Json(message))
}
