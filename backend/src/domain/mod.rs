//! Domain primitives, concept services and ports.
//!
//! Purpose: define the typed document model shared by every concept and the
//! concept services enforcing their invariants above a
//! [`ports::DocumentStore`]. Nothing here knows about HTTP.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - DocId / Record / Document: stored record shape.
//! - Filter / Patch / ReadOptions: store query primitives.
//! - MembershipSet: ordered duplicate-free id sets.
//! - UserService, BookService, FolderService, RatingService,
//!   InvitationService, RecommendationService, ProfileService.

pub mod book;
mod book_service;
pub mod document;
pub mod error;
pub mod invitation;
mod invitation_service;
pub mod item_list;
mod item_list_service;
pub mod membership;
pub mod ports;
pub mod profile;
mod profile_service;
pub mod query;
pub mod recommendation;
mod recommendation_service;
mod store_support;
pub mod trace_id;
pub mod user;
mod user_service;

pub use self::book::{BookCreated, BookDoc};
pub use self::book_service::{BOOK_UPDATABLE_FIELDS, BookService};
pub use self::document::{DocId, DocIdValidationError, Document, Message, Record};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::invitation::{InvitationDoc, InvitationPosted, InvitationQuery};
pub use self::invitation_service::{INVITATION_UPDATABLE_FIELDS, InvitationService};
pub use self::item_list::{
    FolderDoc, Folders, ItemListCreated, ItemListDoc, ListKind, RatingDoc, Ratings,
};
pub use self::item_list_service::{FolderService, ItemListService, RatingService};
pub use self::membership::MembershipSet;
pub use self::profile::{ProfileCreated, ProfileDoc, Shelf, ShelfParseError};
pub use self::profile_service::ProfileService;
pub use self::query::{
    Condition, Filter, Patch, PatchError, Projection, ReadOptions, Sort, SortDirection,
};
pub use self::recommendation::{RecommendationDoc, RecommendationSent};
pub use self::recommendation_service::RecommendationService;
pub use self::store_support::ensure_allowed;
pub use self::trace_id::{TraceId, TraceIdParseError};
pub use self::user::{
    Credentials, CredentialsValidationError, PublicUser, UserCreated, UserDoc, UserPatch,
};
pub use self::user_service::UserService;
