//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on concept services and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::DocumentStore;
use crate::domain::{
    BookDoc, BookService, FolderDoc, FolderService, InvitationDoc, InvitationService, ProfileDoc,
    ProfileService, RatingDoc, RatingService, RecommendationDoc, RecommendationService, UserDoc,
    UserService,
};
use crate::outbound::persistence::InMemoryDocumentStore;

/// Parameter object bundling one store per concept collection.
#[derive(Clone)]
pub struct HttpStateStores {
    pub users: Arc<dyn DocumentStore<UserDoc>>,
    pub books: Arc<dyn DocumentStore<BookDoc>>,
    pub folders: Arc<dyn DocumentStore<FolderDoc>>,
    pub ratings: Arc<dyn DocumentStore<RatingDoc>>,
    pub invitations: Arc<dyn DocumentStore<InvitationDoc>>,
    pub recommendations: Arc<dyn DocumentStore<RecommendationDoc>>,
    pub profiles: Arc<dyn DocumentStore<ProfileDoc>>,
}

impl HttpStateStores {
    /// Volatile stores sharing one clock.
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self {
            users: Arc::new(InMemoryDocumentStore::new(clock.clone())),
            books: Arc::new(InMemoryDocumentStore::new(clock.clone())),
            folders: Arc::new(InMemoryDocumentStore::new(clock.clone())),
            ratings: Arc::new(InMemoryDocumentStore::new(clock.clone())),
            invitations: Arc::new(InMemoryDocumentStore::new(clock.clone())),
            recommendations: Arc::new(InMemoryDocumentStore::new(clock.clone())),
            profiles: Arc::new(InMemoryDocumentStore::new(clock)),
        }
    }
}

/// Dependency bundle for HTTP handlers.
///
/// Concepts never call each other; handlers compose them.
#[derive(Clone)]
pub struct HttpState {
    pub users: UserService,
    pub books: BookService,
    pub folders: FolderService,
    pub ratings: RatingService,
    pub invitations: InvitationService,
    pub recommendations: RecommendationService,
    pub profiles: ProfileService,
}

impl HttpState {
    /// Construct every concept service over its store.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use shelfmates::inbound::http::state::{HttpState, HttpStateStores};
    ///
    /// let state = HttpState::new(HttpStateStores::in_memory(Arc::new(DefaultClock)));
    /// let _books = state.books.clone();
    /// ```
    pub fn new(stores: HttpStateStores) -> Self {
        let HttpStateStores {
            users,
            books,
            folders,
            ratings,
            invitations,
            recommendations,
            profiles,
        } = stores;
        Self {
            users: UserService::new(users),
            books: BookService::new(books),
            folders: FolderService::new(folders),
            ratings: RatingService::new(ratings),
            invitations: InvitationService::new(invitations),
            recommendations: RecommendationService::new(recommendations),
            profiles: ProfileService::new(profiles),
        }
    }
}
