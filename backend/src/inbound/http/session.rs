//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations such as persisting or retrieving a user id.
//! Handlers resolve the stored id back to a username through the user
//! service when they need one.

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::domain::{DocId, Error};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id in the session cookie.
    pub fn persist_user(&self, user_id: DocId) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current user id from the session, if present.
    pub fn user_id(&self) -> Result<Option<DocId>, Error> {
        let id = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match id {
            Some(raw) => match DocId::new(raw) {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    tracing::warn!("invalid user id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Require an authenticated user id or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<DocId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("Must be logged in!"))
    }

    /// Reject the request when a user is already logged in.
    pub fn require_logged_out(&self) -> Result<(), Error> {
        match self.user_id()? {
            Some(_) => Err(Error::permission_denied("Must be logged out!")),
            None => Ok(()),
        }
    }

    /// Drop every value held by the session and expire the cookie.
    pub fn end(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
