//! Correlation identifier shared by every log line, error envelope and
//! response header produced while serving one request.
//!
//! The identifier lives in task-local storage, so services read it with
//! [`TraceId::current`] instead of threading it through their signatures.
//! Work moved onto another task must be wrapped in [`TraceId::scope`] again.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static ACTIVE: TraceId;
}

/// Identifier correlating one request across logs and responses.
///
/// Renders as a lowercase hyphenated UUID.
///
/// # Examples
/// ```
/// use shelfmates::TraceId;
///
/// async fn rate_book() {
///     if let Some(id) = TraceId::current() {
///         tracing::debug!(trace_id = %id, "rating book");
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

/// Raised when an inbound trace identifier is not a canonical UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("trace identifier must be a lowercase hyphenated UUID")]
pub struct TraceIdParseError;

impl TraceId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Adopt an identifier supplied by the caller, or mint a fresh one when
    /// it is absent or malformed.
    ///
    /// # Examples
    /// ```
    /// use shelfmates::TraceId;
    ///
    /// let supplied = "6f1c8a52-3d0e-4b8e-9a57-1f0f3a1c2b4d";
    /// assert_eq!(TraceId::adopt_or_generate(Some(supplied)).to_string(), supplied);
    /// assert_ne!(TraceId::adopt_or_generate(Some("nope")).to_string(), "nope");
    /// ```
    #[must_use]
    pub fn adopt_or_generate(inbound: Option<&str>) -> Self {
        inbound
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_else(Self::generate)
    }

    /// Identifier of the request currently being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        ACTIVE.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` visible through [`TraceId::current`].
    pub async fn scope<Fut>(trace_id: TraceId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        ACTIVE.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for TraceId {
    type Err = TraceIdParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::try_parse(raw).map_err(|_| TraceIdParseError)?;
        if uuid.hyphenated().to_string() != raw {
            return Err(TraceIdParseError);
        }
        Ok(Self(uuid))
    }
}
