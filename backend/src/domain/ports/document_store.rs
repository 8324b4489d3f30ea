//! Port abstraction for typed document collections and their errors.
//!
//! A store owns exactly one collection of [`Document`]s. It assigns
//! identifiers and maintains `dateCreated`/`dateUpdated`; callers only ever
//! supply document fields, filters and patches.

use async_trait::async_trait;

use crate::domain::{DocId, Document, Filter, Patch, PatchError, ReadOptions, Record};

use super::define_port_error;

define_port_error! {
    /// Errors raised by document store adapters.
    pub enum DocumentStoreError {
        /// Backing storage could not be reached.
        Connection { message: String } => "document store connection failed: {message}",
        /// Read or write failed during execution.
        Query { message: String } => "document store query failed: {message}",
        /// A record could not be converted to or from its stored form.
        Serialization { message: String } => "document store serialization failed: {message}",
        /// A patch was rejected before anything was written.
        InvalidPatch { reason: PatchError } => "invalid patch: {reason}",
    }
}

impl From<PatchError> for DocumentStoreError {
    fn from(value: PatchError) -> Self {
        Self::invalid_patch(value)
    }
}

impl From<serde_json::Error> for DocumentStoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::serialization(value.to_string())
    }
}

/// Result of an update or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOutcome {
    /// Number of records the filter selected (zero or one).
    pub matched: u64,
}

impl WriteOutcome {
    /// Outcome for a filter that selected nothing.
    pub const MISSED: Self = Self { matched: 0 };
    /// Outcome for a filter that selected one record.
    pub const HIT: Self = Self { matched: 1 };

    /// Whether a record was affected.
    pub fn is_hit(&self) -> bool {
        self.matched > 0
    }
}

/// Typed document collection.
///
/// `update_one` and `delete_one` act on the first record `read_many` would
/// return for the same filter under default options, that is the most
/// recently updated match.
#[async_trait]
pub trait DocumentStore<D: Document>: Send + Sync {
    /// Insert `fields` as a new record and return its identifier.
    async fn create_one(&self, fields: D) -> Result<DocId, DocumentStoreError>;

    /// First record matching `filter` under default ordering.
    async fn read_one(&self, filter: &Filter) -> Result<Option<Record<D>>, DocumentStoreError>;

    /// Record with the given identifier.
    async fn read_one_by_id(&self, id: DocId) -> Result<Option<Record<D>>, DocumentStoreError> {
        self.read_one(&Filter::by_id(id)).await
    }

    /// Every record matching `filter`, ordered per `options`.
    async fn read_many(
        &self,
        filter: &Filter,
        options: &ReadOptions,
    ) -> Result<Vec<Record<D>>, DocumentStoreError>;

    /// Merge `patch` onto the first match and refresh `dateUpdated`.
    ///
    /// Reserved, unknown and ill-typed keys fail with
    /// [`DocumentStoreError::InvalidPatch`] and nothing is written.
    async fn update_one(
        &self,
        filter: &Filter,
        patch: &Patch,
    ) -> Result<WriteOutcome, DocumentStoreError>;

    /// [`DocumentStore::update_one`] addressed by identifier.
    async fn update_one_by_id(
        &self,
        id: DocId,
        patch: &Patch,
    ) -> Result<WriteOutcome, DocumentStoreError> {
        self.update_one(&Filter::by_id(id), patch).await
    }

    /// Remove the first match.
    async fn delete_one(&self, filter: &Filter) -> Result<WriteOutcome, DocumentStoreError>;

    /// [`DocumentStore::delete_one`] addressed by identifier.
    async fn delete_one_by_id(&self, id: DocId) -> Result<WriteOutcome, DocumentStoreError> {
        self.delete_one(&Filter::by_id(id)).await
    }
}
