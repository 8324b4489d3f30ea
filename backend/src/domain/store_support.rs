//! Helpers shared by the concept services for talking to document stores.

use serde_json::json;
use tracing::error;

use super::ports::{DocumentStoreError, WriteOutcome};
use super::{Error, Patch, PatchError};

/// Translate a store failure into a domain error.
///
/// Patch rejections are the caller's fault and surface as
/// [`crate::domain::ErrorCode::InvalidArgument`]; everything else is logged
/// and reported as an internal error.
pub(crate) fn map_store_error(collection: &'static str, err: DocumentStoreError) -> Error {
    match err {
        DocumentStoreError::InvalidPatch { reason } => {
            let details = match &reason {
                PatchError::ReservedField { field } | PatchError::UnknownField { field } => {
                    Some(json!({ "field": field }))
                }
                PatchError::NotAnObject | PatchError::Malformed { .. } => None,
            };
            let error = Error::invalid_argument(reason.to_string());
            match details {
                Some(details) => error.with_details(details),
                None => error,
            }
        }
        other => {
            error!(collection, error = %other, "document store failure");
            Error::internal(format!("{collection} store failure"))
        }
    }
}

/// Reject patches touching any field outside `allowed`.
///
/// The first offending key (in patch order) is reported.
///
/// # Examples
/// ```
/// use shelfmates::domain::{ErrorCode, Patch, ensure_allowed};
///
/// let patch = Patch::new().set("title", "Dune");
/// let err = ensure_allowed(&patch, &["avgRating"]).expect_err("title is frozen");
/// assert_eq!(err.code(), ErrorCode::PermissionDenied);
/// assert_eq!(err.message(), "Cannot update 'title' field!");
/// ```
pub fn ensure_allowed(patch: &Patch, allowed: &[&str]) -> Result<(), Error> {
    match patch.keys().find(|key| !allowed.contains(key)) {
        Some(key) => Err(Error::permission_denied(format!("Cannot update '{key}' field!"))
            .with_details(json!({ "field": key }))),
        None => Ok(()),
    }
}

/// Turn a missed write into a not-found error.
pub(crate) fn require_hit(outcome: WriteOutcome, message: impl Into<String>) -> Result<(), Error> {
    if outcome.is_hit() {
        Ok(())
    } else {
        Err(Error::not_found(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn unknown_patch_field_maps_to_invalid_argument() {
        let err = map_store_error(
            "books",
            DocumentStoreError::invalid_patch(PatchError::UnknownField {
                field: "colour".into(),
            }),
        );
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert_eq!(err.details(), Some(&json!({ "field": "colour" })));
    }

    #[rstest]
    #[case(DocumentStoreError::connection("down"))]
    #[case(DocumentStoreError::query("bad"))]
    #[case(DocumentStoreError::serialization("garbled"))]
    fn infrastructure_failures_are_internal(#[case] err: DocumentStoreError) {
        let mapped = map_store_error("books", err);
        assert_eq!(mapped.code(), ErrorCode::InternalError);
        assert_eq!(mapped.message(), "books store failure");
    }

    #[rstest]
    fn allowed_keys_pass() {
        let patch = Patch::new().set("avgRating", 3);
        assert!(ensure_allowed(&patch, &["avgRating"]).is_ok());
    }

    #[rstest]
    fn empty_patch_passes() {
        assert!(ensure_allowed(&Patch::new(), &[]).is_ok());
    }

    #[rstest]
    fn missed_write_is_not_found() {
        let err = require_hit(WriteOutcome::MISSED, "Folder not found!").expect_err("missed");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert!(require_hit(WriteOutcome::HIT, "unused").is_ok());
    }
}
