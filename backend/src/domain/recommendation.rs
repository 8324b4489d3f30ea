//! Book recommendations sent from one user to another.

use serde::{Deserialize, Serialize};

use super::{DocId, Document, Record};

pub const USER_FROM_FIELD: &str = "userFrom";
pub const USER_TO_FIELD: &str = "userTo";

/// Stored recommendation. Immutable once sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationDoc {
    pub user_from: DocId,
    pub user_to: DocId,
    pub book: DocId,
}

impl Document for RecommendationDoc {
    const COLLECTION: &'static str = "recommendations";
}

/// Acknowledgement returned when a recommendation is sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSent {
    pub msg: String,
    pub recommendation: Record<RecommendationDoc>,
}
