//! Recommendation concept: send, list and withdraw recommendations.

use std::sync::Arc;

use tracing::info;

use super::ports::{DocumentStore, DocumentStoreError};
use super::recommendation::{USER_FROM_FIELD, USER_TO_FIELD};
use super::store_support::{map_store_error, require_hit};
use super::{
    DocId, Document, Error, Filter, Message, ReadOptions, RecommendationDoc, RecommendationSent,
    Record,
};

fn store_error(err: DocumentStoreError) -> Error {
    map_store_error(RecommendationDoc::COLLECTION, err)
}

/// Service owning the `recommendations` collection.
#[derive(Clone)]
pub struct RecommendationService {
    recs: Arc<dyn DocumentStore<RecommendationDoc>>,
}

impl RecommendationService {
    pub fn new(recs: Arc<dyn DocumentStore<RecommendationDoc>>) -> Self {
        Self { recs }
    }

    /// Recommend `book` from `user_from` to `user_to`.
    pub async fn send_rec(
        &self,
        user_from: DocId,
        user_to: DocId,
        book: DocId,
    ) -> Result<RecommendationSent, Error> {
        if user_from == user_to {
            return Err(Error::invalid_argument(
                "Cannot send a recommendation to yourself!",
            ));
        }
        let id = self
            .recs
            .create_one(RecommendationDoc {
                user_from,
                user_to,
                book,
            })
            .await
            .map_err(store_error)?;
        info!(rec_id = %id, %user_from, %user_to, %book, "recommendation sent");
        Ok(RecommendationSent {
            msg: "Recommendation successfully sent!".to_owned(),
            recommendation: self.get_rec_by_id(id).await?,
        })
    }

    /// Recommendations received by `user_to`, newest first.
    pub async fn get_user_recs(
        &self,
        user_to: DocId,
    ) -> Result<Vec<Record<RecommendationDoc>>, Error> {
        self.list(Filter::all().eq(USER_TO_FIELD, user_to)).await
    }

    /// Recommendations sent by `user_from`, newest first.
    pub async fn get_recs_sent(
        &self,
        user_from: DocId,
    ) -> Result<Vec<Record<RecommendationDoc>>, Error> {
        self.list(Filter::all().eq(USER_FROM_FIELD, user_from)).await
    }

    pub async fn get_rec_by_id(&self, id: DocId) -> Result<Record<RecommendationDoc>, Error> {
        self.recs
            .read_one_by_id(id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| Error::not_found("Recommendation not found!"))
    }

    pub async fn delete_rec(&self, id: DocId) -> Result<Message, Error> {
        let outcome = self.recs.delete_one_by_id(id).await.map_err(store_error)?;
        require_hit(outcome, "Recommendation not found!")?;
        info!(rec_id = %id, "recommendation deleted");
        Ok(Message::new("Recommendation deleted!"))
    }

    async fn list(&self, filter: Filter) -> Result<Vec<Record<RecommendationDoc>>, Error> {
        self.recs
            .read_many(&filter, &ReadOptions::default())
            .await
            .map_err(store_error)
    }
}
