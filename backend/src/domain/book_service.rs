//! Book concept: catalogue entries with a sanitised update path.

use std::sync::Arc;

use tracing::{info, warn};

use super::book::{AVG_RATING_FIELD, MAX_SCORE, NUMBER_OF_REVIEWS_FIELD};
use super::ports::{DocumentStore, DocumentStoreError};
use super::store_support::{map_store_error, require_hit};
use super::{
    BookCreated, BookDoc, DocId, Document, Error, Filter, Message, Patch, ReadOptions, Record,
    ensure_allowed,
};

/// Fields callers may change through [`BookService::update_info`].
pub const BOOK_UPDATABLE_FIELDS: [&str; 1] = [AVG_RATING_FIELD];

fn store_error(err: DocumentStoreError) -> Error {
    map_store_error(BookDoc::COLLECTION, err)
}

/// Service owning the `books` collection.
#[derive(Clone)]
pub struct BookService {
    books: Arc<dyn DocumentStore<BookDoc>>,
}

impl BookService {
    pub fn new(books: Arc<dyn DocumentStore<BookDoc>>) -> Self {
        Self { books }
    }

    /// Add a book with no reviews.
    pub async fn create(
        &self,
        title: &str,
        author: &str,
        description: &str,
    ) -> Result<BookCreated, Error> {
        let (title, author) = (title.trim(), author.trim());
        if title.is_empty() || author.is_empty() {
            return Err(Error::invalid_argument(
                "Book title and author must be non-empty!",
            ));
        }
        let id = self
            .books
            .create_one(BookDoc::unrated(title, author, description.trim()))
            .await
            .map_err(store_error)?;
        info!(book_id = %id, title, "book created");
        Ok(BookCreated {
            msg: "Book successfully created!".to_owned(),
            book: self.get_book_by_id(id).await?,
        })
    }

    /// Books, optionally only those titled `title`, newest first.
    pub async fn get_books(&self, title: Option<&str>) -> Result<Vec<Record<BookDoc>>, Error> {
        let filter = match title {
            Some(title) => Filter::all().eq("title", title),
            None => Filter::all(),
        };
        self.books
            .read_many(&filter, &ReadOptions::default())
            .await
            .map_err(store_error)
    }

    pub async fn get_book_by_id(&self, id: DocId) -> Result<Record<BookDoc>, Error> {
        self.books
            .read_one_by_id(id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| Error::not_found("Book not found!"))
    }

    /// Apply a caller-supplied patch; only `avgRating` may be touched.
    pub async fn update_info(&self, id: DocId, update: &Patch) -> Result<Message, Error> {
        if let Err(err) = ensure_allowed(update, &BOOK_UPDATABLE_FIELDS) {
            warn!(book_id = %id, reason = err.message(), "book update rejected");
            return Err(err);
        }
        let outcome = self
            .books
            .update_one_by_id(id, update)
            .await
            .map_err(store_error)?;
        require_hit(outcome, "Book not found!")?;
        info!(book_id = %id, "book info updated");
        Ok(Message::new("Book info successfully updated!"))
    }

    /// Record one review score between 0 and 5.
    pub async fn add_rating(&self, id: DocId, score: f64) -> Result<Message, Error> {
        if !(0.0..=MAX_SCORE).contains(&score) {
            return Err(Error::invalid_argument(format!(
                "Rating must be between 0 and {MAX_SCORE}!"
            )));
        }
        let book = self.get_book_by_id(id).await?;
        let (average, reviews) = book.fields.rated(score);
        let patch = Patch::new()
            .set(AVG_RATING_FIELD, average)
            .set(NUMBER_OF_REVIEWS_FIELD, reviews);
        let outcome = self
            .books
            .update_one_by_id(id, &patch)
            .await
            .map_err(store_error)?;
        require_hit(outcome, "Book not found!")?;
        info!(book_id = %id, score, reviews, "book rated");
        Ok(Message::new("Rating added!"))
    }

    pub async fn delete(&self, id: DocId) -> Result<Message, Error> {
        let outcome = self
            .books
            .delete_one_by_id(id)
            .await
            .map_err(store_error)?;
        require_hit(outcome, "Book not found!")?;
        info!(book_id = %id, "book deleted");
        Ok(Message::new("Book deleted!"))
    }
}
