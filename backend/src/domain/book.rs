//! Book catalogue entries.

use serde::{Deserialize, Serialize};

use super::{Document, Record};

/// Field name of the aggregate rating, the only field open to updates.
pub const AVG_RATING_FIELD: &str = "avgRating";
/// Field name of the review counter.
pub const NUMBER_OF_REVIEWS_FIELD: &str = "numberOfReviews";
/// Highest score a rating may give.
pub const MAX_SCORE: f64 = 5.0;

/// Stored book.
///
/// Title, author and description are fixed once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDoc {
    pub title: String,
    pub author: String,
    pub description: String,
    pub number_of_reviews: u32,
    pub avg_rating: f64,
}

impl Document for BookDoc {
    const COLLECTION: &'static str = "books";
}

impl BookDoc {
    /// A book with no reviews yet.
    pub fn unrated(
        title: impl Into<String>,
        author: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            description: description.into(),
            number_of_reviews: 0,
            avg_rating: 0.0,
        }
    }

    /// Running average after one more review with `score`.
    ///
    /// # Examples
    /// ```
    /// use shelfmates::domain::BookDoc;
    ///
    /// let mut book = BookDoc::unrated("Dune", "Frank Herbert", "");
    /// book.avg_rating = 4.0;
    /// book.number_of_reviews = 1;
    /// assert_eq!(book.rated(2.0), (3.0, 2));
    /// ```
    pub fn rated(&self, score: f64) -> (f64, u32) {
        let reviews = self.number_of_reviews.saturating_add(1);
        let total = self.avg_rating * f64::from(self.number_of_reviews) + score;
        (total / f64::from(reviews), reviews)
    }
}

/// Acknowledgement returned by book creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookCreated {
    pub msg: String,
    pub book: Record<BookDoc>,
}
