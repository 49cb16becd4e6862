use std::sync::Arc;

use cinegraph_core::{Error, ListParams, RatedMovie, Result, Review, ReviewSort};
use cinegraph_storage::RatingStore;
use tracing::{debug, info, instrument};

/// Writes and lists movie ratings
pub struct RatingService {
    store: Arc<dyn RatingStore>,
}

impl RatingService {
    pub fn new(store: Arc<dyn RatingStore>) -> Self {
        Self { store }
    }

    /// Rate a movie on behalf of a user, replacing any earlier rating
    ///
    /// Fails with [`Error::NotFound`] when the user or the movie does not exist.
    #[instrument(skip(self))]
    pub async fn add(&self, user_id: &str, movie_id: &str, rating: i64) -> Result<RatedMovie> {
        match self.store.upsert_rating(user_id, movie_id, rating).await? {
            Some(movie) => {
                info!(user_id, movie_id, rating, "Saved rating");
                Ok(movie)
            }
            None => Err(Error::not_found(format!(
                "Could not create rating for movie {movie_id} by user {user_id}"
            ))),
        }
    }

    /// Ratings given to a movie, in the requested order
    pub async fn for_movie(&self, movie_id: &str, params: ListParams<ReviewSort>) -> Result<Vec<Review>> {
        let reviews = self.store.ratings_for_movie(movie_id, &params).await?;
        debug!(
            movie_id,
            sort = %params.sort,
            order = %params.order,
            count = reviews.len(),
            "Listed ratings"
        );
        Ok(reviews)
    }
}
