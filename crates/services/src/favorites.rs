use std::sync::Arc;

use cinegraph_core::{Error, FavoriteMovie, ListParams, MovieSort, Result};
use cinegraph_storage::FavoriteStore;
use tracing::{info, instrument};

/// Manages a user's favorite movies
pub struct FavoriteService {
    store: Arc<dyn FavoriteStore>,
}

impl FavoriteService {
    pub fn new(store: Arc<dyn FavoriteStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn add(&self, user_id: &str, movie_id: &str) -> Result<FavoriteMovie> {
        let movie = self
            .store
            .add_favorite(user_id, movie_id)
            .await?
            .ok_or_else(|| {
                Error::not_found(format!(
                    "Could not add movie {movie_id} to the favorites of user {user_id}"
                ))
            })?;
        info!(user_id, movie_id, "Added favorite");
        Ok(movie)
    }

    /// Fails with [`Error::NotFound`] if the movie was not a favorite
    #[instrument(skip(self))]
    pub async fn remove(&self, user_id: &str, movie_id: &str) -> Result<FavoriteMovie> {
        let movie = self
            .store
            .remove_favorite(user_id, movie_id)
            .await?
            .ok_or_else(|| {
                Error::not_found(format!(
                    "Could not remove movie {movie_id} from the favorites of user {user_id}"
                ))
            })?;
        info!(user_id, movie_id, "Removed favorite");
        Ok(movie)
    }

    pub async fn all(&self, user_id: &str, params: ListParams<MovieSort>) -> Result<Vec<FavoriteMovie>> {
        Ok(self.store.favorites_for_user(user_id, &params).await?)
    }
}
