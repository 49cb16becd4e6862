//! Read-only queries over the movie catalogue
//!
//! Every result carries a `favorite` flag for the requesting user. Anonymous
//! callers pass `None` and see every flag as `false`.

use std::sync::Arc;

use cinegraph_core::{
    Error, FavoriteMovie, ListParams, MovieDetails, MovieFilter, MovieSort, Result, SimilarMovie,
};
use cinegraph_storage::MovieStore;
use tracing::{debug, instrument};

/// Browses movies by genre, cast and crew
pub struct MovieService {
    store: Arc<dyn MovieStore>,
}

impl MovieService {
    pub fn new(store: Arc<dyn MovieStore>) -> Self {
        Self { store }
    }

    /// Every movie with a value for the sort property
    pub async fn all(
        &self,
        params: ListParams<MovieSort>,
        user_id: Option<&str>,
    ) -> Result<Vec<FavoriteMovie>> {
        self.list(MovieFilter::All, params, user_id).await
    }

    /// Movies in the genre called `name`
    pub async fn by_genre(
        &self,
        name: &str,
        params: ListParams<MovieSort>,
        user_id: Option<&str>,
    ) -> Result<Vec<FavoriteMovie>> {
        self.list(MovieFilter::Genre(name.to_string()), params, user_id)
            .await
    }

    /// Movies the person with this tmdbId acted in
    pub async fn for_actor(
        &self,
        person_id: &str,
        params: ListParams<MovieSort>,
        user_id: Option<&str>,
    ) -> Result<Vec<FavoriteMovie>> {
        self.list(MovieFilter::Actor(person_id.to_string()), params, user_id)
            .await
    }

    /// Movies the person with this tmdbId directed
    pub async fn for_director(
        &self,
        person_id: &str,
        params: ListParams<MovieSort>,
        user_id: Option<&str>,
    ) -> Result<Vec<FavoriteMovie>> {
        self.list(MovieFilter::Director(person_id.to_string()), params, user_id)
            .await
    }

    /// A single movie with its cast, directors, genres and rating count
    ///
    /// Fails with [`Error::NotFound`] when no movie has this tmdbId.
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, movie_id: &str, user_id: Option<&str>) -> Result<MovieDetails> {
        self.store
            .find_movie(movie_id, user_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("Could not find a movie with tmdbId {movie_id}")))
    }

    /// Movies sharing genres, actors or directors with `movie_id`
    ///
    /// Scored as `imdbRating` times the number of shared connections, best first.
    #[instrument(skip(self))]
    pub async fn similar(
        &self,
        movie_id: &str,
        limit: u32,
        skip: u32,
        user_id: Option<&str>,
    ) -> Result<Vec<SimilarMovie>> {
        let movies = self
            .store
            .similar_movies(movie_id, limit, skip, user_id)
            .await?;
        debug!(count = movies.len(), "Found similar movies");
        Ok(movies)
    }

    async fn list(
        &self,
        filter: MovieFilter,
        params: ListParams<MovieSort>,
        user_id: Option<&str>,
    ) -> Result<Vec<FavoriteMovie>> {
        Ok(self.store.list_movies(&filter, &params, user_id).await?)
    }
}
