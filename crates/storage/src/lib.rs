#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

//! Graph store adapters for users, ratings, favorites and the movie catalogue
//!
//! Every operation runs exactly one parameterized Cypher statement inside its
//! own transaction, so each call is all-or-nothing.

pub mod error;
mod factory;
pub mod neo4j;

pub use error::StorageError;
pub use factory::{create_and_initialize_graph_store, create_graph_store};
pub use neo4j::{MockNeo4jClient, Neo4jClient};

use async_trait::async_trait;
use cinegraph_core::{
    FavoriteMovie, ListParams, MovieDetails, MovieFilter, MovieSort, RatedMovie, Review, ReviewSort,
    SimilarMovie, User,
};

/// Result type for storage adapter operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

// ==== Traits ====

/// Credential store: creation and lookup of User nodes
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a User node with a server-generated `userId`
    ///
    /// Fails with [`StorageError::DuplicateIdentifier`] when the email is
    /// already registered.
    async fn create_user(&self, email: &str, password_hash: &str, name: &str)
        -> StorageResult<User>;

    /// Find the single User node with this email
    ///
    /// Fails with [`StorageError::IntegrityViolation`] if more than one node matches.
    async fn find_user_by_email(&self, email: &str) -> StorageResult<Option<User>>;
}

/// Rating store: the RATED relationship between a User and a Movie
#[async_trait]
pub trait RatingStore: Send + Sync {
    /// Merge the RATED relationship, setting `rating` and a fresh `timestamp`
    ///
    /// Returns `None` when the user or the movie does not exist.
    async fn upsert_rating(
        &self,
        user_id: &str,
        movie_id: &str,
        rating: i64,
    ) -> StorageResult<Option<RatedMovie>>;

    /// List the ratings into a movie, ordered and paginated
    async fn ratings_for_movie(
        &self,
        movie_id: &str,
        params: &ListParams<ReviewSort>,
    ) -> StorageResult<Vec<Review>>;
}

/// Favorite store: the HAS_FAVORITE relationship between a User and a Movie
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Merge the HAS_FAVORITE relationship; `None` when user or movie is missing
    async fn add_favorite(
        &self,
        user_id: &str,
        movie_id: &str,
    ) -> StorageResult<Option<FavoriteMovie>>;

    /// Delete the HAS_FAVORITE relationship; `None` when it does not exist
    async fn remove_favorite(
        &self,
        user_id: &str,
        movie_id: &str,
    ) -> StorageResult<Option<FavoriteMovie>>;

    /// List a user's favorite movies, ordered and paginated
    async fn favorites_for_user(
        &self,
        user_id: &str,
        params: &ListParams<MovieSort>,
    ) -> StorageResult<Vec<FavoriteMovie>>;
}

/// Movie catalogue reads
///
/// Every result carries a `favorite` flag for `user_id`; with no user it is
/// always `false`.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// List movies matching `filter`, ordered and paginated
    ///
    /// Movies with no value for the sort property are omitted.
    async fn list_movies(
        &self,
        filter: &MovieFilter,
        params: &ListParams<MovieSort>,
        user_id: Option<&str>,
    ) -> StorageResult<Vec<FavoriteMovie>>;

    /// One movie with its actors, directors, genres and rating count
    async fn find_movie(
        &self,
        movie_id: &str,
        user_id: Option<&str>,
    ) -> StorageResult<Option<MovieDetails>>;

    /// Movies sharing genres, actors or directors with `movie_id`, highest score first
    async fn similar_movies(
        &self,
        movie_id: &str,
        limit: u32,
        skip: u32,
        user_id: Option<&str>,
    ) -> StorageResult<Vec<SimilarMovie>>;
}

/// Combined graph store covering every adapter plus schema setup
#[async_trait]
pub trait GraphStore: UserStore + RatingStore + FavoriteStore + MovieStore {
    /// Create the uniqueness constraints the adapters rely on
    async fn initialize(&self) -> StorageResult<()>;
}
