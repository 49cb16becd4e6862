//! Core types for the cinegraph credential and ratings system
//!
//! This crate provides the foundational pieces shared by every other crate:
//!
//! - **Entities**: users, session claims, movies, ratings and listing parameters
//! - **Configuration**: graph store and auth settings, loaded from TOML and environment
//! - **Error handling**: the unified error taxonomy
//!

pub mod config;
pub mod entities;
pub mod error;

// Re-export main types for convenience
pub use config::{AuthConfig, Config, StorageConfig};
pub use entities::{
    AuthPayload, CastMember, Claims, FavoriteMovie, Genre, ListParams, Movie, MovieDetails,
    MovieFilter, MovieSort, Person, RatedMovie, Review, ReviewSort, ReviewUser, SimilarMovie,
    SortOrder, User, UserIdentity, DEFAULT_PAGE_LIMIT,
};
pub use error::{Error, Result, ResultExt};

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::entities::{ListParams, MovieSort, ReviewSort, SortOrder};
    pub use crate::error::{Result, ResultExt};
}
