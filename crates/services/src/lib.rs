#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

//! Services over the graph store
//!
//! - **Auth**: bcrypt password storage, registration, login and HS256 session tokens
//! - **Ratings**: upsert of a user's rating for a movie and ordered listing
//! - **Favorites**: a user's favorite movies
//! - **Movies**: catalogue listings, movie details and similar movies

pub mod auth;
mod favorites;
mod movies;
mod ratings;

pub use auth::{decode_token, AuthOutcome, AuthService, TokenService};
pub use favorites::FavoriteService;
pub use movies::MovieService;
pub use ratings::RatingService;

use std::sync::Arc;

use cinegraph_core::AuthConfig;
use cinegraph_storage::GraphStore;

/// Every service, wired to one graph store
pub struct Services {
    pub auth: AuthService,
    pub ratings: RatingService,
    pub favorites: FavoriteService,
    pub movies: MovieService,
}

impl Services {
    pub fn new(store: Arc<dyn GraphStore>, auth_config: &AuthConfig) -> Self {
        Self {
            auth: AuthService::new(store.clone(), auth_config),
            ratings: RatingService::new(store.clone()),
            favorites: FavoriteService::new(store.clone()),
            movies: MovieService::new(store),
        }
    }
}
