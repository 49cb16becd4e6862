use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use strum::{Display, EnumString};

/// Default page size for listing operations
pub const DEFAULT_PAGE_LIMIT: u32 = 6;

/// A registered user as stored in the graph
///
/// `password_hash` holds the salted one-way hash, never the plaintext.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub name: String,
    #[serde(rename = "password")]
    pub password_hash: String,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password_hash", &"***REDACTED***")
            .finish()
    }
}

impl User {
    /// The public identity of this user, as embedded in session tokens
    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            user_id: self.user_id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

/// Identity fields that seed a session token's claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub user_id: String,
    pub email: String,
    pub name: String,
}

/// Claims carried by a session token
///
/// Times are seconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub sub: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

/// Result of a successful register or authenticate call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub token: String,
}

impl AuthPayload {
    pub fn new(identity: UserIdentity, token: String) -> Self {
        Self {
            user_id: identity.user_id,
            email: identity.email,
            name: identity.name,
            token,
        }
    }
}

/// A movie node with its full property set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "tmdbId")]
    pub tmdb_id: String,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

/// A movie together with the rating a user just gave it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedMovie {
    #[serde(flatten)]
    pub movie: Movie,
    pub rating: i64,
}

/// A movie annotated with whether it is in the user's favorites
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteMovie {
    #[serde(flatten)]
    pub movie: Movie,
    pub favorite: bool,
}

/// A Person node (actor or director) with its full property set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(rename = "tmdbId")]
    pub tmdb_id: String,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

/// An actor and the role they played
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    #[serde(flatten)]
    pub person: Person,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub name: String,
}

/// A single movie with its cast, crew, genres and rating count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: Movie,
    pub actors: Vec<CastMember>,
    pub directors: Vec<Person>,
    pub genres: Vec<Genre>,
    pub rating_count: i64,
    pub favorite: bool,
}

/// A movie ranked by how much it has in common with another
///
/// `score` is the movie's `imdbRating` multiplied by the number of shared
/// genre, actor and director connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarMovie {
    #[serde(flatten)]
    pub movie: Movie,
    pub score: f64,
    pub favorite: bool,
}

/// Which movies a catalogue listing covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieFilter {
    All,
    /// Movies `IN_GENRE` the genre with this name
    Genre(String),
    /// Movies the person with this `tmdbId` `ACTED_IN`
    Actor(String),
    /// Movies the person with this `tmdbId` `DIRECTED`
    Director(String),
}

/// The reviewing user as shown alongside a rating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewUser {
    pub user_id: String,
    pub name: String,
}

/// One RATED relationship into a movie
///
/// `timestamp` is milliseconds since the Unix epoch, assigned by the store on write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub rating: i64,
    pub timestamp: i64,
    pub user: ReviewUser,
}

/// Direction of an ordered listing
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "ASC")]
    #[strum(serialize = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    #[strum(serialize = "DESC")]
    Desc,
}

impl SortOrder {
    /// Cypher keyword for this direction
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Relationship properties a review listing may be ordered by
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum ReviewSort {
    #[default]
    Timestamp,
    Rating,
}

impl ReviewSort {
    /// Name of the RATED relationship property to order by
    pub fn property(&self) -> &'static str {
        match self {
            Self::Timestamp => "timestamp",
            Self::Rating => "rating",
        }
    }
}

/// Movie properties a movie listing may be ordered by
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum MovieSort {
    #[default]
    Title,
    Released,
    ImdbRating,
}

impl MovieSort {
    /// Name of the Movie node property to order by
    pub fn property(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Released => "released",
            Self::ImdbRating => "imdbRating",
        }
    }
}

/// Ordering and pagination for a listing
///
/// `S` is a closed set of sortable properties, so nothing caller-supplied is
/// ever spliced into query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListParams<S> {
    pub sort: S,
    pub order: SortOrder,
    pub limit: u32,
    pub skip: u32,
}

impl<S: Default> Default for ListParams<S> {
    fn default() -> Self {
        Self {
            sort: S::default(),
            order: SortOrder::Asc,
            limit: DEFAULT_PAGE_LIMIT,
            skip: 0,
        }
    }
}

impl<S> ListParams<S> {
    pub fn new(sort: S, order: SortOrder, limit: u32, skip: u32) -> Self {
        Self {
            sort,
            order,
            limit,
            skip,
        }
    }

    /// Build parameters from caller-supplied text, rejecting anything outside the allow-list
    pub fn parse(sort: &str, order: &str, limit: u32, skip: u32) -> Result<Self>
    where
        S: FromStr,
    {
        let sort = S::from_str(sort)
            .map_err(|_| Error::invalid_input(format!("unsupported sort field '{sort}'")))?;
        let order = SortOrder::from_str(order)
            .map_err(|_| Error::invalid_input(format!("unsupported sort order '{order}'")))?;
        Ok(Self::new(sort, order, limit, skip))
    }

    /// Parameters for the page immediately after this one
    pub fn next_page(&self) -> Self
    where
        S: Copy,
    {
        Self {
            skip: self.skip.saturating_add(self.limit),
            ..*self
        }
    }
}
