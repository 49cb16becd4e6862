//! Mock Neo4j client for testing
//!
//! Mirrors the observable behaviour of the Cypher statements: email
//! uniqueness, MERGE on a (user, movie) pair, MATCH misses as `None`, and
//! ordering with the same tie-breakers. Relationships are kept as edge lists
//! so a write that duplicates an edge shows up in the counts.

use async_trait::async_trait;
use cinegraph_core::{
    CastMember, FavoriteMovie, Genre, ListParams, Movie, MovieDetails, MovieFilter, MovieSort,
    Person, RatedMovie, Review, ReviewSort, ReviewUser, SimilarMovie, SortOrder, User,
};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use crate::{
    FavoriteStore, GraphStore, MovieStore, RatingStore, StorageError, StorageResult, UserStore,
};

/// In-memory RATED relationship
#[derive(Debug, Clone)]
struct RatingEdge {
    user_id: String,
    movie_id: String,
    rating: i64,
    timestamp: i64,
}

/// In-memory ACTED_IN relationship
#[derive(Debug, Clone)]
struct ActedIn {
    person_id: String,
    movie_id: String,
    role: Option<String>,
}

#[derive(Debug, Default)]
struct MockData {
    users: Vec<User>,
    movies: HashMap<String, Movie>,                   // tmdbId -> Movie
    ratings: Vec<RatingEdge>,
    people: HashMap<String, Person>,                  // tmdbId -> Person
    acted_in: Vec<ActedIn>,
    directed: Vec<(String, String)>,                  // (person tmdbId, movie tmdbId)
    in_genre: Vec<(String, String)>,                  // (movie tmdbId, genre name)
    favorites: HashMap<(String, String), i64>,        // (userId, tmdbId) -> createdAt
    last_timestamp: i64,
}

impl MockData {
    fn user_exists(&self, user_id: &str) -> bool {
        self.users.iter().any(|u| u.user_id == user_id)
    }

    /// tmdbIds of the user's favorites; empty without a user
    fn favorite_ids(&self, user_id: Option<&str>) -> Vec<&str> {
        let Some(user_id) = user_id else {
            return Vec::new();
        };
        self.favorites
            .keys()
            .filter(|(u, _)| u == user_id)
            .map(|(_, m)| m.as_str())
            .collect()
    }

    /// Neighbour nodes of a movie across IN_GENRE, ACTED_IN and DIRECTED, one entry per relationship
    fn connections(&self, movie_id: &str) -> Vec<String> {
        let genres = self
            .in_genre
            .iter()
            .filter(|(m, _)| m == movie_id)
            .map(|(_, g)| format!("genre:{g}"));
        let actors = self
            .acted_in
            .iter()
            .filter(|edge| edge.movie_id == movie_id)
            .map(|edge| format!("person:{}", edge.person_id));
        let directors = self
            .directed
            .iter()
            .filter(|(_, m)| m == movie_id)
            .map(|(p, _)| format!("person:{p}"));
        genres.chain(actors).chain(directors).collect()
    }

    fn matches_filter(&self, movie_id: &str, filter: &MovieFilter) -> bool {
        match filter {
            MovieFilter::All => true,
            MovieFilter::Genre(name) => self.in_genre.iter().any(|(m, g)| m == movie_id && g == name),
            MovieFilter::Actor(person_id) => self
                .acted_in
                .iter()
                .any(|edge| edge.movie_id == movie_id && &edge.person_id == person_id),
            MovieFilter::Director(person_id) => self
                .directed
                .iter()
                .any(|(p, m)| m == movie_id && p == person_id),
        }
    }

    /// Millisecond timestamp, strictly increasing across writes
    fn next_timestamp(&mut self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let ts = now.max(self.last_timestamp + 1);
        self.last_timestamp = ts;
        ts
    }
}

/// Mock Neo4j client for testing
pub struct MockNeo4jClient {
    data: Arc<Mutex<MockData>>,
}

impl MockNeo4jClient {
    /// Create a new mock client
    pub fn new() -> Self {
        Self {
            data: Arc::new(Mutex::new(MockData::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed a movie node
    pub fn insert_movie(&self, movie: Movie) {
        self.lock().movies.insert(movie.tmdb_id.clone(), movie);
    }

    /// Seed a user node without the email uniqueness check
    ///
    /// Lets tests reproduce a store that already holds duplicate emails.
    pub fn insert_user_unchecked(&self, user: User) {
        self.lock().users.push(user);
    }

    /// Seed a person node
    pub fn insert_person(&self, person: Person) {
        self.lock().people.insert(person.tmdb_id.clone(), person);
    }

    /// Seed an IN_GENRE relationship
    pub fn add_genre(&self, movie_id: &str, genre: &str) {
        self.lock()
            .in_genre
            .push((movie_id.to_string(), genre.to_string()));
    }

    /// Seed an ACTED_IN relationship
    pub fn add_actor(&self, person_id: &str, movie_id: &str, role: Option<&str>) {
        self.lock().acted_in.push(ActedIn {
            person_id: person_id.to_string(),
            movie_id: movie_id.to_string(),
            role: role.map(str::to_string),
        });
    }

    /// Seed a DIRECTED relationship
    pub fn add_director(&self, person_id: &str, movie_id: &str) {
        self.lock()
            .directed
            .push((person_id.to_string(), movie_id.to_string()));
    }

    /// Get number of user nodes stored
    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    /// Get number of RATED relationships between this user and movie
    pub fn rating_count(&self, user_id: &str, movie_id: &str) -> usize {
        let data = self.lock();
        data.ratings
            .iter()
            .filter(|edge| edge.user_id == user_id && edge.movie_id == movie_id)
            .count()
    }

    /// Get the stored `timestamp` of a RATED relationship
    pub fn rating_timestamp(&self, user_id: &str, movie_id: &str) -> Option<i64> {
        self.lock()
            .ratings
            .iter()
            .find(|edge| edge.user_id == user_id && edge.movie_id == movie_id)
            .map(|edge| edge.timestamp)
    }

    /// Get number of HAS_FAVORITE relationships stored
    pub fn favorite_count(&self) -> usize {
        self.lock().favorites.len()
    }
}

impl Default for MockNeo4jClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Order two optional property values the way Cypher does: nulls sort last ascending
fn compare_property(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn apply_order(ordering: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

fn paginate<T>(items: Vec<T>, skip: u32, limit: u32) -> Vec<T> {
    items
        .into_iter()
        .skip(skip as usize)
        .take(limit as usize)
        .collect()
}

#[async_trait]
impl UserStore for MockNeo4jClient {
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
    ) -> StorageResult<User> {
        let mut data = self.lock();
        if data.users.iter().any(|u| u.email == email) {
            return Err(StorageError::duplicate("email", email));
        }

        let user = User {
            user_id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: name.to_string(),
            password_hash: password_hash.to_string(),
        };
        data.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let data = self.lock();
        let mut matches = data.users.iter().filter(|u| u.email == email);
        let first = matches.next().cloned();
        if matches.next().is_some() {
            return Err(StorageError::IntegrityViolation(format!(
                "more than one user registered with email {email}"
            )));
        }
        Ok(first)
    }
}

#[async_trait]
impl RatingStore for MockNeo4jClient {
    async fn upsert_rating(
        &self,
        user_id: &str,
        movie_id: &str,
        rating: i64,
    ) -> StorageResult<Option<RatedMovie>> {
        let mut data = self.lock();
        if !data.user_exists(user_id) {
            return Ok(None);
        }
        let Some(movie) = data.movies.get(movie_id).cloned() else {
            return Ok(None);
        };

        let timestamp = data.next_timestamp();
        match data
            .ratings
            .iter_mut()
            .find(|edge| edge.user_id == user_id && edge.movie_id == movie_id)
        {
            Some(edge) => {
                edge.rating = rating;
                edge.timestamp = timestamp;
            }
            None => data.ratings.push(RatingEdge {
                user_id: user_id.to_string(),
                movie_id: movie_id.to_string(),
                rating,
                timestamp,
            }),
        }

        Ok(Some(RatedMovie { movie, rating }))
    }

    async fn ratings_for_movie(
        &self,
        movie_id: &str,
        params: &ListParams<ReviewSort>,
    ) -> StorageResult<Vec<Review>> {
        let data = self.lock();
        let mut reviews: Vec<Review> = data
            .ratings
            .iter()
            .filter(|edge| edge.movie_id == movie_id)
            .filter_map(|edge| {
                data.users.iter().find(|user| user.user_id == edge.user_id).map(|user| Review {
                    rating: edge.rating,
                    timestamp: edge.timestamp,
                    user: ReviewUser {
                        user_id: user.user_id.clone(),
                        name: user.name.clone(),
                    },
                })
            })
            .collect();

        reviews.sort_by(|a, b| {
            let primary = match params.sort {
                ReviewSort::Timestamp => a.timestamp.cmp(&b.timestamp),
                ReviewSort::Rating => a.rating.cmp(&b.rating),
            };
            apply_order(primary, params.order).then_with(|| a.user.user_id.cmp(&b.user.user_id))
        });

        Ok(paginate(reviews, params.skip, params.limit))
    }
}

#[async_trait]
impl FavoriteStore for MockNeo4jClient {
    async fn add_favorite(
        &self,
        user_id: &str,
        movie_id: &str,
    ) -> StorageResult<Option<FavoriteMovie>> {
        let mut data = self.lock();
        if !data.user_exists(user_id) {
            return Ok(None);
        }
        let Some(movie) = data.movies.get(movie_id).cloned() else {
            return Ok(None);
        };

        let key = (user_id.to_string(), movie_id.to_string());
        if !data.favorites.contains_key(&key) {
            let created_at = data.next_timestamp();
            data.favorites.insert(key, created_at);
        }

        Ok(Some(FavoriteMovie {
            movie,
            favorite: true,
        }))
    }

    async fn remove_favorite(
        &self,
        user_id: &str,
        movie_id: &str,
    ) -> StorageResult<Option<FavoriteMovie>> {
        let mut data = self.lock();
        let key = (user_id.to_string(), movie_id.to_string());
        if data.favorites.remove(&key).is_none() {
            return Ok(None);
        }

        Ok(data.movies.get(movie_id).cloned().map(|movie| FavoriteMovie {
            movie,
            favorite: false,
        }))
    }

    async fn favorites_for_user(
        &self,
        user_id: &str,
        params: &ListParams<MovieSort>,
    ) -> StorageResult<Vec<FavoriteMovie>> {
        let data = self.lock();
        let mut movies: Vec<Movie> = data
            .favorites
            .keys()
            .filter(|(u, _)| u == user_id)
            .filter_map(|(_, m)| data.movies.get(m).cloned())
            .collect();

        let property = params.sort.property();
        movies.sort_by(|a, b| {
            let primary = compare_property(a.properties.get(property), b.properties.get(property));
            apply_order(primary, params.order).then_with(|| a.tmdb_id.cmp(&b.tmdb_id))
        });

        Ok(paginate(movies, params.skip, params.limit)
            .into_iter()
            .map(|movie| FavoriteMovie {
                movie,
                favorite: true,
            })
            .collect())
    }
}

#[async_trait]
impl MovieStore for MockNeo4jClient {
    async fn list_movies(
        &self,
        filter: &MovieFilter,
        params: &ListParams<MovieSort>,
        user_id: Option<&str>,
    ) -> StorageResult<Vec<FavoriteMovie>> {
        let data = self.lock();
        let property = params.sort.property();
        let mut movies: Vec<&Movie> = data
            .movies
            .values()
            .filter(|m| data.matches_filter(&m.tmdb_id, filter))
            .filter(|m| m.properties.get(property).is_some_and(|v| !v.is_null()))
            .collect();

        movies.sort_by(|a, b| {
            let primary = compare_property(a.properties.get(property), b.properties.get(property));
            apply_order(primary, params.order).then_with(|| a.tmdb_id.cmp(&b.tmdb_id))
        });

        let favorites = data.favorite_ids(user_id);
        Ok(paginate(movies, params.skip, params.limit)
            .into_iter()
            .map(|movie| FavoriteMovie {
                favorite: favorites.contains(&movie.tmdb_id.as_str()),
                movie: movie.clone(),
            })
            .collect())
    }

    async fn find_movie(
        &self,
        movie_id: &str,
        user_id: Option<&str>,
    ) -> StorageResult<Option<MovieDetails>> {
        let data = self.lock();
        let Some(movie) = data.movies.get(movie_id).cloned() else {
            return Ok(None);
        };

        let actors = data
            .acted_in
            .iter()
            .filter(|edge| edge.movie_id == movie_id)
            .filter_map(|edge| {
                data.people.get(&edge.person_id).map(|person| CastMember {
                    person: person.clone(),
                    role: edge.role.clone(),
                })
            })
            .collect();
        let directors = data
            .directed
            .iter()
            .filter(|(_, m)| m == movie_id)
            .filter_map(|(p, _)| data.people.get(p).cloned())
            .collect();
        let genres = data
            .in_genre
            .iter()
            .filter(|(m, _)| m == movie_id)
            .map(|(_, name)| Genre { name: name.clone() })
            .collect();
        let rating_count = data
            .ratings
            .iter()
            .filter(|edge| edge.movie_id == movie_id)
            .count() as i64;
        let favorite = data.favorite_ids(user_id).contains(&movie_id);

        Ok(Some(MovieDetails {
            movie,
            actors,
            directors,
            genres,
            rating_count,
            favorite,
        }))
    }

    async fn similar_movies(
        &self,
        movie_id: &str,
        limit: u32,
        skip: u32,
        user_id: Option<&str>,
    ) -> StorageResult<Vec<SimilarMovie>> {
        let data = self.lock();
        let target = data.connections(movie_id);
        let favorites = data.favorite_ids(user_id);

        // Every (target edge, neighbour edge) pair through a shared node is one path
        let mut similar: Vec<SimilarMovie> = data
            .movies
            .values()
            .filter(|m| m.tmdb_id != movie_id)
            .filter_map(|m| {
                let imdb_rating = m.properties.get("imdbRating").and_then(Value::as_f64)?;
                let theirs = data.connections(&m.tmdb_id);
                let in_common = target
                    .iter()
                    .map(|node| theirs.iter().filter(|other| *other == node).count())
                    .sum::<usize>();
                (in_common > 0).then(|| SimilarMovie {
                    movie: m.clone(),
                    score: imdb_rating * in_common as f64,
                    favorite: favorites.contains(&m.tmdb_id.as_str()),
                })
            })
            .collect();

        similar.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.movie.tmdb_id.cmp(&b.movie.tmdb_id))
        });

        Ok(paginate(similar, skip, limit))
    }
}

#[async_trait]
impl GraphStore for MockNeo4jClient {
    async fn initialize(&self) -> StorageResult<()> {
        Ok(())
    }
}
