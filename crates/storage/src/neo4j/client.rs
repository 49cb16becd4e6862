use async_trait::async_trait;
use cinegraph_core::{
    FavoriteMovie, ListParams, MovieDetails, MovieFilter, MovieSort, RatedMovie, Review,
    ReviewSort, SimilarMovie, StorageConfig, User,
};
use neo4rs::{Graph, Query, Row, Txn};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::queries;
use crate::{
    FavoriteStore, GraphStore, MovieStore, RatingStore, StorageError, StorageResult, UserStore,
};

/// Declared intent of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccessMode {
    Read,
    Write,
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("read"),
            Self::Write => f.write_str("write"),
        }
    }
}

/// Neo4j client for the user, rating and favorite graph
pub struct Neo4jClient {
    graph: Arc<Graph>,
}

impl Neo4jClient {
    /// Connect to Neo4j server with the provided configuration
    ///
    /// # Example
    /// ```no_run
    /// use cinegraph_storage::Neo4jClient;
    /// use cinegraph_core::StorageConfig;
    ///
    /// # async fn example(config: &StorageConfig) -> Result<(), cinegraph_storage::StorageError> {
    /// let client = Neo4jClient::new(config).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new(config: &StorageConfig) -> StorageResult<Self> {
        let uri = config.neo4j_uri();

        info!("Connecting to Neo4j at {}", uri);

        let graph = Graph::new(&uri, &config.neo4j_user, &config.neo4j_password)
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            graph: Arc::new(graph),
        })
    }

    /// Get a reference to the underlying Graph for direct query execution
    pub fn graph(&self) -> &Arc<Graph> {
        &self.graph
    }

    /// Run one statement in its own transaction and collect every row
    ///
    /// The transaction is committed only if the statement and the full result
    /// stream succeed; otherwise it is rolled back.
    async fn run_in_transaction(
        &self,
        mode: AccessMode,
        query: Query,
    ) -> Result<Vec<Row>, neo4rs::Error> {
        let mut txn = self.graph.start_txn().await?;

        let rows = match collect_rows(&mut txn, query).await {
            Ok(rows) => rows,
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    warn!(error = %rollback_err, "Failed to roll back {mode} transaction");
                }
                return Err(e);
            }
        };

        txn.commit().await?;
        debug!(rows = rows.len(), "Committed {mode} transaction");
        Ok(rows)
    }
}

async fn collect_rows(txn: &mut Txn, query: Query) -> Result<Vec<Row>, neo4rs::Error> {
    let mut stream = txn.execute(query).await?;
    let mut rows = Vec::new();
    while let Some(row) = stream.next(txn.handle()).await? {
        rows.push(row);
    }
    Ok(rows)
}

/// Deserialize one column of a row
fn decode<T: DeserializeOwned>(row: &Row, column: &str) -> StorageResult<T> {
    row.get::<T>(column)
        .map_err(|e| StorageError::serialization(format!("column `{column}`: {e}")))
}

/// Deserialize the named column of the first row, if there is one
fn decode_first<T: DeserializeOwned>(rows: &[Row], column: &str) -> StorageResult<Option<T>> {
    rows.first().map(|row| decode(row, column)).transpose()
}

const CONSTRAINT_VALIDATION_FAILED: &str = "Neo.ClientError.Schema.ConstraintValidationFailed";

/// True when Neo4j rejected a write because of a uniqueness constraint
fn is_constraint_violation(err: &neo4rs::Error) -> bool {
    matches!(err, neo4rs::Error::Neo4j(e) if e.code() == CONSTRAINT_VALIDATION_FAILED)
}

#[async_trait]
impl UserStore for Neo4jClient {
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
    ) -> StorageResult<User> {
        let query = Query::new(queries::CREATE_USER.to_string())
            .param("email", email)
            .param("password", password_hash)
            .param("name", name);

        let rows = self
            .run_in_transaction(AccessMode::Write, query)
            .await
            .map_err(|e| {
                if is_constraint_violation(&e) {
                    StorageError::duplicate("email", email)
                } else {
                    e.into()
                }
            })?;

        let user: User = decode_first(&rows, "user")?
            .ok_or_else(|| StorageError::backend("CREATE returned no user row"))?;

        info!(user_id = %user.user_id, email = %user.email, "Created user node");
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let query = Query::new(queries::FIND_USER_BY_EMAIL.to_string()).param("email", email);

        let rows = self.run_in_transaction(AccessMode::Read, query).await?;

        if rows.len() > 1 {
            return Err(StorageError::IntegrityViolation(format!(
                "more than one user registered with email {email}"
            )));
        }

        decode_first(&rows, "user")
    }
}

#[async_trait]
impl RatingStore for Neo4jClient {
    async fn upsert_rating(
        &self,
        user_id: &str,
        movie_id: &str,
        rating: i64,
    ) -> StorageResult<Option<RatedMovie>> {
        let query = Query::new(queries::UPSERT_RATING.to_string())
            .param("userId", user_id)
            .param("movieId", movie_id)
            .param("rating", rating);

        let rows = self.run_in_transaction(AccessMode::Write, query).await?;

        debug!(user_id, movie_id, matched = !rows.is_empty(), "Upserted rating");
        decode_first(&rows, "movie")
    }

    async fn ratings_for_movie(
        &self,
        movie_id: &str,
        params: &ListParams<ReviewSort>,
    ) -> StorageResult<Vec<Review>> {
        let query = Query::new(queries::ratings_for_movie(params.sort, params.order))
            .param("movieId", movie_id)
            .param("skip", i64::from(params.skip))
            .param("limit", i64::from(params.limit));

        let rows = self.run_in_transaction(AccessMode::Read, query).await?;

        rows.iter().map(|row| decode(row, "review")).collect()
    }
}

#[async_trait]
impl FavoriteStore for Neo4jClient {
    async fn add_favorite(
        &self,
        user_id: &str,
        movie_id: &str,
    ) -> StorageResult<Option<FavoriteMovie>> {
        let query = Query::new(queries::ADD_FAVORITE.to_string())
            .param("userId", user_id)
            .param("movieId", movie_id);

        let rows = self.run_in_transaction(AccessMode::Write, query).await?;
        decode_first(&rows, "movie")
    }

    async fn remove_favorite(
        &self,
        user_id: &str,
        movie_id: &str,
    ) -> StorageResult<Option<FavoriteMovie>> {
        let query = Query::new(queries::REMOVE_FAVORITE.to_string())
            .param("userId", user_id)
            .param("movieId", movie_id);

        let rows = self.run_in_transaction(AccessMode::Write, query).await?;
        decode_first(&rows, "movie")
    }

    async fn favorites_for_user(
        &self,
        user_id: &str,
        params: &ListParams<MovieSort>,
    ) -> StorageResult<Vec<FavoriteMovie>> {
        let query = Query::new(queries::favorites_for_user(params.sort, params.order))
            .param("userId", user_id)
            .param("skip", i64::from(params.skip))
            .param("limit", i64::from(params.limit));

        let rows = self.run_in_transaction(AccessMode::Read, query).await?;

        rows.iter().map(|row| decode(row, "movie")).collect()
    }
}

#[async_trait]
impl MovieStore for Neo4jClient {
    async fn list_movies(
        &self,
        filter: &MovieFilter,
        params: &ListParams<MovieSort>,
        user_id: Option<&str>,
    ) -> StorageResult<Vec<FavoriteMovie>> {
        let mut query = Query::new(queries::movies(filter, params.sort, params.order))
            .param("userId", user_id)
            .param("skip", i64::from(params.skip))
            .param("limit", i64::from(params.limit));
        query = match filter {
            MovieFilter::All => query,
            MovieFilter::Genre(name) => query.param("name", name.as_str()),
            MovieFilter::Actor(person_id) | MovieFilter::Director(person_id) => {
                query.param("personId", person_id.as_str())
            }
        };

        let rows = self.run_in_transaction(AccessMode::Read, query).await?;

        debug!(?filter, count = rows.len(), "Listed movies");
        rows.iter().map(|row| decode(row, "movie")).collect()
    }

    async fn find_movie(
        &self,
        movie_id: &str,
        user_id: Option<&str>,
    ) -> StorageResult<Option<MovieDetails>> {
        let query = Query::new(queries::find_movie())
            .param("movieId", movie_id)
            .param("userId", user_id);

        let rows = self.run_in_transaction(AccessMode::Read, query).await?;
        decode_first(&rows, "movie")
    }

    async fn similar_movies(
        &self,
        movie_id: &str,
        limit: u32,
        skip: u32,
        user_id: Option<&str>,
    ) -> StorageResult<Vec<SimilarMovie>> {
        let query = Query::new(queries::similar_movies())
            .param("movieId", movie_id)
            .param("userId", user_id)
            .param("skip", i64::from(skip))
            .param("limit", i64::from(limit));

        let rows = self.run_in_transaction(AccessMode::Read, query).await?;
        rows.iter().map(|row| decode(row, "movie")).collect()
    }
}

#[async_trait]
impl GraphStore for Neo4jClient {
    async fn initialize(&self) -> StorageResult<()> {
        // Schema statements cannot share a transaction with data writes
        for statement in queries::SCHEMA_CONSTRAINTS {
            self.graph.run(Query::new((*statement).to_string())).await?;
        }
        info!("Ensured Neo4j user constraints");
        Ok(())
    }
}
