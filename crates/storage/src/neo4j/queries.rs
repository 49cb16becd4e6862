//! Cypher statements used by the Neo4j client
//!
//! Values are always bound as parameters. The only text spliced into a
//! statement is the ORDER BY property and direction, and both come from the
//! closed enums in `cinegraph_core::entities`.

use cinegraph_core::{MovieFilter, MovieSort, ReviewSort, SortOrder};

/// Constraint statements run by `initialize`, one per auto-commit transaction
pub const SCHEMA_CONSTRAINTS: &[&str] = &[
    "CREATE CONSTRAINT user_email_unique IF NOT EXISTS FOR (u:User) REQUIRE u.email IS UNIQUE",
    "CREATE CONSTRAINT user_id_unique IF NOT EXISTS FOR (u:User) REQUIRE u.userId IS UNIQUE",
];

pub const CREATE_USER: &str = "
    CREATE (u:User {
        userId: randomUuid(),
        email: $email,
        password: $password,
        name: $name
    })
    RETURN u { .userId, .email, .name, .password } AS user";

// LIMIT 2 is enough to tell "one" from "more than one"
pub const FIND_USER_BY_EMAIL: &str = "
    MATCH (u:User {email: $email})
    RETURN u { .userId, .email, .name, .password } AS user
    LIMIT 2";

pub const UPSERT_RATING: &str = "
    MATCH (u:User {userId: $userId})
    MATCH (m:Movie {tmdbId: $movieId})
    MERGE (u)-[r:RATED]->(m)
    SET r.rating = $rating,
        r.timestamp = timestamp()
    RETURN m { .*, rating: r.rating } AS movie";

pub const ADD_FAVORITE: &str = "
    MATCH (u:User {userId: $userId})
    MATCH (m:Movie {tmdbId: $movieId})
    MERGE (u)-[r:HAS_FAVORITE]->(m)
    ON CREATE SET r.createdAt = datetime()
    RETURN m { .*, favorite: true } AS movie";

pub const REMOVE_FAVORITE: &str = "
    MATCH (u:User {userId: $userId})-[r:HAS_FAVORITE]->(m:Movie {tmdbId: $movieId})
    DELETE r
    RETURN m { .*, favorite: false } AS movie";

/// Ratings into one movie; ties on the sort property fall back to `userId`
pub fn ratings_for_movie(sort: ReviewSort, order: SortOrder) -> String {
    format!(
        "MATCH (u:User)-[r:RATED]->(m:Movie {{tmdbId: $movieId}})
         RETURN r {{
             .rating,
             .timestamp,
             user: u {{ .userId, .name }}
         }} AS review
         ORDER BY r.`{}` {}, u.userId ASC
         SKIP $skip
         LIMIT $limit",
        sort.property(),
        order.keyword()
    )
}

/// A user's favorite movies; ties on the sort property fall back to `tmdbId`
pub fn favorites_for_user(sort: MovieSort, order: SortOrder) -> String {
    format!(
        "MATCH (u:User {{userId: $userId}})-[:HAS_FAVORITE]->(m:Movie)
         RETURN m {{ .*, favorite: true }} AS movie
         ORDER BY m.`{}` {}, m.tmdbId ASC
         SKIP $skip
         LIMIT $limit",
        sort.property(),
        order.keyword()
    )
}

// Every catalogue read starts by collecting the caller's favorite ids so each
// movie can be flagged in the same statement. A null `$userId` collects nothing.
const COLLECT_FAVORITES: &str = "
    OPTIONAL MATCH (:User {userId: $userId})-[:HAS_FAVORITE]->(fav:Movie)
    WITH collect(fav.tmdbId) AS favorites";

/// Catalogue listing for `filter`; movies without the sort property are left out
///
/// Binds `$userId`, `$skip`, `$limit`, plus `$name` for a genre or `$personId`
/// for an actor or director.
pub fn movies(filter: &MovieFilter, sort: MovieSort, order: SortOrder) -> String {
    let pattern = match filter {
        MovieFilter::All => "MATCH (m:Movie)",
        MovieFilter::Genre(_) => "MATCH (m:Movie)-[:IN_GENRE]->(:Genre {name: $name})",
        MovieFilter::Actor(_) => "MATCH (:Person {tmdbId: $personId})-[:ACTED_IN]->(m:Movie)",
        MovieFilter::Director(_) => "MATCH (:Person {tmdbId: $personId})-[:DIRECTED]->(m:Movie)",
    };

    format!(
        "{COLLECT_FAVORITES}
         {pattern}
         WHERE m.`{property}` IS NOT NULL
         RETURN m {{ .*, favorite: m.tmdbId IN favorites }} AS movie
         ORDER BY m.`{property}` {direction}, m.tmdbId ASC
         SKIP $skip
         LIMIT $limit",
        property = sort.property(),
        direction = order.keyword()
    )
}

pub fn find_movie() -> String {
    format!(
        "{COLLECT_FAVORITES}
         MATCH (m:Movie {{tmdbId: $movieId}})
         RETURN m {{
             .*,
             actors: [ (a:Person)-[r:ACTED_IN]->(m) | a {{ .*, role: r.role }} ],
             directors: [ (d:Person)-[:DIRECTED]->(m) | d {{ .* }} ],
             genres: [ (m)-[:IN_GENRE]->(g:Genre) | g {{ .name }} ],
             ratingCount: size([ (m)<-[:RATED]-() | 1 ]),
             favorite: m.tmdbId IN favorites
         }} AS movie
         LIMIT 1"
    )
}

/// Movies sharing genres, actors or directors with `$movieId`, best score first
pub fn similar_movies() -> String {
    format!(
        "{COLLECT_FAVORITES}
         MATCH (target:Movie {{tmdbId: $movieId}})-[:IN_GENRE|ACTED_IN|DIRECTED]-(shared)
               -[:IN_GENRE|ACTED_IN|DIRECTED]-(m:Movie)
         WHERE m <> target AND m.imdbRating IS NOT NULL
         WITH m, favorites, count(shared) AS inCommon
         WITH m, favorites, m.imdbRating * inCommon AS score
         RETURN m {{ .*, score: score, favorite: m.tmdbId IN favorites }} AS movie
         ORDER BY score DESC, m.tmdbId ASC
         SKIP $skip
         LIMIT $limit"
    )
}
