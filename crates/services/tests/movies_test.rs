//! Movie catalogue tests against the in-memory store

mod common;

use anyhow::Result;
use cinegraph_core::{Error, FavoriteMovie, ListParams, Movie, MovieSort, Person, SortOrder};
use cinegraph_storage::MockNeo4jClient;
use common::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn rated(tmdb_id: &str, title: &str, released: &str, imdb_rating: Option<f64>) -> Movie {
    let mut movie = movie(tmdb_id, title, Some(released));
    if let Some(rating) = imdb_rating {
        movie.properties.insert("imdbRating".to_string(), json!(rating));
    }
    movie
}

fn person(tmdb_id: &str, name: &str) -> Person {
    let mut properties = serde_json::Map::new();
    properties.insert("name".to_string(), json!(name));
    Person {
        tmdb_id: tmdb_id.to_string(),
        properties,
    }
}

fn ids(movies: &[FavoriteMovie]) -> Vec<&str> {
    movies.iter().map(|m| m.movie.tmdb_id.as_str()).collect()
}

/// Heat and Collateral by Michael Mann, Casino by Scorsese, De Niro in Heat and Casino
fn seed_catalogue(store: &MockNeo4jClient) {
    store.insert_movie(rated("949", "Heat", "1995-12-15", Some(8.3)));
    store.insert_movie(rated("1538", "Collateral", "2004-08-05", Some(7.5)));
    store.insert_movie(rated("524", "Casino", "1995-11-22", Some(8.2)));
    store.insert_movie(rated("9999", "Untitled Crime Project", "2030-01-01", None));

    store.insert_person(person("1032", "Martin Scorsese"));
    store.insert_person(person("380", "Robert De Niro"));
    store.insert_person(person("638", "Michael Mann"));

    for id in ["949", "1538", "524", "9999"] {
        store.add_genre(id, "Crime");
    }
    store.add_genre("949", "Thriller");
    store.add_genre("1538", "Thriller");
    store.add_genre("524", "Drama");

    store.add_actor("380", "949", Some("Neil McCauley"));
    store.add_actor("380", "524", Some("Sam 'Ace' Rothstein"));
    store.add_director("638", "949");
    store.add_director("638", "1538");
    store.add_director("1032", "524");
}

#[tokio::test]
async fn test_all_movies_sorted_and_paginated() -> Result<()> {
    let (store, services) = setup();
    seed_catalogue(&store);

    let by_title = services.movies.all(ListParams::default(), None).await?;
    assert_eq!(ids(&by_title), vec!["524", "1538", "949", "9999"]);

    let params = ListParams::new(MovieSort::ImdbRating, SortOrder::Desc, 2, 0);
    let first = services.movies.all(params, None).await?;
    let second = services.movies.all(params.next_page(), None).await?;
    // The unrated movie has no imdbRating and is left out of this listing
    assert_eq!(ids(&first), vec!["949", "524"]);
    assert_eq!(ids(&second), vec!["1538"]);

    Ok(())
}

#[tokio::test]
async fn test_listings_by_genre_actor_and_director() -> Result<()> {
    let (store, services) = setup();
    seed_catalogue(&store);
    let params = ListParams::new(MovieSort::Released, SortOrder::Asc, 10, 0);

    let thrillers = services.movies.by_genre("Thriller", params, None).await?;
    assert_eq!(ids(&thrillers), vec!["949", "1538"]);

    let de_niro = services.movies.for_actor("380", params, None).await?;
    assert_eq!(ids(&de_niro), vec!["524", "949"]);

    let mann = services.movies.for_director("638", params, None).await?;
    assert_eq!(ids(&mann), vec!["949", "1538"]);

    assert!(services.movies.by_genre("Musical", params, None).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_favorite_flag_is_per_user() -> Result<()> {
    let (store, services) = setup();
    seed_catalogue(&store);
    let fan = services.auth.register("fan@example.com", "pw", "Fan").await?;
    let other = services.auth.register("other@example.com", "pw", "Other").await?;
    services.favorites.add(&fan.user_id, "949").await?;

    let for_fan = services.movies.for_director("638", ListParams::default(), Some(&fan.user_id)).await?;
    let flags: Vec<_> = for_fan.iter().map(|m| (m.movie.tmdb_id.as_str(), m.favorite)).collect();
    assert_eq!(flags, vec![("1538", false), ("949", true)]);

    let for_other = services.movies.for_director("638", ListParams::default(), Some(&other.user_id)).await?;
    assert!(for_other.iter().all(|m| !m.favorite));

    let anonymous = services.movies.all(ListParams::default(), None).await?;
    assert!(anonymous.iter().all(|m| !m.favorite));

    Ok(())
}

#[tokio::test]
async fn test_find_by_id_returns_details() -> Result<()> {
    let (store, services) = setup();
    seed_catalogue(&store);
    let user = services.auth.register("critic@example.com", "pw", "Critic").await?;
    services.ratings.add(&user.user_id, "949", 5).await?;
    services.favorites.add(&user.user_id, "949").await?;

    let heat = services.movies.find_by_id("949", Some(&user.user_id)).await?;
    assert_eq!(heat.movie.tmdb_id, "949");
    assert_eq!(heat.rating_count, 1);
    assert!(heat.favorite);
    assert_eq!(heat.actors.len(), 1);
    assert_eq!(heat.actors[0].person.tmdb_id, "380");
    assert_eq!(heat.actors[0].role.as_deref(), Some("Neil McCauley"));
    assert_eq!(heat.directors.len(), 1);
    assert_eq!(heat.directors[0].tmdb_id, "638");
    let genres: Vec<_> = heat.genres.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(genres, vec!["Crime", "Thriller"]);

    let value = serde_json::to_value(&heat)?;
    assert_eq!(value["ratingCount"], json!(1));
    assert_eq!(value["title"], json!("Heat"));

    let anonymous = services.movies.find_by_id("949", None).await?;
    assert!(!anonymous.favorite);

    Ok(())
}

#[tokio::test]
async fn test_find_by_id_unknown_movie_is_not_found() -> Result<()> {
    let (_store, services) = setup();

    let result = services.movies.find_by_id("0", None).await;
    assert!(matches!(result, Err(Error::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_similar_movies_scored_by_shared_connections() -> Result<()> {
    let (store, services) = setup();
    seed_catalogue(&store);
    let user = services.auth.register("sim@example.com", "pw", "Sim").await?;
    services.favorites.add(&user.user_id, "524").await?;

    let similar = services.movies.similar("949", 6, 0, Some(&user.user_id)).await?;
    let scored: Vec<_> = similar
        .iter()
        .map(|s| (s.movie.tmdb_id.as_str(), s.score, s.favorite))
        .collect();
    // Collateral shares Crime, Thriller and Mann; Casino shares Crime and De Niro
    assert_eq!(
        scored,
        vec![("1538", 7.5 * 3.0, false), ("524", 8.2 * 2.0, true)]
    );

    let skipped = services.movies.similar("949", 6, 1, None).await?;
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].movie.tmdb_id, "524");
    assert!(!skipped[0].favorite);

    assert!(services.movies.similar("0", 6, 0, None).await?.is_empty());

    Ok(())
}
