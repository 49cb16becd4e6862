//! cinegraph CLI - accounts, session tokens and movie ratings over Neo4j
//!
//! This binary provides the command-line interface for the cinegraph services.
//! Every command prints its result as JSON on stdout.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use cinegraph::init::{bootstrap, App};
use cinegraph::{storage_init, to_pretty_json};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use cinegraph_core::{ListParams, MovieSort, ReviewSort, DEFAULT_PAGE_LIMIT};
use cinegraph_services::decode_token;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "cinegraph")]
#[command(about = "User accounts, session tokens, ratings and the movie catalogue backed by Neo4j")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the graph schema constraints
    Init,
    /// Register a new user and print a session token
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: String,
    },
    /// Check credentials and print a session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Validate a session token and print its claims
    VerifyToken {
        token: String,
    },
    /// Rate a movie on behalf of a user
    Rate {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        movie_id: String,
        #[arg(long)]
        rating: i64,
    },
    /// List the ratings for a movie
    Ratings {
        movie_id: String,
        #[command(flatten)]
        page: PageArgs,
        /// Sort field: timestamp or rating
        #[arg(long, default_value = "timestamp")]
        sort: String,
    },
    /// Manage a user's favorite movies
    #[command(subcommand)]
    Favorites(FavoriteCommands),
    /// Browse the movie catalogue
    #[command(subcommand)]
    Movies(MovieCommands),
}

#[derive(Subcommand)]
enum MovieCommands {
    /// List movies, optionally by genre, actor or director
    List {
        /// Only movies in this genre
        #[arg(long, conflicts_with_all = ["actor", "director"])]
        genre: Option<String>,
        /// Only movies this person (tmdbId) acted in
        #[arg(long, conflicts_with = "director")]
        actor: Option<String>,
        /// Only movies this person (tmdbId) directed
        #[arg(long)]
        director: Option<String>,
        /// Flag the movies this user has favorited
        #[arg(long)]
        user_id: Option<String>,
        #[command(flatten)]
        page: PageArgs,
        /// Sort field: title, released or imdbRating
        #[arg(long, default_value = "title")]
        sort: String,
    },
    /// Show a movie with its cast, directors and genres
    Get {
        movie_id: String,
        #[arg(long)]
        user_id: Option<String>,
    },
    /// List movies similar to a movie
    Similar {
        movie_id: String,
        #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        skip: u32,
        #[arg(long)]
        user_id: Option<String>,
    },
}

#[derive(Subcommand)]
enum FavoriteCommands {
    /// Add a movie to a user's favorites
    Add {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        movie_id: String,
    },
    /// Remove a movie from a user's favorites
    Remove {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        movie_id: String,
    },
    /// List a user's favorite movies
    List {
        #[arg(long)]
        user_id: String,
        #[command(flatten)]
        page: PageArgs,
        /// Sort field: title, released or imdbRating
        #[arg(long, default_value = "title")]
        sort: String,
    },
}

#[derive(clap::Args)]
struct PageArgs {
    /// Sort direction: ASC or DESC
    #[arg(long, default_value = "ASC")]
    order: String,

    /// Maximum number of results
    #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
    limit: u32,

    /// Number of results to skip
    #[arg(long, default_value_t = 0)]
    skip: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose)?;

    let app = bootstrap(cli.config.as_deref()).await?;
    run(cli.command, &app).await
}

/// Initialize logging system
///
/// Logs go to stderr so stdout carries only command output.
fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "cinegraph={level},cinegraph_core={level},cinegraph_storage={level},cinegraph_services={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

async fn run(command: Commands, app: &App) -> Result<()> {
    let services = &app.services;

    let output = match command {
        Commands::Init => {
            storage_init::initialize_schema(app.store.as_ref()).await?;
            json!({ "initialized": true })
        }
        Commands::Register {
            email,
            password,
            name,
        } => {
            let payload = services.auth.register(&email, &password, &name).await?;
            serde_json::to_value(payload)?
        }
        Commands::Login { email, password } => {
            match services
                .auth
                .authenticate(&email, &password)
                .await?
                .into_payload()
            {
                Some(payload) => serde_json::to_value(payload)?,
                None => bail!("Invalid email or password"),
            }
        }
        Commands::VerifyToken { token } => {
            match decode_token(&token, &app.config.auth.jwt_secret) {
                Some(claims) => serde_json::to_value(claims)?,
                None => bail!("Token is invalid or expired"),
            }
        }
        Commands::Rate {
            user_id,
            movie_id,
            rating,
        } => {
            let movie = services.ratings.add(&user_id, &movie_id, rating).await?;
            serde_json::to_value(movie)?
        }
        Commands::Ratings {
            movie_id,
            page,
            sort,
        } => {
            let params =
                ListParams::<ReviewSort>::parse(&sort, &page.order, page.limit, page.skip)?;
            let reviews = services.ratings.for_movie(&movie_id, params).await?;
            info!(count = reviews.len(), "Listed ratings for movie {movie_id}");
            serde_json::to_value(reviews)?
        }
        Commands::Favorites(command) => run_favorites(command, app).await?,
        Commands::Movies(command) => run_movies(command, app).await?,
    };

    println!("{}", to_pretty_json(&output)?);
    Ok(())
}

async fn run_favorites(command: FavoriteCommands, app: &App) -> Result<serde_json::Value> {
    let favorites = &app.services.favorites;

    let value = match command {
        FavoriteCommands::Add { user_id, movie_id } => {
            serde_json::to_value(favorites.add(&user_id, &movie_id).await?)?
        }
        FavoriteCommands::Remove { user_id, movie_id } => {
            serde_json::to_value(favorites.remove(&user_id, &movie_id).await?)?
        }
        FavoriteCommands::List {
            user_id,
            page,
            sort,
        } => {
            let params =
                ListParams::<MovieSort>::parse(&sort, &page.order, page.limit, page.skip)?;
            serde_json::to_value(favorites.all(&user_id, params).await?)?
        }
    };

    Ok(value)
}

async fn run_movies(command: MovieCommands, app: &App) -> Result<serde_json::Value> {
    let movies = &app.services.movies;

    let value = match command {
        MovieCommands::List {
            genre,
            actor,
            director,
            user_id,
            page,
            sort,
        } => {
            let params =
                ListParams::<MovieSort>::parse(&sort, &page.order, page.limit, page.skip)?;
            let user_id = user_id.as_deref();
            let listed = match (genre, actor, director) {
                (Some(genre), _, _) => movies.by_genre(&genre, params, user_id).await?,
                (_, Some(actor), _) => movies.for_actor(&actor, params, user_id).await?,
                (_, _, Some(director)) => movies.for_director(&director, params, user_id).await?,
                _ => movies.all(params, user_id).await?,
            };
            info!(count = listed.len(), "Listed movies");
            serde_json::to_value(listed)?
        }
        MovieCommands::Get { movie_id, user_id } => {
            serde_json::to_value(movies.find_by_id(&movie_id, user_id.as_deref()).await?)?
        }
        MovieCommands::Similar {
            movie_id,
            limit,
            skip,
            user_id,
        } => serde_json::to_value(
            movies
                .similar(&movie_id, limit, skip, user_id.as_deref())
                .await?,
        )?,
    };

    Ok(value)
}
