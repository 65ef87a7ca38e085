use std::{path::Path, sync::Arc};

use anyhow::Context;
use migration::MigratorTrait;
use movie_shelf::{
    ShelfResult,
    config::Config,
    shelf_api::ShelfApi,
    storage::{KeyValueStorage, ListStore, SeaOrmStorage, ThemeStore},
    tmdb_client::{ImageUrls, MovieGateway, TmdbClient},
};
use poem::{
    EndpointExt, Route, Server,
    listener::TcpListener,
    middleware::{Cors, Tracing as PoemTracing},
};
use poem_openapi::OpenApiService;
use sea_orm::Database;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt::SubscriberBuilder, prelude::*};

#[tokio::main]
async fn main() -> ShelfResult<()> {
    // Respect RUST_LOG if set, default to info for our crate and warn for deps.
    let default_filter = format!(
        "{}=info,poem=info,reqwest=warn,h2=warn",
        env!("CARGO_PKG_NAME")
    );
    let env_filter = std::env::var("RUST_LOG").unwrap_or(default_filter);
    SubscriberBuilder::default()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_target(false)
        .with_level(true)
        .pretty()
        .finish()
        .with(ErrorLayer::default())
        .init();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting Movie Shelf");
    // Load environment variables from .env files
    if Path::new(".env.local").exists() {
        dotenvy::from_filename(".env.local")?;
    } else if Path::new(".env").exists() {
        dotenvy::from_filename(".env")?;
    };
    let config = Config::load();
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let db_conn = Database::connect(&config.db_connection_string)
        .await
        .with_context(|| "Failed to connect to database")?;

    migration::Migrator::up(&db_conn, None)
        .await
        .with_context(|| "Failed to run database migrations")?;

    let client = TmdbClient::new(&config.tmdb_base_url)?.with_api_key(&config.tmdb_api_key);
    let has_api_key = client.has_api_key();
    if !has_api_key {
        tracing::warn!("TMDB_API_KEY is not set; every TMDB request will fail");
    }
    tracing::info!(tmdb_base = %config.tmdb_base_url, has_api_key, "configured TMDB client");

    let gateway = MovieGateway::new(
        Arc::new(client),
        ImageUrls::new(&config.tmdb_image_base_url),
    );
    let storage: Arc<dyn KeyValueStorage> = Arc::new(SeaOrmStorage::new(db_conn));
    let api = ShelfApi {
        gateway: Arc::new(gateway),
        lists: Arc::new(ListStore::new(storage.clone())),
        theme: Arc::new(ThemeStore::new(storage, config.system_theme())),
    };
    run_poem(api, &config.bind_addr).await
}

pub async fn run_poem(api: ShelfApi, bind_addr: &str) -> ShelfResult<()> {
    let version = env!("CARGO_PKG_VERSION");
    let api_service = OpenApiService::new(api, "Movie Shelf API", version)
        .server(format!("http://{}", bind_addr));
    let ui = api_service.rapidoc();
    let spec = api_service.spec();
    let route = Route::new()
        .nest("/", api_service)
        .nest("/ui", ui)
        .nest("/spec", poem::endpoint::make_sync(move |_| spec.clone()))
        .with(Cors::new())
        .with(PoemTracing);

    tracing::info!(%bind_addr, "starting HTTP server");
    Server::new(TcpListener::bind(bind_addr)).run(route).await?;
    Ok(())
}
