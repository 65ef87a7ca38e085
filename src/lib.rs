pub mod config;
pub mod domain;
pub mod search;
pub mod shelf_api;
pub mod storage;
pub mod tmdb_client;
pub mod watchers;

pub type ShelfResult<T> = anyhow::Result<T>;
