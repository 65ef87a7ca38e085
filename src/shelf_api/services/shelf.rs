use std::sync::Arc;

use poem_openapi::payload::Json;
use tokio::task::JoinSet;

use crate::{
    domain::mapping::map_details_to_movie,
    shelf_api::models::{BookmarkStateDto, ErrorDto, ShelfDto, ShelfResponse},
    storage::ListStore,
    tmdb_client::{MovieDetails, MovieGateway, TmdbError},
};

/// The watch-later and recently-viewed shelves.
pub struct ShelfService<'a> {
    pub gateway: &'a Arc<MovieGateway>,
    pub lists: &'a ListStore,
}

impl<'a> ShelfService<'a> {
    pub fn new(gateway: &'a Arc<MovieGateway>, lists: &'a ListStore) -> Self {
        Self { gateway, lists }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn watch_later(&self) -> ShelfResponse {
        let ids = self.lists.bookmark_ids().await;
        self.resolve(ids).await
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn recently_viewed(&self) -> ShelfResponse {
        let ids = self.lists.viewed_ids().await;
        self.resolve(ids).await
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn set_bookmark(&self, movie_id: i64, bookmarked: bool) -> BookmarkStateDto {
        if bookmarked {
            self.lists.add_bookmark(movie_id).await;
        } else {
            self.lists.remove_bookmark(movie_id).await;
        }
        BookmarkStateDto {
            movie_id,
            bookmarked: self.lists.is_bookmarked(movie_id).await,
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn toggle_bookmark(&self, movie_id: i64) -> BookmarkStateDto {
        BookmarkStateDto {
            movie_id,
            bookmarked: self.lists.toggle_bookmark(movie_id).await,
        }
    }

    /// Fetch details for every id concurrently, keeping list order. Ids whose
    /// lookup degraded to a placeholder are listed but have no movie entry.
    async fn resolve(&self, ids: Vec<i64>) -> ShelfResponse {
        let mut lookups: JoinSet<(usize, Result<MovieDetails, TmdbError>)> = JoinSet::new();
        for (index, id) in ids.iter().copied().enumerate() {
            let gateway = Arc::clone(self.gateway);
            lookups.spawn(async move { (index, gateway.movie_details(id).await) });
        }

        let mut found: Vec<(usize, MovieDetails)> = Vec::with_capacity(ids.len());
        while let Some(joined) = lookups.join_next().await {
            match joined {
                Ok((index, Ok(details))) => {
                    if !details.is_placeholder() {
                        found.push((index, details));
                    }
                }
                Ok((_, Err(e))) => {
                    tracing::error!(error = %e, "failed to load shelf movie");
                    return ShelfResponse::BadGateway(Json(ErrorDto {
                        message: format!("TMDB error: {}", e),
                    }));
                }
                Err(e) => {
                    tracing::error!(error = %e, "shelf lookup task failed");
                    return ShelfResponse::BadGateway(Json(ErrorDto {
                        message: "Failed to load movies".to_string(),
                    }));
                }
            }
        }
        found.sort_by_key(|(index, _)| *index);

        let images = self.gateway.images();
        ShelfResponse::Ok(Json(ShelfDto {
            ids,
            movies: found
                .iter()
                .map(|(_, d)| map_details_to_movie(images, d))
                .collect(),
        }))
    }
}
