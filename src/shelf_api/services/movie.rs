use poem_openapi::payload::Json;

use crate::{
    domain::mapping::{map_cast, map_details, map_movie},
    shelf_api::models::{ErrorDto, MovieDetailResponse, MovieDto},
    storage::ListStore,
    tmdb_client::MovieGateway,
};

const CAST_LIMIT: usize = 12;
const SIMILAR_LIMIT: usize = 12;

/// The movie detail page.
pub struct MovieService<'a> {
    pub gateway: &'a MovieGateway,
    pub lists: &'a ListStore,
}

impl<'a> MovieService<'a> {
    pub fn new(gateway: &'a MovieGateway, lists: &'a ListStore) -> Self {
        Self { gateway, lists }
    }

    /// Loads details and credits, records the visit, then attaches similar
    /// movies. A degraded placeholder is reported as not found and is not
    /// recorded as viewed.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn details(&self, movie_id: i64) -> MovieDetailResponse {
        let (details, credits) = match self.gateway.movie_with_credits(movie_id).await {
            Ok(pair) => pair,
            Err(e) => {
                tracing::error!(error = %e, movie_id, "failed to load movie");
                return MovieDetailResponse::BadGateway(Json(ErrorDto {
                    message: format!("TMDB error: {}", e),
                }));
            }
        };
        if details.is_placeholder() {
            return MovieDetailResponse::NotFound(Json(ErrorDto {
                message: format!("Movie {movie_id} not found"),
            }));
        }

        self.lists.record_viewed(movie_id).await;

        let images = self.gateway.images();
        let cast = credits
            .cast
            .iter()
            .take(CAST_LIMIT)
            .map(|c| map_cast(images, c))
            .collect();
        let similar = self.similar(movie_id, &details.genre_ids()).await;
        let bookmarked = self.lists.is_bookmarked(movie_id).await;

        MovieDetailResponse::Ok(Json(map_details(
            images, &details, cast, similar, bookmarked,
        )))
    }

    async fn similar(&self, movie_id: i64, genre_ids: &[i64]) -> Vec<MovieDto> {
        if genre_ids.is_empty() {
            return vec![];
        }
        match self.gateway.recommendations_by_genres(genre_ids, 1).await {
            Ok(page) => page
                .results
                .iter()
                .filter(|m| m.id != movie_id)
                .take(SIMILAR_LIMIT)
                .map(|m| map_movie(self.gateway.images(), m))
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, movie_id, "failed to load similar movies");
                vec![]
            }
        }
    }
}
