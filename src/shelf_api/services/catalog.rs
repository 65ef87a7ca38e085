use std::sync::Arc;

use poem_openapi::payload::Json;
use tokio::task::JoinSet;

use crate::{
    domain::mapping::{map_genre, map_movie, map_page},
    shelf_api::models::{
        ErrorDto, GenreDto, GenreListResponse, GenreMoviesDto, GenreMoviesResponse, GenreRowDto,
        HomeDto, HomeResponse, MoviePageResponse,
    },
    tmdb_client::{Genre, MovieGateway, MoviesPage, SortOption, TmdbError},
};

const HOME_TOP_RATED_LIMIT: usize = 12;
const HOME_GENRE_ROWS: usize = 6;
const HOME_GENRE_ROW_LIMIT: usize = 5;
const UNKNOWN_GENRE: &str = "Unknown Genre";

/// Browsing and search listings.
pub struct CatalogService<'a> {
    pub gateway: &'a Arc<MovieGateway>,
}

impl<'a> CatalogService<'a> {
    pub fn new(gateway: &'a Arc<MovieGateway>) -> Self {
        Self { gateway }
    }

    /// Top rated movies plus a short popular row for each of the first genres.
    /// A genre row that fails to load is left out.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn home(&self) -> HomeResponse {
        let (top_rated, genres) = tokio::join!(self.gateway.top_rated(1), self.gateway.genres());
        let (top_rated, genres) = match (top_rated, genres) {
            (Ok(top_rated), Ok(genres)) => (top_rated, genres.genres),
            (Err(e), _) | (_, Err(e)) => {
                tracing::error!(error = %e, "failed to load home page");
                return HomeResponse::BadGateway(Json(bad_gateway(&e)));
            }
        };

        let mut rows: JoinSet<(usize, Genre, Result<MoviesPage, TmdbError>)> = JoinSet::new();
        for (index, genre) in genres.into_iter().take(HOME_GENRE_ROWS).enumerate() {
            let gateway = Arc::clone(self.gateway);
            rows.spawn(async move {
                let page = gateway
                    .movies_by_genre(genre.id, 1, Some(SortOption::PopularityDesc))
                    .await;
                (index, genre, page)
            });
        }

        let images = self.gateway.images();
        let mut genre_rows = Vec::with_capacity(HOME_GENRE_ROWS);
        while let Some(joined) = rows.join_next().await {
            match joined {
                Ok((index, genre, Ok(page))) => {
                    let movies = page
                        .results
                        .iter()
                        .take(HOME_GENRE_ROW_LIMIT)
                        .map(|m| map_movie(images, m))
                        .collect();
                    genre_rows.push((
                        index,
                        GenreRowDto {
                            genre: map_genre(&genre),
                            movies,
                        },
                    ));
                }
                Ok((_, genre, Err(e))) => {
                    tracing::warn!(error = %e, genre_id = genre.id, "skipping genre row");
                }
                Err(e) => tracing::warn!(error = %e, "genre row task failed"),
            }
        }
        genre_rows.sort_by_key(|(index, _)| *index);

        HomeResponse::Ok(Json(HomeDto {
            top_rated: top_rated
                .results
                .iter()
                .take(HOME_TOP_RATED_LIMIT)
                .map(|m| map_movie(images, m))
                .collect(),
            genre_rows: genre_rows.into_iter().map(|(_, row)| row).collect(),
        }))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn genres(&self) -> GenreListResponse {
        match self.gateway.genres().await {
            Ok(resp) => GenreListResponse::Ok(Json(resp.genres.iter().map(map_genre).collect())),
            Err(e) => {
                tracing::error!(error = %e, "failed to list genres");
                GenreListResponse::BadGateway(Json(bad_gateway(&e)))
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn top_rated(&self, page: Option<i64>) -> MoviePageResponse {
        let page = match checked_page(page) {
            Ok(page) => page,
            Err(message) => return MoviePageResponse::BadRequest(Json(ErrorDto { message })),
        };
        self.respond(self.gateway.top_rated(page).await)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn popular(&self, page: Option<i64>) -> MoviePageResponse {
        let page = match checked_page(page) {
            Ok(page) => page,
            Err(message) => return MoviePageResponse::BadRequest(Json(ErrorDto { message })),
        };
        self.respond(self.gateway.popular(page).await)
    }

    /// One page of a genre's movies, labelled with the genre's name.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn by_genre(
        &self,
        genre_id: i64,
        page: Option<i64>,
        sort_by: Option<&str>,
    ) -> GenreMoviesResponse {
        let page = match checked_page(page) {
            Ok(page) => page,
            Err(message) => return GenreMoviesResponse::BadRequest(Json(ErrorDto { message })),
        };
        let sort_by = match sort_by.map(str::parse::<SortOption>).transpose() {
            Ok(sort_by) => sort_by,
            Err(message) => return GenreMoviesResponse::BadRequest(Json(ErrorDto { message })),
        };

        let (genres, movies) = tokio::join!(
            self.gateway.genres(),
            self.gateway.movies_by_genre(genre_id, page, sort_by)
        );
        let movies = match movies {
            Ok(movies) => movies,
            Err(e) => {
                tracing::error!(error = %e, genre_id, "failed to list genre movies");
                return GenreMoviesResponse::BadGateway(Json(bad_gateway(&e)));
            }
        };
        // a failed genre lookup only loses the name
        let name = match genres {
            Ok(resp) => resp
                .genres
                .into_iter()
                .find(|g| g.id == genre_id)
                .map(|g| g.name),
            Err(e) => {
                tracing::warn!(error = %e, "failed to look up genre name");
                None
            }
        };

        GenreMoviesResponse::Ok(Json(GenreMoviesDto {
            genre: GenreDto {
                id: genre_id,
                name: name.unwrap_or_else(|| UNKNOWN_GENRE.to_string()),
            },
            movies: map_page(self.gateway.images(), &movies),
        }))
    }

    /// A blank query is answered locally with an empty page.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn search(&self, query: Option<&str>, page: Option<i64>) -> MoviePageResponse {
        let page = match checked_page(page) {
            Ok(page) => page,
            Err(message) => return MoviePageResponse::BadRequest(Json(ErrorDto { message })),
        };
        match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(query) => self.respond(self.gateway.search(query, page).await),
            None => self.respond(Ok(MoviesPage::empty())),
        }
    }

    fn respond(&self, result: Result<MoviesPage, TmdbError>) -> MoviePageResponse {
        match result {
            Ok(page) => MoviePageResponse::Ok(Json(map_page(self.gateway.images(), &page))),
            Err(e) => {
                tracing::error!(error = %e, "failed to list movies");
                MoviePageResponse::BadGateway(Json(bad_gateway(&e)))
            }
        }
    }
}

fn bad_gateway(e: &TmdbError) -> ErrorDto {
    ErrorDto {
        message: format!("TMDB error: {}", e),
    }
}

/// Pages are 1-based; missing means the first page.
fn checked_page(page: Option<i64>) -> Result<i64, String> {
    match page.unwrap_or(1) {
        page if page >= 1 => Ok(page),
        page => Err(format!("page must be at least 1, got {page}")),
    }
}
