use std::sync::Arc;

use poem_openapi::{
    OpenApi,
    param::{Path, Query},
    payload::Json,
};

use super::models::{
    BookmarkResponse, GenreListResponse, GenreMoviesResponse, HomeResponse, MovieDetailResponse,
    MoviePageResponse, NoContentResponseDto, ShelfResponse, ThemeDto, ThemeResponse,
};
use super::services::{catalog::CatalogService, movie::MovieService, shelf::ShelfService};
use crate::{
    storage::{ListStore, ThemeStore},
    tmdb_client::MovieGateway,
};

pub struct ShelfApi {
    pub gateway: Arc<MovieGateway>,
    pub lists: Arc<ListStore>,
    pub theme: Arc<ThemeStore>,
}

#[OpenApi]
impl ShelfApi {
    // ===== catalog =====

    /// Landing page: top rated movies and popular picks per genre
    #[oai(path = "/v1/home", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn home(&self) -> HomeResponse {
        CatalogService::new(&self.gateway).home().await
    }

    /// All movie genres
    #[oai(path = "/v1/genres", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn list_genres(&self) -> GenreListResponse {
        CatalogService::new(&self.gateway).genres().await
    }

    /// Top rated movies
    #[oai(path = "/v1/movies/top-rated", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, page))]
    async fn top_rated(
        &self,
        /// Page number starting at 1
        Query(page): Query<Option<i64>>,
    ) -> MoviePageResponse {
        CatalogService::new(&self.gateway).top_rated(page).await
    }

    /// Popular movies
    #[oai(path = "/v1/movies/popular", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, page))]
    async fn popular(
        &self,
        /// Page number starting at 1
        Query(page): Query<Option<i64>>,
    ) -> MoviePageResponse {
        CatalogService::new(&self.gateway).popular(page).await
    }

    /// Movies in one genre
    #[oai(path = "/v1/genres/:genre_id/movies", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, genre_id, page, sort_by))]
    async fn genre_movies(
        &self,
        genre_id: Path<i64>,
        /// Page number starting at 1
        Query(page): Query<Option<i64>>,
        /// TMDB sort key, e.g. "popularity.desc" or "title.asc"
        Query(sort_by): Query<Option<String>>,
    ) -> GenreMoviesResponse {
        tracing::debug!(genre_id = genre_id.0, page = page.unwrap_or(1), sort_by = sort_by.as_deref().unwrap_or(""), "handling genre_movies");
        CatalogService::new(&self.gateway)
            .by_genre(genre_id.0, page, sort_by.as_deref())
            .await
    }

    /// Free-text movie search
    #[oai(path = "/v1/search", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, query, page))]
    async fn search(
        &self,
        Query(query): Query<Option<String>>,
        /// Page number starting at 1
        Query(page): Query<Option<i64>>,
    ) -> MoviePageResponse {
        CatalogService::new(&self.gateway)
            .search(query.as_deref(), page)
            .await
    }

    /// Movie details; also records the movie as recently viewed
    #[oai(path = "/v1/movies/:movie_id", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, movie_id))]
    async fn movie_details(&self, movie_id: Path<i64>) -> MovieDetailResponse {
        MovieService::new(&self.gateway, &self.lists)
            .details(movie_id.0)
            .await
    }

    // ===== watch later =====

    #[oai(path = "/v1/watch-later", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn watch_later(&self) -> ShelfResponse {
        ShelfService::new(&self.gateway, &self.lists)
            .watch_later()
            .await
    }

    #[oai(path = "/v1/watch-later/:movie_id", method = "put")]
    #[tracing::instrument(level = "debug", skip(self, movie_id))]
    async fn add_watch_later(&self, movie_id: Path<i64>) -> BookmarkResponse {
        let state = ShelfService::new(&self.gateway, &self.lists)
            .set_bookmark(movie_id.0, true)
            .await;
        BookmarkResponse::Ok(Json(state))
    }

    #[oai(path = "/v1/watch-later/:movie_id", method = "delete")]
    #[tracing::instrument(level = "debug", skip(self, movie_id))]
    async fn remove_watch_later(&self, movie_id: Path<i64>) -> BookmarkResponse {
        let state = ShelfService::new(&self.gateway, &self.lists)
            .set_bookmark(movie_id.0, false)
            .await;
        BookmarkResponse::Ok(Json(state))
    }

    #[oai(path = "/v1/watch-later/:movie_id/toggle", method = "post")]
    #[tracing::instrument(level = "debug", skip(self, movie_id))]
    async fn toggle_watch_later(&self, movie_id: Path<i64>) -> BookmarkResponse {
        let state = ShelfService::new(&self.gateway, &self.lists)
            .toggle_bookmark(movie_id.0)
            .await;
        BookmarkResponse::Ok(Json(state))
    }

    // ===== recently viewed =====

    #[oai(path = "/v1/recently-viewed", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn recently_viewed(&self) -> ShelfResponse {
        ShelfService::new(&self.gateway, &self.lists)
            .recently_viewed()
            .await
    }

    #[oai(path = "/v1/recently-viewed", method = "delete")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn clear_recently_viewed(&self) -> NoContentResponseDto {
        self.lists.clear_viewed().await;
        NoContentResponseDto::NoContent
    }

    // ===== theme =====

    #[oai(path = "/v1/theme", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn get_theme(&self) -> ThemeResponse {
        let theme = self.theme.current().await;
        ThemeResponse::Ok(Json(ThemeDto {
            theme: theme.to_string(),
        }))
    }

    #[oai(path = "/v1/theme/toggle", method = "post")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn toggle_theme(&self) -> ThemeResponse {
        let theme = self.theme.toggle().await;
        ThemeResponse::Ok(Json(ThemeDto {
            theme: theme.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use poem::{Route, http::StatusCode, test::TestClient};
    use poem_openapi::OpenApiService;
    use serde_json::json;

    use super::*;
    use crate::{
        domain::models::Theme,
        storage::MemoryStorage,
        tmdb_client::{ImageUrls, testing::StubFetcher},
    };

    fn stub() -> StubFetcher {
        StubFetcher::new()
            .with_json(
                "/genre/movie/list",
                json!({"genres": [{"id": 18, "name": "Drama"}, {"id": 80, "name": "Crime"}]}),
            )
            .with_json(
                "/movie/278",
                json!({
                    "id": 278,
                    "title": "The Shawshank Redemption",
                    "poster_path": "/shawshank.jpg",
                    "genres": [{"id": 18, "name": "Drama"}, {"id": 80, "name": "Crime"}],
                    "runtime": 142
                }),
            )
            .with_json(
                "/movie/278/credits",
                json!({"id": 278, "cast": [{"id": 504, "name": "Tim Robbins", "character": "Andy Dufresne", "order": 0}]}),
            )
            .with_json(
                "/discover/movie",
                json!({
                    "page": 1,
                    "results": [{"id": 278, "title": "The Shawshank Redemption"}, {"id": 238, "title": "The Godfather"}],
                    "total_pages": 1,
                    "total_results": 2
                }),
            )
            .with_status("/movie/404", 404)
            .with_status("/movie/404/credits", 404)
    }

    fn client() -> (TestClient<Route>, Arc<ListStore>, Arc<StubFetcher>) {
        client_with(stub())
    }

    fn client_with(stub: StubFetcher) -> (TestClient<Route>, Arc<ListStore>, Arc<StubFetcher>) {
        let stub = Arc::new(stub);
        let storage = Arc::new(MemoryStorage::new());
        let lists = Arc::new(ListStore::new(storage.clone()));
        let api = ShelfApi {
            gateway: Arc::new(MovieGateway::new(
                stub.clone(),
                ImageUrls::new("https://img.test/t/p"),
            )),
            lists: lists.clone(),
            theme: Arc::new(ThemeStore::new(storage, Theme::Light)),
        };
        let service = OpenApiService::new(api, "Movie Shelf", "test");
        (TestClient::new(Route::new().nest("/", service)), lists, stub)
    }

    #[tokio::test]
    async fn genres_are_listed() {
        let (cli, _, _) = client();
        let resp = cli.get("/v1/genres").send().await;
        resp.assert_status_is_ok();
        let json = resp.json().await;
        let value = json.value();
        let genres = value.array();
        genres.assert_len(2);
        genres.get(0).object().get("name").assert_string("Drama");
    }

    fn movies(ids: std::ops::RangeInclusive<i64>) -> serde_json::Value {
        let results: Vec<_> = ids
            .map(|id| json!({"id": id, "title": format!("Movie {id}")}))
            .collect();
        json!({"page": 1, "results": results, "total_pages": 3, "total_results": 60})
    }

    #[tokio::test]
    async fn home_slices_top_rated_and_genre_rows() {
        let genres: Vec<_> = (1..=8)
            .map(|id| json!({"id": id, "name": format!("Genre {id}")}))
            .collect();
        let (cli, _, stub) = client_with(
            StubFetcher::new()
                .with_json("/genre/movie/list", json!({"genres": genres}))
                .with_json("/movie/top_rated", movies(1..=20))
                .with_json("/discover/movie", movies(100..=119)),
        );

        let resp = cli.get("/v1/home").send().await;
        resp.assert_status_is_ok();
        let json = resp.json().await;
        let value = json.value();
        let home = value.object();
        home.get("top_rated").array().assert_len(12);
        let rows_value = home.get("genre_rows");
        let rows = rows_value.array();
        rows.assert_len(6);
        for index in 0..6 {
            let row_value = rows.get(index);
            let row = row_value.object();
            row.get("genre").object().get("id").assert_i64(index as i64 + 1);
            row.get("movies").array().assert_len(5);
        }

        let discover = stub.calls_to("/discover/movie");
        assert_eq!(discover.len(), 6);
        assert!(
            discover
                .iter()
                .all(|c| c.param("sort_by") == Some("popularity.desc"))
        );
    }

    #[tokio::test]
    async fn home_without_genres_has_no_rows() {
        let (cli, _, _) = client_with(
            StubFetcher::new()
                .with_json("/genre/movie/list", json!({"genres": []}))
                .with_json("/movie/top_rated", movies(1..=3)),
        );
        let resp = cli.get("/v1/home").send().await;
        resp.assert_status_is_ok();
        let json = resp.json().await;
        let value = json.value();
        let home = value.object();
        home.get("top_rated").array().assert_len(3);
        home.get("genre_rows").array().assert_len(0);
    }

    #[tokio::test]
    async fn genre_movies_carry_the_genre_name() {
        let (cli, _, _) = client();
        let resp = cli.get("/v1/genres/80/movies").send().await;
        resp.assert_status_is_ok();
        let json = resp.json().await;
        let value = json.value();
        let body = value.object();
        body.get("genre").object().get("name").assert_string("Crime");
        body.get("movies").object().get("results").array().assert_len(2);

        let resp = cli.get("/v1/genres/9999/movies").send().await;
        resp.json()
            .await
            .value()
            .object()
            .get("genre")
            .object()
            .get("name")
            .assert_string("Unknown Genre");
    }

    #[tokio::test]
    async fn failed_listing_degrades_to_empty_page() {
        let (cli, _, _) = client();
        let resp = cli.get("/v1/movies/popular").send().await;
        resp.assert_status_is_ok();
        let json = resp.json().await;
        let value = json.value();
        let page = value.object();
        page.get("page").assert_i64(1);
        page.get("total_results").assert_i64(0);
        page.get("results").array().assert_len(0);
    }

    #[tokio::test]
    async fn bad_sort_and_page_are_rejected() {
        let (cli, _, _) = client();
        cli.get("/v1/genres/18/movies")
            .query("sort_by", &"rating")
            .send()
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        cli.get("/v1/movies/top-rated")
            .query("page", &0)
            .send()
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn blank_search_does_not_reach_upstream() {
        let (cli, _, stub) = client();
        let resp = cli.get("/v1/search").query("query", &"  ").send().await;
        resp.assert_status_is_ok();
        assert!(stub.calls_to("/search/movie").is_empty());
    }

    #[tokio::test]
    async fn movie_details_record_view_and_exclude_self_from_similar() {
        let (cli, lists, _) = client();
        lists.add_bookmark(278).await;

        let resp = cli.get("/v1/movies/278").send().await;
        resp.assert_status_is_ok();
        let json = resp.json().await;
        let value = json.value();
        let movie = value.object();
        movie.get("title").assert_string("The Shawshank Redemption");
        movie
            .get("poster_url")
            .assert_string("https://img.test/t/p/w500/shawshank.jpg");
        movie.get("bookmarked").assert_bool(true);
        movie.get("cast").array().assert_len(1);
        let similar_value = movie.get("similar");
        let similar = similar_value.array();
        similar.assert_len(1);
        similar.get(0).object().get("id").assert_i64(238);

        assert_eq!(lists.viewed_ids().await, vec![278]);
    }

    #[tokio::test]
    async fn placeholder_details_are_not_found_and_not_recorded() {
        let (cli, lists, _) = client();
        cli.get("/v1/movies/404")
            .send()
            .await
            .assert_status(StatusCode::NOT_FOUND);
        assert!(lists.viewed_ids().await.is_empty());
    }

    #[tokio::test]
    async fn watch_later_toggle_and_listing() {
        let (cli, _, _) = client();

        let resp = cli.post("/v1/watch-later/278/toggle").send().await;
        resp.assert_status_is_ok();
        resp.json()
            .await
            .value()
            .object()
            .get("bookmarked")
            .assert_bool(true);

        cli.put("/v1/watch-later/404").send().await.assert_status_is_ok();

        let resp = cli.get("/v1/watch-later").send().await;
        resp.assert_status_is_ok();
        let json = resp.json().await;
        let value = json.value();
        let shelf = value.object();
        shelf.get("ids").array().assert_len(2);
        let movies_value = shelf.get("movies");
        let movies = movies_value.array();
        movies.assert_len(1);
        movies.get(0).object().get("id").assert_i64(278);

        let resp = cli.delete("/v1/watch-later/278").send().await;
        resp.json()
            .await
            .value()
            .object()
            .get("bookmarked")
            .assert_bool(false);
    }

    #[tokio::test]
    async fn recently_viewed_can_be_cleared() {
        let (cli, lists, _) = client();
        lists.record_viewed(278).await;

        let resp = cli.get("/v1/recently-viewed").send().await;
        resp.json()
            .await
            .value()
            .object()
            .get("ids")
            .array()
            .assert_len(1);

        cli.delete("/v1/recently-viewed")
            .send()
            .await
            .assert_status(StatusCode::NO_CONTENT);
        assert!(lists.viewed_ids().await.is_empty());
    }

    #[tokio::test]
    async fn theme_toggles() {
        let (cli, _, _) = client();
        let resp = cli.get("/v1/theme").send().await;
        resp.json()
            .await
            .value()
            .object()
            .get("theme")
            .assert_string("light");

        let resp = cli.post("/v1/theme/toggle").send().await;
        resp.json()
            .await
            .value()
            .object()
            .get("theme")
            .assert_string("dark");
    }
}
