use std::sync::Arc;

use serde::de::DeserializeOwned;

use super::{
    Credits, Fetcher, GenresResponse, ImageUrls, MovieDetails, MoviesPage, SortOption, TmdbError,
};

/// What a gateway operation does with an error from the fetch primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Log the error and return the operation's empty/placeholder result.
    #[default]
    Degrade,
    /// Hand the error back to the caller.
    Strict,
}

/// The only component that talks to the movie API.
///
/// Every operation returns `Result`, but under [`ErrorPolicy::Degrade`] the
/// `Err` arm is never taken: listings collapse to [`MoviesPage::empty`] and
/// detail lookups to [`MovieDetails::placeholder`].
#[derive(Clone)]
pub struct MovieGateway {
    fetcher: Arc<dyn Fetcher>,
    images: ImageUrls,
    policy: ErrorPolicy,
}

impl MovieGateway {
    pub fn new(fetcher: Arc<dyn Fetcher>, images: ImageUrls) -> Self {
        MovieGateway {
            fetcher,
            images,
            policy: ErrorPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    pub fn images(&self) -> &ImageUrls {
        &self.images
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, TmdbError> {
        let value = self.fetcher.fetch(endpoint, params).await?;
        Ok(serde_json::from_value(value)?)
    }

    fn settle<T>(
        &self,
        result: Result<T, TmdbError>,
        what: &str,
        fallback: impl FnOnce() -> T,
    ) -> Result<T, TmdbError> {
        match (result, self.policy) {
            (Ok(value), _) => Ok(value),
            (Err(e), ErrorPolicy::Degrade) => {
                tracing::error!(error = %e, "failed to fetch {what}");
                Ok(fallback())
            }
            (Err(e), ErrorPolicy::Strict) => Err(e),
        }
    }

    async fn page(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        what: &str,
    ) -> Result<MoviesPage, TmdbError> {
        let result = self.get(endpoint, params).await;
        self.settle(result, what, MoviesPage::empty)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn genres(&self) -> Result<GenresResponse, TmdbError> {
        let result = self.get("/genre/movie/list", &[]).await;
        self.settle(result, "genres", GenresResponse::default)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn top_rated(&self, page: i64) -> Result<MoviesPage, TmdbError> {
        self.page("/movie/top_rated", &[("page", page.to_string())], "top rated movies")
            .await
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn popular(&self, page: i64) -> Result<MoviesPage, TmdbError> {
        self.page("/movie/popular", &[("page", page.to_string())], "popular movies")
            .await
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn movies_by_genre(
        &self,
        genre_id: i64,
        page: i64,
        sort_by: Option<SortOption>,
    ) -> Result<MoviesPage, TmdbError> {
        let params = [
            ("page", page.to_string()),
            ("with_genres", genre_id.to_string()),
            (
                "sort_by",
                sort_by.map(|s| s.as_str().to_string()).unwrap_or_default(),
            ),
        ];
        self.page(
            "/discover/movie",
            &params,
            &format!("movies for genre {genre_id}"),
        )
        .await
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn search(&self, query: &str, page: i64) -> Result<MoviesPage, TmdbError> {
        let params = [("query", query.to_string()), ("page", page.to_string())];
        self.page("/search/movie", &params, &format!("search results for {query:?}"))
            .await
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn similar(&self, movie_id: i64, page: i64) -> Result<MoviesPage, TmdbError> {
        self.page(
            &format!("/movie/{movie_id}/similar"),
            &[("page", page.to_string())],
            &format!("similar movies for {movie_id}"),
        )
        .await
    }

    /// Popular movies sharing the given genres.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn recommendations_by_genres(
        &self,
        genre_ids: &[i64],
        page: i64,
    ) -> Result<MoviesPage, TmdbError> {
        let with_genres = genre_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let params = [
            ("with_genres", with_genres.clone()),
            ("sort_by", SortOption::PopularityDesc.as_str().to_string()),
            ("page", page.to_string()),
        ];
        self.page(
            "/discover/movie",
            &params,
            &format!("recommendations for genres {with_genres}"),
        )
        .await
    }

    /// Under `Degrade`, a failed lookup yields a record for which
    /// [`MovieDetails::is_placeholder`] is true. Callers that render details
    /// should check it instead of showing the sentinel title.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn movie_details(&self, movie_id: i64) -> Result<MovieDetails, TmdbError> {
        let result = self.get(&format!("/movie/{movie_id}"), &[]).await;
        self.settle(result, &format!("details for movie {movie_id}"), || {
            MovieDetails::placeholder(movie_id)
        })
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn movie_credits(&self, movie_id: i64) -> Result<Credits, TmdbError> {
        let result = self.get(&format!("/movie/{movie_id}/credits"), &[]).await;
        self.settle(result, &format!("credits for movie {movie_id}"), || {
            Credits {
                id: movie_id,
                cast: vec![],
            }
        })
    }

    /// Details and credits fetched together. Fails if either half fails.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn movie_with_credits(
        &self,
        movie_id: i64,
    ) -> Result<(MovieDetails, Credits), TmdbError> {
        let (details, credits) =
            tokio::join!(self.movie_details(movie_id), self.movie_credits(movie_id));
        match (details, credits) {
            (Ok(details), Ok(credits)) => Ok((details, credits)),
            (Err(e), _) | (_, Err(e)) => {
                tracing::error!(error = %e, movie_id, "failed to get complete movie data");
                Err(e)
            }
        }
    }
}
