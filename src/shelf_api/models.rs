use poem_openapi::{ApiResponse, Object, payload::Json};

#[derive(Debug, Clone, Object)]
pub struct GenreDto {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Object)]
pub struct MovieDto {
    pub id: i64,
    pub title: String,
    pub overview: String,
    pub release_date: String,
    pub vote_average: f64,
    pub vote_count: i64,
    pub popularity: f64,
    pub genre_ids: Vec<i64>,
    pub poster_url: String,
    pub backdrop_url: String,
}

#[derive(Debug, Clone, Object)]
pub struct MoviePageDto {
    pub page: i64,
    pub results: Vec<MovieDto>,
    pub total_pages: i64,
    pub total_results: i64,
}

#[derive(Debug, Clone, Object)]
pub struct GenreMoviesDto {
    /// Named "Unknown Genre" when the id is not in the genre list
    pub genre: GenreDto,
    pub movies: MoviePageDto,
}

#[derive(Debug, Clone, Object)]
pub struct GenreRowDto {
    pub genre: GenreDto,
    pub movies: Vec<MovieDto>,
}

#[derive(Debug, Clone, Object)]
pub struct HomeDto {
    pub top_rated: Vec<MovieDto>,
    /// Most popular movies for the leading genres
    pub genre_rows: Vec<GenreRowDto>,
}

#[derive(Debug, Clone, Object)]
pub struct CastDto {
    pub id: i64,
    pub name: String,
    pub character: String,
    pub order: i64,
    pub profile_url: String,
}

#[derive(Debug, Clone, Object)]
pub struct MovieDetailDto {
    pub id: i64,
    pub title: String,
    pub tagline: String,
    pub overview: String,
    pub release_date: String,
    /// Minutes, 0 when unknown
    pub runtime: i64,
    pub status: String,
    pub vote_average: f64,
    pub vote_count: i64,
    pub genres: Vec<GenreDto>,
    pub poster_url: String,
    pub backdrop_url: String,
    pub budget: i64,
    pub revenue: i64,
    pub homepage: String,
    pub imdb_id: String,
    /// Top billed cast
    pub cast: Vec<CastDto>,
    /// Popular movies sharing this movie's genres
    pub similar: Vec<MovieDto>,
    /// Whether the movie is on the watch-later list
    pub bookmarked: bool,
}

#[derive(Debug, Clone, Object)]
pub struct ShelfDto {
    /// Ids in list order
    pub ids: Vec<i64>,
    /// Details for every id that could be resolved
    pub movies: Vec<MovieDto>,
}

#[derive(Debug, Clone, Object)]
pub struct BookmarkStateDto {
    pub movie_id: i64,
    pub bookmarked: bool,
}

#[derive(Debug, Clone, Object)]
pub struct ThemeDto {
    /// "light" or "dark"
    pub theme: String,
}

#[derive(Debug, Clone, Object)]
pub struct ErrorDto {
    /// Human-readable error message
    pub message: String,
}

impl From<String> for ErrorDto {
    fn from(message: String) -> Self {
        ErrorDto { message }
    }
}

#[derive(ApiResponse)]
pub enum GenreListResponse {
    /// Genres successfully retrieved
    #[oai(status = 200)]
    Ok(Json<Vec<GenreDto>>),

    /// Upstream TMDB error
    #[oai(status = 502)]
    BadGateway(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum MoviePageResponse {
    /// One page of movies
    #[oai(status = 200)]
    Ok(Json<MoviePageDto>),

    /// Invalid paging or sort parameters
    #[oai(status = 400)]
    BadRequest(Json<ErrorDto>),

    /// Upstream TMDB error
    #[oai(status = 502)]
    BadGateway(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum GenreMoviesResponse {
    /// The genre and one page of its movies
    #[oai(status = 200)]
    Ok(Json<GenreMoviesDto>),

    /// Invalid paging or sort parameters
    #[oai(status = 400)]
    BadRequest(Json<ErrorDto>),

    /// Upstream TMDB error
    #[oai(status = 502)]
    BadGateway(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum HomeResponse {
    /// Landing page sections
    #[oai(status = 200)]
    Ok(Json<HomeDto>),

    /// Upstream TMDB error
    #[oai(status = 502)]
    BadGateway(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum MovieDetailResponse {
    /// Movie details with cast and similar movies
    #[oai(status = 200)]
    Ok(Json<MovieDetailDto>),

    /// Movie could not be loaded
    #[oai(status = 404)]
    NotFound(Json<ErrorDto>),

    /// Upstream TMDB error
    #[oai(status = 502)]
    BadGateway(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum ShelfResponse {
    /// List ids with resolved movies
    #[oai(status = 200)]
    Ok(Json<ShelfDto>),

    /// Upstream TMDB error
    #[oai(status = 502)]
    BadGateway(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum BookmarkResponse {
    /// Membership after the change
    #[oai(status = 200)]
    Ok(Json<BookmarkStateDto>),
}

#[derive(ApiResponse)]
pub enum NoContentResponseDto {
    /// Empty 204 response
    #[oai(status = 204)]
    NoContent,
}

#[derive(ApiResponse)]
pub enum ThemeResponse {
    /// Current theme
    #[oai(status = 200)]
    Ok(Json<ThemeDto>),
}
