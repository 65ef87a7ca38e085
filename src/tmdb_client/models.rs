use std::{fmt, str::FromStr};

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Genre {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct GenresResponse {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// Movie summary as returned inside paginated listings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Movie {
    pub id: i64,
    #[serde(deserialize_with = "de::null_as_default")]
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(deserialize_with = "de::null_as_default")]
    pub overview: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub release_date: String,
    pub vote_average: f64,
    pub vote_count: i64,
    pub genre_ids: Vec<i64>,
    pub popularity: f64,
    pub adult: bool,
    #[serde(deserialize_with = "de::null_as_default")]
    pub original_language: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub original_title: String,
    pub video: bool,
}

/// Paginated envelope shared by every listing endpoint.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MoviesPage {
    pub page: i64,
    #[serde(default)]
    pub results: Vec<Movie>,
    #[serde(default)]
    pub total_pages: i64,
    #[serde(default)]
    pub total_results: i64,
}

impl MoviesPage {
    /// The well-formed empty page substituted for a failed listing.
    pub fn empty() -> Self {
        MoviesPage {
            page: 1,
            results: vec![],
            total_pages: 0,
            total_results: 0,
        }
    }
}

pub const PLACEHOLDER_TITLE: &str = "Movie not found";
const PLACEHOLDER_OVERVIEW: &str = "Unable to load movie details";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct MovieDetails {
    pub id: i64,
    #[serde(deserialize_with = "de::null_as_default")]
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(deserialize_with = "de::null_as_default")]
    pub overview: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub release_date: String,
    pub vote_average: f64,
    pub vote_count: i64,
    pub popularity: f64,
    pub adult: bool,
    #[serde(deserialize_with = "de::null_as_default")]
    pub original_language: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub original_title: String,
    pub video: bool,
    pub genres: Vec<Genre>,
    #[serde(deserialize_with = "de::null_as_default")]
    pub runtime: i64,
    #[serde(deserialize_with = "de::null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub tagline: String,
    pub budget: i64,
    pub revenue: i64,
    #[serde(deserialize_with = "de::null_as_default")]
    pub homepage: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub imdb_id: String,
    #[serde(skip)]
    placeholder: bool,
}

impl MovieDetails {
    /// Synthetic record standing in for a detail lookup that failed.
    pub fn placeholder(movie_id: i64) -> Self {
        MovieDetails {
            id: movie_id,
            title: PLACEHOLDER_TITLE.to_string(),
            overview: PLACEHOLDER_OVERVIEW.to_string(),
            original_language: "en".to_string(),
            status: "Unknown".to_string(),
            placeholder: true,
            ..Default::default()
        }
    }

    /// True when this record was synthesized by a degraded lookup rather than
    /// returned by the API.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn genre_ids(&self) -> Vec<i64> {
        self.genres.iter().map(|g| g.id).collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Cast {
    pub adult: bool,
    pub gender: i64,
    pub id: i64,
    #[serde(deserialize_with = "de::null_as_default")]
    pub known_for_department: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub original_name: String,
    pub popularity: f64,
    pub profile_path: Option<String>,
    pub cast_id: i64,
    #[serde(deserialize_with = "de::null_as_default")]
    pub character: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub credit_id: String,
    pub order: i64,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Credits {
    pub id: i64,
    #[serde(default)]
    pub cast: Vec<Cast>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOption {
    PopularityDesc,
    PopularityAsc,
    ReleaseDateDesc,
    ReleaseDateAsc,
    VoteAverageDesc,
    VoteAverageAsc,
    TitleAsc,
    TitleDesc,
}

impl SortOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::PopularityDesc => "popularity.desc",
            SortOption::PopularityAsc => "popularity.asc",
            SortOption::ReleaseDateDesc => "release_date.desc",
            SortOption::ReleaseDateAsc => "release_date.asc",
            SortOption::VoteAverageDesc => "vote_average.desc",
            SortOption::VoteAverageAsc => "vote_average.asc",
            SortOption::TitleAsc => "title.asc",
            SortOption::TitleDesc => "title.desc",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let option = match s {
            "popularity.desc" => SortOption::PopularityDesc,
            "popularity.asc" => SortOption::PopularityAsc,
            "release_date.desc" => SortOption::ReleaseDateDesc,
            "release_date.asc" => SortOption::ReleaseDateAsc,
            "vote_average.desc" => SortOption::VoteAverageDesc,
            "vote_average.asc" => SortOption::VoteAverageAsc,
            "title.asc" => SortOption::TitleAsc,
            "title.desc" => SortOption::TitleDesc,
            other => return Err(format!("unknown sort option: {other}")),
        };
        Ok(option)
    }
}

/// Internal serde helpers
pub mod de {
    use serde::{Deserialize, Deserializer};

    /// TMDB sends `null` for some scalar fields (runtime, tagline, homepage)
    /// on sparse records; treat those like missing fields.
    pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }
}
