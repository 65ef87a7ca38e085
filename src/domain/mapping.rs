// Mapping from TMDB payloads to the DTOs our API returns

use crate::{
    shelf_api::models::{CastDto, GenreDto, MovieDetailDto, MovieDto, MoviePageDto},
    tmdb_client::{Cast, Genre, ImageKind, ImageUrls, Movie, MovieDetails, MoviesPage},
};

pub fn map_genre(g: &Genre) -> GenreDto {
    GenreDto {
        id: g.id,
        name: g.name.clone(),
    }
}

pub fn map_movie(images: &ImageUrls, m: &Movie) -> MovieDto {
    MovieDto {
        id: m.id,
        title: m.title.clone(),
        overview: m.overview.clone(),
        release_date: m.release_date.clone(),
        vote_average: m.vote_average,
        vote_count: m.vote_count,
        popularity: m.popularity,
        genre_ids: m.genre_ids.clone(),
        poster_url: poster(images, m.poster_path.as_deref()),
        backdrop_url: backdrop(images, m.backdrop_path.as_deref()),
    }
}

pub fn map_page(images: &ImageUrls, page: &MoviesPage) -> MoviePageDto {
    MoviePageDto {
        page: page.page,
        results: page.results.iter().map(|m| map_movie(images, m)).collect(),
        total_pages: page.total_pages,
        total_results: page.total_results,
    }
}

/// Summary view of a detail record, as listed on the watch-later and
/// recently-viewed shelves.
pub fn map_details_to_movie(images: &ImageUrls, d: &MovieDetails) -> MovieDto {
    MovieDto {
        id: d.id,
        title: d.title.clone(),
        overview: d.overview.clone(),
        release_date: d.release_date.clone(),
        vote_average: d.vote_average,
        vote_count: d.vote_count,
        popularity: d.popularity,
        genre_ids: d.genre_ids(),
        poster_url: poster(images, d.poster_path.as_deref()),
        backdrop_url: backdrop(images, d.backdrop_path.as_deref()),
    }
}

pub fn map_cast(images: &ImageUrls, c: &Cast) -> CastDto {
    CastDto {
        id: c.id,
        name: c.name.clone(),
        character: c.character.clone(),
        order: c.order,
        profile_url: images.url(
            ImageKind::Profile,
            c.profile_path.as_deref(),
            ImageKind::Profile.default_size(),
        ),
    }
}

pub fn map_details(
    images: &ImageUrls,
    d: &MovieDetails,
    cast: Vec<CastDto>,
    similar: Vec<MovieDto>,
    bookmarked: bool,
) -> MovieDetailDto {
    MovieDetailDto {
        id: d.id,
        title: d.title.clone(),
        tagline: d.tagline.clone(),
        overview: d.overview.clone(),
        release_date: d.release_date.clone(),
        runtime: d.runtime,
        status: d.status.clone(),
        vote_average: d.vote_average,
        vote_count: d.vote_count,
        genres: d.genres.iter().map(map_genre).collect(),
        poster_url: poster(images, d.poster_path.as_deref()),
        backdrop_url: backdrop(images, d.backdrop_path.as_deref()),
        budget: d.budget,
        revenue: d.revenue,
        homepage: d.homepage.clone(),
        imdb_id: d.imdb_id.clone(),
        cast,
        similar,
        bookmarked,
    }
}

fn poster(images: &ImageUrls, path: Option<&str>) -> String {
    images.url(ImageKind::Poster, path, ImageKind::Poster.default_size())
}

fn backdrop(images: &ImageUrls, path: Option<&str>) -> String {
    images.url(ImageKind::Backdrop, path, ImageKind::Backdrop.default_size())
}
