// Image URL derivation. Pure string building, no requests.

use std::fmt;

pub const PLACEHOLDER_MOVIE: &str = "/placeholder-movie.jpg";
pub const PLACEHOLDER_BACKDROP: &str = "/placeholder-backdrop.jpg";
pub const PLACEHOLDER_ACTOR: &str = "/placeholder-actor.jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Poster,
    Backdrop,
    Profile,
}

impl ImageKind {
    pub fn placeholder(&self) -> &'static str {
        match self {
            ImageKind::Poster => PLACEHOLDER_MOVIE,
            ImageKind::Backdrop => PLACEHOLDER_BACKDROP,
            ImageKind::Profile => PLACEHOLDER_ACTOR,
        }
    }

    pub fn default_size(&self) -> ImageSize {
        match self {
            ImageKind::Poster => ImageSize::W500,
            ImageKind::Backdrop => ImageSize::W1280,
            ImageKind::Profile => ImageSize::W185,
        }
    }
}

/// Size tiers understood by the image CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    W45,
    W185,
    W200,
    W300,
    W500,
    W780,
    W1280,
    H632,
    Original,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::W45 => "w45",
            ImageSize::W185 => "w185",
            ImageSize::W200 => "w200",
            ImageSize::W300 => "w300",
            ImageSize::W500 => "w500",
            ImageSize::W780 => "w780",
            ImageSize::W1280 => "w1280",
            ImageSize::H632 => "h632",
            ImageSize::Original => "original",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct ImageUrls {
    base_url: String,
}

impl ImageUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        ImageUrls {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `<base>/<size><path>`, or the placeholder for `kind` when there is no path.
    pub fn url(&self, kind: ImageKind, path: Option<&str>, size: ImageSize) -> String {
        match path.filter(|p| !p.is_empty()) {
            Some(path) => format!("{}/{}{}", self.base_url, size, path),
            None => kind.placeholder().to_string(),
        }
    }

    pub fn image_url(&self, path: Option<&str>, size: ImageSize) -> String {
        self.url(ImageKind::Poster, path, size)
    }

    pub fn backdrop_url(&self, path: Option<&str>, size: ImageSize) -> String {
        self.url(ImageKind::Backdrop, path, size)
    }

    pub fn profile_url(&self, path: Option<&str>, size: ImageSize) -> String {
        self.url(ImageKind::Profile, path, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_yields_placeholder() {
        let urls = ImageUrls::new("https://image.tmdb.org/t/p");
        assert_eq!(urls.image_url(None, ImageSize::W500), "/placeholder-movie.jpg");
        assert_eq!(
            urls.backdrop_url(None, ImageSize::Original),
            "/placeholder-backdrop.jpg"
        );
        assert_eq!(urls.profile_url(Some(""), ImageSize::W185), "/placeholder-actor.jpg");
    }

    #[test]
    fn present_path_is_joined_with_size() {
        let urls = ImageUrls::new("https://image.tmdb.org/t/p/");
        assert_eq!(
            urls.image_url(Some("/abc.jpg"), ImageSize::W500),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
        assert_eq!(
            urls.url(
                ImageKind::Backdrop,
                Some("/bd.jpg"),
                ImageKind::Backdrop.default_size()
            ),
            "https://image.tmdb.org/t/p/w1280/bd.jpg"
        );
    }
}
