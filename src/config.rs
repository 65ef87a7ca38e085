use crate::domain::models::Theme;

#[derive(Debug)]
pub struct Config {
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub tmdb_image_base_url: String,
    pub db_connection_string: String,
    pub bind_addr: String,
    pub system_theme: String,
}

const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const DEFAULT_TMDB_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
const DEFAULT_DB_CONNECTION_STRING: &str = "sqlite://db.sqlite?mode=rwc";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

impl Config {
    pub fn load() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.into());
        Config {
            tmdb_api_key: lookup("TMDB_API_KEY").unwrap_or_default(),
            tmdb_base_url: var("TMDB_BASE_URL", DEFAULT_TMDB_BASE_URL),
            tmdb_image_base_url: var("TMDB_IMAGE_BASE_URL", DEFAULT_TMDB_IMAGE_BASE_URL),
            db_connection_string: var("DB_CONNECTION_STRING", DEFAULT_DB_CONNECTION_STRING),
            bind_addr: var("BIND_ADDR", DEFAULT_BIND_ADDR),
            system_theme: var("SYSTEM_THEME", Theme::default().as_str()),
        }
    }

    /// A missing API key is not an error here; the first fetch reports it.
    pub fn validate(&self) -> Result<(), String> {
        if self.tmdb_base_url.is_empty() {
            return Err("TMDB_BASE_URL is missing".into());
        }
        if self.tmdb_image_base_url.is_empty() {
            return Err("TMDB_IMAGE_BASE_URL is missing".into());
        }
        if self.db_connection_string.is_empty() {
            return Err("DB_CONNECTION_STRING is missing".into());
        }
        if self.bind_addr.is_empty() {
            return Err("BIND_ADDR is missing".into());
        }
        self.system_theme
            .parse::<Theme>()
            .map_err(|e| format!("Invalid SYSTEM_THEME: {}", e))?;
        Ok(())
    }

    pub fn system_theme(&self) -> Theme {
        self.system_theme.parse().unwrap_or_default()
    }
}
