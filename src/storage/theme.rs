use std::sync::Arc;

use super::KeyValueStorage;
use crate::domain::models::Theme;

pub const THEME_KEY: &str = "theme";

/// Persisted light/dark preference, falling back to the system default
/// while unset.
pub struct ThemeStore {
    storage: Arc<dyn KeyValueStorage>,
    system_default: Theme,
}

impl ThemeStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>, system_default: Theme) -> Self {
        Self {
            storage,
            system_default,
        }
    }

    pub async fn current(&self) -> Theme {
        match self.storage.get(THEME_KEY).await {
            Ok(Some(raw)) => raw.parse::<Theme>().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ignoring stored theme");
                self.system_default
            }),
            Ok(None) => self.system_default,
            Err(e) => {
                tracing::warn!(error = %format!("{:?}", e), "failed to read theme");
                self.system_default
            }
        }
    }

    /// Flip and persist. Returns the new theme even if it could not be saved.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn toggle(&self) -> Theme {
        let next = self.current().await.flipped();
        if let Err(e) = self.storage.set(THEME_KEY, next.as_str()).await {
            tracing::warn!(error = %format!("{:?}", e), "failed to save theme");
        }
        next
    }
}
