// Durable key/value storage behind the list store and theme preference

pub mod lists;
pub mod memory;
pub mod sqlite;
pub mod theme;

pub use lists::{ListStore, Subscription};
pub use memory::{MemoryStorage, UnavailableStorage};
pub use sqlite::SeaOrmStorage;
pub use theme::ThemeStore;

/// Small string values under fixed keys. Callers above this trait never
/// surface its errors.
#[async_trait::async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}
