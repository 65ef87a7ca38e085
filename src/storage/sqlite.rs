use anyhow::Context;
use entities::kv_entry;
use sea_orm::{DatabaseConnection, EntityTrait, Set, sea_query::OnConflict};

use super::KeyValueStorage;

/// Key/value rows in the `kv_entries` table.
#[derive(Debug, Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
}

impl SeaOrmStorage {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl KeyValueStorage for SeaOrmStorage {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let row = kv_entry::Entity::find_by_id(key.to_string())
            .one(&self.db)
            .await
            .with_context(|| format!("Failed to read key {key}"))?;
        Ok(row.map(|r| r.value))
    }

    #[tracing::instrument(level = "debug", skip(self, value))]
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let row = kv_entry::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
        };
        kv_entry::Entity::insert(row)
            .on_conflict(
                OnConflict::column(kv_entry::Column::Key)
                    .update_column(kv_entry::Column::Value)
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .with_context(|| format!("Failed to write key {key}"))?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        kv_entry::Entity::delete_by_id(key.to_string())
            .exec(&self.db)
            .await
            .with_context(|| format!("Failed to delete key {key}"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use migration::MigratorTrait;
    use sea_orm::Database;

    use super::*;

    async fn temp_storage() -> (SeaOrmStorage, std::path::PathBuf) {
        let path = std::env::temp_dir().join(format!("movie_shelf-{}.sqlite", uuid::Uuid::new_v4()));
        let url = format!("sqlite://{}?mode=rwc", path.display());
        let db = Database::connect(&url).await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        (SeaOrmStorage::new(db), path)
    }

    #[tokio::test]
    async fn set_get_overwrite_remove() {
        let (storage, path) = temp_storage().await;

        assert_eq!(storage.get("theme").await.unwrap(), None);
        storage.set("theme", "dark").await.unwrap();
        assert_eq!(storage.get("theme").await.unwrap().as_deref(), Some("dark"));
        storage.set("theme", "light").await.unwrap();
        assert_eq!(storage.get("theme").await.unwrap().as_deref(), Some("light"));
        storage.remove("theme").await.unwrap();
        assert_eq!(storage.get("theme").await.unwrap(), None);
        // removing an absent key is fine
        storage.remove("theme").await.unwrap();

        let _ = std::fs::remove_file(path);
    }
}
