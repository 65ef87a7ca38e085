use std::{collections::HashMap, sync::Mutex};

use anyhow::anyhow;

use super::KeyValueStorage;

/// Process-local storage. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow!("memory storage lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow!("memory storage lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow!("memory storage lock poisoned"))?;
        values.remove(key);
        Ok(())
    }
}

/// Storage that is never there, e.g. when running without a database.
/// Every call fails; the list store turns that into empty reads and no-op
/// writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStorage;

#[async_trait::async_trait]
impl KeyValueStorage for UnavailableStorage {
    async fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
        Err(anyhow!("storage unavailable"))
    }

    async fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
        Err(anyhow!("storage unavailable"))
    }

    async fn remove(&self, _key: &str) -> anyhow::Result<()> {
        Err(anyhow!("storage unavailable"))
    }
}
