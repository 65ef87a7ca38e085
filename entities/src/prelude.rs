pub use super::kv_entry::Entity as KvEntry;
