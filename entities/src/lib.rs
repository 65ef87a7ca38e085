pub mod kv_entry;
pub mod prelude;
