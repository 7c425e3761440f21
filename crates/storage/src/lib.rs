#![forbid(unsafe_code)]

pub mod kv;

pub use kv::{InMemoryStore, JsonFileStore, KeyValueStore, StorageError};
