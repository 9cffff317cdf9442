#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    AttemptKey, AttemptRecord, AttemptRepository, InMemoryRepository, Storage, StorageError,
};
