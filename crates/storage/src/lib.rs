#![forbid(unsafe_code)]

mod mapping;
pub mod repository;
pub mod sqlite;

pub use repository::{
    InMemoryRepository, StatisticsKey, StatisticsRepository, Storage, StorageError,
};
