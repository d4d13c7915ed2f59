pub mod config;
pub mod engine;
pub mod store;

pub use config::SyncConfig;
pub use engine::{SyncEngine, SyncError};
pub use store::{file_store::JsonFileStore, http_store::HttpRoomsStore, RoomsStore, StoreService};
