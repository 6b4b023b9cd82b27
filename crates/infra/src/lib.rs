//! Infrastructure layer: storage contracts, in-memory storage, configuration.

pub mod config;
pub mod store;

pub use config::{ConfigError, IsolationSettings, ObservabilitySettings, Settings};
pub use store::{
    EntityStore, FilteredSession, InMemoryDatabase, InMemoryTable, RowFilter, Session,
    StoreError, TableView, UserStore,
};
