/// Database configuration and connection management for the SQL ledger backend
pub mod database;

/// Application settings loaded from config.toml
pub mod settings;

pub use settings::{AppConfig, LedgerSettings, OperatorAccount, ReferenceSettings, load_config};
