//! # blunderbook-core
//!
//! Core library for blunderbook - a chess mistake journal.
//!
//! This library provides:
//! - Domain types for games and mistakes
//! - The insight engine (aggregates, trends, recommendations)
//! - In-memory mutations of the game collection
//! - A SQLite-backed record store
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through three layers:
//! - **Store:** the collection persisted as one JSON blob
//! - **Snapshot:** the `Vec<Game>` a host loads, mutates and saves back
//! - **Derived:** statistics and insight text computed from a snapshot
//!   (regenerable, optionally cached by content hash)
//!
//! ## Example
//!
//! ```rust,no_run
//! use blunderbook_core::analytics::generate_insights;
//! use blunderbook_core::{Config, Database, GameStore};
//!
//! let config = Config::load().expect("failed to load config");
//! let db = Database::open(&config.resolved_database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! let games = db.load().expect("failed to load games");
//! for line in generate_insights(&games) {
//!     println!("{}", line);
//! }
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::{Database, GameStore};
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod collection;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod logging;
pub mod types;
