//! Database layer for blunderbook
//!
//! This module provides the storage layer using SQLite with:
//! - Schema migrations
//! - A key-value blob store holding the game collection
//! - A derived cache of generated insights

pub mod repo;
pub mod schema;

pub use repo::{CachedInsights, Database, GameStore, GAMES_KEY};
