//! Storage layer for persisted season records
//!
//! This module provides a clean abstraction over the SQLite database,
//! organized into logical components:
//! - `models`: Data structures
//! - `schema`: Database connection and schema management
//! - `queries`: Read-only lookups for teams, players and matches
//! - `analysis`: Season-wide aggregates
//! - `ingest`: Writes used to seed and re-sync the store

pub mod analysis;
pub mod ingest;
pub mod models;
pub mod queries;
pub mod schema;


// Re-export the main types and database struct for easy access
pub use models::*;
pub use schema::FootballDatabase;
