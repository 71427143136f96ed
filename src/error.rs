//! Error types for the football analytics engine

use thiserror::Error;


pub type Result<T> = std::result::Result<T, FootballError>;

#[derive(Error, Debug)]
pub enum FootballError {
    #[error("No {entity} found for id {id} in season {season}")]
    NotFound {
        entity: &'static str,
        id: String,
        season: String,
    },

    #[error("Storage unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Football API unavailable at {endpoint} after {attempts} attempt(s): {reason}")]
    ApiUnavailable {
        endpoint: String,
        attempts: u32,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Invalid position: {position}")]
    InvalidPosition { position: String },

    #[error("Invalid season: {season}")]
    InvalidSeason { season: String },

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl FootballError {
    /// Build a `NotFound` for an entity keyed by id and season.
    pub fn not_found(
        entity: &'static str,
        id: impl ToString,
        season: impl ToString,
    ) -> Self {
        FootballError::NotFound {
            entity,
            id: id.to_string(),
            season: season.to_string(),
        }
    }

    /// Only a live API outage may be papered over with stale cached data.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FootballError::ApiUnavailable { .. })
    }
}

impl From<rusqlite::Error> for FootballError {
    fn from(err: rusqlite::Error) -> Self {
        FootballError::StoreUnavailable {
            message: err.to_string(),
        }
    }
}
