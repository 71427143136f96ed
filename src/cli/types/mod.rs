//! Type-safe wrappers and enums for football data.

pub mod ids;
pub mod position;
pub mod season;

pub use ids::{LeagueCode, PlayerId, TeamId};
pub use position::Position;
pub use season::Season;
