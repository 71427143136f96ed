//! Season type. A season is identified by the year it starts in.

use crate::error::{FootballError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type-safe wrapper for a season's starting year.
///
/// Displays in the `2024-25` form used by league tables and accepts either
/// that form or the bare starting year when parsed.
///
/// ```rust
/// use football_analytics::Season;
///
/// let season: Season = "2024-25".parse().unwrap();
/// assert_eq!(season, Season::new(2024));
/// assert_eq!(season.to_string(), "2024-25");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Season(pub u16);

impl Season {
    pub fn new(start_year: u16) -> Self {
        Self(start_year)
    }

    pub fn as_u16(&self) -> u16 {
        self.0
    }
}

impl Default for Season {
    fn default() -> Self {
        Self(2024)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.0, (self.0 + 1) % 100)
    }
}

impl FromStr for Season {
    type Err = FootballError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || FootballError::InvalidSeason {
            season: s.to_string(),
        };

        let (start, end) = match s.trim().split_once('-') {
            Some((start, end)) => (start, Some(end)),
            None => (s.trim(), None),
        };

        let year: u16 = start.parse().map_err(|_| invalid())?;
        if !(1850..=2999).contains(&year) {
            return Err(invalid());
        }

        if let Some(end) = end {
            let end: u16 = end.parse().map_err(|_| invalid())?;
            let next = year + 1;
            if end != next && end != next % 100 {
                return Err(invalid());
            }
        }

        Ok(Self(year))
    }
}
