//! Football playing positions.

use crate::error::FootballError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Broad playing position of a footballer.
///
/// Stored sources use many labels for the same role (the API reports
/// `Centre-Forward` or `Offence`, the local sample data uses Spanish labels
/// such as `Delantero Centro`), so parsing folds them onto four groups.
///
/// # Examples
///
/// ```rust
/// use football_analytics::Position;
///
/// assert_eq!("Centre-Back".parse::<Position>().unwrap(), Position::Defender);
/// assert_eq!("Extremo Izquierdo".parse::<Position>().unwrap(), Position::Forward);
/// assert_eq!(Position::Midfielder.to_string(), "midfielder");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];

    /// Canonical label, also used as the stored column value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "goalkeeper",
            Position::Defender => "defender",
            Position::Midfielder => "midfielder",
            Position::Forward => "forward",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = FootballError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_lowercase();

        // Midfield is checked before defence so "Defensive Midfield" lands in midfield.
        let position = match label.as_str() {
            "gk" | "g" | "goalkeeper" | "keeper" | "portero" => Position::Goalkeeper,
            "df" | "d" | "defender" | "defence" | "defense" => Position::Defender,
            "mf" | "m" | "midfielder" | "midfield" => Position::Midfielder,
            "fw" | "f" | "forward" | "offence" | "attacker" | "striker" => Position::Forward,
            other if other.contains("goalkeeper") || other.contains("portero") => {
                Position::Goalkeeper
            }
            other
                if other.contains("midfield")
                    || other.contains("centrocampista")
                    || other.contains("mediocentro")
                    || other.contains("mediapunta")
                    || other.contains("pivote") =>
            {
                Position::Midfielder
            }
            other
                if other.contains("forward")
                    || other.contains("winger")
                    || other.contains("delantero")
                    || other.contains("extremo") =>
            {
                Position::Forward
            }
            other
                if other.contains("back")
                    || other.contains("defen")
                    || other.contains("lateral")
                    || other.contains("central") =>
            {
                Position::Defender
            }
            _ => {
                return Err(FootballError::InvalidPosition {
                    position: s.to_string(),
                })
            }
        };

        Ok(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_position_labels() {
        assert_eq!("Goalkeeper".parse::<Position>().unwrap(), Position::Goalkeeper);
        assert_eq!("Defence".parse::<Position>().unwrap(), Position::Defender);
        assert_eq!("Left-Back".parse::<Position>().unwrap(), Position::Defender);
        assert_eq!("Midfield".parse::<Position>().unwrap(), Position::Midfielder);
        assert_eq!(
            "Defensive Midfield".parse::<Position>().unwrap(),
            Position::Midfielder
        );
        assert_eq!("Offence".parse::<Position>().unwrap(), Position::Forward);
        assert_eq!("Right Winger".parse::<Position>().unwrap(), Position::Forward);
    }

    #[test]
    fn test_local_position_labels() {
        assert_eq!(
            "Delantero Centro".parse::<Position>().unwrap(),
            Position::Forward
        );
        assert_eq!(
            "Extremo Derecho".parse::<Position>().unwrap(),
            Position::Forward
        );
        assert_eq!(
            "Centrocampista".parse::<Position>().unwrap(),
            Position::Midfielder
        );
        assert_eq!("Mediapunta".parse::<Position>().unwrap(), Position::Midfielder);
        assert_eq!("Portero".parse::<Position>().unwrap(), Position::Goalkeeper);
    }

    #[test]
    fn test_position_round_trips_through_canonical_label() {
        for position in Position::ALL {
            assert_eq!(position.as_str().parse::<Position>().unwrap(), position);
        }
    }

    #[test]
    fn test_unknown_position() {
        match "Coach".parse::<Position>() {
            Err(FootballError::InvalidPosition { position }) => assert_eq!(position, "Coach"),
            other => panic!("Expected InvalidPosition, got {:?}", other),
        }
    }
}
