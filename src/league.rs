use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ShotError;

/// Competitions Understat publishes shot data for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum League {
    #[serde(rename = "EPL")]
    Epl,
    #[serde(rename = "La_Liga")]
    LaLiga,
    #[serde(rename = "Bundesliga")]
    Bundesliga,
    #[serde(rename = "Serie_A")]
    SerieA,
    #[serde(rename = "Ligue_1")]
    Ligue1,
    #[serde(rename = "RFPL")]
    Rfpl,
}

impl League {
    /// Tag used in provider URLs and in the `league` output column
    pub fn tag(&self) -> &'static str {
        match self {
            League::Epl => "EPL",
            League::LaLiga => "La_Liga",
            League::Bundesliga => "Bundesliga",
            League::SerieA => "Serie_A",
            League::Ligue1 => "Ligue_1",
            League::Rfpl => "RFPL",
        }
    }

    pub fn all() -> &'static [League] {
        &[
            League::Epl,
            League::LaLiga,
            League::Bundesliga,
            League::SerieA,
            League::Ligue1,
            League::Rfpl,
        ]
    }

    /// The five major European leagues
    pub fn big_five() -> Vec<League> {
        vec![
            League::Epl,
            League::LaLiga,
            League::Bundesliga,
            League::SerieA,
            League::Ligue1,
        ]
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for League {
    type Err = ShotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace([' ', '-'], "_");
        League::all()
            .iter()
            .copied()
            .find(|l| l.tag().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| {
                let known: Vec<&str> = League::all().iter().map(|l| l.tag()).collect();
                ShotError::config(format!(
                    "unknown league tag {:?} (expected one of {})",
                    s,
                    known.join(", ")
                ))
            })
    }
}

/// Provider season identifier, the starting year of the season (e.g. `"2024"`).
///
/// Only emptiness is checked here; Understat rejects anything else it can't resolve.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Season(String);

impl Season {
    pub fn new(season: impl Into<String>) -> Result<Self, ShotError> {
        let season = season.into().trim().to_string();
        if season.is_empty() {
            return Err(ShotError::config("season must not be empty"));
        }
        Ok(Season(season))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Season {
    type Error = ShotError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Season::new(s)
    }
}

impl From<Season> for String {
    fn from(s: Season) -> Self {
        s.0
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
