use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sport {
    #[serde(rename = "NFL")]
    Nfl,
    #[serde(rename = "NBA")]
    Nba,
    #[serde(rename = "MLB")]
    Mlb,
    #[serde(rename = "NHL")]
    Nhl,
}

impl Sport {
    pub fn label(self) -> &'static str {
        match self {
            Sport::Nfl => "NFL",
            Sport::Nba => "NBA",
            Sport::Mlb => "MLB",
            Sport::Nhl => "NHL",
        }
    }

    pub fn espn_path(self) -> &'static str {
        match self {
            Sport::Nfl => "football/nfl",
            Sport::Nba => "basketball/nba",
            Sport::Mlb => "baseball/mlb",
            Sport::Nhl => "hockey/nhl",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Live,
    Cache,
    Fallback,
}

impl Source {
    pub fn label(self) -> &'static str {
        match self {
            Source::Live => "live",
            Source::Cache => "cache",
            Source::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRecord {
    pub name: String,
    pub sport: Sport,
    pub wins: u32,
    pub losses: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ties: Option<u32>,
    /// Display string such as "5-12". Stored as given, never re-derived.
    pub record: String,
    pub last_updated: String,
    pub source: Source,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_at: Option<i64>,
}

impl TeamRecord {
    pub fn new(
        name: impl Into<String>,
        sport: Sport,
        wins: u32,
        losses: u32,
        ties: Option<u32>,
        last_updated: impl Into<String>,
        source: Source,
    ) -> Self {
        Self {
            name: name.into(),
            sport,
            wins,
            losses,
            ties,
            record: format_record(wins, losses, ties),
            last_updated: last_updated.into(),
            source,
            cached_at: None,
        }
    }

    pub fn games_played(&self) -> u64 {
        u64::from(self.wins) + u64::from(self.losses) + u64::from(self.ties.unwrap_or(0))
    }

    /// Wins over wins + losses; ties do not count.
    pub fn win_pct(&self) -> Option<f64> {
        let decided = u64::from(self.wins) + u64::from(self.losses);
        if decided == 0 {
            return None;
        }
        Some(f64::from(self.wins) / decided as f64)
    }
}

pub fn format_record(wins: u32, losses: u32, ties: Option<u32>) -> String {
    match ties {
        Some(t) if t > 0 => format!("{wins}-{losses}-{t}"),
        _ => format!("{wins}-{losses}"),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TeamSpec {
    pub name: &'static str,
    pub sport: Sport,
    pub espn_slug: &'static str,
}

pub const ROSTER: &[TeamSpec] = &[
    TeamSpec {
        name: "Bears",
        sport: Sport::Nfl,
        espn_slug: "chi",
    },
    TeamSpec {
        name: "Bulls",
        sport: Sport::Nba,
        espn_slug: "chi",
    },
    TeamSpec {
        name: "Cubs",
        sport: Sport::Mlb,
        espn_slug: "chc",
    },
    TeamSpec {
        name: "White Sox",
        sport: Sport::Mlb,
        espn_slug: "chw",
    },
    TeamSpec {
        name: "Blackhawks",
        sport: Sport::Nhl,
        espn_slug: "chi",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_string_skips_zero_ties() {
        assert_eq!(format_record(5, 12, None), "5-12");
        assert_eq!(format_record(5, 12, Some(0)), "5-12");
        assert_eq!(format_record(25, 46, Some(11)), "25-46-11");
    }

    #[test]
    fn serializes_with_camel_case_and_lowercase_source() {
        let mut rec = TeamRecord::new("Bears", Sport::Nfl, 5, 12, None, "Final", Source::Live);
        rec.cached_at = Some(42);
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["sport"], "NFL");
        assert_eq!(json["source"], "live");
        assert_eq!(json["lastUpdated"], "Final");
        assert_eq!(json["cachedAt"], 42);
        assert!(json.get("ties").is_none());
    }

    #[test]
    fn win_pct_ignores_ties() {
        let rec = TeamRecord::new("X", Sport::Nhl, 3, 1, Some(4), "", Source::Fallback);
        assert_eq!(rec.win_pct(), Some(0.75));
        assert_eq!(rec.games_played(), 8);
    }
}
