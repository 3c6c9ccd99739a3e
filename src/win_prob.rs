use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::team::TeamRecord;

const HOME_FIELD_EDGE: f64 = 0.03;
const MIN_PROBABILITY: f64 = 0.05;
const MAX_PROBABILITY: f64 = 0.95;

const EXTREME_FAVORITE: f64 = 0.90;
const EXTREME_UNDERDOG: f64 = 0.10;

pub trait WinLossRecord {
    fn wins(&self) -> u32;
    fn losses(&self) -> u32;
}

impl WinLossRecord for TeamRecord {
    fn wins(&self) -> u32 {
        self.wins
    }

    fn losses(&self) -> u32 {
        self.losses
    }
}

impl<T: WinLossRecord + ?Sized> WinLossRecord for &T {
    fn wins(&self) -> u32 {
        (**self).wins()
    }

    fn losses(&self) -> u32 {
        (**self).losses()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Standing {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl Standing {
    pub fn new(wins: u32, losses: u32) -> Self {
        Self {
            wins,
            losses,
            ties: 0,
        }
    }
}

impl WinLossRecord for Standing {
    fn wins(&self) -> u32 {
        self.wins
    }

    fn losses(&self) -> u32 {
        self.losses
    }
}

impl FromStr for Standing {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split('-').map(str::trim).collect();
        if !(2..=3).contains(&parts.len()) {
            return Err(anyhow::anyhow!("expected W-L or W-L-T, got {s:?}"));
        }
        let wins = parts[0].parse::<u32>().context("invalid wins")?;
        let losses = parts[1].parse::<u32>().context("invalid losses")?;
        let ties = match parts.get(2) {
            Some(t) => t.parse::<u32>().context("invalid ties")?,
            None => 0,
        };
        Ok(Self {
            wins,
            losses,
            ties,
        })
    }
}

// Whole percent in 5..=95. Ties are ignored. A lone 0% or 100% side gets a
// fixed value with no home-field edge.
pub fn calculate_win_probability<T, O>(team: &T, opponent: &O, is_home: bool) -> u8
where
    T: WinLossRecord + ?Sized,
    O: WinLossRecord + ?Sized,
{
    let team_games = u64::from(team.wins()) + u64::from(team.losses());
    let opp_games = u64::from(opponent.wins()) + u64::from(opponent.losses());
    if team_games == 0 || opp_games == 0 {
        return 50;
    }

    let a = f64::from(team.wins()) / team_games as f64;
    let b = f64::from(opponent.wins()) / opp_games as f64;

    let both_perfect = team.losses() == 0 && opponent.losses() == 0;
    let both_winless = team.wins() == 0 && opponent.wins() == 0;
    if both_perfect || both_winless {
        return if is_home { 53 } else { 47 };
    }

    let p = if team.losses() == 0 || opponent.wins() == 0 {
        EXTREME_FAVORITE
    } else if team.wins() == 0 || opponent.losses() == 0 {
        EXTREME_UNDERDOG
    } else {
        let log5 = (a * (1.0 - b)) / (a * (1.0 - b) + b * (1.0 - a));
        if is_home {
            log5 + HOME_FIELD_EDGE
        } else {
            log5 - HOME_FIELD_EDGE
        }
    };

    to_percent(clamp(p, MIN_PROBABILITY, MAX_PROBABILITY))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbabilityLabel {
    StrongFavorite,
    Favored,
    TossUp,
    Underdog,
    HeavyUnderdog,
}

impl ProbabilityLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            ProbabilityLabel::StrongFavorite => "Strong Favorite",
            ProbabilityLabel::Favored => "Favored",
            ProbabilityLabel::TossUp => "Toss-up",
            ProbabilityLabel::Underdog => "Underdog",
            ProbabilityLabel::HeavyUnderdog => "Heavy Underdog",
        }
    }
}

impl fmt::Display for ProbabilityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn probability_label(probability: u8) -> ProbabilityLabel {
    match probability {
        75.. => ProbabilityLabel::StrongFavorite,
        60.. => ProbabilityLabel::Favored,
        45.. => ProbabilityLabel::TossUp,
        30.. => ProbabilityLabel::Underdog,
        _ => ProbabilityLabel::HeavyUnderdog,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbabilityColor {
    Green,
    Blue,
    Yellow,
    Orange,
    Red,
}

impl ProbabilityColor {
    fn name(self) -> &'static str {
        match self {
            ProbabilityColor::Green => "green",
            ProbabilityColor::Blue => "blue",
            ProbabilityColor::Yellow => "yellow",
            ProbabilityColor::Orange => "orange",
            ProbabilityColor::Red => "red",
        }
    }

    pub fn text_class(self) -> &'static str {
        match self {
            ProbabilityColor::Green => "text-green-600",
            ProbabilityColor::Blue => "text-blue-600",
            ProbabilityColor::Yellow => "text-yellow-600",
            ProbabilityColor::Orange => "text-orange-600",
            ProbabilityColor::Red => "text-red-600",
        }
    }

    pub fn gradient_class(self) -> &'static str {
        match self {
            ProbabilityColor::Green => "from-green-500 to-green-600",
            ProbabilityColor::Blue => "from-blue-500 to-blue-600",
            ProbabilityColor::Yellow => "from-yellow-500 to-yellow-600",
            ProbabilityColor::Orange => "from-orange-500 to-orange-600",
            ProbabilityColor::Red => "from-red-500 to-red-600",
        }
    }
}

impl fmt::Display for ProbabilityColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Color bands are tuned separately from the label bands.
pub fn probability_color(probability: u8) -> ProbabilityColor {
    match probability {
        65.. => ProbabilityColor::Green,
        50.. => ProbabilityColor::Blue,
        40.. => ProbabilityColor::Yellow,
        25.. => ProbabilityColor::Orange,
        _ => ProbabilityColor::Red,
    }
}

pub fn probability_gradient(probability: u8) -> &'static str {
    probability_color(probability).gradient_class()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matchup {
    pub team_pct: u8,
    pub opponent_pct: u8,
    pub label: ProbabilityLabel,
}

// Each side computed from its own perspective; need not sum to 100.
pub fn matchup<T, O>(team: &T, opponent: &O, team_is_home: bool) -> Matchup
where
    T: WinLossRecord + ?Sized,
    O: WinLossRecord + ?Sized,
{
    let team_pct = calculate_win_probability(team, opponent, team_is_home);
    let opponent_pct = calculate_win_probability(opponent, team, !team_is_home);
    Matchup {
        team_pct,
        opponent_pct,
        label: probability_label(team_pct),
    }
}

fn to_percent(p: f64) -> u8 {
    (p * 100.0).round() as u8
}

fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}
