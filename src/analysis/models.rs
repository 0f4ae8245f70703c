use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a match ended for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    Alive,
    ByPlayer,
    ByZone,
    Suicide,
    Other,
}

impl DeathCause {
    pub fn is_death(&self) -> bool {
        !matches!(self, DeathCause::Alive)
    }
}

/// One teammate's stat line inside a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeammateStats {
    pub name: String,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub damage: f64,
    #[serde(default)]
    pub survival_time_seconds: f64,
}

/// A single player's performance in a single match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: String,
    pub player_name: String,
    #[serde(default)]
    pub played_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub damage: Option<f64>,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub survival_time_seconds: Option<f64>,
    pub placement: u32,
    pub total_competing_teams: u32,
    #[serde(default)]
    pub distance_moved: Option<f64>,
    #[serde(default)]
    pub death_cause: Option<DeathCause>,
    #[serde(default)]
    pub teammate_names: Vec<String>,
    #[serde(default)]
    pub roster: Vec<TeammateStats>,
}

impl MatchRecord {
    pub fn new(match_id: &str, player_name: &str, placement: u32, total_competing_teams: u32) -> Self {
        MatchRecord {
            match_id: match_id.to_string(),
            player_name: player_name.to_string(),
            played_at: None,
            damage: None,
            kills: 0,
            assists: 0,
            survival_time_seconds: None,
            placement,
            total_competing_teams,
            distance_moved: None,
            death_cause: None,
            teammate_names: Vec::new(),
            roster: Vec::new(),
        }
    }

    pub fn damage(&self) -> f64 {
        self.damage.filter(|d| d.is_finite() && *d > 0.0).unwrap_or(0.0)
    }

    pub fn survival_time(&self) -> f64 {
        self.survival_time_seconds
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(0.0)
    }

    /// A record with neither damage nor survival data carries no combat signal.
    pub fn is_usable(&self) -> bool {
        self.damage() > 0.0 || self.survival_time() > 0.0
    }

    pub fn is_win(&self) -> bool {
        self.placement == 1
    }

    pub fn is_top10(&self) -> bool {
        self.placement >= 1 && self.placement <= 10
    }
}

/// Per-round averages for a player (or a clan, as means of member means).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateMetrics {
    pub avg_damage: f64,
    pub avg_kills: f64,
    pub avg_assists: f64,
    pub avg_survival_time: f64,
    pub win_rate_percent: f64,
    pub top10_rate_percent: f64,
    pub rounds_considered: u32,
}

impl AggregateMetrics {
    pub fn zero() -> Self {
        AggregateMetrics::default()
    }

    pub fn is_zero(&self) -> bool {
        self.rounds_considered == 0
            && self.avg_damage == 0.0
            && self.avg_kills == 0.0
            && self.avg_assists == 0.0
            && self.avg_survival_time == 0.0
            && self.win_rate_percent == 0.0
            && self.top10_rate_percent == 0.0
    }
}

/// Pre-aggregated season totals as reported by the stats provider.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SeasonTotals {
    pub rounds_played: u32,
    pub wins: u32,
    pub top10s: u32,
    pub kills: u32,
    pub assists: u32,
    pub damage_dealt: f64,
    pub time_survived: f64,
}

/// A play-style label from one of the fixed catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Archetype {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

impl Archetype {
    pub const fn new(id: &'static str, label: &'static str, icon: &'static str) -> Self {
        Archetype { id, label, icon }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynergyEntry {
    pub teammate_name: String,
    pub co_occurrence_count: u32,
    pub above_bar_count: u32,
}

impl SynergyEntry {
    pub fn new(teammate_name: String) -> Self {
        SynergyEntry {
            teammate_name,
            co_occurrence_count: 0,
            above_bar_count: 0,
        }
    }

    pub fn above_bar_rate(&self) -> f64 {
        if self.co_occurrence_count == 0 {
            0.0
        } else {
            (self.above_bar_count as f64 / self.co_occurrence_count as f64) * 100.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadCandidate {
    pub teammate_names: Vec<String>,
    pub average_team_score: f64,
    pub occurrence_count: u32,
    pub most_recent_match: Option<DateTime<Utc>>,
}
