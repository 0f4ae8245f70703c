use super::aggregator::{aggregate, aggregate_clan, recent};
use super::classifier::{classify, classify_with, Catalog};
use super::coaching::{self, Coaching, DeathCauseBreakdown, TimingBreakdown};
use super::grader::{grade, top_percent, Grade};
use super::models::{AggregateMetrics, Archetype, MatchRecord, SquadCandidate, SynergyEntry};
use super::scoring::{match_team_score, mmr};
use super::{squad, synergy};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchGrade {
    pub match_id: String,
    pub played_at: Option<DateTime<Utc>>,
    pub placement: u32,
    pub total_competing_teams: u32,
    pub grade: Grade,
    pub top_percent: Option<f64>,
    pub team_score: f64,
}

/// Everything the pipeline derives for one player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerReport {
    pub player: String,
    pub metrics: AggregateMetrics,
    pub archetype: Archetype,
    pub mmr: f64,
    pub grades: Vec<MatchGrade>,
    pub synergy: Vec<SynergyEntry>,
    pub squad: Option<SquadCandidate>,
    pub timing: TimingBreakdown,
    pub death_causes: DeathCauseBreakdown,
    pub coaching: Coaching,
}

impl PlayerReport {
    /// Run every analysis over one player's matches (most recent first).
    #[instrument(skip_all, fields(player = player, matches = matches.len()))]
    pub fn build(
        player: &str,
        matches: &[MatchRecord],
        fallback: Option<&AggregateMetrics>,
        membership: &HashSet<String>,
        performance_bar: f64,
    ) -> Self {
        let metrics = aggregate(matches, fallback);
        let archetype = classify(&metrics);
        debug!(archetype = archetype.id, rounds = metrics.rounds_considered, "classified player");

        let grades = recent(matches)
            .iter()
            .map(|m| MatchGrade {
                match_id: m.match_id.clone(),
                played_at: m.played_at,
                placement: m.placement,
                total_competing_teams: m.total_competing_teams,
                grade: grade(m.placement as i64, m.total_competing_teams as i64),
                top_percent: top_percent(m.placement as i64, m.total_competing_teams as i64),
                team_score: match_team_score(m),
            })
            .collect();

        // Season-summary metrics come with no per-match deaths to break down.
        let (timing, death_causes) = if recent(matches).iter().any(MatchRecord::is_usable) {
            (
                TimingBreakdown::from_matches(matches),
                DeathCauseBreakdown::from_matches(matches),
            )
        } else {
            (TimingBreakdown::default(), DeathCauseBreakdown::default())
        };
        let coaching = coaching::recommend(&metrics, &timing, &death_causes);

        PlayerReport {
            player: player.to_string(),
            metrics,
            archetype,
            mmr: mmr(&metrics),
            grades,
            synergy: synergy::score(matches, membership, performance_bar),
            squad: squad::recommend(matches),
            timing,
            death_causes,
            coaching,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClanMember {
    pub name: String,
    pub metrics: AggregateMetrics,
    pub archetype: Archetype,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClanReport {
    pub metrics: AggregateMetrics,
    pub archetype: Archetype,
    pub active_members: usize,
    pub members: Vec<ClanMember>,
}

impl ClanReport {
    /// Classify a clan from each member's aggregate metrics.
    pub fn build(members: Vec<(String, AggregateMetrics)>) -> Self {
        let all: Vec<AggregateMetrics> = members.iter().map(|(_, m)| *m).collect();
        let metrics = aggregate_clan(&all);
        let archetype = classify_with(&metrics, Catalog::Clan);

        let members: Vec<ClanMember> = members
            .into_iter()
            .map(|(name, metrics)| ClanMember {
                name,
                archetype: classify(&metrics),
                metrics,
            })
            .collect();

        ClanReport {
            metrics,
            archetype,
            active_members: all.iter().filter(|m| m.rounds_considered > 0).count(),
            members,
        }
    }
}
