use super::models::{GameModeStats, Included, MatchDto, ParticipantDto, RosterDto};
use crate::analysis::models::{DeathCause, MatchRecord, SeasonTotals, TeammateStats};
use chrono::{DateTime, Utc};
use tracing::warn;

pub fn death_cause(death_type: &str) -> Option<DeathCause> {
    match death_type {
        "" => None,
        "alive" => Some(DeathCause::Alive),
        "byplayer" => Some(DeathCause::ByPlayer),
        "byzone" => Some(DeathCause::ByZone),
        "suicide" => Some(DeathCause::Suicide),
        _ => Some(DeathCause::Other),
    }
}

/// Build the player's MatchRecord from a match document.
///
/// Returns `None` when the player is not among the participants.
pub fn match_record(data: &MatchDto, included: &[Included], account_id: &str, player_name: &str) -> Option<MatchRecord> {
    let mut participants: Vec<&ParticipantDto> = Vec::new();
    let mut rosters: Vec<&RosterDto> = Vec::new();
    for item in included {
        match item {
            Included::Participant(p) => participants.push(p),
            Included::Roster(r) => rosters.push(r),
            Included::Other => {}
        }
    }

    let me = participants.iter().find(|p| {
        p.attributes.stats.player_id == account_id || p.attributes.stats.name.eq_ignore_ascii_case(player_name)
    })?;
    let my_roster = rosters
        .iter()
        .find(|r| r.relationships.participants.data.iter().any(|p| p.id == me.id));

    let stats = &me.attributes.stats;
    let placement = my_roster.map(|r| r.attributes.stats.rank).unwrap_or(stats.win_place);

    let roster: Vec<TeammateStats> = my_roster
        .map(|r| {
            r.relationships
                .participants
                .data
                .iter()
                .filter(|p| p.id != me.id)
                .filter_map(|p| participants.iter().find(|candidate| candidate.id == p.id))
                .map(|p| TeammateStats {
                    name: p.attributes.stats.name.clone(),
                    kills: p.attributes.stats.kills,
                    damage: p.attributes.stats.damage_dealt,
                    survival_time_seconds: p.attributes.stats.time_survived,
                })
                .collect()
        })
        .unwrap_or_default();

    let played_at = match DateTime::parse_from_rfc3339(&data.attributes.created_at) {
        Ok(t) => Some(t.with_timezone(&Utc)),
        Err(e) => {
            warn!(match_id = %data.id, error = %e, "unparseable match timestamp");
            None
        }
    };

    Some(MatchRecord {
        match_id: data.id.clone(),
        player_name: stats.name.clone(),
        played_at,
        damage: Some(stats.damage_dealt),
        kills: stats.kills,
        assists: stats.assists,
        survival_time_seconds: Some(stats.time_survived),
        placement,
        total_competing_teams: rosters.len() as u32,
        distance_moved: Some(stats.walk_distance + stats.ride_distance + stats.swim_distance),
        death_cause: death_cause(&stats.death_type),
        teammate_names: roster.iter().map(|t| t.name.clone()).collect(),
        roster,
    })
}

pub fn season_totals(stats: &GameModeStats) -> SeasonTotals {
    SeasonTotals {
        rounds_played: stats.rounds_played,
        wins: stats.wins,
        top10s: stats.top10s,
        kills: stats.kills,
        assists: stats.assists,
        damage_dealt: stats.damage_dealt,
        time_survived: stats.time_survived,
    }
}
