use super::models::{MatchRecord, SquadCandidate};
use super::scoring::match_team_score;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Default)]
struct SquadTally {
    score_sum: f64,
    occurrences: u32,
    most_recent: Option<DateTime<Utc>>,
}

/// Sorted, de-duplicated teammate names for a match, without the player.
pub fn squad_key(record: &MatchRecord) -> Vec<String> {
    let mut names: Vec<String> = record
        .teammate_names
        .iter()
        .filter(|n| !n.eq_ignore_ascii_case(&record.player_name))
        .cloned()
        .collect();
    names.sort();
    names.dedup();
    names
}

/// Every squad composition with more than one teammate, best first.
pub fn candidates(matches: &[MatchRecord]) -> Vec<SquadCandidate> {
    let mut groups: BTreeMap<Vec<String>, SquadTally> = BTreeMap::new();

    for record in matches {
        let key = squad_key(record);
        if key.len() <= 1 {
            continue;
        }

        let tally = groups.entry(key).or_default();
        tally.score_sum += match_team_score(record);
        tally.occurrences += 1;
        tally.most_recent = tally.most_recent.max(record.played_at);
    }

    let mut ranked: Vec<SquadCandidate> = groups
        .into_iter()
        .map(|(teammate_names, tally)| SquadCandidate {
            teammate_names,
            average_team_score: tally.score_sum / tally.occurrences as f64,
            occurrence_count: tally.occurrences,
            most_recent_match: tally.most_recent,
        })
        .collect();

    ranked.sort_by(compare_candidates);
    ranked
}

/// The highest-scoring squad, the most recently played one on a tie.
pub fn recommend(matches: &[MatchRecord]) -> Option<SquadCandidate> {
    let best = candidates(matches).into_iter().next();
    if let Some(squad) = &best {
        debug!(
            squad = ?squad.teammate_names,
            score = squad.average_team_score,
            games = squad.occurrence_count,
            "recommended squad"
        );
    }
    best
}

fn compare_candidates(a: &SquadCandidate, b: &SquadCandidate) -> Ordering {
    b.average_team_score
        .partial_cmp(&a.average_team_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.most_recent_match.cmp(&a.most_recent_match))
        .then_with(|| b.occurrence_count.cmp(&a.occurrence_count))
}
