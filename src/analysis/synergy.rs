use super::models::{MatchRecord, SynergyEntry};
use super::scoring::match_team_score;
use std::collections::{BTreeMap, HashSet};

/// How many synergy entries presentation callers show.
pub const PRESENTATION_LIMIT: usize = 3;

/// Rank teammates from `membership` by how often they played with the
/// player and how often those matches beat `performance_bar`.
///
/// `membership` holds lower-cased names; teammate names are lower-cased
/// before the lookup. The full ranking is returned.
pub fn score(matches: &[MatchRecord], membership: &HashSet<String>, performance_bar: f64) -> Vec<SynergyEntry> {
    // Keyed by normalized name so output order is stable across runs.
    let mut entries: BTreeMap<String, SynergyEntry> = BTreeMap::new();

    for record in matches {
        let mut members_present: Vec<&String> = Vec::new();
        let mut seen = HashSet::new();
        for name in &record.teammate_names {
            let key = name.to_lowercase();
            if membership.contains(&key) && seen.insert(key) {
                members_present.push(name);
            }
        }

        if members_present.is_empty() {
            continue;
        }

        let above_bar = match_team_score(record) > performance_bar;

        for name in members_present {
            let entry = entries
                .entry(name.to_lowercase())
                .or_insert_with(|| SynergyEntry::new(name.clone()));
            entry.co_occurrence_count += 1;
            if above_bar {
                entry.above_bar_count += 1;
            }
        }
    }

    let mut ranked: Vec<SynergyEntry> = entries.into_values().collect();
    // Stable sort keeps the name order for full ties.
    ranked.sort_by(|a, b| {
        b.co_occurrence_count
            .cmp(&a.co_occurrence_count)
            .then(b.above_bar_count.cmp(&a.above_bar_count))
    });
    ranked
}

/// The first [`PRESENTATION_LIMIT`] entries of a ranking.
pub fn top(ranked: &[SynergyEntry]) -> &[SynergyEntry] {
    &ranked[..ranked.len().min(PRESENTATION_LIMIT)]
}
