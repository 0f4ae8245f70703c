use super::models::{AggregateMetrics, MatchRecord, SeasonTotals};
use tracing::debug;

/// Only the most recent matches feed the averages.
pub const RECENT_WINDOW: usize = 20;

/// The slice of `matches` the pipeline looks at. Input is most-recent-first.
pub fn recent(matches: &[MatchRecord]) -> &[MatchRecord] {
    &matches[..matches.len().min(RECENT_WINDOW)]
}

/// Reduce raw match records to per-round averages.
///
/// When no record in the recent window carries damage or survival data, a
/// non-zero `fallback` (usually the provider's season summary) is returned
/// unchanged. With no usable data at all the result is all zeros.
pub fn aggregate(matches: &[MatchRecord], fallback: Option<&AggregateMetrics>) -> AggregateMetrics {
    let window = recent(matches);
    if !window.iter().any(MatchRecord::is_usable) {
        return match fallback {
            Some(summary) if !summary.is_zero() => {
                debug!(
                    rounds = summary.rounds_considered,
                    "no usable match telemetry, using season summary"
                );
                *summary
            }
            _ => AggregateMetrics::zero(),
        };
    }

    let rounds = window.len() as f64;

    let mut damage = 0.0;
    let mut kills = 0u64;
    let mut assists = 0u64;
    let mut survival = 0.0;
    let mut wins = 0u32;
    let mut top10s = 0u32;

    for m in window {
        damage += m.damage();
        kills += m.kills as u64;
        assists += m.assists as u64;
        survival += m.survival_time();
        if m.is_win() {
            wins += 1;
        }
        if m.is_top10() {
            top10s += 1;
        }
    }

    AggregateMetrics {
        avg_damage: damage / rounds,
        avg_kills: kills as f64 / rounds,
        avg_assists: assists as f64 / rounds,
        avg_survival_time: survival / rounds,
        win_rate_percent: 100.0 * wins as f64 / rounds,
        top10_rate_percent: 100.0 * top10s as f64 / rounds,
        rounds_considered: window.len() as u32,
    }
}

/// Convert provider season totals into per-round averages.
pub fn from_season_totals(totals: &SeasonTotals) -> AggregateMetrics {
    if totals.rounds_played == 0 {
        return AggregateMetrics::zero();
    }

    let rounds = totals.rounds_played as f64;
    let wins = totals.wins.min(totals.rounds_played) as f64;
    let top10s = totals.top10s.min(totals.rounds_played) as f64;

    AggregateMetrics {
        avg_damage: finite_or_zero(totals.damage_dealt) / rounds,
        avg_kills: totals.kills as f64 / rounds,
        avg_assists: totals.assists as f64 / rounds,
        avg_survival_time: finite_or_zero(totals.time_survived) / rounds,
        win_rate_percent: 100.0 * wins / rounds,
        top10_rate_percent: 100.0 * top10s / rounds,
        rounds_considered: totals.rounds_played,
    }
}

/// Clan metrics are the mean of each member's averages. Members without
/// any rounds are left out so they don't drag the means toward zero.
pub fn aggregate_clan(members: &[AggregateMetrics]) -> AggregateMetrics {
    let active: Vec<&AggregateMetrics> = members.iter().filter(|m| m.rounds_considered > 0).collect();
    if active.is_empty() {
        return AggregateMetrics::zero();
    }

    let n = active.len() as f64;
    let mean = |f: fn(&AggregateMetrics) -> f64| active.iter().map(|m| f(m)).sum::<f64>() / n;

    AggregateMetrics {
        avg_damage: mean(|m| m.avg_damage),
        avg_kills: mean(|m| m.avg_kills),
        avg_assists: mean(|m| m.avg_assists),
        avg_survival_time: mean(|m| m.avg_survival_time),
        win_rate_percent: mean(|m| m.win_rate_percent),
        top10_rate_percent: mean(|m| m.top10_rate_percent),
        rounds_considered: active.iter().map(|m| m.rounds_considered).sum(),
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
