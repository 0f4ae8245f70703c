use super::models::{AggregateMetrics, MatchRecord};

/// Rating proxy for one stat line in one match.
///
/// `kills * 30 + damage * 0.7 + survival * 0.1`. Used for synergy and squad
/// ranking; not the same formula as [`mmr`].
pub fn team_score(kills: u32, damage: f64, survival_time_seconds: f64) -> f64 {
    kills as f64 * 30.0 + damage * 0.7 + survival_time_seconds * 0.1
}

/// Mean team score over every roster line present in the match, the
/// player's own line included.
pub fn match_team_score(record: &MatchRecord) -> f64 {
    let own = team_score(record.kills, record.damage(), record.survival_time());

    let teammates = record
        .roster
        .iter()
        .filter(|t| !t.name.eq_ignore_ascii_case(&record.player_name))
        .map(|t| {
            team_score(
                t.kills,
                non_negative(t.damage),
                non_negative(t.survival_time_seconds),
            )
        });

    let (sum, count) = teammates.fold((own, 1u32), |(sum, count), score| (sum + score, count + 1));
    sum / count as f64
}

/// Player matchmaking rating estimate from aggregate metrics.
///
/// `avg_kills * 40 + avg_damage * 0.4 + top10_ratio * 100`.
pub fn mmr(metrics: &AggregateMetrics) -> f64 {
    let top10_ratio = metrics.top10_rate_percent / 100.0;
    metrics.avg_kills * 40.0 + metrics.avg_damage * 0.4 + top10_ratio * 100.0
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
