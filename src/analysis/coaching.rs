use super::aggregator::recent;
use super::models::{AggregateMetrics, DeathCause, MatchRecord};
use serde::Serialize;

pub const MAX_RECOMMENDATIONS: usize = 3;

/// Deaths before this many seconds count as early.
pub const EARLY_PHASE_SECS: f64 = 300.0;
/// Deaths at or after this many seconds count as late.
pub const LATE_PHASE_SECS: f64 = 1200.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TimingBreakdown {
    pub early_deaths: u32,
    pub mid_deaths: u32,
    pub late_deaths: u32,
    /// Rounds whose outcome is known: survived, or died at a recorded time.
    pub rounds: u32,
}

impl TimingBreakdown {
    pub fn from_matches(matches: &[MatchRecord]) -> Self {
        let mut timing = TimingBreakdown::default();
        for m in recent(matches) {
            let Some(cause) = m.death_cause else {
                continue;
            };
            if !cause.is_death() {
                timing.rounds += 1;
                continue;
            }
            let Some(survived) = m.survival_time_seconds else {
                continue;
            };
            timing.rounds += 1;
            if survived < EARLY_PHASE_SECS {
                timing.early_deaths += 1;
            } else if survived < LATE_PHASE_SECS {
                timing.mid_deaths += 1;
            } else {
                timing.late_deaths += 1;
            }
        }
        timing
    }

    /// Share of rounds that ended in an early death, 0-100. `None` when no
    /// round has a known outcome.
    pub fn early_death_rate(&self) -> Option<f64> {
        (self.rounds > 0).then(|| percent(self.early_deaths, self.rounds))
    }

    pub fn late_death_rate(&self) -> Option<f64> {
        (self.rounds > 0).then(|| percent(self.late_deaths, self.rounds))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DeathCauseBreakdown {
    pub by_player: u32,
    pub by_zone: u32,
    pub suicide: u32,
    pub other: u32,
    pub alive: u32,
}

impl DeathCauseBreakdown {
    pub fn from_matches(matches: &[MatchRecord]) -> Self {
        let mut causes = DeathCauseBreakdown::default();
        for cause in recent(matches).iter().filter_map(|m| m.death_cause) {
            match cause {
                DeathCause::Alive => causes.alive += 1,
                DeathCause::ByPlayer => causes.by_player += 1,
                DeathCause::ByZone => causes.by_zone += 1,
                DeathCause::Suicide => causes.suicide += 1,
                DeathCause::Other => causes.other += 1,
            }
        }
        causes
    }

    pub fn deaths(&self) -> u32 {
        self.by_player + self.by_zone + self.suicide + self.other
    }

    /// Rounds with any recorded outcome, deaths and survivals alike.
    pub fn known(&self) -> u32 {
        self.deaths() + self.alive
    }

    /// Share of deaths caused by the play zone, 0-100.
    pub fn zone_death_rate(&self) -> f64 {
        percent(self.by_zone, self.deaths())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Timing,
    Damage,
    Positioning,
    Zone,
    Teamwork,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub category: Category,
    pub priority: Priority,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Coaching {
    pub recommendations: Vec<Recommendation>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

/// Inputs every coaching rule reads.
pub struct CoachingInput<'a> {
    pub metrics: &'a AggregateMetrics,
    pub timing: &'a TimingBreakdown,
    pub causes: &'a DeathCauseBreakdown,
}

impl CoachingInput<'_> {
    /// Kills per death over the considered rounds. When every known round
    /// was survived this is the total kill count. `None` without any
    /// recorded outcomes.
    pub fn kd(&self) -> Option<f64> {
        if self.causes.known() == 0 {
            return None;
        }
        let kills = self.metrics.avg_kills * self.metrics.rounds_considered as f64;
        Some(kills / self.causes.deaths().max(1) as f64)
    }
}

struct CoachingRule {
    category: Category,
    priority: Priority,
    triggered: fn(&CoachingInput) -> bool,
    message: fn(&CoachingInput) -> String,
}

// Authored in the order recommendations should be shown.
static RULES: &[CoachingRule] = &[
    CoachingRule {
        category: Category::Timing,
        priority: Priority::High,
        triggered: |i| i.timing.early_death_rate().is_some_and(|r| r > 40.0),
        message: |i| {
            format!(
                "{:.0}% of your rounds end in the first five minutes. Land away from the flight path and loot up before taking fights.",
                i.timing.early_death_rate().unwrap_or_default()
            )
        },
    },
    CoachingRule {
        category: Category::Damage,
        priority: Priority::High,
        triggered: |i| i.metrics.avg_damage < 150.0,
        message: |i| {
            format!(
                "Average damage is {:.0}. Take more trades you can win and follow up on knocked enemies.",
                i.metrics.avg_damage
            )
        },
    },
    CoachingRule {
        category: Category::Positioning,
        priority: Priority::Medium,
        triggered: |i| i.kd().is_some_and(|kd| kd < 0.8),
        message: |i| {
            format!(
                "K/D of {:.2}. Fight from cover and hold high ground instead of pushing open fields.",
                i.kd().unwrap_or_default()
            )
        },
    },
    CoachingRule {
        category: Category::Zone,
        priority: Priority::Medium,
        triggered: |i| i.metrics.win_rate_percent < 10.0,
        message: |i| {
            format!(
                "Win rate is {:.1}%. Rotate early toward the next circle and claim a compound before the final zones.",
                i.metrics.win_rate_percent
            )
        },
    },
    CoachingRule {
        category: Category::Zone,
        priority: Priority::Medium,
        triggered: |i| i.causes.zone_death_rate() > 20.0,
        message: |i| {
            format!(
                "{:.0}% of your deaths are to the zone. Carry a vehicle or start moving before the circle closes.",
                i.causes.zone_death_rate()
            )
        },
    },
    CoachingRule {
        category: Category::Teamwork,
        priority: Priority::Low,
        triggered: |i| i.metrics.avg_assists < 0.5,
        message: |i| {
            format!(
                "Only {:.1} assists per round. Call targets and trade damage with your squad.",
                i.metrics.avg_assists
            )
        },
    },
];

struct TraitRule {
    strength_if: fn(&CoachingInput) -> bool,
    weakness_if: fn(&CoachingInput) -> bool,
    strength: &'static str,
    weakness: &'static str,
}

// Each pair uses disjoint ranges so one metric can't be both.
static TRAITS: &[TraitRule] = &[
    TraitRule {
        strength_if: |i| i.timing.early_death_rate().is_some_and(|r| r < 20.0),
        weakness_if: |i| i.timing.early_death_rate().is_some_and(|r| r > 40.0),
        strength: "Survives the opening phase",
        weakness: "Dies early too often",
    },
    TraitRule {
        strength_if: |i| i.metrics.avg_damage >= 300.0,
        weakness_if: |i| i.metrics.avg_damage < 150.0,
        strength: "High damage output",
        weakness: "Low damage output",
    },
    TraitRule {
        strength_if: |i| i.kd().is_some_and(|kd| kd >= 2.0),
        weakness_if: |i| i.kd().is_some_and(|kd| kd < 0.8),
        strength: "Wins most gunfights",
        weakness: "Loses most gunfights",
    },
    TraitRule {
        strength_if: |i| i.metrics.win_rate_percent >= 15.0,
        weakness_if: |i| i.metrics.win_rate_percent < 10.0,
        strength: "Closes out games",
        weakness: "Rarely wins games",
    },
    TraitRule {
        strength_if: |i| i.metrics.top10_rate_percent >= 50.0,
        weakness_if: |i| i.metrics.top10_rate_percent < 20.0,
        strength: "Consistent top 10 finishes",
        weakness: "Few top 10 finishes",
    },
    TraitRule {
        strength_if: |i| i.metrics.avg_assists >= 1.0,
        weakness_if: |i| i.metrics.avg_assists < 0.5,
        strength: "Strong team play",
        weakness: "Little team play",
    },
];

/// Improvement recommendations plus a strengths/weaknesses summary.
///
/// With no rounds to look at the result is empty.
pub fn recommend(
    metrics: &AggregateMetrics,
    timing: &TimingBreakdown,
    causes: &DeathCauseBreakdown,
) -> Coaching {
    if metrics.rounds_considered == 0 {
        return Coaching::default();
    }

    let input = CoachingInput { metrics, timing, causes };

    let recommendations = RULES
        .iter()
        .filter(|rule| (rule.triggered)(&input))
        .take(MAX_RECOMMENDATIONS)
        .map(|rule| Recommendation {
            category: rule.category,
            priority: rule.priority,
            message: (rule.message)(&input),
        })
        .collect();

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    for t in TRAITS {
        if (t.strength_if)(&input) {
            strengths.push(t.strength.to_string());
        } else if (t.weakness_if)(&input) {
            weaknesses.push(t.weakness.to_string());
        }
    }

    Coaching {
        recommendations,
        strengths,
        weaknesses,
    }
}

fn percent(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn death(survival: f64, cause: DeathCause) -> MatchRecord {
        let mut m = MatchRecord::new("m", "me", 20, 25);
        m.survival_time_seconds = Some(survival);
        m.death_cause = Some(cause);
        m
    }

    fn strong_metrics() -> AggregateMetrics {
        AggregateMetrics {
            avg_damage: 420.0,
            avg_kills: 4.0,
            avg_assists: 1.5,
            avg_survival_time: 1400.0,
            win_rate_percent: 20.0,
            top10_rate_percent: 60.0,
            rounds_considered: 10,
        }
    }

    #[test]
    fn timing_buckets() {
        let matches = vec![
            death(120.0, DeathCause::ByPlayer),
            death(299.0, DeathCause::ByZone),
            death(300.0, DeathCause::ByPlayer),
            death(1200.0, DeathCause::ByPlayer),
            death(1500.0, DeathCause::Alive),
        ];

        let timing = TimingBreakdown::from_matches(&matches);

        assert_eq!(timing.early_deaths, 2);
        assert_eq!(timing.mid_deaths, 1);
        assert_eq!(timing.late_deaths, 1);
        assert_eq!(timing.rounds, 5);
        assert_abs_diff_eq!(timing.early_death_rate().unwrap(), 40.0, epsilon = 1e-9);
        assert_abs_diff_eq!(timing.late_death_rate().unwrap(), 20.0, epsilon = 1e-9);
        assert_eq!(TimingBreakdown::default().early_death_rate(), None);
    }

    #[test]
    fn cause_breakdown() {
        let matches = vec![
            death(100.0, DeathCause::ByZone),
            death(100.0, DeathCause::ByPlayer),
            death(100.0, DeathCause::ByPlayer),
            death(100.0, DeathCause::Suicide),
            death(1800.0, DeathCause::Alive),
        ];

        let causes = DeathCauseBreakdown::from_matches(&matches);

        assert_eq!(causes.deaths(), 4);
        assert_eq!(causes.alive, 1);
        assert_abs_diff_eq!(causes.zone_death_rate(), 25.0, epsilon = 1e-9);
        assert_eq!(DeathCauseBreakdown::default().zone_death_rate(), 0.0);
    }

    #[test]
    fn strong_player_gets_no_recommendations() {
        let causes = DeathCauseBreakdown {
            by_player: 2,
            alive: 8,
            ..Default::default()
        };
        let timing = TimingBreakdown {
            late_deaths: 2,
            rounds: 10,
            ..Default::default()
        };

        let coaching = recommend(&strong_metrics(), &timing, &causes);

        assert!(coaching.recommendations.is_empty());
        assert!(coaching.weaknesses.is_empty());
        assert_eq!(coaching.strengths.len(), TRAITS.len());
    }

    #[test]
    fn truncates_to_first_three_in_table_order() {
        let metrics = AggregateMetrics {
            avg_damage: 90.0,
            avg_kills: 0.3,
            avg_assists: 0.1,
            avg_survival_time: 200.0,
            win_rate_percent: 0.0,
            top10_rate_percent: 5.0,
            rounds_considered: 10,
        };
        let timing = TimingBreakdown {
            early_deaths: 8,
            mid_deaths: 2,
            rounds: 10,
            ..Default::default()
        };
        let causes = DeathCauseBreakdown {
            by_player: 7,
            by_zone: 3,
            ..Default::default()
        };

        let coaching = recommend(&metrics, &timing, &causes);

        let categories: Vec<Category> = coaching.recommendations.iter().map(|r| r.category).collect();
        assert_eq!(categories, vec![Category::Timing, Category::Damage, Category::Positioning]);
        assert_eq!(coaching.recommendations[0].priority, Priority::High);
        assert_eq!(coaching.recommendations[2].priority, Priority::Medium);
        assert!(coaching.strengths.is_empty());
        assert_eq!(coaching.weaknesses.len(), TRAITS.len());
    }

    #[test]
    fn later_rules_fill_in_when_earlier_ones_pass() {
        let metrics = AggregateMetrics {
            avg_damage: 200.0,
            avg_kills: 1.5,
            avg_assists: 0.2,
            avg_survival_time: 900.0,
            win_rate_percent: 5.0,
            top10_rate_percent: 30.0,
            rounds_considered: 10,
        };
        let timing = TimingBreakdown {
            mid_deaths: 10,
            rounds: 10,
            ..Default::default()
        };
        let causes = DeathCauseBreakdown {
            by_player: 5,
            by_zone: 5,
            ..Default::default()
        };

        let coaching = recommend(&metrics, &timing, &causes);

        let categories: Vec<Category> = coaching.recommendations.iter().map(|r| r.category).collect();
        // kd = 15 / 10 = 1.5, so positioning is skipped.
        assert_eq!(categories, vec![Category::Zone, Category::Zone, Category::Teamwork]);
    }

    #[test]
    fn no_metric_is_both_strength_and_weakness() {
        for damage in [0.0, 149.0, 150.0, 299.0, 300.0, 600.0] {
            for rate in [0, 1, 2, 4, 5, 8] {
                let metrics = AggregateMetrics {
                    avg_damage: damage,
                    avg_kills: rate as f64,
                    avg_assists: rate as f64 / 4.0,
                    win_rate_percent: rate as f64 * 3.0,
                    top10_rate_percent: rate as f64 * 10.0,
                    rounds_considered: 10,
                    ..AggregateMetrics::zero()
                };
                let timing = TimingBreakdown {
                    early_deaths: rate,
                    rounds: 10,
                    ..Default::default()
                };
                let causes = DeathCauseBreakdown {
                    by_player: rate * 2,
                    ..Default::default()
                };

                let coaching = recommend(&metrics, &timing, &causes);

                for t in TRAITS {
                    let strong = coaching.strengths.iter().any(|s| s == t.strength);
                    let weak = coaching.weaknesses.iter().any(|w| w == t.weakness);
                    assert!(!(strong && weak));
                }
            }
        }
    }

    fn midfield_metrics() -> AggregateMetrics {
        AggregateMetrics {
            avg_damage: 200.0,
            avg_kills: 0.5,
            avg_assists: 1.0,
            avg_survival_time: 100.0,
            win_rate_percent: 0.0,
            top10_rate_percent: 30.0,
            rounds_considered: 20,
        }
    }

    fn short_rounds(cause: Option<DeathCause>) -> Vec<MatchRecord> {
        (0..20)
            .map(|_| {
                let mut m = MatchRecord::new("m", "me", 20, 25);
                m.survival_time_seconds = Some(100.0);
                m.death_cause = cause;
                m
            })
            .collect()
    }

    #[test]
    fn unknown_death_causes_are_not_read_as_survival() {
        let matches = short_rounds(None);
        let timing = TimingBreakdown::from_matches(&matches);
        let causes = DeathCauseBreakdown::from_matches(&matches);

        assert_eq!(timing.rounds, 0);
        assert_eq!(timing.early_death_rate(), None);
        let input = CoachingInput { metrics: &midfield_metrics(), timing: &timing, causes: &causes };
        assert_eq!(input.kd(), None);

        let coaching = recommend(&midfield_metrics(), &timing, &causes);

        let categories: Vec<Category> = coaching.recommendations.iter().map(|r| r.category).collect();
        assert_eq!(categories, vec![Category::Zone]);
        assert_eq!(coaching.strengths, vec!["Strong team play".to_string()]);
        assert_eq!(coaching.weaknesses, vec!["Rarely wins games".to_string()]);
    }

    #[test]
    fn recorded_early_deaths_drive_timing_and_gunfights() {
        let matches = short_rounds(Some(DeathCause::ByPlayer));
        let timing = TimingBreakdown::from_matches(&matches);
        let causes = DeathCauseBreakdown::from_matches(&matches);

        let coaching = recommend(&midfield_metrics(), &timing, &causes);

        let categories: Vec<Category> = coaching.recommendations.iter().map(|r| r.category).collect();
        // kd = 10 / 20
        assert_eq!(categories, vec![Category::Timing, Category::Positioning, Category::Zone]);
        assert_eq!(
            coaching.weaknesses,
            vec![
                "Dies early too often".to_string(),
                "Loses most gunfights".to_string(),
                "Rarely wins games".to_string(),
            ]
        );
    }

    #[test]
    fn season_summary_alone_skips_death_based_advice() {
        let season = AggregateMetrics {
            avg_damage: 100.0,
            avg_kills: 0.3,
            avg_assists: 0.2,
            avg_survival_time: 600.0,
            win_rate_percent: 2.0,
            top10_rate_percent: 25.0,
            rounds_considered: 100,
        };

        let coaching = recommend(
            &season,
            &TimingBreakdown::from_matches(&[]),
            &DeathCauseBreakdown::from_matches(&[]),
        );

        let categories: Vec<Category> = coaching.recommendations.iter().map(|r| r.category).collect();
        assert_eq!(categories, vec![Category::Damage, Category::Zone, Category::Teamwork]);
        assert!(coaching.strengths.is_empty());
        assert!(!coaching.weaknesses.iter().any(|w| w == "Dies early too often" || w == "Loses most gunfights"));
    }

    #[test]
    fn no_rounds_no_coaching() {
        let coaching = recommend(
            &AggregateMetrics::zero(),
            &TimingBreakdown::default(),
            &DeathCauseBreakdown::default(),
        );
        assert_eq!(coaching, Coaching::default());
    }
}
