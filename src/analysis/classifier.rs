use super::models::{AggregateMetrics, Archetype};
use tracing::trace;

/// Which rule table to classify against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalog {
    Individual,
    Clan,
}

/// One ordered entry of a catalog: the first rule whose predicate holds wins.
pub struct Rule {
    pub archetype: Archetype,
    pub predicate: fn(&AggregateMetrics) -> bool,
}

pub const EXTREME_AGGRESSIVE: Archetype = Archetype::new("extreme_aggressive", "Extreme Aggressive", "🔥");
pub const HOT_DROP: Archetype = Archetype::new("hot_drop", "Hot-Drop Specialist", "🪂");
pub const SPEED_FIGHTER: Archetype = Archetype::new("speed_fighter", "Speed Fighter", "⚡");
pub const EARLY_AGGRO: Archetype = Archetype::new("early_aggro", "Early Aggro", "💥");
pub const EXTREME_DEFENSIVE: Archetype = Archetype::new("extreme_defensive", "Extreme Defensive", "🛡️");
pub const LATE_GAME_CAMPER: Archetype = Archetype::new("late_game_camper", "Late-Game Camper", "⛺");
pub const LONG_RANGE_SCOUT: Archetype = Archetype::new("long_range_scout", "Long-Range Scout", "🔭");
pub const SNIPER_STYLE: Archetype = Archetype::new("sniper_style", "Sniper Style", "🎯");
pub const MID_RANGE_STABLE: Archetype = Archetype::new("mid_range_stable", "Mid-Range Stable", "⚖️");
pub const SUSTAINED_COMBAT: Archetype = Archetype::new("sustained_combat", "Sustained Combat", "⚔️");
pub const GHOST_SURVIVOR: Archetype = Archetype::new("ghost_survivor", "Ghost Survivor", "👻");
pub const GAMBLER_LOOTER: Archetype = Archetype::new("gambler_looter", "Gambler Looter", "🎲");
pub const BURST_DAMAGE: Archetype = Archetype::new("burst_damage", "Burst Damage", "💣");
pub const LETHAL_SNIPER: Archetype = Archetype::new("lethal_sniper", "Lethal Sniper", "☠️");
pub const STRATEGIC_SUPPORT: Archetype = Archetype::new("strategic_support", "Strategic Support", "🧠");
pub const HIGH_EFFICIENCY: Archetype = Archetype::new("high_efficiency", "High Efficiency", "📈");
pub const AGGRESSIVE: Archetype = Archetype::new("aggressive", "Aggressive", "🗡️");
pub const SURVIVAL: Archetype = Archetype::new("survival", "Survival", "🌿");
pub const MOBILITY: Archetype = Archetype::new("mobility", "Mobility", "🏃");

pub const ASSAULT_CLAN: Archetype = Archetype::new("assault_clan", "Assault Clan", "🔥");
pub const AGGRESSIVE_CLAN: Archetype = Archetype::new("aggressive_clan", "Aggressive Clan", "⚔️");
pub const SURVIVAL_CLAN: Archetype = Archetype::new("survival_clan", "Survival Specialists", "🛡️");
pub const TACTICAL_CLAN: Archetype = Archetype::new("tactical_clan", "Tactical Clan", "🧭");
pub const TEAMPLAY_CLAN: Archetype = Archetype::new("teamplay_clan", "Teamplay Clan", "🤝");
pub const DEVELOPING_CLAN: Archetype = Archetype::new("developing_clan", "Developing Clan", "🌱");
pub const WINNING_BALANCED_CLAN: Archetype = Archetype::new("winning_balanced_clan", "Winning Balanced Clan", "🏆");
pub const BALANCED_CLAN: Archetype = Archetype::new("balanced_clan", "Balanced Clan", "⚖️");

// Most specific first. Several predicates overlap; order is the priority.
pub static INDIVIDUAL_RULES: &[Rule] = &[
    Rule {
        archetype: EXTREME_AGGRESSIVE,
        predicate: |m| m.avg_damage >= 400.0 && m.avg_survival_time <= 600.0 && m.avg_kills >= 3.0,
    },
    Rule {
        archetype: HOT_DROP,
        predicate: |m| m.avg_survival_time <= 90.0 && m.avg_kills >= 2.0 && m.avg_damage >= 200.0,
    },
    Rule {
        archetype: SPEED_FIGHTER,
        predicate: |m| m.avg_survival_time <= 120.0 && m.avg_kills >= 2.5,
    },
    Rule {
        archetype: EARLY_AGGRO,
        predicate: |m| m.avg_survival_time <= 100.0 && m.avg_damage >= 180.0,
    },
    Rule {
        archetype: EXTREME_DEFENSIVE,
        predicate: |m| m.avg_damage <= 100.0 && m.avg_survival_time >= 1200.0,
    },
    Rule {
        archetype: LATE_GAME_CAMPER,
        predicate: |m| m.avg_damage <= 150.0 && m.avg_survival_time >= 1200.0 && m.avg_kills <= 1.0,
    },
    Rule {
        archetype: LONG_RANGE_SCOUT,
        predicate: |m| m.avg_kills <= 1.0 && m.avg_damage <= 150.0 && m.avg_survival_time >= 800.0,
    },
    Rule {
        archetype: SNIPER_STYLE,
        predicate: |m| m.avg_damage <= 150.0 && m.avg_survival_time >= 1000.0 && m.avg_kills >= 1.0,
    },
    Rule {
        archetype: MID_RANGE_STABLE,
        predicate: |m| {
            m.avg_damage > 150.0
                && m.avg_damage <= 250.0
                && m.avg_survival_time > 800.0
                && m.avg_survival_time <= 1200.0
        },
    },
    Rule {
        archetype: SUSTAINED_COMBAT,
        predicate: |m| m.avg_damage >= 250.0 && m.avg_survival_time >= 800.0 && m.avg_kills >= 2.0,
    },
    Rule {
        archetype: GHOST_SURVIVOR,
        predicate: |m| {
            m.avg_kills == 0.0
                && m.avg_assists == 0.0
                && m.avg_survival_time >= 1000.0
                && m.top10_rate_percent >= 40.0
        },
    },
    Rule {
        archetype: GAMBLER_LOOTER,
        predicate: |m| m.avg_survival_time <= 120.0 && m.avg_damage <= 50.0 && m.avg_kills == 0.0,
    },
    Rule {
        archetype: BURST_DAMAGE,
        predicate: |m| m.avg_damage >= 300.0 && m.avg_survival_time <= 400.0 && m.avg_kills >= 2.0,
    },
    Rule {
        archetype: LETHAL_SNIPER,
        predicate: |m| m.avg_damage >= 200.0 && m.avg_kills >= 2.0,
    },
    Rule {
        archetype: STRATEGIC_SUPPORT,
        predicate: |m| {
            m.avg_assists >= 3.0
                && m.avg_kills <= 1.0
                && m.avg_damage >= 200.0
                && m.avg_survival_time >= 800.0
        },
    },
    Rule {
        archetype: HIGH_EFFICIENCY,
        predicate: |m| m.avg_kills >= 3.0 && m.avg_damage <= 200.0,
    },
];

// Clan metrics are means of member means, so the bands are wider and fewer.
pub static CLAN_RULES: &[Rule] = &[
    Rule {
        archetype: ASSAULT_CLAN,
        predicate: |m| m.avg_damage >= 300.0 && m.avg_kills >= 2.5,
    },
    Rule {
        archetype: AGGRESSIVE_CLAN,
        predicate: |m| m.avg_damage >= 220.0 && m.avg_kills >= 1.8,
    },
    Rule {
        archetype: SURVIVAL_CLAN,
        predicate: |m| m.avg_survival_time >= 1300.0 && m.top10_rate_percent >= 50.0,
    },
    Rule {
        archetype: TACTICAL_CLAN,
        predicate: |m| m.top10_rate_percent >= 40.0 && m.avg_damage >= 180.0,
    },
    Rule {
        archetype: TEAMPLAY_CLAN,
        predicate: |m| m.avg_assists >= 1.0 && m.top10_rate_percent >= 30.0,
    },
    Rule {
        archetype: DEVELOPING_CLAN,
        predicate: |m| m.avg_damage < 120.0 && m.top10_rate_percent < 20.0,
    },
];

impl Catalog {
    pub fn rules(&self) -> &'static [Rule] {
        match self {
            Catalog::Individual => INDIVIDUAL_RULES,
            Catalog::Clan => CLAN_RULES,
        }
    }

    /// The catch-all bucket, reached only when no rule matched.
    pub fn fallback(&self, metrics: &AggregateMetrics) -> Archetype {
        match self {
            Catalog::Individual => {
                if metrics.avg_damage >= 200.0 {
                    AGGRESSIVE
                } else if metrics.avg_survival_time >= 600.0 {
                    SURVIVAL
                } else {
                    MOBILITY
                }
            }
            Catalog::Clan => {
                if metrics.win_rate_percent >= 10.0 {
                    WINNING_BALANCED_CLAN
                } else {
                    BALANCED_CLAN
                }
            }
        }
    }

    /// Every archetype this catalog can produce, rules first then fallbacks.
    pub fn archetypes(&self) -> Vec<Archetype> {
        let mut all: Vec<Archetype> = self.rules().iter().map(|r| r.archetype).collect();
        match self {
            Catalog::Individual => all.extend([AGGRESSIVE, SURVIVAL, MOBILITY]),
            Catalog::Clan => all.extend([WINNING_BALANCED_CLAN, BALANCED_CLAN]),
        }
        all
    }
}

/// Classify an individual player's metrics.
pub fn classify(metrics: &AggregateMetrics) -> Archetype {
    classify_with(metrics, Catalog::Individual)
}

/// Metrics with no rounds behind them go straight to the fallback bucket,
/// even though all-zero averages would satisfy the gambler-looter rule.
pub fn classify_with(metrics: &AggregateMetrics, catalog: Catalog) -> Archetype {
    if metrics.rounds_considered == 0 {
        return catalog.fallback(metrics);
    }

    match matching_rule(metrics, catalog) {
        Some(rule) => rule.archetype,
        None => {
            let archetype = catalog.fallback(metrics);
            trace!(?catalog, archetype = archetype.id, "no rule matched, using fallback");
            archetype
        }
    }
}

/// The rule that decided the classification, if any.
pub fn matching_rule(metrics: &AggregateMetrics, catalog: Catalog) -> Option<&'static Rule> {
    catalog.rules().iter().find(|rule| (rule.predicate)(metrics))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(damage: f64, kills: f64, survival: f64) -> AggregateMetrics {
        AggregateMetrics {
            avg_damage: damage,
            avg_kills: kills,
            avg_survival_time: survival,
            rounds_considered: 20,
            ..AggregateMetrics::zero()
        }
    }

    #[test]
    fn extreme_aggressive_beats_later_overlapping_rules() {
        let m = metrics(450.0, 4.0, 500.0);
        // Burst damage and lethal sniper also hold for these numbers.
        let burst = &INDIVIDUAL_RULES[12];
        let lethal = &INDIVIDUAL_RULES[13];
        assert_eq!(burst.archetype, BURST_DAMAGE);
        assert_eq!(lethal.archetype, LETHAL_SNIPER);
        assert!((burst.predicate)(&m));
        assert!((lethal.predicate)(&m));
        assert_eq!(classify(&m), EXTREME_AGGRESSIVE);
    }

    #[test]
    fn canonical_rule_order() {
        let ids: Vec<&str> = INDIVIDUAL_RULES.iter().map(|r| r.archetype.id).collect();
        assert_eq!(
            ids,
            vec![
                "extreme_aggressive",
                "hot_drop",
                "speed_fighter",
                "early_aggro",
                "extreme_defensive",
                "late_game_camper",
                "long_range_scout",
                "sniper_style",
                "mid_range_stable",
                "sustained_combat",
                "ghost_survivor",
                "gambler_looter",
                "burst_damage",
                "lethal_sniper",
                "strategic_support",
                "high_efficiency",
            ]
        );
    }

    #[test]
    fn representative_profiles() {
        assert_eq!(classify(&metrics(250.0, 2.5, 80.0)), HOT_DROP);
        assert_eq!(classify(&metrics(150.0, 3.0, 110.0)), SPEED_FIGHTER);
        assert_eq!(classify(&metrics(190.0, 1.0, 95.0)), EARLY_AGGRO);
        assert_eq!(classify(&metrics(80.0, 0.5, 1400.0)), EXTREME_DEFENSIVE);
        assert_eq!(classify(&metrics(140.0, 0.8, 1300.0)), LATE_GAME_CAMPER);
        assert_eq!(classify(&metrics(140.0, 0.5, 900.0)), LONG_RANGE_SCOUT);
        assert_eq!(classify(&metrics(140.0, 1.5, 1100.0)), SNIPER_STYLE);
        assert_eq!(classify(&metrics(200.0, 1.0, 1000.0)), MID_RANGE_STABLE);
        assert_eq!(classify(&metrics(320.0, 2.5, 1300.0)), SUSTAINED_COMBAT);
        assert_eq!(classify(&metrics(30.0, 0.0, 100.0)), GAMBLER_LOOTER);
        assert_eq!(classify(&metrics(350.0, 2.0, 300.0)), BURST_DAMAGE);
        assert_eq!(classify(&metrics(260.0, 2.2, 500.0)), LETHAL_SNIPER);
        assert_eq!(classify(&metrics(180.0, 3.5, 500.0)), HIGH_EFFICIENCY);
    }

    #[test]
    fn ghost_survivor_needs_top10_rate() {
        // Damage just above 150 and survival above 1200 skip every earlier rule.
        let mut m = metrics(160.0, 0.0, 1250.0);
        m.top10_rate_percent = 55.0;
        assert_eq!(classify(&m), GHOST_SURVIVOR);

        m.top10_rate_percent = 10.0;
        assert_eq!(classify(&m), SURVIVAL);
    }

    #[test]
    fn strategic_support_profile() {
        let mut m = metrics(260.0, 1.0, 1300.0);
        m.avg_assists = 3.5;
        assert_eq!(classify(&m), STRATEGIC_SUPPORT);
    }

    #[test]
    fn fallback_buckets() {
        assert_eq!(classify(&metrics(220.0, 1.0, 500.0)), AGGRESSIVE);
        assert_eq!(classify(&metrics(160.0, 1.5, 700.0)), SURVIVAL);
        assert_eq!(classify(&metrics(120.0, 1.5, 300.0)), MOBILITY);
    }

    #[test]
    fn all_zero_metrics_still_classify() {
        let zero = AggregateMetrics::zero();
        let archetype = classify(&zero);
        assert!(Catalog::Individual.archetypes().contains(&archetype));
        assert_eq!(archetype, MOBILITY);
        assert_eq!(classify_with(&zero, Catalog::Clan), BALANCED_CLAN);

        // The same numbers backed by real rounds hit the gambler looter rule.
        let mut played = zero;
        played.rounds_considered = 5;
        assert_eq!(classify(&played), GAMBLER_LOOTER);
    }

    #[test]
    fn fallback_only_when_no_rule_matches() {
        let grid = [0.0, 50.0, 100.0, 150.0, 200.0, 250.0, 300.0, 450.0];
        let kills = [0.0, 0.5, 1.0, 2.0, 2.5, 3.0, 4.0];
        let survival = [0.0, 90.0, 120.0, 400.0, 600.0, 800.0, 1000.0, 1200.0, 1500.0];
        for &d in &grid {
            for &k in &kills {
                for &s in &survival {
                    let m = metrics(d, k, s);
                    let archetype = classify(&m);
                    match matching_rule(&m, Catalog::Individual) {
                        Some(rule) => assert_eq!(archetype, rule.archetype),
                        None => assert_eq!(archetype, Catalog::Individual.fallback(&m)),
                    }
                }
            }
        }
    }

    #[test]
    fn clan_catalog_is_separate() {
        let m = metrics(450.0, 4.0, 500.0);
        assert_eq!(classify_with(&m, Catalog::Clan), ASSAULT_CLAN);

        let mut m = metrics(230.0, 2.0, 900.0);
        assert_eq!(classify_with(&m, Catalog::Clan), AGGRESSIVE_CLAN);

        m = metrics(150.0, 1.0, 1400.0);
        m.top10_rate_percent = 60.0;
        assert_eq!(classify_with(&m, Catalog::Clan), SURVIVAL_CLAN);

        m = metrics(190.0, 1.0, 900.0);
        m.top10_rate_percent = 45.0;
        assert_eq!(classify_with(&m, Catalog::Clan), TACTICAL_CLAN);

        m = metrics(150.0, 1.0, 900.0);
        m.avg_assists = 1.2;
        m.top10_rate_percent = 35.0;
        assert_eq!(classify_with(&m, Catalog::Clan), TEAMPLAY_CLAN);

        assert_eq!(classify_with(&metrics(90.0, 0.5, 600.0), Catalog::Clan), DEVELOPING_CLAN);
    }

    #[test]
    fn clan_fallback_uses_win_rate() {
        let mut m = metrics(150.0, 1.0, 900.0);
        m.top10_rate_percent = 25.0;
        assert_eq!(classify_with(&m, Catalog::Clan), BALANCED_CLAN);
        m.win_rate_percent = 12.0;
        assert_eq!(classify_with(&m, Catalog::Clan), WINNING_BALANCED_CLAN);
    }

    #[test]
    fn classification_is_deterministic() {
        let m = metrics(275.0, 2.1, 850.0);
        let first = classify(&m);
        for _ in 0..10 {
            assert_eq!(classify(&m), first);
        }
    }
}
