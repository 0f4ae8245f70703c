use serde::Serialize;
use std::fmt;

/// Letter grade for a single match placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Grade {
    #[serde(rename = "SSS+")]
    SssPlus,
    #[serde(rename = "SS")]
    Ss,
    S,
    A,
    B,
    C,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "N/A")]
    NotAvailable,
}

// Upper bounds of each band, in sixteenths of the field.
const BANDS: [(i64, Grade); 6] = [
    (1, Grade::SssPlus),
    (2, Grade::Ss),
    (3, Grade::S),
    (4, Grade::A),
    (6, Grade::B),
    (8, Grade::C),
];

impl Grade {
    pub fn label(&self) -> &'static str {
        match self {
            Grade::SssPlus => "SSS+",
            Grade::Ss => "SS",
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::CMinus => "C-",
            Grade::NotAvailable => "N/A",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Grade a finish by its rank relative to the number of competing teams.
///
/// Comparison is `rank / total <= k / 16`, done in integers so boundary
/// ranks always land in the better band.
pub fn grade(rank: i64, total_teams: i64) -> Grade {
    if rank <= 0 || total_teams <= 0 {
        return Grade::NotAvailable;
    }

    let scaled = rank.saturating_mul(16);
    BANDS
        .iter()
        .find(|(sixteenths, _)| scaled <= total_teams.saturating_mul(*sixteenths))
        .map(|(_, g)| *g)
        .unwrap_or(Grade::CMinus)
}

/// Percentage of the field the finish placed within (lower is better).
pub fn top_percent(rank: i64, total_teams: i64) -> Option<f64> {
    if rank <= 0 || total_teams <= 0 {
        None
    } else {
        Some(100.0 * rank as f64 / total_teams as f64)
    }
}
