use crate::analysis::models::{MatchRecord, SeasonTotals};
use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CachedAccount {
    pub account_id: String,
    pub name: String,
    pub cached_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CachedSeason {
    pub totals: SeasonTotals,
    pub cached_at: DateTime<Utc>,
}

/// Telemetry fetched for one player on one shard.
///
/// Match records never change once played, so they are kept indefinitely.
/// The match id list and season totals go stale after the TTL.
#[derive(Debug, Serialize, Deserialize)]
pub struct TelemetryCache {
    pub player: String,
    pub shard: String,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub match_ids: Vec<String>,
    #[serde(default)]
    pub matches: Vec<MatchRecord>,
    #[serde(default)]
    pub account: Option<CachedAccount>,
    #[serde(default)]
    pub season: Option<CachedSeason>,
    #[serde(skip)]
    dir: PathBuf,
}

pub fn default_cache_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".squad_analytics")
}

impl TelemetryCache {
    pub fn new(dir: &Path, player: &str, shard: &str) -> Self {
        TelemetryCache {
            player: player.to_string(),
            shard: shard.to_string(),
            // Epoch so a new cache is stale until the first refresh.
            last_updated: DateTime::<Utc>::default(),
            match_ids: Vec::new(),
            matches: Vec::new(),
            account: None,
            season: None,
            dir: dir.to_path_buf(),
        }
    }

    pub fn cache_path(dir: &Path, player: &str, shard: &str) -> PathBuf {
        let safe: String = player
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        dir.join(format!("{}_{}.json", shard, safe.to_lowercase()))
    }

    pub fn load(dir: &Path, player: &str, shard: &str) -> Result<Self, AppError> {
        let path = Self::cache_path(dir, player, shard);

        match fs::read_to_string(&path) {
            Ok(content) => {
                let mut cache: TelemetryCache = serde_json::from_str(&content)
                    .map_err(|e| AppError::JsonError(format!("Failed to parse cache: {}", e)))?;
                cache.dir = dir.to_path_buf();
                Ok(cache)
            }
            Err(_) => Ok(TelemetryCache::new(dir, player, shard)),
        }
    }

    pub fn save(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir)?;
        let path = Self::cache_path(&self.dir, &self.player, &self.shard);
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::JsonError(format!("Failed to serialize cache: {}", e)))?;
        fs::write(&path, json)?;
        Ok(())
    }

    pub fn is_stale(&self, ttl_minutes: u64) -> bool {
        let age = Utc::now().signed_duration_since(self.last_updated);
        age > Duration::minutes(ttl_minutes as i64)
    }

    pub fn set_account(&mut self, account_id: &str, name: &str) {
        self.account = Some(CachedAccount {
            account_id: account_id.to_string(),
            name: name.to_string(),
            cached_at: Utc::now(),
        });
    }

    pub fn set_season(&mut self, totals: SeasonTotals) {
        self.season = Some(CachedSeason {
            totals,
            cached_at: Utc::now(),
        });
    }

    pub fn fresh_season(&self, ttl_minutes: u64) -> Option<SeasonTotals> {
        self.season
            .as_ref()
            .filter(|s| Utc::now().signed_duration_since(s.cached_at) <= Duration::minutes(ttl_minutes as i64))
            .map(|s| s.totals)
    }

    /// Ids from `ids` that have no cached record yet.
    pub fn missing(&self, ids: &[String]) -> Vec<String> {
        let cached: HashSet<&str> = self.matches.iter().map(|m| m.match_id.as_str()).collect();
        ids.iter().filter(|id| !cached.contains(id.as_str())).cloned().collect()
    }

    /// Replace the id list and merge in newly fetched records.
    pub fn update(&mut self, match_ids: Vec<String>, new_matches: Vec<MatchRecord>) {
        let existing: HashSet<String> = self.matches.iter().map(|m| m.match_id.clone()).collect();
        for record in new_matches {
            if !existing.contains(&record.match_id) {
                self.matches.push(record);
            }
        }

        // Most recent first; records without a timestamp sink to the end.
        self.matches.sort_by(|a, b| b.played_at.cmp(&a.played_at));
        self.match_ids = match_ids;
        self.last_updated = Utc::now();
    }

    /// Cached records for the current id list, in list order.
    pub fn recent_matches(&self, count: usize) -> Vec<MatchRecord> {
        self.match_ids
            .iter()
            .filter_map(|id| self.matches.iter().find(|m| &m.match_id == id))
            .take(count)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(id: &str, day: u32) -> MatchRecord {
        let mut m = MatchRecord::new(id, "me", 3, 25);
        m.played_at = Some(Utc.with_ymd_and_hms(2024, 6, day, 10, 0, 0).unwrap());
        m.damage = Some(100.0);
        m
    }

    #[test]
    fn new_cache_is_stale() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TelemetryCache::new(dir.path(), "Me", "steam");
        assert!(cache.is_stale(30));
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = TelemetryCache::new(dir.path(), "Me", "steam");
        cache.set_account("account.me", "Me");
        cache.update(vec!["b".to_string(), "a".to_string()], vec![record("a", 1), record("b", 2)]);
        cache.save().unwrap();

        let loaded = TelemetryCache::load(dir.path(), "Me", "steam").unwrap();

        assert!(!loaded.is_stale(30));
        assert_eq!(loaded.account.as_ref().unwrap().account_id, "account.me");
        let ids: Vec<String> = loaded.recent_matches(10).into_iter().map(|m| m.match_id).collect();
        assert_eq!(ids, vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn missing_lists_only_unfetched_ids() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = TelemetryCache::new(dir.path(), "Me", "steam");
        cache.update(vec!["a".to_string()], vec![record("a", 1)]);

        let missing = cache.missing(&["c".to_string(), "a".to_string(), "b".to_string()]);

        assert_eq!(missing, vec!["c".to_string(), "b".to_string()]);
    }

    #[test]
    fn update_deduplicates_and_respects_count() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = TelemetryCache::new(dir.path(), "Me", "steam");
        cache.update(vec!["a".to_string()], vec![record("a", 1)]);
        cache.update(
            vec!["c".to_string(), "b".to_string(), "a".to_string()],
            vec![record("a", 1), record("b", 2), record("c", 3)],
        );

        assert_eq!(cache.matches.len(), 3);
        assert_eq!(cache.recent_matches(2).len(), 2);
        assert_eq!(cache.recent_matches(2)[0].match_id, "c");
    }

    #[test]
    fn season_expires_with_ttl() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = TelemetryCache::new(dir.path(), "Me", "steam");
        cache.set_season(SeasonTotals {
            rounds_played: 4,
            ..SeasonTotals::default()
        });
        assert_eq!(cache.fresh_season(30).unwrap().rounds_played, 4);

        if let Some(season) = cache.season.as_mut() {
            season.cached_at = Utc::now() - Duration::minutes(31);
        }
        assert!(cache.fresh_season(30).is_none());
    }

    #[test]
    fn unreadable_path_falls_back_to_empty_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TelemetryCache::load(dir.path(), "nobody", "steam").unwrap();
        assert!(cache.matches.is_empty());
    }
}
