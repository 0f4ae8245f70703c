use crate::analysis::aggregator::from_season_totals;
use crate::analysis::models::{AggregateMetrics, MatchRecord, SeasonTotals};
use crate::api::client::{PlayerAccount, PubgApiClient};
use crate::cache::TelemetryCache;
use crate::config::Config;
use crate::error::AppError;
use crate::rate_limit::RequestLog;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Where match telemetry comes from. Implementations do all the I/O so the
/// analysis pipeline never has to.
pub trait TelemetrySource {
    /// Up to `count` of the player's matches, most recent first.
    fn recent_matches(&mut self, player: &str, count: usize) -> Result<Vec<MatchRecord>, AppError>;

    /// Provider-side season summary, used when match telemetry is unusable.
    fn season_summary(&mut self, player: &str) -> Result<Option<AggregateMetrics>, AppError>;
}

/// Live PUBG API behind the on-disk TTL cache.
pub struct ApiSource {
    client: PubgApiClient,
    cache_dir: PathBuf,
    ttl_minutes: u64,
    refresh: bool,
    request_log: RequestLog,
}

impl ApiSource {
    pub fn new(config: &Config, cache_dir: &Path, refresh: bool) -> Result<Self, AppError> {
        Ok(ApiSource {
            client: PubgApiClient::new(config)?,
            cache_dir: cache_dir.to_path_buf(),
            ttl_minutes: config.cache_ttl_minutes,
            refresh,
            request_log: RequestLog::load(cache_dir)?,
        })
    }

    pub fn request_log(&self) -> &RequestLog {
        &self.request_log
    }

    fn record_request(&mut self) {
        self.request_log.record_request();
        if let Err(e) = self.request_log.save() {
            warn!(error = %e, "could not persist request log");
        }
    }

    fn account(&mut self, cache: &mut TelemetryCache, player: &str) -> Result<PlayerAccount, AppError> {
        let account = self.client.get_player(player)?;
        self.record_request();
        cache.set_account(&account.account_id, &account.name);
        Ok(account)
    }

    fn save(cache: &TelemetryCache) {
        if let Err(e) = cache.save() {
            warn!(error = %e, player = %cache.player, "could not write telemetry cache");
        }
    }
}

impl TelemetrySource for ApiSource {
    fn recent_matches(&mut self, player: &str, count: usize) -> Result<Vec<MatchRecord>, AppError> {
        let mut cache = TelemetryCache::load(&self.cache_dir, player, self.client.shard())?;

        let has_cache = !cache.match_ids.is_empty();
        if has_cache && !self.refresh && !cache.is_stale(self.ttl_minutes) {
            debug!(player, "serving matches from fresh cache");
            return Ok(cache.recent_matches(count));
        }
        if has_cache && !self.request_log.can_make_request() {
            warn!(player, "request quota exhausted, serving stale cache");
            return Ok(cache.recent_matches(count));
        }

        let account = self.account(&mut cache, player)?;
        let ids: Vec<String> = account.match_ids.iter().take(count).cloned().collect();
        let missing = cache.missing(&ids);
        info!(player, listed = ids.len(), new = missing.len(), "fetching match details");

        let pb = ProgressBar::new(missing.len() as u64);
        if let Ok(style) = ProgressStyle::with_template("{msg} [{bar:30}] {pos}/{len}") {
            pb.set_style(style);
        }
        pb.set_message(format!("Fetching matches for {}", account.name));

        let mut fetched = Vec::with_capacity(missing.len());
        for match_id in &missing {
            let record = self.client.get_match(match_id, &account);
            self.record_request();
            pb.inc(1);
            match record {
                Ok(Some(record)) => fetched.push(record),
                Ok(None) => warn!(match_id = %match_id, "player missing from match roster"),
                // Keep what we have; one bad match shouldn't sink the report.
                Err(e) => warn!(match_id = %match_id, error = %e, "failed to fetch match"),
            }
        }
        pb.finish_and_clear();

        cache.update(ids, fetched);
        Self::save(&cache);
        Ok(cache.recent_matches(count))
    }

    fn season_summary(&mut self, player: &str) -> Result<Option<AggregateMetrics>, AppError> {
        let mut cache = TelemetryCache::load(&self.cache_dir, player, self.client.shard())?;
        if !self.refresh {
            if let Some(totals) = cache.fresh_season(self.ttl_minutes) {
                return Ok(Some(from_season_totals(&totals)));
            }
        }

        let account = match cache.account.clone() {
            Some(cached) => PlayerAccount {
                account_id: cached.account_id,
                name: cached.name,
                match_ids: Vec::new(),
            },
            None => self.account(&mut cache, player)?,
        };

        let season = self.client.get_current_season();
        self.record_request();
        let Some(season_id) = season? else {
            debug!(player, "no current season listed");
            return Ok(None);
        };

        let totals = self.client.get_player_season(&account, &season_id);
        self.record_request();

        match totals? {
            Some(totals) => {
                cache.set_season(totals);
                Self::save(&cache);
                Ok(Some(from_season_totals(&totals)))
            }
            None => Ok(None),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TelemetryFile {
    players: HashMap<String, PlayerTelemetry>,
}

#[derive(Debug, Deserialize)]
struct PlayerTelemetry {
    #[serde(default)]
    matches: Vec<MatchRecord>,
    #[serde(default)]
    season: Option<SeasonTotals>,
}

/// Telemetry exported to a JSON file:
/// `{ "players": { "<name>": { "matches": [...], "season": {...} } } }`.
pub struct FileSource {
    players: HashMap<String, PlayerTelemetry>,
}

impl FileSource {
    pub fn open(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, AppError> {
        let file: TelemetryFile = serde_json::from_str(content)
            .map_err(|e| AppError::JsonError(format!("Failed to parse telemetry file: {}", e)))?;

        let players = file
            .players
            .into_iter()
            .map(|(name, telemetry)| (name.to_lowercase(), telemetry))
            .collect();
        Ok(FileSource { players })
    }

    fn player(&self, player: &str) -> Result<&PlayerTelemetry, AppError> {
        self.players
            .get(&player.to_lowercase())
            .ok_or_else(|| AppError::PlayerNotFound(player.to_string()))
    }
}

impl TelemetrySource for FileSource {
    fn recent_matches(&mut self, player: &str, count: usize) -> Result<Vec<MatchRecord>, AppError> {
        Ok(self.player(player)?.matches.iter().take(count).cloned().collect())
    }

    fn season_summary(&mut self, player: &str) -> Result<Option<AggregateMetrics>, AppError> {
        Ok(self.player(player)?.season.as_ref().map(from_season_totals))
    }
}
