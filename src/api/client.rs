use crate::analysis::models::{MatchRecord, SeasonTotals};
use crate::config::Config;
use crate::error::AppError;
use governor::{
    clock::{Clock, DefaultClock},
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

use super::convert;
use super::endpoints;
use super::models::*;

// PUBG development keys allow 10 requests per minute
const REQUESTS_PER_MINUTE: u32 = 10;
const MAX_RETRIES: u32 = 3;

/// Account resolved from a player name.
#[derive(Debug, Clone)]
pub struct PlayerAccount {
    pub account_id: String,
    pub name: String,
    /// Most recent first, as the API lists them.
    pub match_ids: Vec<String>,
}

pub struct PubgApiClient {
    api_key: String,
    base_url: String,
    shard: String,
    game_mode: String,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    clock: DefaultClock,
}

impl PubgApiClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let api_key = config.require_api_key()?.to_string();
        let per_minute = NonZeroU32::new(REQUESTS_PER_MINUTE)
            .ok_or_else(|| AppError::ConfigError("request quota must be non-zero".to_string()))?;

        Ok(PubgApiClient {
            api_key,
            base_url: config.api_base.clone(),
            shard: config.shard.clone(),
            game_mode: config.game_mode.clone(),
            rate_limiter: RateLimiter::direct(Quota::per_minute(per_minute)),
            clock: DefaultClock::default(),
        })
    }

    pub fn shard(&self) -> &str {
        &self.shard
    }

    fn wait_for_quota(&self) {
        while let Err(not_until) = self.rate_limiter.check() {
            let wait = not_until.wait_time_from(self.clock.now());
            debug!(wait_ms = wait.as_millis() as u64, "waiting for request quota");
            thread::sleep(wait);
        }
    }

    fn execute_request(&self, url: &str) -> Result<String, AppError> {
        let mut retry_count = 0;

        loop {
            self.wait_for_quota();

            let response = ureq::get(url)
                .set("Authorization", &format!("Bearer {}", self.api_key))
                .set("Accept", "application/vnd.api+json")
                .set("User-Agent", concat!("squad_analytics/", env!("CARGO_PKG_VERSION")))
                .call();

            match response {
                Ok(resp) => {
                    return resp.into_string().map_err(|e| AppError::HttpError(e.to_string()));
                }
                Err(ureq::Error::Status(429, _)) => {
                    if retry_count >= MAX_RETRIES {
                        return Err(AppError::RateLimited);
                    }
                    let wait_ms = 2000 * (retry_count + 1) as u64;
                    warn!(wait_ms, "rate limited by API, retrying");
                    thread::sleep(Duration::from_millis(wait_ms));
                    retry_count += 1;
                }
                Err(ureq::Error::Status(404, _)) => {
                    return Err(AppError::ApiError(format!("not found: {}", url)));
                }
                Err(ureq::Error::Status(401, _)) => {
                    return Err(AppError::ConfigError("PUBG_API_KEY was rejected".to_string()));
                }
                Err(e) => {
                    return Err(AppError::HttpError(e.to_string()));
                }
            }
        }
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        let body = self.execute_request(url)?;
        serde_json::from_str(&body).map_err(|e| AppError::JsonError(e.to_string()))
    }

    pub fn get_player(&self, player_name: &str) -> Result<PlayerAccount, AppError> {
        let url = endpoints::players_by_name(&self.base_url, &self.shard, player_name);
        let doc: Document<Vec<PlayerDto>> = self.get_json(&url).map_err(|e| match e {
            AppError::ApiError(_) => AppError::PlayerNotFound(player_name.to_string()),
            other => other,
        })?;

        let player = doc
            .data
            .into_iter()
            .next()
            .ok_or_else(|| AppError::PlayerNotFound(player_name.to_string()))?;

        Ok(PlayerAccount {
            account_id: player.id,
            name: player.attributes.name,
            match_ids: player.relationships.matches.data.into_iter().map(|m| m.id).collect(),
        })
    }

    /// Fetch one match and extract the player's record from it.
    pub fn get_match(&self, match_id: &str, account: &PlayerAccount) -> Result<Option<MatchRecord>, AppError> {
        let url = endpoints::match_detail(&self.base_url, &self.shard, match_id);
        let doc: Document<MatchDto> = self.get_json(&url)?;
        Ok(convert::match_record(&doc.data, &doc.included, &account.account_id, &account.name))
    }

    pub fn get_current_season(&self) -> Result<Option<String>, AppError> {
        let url = endpoints::seasons(&self.base_url, &self.shard);
        let doc: Document<Vec<SeasonDto>> = self.get_json(&url)?;
        Ok(doc
            .data
            .into_iter()
            .find(|s| s.attributes.is_current_season)
            .map(|s| s.id))
    }

    /// The player's totals in `season_id` for the configured game mode.
    pub fn get_player_season(
        &self,
        account: &PlayerAccount,
        season_id: &str,
    ) -> Result<Option<SeasonTotals>, AppError> {
        let url = endpoints::player_season(&self.base_url, &self.shard, &account.account_id, season_id);
        let doc: Document<PlayerSeasonDto> = self.get_json(&url)?;

        Ok(doc
            .data
            .attributes
            .game_mode_stats
            .get(&self.game_mode)
            .map(convert::season_totals))
    }
}
