use crate::api::endpoints::API_BASE;
use crate::error::AppError;
use std::env;

pub const DEFAULT_SHARD: &str = "steam";
pub const DEFAULT_GAME_MODE: &str = "squad-fpp";
pub const DEFAULT_CACHE_TTL_MINUTES: u64 = 30;
pub const DEFAULT_PERFORMANCE_BAR: f64 = 300.0;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_base: String,
    pub shard: String,
    pub game_mode: String,
    pub cache_ttl_minutes: u64,
    pub performance_bar: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: None,
            api_base: API_BASE.to_string(),
            shard: DEFAULT_SHARD.to_string(),
            game_mode: DEFAULT_GAME_MODE.to_string(),
            cache_ttl_minutes: DEFAULT_CACHE_TTL_MINUTES,
            performance_bar: DEFAULT_PERFORMANCE_BAR,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_key = env::var("PUBG_API_KEY").ok().filter(|k| !k.trim().is_empty());
        let api_base = env::var("PUBG_API_BASE")
            .map(|b| b.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| API_BASE.to_string());
        let shard = env::var("PUBG_SHARD").unwrap_or_else(|_| DEFAULT_SHARD.to_string());
        let game_mode = env::var("PUBG_GAME_MODE").unwrap_or_else(|_| DEFAULT_GAME_MODE.to_string());

        let cache_ttl_minutes = match env::var("CACHE_TTL_MINUTES") {
            Ok(v) => v.parse().map_err(|_| {
                AppError::ConfigError(format!("CACHE_TTL_MINUTES must be a whole number, got {:?}", v))
            })?,
            Err(_) => DEFAULT_CACHE_TTL_MINUTES,
        };

        let performance_bar = match env::var("PERFORMANCE_BAR") {
            Ok(v) => v.parse().map_err(|_| {
                AppError::ConfigError(format!("PERFORMANCE_BAR must be a number, got {:?}", v))
            })?,
            Err(_) => DEFAULT_PERFORMANCE_BAR,
        };

        Ok(Config {
            api_key,
            api_base,
            shard,
            game_mode,
            cache_ttl_minutes,
            performance_bar,
        })
    }

    pub fn require_api_key(&self) -> Result<&str, AppError> {
        self.api_key.as_deref().ok_or_else(|| {
            AppError::ConfigError("PUBG_API_KEY not found in environment or .env file".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_a_config_error() {
        let config = Config::default();
        assert!(matches!(config.require_api_key(), Err(AppError::ConfigError(_))));

        let config = Config {
            api_key: Some("key".to_string()),
            ..Config::default()
        };
        assert_eq!(config.require_api_key().unwrap(), "key");
    }
}
