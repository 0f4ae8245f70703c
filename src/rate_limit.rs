use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use colored::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const MAX_REQUESTS_PER_MINUTE: u32 = 10;
const MAX_REQUESTS_PER_DAY: u32 = 1000;

/// API usage persisted between runs. The in-process limiter only sees the
/// current run, so back-to-back invocations check this log first.
#[derive(Debug, Serialize, Deserialize)]
pub struct RequestLog {
    pub requests_today: u32,
    pub requests_this_minute: u32,
    pub last_request: Option<DateTime<Utc>>,
    pub day_reset: DateTime<Utc>,
    pub minute_reset: DateTime<Utc>,
    #[serde(skip)]
    path: PathBuf,
}

impl RequestLog {
    pub fn new(dir: &Path) -> Self {
        let now = Utc::now();
        RequestLog {
            requests_today: 0,
            requests_this_minute: 0,
            last_request: None,
            day_reset: now + Duration::days(1),
            minute_reset: now + Duration::minutes(1),
            path: Self::log_path(dir),
        }
    }

    pub fn log_path(dir: &Path) -> PathBuf {
        dir.join("requests.json")
    }

    pub fn load(dir: &Path) -> Result<Self, AppError> {
        let path = Self::log_path(dir);

        match fs::read_to_string(&path) {
            Ok(content) => {
                let mut log: RequestLog = serde_json::from_str(&content)
                    .map_err(|e| AppError::JsonError(format!("Failed to parse request log: {}", e)))?;
                log.path = path;
                log.roll_windows(Utc::now());
                Ok(log)
            }
            Err(_) => Ok(RequestLog::new(dir)),
        }
    }

    pub fn save(&self) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::JsonError(format!("Failed to serialize request log: {}", e)))?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn roll_windows(&mut self, now: DateTime<Utc>) {
        if now > self.day_reset {
            self.requests_today = 0;
            self.day_reset = now + Duration::days(1);
        }
        if now > self.minute_reset {
            self.requests_this_minute = 0;
            self.minute_reset = now + Duration::minutes(1);
        }
    }

    pub fn can_make_request(&self) -> bool {
        self.requests_today < MAX_REQUESTS_PER_DAY && self.requests_this_minute < MAX_REQUESTS_PER_MINUTE
    }

    pub fn record_request(&mut self) {
        let now = Utc::now();
        self.roll_windows(now);
        self.requests_today += 1;
        self.requests_this_minute += 1;
        self.last_request = Some(now);
    }

    pub fn remaining(&self) -> u32 {
        MAX_REQUESTS_PER_DAY
            .saturating_sub(self.requests_today)
            .min(MAX_REQUESTS_PER_MINUTE.saturating_sub(self.requests_this_minute))
    }

    pub fn display_status(&self) {
        let until_reset = self.minute_reset.signed_duration_since(Utc::now());

        println!("\n{}", "📊 API Usage".bold());
        println!("   Minute: {}/{} requests", self.requests_this_minute, MAX_REQUESTS_PER_MINUTE);
        println!("   Daily:  {}/{} requests", self.requests_today, MAX_REQUESTS_PER_DAY);
        println!("   Remaining now: {} requests", self.remaining());
        println!("   Window resets in: {}s\n", until_reset.num_seconds().max(0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minute_quota_blocks_and_rolls_over() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = RequestLog::new(dir.path());
        for _ in 0..MAX_REQUESTS_PER_MINUTE {
            assert!(log.can_make_request());
            log.record_request();
        }
        assert!(!log.can_make_request());
        assert_eq!(log.remaining(), 0);

        log.roll_windows(log.minute_reset + Duration::seconds(1));
        assert!(log.can_make_request());
        assert_eq!(log.requests_today, MAX_REQUESTS_PER_MINUTE);
    }

    #[test]
    fn persists_counts() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = RequestLog::new(dir.path());
        log.record_request();
        log.record_request();
        log.save().unwrap();

        let loaded = RequestLog::load(dir.path()).unwrap();
        assert_eq!(loaded.requests_today, 2);
        assert_eq!(loaded.requests_this_minute, 2);
    }
}
