//! Activity log: one line per extraction or count check, appended to
//! `~/.shopcmp/activity.log`.

use crate::error::{Result, ShopError};
use crate::types::Platform;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Info,
    Error,
}

impl LogLevel {
    fn marker(&self) -> &'static str {
        match self {
            LogLevel::Info => "🟢",
            LogLevel::Error => "🔴",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub platform: Option<Platform>,
    pub event: String,
    pub details: Option<String>,
}

impl LogEntry {
    fn line(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.level.marker(),
            self.event,
            self.platform.map_or("*", |p| p.tag()),
            self.details.as_deref().unwrap_or("")
        )
    }
}

pub struct ActivityLogger {
    log_path: PathBuf,
}

impl ActivityLogger {
    pub fn new() -> Result<Self> {
        let user_dirs = directories::UserDirs::new()
            .ok_or_else(|| ShopError::Other("could not determine home directory".into()))?;
        let dir = user_dirs.home_dir().join(".shopcmp");
        fs::create_dir_all(&dir)?;
        Ok(Self::with_path(dir.join("activity.log")))
    }

    pub fn with_path(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
        }
    }

    pub fn log(
        &self,
        level: LogLevel,
        platform: Option<Platform>,
        event: &str,
        details: Option<&str>,
    ) -> Result<()> {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            platform,
            event: event.to_string(),
            details: details.map(str::to_string),
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(file, "{}", entry.line().trim_end())?;
        Ok(())
    }

    /// Matching lines, most recent first.
    pub fn read_logs(&self, platform: Option<Platform>, errors_only: bool) -> Result<Vec<String>> {
        if !self.log_path.exists() {
            return Ok(vec![]);
        }

        let reader = BufReader::new(fs::File::open(&self.log_path)?);
        let mut matching = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if errors_only && !line.contains(LogLevel::Error.marker()) {
                continue;
            }
            if let Some(p) = platform {
                // date, time, zone, marker, event, then platform
                if line.split(' ').nth(5) != Some(p.tag()) {
                    continue;
                }
            }
            matching.push(line);
        }

        matching.reverse();
        Ok(matching)
    }

    pub fn info(&self, platform: Option<Platform>, event: &str, details: Option<&str>) -> Result<()> {
        self.log(LogLevel::Info, platform, event, details)
    }

    pub fn error(&self, platform: Option<Platform>, event: &str, details: Option<&str>) -> Result<()> {
        self.log(LogLevel::Error, platform, event, details)
    }
}
