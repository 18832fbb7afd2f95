use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::logger::LoggerError;

/// Validated `EnvFilter` expression.
///
/// Besides the tracing level names, the classic `warning` and `fatal` are
/// accepted and stored as `warn` and `error`, alone or as a directive level
/// (`stackd_core=warning`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoggerLevel(String);

impl LoggerLevel {
    pub fn new(s: impl Into<String>) -> Result<Self, LoggerError> {
        Self::try_from(s.into())
    }

    /// Normalized filter string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the filter. Falls back to `info` if the expression stopped parsing.
    pub fn to_env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(self.as_str()).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Map classic level names onto tracing ones, directive by directive.
fn normalize(expr: &str) -> String {
    expr.split(',')
        .map(|directive| {
            let directive = directive.trim();
            let (target, level) = match directive.rsplit_once('=') {
                Some((t, l)) => (Some(t), l),
                None => (None, directive),
            };
            let level = match level.to_ascii_lowercase().as_str() {
                "warning" => "warn".to_string(),
                "fatal" => "error".to_string(),
                _ => level.to_string(),
            };
            match target {
                Some(t) => format!("{t}={level}"),
                None => level,
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

const LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// First directive whose level is not a known level name.
///
/// `EnvFilter` reads a bare unknown word as a target, so `inf` would
/// otherwise be accepted as "everything from target `inf`".
fn unknown_level(normalized: &str) -> Option<&str> {
    normalized
        .split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(|d| d.rsplit_once('=').map_or(d, |(_, level)| level))
        .find(|level| !LEVELS.contains(&level.to_ascii_lowercase().as_str()))
}

impl Default for LoggerLevel {
    fn default() -> Self {
        LoggerLevel("info".to_string())
    }
}

impl FromStr for LoggerLevel {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl TryFrom<String> for LoggerLevel {
    type Error = LoggerError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        let normalized = normalize(&s);
        if let Some(level) = unknown_level(&normalized) {
            return Err(LoggerError::InvalidLevel(format!("{s}: unknown level '{level}'")));
        }
        match EnvFilter::try_new(&normalized) {
            Ok(_) => Ok(LoggerLevel(normalized)),
            Err(e) => Err(LoggerError::InvalidLevel(format!("{s}: {e}"))),
        }
    }
}

impl From<LoggerLevel> for String {
    fn from(l: LoggerLevel) -> Self {
        l.0
    }
}
