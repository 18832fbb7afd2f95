use std::io::IsTerminal;

use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::format::FmtSpan;

use crate::logger::object::{LoggerFormat, LoggerLevel, LoggerTimeZone};

/// Logging section of the agent configuration.
///
/// Keys are camelCase (`withTargets`, `useColor`, `spanTimings`); missing keys take defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// Filter expression (`"info"`, `"stackd_core=debug,warning"`).
    pub level: LoggerLevel,
    pub tz: LoggerTimeZone,
    /// Print the module path of each event.
    pub with_targets: bool,
    /// Ignored when stdout is not a terminal.
    pub use_color: bool,
    /// Emit an event with busy/idle time when a span closes
    /// (`stage_application`, `resource_offer`, `status_update`).
    pub span_timings: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::Text,
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::Utc,
            with_targets: true,
            use_color: true,
            span_timings: false,
        }
    }
}

impl LoggerConfig {
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }

    pub(crate) fn span_events(&self) -> FmtSpan {
        if self.span_timings {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}
