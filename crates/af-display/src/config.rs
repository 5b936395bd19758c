//! Render-mode selection and per-mode limits.

use std::str::FromStr;
use std::sync::OnceLock;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable consulted once for the process-wide default mode.
pub const OUTPUT_MODE_ENV: &str = "AMBERFRAME_OUTPUT_MODE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown render mode '{0}'")]
    UnknownMode(String),
    #[error("invalid display options: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    #[default]
    Table,
    Summary,
    Minimal,
    Html,
}

impl RenderMode {
    /// Lenient parse: anything unrecognized degrades to `Table`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::Table;
        }
        raw.parse().unwrap_or_else(|err: ConfigError| {
            warn!("{err}; falling back to table mode");
            Self::Table
        })
    }

    /// Read the mode from [`OUTPUT_MODE_ENV`]; absent or malformed values
    /// give `Table`.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(OUTPUT_MODE_ENV) {
            Ok(raw) => Self::parse(&raw),
            Err(std::env::VarError::NotPresent) => Self::Table,
            Err(err) => {
                warn!("{OUTPUT_MODE_ENV} is unreadable ({err}); falling back to table mode");
                Self::Table
            }
        }
    }
}

impl FromStr for RenderMode {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "table" | "plain" => Ok(Self::Table),
            "summary" | "tdr" => Ok(Self::Summary),
            "minimal" | "minimum" => Ok(Self::Minimal),
            "html" => Ok(Self::Html),
            _ => Err(ConfigError::UnknownMode(raw.to_owned())),
        }
    }
}

/// Process-wide default mode, resolved from the environment on first use.
pub fn default_render_mode() -> RenderMode {
    static DEFAULT_MODE: OnceLock<RenderMode> = OnceLock::new();
    *DEFAULT_MODE.get_or_init(RenderMode::from_env)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableLimits {
    /// Character budget for the data columns (separators not counted).
    pub width: usize,
    pub head: usize,
    pub tail: usize,
}

impl Default for TableLimits {
    fn default() -> Self {
        Self {
            width: 80,
            head: 5,
            tail: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryLimit {
    All,
    Count(usize),
}

impl SummaryLimit {
    #[must_use]
    pub fn shown(self, column_count: usize) -> usize {
        match self {
            Self::All => column_count,
            Self::Count(n) => n.min(column_count),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryLimits {
    pub limit: SummaryLimit,
    /// Columns with at most this many distinct values preview as a tally.
    pub tally: usize,
    /// Leading values shown in a list preview.
    pub elements: usize,
}

impl Default for SummaryLimits {
    fn default() -> Self {
        Self {
            limit: SummaryLimit::Count(10),
            tally: 5,
            elements: 5,
        }
    }
}

/// Columns listed by the summary in the default `Display` rendering.
pub const INSPECT_SUMMARY_COLUMNS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlLimits {
    pub max_rows: usize,
    pub max_columns: usize,
}

impl Default for HtmlLimits {
    fn default() -> Self {
        Self {
            max_rows: 8,
            max_columns: 15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    pub table: TableLimits,
    pub summary: SummaryLimits,
    pub html: HtmlLimits,
}

impl DisplayOptions {
    /// Options behind the default `Display` rendering: the summary lists only
    /// the first [`INSPECT_SUMMARY_COLUMNS`] columns.
    #[must_use]
    pub fn inspect() -> Self {
        Self {
            summary: SummaryLimits {
                limit: SummaryLimit::Count(INSPECT_SUMMARY_COLUMNS),
                ..SummaryLimits::default()
            },
            ..Self::default()
        }
    }

    /// Parse options from JSON; omitted fields keep their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }
}
