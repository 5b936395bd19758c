#![forbid(unsafe_code)]

//! Text and HTML renderings of a [`af_columnar::Table`].
//!
//! Four modes are available: an aligned table, a per-column summary, a
//! one-line minimal header and an HTML table. Every renderer is a pure
//! function of the table and its limits; the only process-wide state is the
//! default [`RenderMode`], read once from the environment.

pub mod classify;
pub mod config;
pub mod html;
pub mod level;
pub mod preview;
pub mod render;
pub mod summary;
pub mod table;
pub mod text;

pub use classify::{TypeGroup, classify};
pub use config::{
    ConfigError, DisplayOptions, HtmlLimits, INSPECT_SUMMARY_COLUMNS, OUTPUT_MODE_ENV,
    RenderMode, SummaryLimit, SummaryLimits, TableLimits, default_render_mode,
};
pub use html::render_html;
pub use level::{LevelAnalysis, analyze};
pub use render::{TEXT_HTML, TEXT_PLAIN, display_pair, render, render_default, render_minimal};
pub use summary::render_summary;
pub use table::render_table;
