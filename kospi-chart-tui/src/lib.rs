#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_extern_crates,
    clippy::unused_self,
    clippy::useless_let_if_seq,
    missing_debug_implementations,
    rust_2018_idioms,
    rust_2024_compatibility
)]

//! # Kospi-Chart-Tui
//! Terminal dashboard for KOSPI candlestick charts.
//!
//! Pick a ticker, a lookback period, a chart style and whether to show traded volume, then
//! submit to fetch the daily series and draw it with 5, 20 and 60 day moving averages.
//!
//! * [`chart`]: pure chart rendering into a [`ChartArtifact`](chart::ChartArtifact), plus the
//!   ratatui widget that draws it.
//! * [`shell`]: the selection form and the submission state machine.

/// Candlestick chart rendering.
pub mod chart;

/// Interaction shell.
pub mod shell;

/// Tracing subscriber setup.
pub mod logging;

pub use chart::{ChartArtifact, ChartRequest, RenderError, render};
pub use shell::{Action, Outcome, Phase, Shell};
