use chrono::NaiveDate;
use kospi_data::{PeriodDays, PriceSeries};
use ratatui::style::Color;
use smol_str::SmolStr;
use thiserror::Error;

use self::{indicator::simple_moving_average, style::ChartStyle};

/// Moving average indicators.
pub mod indicator;

/// Named [`ChartStyle`] palettes.
pub mod style;

/// Ratatui widget drawing a [`ChartArtifact`].
pub mod widget;

/// Moving average windows overlaid on every chart.
pub const MOVING_AVERAGE_WINDOWS: [usize; 3] = [5, 20, 60];

// Market colours, fixed regardless of style
pub const C_UP: Color = Color::Rgb(230, 57, 70);
pub const C_DOWN: Color = Color::Rgb(52, 101, 224);
pub const C_VOLUME: Color = Color::Rgb(128, 128, 128);

/// Overlay colours, assigned to moving average windows in order: green, blue, orange, then
/// purple, brown, pink for any further windows.
pub const OVERLAY_COLOURS: [Color; 6] = [
    Color::Rgb(46, 160, 67),
    Color::Rgb(65, 105, 225),
    Color::Rgb(255, 140, 0),
    Color::Rgb(148, 103, 189),
    Color::Rgb(140, 86, 75),
    Color::Rgb(227, 119, 194),
];

/// Fractional padding added above and below the plotted price range.
const PRICE_MARGIN: f64 = 0.02;

/// All errors generated while rendering a chart.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Error)]
pub enum RenderError {
    #[error("unknown chart style: {0}")]
    UnknownStyle(String),

    #[error("malformed price series: {0}")]
    MalformedSeries(String),
}

/// User selections for one chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    pub code: SmolStr,
    pub period: PeriodDays,
    pub style: String,
    pub show_volume: bool,
    pub moving_average_windows: Vec<usize>,
}

impl ChartRequest {
    /// Request with the fixed [`MOVING_AVERAGE_WINDOWS`].
    pub fn new(
        code: impl Into<SmolStr>,
        period: PeriodDays,
        style: impl Into<String>,
        show_volume: bool,
    ) -> Self {
        Self {
            code: code.into(),
            period,
            style: style.into(),
            show_volume,
            moving_average_windows: MOVING_AVERAGE_WINDOWS.to_vec(),
        }
    }

    /// Render `series` with this request's options.
    pub fn render(&self, series: &PriceSeries) -> Result<ChartArtifact, RenderError> {
        render(series, &self.style, &self.moving_average_windows, self.show_volume)
    }
}

/// One drawn candle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CandleMark {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Body, edge and wick colour.
    pub colour: Color,
}

/// Moving average line aligned with the candles.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub window: usize,
    pub colour: Color,
    /// One entry per candle, `None` while the window is warming up.
    pub points: Vec<Option<f64>>,
}

impl Overlay {
    /// Whether the line has at least one point to draw.
    pub fn is_drawable(&self) -> bool {
        self.points.iter().any(Option::is_some)
    }
}

/// Volume subplot.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumePane {
    pub bars: Vec<f64>,
    pub colour: Color,
    pub max: f64,
}

/// Fully resolved candlestick chart, independent of terminal size.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartArtifact {
    pub code: SmolStr,
    pub style: ChartStyle,
    pub candles: Vec<CandleMark>,
    pub overlays: Vec<Overlay>,
    pub volume: Option<VolumePane>,
    /// Plotted `[min, max]` price range.
    pub price_bounds: [f64; 2],
}

impl ChartArtifact {
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.candles.first().map(|candle| candle.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.candles.last().map(|candle| candle.date)
    }
}

/// Render a candlestick chart of `series` with one overlay per moving average window and an
/// optional volume subplot.
pub fn render(
    series: &PriceSeries,
    style: &str,
    moving_average_windows: &[usize],
    show_volume: bool,
) -> Result<ChartArtifact, RenderError> {
    let style = ChartStyle::by_name(style)
        .ok_or_else(|| RenderError::UnknownStyle(style.to_string()))?;
    validate(series, moving_average_windows)?;

    let candles: Vec<CandleMark> = series
        .candles
        .iter()
        .map(|candle| CandleMark {
            date: candle.date,
            open: candle.open,
            high: candle.high,
            low: candle.low,
            close: candle.close,
            colour: if candle.is_up() { C_UP } else { C_DOWN },
        })
        .collect();

    let closes: Vec<f64> = series.candles.iter().map(|candle| candle.close).collect();
    let overlays: Vec<Overlay> = moving_average_windows
        .iter()
        .enumerate()
        .map(|(index, window)| Overlay {
            window: *window,
            colour: OVERLAY_COLOURS[index % OVERLAY_COLOURS.len()],
            points: simple_moving_average(&closes, *window),
        })
        .collect();

    let volume = show_volume.then(|| {
        let bars: Vec<f64> = series.candles.iter().map(|candle| candle.volume).collect();
        let max = bars.iter().copied().fold(0.0, f64::max);
        VolumePane {
            bars,
            colour: C_VOLUME,
            max,
        }
    });

    let price_bounds = price_bounds(&candles, &overlays);

    Ok(ChartArtifact {
        code: series.code.clone(),
        style,
        candles,
        overlays,
        volume,
        price_bounds,
    })
}

fn validate(series: &PriceSeries, moving_average_windows: &[usize]) -> Result<(), RenderError> {
    let malformed = |reason: String| Err(RenderError::MalformedSeries(reason));

    if moving_average_windows.contains(&0) {
        return malformed("moving average window must be positive".to_string());
    }
    if series.is_empty() {
        return malformed("series has no candles".to_string());
    }

    for (index, candle) in series.candles.iter().enumerate() {
        let values = [candle.open, candle.high, candle.low, candle.close, candle.volume];
        if values.iter().any(|value| !value.is_finite()) {
            return malformed(format!("non-finite value on {}", candle.date));
        }
        if candle.volume < 0.0 {
            return malformed(format!("negative volume on {}", candle.date));
        }
        if candle.high < candle.low {
            return malformed(format!("high below low on {}", candle.date));
        }
        let body = [candle.open, candle.close];
        if body.iter().any(|price| *price < candle.low || *price > candle.high) {
            return malformed(format!("open/close outside high/low on {}", candle.date));
        }
        if index > 0 && series.candles[index - 1].date >= candle.date {
            return malformed(format!("dates not ascending at {}", candle.date));
        }
    }

    Ok(())
}

fn price_bounds(candles: &[CandleMark], overlays: &[Overlay]) -> [f64; 2] {
    let overlay_values = overlays
        .iter()
        .flat_map(|overlay| overlay.points.iter().flatten().copied());
    let lows = candles.iter().map(|candle| candle.low).chain(overlay_values.clone());
    let highs = candles.iter().map(|candle| candle.high).chain(overlay_values);

    let min = lows.fold(f64::INFINITY, f64::min);
    let max = highs.fold(f64::NEG_INFINITY, f64::max);

    let span = max - min;
    let margin = if span > 0.0 {
        span * PRICE_MARGIN
    } else {
        (max.abs() * PRICE_MARGIN).max(1.0)
    };

    [min - margin, max + margin]
}
