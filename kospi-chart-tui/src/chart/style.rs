//! Named chart palettes.
//!
//! Market colours (up/down candles, volume, moving averages) are fixed in
//! [`super`] and override whatever a style would otherwise use.

use ratatui::style::Color;

/// Terminal palette applied to a rendered chart.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ChartStyle {
    pub name: &'static str,
    pub background: Color,
    pub grid: Color,
    pub text: Color,
    pub accent: Color,
}

/// Name of the style selected when nothing else is chosen.
pub const DEFAULT_STYLE: &str = "default";

const fn style(
    name: &'static str,
    background: (u8, u8, u8),
    grid: (u8, u8, u8),
    text: (u8, u8, u8),
    accent: (u8, u8, u8),
) -> ChartStyle {
    ChartStyle {
        name,
        background: Color::Rgb(background.0, background.1, background.2),
        grid: Color::Rgb(grid.0, grid.1, grid.2),
        text: Color::Rgb(text.0, text.1, text.2),
        accent: Color::Rgb(accent.0, accent.1, accent.2),
    }
}

/// Every available style, ordered by name.
pub const STYLES: &[ChartStyle] = &[
    style("binance", (255, 255, 255), (234, 236, 239), (71, 77, 87), (240, 185, 11)),
    style("binancedark", (24, 26, 32), (43, 49, 57), (183, 189, 198), (240, 185, 11)),
    style("blueskies", (235, 245, 255), (200, 220, 240), (40, 60, 90), (30, 144, 255)),
    style("brasil", (255, 250, 205), (190, 220, 170), (0, 39, 118), (0, 156, 59)),
    style("charles", (255, 255, 255), (220, 220, 220), (0, 0, 0), (0, 100, 0)),
    style("checkers", (250, 250, 250), (170, 170, 170), (30, 30, 30), (178, 34, 34)),
    style("classic", (255, 255, 255), (200, 200, 200), (0, 0, 0), (0, 0, 0)),
    style("default", (220, 227, 239), (255, 255, 255), (50, 50, 50), (0, 0, 128)),
    style("ibd", (255, 255, 255), (230, 230, 230), (0, 0, 0), (0, 0, 255)),
    style("kenan", (254, 254, 246), (210, 210, 200), (60, 60, 60), (128, 0, 128)),
    style("mike", (0, 0, 0), (60, 60, 60), (200, 200, 200), (0, 191, 255)),
    style("nightclouds", (10, 10, 35), (40, 40, 70), (220, 220, 220), (255, 255, 255)),
    style("sas", (244, 244, 244), (220, 220, 220), (40, 40, 40), (0, 70, 140)),
    style("starsandstripes", (255, 255, 255), (230, 200, 205), (0, 40, 104), (191, 10, 48)),
    style("tradingview", (255, 255, 255), (240, 243, 250), (19, 23, 34), (41, 98, 255)),
    style("yahoo", (255, 255, 255), (230, 230, 230), (40, 40, 40), (0, 128, 0)),
];

impl ChartStyle {
    /// Look up a style by exact name.
    pub fn by_name(name: &str) -> Option<ChartStyle> {
        STYLES.iter().find(|style| style.name == name).copied()
    }

    /// Index of a style within [`STYLES`].
    pub fn position(name: &str) -> Option<usize> {
        STYLES.iter().position(|style| style.name == name)
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        STYLES.iter().map(|style| style.name)
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        ChartStyle::by_name(DEFAULT_STYLE).unwrap_or(STYLES[0])
    }
}
