//! Ratatui widget for a [`ChartArtifact`] - price canvas, axis labels, date footer and an
//! optional volume canvas.

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::Line,
    widgets::{
        Block, Paragraph, Widget,
        canvas::{Canvas, Context, Line as CanvasLine},
    },
};

use super::{CandleMark, ChartArtifact, VolumePane};

/// Width of the price label column.
const Y_AXIS_WIDTH: u16 = 10;

/// Below this height the volume pane is dropped so the price pane stays readable.
const MIN_HEIGHT_FOR_VOLUME: u16 = 10;

/// Half width of a candle body in x units (one unit per candle).
const BODY_HALF_WIDTH: f64 = 0.3;

/// Draws a [`ChartArtifact`] into the given area.
#[derive(Debug, Clone)]
pub struct CandleChart<'a> {
    artifact: &'a ChartArtifact,
    block: Option<Block<'a>>,
}

impl<'a> CandleChart<'a> {
    pub fn new(artifact: &'a ChartArtifact) -> Self {
        Self {
            artifact,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for CandleChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = self.artifact.style;
        buf.set_style(area, Style::default().bg(style.background).fg(style.text));

        let inner = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };

        if inner.width <= Y_AXIS_WIDTH || inner.height < 3 || self.artifact.candles.is_empty() {
            return;
        }

        // Price pane (with date footer) on top, volume pane below when requested and it fits
        let volume = self
            .artifact
            .volume
            .as_ref()
            .filter(|_| inner.height >= MIN_HEIGHT_FOR_VOLUME);
        let (price_area, volume_area) = match volume {
            Some(_) => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
                    .split(inner);
                (chunks[0], Some(chunks[1]))
            }
            None => (inner, None),
        };

        let price_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(price_area);

        render_price_pane(self.artifact, price_chunks[0], buf);
        render_date_footer(self.artifact, price_chunks[1], buf);

        if let (Some(pane), Some(volume_area)) = (volume, volume_area) {
            render_volume_pane(self.artifact, pane, volume_area, buf);
        }
    }
}

fn split_axis(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(Y_AXIS_WIDTH), Constraint::Min(1)])
        .split(area);
    (chunks[0], chunks[1])
}

fn render_price_pane(artifact: &ChartArtifact, area: Rect, buf: &mut Buffer) {
    let (axis_area, plot_area) = split_axis(area);
    let [min, max] = artifact.price_bounds;
    let style = artifact.style;

    // Axis labels: top, middle, bottom
    let labels = (0..axis_area.height)
        .map(|row| {
            let last = axis_area.height.saturating_sub(1);
            let label = if row == 0 {
                format_price(max, max)
            } else if row == last {
                format_price(min, max)
            } else if row == last / 2 {
                format_price((min + max) / 2.0, max)
            } else {
                String::new()
            };
            Line::from(label)
        })
        .collect::<Vec<_>>();
    Paragraph::new(labels)
        .alignment(Alignment::Right)
        .style(Style::default().fg(style.text).bg(style.background))
        .render(axis_area, buf);

    let x_max = artifact.candles.len() as f64;
    Canvas::default()
        .background_color(style.background)
        .marker(Marker::Braille)
        .x_bounds([0.0, x_max])
        .y_bounds([min, max])
        .paint(|ctx| {
            draw_grid(ctx, x_max, [min, max], style.grid);
            if let Some(last) = artifact.candles.last() {
                // Last close marker
                ctx.draw(&CanvasLine {
                    x1: 0.0,
                    y1: last.close,
                    x2: x_max,
                    y2: last.close,
                    color: style.accent,
                });
            }
            ctx.layer();

            for (index, candle) in artifact.candles.iter().enumerate() {
                draw_candle(ctx, index as f64 + 0.5, candle);
            }
            ctx.layer();

            for overlay in &artifact.overlays {
                let points = overlay
                    .points
                    .iter()
                    .enumerate()
                    .filter_map(|(index, point)| point.map(|value| (index as f64 + 0.5, value)));
                for ((x1, y1), (x2, y2)) in points.tuple_windows() {
                    ctx.draw(&CanvasLine {
                        x1,
                        y1,
                        x2,
                        y2,
                        color: overlay.colour,
                    });
                }
            }
        })
        .render(plot_area, buf);
}

fn draw_grid(ctx: &mut Context<'_>, x_max: f64, [min, max]: [f64; 2], colour: Color) {
    for step in 1..4 {
        let y = min + (max - min) * step as f64 / 4.0;
        ctx.draw(&CanvasLine {
            x1: 0.0,
            y1: y,
            x2: x_max,
            y2: y,
            color: colour,
        });
    }
}

fn draw_candle(ctx: &mut Context<'_>, x: f64, candle: &CandleMark) {
    // Wick
    ctx.draw(&CanvasLine {
        x1: x,
        y1: candle.low,
        x2: x,
        y2: candle.high,
        color: candle.colour,
    });

    // Body, filled with vertical strokes across its width
    let (bottom, top) = if candle.open <= candle.close {
        (candle.open, candle.close)
    } else {
        (candle.close, candle.open)
    };
    let offsets = [
        -BODY_HALF_WIDTH,
        -BODY_HALF_WIDTH / 2.0,
        0.0,
        BODY_HALF_WIDTH / 2.0,
        BODY_HALF_WIDTH,
    ];
    for offset in offsets {
        ctx.draw(&CanvasLine {
            x1: x + offset,
            y1: bottom,
            x2: x + offset,
            y2: top,
            color: candle.colour,
        });
    }
}

fn render_date_footer(artifact: &ChartArtifact, area: Rect, buf: &mut Buffer) {
    let (_, footer_area) = split_axis(area);
    let style = Style::default().fg(artifact.style.text).bg(artifact.style.background);

    if let Some(first) = artifact.first_date() {
        Paragraph::new(first.format("%Y-%m-%d").to_string())
            .style(style)
            .render(footer_area, buf);
    }
    if let Some(last) = artifact.last_date().filter(|_| artifact.candles.len() > 1) {
        Paragraph::new(last.format("%Y-%m-%d").to_string())
            .alignment(Alignment::Right)
            .style(style)
            .render(footer_area, buf);
    }
}

fn render_volume_pane(artifact: &ChartArtifact, pane: &VolumePane, area: Rect, buf: &mut Buffer) {
    let (axis_area, plot_area) = split_axis(area);
    let style = artifact.style;

    Paragraph::new(vec![Line::from(format_volume(pane.max))])
        .alignment(Alignment::Right)
        .style(Style::default().fg(style.text).bg(style.background))
        .render(axis_area, buf);

    let y_max = if pane.max > 0.0 { pane.max * 1.05 } else { 1.0 };
    Canvas::default()
        .background_color(style.background)
        .marker(Marker::Braille)
        .x_bounds([0.0, pane.bars.len() as f64])
        .y_bounds([0.0, y_max])
        .paint(|ctx| {
            for (index, volume) in pane.bars.iter().enumerate() {
                let x = index as f64 + 0.5;
                for offset in [-BODY_HALF_WIDTH, 0.0, BODY_HALF_WIDTH] {
                    ctx.draw(&CanvasLine {
                        x1: x + offset,
                        y1: 0.0,
                        x2: x + offset,
                        y2: *volume,
                        color: pane.colour,
                    });
                }
            }
        })
        .render(plot_area, buf);
}

/// Format a price label; whole numbers for won-scale prices.
fn format_price(price: f64, scale: f64) -> String {
    if scale.abs() >= 1_000.0 {
        format!("{price:.0} ")
    } else {
        format!("{price:.2} ")
    }
}

/// Compact volume label, eg/ "17.1M".
fn format_volume(volume: f64) -> String {
    if volume >= 1_000_000_000.0 {
        format!("{:.1}B ", volume / 1_000_000_000.0)
    } else if volume >= 1_000_000.0 {
        format!("{:.1}M ", volume / 1_000_000.0)
    } else if volume >= 1_000.0 {
        format!("{:.1}K ", volume / 1_000.0)
    } else {
        format!("{volume:.0} ")
    }
}
