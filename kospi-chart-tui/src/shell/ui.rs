use kospi_data::{Market, PriceSource, TickerSource};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use super::{
    MSG_FORM_TITLE, MSG_IDLE, MSG_LOADING, MSG_TITLE, Outcome, Phase, Shell,
    form::{Field, FormState},
};
use crate::chart::{MOVING_AVERAGE_WINDOWS, OVERLAY_COLOURS, widget::CandleChart};

// Palette
const C_BG: Color = Color::Rgb(18, 18, 28);
const C_BORDER: Color = Color::Rgb(138, 43, 226);
const C_TITLE: Color = Color::Rgb(255, 215, 0);
const C_TEXT: Color = Color::Rgb(220, 220, 220);
const C_MUTED: Color = Color::Rgb(128, 128, 128);
const C_FOCUS: Color = Color::Rgb(0, 255, 255);
const C_OK: Color = Color::Rgb(0, 255, 127);
const C_WARN: Color = Color::Rgb(255, 193, 7);
const C_ERROR: Color = Color::Rgb(255, 69, 58);

/// Width of the input sidebar.
const SIDEBAR_WIDTH: u16 = 36;

/// Draw the full interaction shell.
pub fn draw<Tickers, Prices>(f: &mut Frame, shell: &Shell<Tickers, Prices>)
where
    Tickers: TickerSource,
    Prices: PriceSource,
{
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(f.area());

    render_status_bar(f, chunks[0], shell.market(), shell.tickers().len(), shell.phase());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(chunks[1]);

    render_form(f, body[0], shell.form());
    render_main(f, body[1], shell);
}

/// Screen shown while the ticker directory is loading.
pub fn draw_loading(f: &mut Frame, market: Market) {
    let message = Line::from(Span::styled(
        format!("{market} {MSG_LOADING}"),
        Style::default().fg(C_TEXT),
    ));
    draw_banner(f, market, Phase::Submitted, message);
}

/// Screen shown when the shell cannot start. Only quitting is possible.
pub fn draw_halted(f: &mut Frame, market: Market, message: &str) {
    let message = Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(C_ERROR).add_modifier(Modifier::BOLD),
    ));
    draw_banner(f, market, Phase::Error, message);
}

fn draw_banner(f: &mut Frame, market: Market, phase: Phase, message: Line<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(f.area());

    render_status_bar(f, chunks[0], market, 0, phase);

    let paragraph = Paragraph::new(vec![Line::default(), message])
        .block(panel(MSG_TITLE))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, chunks[1]);
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(C_TITLE).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(C_BORDER))
        .style(Style::default().bg(C_BG).fg(C_TEXT))
}

fn phase_label(phase: Phase) -> (&'static str, &'static str, Color) {
    match phase {
        Phase::Idle => ("○", "대기", C_MUTED),
        Phase::CollectingInput => ("◐", "입력 중", C_FOCUS),
        Phase::Submitted => ("◌", "조회 중", C_WARN),
        Phase::Displaying => ("●", "표시 중", C_OK),
        Phase::Warning => ("▲", "경고", C_WARN),
        Phase::Error => ("✖", "오류", C_ERROR),
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, market: Market, tickers: usize, phase: Phase) {
    let (symbol, text, colour) = phase_label(phase);

    let status = Span::styled(
        format!(" {symbol} {text} "),
        Style::default().fg(colour).add_modifier(Modifier::BOLD),
    );

    let universe = Span::styled(
        if tickers > 0 {
            format!(" {market} · {tickers} 종목 ")
        } else {
            format!(" {market} ")
        },
        Style::default().fg(Color::Rgb(100, 149, 237)),
    );

    let title = Span::styled(
        " ◆ KOSPI CHART TERMINAL ◆ ",
        Style::default().fg(C_TITLE).add_modifier(Modifier::BOLD),
    );

    let help = Span::styled(
        " [Tab] 이동  [Enter] 제출  [Esc] 종료 ",
        Style::default().fg(C_MUTED),
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(C_BORDER))
        .style(Style::default().bg(C_BG));

    let paragraph = Paragraph::new(Line::from(vec![status, universe, title, help]))
        .block(block)
        .alignment(Alignment::Center);

    f.render_widget(paragraph, area);
}

fn label_style(form: &FormState, field: Field) -> Style {
    if form.focus() == field {
        Style::default().fg(C_FOCUS).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(C_TEXT)
    }
}

fn render_form(f: &mut Frame, area: Rect, form: &FormState) {
    let block = panel(MSG_FORM_TITLE);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // ticker label + search
            Constraint::Min(3),    // ticker list
            Constraint::Length(2), // period
            Constraint::Length(2), // style
            Constraint::Length(2), // volume
            Constraint::Length(1), // submit
        ])
        .split(inner);

    // Ticker search
    let search = vec![
        Line::from(Span::styled("종목 선택", label_style(form, Field::Ticker))),
        Line::from(vec![
            Span::styled(" 🔍 ", Style::default().fg(C_MUTED)),
            Span::styled(form.query().to_string(), Style::default().fg(C_TEXT)),
            Span::styled(
                format!("  ({})", form.match_count()),
                Style::default().fg(C_MUTED),
            ),
        ]),
    ];
    f.render_widget(Paragraph::new(search), chunks[0]);

    let items: Vec<ListItem> = form
        .matches()
        .map(|ticker| ListItem::new(ticker.display()))
        .collect();
    let highlight = if form.focus() == Field::Ticker {
        Style::default().fg(C_BG).bg(C_FOCUS).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(C_TITLE).add_modifier(Modifier::BOLD)
    };
    let list = List::new(items)
        .style(Style::default().fg(C_TEXT))
        .highlight_style(highlight)
        .highlight_symbol("▶ ");
    let mut state = ListState::default().with_selected(form.selected_match());
    f.render_stateful_widget(list, chunks[1], &mut state);

    // Period, style, volume
    let value = Style::default().fg(C_TITLE);
    let arrows = Style::default().fg(C_MUTED);
    let selector = |label: &'static str, field: Field, current: String| {
        vec![
            Line::from(Span::styled(label, label_style(form, field))),
            Line::from(vec![
                Span::styled(" ◀ ", arrows),
                Span::styled(current, value),
                Span::styled(" ▶", arrows),
            ]),
        ]
    };

    f.render_widget(
        Paragraph::new(selector("기간(일)", Field::Period, form.period().to_string())),
        chunks[2],
    );
    f.render_widget(
        Paragraph::new(selector("차트 스타일", Field::Style, form.style().name.to_string())),
        chunks[3],
    );

    let checkbox = if form.show_volume() { "[x]" } else { "[ ]" };
    f.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled("거래량 시각화", label_style(form, Field::Volume))),
            Line::from(Span::styled(format!(" {checkbox}"), value)),
        ]),
        chunks[4],
    );

    let submit = if form.focus() == Field::Submit {
        Style::default().fg(C_BG).bg(C_FOCUS).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(C_OK).add_modifier(Modifier::BOLD)
    };
    f.render_widget(
        Paragraph::new(Span::styled("[ 제출 ]", submit)).alignment(Alignment::Center),
        chunks[5],
    );
}

fn render_main<Tickers, Prices>(f: &mut Frame, area: Rect, shell: &Shell<Tickers, Prices>)
where
    Tickers: TickerSource,
    Prices: PriceSource,
{
    let block = panel(MSG_TITLE);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let headline = shell
        .headline_ticker()
        .map(|ticker| ticker.name.clone())
        .unwrap_or_default();

    let mut legend = vec![Span::styled(" 이동평균 ", Style::default().fg(C_MUTED))];
    legend.extend(
        MOVING_AVERAGE_WINDOWS
            .iter()
            .zip(OVERLAY_COLOURS)
            .map(|(window, colour)| {
                Span::styled(format!("━ {window}일  "), Style::default().fg(colour))
            }),
    );

    let header = vec![
        Line::from(Span::styled(
            format!(" 📌 현재 차트: {headline}"),
            Style::default().fg(C_TITLE).add_modifier(Modifier::BOLD),
        )),
        Line::from(legend),
    ];
    f.render_widget(Paragraph::new(header), chunks[0]);

    let message = |text: &str, colour: Color| {
        let line = Line::from(Span::styled(text.to_string(), Style::default().fg(colour)));
        Paragraph::new(vec![Line::default(), line])
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
    };

    if shell.phase() == Phase::Submitted {
        f.render_widget(message(MSG_LOADING, C_WARN), chunks[1]);
        return;
    }

    match shell.outcome() {
        Some(Outcome::Displaying(artifact)) => {
            f.render_widget(CandleChart::new(artifact), chunks[1]);
        }
        Some(Outcome::Warning(text)) => {
            f.render_widget(message(&format!("⚠ {text}"), C_WARN), chunks[1]);
        }
        Some(Outcome::Error(text)) => {
            f.render_widget(message(&format!("✖ {text}"), C_ERROR), chunks[1]);
        }
        None => f.render_widget(message(MSG_IDLE, C_MUTED), chunks[1]),
    }
}
