//! Sidebar selection form state.

use crate::chart::{
    ChartRequest,
    style::{ChartStyle, DEFAULT_STYLE, STYLES},
};
use kospi_data::{PeriodDays, TickerRecord};
use std::sync::Arc;

/// Coarse period step for PageUp / PageDown.
pub const PERIOD_COARSE_STEP: i32 = 30;

/// Ticker rows moved by PageUp / PageDown in the selector.
pub const TICKER_PAGE: usize = 10;

/// Focusable form field.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Field {
    Ticker,
    Period,
    Style,
    Volume,
    Submit,
}

impl Field {
    const ORDER: [Field; 5] = [
        Field::Ticker,
        Field::Period,
        Field::Style,
        Field::Volume,
        Field::Submit,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|field| *field == self).unwrap_or(0)
    }

    pub fn next(self) -> Field {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Field {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Form values plus selector navigation state. Values persist across submissions.
#[derive(Debug, Clone)]
pub struct FormState {
    tickers: Arc<Vec<TickerRecord>>,
    /// Lower-cased display labels, index aligned with `tickers`.
    labels: Vec<String>,
    query: String,
    /// Indices into `tickers` matching `query`.
    matches: Vec<usize>,
    /// Index into `tickers` of the selected ticker. Always valid.
    selected: usize,
    period: PeriodDays,
    style: usize,
    show_volume: bool,
    focus: Field,
}

impl FormState {
    /// New form selecting the first ticker, the default period and style, volume off.
    ///
    /// `tickers` must not be empty.
    pub fn new(tickers: Arc<Vec<TickerRecord>>) -> Self {
        let labels = tickers
            .iter()
            .map(|ticker| ticker.display().to_lowercase())
            .collect();
        let matches = (0..tickers.len()).collect();

        Self {
            tickers,
            labels,
            query: String::new(),
            matches,
            selected: 0,
            period: PeriodDays::DEFAULT,
            style: ChartStyle::position(DEFAULT_STYLE).unwrap_or(0),
            show_volume: false,
            focus: Field::Ticker,
        }
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn selected_ticker(&self) -> Option<&TickerRecord> {
        self.tickers.get(self.selected)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Tickers matching the search query, in listing order.
    pub fn matches(&self) -> impl Iterator<Item = &TickerRecord> + '_ {
        self.matches.iter().filter_map(|index| self.tickers.get(*index))
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Position of the selected ticker within [`FormState::matches`], if it matches.
    pub fn selected_match(&self) -> Option<usize> {
        self.matches.iter().position(|index| *index == self.selected)
    }

    /// Append to the search query, selecting the first match if the current selection no
    /// longer matches.
    pub fn push_query(&mut self, c: char) {
        self.query.push(c);
        self.refresh_matches();
    }

    pub fn pop_query(&mut self) {
        if self.query.pop().is_some() {
            self.refresh_matches();
        }
    }

    pub fn clear_query(&mut self) {
        if !self.query.is_empty() {
            self.query.clear();
            self.refresh_matches();
        }
    }

    fn refresh_matches(&mut self) {
        let needle = self.query.to_lowercase();
        self.matches = self
            .labels
            .iter()
            .enumerate()
            .filter(|(_, label)| label.contains(&needle))
            .map(|(index, _)| index)
            .collect();

        if self.selected_match().is_none() {
            if let Some(first) = self.matches.first() {
                self.selected = *first;
            }
        }
    }

    /// Move the selection by `delta` rows within the current matches.
    pub fn move_selection(&mut self, delta: isize) {
        if self.matches.is_empty() {
            return;
        }
        let current = self.selected_match().unwrap_or(0) as isize;
        let last = self.matches.len() as isize - 1;
        let target = (current + delta).clamp(0, last) as usize;
        self.selected = self.matches[target];
    }

    pub fn period(&self) -> PeriodDays {
        self.period
    }

    pub fn adjust_period(&mut self, delta: i32) {
        self.period = self.period.saturating_add(delta);
    }

    pub fn set_period(&mut self, period: PeriodDays) {
        self.period = period;
    }

    pub fn style(&self) -> ChartStyle {
        STYLES[self.style % STYLES.len()]
    }

    /// Cycle the style selection forwards or backwards, wrapping around.
    pub fn cycle_style(&mut self, forward: bool) {
        let len = STYLES.len();
        self.style = if forward {
            (self.style + 1) % len
        } else {
            (self.style + len - 1) % len
        };
    }

    pub fn show_volume(&self) -> bool {
        self.show_volume
    }

    pub fn toggle_volume(&mut self) {
        self.show_volume = !self.show_volume;
    }

    /// Snapshot the current values as a [`ChartRequest`].
    pub fn request(&self) -> Option<ChartRequest> {
        self.selected_ticker().map(|ticker| {
            ChartRequest::new(ticker.code.clone(), self.period, self.style().name, self.show_volume)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::MOVING_AVERAGE_WINDOWS;

    fn form() -> FormState {
        FormState::new(Arc::new(vec![
            TickerRecord::new("005930", "삼성전자"),
            TickerRecord::new("000660", "SK하이닉스"),
            TickerRecord::new("005380", "현대차"),
            TickerRecord::new("035420", "NAVER"),
        ]))
    }

    #[test]
    fn test_defaults() {
        let form = form();
        assert_eq!(form.focus(), Field::Ticker);
        assert_eq!(form.selected_ticker().map(|t| t.code.as_str()), Some("005930"));
        assert_eq!(form.period().days(), 30);
        assert_eq!(form.style().name, "default");
        assert!(!form.show_volume());
        assert_eq!(form.match_count(), 4);
    }

    #[test]
    fn test_focus_cycles() {
        let mut form = form();
        for expected in [Field::Period, Field::Style, Field::Volume, Field::Submit, Field::Ticker] {
            form.focus_next();
            assert_eq!(form.focus(), expected);
        }
        form.focus_prev();
        assert_eq!(form.focus(), Field::Submit);
    }

    #[test]
    fn test_search_selects_first_match() {
        let mut form = form();
        for c in "naver".chars() {
            form.push_query(c);
        }
        assert_eq!(form.match_count(), 1);
        assert_eq!(form.selected_ticker().map(|t| t.name.as_str()), Some("NAVER"));

        // No matches keeps the previous selection
        form.push_query('!');
        assert_eq!(form.match_count(), 0);
        assert_eq!(form.selected_ticker().map(|t| t.name.as_str()), Some("NAVER"));

        form.clear_query();
        assert_eq!(form.match_count(), 4);
        assert_eq!(form.selected_match(), Some(3));
    }

    #[test]
    fn test_search_by_code_prefix() {
        let mut form = form();
        form.push_query('0');
        form.push_query('0');
        form.push_query('5');
        let codes: Vec<_> = form.matches().map(|t| t.code.as_str()).collect();
        assert_eq!(codes, vec!["005930", "005380"]);
        // Selection still matches so it is kept
        assert_eq!(form.selected_ticker().map(|t| t.code.as_str()), Some("005930"));

        form.pop_query();
        assert_eq!(form.match_count(), 3);
    }

    #[test]
    fn test_move_selection_clamps() {
        let mut form = form();
        form.move_selection(2);
        assert_eq!(form.selected_match(), Some(2));
        form.move_selection(TICKER_PAGE as isize);
        assert_eq!(form.selected_match(), Some(3));
        form.move_selection(-(TICKER_PAGE as isize));
        assert_eq!(form.selected_match(), Some(0));
    }

    #[test]
    fn test_period_and_style_adjustments() {
        let mut form = form();
        form.adjust_period(PERIOD_COARSE_STEP);
        assert_eq!(form.period().days(), 60);
        form.adjust_period(-1_000);
        assert_eq!(form.period().days(), PeriodDays::MIN);

        form.cycle_style(true);
        assert_eq!(form.style().name, "ibd");
        form.cycle_style(false);
        form.cycle_style(false);
        assert_eq!(form.style().name, "classic");

        // Wraps past the last style
        let mut form = FormState::new(Arc::new(vec![TickerRecord::new("005930", "삼성전자")]));
        for _ in 0..9 {
            form.cycle_style(true);
        }
        assert_eq!(form.style().name, "binance");
    }

    #[test]
    fn test_request_snapshot() {
        let mut form = form();
        form.toggle_volume();
        form.move_selection(1);

        let request = form.request().unwrap();
        assert_eq!(request.code, "000660");
        assert_eq!(request.period, PeriodDays::DEFAULT);
        assert_eq!(request.style, "default");
        assert!(request.show_volume);
        assert_eq!(request.moving_average_windows, MOVING_AVERAGE_WINDOWS.to_vec());
    }
}
