use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use kospi_data::{
    DataError, Market, PeriodDays, PriceFetcher, PriceSource, TickerDirectory, TickerRecord,
    TickerSource, Unavailable,
};
use std::sync::Arc;
use tracing::{error, info, warn};

use self::form::{Field, FormState, PERIOD_COARSE_STEP, TICKER_PAGE};
use crate::chart::{ChartArtifact, ChartRequest, RenderError};

/// Sidebar selection form.
pub mod form;

/// Frame layout and drawing for the [`Shell`].
pub mod ui;

// User-visible messages
pub const MSG_TITLE: &str = "📈 주가 데이터 시각화";
pub const MSG_FORM_TITLE: &str = "입력값 설정";
pub const MSG_EMPTY_SERIES: &str = "해당 기간에 데이터가 없습니다.";
pub const MSG_LOADING: &str = "데이터를 불러오는 중...";
pub const MSG_NO_TICKER: &str = "선택된 종목이 없습니다.";
pub const MSG_IDLE: &str = "값을 선택한 뒤 [Enter]로 제출하세요.";

/// Interaction phase.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Phase {
    Idle,
    CollectingInput,
    Submitted,
    Displaying,
    Warning,
    Error,
}

/// Result of one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Displaying(ChartArtifact),
    Warning(String),
    Error(String),
}

impl Outcome {
    fn phase(&self) -> Phase {
        match self {
            Outcome::Displaying(_) => Phase::Displaying,
            Outcome::Warning(_) => Phase::Warning,
            Outcome::Error(_) => Phase::Error,
        }
    }

    pub fn artifact(&self) -> Option<&ChartArtifact> {
        match self {
            Outcome::Displaying(artifact) => Some(artifact),
            _ => None,
        }
    }
}

/// What the terminal loop should do after a key press.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Action {
    Continue,
    Submit,
    Quit,
}

/// Interaction shell: owns the form, the injected [`TickerDirectory`] and [`PriceFetcher`], and
/// the last submission [`Outcome`].
#[derive(Debug)]
pub struct Shell<Tickers, Prices> {
    market: Market,
    directory: TickerDirectory<Tickers>,
    fetcher: PriceFetcher<Prices>,
    tickers: Arc<Vec<TickerRecord>>,
    form: FormState,
    phase: Phase,
    outcome: Option<Outcome>,
    /// Ticker of the last submission, shown in the header.
    charted: Option<TickerRecord>,
}

impl<Tickers, Prices> Shell<Tickers, Prices>
where
    Tickers: TickerSource,
    Prices: PriceSource,
{
    /// Populate the ticker selector from the directory. Fails, and no form is built, when the
    /// directory has nothing to list.
    pub async fn bootstrap(
        mut directory: TickerDirectory<Tickers>,
        fetcher: PriceFetcher<Prices>,
        market: Market,
    ) -> Result<Self, DataError> {
        let tickers = directory.list_tickers(market).await?;
        if tickers.is_empty() {
            return Err(DataError::from(Unavailable::EmptyListing));
        }

        info!(%market, tickers = tickers.len(), "interaction shell ready");
        Ok(Self {
            market,
            directory,
            fetcher,
            form: FormState::new(Arc::clone(&tickers)),
            tickers,
            phase: Phase::Idle,
            outcome: None,
            charted: None,
        })
    }

    pub fn market(&self) -> Market {
        self.market
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn tickers(&self) -> &[TickerRecord] {
        &self.tickers
    }

    pub fn directory(&self) -> &TickerDirectory<Tickers> {
        &self.directory
    }

    /// Ticker named in the header: the last charted one, else the current selection.
    pub fn headline_ticker(&self) -> Option<&TickerRecord> {
        self.charted.as_ref().or_else(|| self.form.selected_ticker())
    }

    /// Apply a key press to the form.
    ///
    /// Any edit moves the shell back to [`Phase::CollectingInput`]; the previous outcome stays
    /// visible until the next submission completes.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        match key.code {
            KeyCode::Enter => return self.begin_submit(),
            KeyCode::Esc if self.form.focus() == Field::Ticker && !self.form.query().is_empty() => {
                self.form.clear_query();
            }
            KeyCode::Esc => return Action::Quit,
            KeyCode::Char('q') if self.form.focus() != Field::Ticker => return Action::Quit,
            KeyCode::Tab => self.form.focus_next(),
            KeyCode::BackTab => self.form.focus_prev(),
            code => match self.form.focus() {
                Field::Ticker => self.edit_ticker(code),
                Field::Period => self.edit_period(code),
                Field::Style => self.edit_style(code),
                Field::Volume => self.edit_volume(code),
                Field::Submit if code == KeyCode::Char(' ') => return self.begin_submit(),
                Field::Submit => {}
            },
        }

        self.phase = Phase::CollectingInput;
        Action::Continue
    }

    fn edit_ticker(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.form.move_selection(-1),
            KeyCode::Down => self.form.move_selection(1),
            KeyCode::PageUp => self.form.move_selection(-(TICKER_PAGE as isize)),
            KeyCode::PageDown => self.form.move_selection(TICKER_PAGE as isize),
            KeyCode::Backspace => self.form.pop_query(),
            KeyCode::Char(c) => self.form.push_query(c),
            _ => {}
        }
    }

    fn edit_period(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left | KeyCode::Down => self.form.adjust_period(-1),
            KeyCode::Right | KeyCode::Up => self.form.adjust_period(1),
            KeyCode::PageDown => self.form.adjust_period(-PERIOD_COARSE_STEP),
            KeyCode::PageUp => self.form.adjust_period(PERIOD_COARSE_STEP),
            KeyCode::Home => self.form.adjust_period(-i32::from(PeriodDays::MAX)),
            KeyCode::End => self.form.adjust_period(i32::from(PeriodDays::MAX)),
            _ => {}
        }
    }

    fn edit_style(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left | KeyCode::Up => self.form.cycle_style(false),
            KeyCode::Right | KeyCode::Down => self.form.cycle_style(true),
            _ => {}
        }
    }

    fn edit_volume(&mut self, code: KeyCode) {
        if matches!(code, KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right) {
            self.form.toggle_volume();
        }
    }

    fn begin_submit(&mut self) -> Action {
        self.phase = Phase::Submitted;
        Action::Submit
    }

    /// Submit the form as it stands and run the fetch-then-render pipeline to completion.
    pub async fn submit(&mut self, today: NaiveDate) -> &Outcome {
        self.begin_submit();
        self.run_submission(today).await
    }

    /// Run the pipeline for the current form values. Every failure becomes an [`Outcome`].
    pub async fn run_submission(&mut self, today: NaiveDate) -> &Outcome {
        let outcome = match self.form.request() {
            Some(request) => self.chart(&request, today).await,
            None => Outcome::Error(MSG_NO_TICKER.to_string()),
        };

        self.charted = self.form.selected_ticker().cloned();
        self.phase = outcome.phase();
        self.outcome.insert(outcome)
    }

    async fn chart(&self, request: &ChartRequest, today: NaiveDate) -> Outcome {
        let series = match self.fetcher.fetch_period(&request.code, request.period, today).await {
            Ok(series) => series,
            Err(error) if error.is_warning() => {
                warn!(code = %request.code, period = %request.period, %error, "nothing to chart");
                return Outcome::Warning(MSG_EMPTY_SERIES.to_string());
            }
            Err(error) => {
                error!(
                    code = %request.code,
                    period = %request.period,
                    %error,
                    "price fetch failed"
                );
                return Outcome::Error(fetch_error_message(&error));
            }
        };

        match request.render(&series) {
            Ok(artifact) => {
                info!(
                    code = %request.code,
                    style = %request.style,
                    candles = artifact.candles.len(),
                    "chart rendered"
                );
                Outcome::Displaying(artifact)
            }
            Err(error) => {
                error!(code = %request.code, style = %request.style, %error, "chart render failed");
                Outcome::Error(render_error_message(&error))
            }
        }
    }
}

/// Message shown when the shell cannot start because the directory failed.
pub fn halt_message(market: Market, error: &DataError) -> String {
    match error {
        DataError::Unavailable(Unavailable::EmptyListing) => {
            format!("{market} 종목 리스트를 불러올 수 없습니다.")
        }
        error => format!("{market} 종목 리스트 로딩 중 오류가 발생했습니다: {error}"),
    }
}

pub fn fetch_error_message(error: &DataError) -> String {
    format!("주가 데이터를 불러오는 중 오류가 발생했습니다: {error}")
}

pub fn render_error_message(error: &RenderError) -> String {
    format!("차트 생성 중 오류가 발생했습니다: {error}")
}
