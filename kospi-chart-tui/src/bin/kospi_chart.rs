use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use kospi_chart_tui::{
    Action, Shell,
    logging::init_logging,
    shell::{halt_message, ui},
};
use kospi_data::{
    DataConfig, KrxTickerSource, Market, NaverPriceSource, PriceFetcher, PriceSource,
    TickerDirectory, TickerSource,
};
use ratatui::{Terminal, backend::Backend, backend::CrosstermBackend};
use std::{error::Error, io, time::Duration};
use tracing::{error, info};

const TICK_RATE: Duration = Duration::from_millis(250);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    init_logging()?;

    let config = DataConfig::from_env();
    info!(
        listing = %config.listing_url,
        chart = %config.chart_url,
        timeout = ?config.request_timeout,
        "starting kospi-chart"
    );
    let directory = TickerDirectory::new(KrxTickerSource::from_config(&config)?);
    let fetcher = PriceFetcher::new(NaverPriceSource::from_config(&config)?);

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let market = Market::default();
    terminal.draw(|f| ui::draw_loading(f, market))?;

    let mut halted = None;
    let res = match Shell::bootstrap(directory, fetcher, market).await {
        Ok(shell) => run_app(&mut terminal, shell).await,
        Err(error) => {
            error!(%market, %error, "ticker directory unavailable, halting");
            let message = halt_message(market, &error);
            let res = run_halted(&mut terminal, market, &message);
            halted = Some(message);
            res
        }
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Some(message) = halted {
        eprintln!("{message}");
    }
    if let Err(err) = res {
        eprintln!("{err:?}");
    }

    Ok(())
}

async fn run_app<B, Tickers, Prices>(
    terminal: &mut Terminal<B>,
    mut shell: Shell<Tickers, Prices>,
) -> io::Result<()>
where
    B: Backend,
    Tickers: TickerSource,
    Prices: PriceSource,
{
    loop {
        terminal.draw(|f| ui::draw(f, &shell))?;

        if !event::poll(TICK_RATE)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match shell.handle_key(key) {
            Action::Quit => return Ok(()),
            Action::Submit => {
                // Show the loading state before blocking on the fetch
                terminal.draw(|f| ui::draw(f, &shell))?;
                let today = chrono::Local::now().date_naive();
                shell.run_submission(today).await;
            }
            Action::Continue => {}
        }
    }
}

/// Nothing to interact with: show the message until the user quits.
fn run_halted<B: Backend>(
    terminal: &mut Terminal<B>,
    market: Market,
    message: &str,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw_halted(f, market, message))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                if is_halted_quit(&key) {
                    return Ok(());
                }
            }
        }
    }
}

/// Quit keys on the halted screen. Releases are ignored so the key that launched the binary
/// cannot dismiss the message.
fn is_halted_quit(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c');
    ctrl_c || matches!(key.code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    #[test]
    fn test_is_halted_quit() {
        struct TestCase {
            input: KeyEvent,
            expected: bool,
        }

        let event = |code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind| {
            KeyEvent::new_with_kind_and_state(code, modifiers, kind, KeyEventState::NONE)
        };

        let tests = vec![
            TestCase {
                // TC0: Enter press quits
                input: event(KeyCode::Enter, KeyModifiers::NONE, KeyEventKind::Press),
                expected: true,
            },
            TestCase {
                // TC1: Enter release left over from launching is ignored
                input: event(KeyCode::Enter, KeyModifiers::NONE, KeyEventKind::Release),
                expected: false,
            },
            TestCase {
                // TC2: repeat is ignored
                input: event(KeyCode::Char('q'), KeyModifiers::NONE, KeyEventKind::Repeat),
                expected: false,
            },
            TestCase {
                // TC3: Ctrl-C press quits
                input: event(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyEventKind::Press),
                expected: true,
            },
            TestCase {
                // TC4: other keys do nothing
                input: event(KeyCode::Char('x'), KeyModifiers::NONE, KeyEventKind::Press),
                expected: false,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = is_halted_quit(&test.input);
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }
}
