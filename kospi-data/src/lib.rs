#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_crate_dependencies,
    unused_extern_crates,
    clippy::unused_self,
    clippy::useless_let_if_seq,
    missing_debug_implementations,
    rust_2018_idioms,
    rust_2024_compatibility
)]
#![allow(clippy::type_complexity, clippy::too_many_arguments, type_alias_bounds)]

//! # Kospi-Data
//! Ticker listings and daily OHLCV series for the KOSPI market.
//!
//! **It is:**
//! * **Explicit**: the ticker listing is cached in an owned [`Memo`](cache::Memo) injected
//!   wherever it is needed, rather than in ambient global state.
//! * **Pluggable**: upstream collaborators sit behind the [`TickerSource`] and
//!   [`PriceSource`] traits, with HTTP implementations for KRX and Naver Finance.
//! * **Typed**: every failure is a [`DataError`], and the lookback window is a validated
//!   [`PeriodDays`].
//!
//! ## Example
//! ```rust,no_run
//! use kospi_data::{
//!     DataConfig, KrxTickerSource, Market, NaverPriceSource, PeriodDays, PriceFetcher,
//!     TickerDirectory,
//! };
//!
//! # async fn run() -> Result<(), kospi_data::DataError> {
//! let config = DataConfig::from_env();
//! let mut directory = TickerDirectory::new(KrxTickerSource::from_config(&config)?);
//! let fetcher = PriceFetcher::new(NaverPriceSource::from_config(&config)?);
//!
//! let tickers = directory.list_tickers(Market::Kospi).await?;
//! let today = chrono::Local::now().date_naive();
//! let series = fetcher.fetch_period(&tickers[0].code, PeriodDays::DEFAULT, today).await?;
//! println!("{} candles for {}", series.len(), tickers[0].display());
//! # Ok(())
//! # }
//! ```

/// Populate-once cache used by the [`TickerDirectory`].
pub mod cache;

/// Upstream endpoint configuration.
pub mod config;

/// Memoised ticker listings.
pub mod directory;

/// All [`Error`](std::error::Error)s generated in Kospi-Data.
pub mod error;

/// Price series fetching over a [`PriceSource`].
pub mod fetcher;

/// [`Market`] and [`TickerRecord`] definitions.
pub mod market;

/// [`Candle`], [`PriceSeries`], [`PeriodDays`] and [`DateRange`] definitions.
pub mod series;

/// Upstream source traits and their HTTP implementations.
pub mod source;

pub use config::DataConfig;
pub use directory::TickerDirectory;
pub use error::{DataError, Unavailable};
pub use fetcher::PriceFetcher;
pub use market::{Market, TickerRecord};
pub use series::{Candle, DateRange, PeriodDays, PriceSeries};
pub use source::{PriceSource, TickerSource, krx::KrxTickerSource, naver::NaverPriceSource};
