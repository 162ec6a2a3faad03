use crate::{
    error::DataError,
    market::{Market, TickerRecord},
    series::{Candle, DateRange},
};
use async_trait::async_trait;

/// [`TickerSource`] backed by the KRX market-data listing endpoint.
pub mod krx;

/// [`PriceSource`] backed by the Naver Finance daily chart endpoint.
pub mod naver;

/// Upstream collaborator that lists every ticker of a [`Market`].
#[async_trait]
pub trait TickerSource: Send + Sync {
    async fn list(&self, market: Market) -> Result<Vec<TickerRecord>, DataError>;
}

/// Upstream collaborator that returns daily [`Candle`]s for one ticker.
///
/// Implementations may return candles in any order and slightly outside the requested
/// range; [`PriceSeries::new`](crate::series::PriceSeries::new) normalises them.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn daily_candles(&self, code: &str, range: DateRange) -> Result<Vec<Candle>, DataError>;
}
