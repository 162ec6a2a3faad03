use crate::{
    error::{DataError, Unavailable},
    series::{DateRange, PeriodDays, PriceSeries},
    source::PriceSource,
};
use chrono::NaiveDate;
use tracing::{info, warn};

/// Fetches fresh [`PriceSeries`] from a [`PriceSource`]. Nothing is cached.
#[derive(Debug)]
pub struct PriceFetcher<Source> {
    source: Source,
}

impl<Source> PriceFetcher<Source>
where
    Source: PriceSource,
{
    pub fn new(source: Source) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Fetch the daily series of `code` within `[start, end]`.
    ///
    /// An empty series is [`Unavailable::EmptySeries`].
    pub async fn fetch_prices(
        &self,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        let range = DateRange::new(start, end);
        let candles = self.source.daily_candles(code, range).await?;
        let series = PriceSeries::new(code, range, candles);

        if series.is_empty() {
            warn!(%code, %start, %end, "no trading data in range");
            return Err(DataError::from(Unavailable::EmptySeries));
        }

        info!(%code, %start, %end, candles = series.len(), "price series ready");
        Ok(series)
    }

    /// Fetch the trailing `period` ending `today`.
    pub async fn fetch_period(
        &self,
        code: &str,
        period: PeriodDays,
        today: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        let range = DateRange::trailing(period, today);
        self.fetch_prices(code, range.start, range.end).await
    }
}
