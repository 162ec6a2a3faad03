use crate::{
    cache::Memo,
    error::{DataError, Unavailable},
    market::{Market, TickerRecord},
    source::TickerSource,
};
use std::sync::Arc;
use tracing::{error, info};

/// Ticker directory for a [`TickerSource`], memoising each [`Market`] listing for the
/// lifetime of the directory.
#[derive(Debug)]
pub struct TickerDirectory<Source> {
    source: Source,
    cache: Memo<Market, Vec<TickerRecord>>,
}

impl<Source> TickerDirectory<Source>
where
    Source: TickerSource,
{
    pub fn new(source: Source) -> Self {
        Self {
            source,
            cache: Memo::new(),
        }
    }

    /// List every ticker of the [`Market`], fetching from the source on first use only.
    ///
    /// An empty upstream listing is [`Unavailable::EmptyListing`] and is not cached.
    pub async fn list_tickers(
        &mut self,
        market: Market,
    ) -> Result<Arc<Vec<TickerRecord>>, DataError> {
        let source = &self.source;
        let result = self
            .cache
            .get_or_fetch(market, || async move {
                let records = source.list(market).await?;
                if records.is_empty() {
                    return Err(DataError::from(Unavailable::EmptyListing));
                }
                info!(%market, tickers = records.len(), "ticker directory populated");
                Ok(records)
            })
            .await;

        if let Err(error) = &result {
            error!(%market, %error, "failed to list tickers");
        }

        result
    }

    /// Whether the [`Market`] listing has already been populated.
    pub fn is_cached(&self, market: Market) -> bool {
        self.cache.contains(&market)
    }
}
