use derive_more::Display;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Listing universe that tickers are drawn from.
#[derive(
    Debug,
    Copy,
    Clone,
    Default,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Display,
    Deserialize,
    Serialize,
)]
pub enum Market {
    #[default]
    #[display("KOSPI")]
    Kospi,
}

impl Market {
    /// KRX market identifier used by the listing endpoint.
    pub fn krx_id(&self) -> &'static str {
        match self {
            Market::Kospi => "STK",
        }
    }
}

/// A single listed security.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct TickerRecord {
    /// Short code, eg/ "005930".
    pub code: SmolStr,
    /// Abbreviated Korean name, eg/ "삼성전자".
    pub name: String,
}

impl TickerRecord {
    pub fn new(code: impl Into<SmolStr>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    /// Selector label, eg/ "005930 : 삼성전자".
    pub fn display(&self) -> String {
        format!("{} : {}", self.code, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_display() {
        assert_eq!(Market::Kospi.to_string(), "KOSPI");
        assert_eq!(Market::Kospi.krx_id(), "STK");
    }

    #[test]
    fn test_ticker_record_display() {
        let record = TickerRecord::new("005930", "Samsung Electronics");
        assert_eq!(record.display(), "005930 : Samsung Electronics");
    }
}
