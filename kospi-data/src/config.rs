//! Upstream endpoint configuration.
//!
//! Defaults point at the public KRX listing and Naver chart endpoints. Every value can be
//! overridden through the builder methods or, at start-up, via environment variables.

use std::time::Duration;
use tracing::warn;
use url::Url;

/// Default KRX market-data endpoint used for ticker listings.
pub const DEFAULT_LISTING_URL: &str = "http://data.krx.co.kr/comm/bldAttendant/getJsonData.cmd";

/// Default Naver Finance daily chart endpoint.
pub const DEFAULT_CHART_URL: &str = "https://fchart.stock.naver.com/siseJson.nhn";

/// Default HTTP request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_USER_AGENT: &str = concat!("kospi-data/", env!("CARGO_PKG_VERSION"));

/// HTTP source configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DataConfig {
    /// Ticker listing endpoint
    pub listing_url: Url,
    /// Daily OHLCV chart endpoint
    pub chart_url: Url,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// User-Agent header sent upstream
    pub user_agent: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            listing_url: parse_static(DEFAULT_LISTING_URL),
            chart_url: parse_static(DEFAULT_CHART_URL),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl DataConfig {
    /// Default configuration with overrides from `KOSPI_LISTING_URL`, `KOSPI_CHART_URL` and
    /// `KOSPI_HTTP_TIMEOUT_SECS`. Unparsable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("KOSPI_LISTING_URL")
            .and_then(|value| parse_override("KOSPI_LISTING_URL", &value))
        {
            config.listing_url = url;
        }
        if let Some(url) =
            lookup("KOSPI_CHART_URL").and_then(|value| parse_override("KOSPI_CHART_URL", &value))
        {
            config.chart_url = url;
        }
        if let Some(secs) = lookup("KOSPI_HTTP_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => warn!(value = %secs, "ignoring invalid KOSPI_HTTP_TIMEOUT_SECS"),
            }
        }

        config
    }

    /// Set ticker listing endpoint
    pub fn with_listing_url(mut self, url: Url) -> Self {
        self.listing_url = url;
        self
    }

    /// Set chart endpoint
    pub fn with_chart_url(mut self, url: Url) -> Self {
        self.chart_url = url;
        self
    }

    /// Set request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Build a [`reqwest::Client`] honouring the timeout and user agent.
    pub fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .user_agent(self.user_agent.as_str())
            .build()
    }
}

fn parse_static(url: &'static str) -> Url {
    Url::parse(url).unwrap_or_else(|error| panic!("invalid built-in url {url}: {error}"))
}

fn parse_override(key: &str, value: &str) -> Option<Url> {
    match Url::parse(value.trim()) {
        Ok(url) => Some(url),
        Err(error) => {
            warn!(%key, %value, %error, "ignoring invalid url override");
            None
        }
    }
}
