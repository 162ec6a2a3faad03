use super::PriceSource;
use crate::{
    config::DataConfig,
    error::DataError,
    series::{Candle, DateRange},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

/// Date format used by the chart endpoint for both query parameters and rows.
const NAVER_DATE_FORMAT: &str = "%Y%m%d";

/// Naver Finance daily chart client.
#[derive(Debug, Clone)]
pub struct NaverPriceSource {
    client: reqwest::Client,
    url: Url,
}

impl NaverPriceSource {
    pub fn new(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }

    pub fn from_config(config: &DataConfig) -> Result<Self, DataError> {
        Ok(Self::new(config.http_client()?, config.chart_url.clone()))
    }
}

#[async_trait]
impl PriceSource for NaverPriceSource {
    async fn daily_candles(&self, code: &str, range: DateRange) -> Result<Vec<Candle>, DataError> {
        let start = range.start.format(NAVER_DATE_FORMAT).to_string();
        let end = range.end.format(NAVER_DATE_FORMAT).to_string();
        debug!(%code, %start, %end, "requesting daily candles");

        let response = self
            .client
            .get(self.url.clone())
            .query(&[
                ("symbol", code),
                ("requestType", "1"),
                ("startTime", start.as_str()),
                ("endTime", end.as_str()),
                ("timeframe", "day"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let candles = parse_daily_chart(&body)?;

        info!(%code, candles = candles.len(), "fetched daily candles");
        Ok(candles)
    }
}

/// Parse a `siseJson` body into [`Candle`]s.
///
/// The body is a bracketed list of rows. The leading header row uses single quoted
/// strings, so quotes are normalised before decoding.
///
/// ### Raw Payload Examples
/// ```text
/// [['날짜', '시가', '고가', '저가', '종가', '거래량', '외국인소진율'],
/// ["20240102", 78200, 79800, 78200, 79600, 17142847, 53.32],
/// ["20240103", 78500, 78800, 77000, 77000, 21753644, 53.31]
/// ]
/// ```
pub fn parse_daily_chart(body: &str) -> Result<Vec<Candle>, DataError> {
    let normalised = body.trim().replace('\'', "\"");
    if normalised.is_empty() {
        return Err(DataError::Fetch("empty chart payload".to_string()));
    }

    let rows = serde_json::from_str::<Vec<Vec<Value>>>(&normalised)?;

    rows.iter()
        .enumerate()
        .filter(|(index, row)| !(*index == 0 && is_header(row)))
        .map(|(index, row)| parse_row(row).ok_or_else(|| malformed_row(index, row)))
        .collect()
}

fn is_header(row: &[Value]) -> bool {
    row.first()
        .and_then(Value::as_str)
        .is_some_and(|cell| NaiveDate::parse_from_str(cell.trim(), NAVER_DATE_FORMAT).is_err())
}

fn parse_row(row: &[Value]) -> Option<Candle> {
    let [date, open, high, low, close, volume, ..] = row else {
        return None;
    };

    let candle = Candle {
        date: NaiveDate::parse_from_str(date.as_str()?.trim(), NAVER_DATE_FORMAT).ok()?,
        open: number(open)?,
        high: number(high)?,
        low: number(low)?,
        close: number(close)?,
        volume: number(volume)?,
    };

    Some(flatten_halted(candle))
}

/// Days without trades are reported with zero open, high and low; draw them flat at the close.
fn flatten_halted(candle: Candle) -> Candle {
    if candle.open == 0.0 && candle.high == 0.0 && candle.low == 0.0 {
        Candle {
            open: candle.close,
            high: candle.close,
            low: candle.close,
            ..candle
        }
    } else {
        candle
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn malformed_row(index: usize, row: &[Value]) -> DataError {
    DataError::Fetch(format!("malformed chart row {index}: {row:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_daily_chart() {
        struct TestCase {
            input: &'static str,
            expected: Result<Vec<Candle>, ()>,
        }

        let tests = vec![
            TestCase {
                // TC0: header row is skipped and data rows are parsed
                input: r#"
 [['날짜', '시가', '고가', '저가', '종가', '거래량', '외국인소진율'],
["20240102", 78200, 79800, 78200, 79600, 17142847, 53.32],

["20240103", 78500, 78800, 77000, 77000, 21753644, 53.31]
]
                "#,
                expected: Ok(vec![
                    Candle::new(date(2024, 1, 2), 78200.0, 79800.0, 78200.0, 79600.0, 17142847.0),
                    Candle::new(date(2024, 1, 3), 78500.0, 78800.0, 77000.0, 77000.0, 21753644.0),
                ]),
            },
            TestCase {
                // TC1: header only means no trading data
                input: r#"[['날짜', '시가', '고가', '저가', '종가', '거래량', '외국인소진율']]"#,
                expected: Ok(vec![]),
            },
            TestCase {
                // TC2: numeric strings are accepted
                input: r#"[["20240102", "1", "2", "0.5", "1.5", "10"]]"#,
                expected: Ok(vec![Candle::new(date(2024, 1, 2), 1.0, 2.0, 0.5, 1.5, 10.0)]),
            },
            TestCase {
                // TC3: halted day is flattened at the close
                input: r#"[["20240104", 0, 0, 0, 4550, 0, 1.2]]"#,
                expected: Ok(vec![Candle::new(
                    date(2024, 1, 4),
                    4550.0,
                    4550.0,
                    4550.0,
                    4550.0,
                    0.0,
                )]),
            },
            TestCase {
                // TC4: truncated row is malformed
                input: r#"[["20240102", 78200, 79800]]"#,
                expected: Err(()),
            },
            TestCase {
                // TC5: invalid date in a data row is malformed
                input: r#"[["20240102", 1, 2, 0.5, 1.5, 10], ["2024-01-03", 1, 2, 0.5, 1.5, 10]]"#,
                expected: Err(()),
            },
            TestCase {
                // TC6: html error page is malformed
                input: "<html><body>Service Unavailable</body></html>",
                expected: Err(()),
            },
            TestCase {
                // TC7: empty body is malformed
                input: "   ",
                expected: Err(()),
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = parse_daily_chart(test.input);
            match (actual, test.expected) {
                (Ok(actual), Ok(expected)) => {
                    assert_eq!(actual, expected, "TC{} failed", index)
                }
                (Err(DataError::Fetch(_)), Err(())) => {
                    // Test passed
                }
                (actual, expected) => {
                    // Test failed
                    panic!(
                        "TC{index} failed because actual != expected. \nActual: {actual:?}\nExpected: {expected:?}\n"
                    );
                }
            }
        }
    }
}
