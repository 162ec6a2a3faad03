use super::TickerSource;
use crate::{
    config::DataConfig,
    error::{DataError, Unavailable},
    market::{Market, TickerRecord},
};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

/// KRX "all listed issues" statistics screen.
pub const KRX_LISTING_BLD: &str = "dbms/MDC/STAT/standard/MDCSTAT01901";

/// KRX listing client.
///
/// See: <http://data.krx.co.kr/contents/MDC/MDI/mdiLoader/index.cmd?menuId=MDC0201020201>
#[derive(Debug, Clone)]
pub struct KrxTickerSource {
    client: reqwest::Client,
    url: Url,
}

impl KrxTickerSource {
    pub fn new(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }

    pub fn from_config(config: &DataConfig) -> Result<Self, DataError> {
        Ok(Self::new(config.http_client()?, config.listing_url.clone()))
    }
}

#[async_trait]
impl TickerSource for KrxTickerSource {
    async fn list(&self, market: Market) -> Result<Vec<TickerRecord>, DataError> {
        debug!(%market, url = %self.url, "requesting ticker listing");

        let response = self
            .client
            .post(self.url.clone())
            .form(&[
                ("bld", KRX_LISTING_BLD),
                ("locale", "ko_KR"),
                ("mktId", market.krx_id()),
                ("share", "1"),
                ("csvxls_isNo", "false"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let records = parse_listing(&body)?;

        info!(%market, tickers = records.len(), "fetched ticker listing");
        Ok(records)
    }
}

/// KRX listing response envelope.
#[derive(Debug, Deserialize)]
struct KrxListing {
    #[serde(rename = "OutBlock_1")]
    rows: Vec<KrxListingRow>,
}

/// One listed issue. Only the columns we consume are modelled.
///
/// ### Raw Payload Examples
/// ```json
/// {
///     "ISU_CD": "KR7005930003",
///     "ISU_SRT_CD": "005930",
///     "ISU_NM": "삼성전자보통주",
///     "ISU_ABBRV": "삼성전자",
///     "MKT_TP_NM": "KOSPI"
/// }
/// ```
#[derive(Debug, Deserialize)]
struct KrxListingRow {
    #[serde(rename = "ISU_SRT_CD", default)]
    code: Option<String>,
    #[serde(rename = "ISU_ABBRV", default)]
    name: Option<String>,
}

/// Parse a KRX listing body into [`TickerRecord`]s, dropping rows with a missing code or
/// name and later duplicates of an already seen code.
///
/// A body that is not a listing envelope is [`Unavailable::MalformedListing`].
pub fn parse_listing(body: &str) -> Result<Vec<TickerRecord>, DataError> {
    let listing = serde_json::from_str::<KrxListing>(body).map_err(|error| {
        warn!(%error, "malformed ticker listing");
        DataError::from(Unavailable::MalformedListing)
    })?;

    let mut seen = fnv::FnvHashSet::default();
    let records = listing
        .rows
        .into_iter()
        .filter_map(|row| {
            let code = row.code?.trim().to_string();
            let name = row.name?.trim().to_string();
            (!code.is_empty() && !name.is_empty()).then(|| TickerRecord::new(code, name))
        })
        .filter(|record| seen.insert(record.code.clone()))
        .collect();

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listing() {
        struct TestCase {
            input: &'static str,
            expected: Result<Vec<TickerRecord>, DataError>,
        }

        let tests = vec![
            TestCase {
                // TC0: rows are parsed in upstream order
                input: r#"
                    {
                        "OutBlock_1": [
                            {"ISU_CD": "KR7005930003", "ISU_SRT_CD": "005930", "ISU_ABBRV": "삼성전자", "MKT_TP_NM": "KOSPI"},
                            {"ISU_CD": "KR7000660001", "ISU_SRT_CD": "000660", "ISU_ABBRV": "SK하이닉스", "MKT_TP_NM": "KOSPI"}
                        ],
                        "CURRENT_DATETIME": "2026.10.17 PM 05:00:00"
                    }
                "#,
                expected: Ok(vec![
                    TickerRecord::new("005930", "삼성전자"),
                    TickerRecord::new("000660", "SK하이닉스"),
                ]),
            },
            TestCase {
                // TC1: missing / blank columns and duplicate codes are dropped
                input: r#"
                    {
                        "OutBlock_1": [
                            {"ISU_SRT_CD": "005930", "ISU_ABBRV": "삼성전자"},
                            {"ISU_SRT_CD": "005935"},
                            {"ISU_SRT_CD": " ", "ISU_ABBRV": "이름만"},
                            {"ISU_SRT_CD": "005930", "ISU_ABBRV": "삼성전자 중복"}
                        ]
                    }
                "#,
                expected: Ok(vec![TickerRecord::new("005930", "삼성전자")]),
            },
            TestCase {
                // TC2: empty block parses to an empty listing
                input: r#"{"OutBlock_1": []}"#,
                expected: Ok(vec![]),
            },
            TestCase {
                // TC3: unexpected envelope is malformed
                input: r#"{"error": "LOGOUT"}"#,
                expected: Err(DataError::Unavailable(Unavailable::MalformedListing)),
            },
            TestCase {
                // TC4: html error page is malformed
                input: "<html><body>Service Unavailable</body></html>",
                expected: Err(DataError::Unavailable(Unavailable::MalformedListing)),
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = parse_listing(test.input);
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }
}
