use crate::error::DataError;
use chrono::{Days, NaiveDate};
use derive_more::{Constructor, Display};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Daily OHLCV record.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize, Constructor)]
pub struct Candle {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Closed at or above the open.
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}

/// Date ascending series of [`Candle`]s for one ticker, bounded by a [`DateRange`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PriceSeries {
    pub code: SmolStr,
    pub range: DateRange,
    pub candles: Vec<Candle>,
}

impl PriceSeries {
    /// Construct a series, ordering candles by date, dropping duplicate dates and clipping
    /// to the provided range.
    pub fn new(code: impl Into<SmolStr>, range: DateRange, candles: Vec<Candle>) -> Self {
        let candles = candles
            .into_iter()
            .filter(|candle| range.contains(candle.date))
            .sorted_by_key(|candle| candle.date)
            .dedup_by(|a, b| a.date == b.date)
            .collect();

        Self {
            code: code.into(),
            range,
            candles,
        }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.candles.first().map(|candle| candle.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.candles.last().map(|candle| candle.date)
    }
}

/// Lookback length in calendar days, always within [`PeriodDays::MIN`]..=[`PeriodDays::MAX`].
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Display, Deserialize, Serialize,
)]
#[serde(try_from = "u16", into = "u16")]
pub struct PeriodDays(u16);

impl PeriodDays {
    pub const MIN: u16 = 5;
    pub const MAX: u16 = 730;
    pub const DEFAULT: PeriodDays = PeriodDays(30);

    pub fn new(days: u16) -> Result<Self, DataError> {
        if (Self::MIN..=Self::MAX).contains(&days) {
            Ok(Self(days))
        } else {
            Err(DataError::InvalidPeriod(days))
        }
    }

    pub fn days(&self) -> u16 {
        self.0
    }

    /// Shift by `delta` days, saturating at the valid bounds.
    pub fn saturating_add(&self, delta: i32) -> Self {
        let days = (i32::from(self.0) + delta).clamp(i32::from(Self::MIN), i32::from(Self::MAX));
        Self(days as u16)
    }
}

impl Default for PeriodDays {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u16> for PeriodDays {
    type Error = DataError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PeriodDays> for u16 {
    fn from(value: PeriodDays) -> Self {
        value.0
    }
}

/// Inclusive calendar date window.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize, Constructor)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Window ending `today` and starting `period` days earlier.
    pub fn trailing(period: PeriodDays, today: NaiveDate) -> Self {
        let start = today
            .checked_sub_days(Days::new(u64::from(period.days())))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end: today }
    }

    /// Number of days between start and end.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn candle(date: NaiveDate, close: f64) -> Candle {
        Candle::new(date, close, close, close, close, 1_000.0)
    }

    #[test]
    fn test_period_days_bounds() {
        struct TestCase {
            input: u16,
            expected: Result<u16, DataError>,
        }

        let tests = vec![
            TestCase {
                // TC0: below minimum
                input: 4,
                expected: Err(DataError::InvalidPeriod(4)),
            },
            TestCase {
                // TC1: minimum
                input: 5,
                expected: Ok(5),
            },
            TestCase {
                // TC2: default
                input: 30,
                expected: Ok(30),
            },
            TestCase {
                // TC3: maximum
                input: 730,
                expected: Ok(730),
            },
            TestCase {
                // TC4: above maximum
                input: 731,
                expected: Err(DataError::InvalidPeriod(731)),
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = PeriodDays::new(test.input).map(|period| period.days());
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_trailing_range_length_matches_period() {
        let today = date(2026, 10, 17);
        for days in PeriodDays::MIN..=PeriodDays::MAX {
            let period = PeriodDays::new(days).unwrap();
            let range = DateRange::trailing(period, today);
            assert_eq!(range.end, today);
            assert_eq!(range.len_days(), i64::from(days), "period {days} failed");
        }
    }

    #[test]
    fn test_period_saturating_add() {
        let period = PeriodDays::DEFAULT;
        assert_eq!(period.saturating_add(1).days(), 31);
        assert_eq!(period.saturating_add(-100).days(), PeriodDays::MIN);
        assert_eq!(period.saturating_add(10_000).days(), PeriodDays::MAX);
    }

    #[test]
    fn test_period_deserialise_rejects_out_of_range() {
        assert_eq!(serde_json::from_str::<PeriodDays>("60").unwrap().days(), 60);
        assert!(serde_json::from_str::<PeriodDays>("1000").is_err());
    }

    #[test]
    fn test_price_series_orders_dedups_and_clips() {
        let range = DateRange::new(date(2024, 1, 2), date(2024, 1, 5));
        let series = PriceSeries::new(
            "005930",
            range,
            vec![
                candle(date(2024, 1, 4), 3.0),
                candle(date(2024, 1, 1), 0.0),
                candle(date(2024, 1, 2), 1.0),
                candle(date(2024, 1, 4), 3.5),
                candle(date(2024, 1, 3), 2.0),
                candle(date(2024, 1, 8), 9.0),
            ],
        );

        let dates: Vec<_> = series.candles.iter().map(|c| c.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 2), date(2024, 1, 3), date(2024, 1, 4)]
        );
        assert_eq!(series.first_date(), Some(date(2024, 1, 2)));
        assert_eq!(series.last_date(), Some(date(2024, 1, 4)));
    }

    #[test]
    fn test_candle_direction() {
        let up = Candle::new(date(2024, 1, 2), 100.0, 110.0, 95.0, 105.0, 1.0);
        let flat = Candle::new(date(2024, 1, 2), 100.0, 110.0, 95.0, 100.0, 1.0);
        let down = Candle::new(date(2024, 1, 2), 100.0, 110.0, 95.0, 96.0, 1.0);
        assert!(up.is_up());
        assert!(flat.is_up());
        assert!(!down.is_up());
    }
}
