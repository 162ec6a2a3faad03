use crate::series::PeriodDays;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// All errors generated in `kospi-data`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Deserialize, Serialize, Error)]
pub enum DataError {
    #[error("upstream data unavailable: {0}")]
    Unavailable(Unavailable),

    #[error("failed to fetch upstream data: {0}")]
    Fetch(String),

    #[error(
        "invalid period of {0} days, expected {min}..={max}",
        min = PeriodDays::MIN,
        max = PeriodDays::MAX
    )]
    InvalidPeriod(u16),
}

/// Reason an upstream source answered without usable data.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize, Error)]
pub enum Unavailable {
    #[error("ticker listing is empty")]
    EmptyListing,

    #[error("ticker listing is malformed")]
    MalformedListing,

    #[error("no trading data in the requested date range")]
    EmptySeries,
}

impl DataError {
    /// Determine if an error is a recoverable "nothing to show" condition that should be
    /// surfaced as a warning rather than an error.
    #[allow(clippy::match_like_matches_macro)]
    pub fn is_warning(&self) -> bool {
        match self {
            DataError::Unavailable(Unavailable::EmptySeries) => true,
            _ => false,
        }
    }
}

impl From<Unavailable> for DataError {
    fn from(value: Unavailable) -> Self {
        Self::Unavailable(value)
    }
}

impl From<reqwest::Error> for DataError {
    fn from(value: reqwest::Error) -> Self {
        Self::Fetch(value.to_string())
    }
}

impl From<serde_json::Error> for DataError {
    fn from(value: serde_json::Error) -> Self {
        Self::Fetch(format!("malformed payload: {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_error_is_warning() {
        struct TestCase {
            input: DataError,
            expected: bool,
        }

        let tests = vec![
            TestCase {
                // TC0: empty series is a warning
                input: DataError::from(Unavailable::EmptySeries),
                expected: true,
            },
            TestCase {
                // TC1: empty listing is an error
                input: DataError::from(Unavailable::EmptyListing),
                expected: false,
            },
            TestCase {
                // TC2: malformed listing is an error
                input: DataError::from(Unavailable::MalformedListing),
                expected: false,
            },
            TestCase {
                // TC3: fetch failure is an error
                input: DataError::Fetch("connection refused".to_string()),
                expected: false,
            },
            TestCase {
                // TC4: invalid period is an error
                input: DataError::InvalidPeriod(4),
                expected: false,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = test.input.is_warning();
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_serde_json_error_maps_to_fetch() {
        let error = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        assert!(matches!(DataError::from(error), DataError::Fetch(_)));
    }

    #[test]
    fn test_invalid_period_message_names_bounds() {
        assert_eq!(
            DataError::InvalidPeriod(731).to_string(),
            "invalid period of 731 days, expected 5..=730"
        );
    }
}
