//! Trailing indicators for chart overlays.

use std::collections::VecDeque;

/// Rolling simple moving average over a fixed number of periods
#[derive(Debug, Clone)]
pub struct MovingAverage {
    /// Number of trailing periods averaged
    window: usize,
    /// Values in the window
    values: VecDeque<f64>,
    /// Running sum of the window
    sum: f64,
}

impl MovingAverage {
    /// Create a new moving average over `window` periods
    pub fn new(window: usize) -> Self {
        Self {
            window,
            values: VecDeque::with_capacity(window),
            sum: 0.0,
        }
    }

    /// Add a value, returning the average once the window is full
    pub fn update(&mut self, value: f64) -> Option<f64> {
        if self.window == 0 {
            return None;
        }

        // Remove oldest value if at capacity
        if self.values.len() >= self.window {
            if let Some(old) = self.values.pop_front() {
                self.sum -= old;
            }
        }

        self.values.push_back(value);
        self.sum += value;

        self.value()
    }

    /// Current average, `None` until `window` values have been seen
    pub fn value(&self) -> Option<f64> {
        if self.window > 0 && self.values.len() == self.window {
            Some(self.sum / self.window as f64)
        } else {
            None
        }
    }

    pub fn is_ready(&self) -> bool {
        self.value().is_some()
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

/// Simple moving average of `values`, aligned with the input. The first `window - 1`
/// entries are `None`.
pub fn simple_moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut average = MovingAverage::new(window);
    values.iter().map(|value| average.update(*value)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[Option<f64>], expected: &[Option<f64>]) {
        assert_eq!(actual.len(), expected.len());
        for (index, (a, e)) in actual.iter().zip(expected).enumerate() {
            match (a, e) {
                (Some(a), Some(e)) => assert!((a - e).abs() < 1e-9, "index {index}: {a} != {e}"),
                (None, None) => {}
                _ => panic!("index {index}: {a:?} != {e:?}"),
            }
        }
    }

    #[test]
    fn test_moving_average_warm_up() {
        let mut ma = MovingAverage::new(3);

        assert_eq!(ma.update(100.0), None);
        assert_eq!(ma.update(102.0), None);
        assert!(!ma.is_ready());

        let value = ma.update(104.0).unwrap();
        assert!((value - 102.0).abs() < 1e-9);

        // Oldest value rolls off
        let value = ma.update(110.0).unwrap();
        assert!((value - 105.333_333_333).abs() < 1e-6);
        assert_eq!(ma.window(), 3);
    }

    #[test]
    fn test_simple_moving_average() {
        let closes = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];

        assert_close(
            &simple_moving_average(&closes, 1),
            &closes.map(Some),
        );
        assert_close(
            &simple_moving_average(&closes, 5),
            &[None, None, None, None, Some(3.0), Some(4.0)],
        );
        assert_close(&simple_moving_average(&closes, 60), &[None; 6]);
        assert_close(&simple_moving_average(&[], 5), &[]);
    }

    #[test]
    fn test_zero_window_never_ready() {
        let mut ma = MovingAverage::new(0);
        assert_eq!(ma.update(1.0), None);
        assert_eq!(ma.update(2.0), None);
    }
}
