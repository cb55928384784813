//! Metrics for evaluating forecast performance

use serde::{Deserialize, Serialize};

/// Accuracy of a forecast against held-out actual values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    /// Mean absolute error
    pub mae: f64,
    /// Root mean squared error
    pub rmse: f64,
    /// Mean absolute percentage error, in percent
    ///
    /// Days with a zero actual are skipped. `None` when no day is left.
    pub mape: Option<f64>,
}

/// Evaluate paired `(actual, predicted)` values
///
/// An empty input yields zero for every metric.
pub fn evaluate(actual: &[f64], predicted: &[f64]) -> AccuracyMetrics {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return AccuracyMetrics {
            mae: 0.0,
            rmse: 0.0,
            mape: Some(0.0),
        };
    }

    let pairs = actual[..n].iter().zip(&predicted[..n]);

    let mut abs_sum = 0.0;
    let mut sq_sum = 0.0;
    let mut pct_sum = 0.0;
    let mut pct_count = 0usize;
    for (&a, &p) in pairs {
        let err = a - p;
        abs_sum += err.abs();
        sq_sum += err * err;
        if a != 0.0 {
            pct_sum += (err / a).abs();
            pct_count += 1;
        }
    }

    let mape = if pct_count > 0 {
        Some(pct_sum / pct_count as f64 * 100.0)
    } else {
        None
    };

    AccuracyMetrics {
        mae: abs_sum / n as f64,
        rmse: (sq_sum / n as f64).sqrt(),
        mape,
    }
}
