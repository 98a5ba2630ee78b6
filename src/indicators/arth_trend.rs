/// # ARTH Trend (Damped Appreciation Walk)
///
/// Computes a synthetic price trajectory for the pegged asset ARTH from two
/// index-aligned reference-asset series (a long-horizon and a short-horizon
/// smoothing of the same feed). The output starts as a flat warm-up block of
/// `long_term_duration` copies of `starting_price`; afterwards each value is
/// derived from the previous output value. When both reference series strictly
/// appreciated versus the prior index, the previous output is scaled by
/// `1 + dampening_factor * pct_change`, where `pct_change` is the long-term
/// series' percentage change. In every other case the price holds flat.
///
/// The walk is a one-directional ratchet: depreciation and mixed signals never
/// push the output down. `output[i]` depends on `output[i - 1]`, so the
/// recurrence is strictly sequential.
///
/// ## Parameters
/// - **long_term_duration**: warm-up window held at `starting_price`
///   (defaults to 30).
/// - **dampening_factor**: fraction of the reference percentage change
///   transferred per step (defaults to 0.1).
///
/// ## Errors
/// - **EmptyData**: arth_trend: Both input series are empty.
/// - **MismatchedLengths**: arth_trend: The two reference series differ in length.
/// - **InvalidDuration**: arth_trend: `long_term_duration` is zero or exceeds
///   the series length.
/// - **ZeroReferencePrice**: arth_trend: The long-term series is zero at the
///   index used as a percentage-change denominator.
///
/// ## Returns
/// - **`Ok(ArthTrendOutput)`** on success, containing a `Vec<f64>` matching
///   the input length.
/// - **`Err(ArthTrendError)`** otherwise.
use crate::utilities::data_loader::{source_type, Candles};
use thiserror::Error;

#[derive(Debug, Clone)]
pub enum ArthTrendData<'a> {
    Candles {
        candles_long: &'a Candles,
        candles_short: &'a Candles,
        source: &'a str,
    },
    Slices {
        long_term: &'a [f64],
        short_term: &'a [f64],
    },
}

#[derive(Debug, Clone)]
pub struct ArthTrendOutput {
    pub values: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct ArthTrendParams {
    pub long_term_duration: Option<usize>,
    pub dampening_factor: Option<f64>,
}

impl Default for ArthTrendParams {
    fn default() -> Self {
        Self {
            long_term_duration: Some(30),
            dampening_factor: Some(0.1),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArthTrendInput<'a> {
    pub data: ArthTrendData<'a>,
    pub starting_price: f64,
    pub params: ArthTrendParams,
}

impl<'a> ArthTrendInput<'a> {
    pub fn from_candles(
        candles_long: &'a Candles,
        candles_short: &'a Candles,
        source: &'a str,
        starting_price: f64,
        params: ArthTrendParams,
    ) -> Self {
        Self {
            data: ArthTrendData::Candles {
                candles_long,
                candles_short,
                source,
            },
            starting_price,
            params,
        }
    }

    pub fn from_slices(
        long_term: &'a [f64],
        short_term: &'a [f64],
        starting_price: f64,
        params: ArthTrendParams,
    ) -> Self {
        Self {
            data: ArthTrendData::Slices {
                long_term,
                short_term,
            },
            starting_price,
            params,
        }
    }

    pub fn get_long_term_duration(&self) -> usize {
        self.params
            .long_term_duration
            .unwrap_or_else(|| ArthTrendParams::default().long_term_duration.unwrap())
    }

    pub fn get_dampening_factor(&self) -> f64 {
        self.params
            .dampening_factor
            .unwrap_or_else(|| ArthTrendParams::default().dampening_factor.unwrap())
    }
}

#[derive(Debug, Error)]
pub enum ArthTrendError {
    #[error("arth_trend: Empty data provided.")]
    EmptyData,
    #[error("arth_trend: Mismatched series lengths: long = {long_len}, short = {short_len}")]
    MismatchedLengths { long_len: usize, short_len: usize },
    #[error(
        "arth_trend: Invalid long-term duration: duration = {duration}, data length = {data_len}"
    )]
    InvalidDuration { duration: usize, data_len: usize },
    #[error("arth_trend: Zero reference price at index {index} used as denominator.")]
    ZeroReferencePrice { index: usize },
}

#[inline]
pub fn arth_trend(input: &ArthTrendInput) -> Result<ArthTrendOutput, ArthTrendError> {
    let (long_term, short_term): (&[f64], &[f64]) = match &input.data {
        ArthTrendData::Candles {
            candles_long,
            candles_short,
            source,
        } => (
            source_type(candles_long, source),
            source_type(candles_short, source),
        ),
        ArthTrendData::Slices {
            long_term,
            short_term,
        } => (long_term, short_term),
    };

    if long_term.is_empty() && short_term.is_empty() {
        return Err(ArthTrendError::EmptyData);
    }
    if long_term.len() != short_term.len() {
        return Err(ArthTrendError::MismatchedLengths {
            long_len: long_term.len(),
            short_len: short_term.len(),
        });
    }

    let duration = input.get_long_term_duration();
    if duration == 0 || duration > long_term.len() {
        return Err(ArthTrendError::InvalidDuration {
            duration,
            data_len: long_term.len(),
        });
    }

    let dampening_factor = input.get_dampening_factor();
    let mut values = vec![input.starting_price; duration];
    values.reserve(long_term.len() - duration);

    for i in duration..long_term.len() {
        let previous = values[i - 1];
        // NaN comparisons are false, so NaN reference samples hold the price flat.
        if long_term[i] > long_term[i - 1] && short_term[i] > short_term[i - 1] {
            if long_term[i - 1] == 0.0 {
                return Err(ArthTrendError::ZeroReferencePrice { index: i - 1 });
            }
            let delta = long_term[i] - long_term[i - 1];
            let pct_change = delta / long_term[i - 1];
            let dampened = pct_change * dampening_factor;
            values.push(previous * (1.0 + dampened));
        } else {
            values.push(previous);
        }
    }

    Ok(ArthTrendOutput { values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::sma::{sma, SmaInput, SmaParams};
    use crate::utilities::data_loader::read_candles_from_csv;

    #[test]
    fn test_arth_trend_reference_scenario() {
        let long_term = [100.0, 100.0, 110.0, 121.0];
        let short_term = [1.0, 1.0, 1.1, 1.1];
        let params = ArthTrendParams {
            long_term_duration: Some(2),
            dampening_factor: Some(0.5),
        };
        let input = ArthTrendInput::from_slices(&long_term, &short_term, 50.0, params);
        let output = arth_trend(&input).expect("Failed reference scenario");

        let expected = [50.0, 50.0, 52.5, 52.5];
        assert_eq!(output.values.len(), expected.len());
        for (i, (&value, &exp)) in output.values.iter().zip(expected.iter()).enumerate() {
            assert!(
                (value - exp).abs() < 1e-12,
                "Mismatch at index {}: expected {}, got {}",
                i,
                exp,
                value
            );
        }
    }

    #[test]
    fn test_arth_trend_accuracy() {
        let file_path = "src/data/btc_usd_daily_2020.csv";
        let candles = read_candles_from_csv(file_path).expect("Failed to load test candles");
        let close = candles
            .select_candle_field("close")
            .expect("Failed to extract close prices");

        let long_params = SmaParams { period: Some(30) };
        let long_term = sma(&SmaInput::from_slice(close, long_params)).expect("Failed 30d SMA");
        let short_params = SmaParams { period: Some(7) };
        let short_term = sma(&SmaInput::from_slice(close, short_params)).expect("Failed 7d SMA");

        let input = ArthTrendInput::from_slices(
            &long_term.values,
            &short_term.values,
            2.0,
            ArthTrendParams::default(),
        );
        let output = arth_trend(&input).expect("Failed to calculate ARTH trend");

        assert_eq!(output.values.len(), close.len(), "Output length mismatch");

        for (i, &value) in output.values.iter().take(30).enumerate() {
            assert_eq!(value, 2.0, "Warm-up block broken at index {}", i);
        }

        let expected_last_five = [
            2.1747432487741096,
            2.176769855877781,
            2.1788853360154397,
            2.1812460376107525,
            2.1835639273657708,
        ];
        let start_index = output.values.len() - 5;
        for (i, &value) in output.values[start_index..].iter().enumerate() {
            let expected_value = expected_last_five[i];
            assert!(
                (value - expected_value).abs() < 1e-9,
                "ARTH trend mismatch at index {}: expected {}, got {}",
                i,
                expected_value,
                value
            );
        }
    }

    #[test]
    fn test_arth_trend_ratchet_never_decreases() {
        let long_term = [
            100.0, 101.0, 99.0, 102.0, 102.0, 105.0, 104.0, 108.0, 107.0, 111.0,
        ];
        let short_term = [
            10.0, 10.5, 10.2, 10.6, 10.4, 10.9, 10.7, 11.2, 11.0, 11.5,
        ];
        let params = ArthTrendParams {
            long_term_duration: Some(3),
            dampening_factor: Some(0.2),
        };
        let input = ArthTrendInput::from_slices(&long_term, &short_term, 1.0, params);
        let output = arth_trend(&input).expect("Failed ratchet scenario");

        assert_eq!(output.values.len(), long_term.len());
        for w in output.values.windows(2) {
            assert!(
                w[1] >= w[0],
                "Output decreased: {} then {}",
                w[0],
                w[1]
            );
        }
        assert!(
            output.values[output.values.len() - 1] > 1.0,
            "Expected at least one appreciation step to land"
        );
    }

    #[test]
    fn test_arth_trend_no_appreciation_stays_flat() {
        let long_term = [100.0, 99.0, 99.0, 98.0, 97.5, 97.5];
        let short_term = [10.0, 10.5, 11.0, 11.5, 12.0, 12.5];
        let params = ArthTrendParams {
            long_term_duration: Some(2),
            dampening_factor: Some(0.1),
        };
        let input = ArthTrendInput::from_slices(&long_term, &short_term, 3.0, params);
        let output = arth_trend(&input).expect("Failed flat scenario");

        assert_eq!(output.values.len(), long_term.len());
        for (i, &value) in output.values.iter().enumerate() {
            assert_eq!(
                value, 3.0,
                "Expected constant starting price at index {}, got {}",
                i, value
            );
        }
    }

    #[test]
    fn test_arth_trend_nan_reference_holds_flat() {
        let nan = f64::NAN;
        let long_term = [nan, nan, nan, 100.0, 110.0, 121.0];
        let short_term = [nan, nan, nan, 1.0, 1.1, 1.2];
        let params = ArthTrendParams {
            long_term_duration: Some(2),
            dampening_factor: Some(0.1),
        };
        let input = ArthTrendInput::from_slices(&long_term, &short_term, 5.0, params);
        let output = arth_trend(&input).expect("Failed NaN scenario");

        // Comparisons against the NaN prefix fail, so the price holds until
        // index 4 where both series have two real samples.
        assert_eq!(output.values[0], 5.0);
        assert_eq!(output.values[1], 5.0);
        assert_eq!(output.values[2], 5.0);
        assert_eq!(output.values[3], 5.0);
        assert!((output.values[4] - 5.0 * 1.01).abs() < 1e-12);
        assert!(output.values[5] > output.values[4]);
    }

    #[test]
    fn test_arth_trend_mismatched_lengths() {
        let long_term = [100.0, 101.0, 102.0];
        let short_term = [10.0, 10.5];
        let input = ArthTrendInput::from_slices(
            &long_term,
            &short_term,
            1.0,
            ArthTrendParams::default(),
        );

        let result = arth_trend(&input);
        assert!(result.is_err(), "Expected error for mismatched lengths");
        if let Err(e) = result {
            assert!(
                e.to_string().contains("Mismatched series lengths"),
                "Expected mismatched-lengths error, got: {}",
                e
            );
        }
    }

    #[test]
    fn test_arth_trend_with_zero_duration() {
        let long_term = [100.0, 101.0, 102.0];
        let short_term = [10.0, 10.5, 11.0];
        let params = ArthTrendParams {
            long_term_duration: Some(0),
            dampening_factor: Some(0.1),
        };
        let input = ArthTrendInput::from_slices(&long_term, &short_term, 1.0, params);

        let result = arth_trend(&input);
        assert!(result.is_err(), "Expected error for zero duration");
        if let Err(e) = result {
            assert!(
                e.to_string().contains("Invalid long-term duration"),
                "Expected invalid-duration error, got: {}",
                e
            );
        }
    }

    #[test]
    fn test_arth_trend_with_duration_exceeding_data_length() {
        let long_term = [100.0, 101.0, 102.0];
        let short_term = [10.0, 10.5, 11.0];
        let params = ArthTrendParams {
            long_term_duration: Some(10),
            dampening_factor: Some(0.1),
        };
        let input = ArthTrendInput::from_slices(&long_term, &short_term, 1.0, params);

        let result = arth_trend(&input);
        assert!(result.is_err(), "Expected error for duration > data.len()");
    }

    #[test]
    fn test_arth_trend_empty_data() {
        let input = ArthTrendInput::from_slices(&[], &[], 1.0, ArthTrendParams::default());

        let result = arth_trend(&input);
        assert!(result.is_err(), "Expected error for empty data");
        if let Err(e) = result {
            assert!(
                e.to_string().contains("Empty data"),
                "Expected empty-data error, got: {}",
                e
            );
        }
    }

    #[test]
    fn test_arth_trend_zero_reference_price() {
        let long_term = [0.0, 1.0];
        let short_term = [1.0, 2.0];
        let params = ArthTrendParams {
            long_term_duration: Some(1),
            dampening_factor: Some(0.1),
        };
        let input = ArthTrendInput::from_slices(&long_term, &short_term, 1.0, params);

        let result = arth_trend(&input);
        assert!(result.is_err(), "Expected error for zero denominator");
        match result {
            Err(ArthTrendError::ZeroReferencePrice { index }) => {
                assert_eq!(index, 0, "Expected offending index 0");
            }
            other => panic!("Expected ZeroReferencePrice, got {:?}", other),
        }
    }

    #[test]
    fn test_arth_trend_zero_price_without_appreciation_is_ok() {
        // A zero sample only matters when the update branch is taken.
        let long_term = [0.0, 0.0, 5.0, 4.0];
        let short_term = [1.0, 0.5, 0.4, 0.3];
        let params = ArthTrendParams {
            long_term_duration: Some(1),
            dampening_factor: Some(0.1),
        };
        let input = ArthTrendInput::from_slices(&long_term, &short_term, 2.0, params);

        let output = arth_trend(&input).expect("Zero prices outside the update branch must pass");
        assert_eq!(output.values, vec![2.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_arth_trend_params_with_default_params() {
        let default_params = ArthTrendParams::default();
        assert_eq!(
            default_params.long_term_duration,
            Some(30),
            "Expected long_term_duration=30 in default parameters"
        );
        assert_eq!(
            default_params.dampening_factor,
            Some(0.1),
            "Expected dampening_factor=0.1 in default parameters"
        );
    }

    #[test]
    fn test_arth_trend_from_candles() {
        let file_path = "src/data/btc_usd_daily_2020.csv";
        let candles = read_candles_from_csv(file_path).expect("Failed to load test candles");

        // Same candle set on both legs: every joint comparison uses identical
        // samples, so the output appreciates whenever close rises.
        let input = ArthTrendInput::from_candles(
            &candles,
            &candles,
            "close",
            2.0,
            ArthTrendParams::default(),
        );
        let output = arth_trend(&input).expect("Failed ARTH trend from candles");
        assert_eq!(output.values.len(), candles.close.len());
        for w in output.values.windows(2) {
            assert!(w[1] >= w[0], "Ratchet violated: {} then {}", w[0], w[1]);
        }
    }
}
