/// # Rolling Slope (Least Squares)
///
/// Ordinary least-squares slope of a series against its sample offset over a
/// rolling window. Produces the smoothed derivative signal consumed by the
/// trend-regime classifier: positive values indicate local appreciation,
/// negative values local depreciation, in price units per sample.
///
/// ## Parameters
/// - **period**: The regression window (number of data points). Defaults to 10.
///
/// ## Errors
/// - **EmptyData**: slope: Input data slice is empty.
/// - **InvalidPeriod**: slope: `period` is zero or exceeds the data length.
/// - **NotEnoughValidData**: slope: Fewer than `period` valid (non-`NaN`) data
///   points remain after the first valid index.
/// - **AllValuesNaN**: slope: All input data values are `NaN`.
///
/// ## Returns
/// - **`Ok(SlopeOutput)`** on success, containing a `Vec<f64>` matching the
///   input length, with leading `NaN`s until the window is filled.
/// - **`Err(SlopeError)`** otherwise.
use crate::utilities::data_loader::{source_type, Candles};
use thiserror::Error;

#[derive(Debug, Clone)]
pub enum SlopeData<'a> {
    Candles {
        candles: &'a Candles,
        source: &'a str,
    },
    Slice(&'a [f64]),
}

#[derive(Debug, Clone)]
pub struct SlopeOutput {
    pub values: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct SlopeParams {
    pub period: Option<usize>,
}

impl Default for SlopeParams {
    fn default() -> Self {
        Self { period: Some(10) }
    }
}

#[derive(Debug, Clone)]
pub struct SlopeInput<'a> {
    pub data: SlopeData<'a>,
    pub params: SlopeParams,
}

impl<'a> SlopeInput<'a> {
    pub fn from_candles(candles: &'a Candles, source: &'a str, params: SlopeParams) -> Self {
        Self {
            data: SlopeData::Candles { candles, source },
            params,
        }
    }

    pub fn from_slice(slice: &'a [f64], params: SlopeParams) -> Self {
        Self {
            data: SlopeData::Slice(slice),
            params,
        }
    }

    pub fn with_default_candles(candles: &'a Candles) -> Self {
        Self {
            data: SlopeData::Candles {
                candles,
                source: "close",
            },
            params: SlopeParams::default(),
        }
    }

    pub fn get_period(&self) -> usize {
        self.params
            .period
            .unwrap_or_else(|| SlopeParams::default().period.unwrap())
    }
}

#[derive(Debug, Error)]
pub enum SlopeError {
    #[error("slope: Empty data provided.")]
    EmptyData,
    #[error("slope: Invalid period: period = {period}, data length = {data_len}")]
    InvalidPeriod { period: usize, data_len: usize },
    #[error("slope: Not enough valid data: needed = {needed}, valid = {valid}")]
    NotEnoughValidData { needed: usize, valid: usize },
    #[error("slope: All values are NaN.")]
    AllValuesNaN,
}

#[inline]
pub fn slope(input: &SlopeInput) -> Result<SlopeOutput, SlopeError> {
    let data: &[f64] = match &input.data {
        SlopeData::Candles { candles, source } => source_type(candles, source),
        SlopeData::Slice(slice) => slice,
    };

    if data.is_empty() {
        return Err(SlopeError::EmptyData);
    }

    let period = input.get_period();
    if period == 0 || period > data.len() {
        return Err(SlopeError::InvalidPeriod {
            period,
            data_len: data.len(),
        });
    }

    let first_valid_idx = match data.iter().position(|&x| !x.is_nan()) {
        Some(idx) => idx,
        None => return Err(SlopeError::AllValuesNaN),
    };

    if (data.len() - first_valid_idx) < period {
        return Err(SlopeError::NotEnoughValidData {
            needed: period,
            valid: data.len() - first_valid_idx,
        });
    }

    let n = period as f64;
    let sum_x = (period - 1) as f64 * n / 2.0;
    let sum_x2 = (period - 1) as f64 * n * (2.0 * (period - 1) as f64 + 1.0) / 6.0;
    let denominator = n * sum_x2 - sum_x * sum_x;

    let mut out = vec![f64::NAN; data.len()];
    for i in (first_valid_idx + period - 1)..data.len() {
        let start = i + 1 - period;
        let mut sum_y = 0.0;
        let mut sum_xy = 0.0;
        for (k, &v) in data[start..=i].iter().enumerate() {
            sum_y += v;
            sum_xy += k as f64 * v;
        }
        out[i] = (n * sum_xy - sum_x * sum_y) / denominator;
    }

    Ok(SlopeOutput { values: out })
}
