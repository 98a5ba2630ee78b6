/// # Simple Moving Average (SMA)
///
/// Rolling arithmetic mean over a fixed window, computed with a sliding sum.
/// Prepares the long-horizon and short-horizon reference series fed to the
/// ARTH trend generator.
///
/// ## Parameters
/// - **period**: The lookback window (number of data points). Defaults to 9.
///
/// ## Errors
/// - **EmptyData**: sma: Input data slice is empty.
/// - **InvalidPeriod**: sma: `period` is zero or exceeds the data length.
/// - **NotEnoughValidData**: sma: Fewer than `period` valid (non-`NaN`) data
///   points remain after the first valid index.
/// - **AllValuesNaN**: sma: All input data values are `NaN`.
///
/// ## Returns
/// - **`Ok(SmaOutput)`** on success, containing a `Vec<f64>` matching the
///   input length, with leading `NaN`s until the window is filled.
/// - **`Err(SmaError)`** otherwise.
use crate::utilities::data_loader::{source_type, Candles};
use thiserror::Error;

#[derive(Debug, Clone)]
pub enum SmaData<'a> {
    Candles {
        candles: &'a Candles,
        source: &'a str,
    },
    Slice(&'a [f64]),
}

#[derive(Debug, Clone)]
pub struct SmaOutput {
    pub values: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct SmaParams {
    pub period: Option<usize>,
}

impl Default for SmaParams {
    fn default() -> Self {
        Self { period: Some(9) }
    }
}

#[derive(Debug, Clone)]
pub struct SmaInput<'a> {
    pub data: SmaData<'a>,
    pub params: SmaParams,
}

impl<'a> SmaInput<'a> {
    pub fn from_candles(candles: &'a Candles, source: &'a str, params: SmaParams) -> Self {
        Self {
            data: SmaData::Candles { candles, source },
            params,
        }
    }

    pub fn from_slice(slice: &'a [f64], params: SmaParams) -> Self {
        Self {
            data: SmaData::Slice(slice),
            params,
        }
    }

    pub fn with_default_candles(candles: &'a Candles) -> Self {
        Self {
            data: SmaData::Candles {
                candles,
                source: "close",
            },
            params: SmaParams::default(),
        }
    }

    pub fn get_period(&self) -> usize {
        self.params
            .period
            .unwrap_or_else(|| SmaParams::default().period.unwrap())
    }
}

#[derive(Debug, Error)]
pub enum SmaError {
    #[error("sma: Empty data provided.")]
    EmptyData,
    #[error("sma: Invalid period: period = {period}, data length = {data_len}")]
    InvalidPeriod { period: usize, data_len: usize },
    #[error("sma: Not enough valid data: needed = {needed}, valid = {valid}")]
    NotEnoughValidData { needed: usize, valid: usize },
    #[error("sma: All values are NaN.")]
    AllValuesNaN,
}

#[inline]
pub fn sma(input: &SmaInput) -> Result<SmaOutput, SmaError> {
    let data: &[f64] = match &input.data {
        SmaData::Candles { candles, source } => source_type(candles, source),
        SmaData::Slice(slice) => slice,
    };

    if data.is_empty() {
        return Err(SmaError::EmptyData);
    }

    let period = input.get_period();
    if period == 0 || period > data.len() {
        return Err(SmaError::InvalidPeriod {
            period,
            data_len: data.len(),
        });
    }

    let first_valid_idx = match data.iter().position(|&x| !x.is_nan()) {
        Some(idx) => idx,
        None => return Err(SmaError::AllValuesNaN),
    };

    if (data.len() - first_valid_idx) < period {
        return Err(SmaError::NotEnoughValidData {
            needed: period,
            valid: data.len() - first_valid_idx,
        });
    }

    let mut sma_values = vec![f64::NAN; data.len()];

    let mut sum: f64 = data[first_valid_idx..(first_valid_idx + period)].iter().sum();
    sma_values[first_valid_idx + period - 1] = sum / period as f64;

    for i in (first_valid_idx + period)..data.len() {
        sum += data[i] - data[i - period];
        sma_values[i] = sum / period as f64;
    }

    Ok(SmaOutput { values: sma_values })
}
