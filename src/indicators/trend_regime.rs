/// # Trend Regime (Hysteresis Classifier)
///
/// Classifies a smoothed slope/derivative series into discrete trend regimes
/// using a two-threshold hysteresis band and a persistent 3-valued memory.
/// The memory starts ambiguous, resolves to up or down on the first band
/// crossing, and never returns to the ambiguous state for the rest of the
/// call. State is local to each invocation.
///
/// Label emission is asymmetric and deliberately kept that way: a transition
/// out of the ambiguous state, and the up-to-down transition, emit no label
/// for that sample; the down-to-up transition emits `Uptrend` in the same
/// step. The label vector can therefore be shorter than the input series.
/// Downstream consumers depend on this exact cadence.
///
/// ## Parameters
/// - **lower_threshold**: lower trigger of the band (defaults to -450.0).
/// - **upper_threshold**: upper trigger of the band (defaults to 230.0).
///
/// ## Errors
/// - **EmptyData**: trend_regime: Input data slice is empty.
/// - **InvalidBand**: trend_regime: `lower_threshold >= upper_threshold`.
/// - **AllValuesNaN**: trend_regime: All input data values are `NaN`.
///
/// ## Returns
/// - **`Ok(TrendRegimeOutput)`** on success, containing a `Vec<TrendLabel>`
///   of at most the input length.
/// - **`Err(TrendRegimeError)`** otherwise.
use crate::utilities::data_loader::{source_type, Candles};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone)]
pub enum TrendRegimeData<'a> {
    Candles {
        candles: &'a Candles,
        source: &'a str,
    },
    Slice(&'a [f64]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendLabel {
    StartAmbiguity,
    Uptrend,
    Downtrend,
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrendLabel::StartAmbiguity => "start_ambiguity",
            TrendLabel::Uptrend => "uptrend",
            TrendLabel::Downtrend => "downtrend",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrendState {
    Ambiguous,
    Up,
    Down,
}

#[derive(Debug, Clone)]
pub struct TrendRegimeOutput {
    pub labels: Vec<TrendLabel>,
}

#[derive(Debug, Clone)]
pub struct TrendRegimeParams {
    pub lower_threshold: Option<f64>,
    pub upper_threshold: Option<f64>,
}

impl Default for TrendRegimeParams {
    fn default() -> Self {
        Self {
            lower_threshold: Some(-450.0),
            upper_threshold: Some(230.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrendRegimeInput<'a> {
    pub data: TrendRegimeData<'a>,
    pub params: TrendRegimeParams,
}

impl<'a> TrendRegimeInput<'a> {
    pub fn from_candles(candles: &'a Candles, source: &'a str, params: TrendRegimeParams) -> Self {
        Self {
            data: TrendRegimeData::Candles { candles, source },
            params,
        }
    }

    pub fn from_slice(slice: &'a [f64], params: TrendRegimeParams) -> Self {
        Self {
            data: TrendRegimeData::Slice(slice),
            params,
        }
    }

    pub fn with_default_candles(candles: &'a Candles) -> Self {
        Self {
            data: TrendRegimeData::Candles {
                candles,
                source: "close",
            },
            params: TrendRegimeParams::default(),
        }
    }

    pub fn get_lower_threshold(&self) -> f64 {
        self.params
            .lower_threshold
            .unwrap_or_else(|| TrendRegimeParams::default().lower_threshold.unwrap())
    }

    pub fn get_upper_threshold(&self) -> f64 {
        self.params
            .upper_threshold
            .unwrap_or_else(|| TrendRegimeParams::default().upper_threshold.unwrap())
    }
}

#[derive(Debug, Error)]
pub enum TrendRegimeError {
    #[error("trend_regime: Empty data provided.")]
    EmptyData,
    #[error("trend_regime: Invalid hysteresis band: lower = {lower}, upper = {upper}")]
    InvalidBand { lower: f64, upper: f64 },
    #[error("trend_regime: All values are NaN.")]
    AllValuesNaN,
}

#[inline]
pub fn trend_regime(input: &TrendRegimeInput) -> Result<TrendRegimeOutput, TrendRegimeError> {
    let data: &[f64] = match &input.data {
        TrendRegimeData::Candles { candles, source } => source_type(candles, source),
        TrendRegimeData::Slice(slice) => slice,
    };

    if data.is_empty() {
        return Err(TrendRegimeError::EmptyData);
    }

    let lower = input.get_lower_threshold();
    let upper = input.get_upper_threshold();
    if lower >= upper {
        return Err(TrendRegimeError::InvalidBand { lower, upper });
    }

    if data.iter().all(|x| x.is_nan()) {
        return Err(TrendRegimeError::AllValuesNaN);
    }

    let mut state = TrendState::Ambiguous;
    let mut labels = Vec::with_capacity(data.len());

    // A NaN sample fails every threshold comparison and lands in the
    // hold/emit else-branches.
    for &v in data {
        match state {
            TrendState::Ambiguous => {
                if v <= lower {
                    state = TrendState::Down;
                } else if v >= upper {
                    state = TrendState::Up;
                } else {
                    labels.push(TrendLabel::StartAmbiguity);
                }
            }
            TrendState::Up => {
                if v <= lower {
                    state = TrendState::Down;
                } else {
                    labels.push(TrendLabel::Uptrend);
                }
            }
            TrendState::Down => {
                if v >= upper {
                    state = TrendState::Up;
                    labels.push(TrendLabel::Uptrend);
                } else {
                    labels.push(TrendLabel::Downtrend);
                }
            }
        }
    }

    Ok(TrendRegimeOutput { labels })
}
