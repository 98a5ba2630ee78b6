pub mod arth_trend;
pub mod slope;
pub mod sma;
pub mod trend_regime;

pub use arth_trend::{
    arth_trend, ArthTrendData, ArthTrendError, ArthTrendInput, ArthTrendOutput, ArthTrendParams,
};
pub use slope::{slope, SlopeData, SlopeError, SlopeInput, SlopeOutput, SlopeParams};
pub use sma::{sma, SmaData, SmaError, SmaInput, SmaOutput, SmaParams};
pub use trend_regime::{
    trend_regime, TrendLabel, TrendRegimeData, TrendRegimeError, TrendRegimeInput,
    TrendRegimeOutput, TrendRegimeParams,
};
