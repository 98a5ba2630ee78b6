use csv::ReaderBuilder;
use serde::Deserialize;
use std::error::Error;
use std::fs::File;

#[derive(Debug, Clone)]
pub struct Candles {
    pub timestamp: Vec<i64>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
}

impl Candles {
    pub fn new(
        timestamp: Vec<i64>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
        volume: Vec<f64>,
    ) -> Self {
        Candles {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    pub fn get_timestamp(&self) -> Result<&[i64], Box<dyn Error>> {
        Ok(&self.timestamp)
    }

    pub fn select_candle_field(&self, field: &str) -> Result<&[f64], Box<dyn Error>> {
        match field.to_lowercase().as_str() {
            "open" => Ok(&self.open),
            "high" => Ok(&self.high),
            "low" => Ok(&self.low),
            "close" => Ok(&self.close),
            "volume" => Ok(&self.volume),
            _ => Err(format!("Invalid field: {}", field).into()),
        }
    }
}

/// Resolves a source string ("open", "high", "low", "close", "volume") to the
/// matching candle column. Unknown sources fall back to the close column.
pub fn source_type<'a>(candles: &'a Candles, source: &str) -> &'a [f64] {
    match source.to_lowercase().as_str() {
        "open" => &candles.open,
        "high" => &candles.high,
        "low" => &candles.low,
        "volume" => &candles.volume,
        _ => &candles.close,
    }
}

#[derive(Debug, Deserialize)]
struct CandleRow {
    timestamp: i64,
    open: f64,
    close: f64,
    high: f64,
    low: f64,
    volume: f64,
}

pub fn read_candles_from_csv(file_path: &str) -> Result<Candles, Box<dyn Error>> {
    let file = File::open(file_path)?;
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

    let mut timestamp = Vec::new();
    let mut open = Vec::new();
    let mut high = Vec::new();
    let mut low = Vec::new();
    let mut close = Vec::new();
    let mut volume = Vec::new();

    for result in rdr.deserialize() {
        let row: CandleRow = result?;
        timestamp.push(row.timestamp);
        open.push(row.open);
        high.push(row.high);
        low.push(row.low);
        close.push(row.close);
        volume.push(row.volume);
    }

    Ok(Candles::new(timestamp, open, high, low, close, volume))
}
