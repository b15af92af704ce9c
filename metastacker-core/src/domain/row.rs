//! Row — one time point of OHLCV input.

/// A single input row.
///
/// Only `close` is used by the pipeline. The ancillary columns are carried
/// through as parsed (`None` when the column is absent or the cell is not a
/// number) and the timestamp is kept verbatim as an opaque ordering token.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub timestamp: Option<String>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    pub volume_btc: Option<f64>,
    pub volume_usd: Option<f64>,
}

impl Row {
    /// A row carrying only a close price.
    pub fn from_close(close: f64) -> Self {
        Self {
            timestamp: None,
            open: None,
            high: None,
            low: None,
            close,
            volume_btc: None,
            volume_usd: None,
        }
    }

    /// True when all OHLC fields are present but high/low fail to bracket
    /// open and close. Rows missing any of them are not judged.
    pub fn has_inconsistent_range(&self) -> bool {
        match (self.open, self.high, self.low) {
            (Some(open), Some(high), Some(low)) => {
                !(high >= low
                    && high >= open
                    && high >= self.close
                    && low <= open
                    && low <= self.close)
            }
            _ => false,
        }
    }
}
