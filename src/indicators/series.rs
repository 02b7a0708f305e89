//! Indicator values aligned index-for-index with a price series.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSeries {
    period: usize,
    values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    pub(crate) fn new(period: usize, values: Vec<Option<f64>>) -> Self {
        Self { period, values }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `index`; `None` inside the warm-up gap or out of range.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Most recent defined value.
    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }

    /// Number of leading undefined entries.
    pub fn warmup(&self) -> usize {
        self.values.iter().take_while(|v| v.is_none()).count()
    }
}
