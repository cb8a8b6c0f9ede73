// External crates
use chrono::{DateTime, Local};
use std::collections::HashMap;

// Internal modules
use crate::forecaster::ForecastMethod;

/// Identity of one computed forecast
///
/// Every component participates in equality: changing the symbol, the
/// sampling interval, the target column, or the method addresses a
/// different entry. This replaces ambient session state with an explicit
/// key, so invalidation is a visible operation instead of a side effect.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForecastKey {
    pub symbol: String,
    pub interval: String,
    pub column: String,
    pub method: ForecastMethod,
}

impl ForecastKey {
    pub fn new(
        symbol: impl Into<String>,
        interval: impl Into<String>,
        column: impl Into<String>,
        method: ForecastMethod,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            interval: interval.into(),
            column: column.into(),
            method,
        }
    }
}

/// A cached forecast and when it was computed
#[derive(Debug, Clone)]
pub struct ForecastRecord {
    pub values: Vec<f64>,
    pub computed_at: DateTime<Local>,
}

/// Explicit cache of the last computed forecast per key
#[derive(Debug, Default)]
pub struct ForecastCache {
    entries: HashMap<ForecastKey, ForecastRecord>,
}

impl ForecastCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ForecastKey) -> Option<&ForecastRecord> {
        self.entries.get(key)
    }

    /// Stores a forecast, replacing any previous entry for the key
    pub fn insert(&mut self, key: ForecastKey, values: Vec<f64>) {
        log::debug!("caching {} values for {:?}", values.len(), key);
        self.entries.insert(
            key,
            ForecastRecord {
                values,
                computed_at: Local::now(),
            },
        );
    }

    /// Drops one entry, if present
    pub fn invalidate(&mut self, key: &ForecastKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drops every entry for a symbol, across intervals, columns and
    /// methods; returns how many were removed
    pub fn invalidate_symbol(&mut self, symbol: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.symbol != symbol);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
