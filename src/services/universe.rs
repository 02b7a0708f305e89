//! Symbol universe providers.

use crate::error::UniverseError;
use crate::models::ScanType;
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[async_trait]
pub trait SymbolUniverse: Send + Sync {
    /// Ordered, de-duplicated tickers to scan.
    async fn list_symbols(&self, scan_type: ScanType) -> Result<Vec<String>, UniverseError>;
}

/// Trim, upper-case and de-duplicate tickers, keeping first-seen order.
/// Blank lines and `#` comments are skipped.
pub fn normalize_symbols<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter_map(|s| {
            let symbol = s.as_ref().trim();
            if symbol.is_empty() || symbol.starts_with('#') {
                None
            } else {
                Some(symbol.to_uppercase())
            }
        })
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

/// One ticker per line, re-read on every scan so edits apply without a restart.
pub struct FileSymbolUniverse {
    path: PathBuf,
}

impl FileSymbolUniverse {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SymbolUniverse for FileSymbolUniverse {
    async fn list_symbols(&self, _scan_type: ScanType) -> Result<Vec<String>, UniverseError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| UniverseError::Io {
                path: self.path.display().to_string(),
                source,
            })?;

        let symbols = normalize_symbols(content.lines());
        if symbols.is_empty() {
            return Err(UniverseError::Empty);
        }
        Ok(symbols)
    }
}

/// Fixed list, same for every scan type.
pub struct StaticSymbolUniverse {
    symbols: Vec<String>,
}

impl StaticSymbolUniverse {
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            symbols: normalize_symbols(symbols),
        }
    }
}

#[async_trait]
impl SymbolUniverse for StaticSymbolUniverse {
    async fn list_symbols(&self, _scan_type: ScanType) -> Result<Vec<String>, UniverseError> {
        if self.symbols.is_empty() {
            return Err(UniverseError::Empty);
        }
        Ok(self.symbols.clone())
    }
}
