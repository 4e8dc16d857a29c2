//! CSV price history loader.
//!
//! Expected header: `timestamp,open,high,low,close,volume`, timestamps in
//! RFC 3339. Rows must already be oldest first; ordering is checked when
//! the window is built.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

use signallab_core::PriceBar;

pub fn load_bars(path: &Path) -> Result<Vec<PriceBar>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    read_bars(file).with_context(|| format!("failed to read bars from {}", path.display()))
}

pub fn read_bars<R: Read>(reader: R) -> Result<Vec<PriceBar>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    rdr.deserialize()
        .enumerate()
        .map(|(i, row)| row.with_context(|| format!("bad row {}", i + 1)))
        .collect()
}

/// Symbol implied by a file name (`data/BTC-USD.csv` → `BTC-USD`).
pub fn symbol_from_path(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .with_context(|| format!("cannot derive a symbol from {}", path.display()))
}
