use std::io::Read;
use std::path::Path;

use anyhow::{ensure, Context, Result};

/// Load ticker symbols from a CSV listing.
///
/// The header row must contain `act_symbol` (case-insensitive); the first
/// column of each row is the ticker. Blank rows are skipped.
pub fn read_tickers(path: &Path) -> Result<Vec<String>> {
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("ticker file not found: {}", path.display()))?;
    parse_tickers(reader, &path.display().to_string())
}

fn parse_tickers<R: Read>(mut reader: csv::Reader<R>, origin: &str) -> Result<Vec<String>> {
    let headers = reader.headers()?.clone();
    ensure!(
        headers
            .iter()
            .any(|h| h.to_ascii_lowercase().contains("act_symbol")),
        "expected header 'act_symbol' in {origin}, got: {}",
        headers.iter().collect::<Vec<_>>().join(",")
    );

    let mut tickers = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(first) = record.get(0) {
            let ticker = first.trim();
            if !ticker.is_empty() {
                tickers.push(ticker.to_string());
            }
        }
    }
    Ok(tickers)
}
