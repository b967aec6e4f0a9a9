use std::fs;
use std::path::Path;

/// Whether a (ticker, year, quarter) unit has already been processed,
/// based on presence and non-emptiness of the requested output files.
/// This is the run's only checkpoint; it makes re-runs idempotent.
pub fn already_processed(ticker_dir: &Path, stem: &str, save_txt: bool, save_csv: bool) -> bool {
    let mut expected = Vec::new();
    if save_txt {
        expected.push(ticker_dir.join(format!("{stem}.txt")));
    }
    if save_csv {
        expected.push(ticker_dir.join(format!("{stem}.csv")));
    }
    // With no outputs requested there is nothing to check against.
    if expected.is_empty() {
        return false;
    }

    expected
        .iter()
        .all(|p| fs::metadata(p).map(|m| m.len() > 0).unwrap_or(false))
}
