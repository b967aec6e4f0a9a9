use regex::Regex;

const BASE_URL: &str = "https://discountingcashflows.com";

/// Identifies one transcript document: a company's earnings call for one
/// fiscal quarter. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchTarget {
    pub ticker: String,
    pub year: u16,
    pub quarter: u8,
}

impl FetchTarget {
    pub fn new(ticker: impl Into<String>, year: u16, quarter: u8) -> Self {
        Self {
            ticker: ticker.into(),
            year,
            quarter,
        }
    }

    /// Canonical document URL, with the trailing slash the fragment
    /// endpoints are joined onto.
    ///
    /// Pattern observed on the transcripts page:
    /// `/company/AAPL/transcripts/2025/4/` (ticker/year/quarter).
    pub fn document_url(&self) -> String {
        format!(
            "{BASE_URL}/company/{}/transcripts/{}/{}/",
            self.ticker, self.year, self.quarter
        )
    }

    /// Ticker with filesystem-hostile characters replaced, usable as a
    /// directory name (e.g. `BRK.B` stays, `FOO/BAR` becomes `FOO_BAR`).
    pub fn safe_ticker(&self) -> String {
        safe_filename(&self.ticker)
    }

    /// Output-file stem shared by the `.txt` and `.csv` outputs,
    /// e.g. `AAPL_2025_Q4`.
    pub fn file_stem(&self) -> String {
        format!("{}_{}_Q{}", self.safe_ticker(), self.year, self.quarter)
    }
}

/// Replace each run of characters outside `[A-Za-z0-9._-]` with a single `_`.
pub fn safe_filename(s: &str) -> String {
    let re = Regex::new(r"[^A-Za-z0-9._-]+").expect("valid regex");
    re.replace_all(s, "_").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_url() {
        let target = FetchTarget::new("AAPL", 2025, 4);
        assert_eq!(
            target.document_url(),
            "https://discountingcashflows.com/company/AAPL/transcripts/2025/4/"
        );
    }

    #[test]
    fn test_file_stem() {
        let target = FetchTarget::new("AAPL", 2025, 4);
        assert_eq!(target.file_stem(), "AAPL_2025_Q4");
    }

    #[test]
    fn test_safe_filename() {
        assert_eq!(safe_filename("BRK.B"), "BRK.B");
        assert_eq!(safe_filename("FOO/BAR"), "FOO_BAR");
        assert_eq!(safe_filename("A  B"), "A_B");
        assert_eq!(safe_filename("plain"), "plain");
    }

    #[test]
    fn test_stem_sanitizes_ticker() {
        let target = FetchTarget::new("FOO/BAR", 2024, 1);
        assert_eq!(target.file_stem(), "FOO_BAR_2024_Q1");
        // The URL keeps the ticker as given; only filenames are sanitized.
        assert!(target.document_url().contains("/company/FOO/BAR/"));
    }
}
