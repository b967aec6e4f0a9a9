use thiserror::Error;

/// Scrape-layer failures. Absence of a fragment is not an error; it is
/// the assembler's normal termination signal (`FragmentStatus::Absent`).
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// A non-404 HTTP failure, carrying the status and resolved URL.
    #[error("HTTP {status} for {url}")]
    Http { status: u16, url: String },

    /// Connection, TLS, or timeout failure before a status was obtained.
    #[error("request failed for {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Assembly produced zero fragments. Distinct from a legitimately
    /// absent document; usually means the page is gated (login/anti-bot)
    /// or the fragment URL pattern changed.
    #[error(
        "no transcript fragments retrieved from {url}; \
         the page may be gated or the fragment pattern may have changed"
    )]
    NoContent { url: String },

    #[error("failed to build HTTP client")]
    Client(#[from] reqwest::Error),
}
