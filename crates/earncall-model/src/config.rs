use std::time::Duration;

/// Default browser-like user agent; the site blocks obvious bot agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Settings for one scrape transport. Passed by value and never mutated
/// after construction.
///
/// For most documents cookies are not required. If fragment endpoints
/// return 404/403 for a transcript that exists in the browser, pass the
/// browser's cookie header through `cookies`.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub user_agent: String,
    /// Raw `Cookie` header value, passed through opaquely for gated access.
    pub cookies: Option<String>,
    /// Extra headers merged over the defaults, last writer wins.
    pub extra_headers: Vec<(String, String)>,
    /// How many numbered fragment pages (`/1/`, `/2/`, ...) to attempt.
    pub max_parts: u32,
    /// Politeness delay between fragment requests within one document.
    pub fragment_delay: Duration,
    pub timeout: Duration,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            cookies: None,
            extra_headers: Vec::new(),
            max_parts: 200,
            fragment_delay: Duration::ZERO,
            timeout: Duration::from_secs(30),
        }
    }
}
