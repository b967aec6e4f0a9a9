/// Interstitial phrases the site serves, with a 200 status, once a client
/// has been throttled.
pub const DEFAULT_RATE_LIMIT_PHRASES: [&str; 3] = [
    "Request Limit Reached",
    "Forbidden - Request Limit Reached",
    "You seem to have reached your request limit",
];

/// Detects the site's rate-limit interstitial by content inspection.
///
/// The phrase list is explicit configuration rather than module state.
/// Two predicates are exposed on purpose: throttling shows up through
/// two different channels (a 200-status page whose *content* is the
/// interstitial, and an error whose *message* happens to carry the same
/// phrases) and the two signals are checked independently.
#[derive(Debug, Clone)]
pub struct RateLimitDetector {
    phrases: Vec<String>,
}

impl RateLimitDetector {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phrases: phrases
                .into_iter()
                .map(|p| p.into().to_lowercase())
                .collect(),
        }
    }

    /// True if normalized page text contains a rate-limit phrase,
    /// case-insensitively. Applied to normalized text, not raw HTML;
    /// the interstitial's own markup is irrelevant.
    pub fn is_limited_text(&self, text: &str) -> bool {
        self.contains_phrase(text)
    }

    /// True if a scrape error's rendered message contains a rate-limit
    /// phrase, case-insensitively.
    pub fn is_limited_message(&self, message: &str) -> bool {
        self.contains_phrase(message)
    }

    fn contains_phrase(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.phrases.iter().any(|p| lowered.contains(p))
    }
}

impl Default for RateLimitDetector {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_LIMIT_PHRASES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limited_text_case_insensitive() {
        let detector = RateLimitDetector::default();
        assert!(detector.is_limited_text("... Request Limit Reached ..."));
        assert!(detector.is_limited_text("FORBIDDEN - REQUEST LIMIT REACHED"));
        assert!(detector.is_limited_text(
            "you seem to have reached your request limit, try later"
        ));
    }

    #[test]
    fn test_normal_content_not_limited() {
        let detector = RateLimitDetector::default();
        assert!(!detector.is_limited_text("normal transcript content"));
        assert!(!detector.is_limited_text(""));
    }

    #[test]
    fn test_limited_message() {
        let detector = RateLimitDetector::default();
        assert!(detector.is_limited_message("HTTP 403: Forbidden - Request Limit Reached"));
        assert!(!detector.is_limited_message("HTTP 500 for https://x.test/"));
    }

    #[test]
    fn test_custom_phrases() {
        let detector = RateLimitDetector::new(["slow down"]);
        assert!(detector.is_limited_text("Please SLOW DOWN and retry"));
        assert!(!detector.is_limited_text("Request Limit Reached"));
    }
}
