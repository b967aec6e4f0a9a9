use reqwest::header;
use reqwest::StatusCode;

use crate::error::ScrapeError;
use crate::transport::{FragmentStatus, FragmentTransport};
use earncall_model::ScrapeConfig;

/// Query parameter the site requires to serve fragment responses instead
/// of the full page shell.
pub const CACHE_BUSTER_PARAM: &str = "org.htmx.cache-buster";
/// Element id the fragments target; doubles as the cache-buster value.
pub const FRAGMENT_TARGET: &str = "transcriptsContent";

/// Live HTTP transport for the HTMX fragment endpoints.
pub struct HttpTransport {
    client: reqwest::Client,
    config: ScrapeConfig,
}

impl HttpTransport {
    pub fn new(config: ScrapeConfig) -> Result<Self, ScrapeError> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }
}

impl FragmentTransport for HttpTransport {
    async fn fetch_fragment(
        &self,
        base_url: &str,
        index: u32,
    ) -> Result<FragmentStatus, ScrapeError> {
        let base = with_trailing_slash(base_url);
        let url = fragment_url(&base, index);

        let mut request = self
            .client
            .get(&url)
            .query(&[(CACHE_BUSTER_PARAM, FRAGMENT_TARGET)])
            .header(header::ACCEPT, "*/*")
            .header(header::REFERER, base.as_str())
            // HTMX headers; without them the site serves the page shell
            .header("HX-Request", "true")
            .header("HX-Current-URL", base.as_str())
            .header("HX-Target", FRAGMENT_TARGET);
        for (name, value) in &self.config.extra_headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(cookie) = &self.config.cookies {
            request = request.header(header::COOKIE, cookie.as_str());
        }

        let response = request.send().await.map_err(|source| ScrapeError::Transport {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        let resolved = response.url().to_string();

        if status == StatusCode::NOT_FOUND {
            tracing::debug!(index, "Fragment absent (404)");
            return Ok(FragmentStatus::Absent);
        }
        if status.is_client_error() || status.is_server_error() {
            return Err(ScrapeError::Http {
                status: status.as_u16(),
                url: resolved,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| ScrapeError::Transport {
                url: resolved,
                source,
            })?;
        let body = body.trim();

        if body.is_empty() {
            tracing::debug!(index, "Fragment absent (empty body)");
            return Ok(FragmentStatus::Absent);
        }
        if is_not_found_template(body) {
            tracing::debug!(index, "Fragment absent (not-found template with 2xx)");
            return Ok(FragmentStatus::Absent);
        }

        Ok(FragmentStatus::Content(body.to_string()))
    }
}

/// The site sometimes serves its full 404 template with a 200 status.
/// Signature: the marker phrase and a "404" token co-occurring.
pub fn is_not_found_template(body: &str) -> bool {
    body.contains("Page Not Found") && body.contains("404")
}

fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

/// Index 0 resolves to the base URL itself; indices 1+ to `{base}{n}/`.
pub fn fragment_url(base: &str, index: u32) -> String {
    if index == 0 {
        base.to_string()
    } else {
        format!("{base}{index}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_url() {
        let base = "https://discountingcashflows.com/company/AAPL/transcripts/2025/4/";
        assert_eq!(fragment_url(base, 0), base);
        assert_eq!(fragment_url(base, 1), format!("{base}1/"));
        assert_eq!(fragment_url(base, 12), format!("{base}12/"));
    }

    #[test]
    fn test_with_trailing_slash() {
        assert_eq!(with_trailing_slash("https://x.test/a"), "https://x.test/a/");
        assert_eq!(with_trailing_slash("https://x.test/a/"), "https://x.test/a/");
    }

    #[test]
    fn test_not_found_template() {
        assert!(is_not_found_template(
            "<h1>404</h1><p>Page Not Found</p>"
        ));
        // Both tokens must co-occur
        assert!(!is_not_found_template("<p>Page Not Found</p>"));
        assert!(!is_not_found_template("<p>Error 404</p>"));
        assert!(!is_not_found_template("<p>Operator: welcome to the call.</p>"));
    }
}
