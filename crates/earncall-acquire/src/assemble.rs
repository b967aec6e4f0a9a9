use crate::error::ScrapeError;
use crate::transport::{FragmentStatus, FragmentTransport};
use earncall_model::{Fragment, ScrapeConfig};

/// Fetch and reassemble one document's fragments in index order.
///
/// The base fragment (index 0) is attempted first, then numbered indices
/// 1..=`max_parts`. Once anything has been collected, the first absent
/// numbered index marks the end of the document. While nothing has been
/// collected, absent numbered indices are skipped: some documents have
/// an empty base fragment and start at a later index. Any scrape error
/// aborts assembly immediately.
///
/// Returns the fragment bodies joined with line breaks, or
/// `ScrapeError::NoContent` if the scan produced nothing at all.
pub async fn assemble_document<T: FragmentTransport>(
    transport: &T,
    base_url: &str,
    config: &ScrapeConfig,
) -> Result<String, ScrapeError> {
    let mut fragments: Vec<Fragment> = Vec::new();

    match transport.fetch_fragment(base_url, 0).await? {
        FragmentStatus::Content(body) => {
            tracing::debug!(index = 0, bytes = body.len(), "Collected base fragment");
            fragments.push(Fragment { index: 0, body });
        }
        FragmentStatus::Absent => {
            tracing::debug!("Base fragment absent; scanning numbered fragments");
        }
    }

    for index in 1..=config.max_parts {
        match transport.fetch_fragment(base_url, index).await? {
            FragmentStatus::Content(body) => {
                tracing::debug!(index, bytes = body.len(), "Collected fragment");
                fragments.push(Fragment { index, body });
                if !config.fragment_delay.is_zero() {
                    tokio::time::sleep(config.fragment_delay).await;
                }
            }
            FragmentStatus::Absent => {
                if fragments.is_empty() {
                    // Nothing collected yet; the document may start later.
                    continue;
                }
                break;
            }
        }
    }

    if fragments.is_empty() {
        return Err(ScrapeError::NoContent {
            url: base_url.to_string(),
        });
    }

    tracing::info!(fragments = fragments.len(), "Assembled document");
    Ok(fragments
        .iter()
        .map(|f| f.body.as_str())
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Transport scripted with one body per index; anything past the end
    /// of the script is absent. Records the highest index requested.
    struct ScriptedTransport {
        bodies: Vec<Option<&'static str>>,
        highest_index: AtomicU32,
    }

    impl ScriptedTransport {
        fn new(bodies: Vec<Option<&'static str>>) -> Self {
            Self {
                bodies,
                highest_index: AtomicU32::new(0),
            }
        }
    }

    impl FragmentTransport for ScriptedTransport {
        async fn fetch_fragment(
            &self,
            _base_url: &str,
            index: u32,
        ) -> Result<FragmentStatus, ScrapeError> {
            self.highest_index.fetch_max(index, Ordering::SeqCst);
            Ok(match self.bodies.get(index as usize) {
                Some(Some(body)) => FragmentStatus::Content(body.to_string()),
                _ => FragmentStatus::Absent,
            })
        }
    }

    struct FailingTransport;

    impl FragmentTransport for FailingTransport {
        async fn fetch_fragment(
            &self,
            base_url: &str,
            index: u32,
        ) -> Result<FragmentStatus, ScrapeError> {
            if index == 0 {
                Ok(FragmentStatus::Content("base".to_string()))
            } else {
                Err(ScrapeError::Http {
                    status: 500,
                    url: base_url.to_string(),
                })
            }
        }
    }

    const URL: &str = "https://example.test/company/AAPL/transcripts/2025/4/";

    #[tokio::test]
    async fn joins_fragments_in_order_and_stops_at_first_gap() {
        let transport = ScriptedTransport::new(vec![
            Some("part zero"),
            Some("part one"),
            Some("part two"),
        ]);
        let html = assemble_document(&transport, URL, &ScrapeConfig::default())
            .await
            .unwrap();
        assert_eq!(html, "part zero\npart one\npart two");
        // Index 3 came back absent and ended the scan.
        assert_eq!(transport.highest_index.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn missing_base_fragment_does_not_end_the_scan() {
        let transport = ScriptedTransport::new(vec![None, Some("part one"), Some("part two")]);
        let html = assemble_document(&transport, URL, &ScrapeConfig::default())
            .await
            .unwrap();
        assert_eq!(html, "part one\npart two");
    }

    #[tokio::test]
    async fn zero_fragments_is_a_no_content_error() {
        let transport = ScriptedTransport::new(vec![]);
        let config = ScrapeConfig {
            max_parts: 5,
            ..ScrapeConfig::default()
        };
        let err = assemble_document(&transport, URL, &config)
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::NoContent { .. }));
        // The empty-base skip rule means the full range was scanned.
        assert_eq!(transport.highest_index.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn transport_error_aborts_assembly() {
        let err = assemble_document(&FailingTransport, URL, &ScrapeConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Http { status: 500, .. }));
    }
}
