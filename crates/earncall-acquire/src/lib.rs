pub mod assemble;
pub mod error;
pub mod fetch;
pub mod normalize;
pub mod ratelimit;
pub mod transport;

pub use error::ScrapeError;
pub use fetch::HttpTransport;
pub use transport::{FragmentStatus, FragmentTransport};

use earncall_model::{FetchTarget, ScrapeConfig};

/// Fetch one transcript end to end: assemble the document's fragments and
/// normalize the markup to plain text.
///
/// This is the single network pass a unit of work performs; both the text
/// and CSV outputs derive from the returned string.
pub async fn fetch_transcript_text<T: FragmentTransport>(
    transport: &T,
    target: &FetchTarget,
    config: &ScrapeConfig,
) -> Result<String, ScrapeError> {
    let url = target.document_url();
    tracing::info!(url = %url, "Fetching transcript fragments");
    let html = assemble::assemble_document(transport, &url, config).await?;
    tracing::debug!(bytes = html.len(), "Assembled raw document");
    Ok(normalize::transcript_text(&html))
}
