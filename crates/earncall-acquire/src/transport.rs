use crate::error::ScrapeError;

/// Outcome of resolving one fragment index. Absence is an expected
/// condition, kept apart from the error channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentStatus {
    /// The fragment exists; its raw body.
    Content(String),
    /// No fragment at this index: 404, empty body, or the site's
    /// not-found template served with a success status.
    Absent,
}

/// Resolves a fragment index against a document's base address.
///
/// The assembler and retry controller are written against this seam so
/// the transport can be swapped (live HTTP, scripted fixtures) without
/// touching assembly or retry logic. Index 0 is the unnumbered base
/// fragment at the document URL itself; indices 1+ are the `/1/`, `/2/`
/// pages. Implementations perform exactly one request and never retry;
/// retrying is the batch controller's job.
#[allow(async_fn_in_trait)]
pub trait FragmentTransport {
    async fn fetch_fragment(
        &self,
        base_url: &str,
        index: u32,
    ) -> Result<FragmentStatus, ScrapeError>;
}
