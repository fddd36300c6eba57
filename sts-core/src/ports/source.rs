use crate::models::RawProductRecord;

/// Interface for the feed that delivers the flat product list.
///
/// Rows are returned unvalidated: rejecting individual malformed rows is the
/// job of the ingestion step, so a source only fails when the payload as a
/// whole cannot be obtained.
pub trait ProductSource: Send + Sync {
    /// Error type for transport or decoding failures
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the complete product list.
    fn fetch(&self) -> impl Future<Output = Result<Vec<RawProductRecord>, Self::Error>> + Send;
}
