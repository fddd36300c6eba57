use crate::models::{Metric, NodeMap, is_same_utc_day};
use time::OffsetDateTime;

/// Repository interface for built trees.
///
/// A tree is stored per metric together with the moment it was built. Trees
/// are read back verbatim until they go stale, i.e. until the UTC calendar
/// day of their build timestamp is no longer today.
///
/// Callers treat every failure of this trait as non-fatal: a failed read is
/// a cache miss and a failed write only means the tree is not persisted.
pub trait CacheRepository: Send + Sync {
    /// Error type for storage failures
    type Error: std::error::Error + Send + Sync + 'static;

    /// Retrieve the tree last stored for `metric`, if any.
    fn get(
        &self,
        metric: Metric,
    ) -> impl Future<Output = Result<Option<NodeMap>, Self::Error>> + Send;

    /// Retrieve when the tree for `metric` was built, if one is stored.
    fn get_timestamp(
        &self,
        metric: Metric,
    ) -> impl Future<Output = Result<Option<OffsetDateTime>, Self::Error>> + Send;

    /// Store the tree for `metric`, replacing any previous one.
    fn put(
        &self,
        metric: Metric,
        tree: &NodeMap,
        timestamp: OffsetDateTime,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Whether a tree built today (relative to `now`) is stored for `metric`.
    fn is_fresh(
        &self,
        metric: Metric,
        now: OffsetDateTime,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send {
        async move {
            Ok(self
                .get_timestamp(metric)
                .await?
                .is_some_and(|built| is_same_utc_day(built, now)))
        }
    }

    /// Retrieve the tree for `metric` only if it is fresh relative to `now`.
    ///
    /// # Returns
    ///
    /// - Ok(Some(tree)) if a tree built today is stored
    /// - Ok(None) if nothing is stored or the stored tree is stale
    /// - Err otherwise
    fn get_fresh(
        &self,
        metric: Metric,
        now: OffsetDateTime,
    ) -> impl Future<Output = Result<Option<NodeMap>, Self::Error>> + Send {
        async move {
            if self.is_fresh(metric, now).await? {
                self.get(metric).await
            } else {
                Ok(None)
            }
        }
    }
}
