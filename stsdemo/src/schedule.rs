//! Periodic refresh of the product feed.
//!
//! Cached trees go stale when the UTC day rolls over, so the natural cadence
//! is daily, shortly after midnight. The scheduler aligns its ticks to a
//! configured anchor so restarts do not shift the refresh time.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::OffsetDateTime;
use tracing::{Instrument as _, Level, event, span};

/// When to start refreshing and how often to repeat.
///
/// Without `every` no refresh is scheduled and the feed is only read at
/// startup.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Scheduler {
    /// An RFC3339 timestamp to align the schedule to (defaults to now)
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub from: Option<OffsetDateTime>,
    /// How often to refresh
    #[serde(default, with = "humantime_serde::option")]
    pub every: Option<Duration>,
}

impl Scheduler {
    /// The first tick at or after `now`.
    ///
    /// An anchor in the past is moved forward by whole intervals.
    pub fn next_anchor(&self, now: OffsetDateTime) -> Option<OffsetDateTime> {
        let delta = self.every.filter(|delta| !delta.is_zero())?;
        let Some(mut from) = self.from else {
            return Some(now);
        };
        if from < now {
            let steps = ((now - from) / delta).ceil() as u32;
            from += delta * steps;
        }
        Some(from)
    }

    /// Run `f` at every tick of the schedule.
    ///
    /// Returns immediately with `Ok(())` when no interval is configured, and
    /// stops at the first error `f` returns.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use stsdemo::Scheduler;
    ///
    /// # fn main() -> Result<(), String> {
    /// let scheduler = Scheduler {
    ///     from: None,
    ///     every: Some(Duration::from_secs(86_400)),
    /// };
    ///
    /// # tokio_test::block_on(async {
    /// scheduler.schedule(async |tick| {
    ///     println!("refreshing at {tick}");
    ///     Ok::<(), String>(())
    /// }).await?;
    /// # Ok(())
    /// # })
    /// # }
    /// ```
    pub async fn schedule<T, E>(
        &self,
        f: impl AsyncFn(OffsetDateTime) -> Result<T, E>,
    ) -> Result<(), E> {
        let now = OffsetDateTime::now_utc();
        let (Some(delta), Some(mut anchor)) = (self.every, self.next_anchor(now)) else {
            return Ok(());
        };

        // a negative wait only happens if the clock moved; fire right away
        let wait = Duration::try_from(anchor - now).unwrap_or_default();
        tokio::time::sleep(wait).await;

        let mut interval = tokio::time::interval(delta);
        loop {
            interval.tick().await;

            let span = span!(Level::INFO, "scheduled refresh");
            async {
                event!(Level::INFO, tick = %anchor, "refreshing product feed");
                f(anchor).await
            }
            .instrument(span)
            .await?;

            anchor += delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const DAY: Duration = Duration::from_secs(86_400);

    #[test]
    fn test_disabled() {
        let scheduler = Scheduler::default();
        assert_eq!(scheduler.next_anchor(datetime!(2024-05-31 12:00 UTC)), None);
    }

    #[test]
    fn test_anchor_moves_forward() {
        let scheduler = Scheduler {
            from: Some(datetime!(2024-01-01 0:05 UTC)),
            every: Some(DAY),
        };
        assert_eq!(
            scheduler.next_anchor(datetime!(2024-05-31 12:00 UTC)),
            Some(datetime!(2024-06-01 0:05 UTC))
        );
    }

    #[test]
    fn test_future_anchor_kept() {
        let scheduler = Scheduler {
            from: Some(datetime!(2024-06-03 0:05 UTC)),
            every: Some(DAY),
        };
        assert_eq!(
            scheduler.next_anchor(datetime!(2024-05-31 12:00 UTC)),
            Some(datetime!(2024-06-03 0:05 UTC))
        );
    }

    #[test]
    fn test_defaults_to_now() {
        let scheduler = Scheduler {
            from: None,
            every: Some(DAY),
        };
        let now = datetime!(2024-05-31 12:00 UTC);
        assert_eq!(scheduler.next_anchor(now), Some(now));
    }

    #[tokio::test]
    async fn test_schedule_stops_on_error() {
        let scheduler = Scheduler {
            from: None,
            every: Some(Duration::from_millis(5)),
        };
        let calls = std::sync::atomic::AtomicUsize::new(0);
        let result = scheduler
            .schedule(async |_| {
                let n = calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                if n == 2 { Err("done") } else { Ok(()) }
            })
            .await;
        assert_eq!(result, Err("done"));
        assert_eq!(calls.into_inner(), 3);
    }
}
