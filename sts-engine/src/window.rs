use sts_core::models::{DAYS, Series};
use time::{Date, OffsetDateTime, UtcOffset};

/// Where a product's raw series lands inside the trailing window.
///
/// A product last updated `k` days ago contributes its first `DAYS - k` raw
/// entries, shifted right by `k` slots so that slot 0 still means today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    /// How many leading raw entries are still inside the window
    pub elements_to_take: usize,
    /// How many slots at the start of the window have no data
    pub leading_gap: usize,
}

impl DayWindow {
    /// Resolve the window of a product anchored at `last_update`.
    ///
    /// Both sides are truncated to their UTC calendar day. An anchor in the
    /// future is treated as today.
    pub fn resolve(last_update: OffsetDateTime, today: Date) -> Self {
        let anchor = last_update.to_offset(UtcOffset::UTC).date();
        let days_diff = (today - anchor).whole_days().max(0);
        let elements_to_take = usize::try_from(days_diff)
            .map(|days| DAYS.saturating_sub(days))
            .unwrap_or(0);
        Self {
            elements_to_take,
            leading_gap: DAYS - elements_to_take,
        }
    }

    /// True when the product is too old to contribute anything.
    pub fn is_empty(&self) -> bool {
        self.elements_to_take == 0
    }

    /// Lay a raw series (most recent first) out over the window.
    ///
    /// Entries past the end of `raw` and explicit nulls are days without
    /// data.
    pub fn pad(&self, raw: &[Option<f64>]) -> Series {
        Series::from_fn(|slot| {
            slot.checked_sub(self.leading_gap)
                .and_then(|index| raw.get(index).copied().flatten())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn test_fresh() {
        let window = DayWindow::resolve(datetime!(2024-05-10 18:30 UTC), date!(2024-05-10));
        assert_eq!(window.elements_to_take, DAYS);
        assert_eq!(window.leading_gap, 0);
    }

    #[test]
    fn test_stale() {
        let window = DayWindow::resolve(datetime!(2024-05-01 0:00 UTC), date!(2024-05-10));
        assert_eq!(window.elements_to_take, 21);
        assert_eq!(window.leading_gap, 9);

        let window = DayWindow::resolve(datetime!(2024-04-10 23:59 UTC), date!(2024-05-10));
        assert!(window.is_empty());
        assert_eq!(window.leading_gap, DAYS);
    }

    #[test]
    fn test_future_anchor() {
        let window = DayWindow::resolve(datetime!(2024-06-01 0:00 UTC), date!(2024-05-10));
        assert_eq!(window.elements_to_take, DAYS);
        assert_eq!(window.leading_gap, 0);
    }

    #[test]
    fn test_anchor_uses_utc_day() {
        // 2024-05-10 01:00 at +03:00 is still 2024-05-09 in UTC
        let window = DayWindow::resolve(datetime!(2024-05-10 1:00 +3), date!(2024-05-10));
        assert_eq!(window.leading_gap, 1);
    }

    #[test]
    fn test_pad() {
        let window = DayWindow {
            elements_to_take: 27,
            leading_gap: 3,
        };
        let series = window.pad(&[Some(1.0), None, Some(3.0)]);
        assert_eq!(series.0[0..3], [None, None, None]);
        assert_eq!(series[3], Some(1.0));
        assert_eq!(series[4], None);
        assert_eq!(series[5], Some(3.0));
        assert!(series.0[6..].iter().all(Option::is_none));
    }

    #[test]
    fn test_pad_drops_entries_outside_window() {
        let raw = vec![Some(1.0); 40];
        let window = DayWindow {
            elements_to_take: 25,
            leading_gap: 5,
        };
        assert_eq!(window.pad(&raw).defined_count(), 25);
    }
}
