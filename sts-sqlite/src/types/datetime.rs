use std::fmt::Display;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset, format_description::well_known::Rfc3339};

/// A UTC timestamp as stored in the `built_at` column.
///
/// SQLite has no timezone-aware type, so the instant is normalised to UTC
/// before it is written and read back as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, sqlx::Type)]
#[sqlx(transparent)]
pub struct DateTime(PrimitiveDateTime);

impl Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = OffsetDateTime::from(*self)
            .format(&Rfc3339)
            .map_err(|_| std::fmt::Error)?;
        f.write_str(&value)
    }
}

impl From<OffsetDateTime> for DateTime {
    fn from(value: OffsetDateTime) -> Self {
        let utc = value.to_offset(UtcOffset::UTC);
        Self(PrimitiveDateTime::new(utc.date(), utc.time()))
    }
}

impl From<DateTime> for OffsetDateTime {
    fn from(value: DateTime) -> Self {
        value.0.assume_utc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_normalises_to_utc() {
        let stored = DateTime::from(datetime!(2024-05-02 1:30 +2));
        assert_eq!(
            OffsetDateTime::from(stored),
            datetime!(2024-05-01 23:30 UTC)
        );
        assert_eq!(stored.to_string(), "2024-05-01T23:30:00Z");
    }
}
