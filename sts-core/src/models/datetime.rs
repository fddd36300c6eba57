use time::{
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset, format_description::well_known::Rfc3339,
    macros::format_description,
};

/// Parse an ISO-8601 timestamp as sent by the product feed.
///
/// Full RFC3339 timestamps are preferred. Bare dates (`2024-05-01`) and
/// timestamps without an offset are accepted as well and read as UTC.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
    let value = value.trim();
    match OffsetDateTime::parse(value, &Rfc3339) {
        Ok(timestamp) => Ok(timestamp),
        Err(error) => {
            if let Ok(date) = Date::parse(value, format_description!("[year]-[month]-[day]")) {
                Ok(date.midnight().assume_utc())
            } else if let Ok(datetime) = PrimitiveDateTime::parse(
                value,
                format_description!(
                    "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
                ),
            ) {
                Ok(datetime.assume_utc())
            } else {
                Err(error)
            }
        }
    }
}

/// Whether two instants fall on the same UTC calendar day.
///
/// This is the only freshness rule for cached trees: a tree built on a given
/// UTC day is served until the day rolls over.
pub fn is_same_utc_day(a: OffsetDateTime, b: OffsetDateTime) -> bool {
    a.to_offset(UtcOffset::UTC).date() == b.to_offset(UtcOffset::UTC).date()
}
