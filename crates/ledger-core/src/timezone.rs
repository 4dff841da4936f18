//! # Business Timezone Conversion
//!
//! Calendar dates in queries ("movements from 2019-02-01 to 2019-03-01")
//! are expressed in the business timezone, America/Sao_Paulo. Timestamps in
//! the store are UTC instants.
//!
//! The conversion resolves the zone's UTC offset **at the instant being
//! converted**, never from a static offset table: São Paulo observed
//! daylight saving until 2019, so historical dates sit on either side of
//! transitions where the offset is -02 or -03.
//!
//! Date filters are half-open `[from, to)`: a query for `[2019-02-01,
//! 2019-03-01)` covers all of February, local time.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::America::Sao_Paulo;
use chrono_tz::Tz;

/// The fixed business timezone for all salons.
pub const BUSINESS_TZ: Tz = Sao_Paulo;

/// Converts a business-timezone calendar date to the UTC instant at which
/// that local day starts.
///
/// DST edge handling:
/// - If local midnight does not exist (spring-forward skipped it, as on
///   2018-11-04 in São Paulo), the first valid local time after the gap is
///   used.
/// - An ambiguous local time resolves to the earlier instant. São Paulo's
///   fall-back repeated 23:00 of the previous day, never midnight, so this
///   branch is unreachable for day starts there; it guards zones whose
///   transition crosses midnight.
pub fn start_of_day_utc(date: NaiveDate) -> DateTime<Utc> {
    let mut naive = date.and_time(NaiveTime::MIN);

    // Walk forward in one-hour steps across a spring-forward gap. São Paulo
    // gaps are exactly one hour, the bound guards against a broken tzdb.
    for _ in 0..4 {
        match BUSINESS_TZ.from_local_datetime(&naive) {
            chrono::LocalResult::Single(dt) => return dt.with_timezone(&Utc),
            chrono::LocalResult::Ambiguous(earliest, _) => return earliest.with_timezone(&Utc),
            chrono::LocalResult::None => naive += Duration::hours(1),
        }
    }

    // Unreachable with a sane tzdb; fall back to interpreting the naive
    // time as UTC rather than failing a read query.
    Utc.from_utc_datetime(&naive)
}

/// Converts an optional half-open calendar-date range `[from, to)` into
/// optional UTC bounds for SQL predicates (`>= from_utc`, `< to_utc`).
pub fn date_range_utc(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    (from.map(start_of_day_utc), to.map(start_of_day_utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_standard_offset() {
        // After DST was abolished São Paulo is fixed at -03.
        let start = start_of_day_utc(date(2024, 1, 15));
        assert_eq!(start.to_rfc3339(), "2024-01-15T03:00:00+00:00");
    }

    #[test]
    fn test_spring_forward_gap() {
        // DST started 2018-11-04: local midnight was skipped, the day began
        // at 01:00 -02, which is 03:00 UTC.
        let start = start_of_day_utc(date(2018, 11, 4));
        assert_eq!(start.to_rfc3339(), "2018-11-04T03:00:00+00:00");
    }

    #[test]
    fn test_fall_back_day_start() {
        // DST ended overnight into 2019-02-17: clocks jumped from 00:00
        // back to 23:00 on the 16th, so midnight on the 17th occurs once,
        // already at the -03 standard offset.
        let start = start_of_day_utc(date(2019, 2, 17));
        assert_eq!(start.to_rfc3339(), "2019-02-17T03:00:00+00:00");
    }

    #[test]
    fn test_half_open_range() {
        let (from, to) = date_range_utc(Some(date(2024, 3, 1)), Some(date(2024, 4, 1)));
        let from = from.unwrap();
        let to = to.unwrap();
        assert!(from < to);
        // 31 days of March, no DST in 2024
        assert_eq!((to - from).num_days(), 31);
    }

    #[test]
    fn test_open_ended_range() {
        let (from, to) = date_range_utc(None, Some(date(2024, 4, 1)));
        assert!(from.is_none());
        assert!(to.is_some());
    }
}
