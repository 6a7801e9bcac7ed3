//! Interpreting a single upstream record.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use tracing::debug;

use crate::mbta::Candidate;

const NANOS_PER_MINUTE: i64 = 60 * 1_000_000_000;

/// Formats tried for offset-bearing timestamps that are not strict RFC 3339.
/// `%.f` also matches no fractional part.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%d %H:%M%z",
];

/// Formats tried for timestamps that carry no offset.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A record with a concrete time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCandidate {
    pub time: DateTime<FixedOffset>,
    pub trip_id: Option<String>,
}

/// Resolve a record's time and trip id.
///
/// Returns `None` for records with no usable time; callers drop those.
pub fn resolve(candidate: &Candidate) -> Option<ResolvedCandidate> {
    let time = resolve_timestamp(candidate)?;
    Some(ResolvedCandidate {
        time,
        trip_id: trip_id(candidate),
    })
}

/// The time a bus is at the stop: arrival time, else departure time.
///
/// Null, missing and empty fields are skipped. A chosen value that cannot
/// be parsed makes the record unusable.
///
/// # Examples
///
/// ```
/// use bus_board::mbta::Candidate;
/// use bus_board::selection::resolve_timestamp;
///
/// let c = Candidate::new(None, Some("2026-02-13T12:45:00-05:00"), None);
/// assert_eq!(resolve_timestamp(&c).unwrap().to_rfc3339(), "2026-02-13T12:45:00-05:00");
///
/// assert!(resolve_timestamp(&Candidate::new(None, None, None)).is_none());
/// ```
pub fn resolve_timestamp(candidate: &Candidate) -> Option<DateTime<FixedOffset>> {
    let attrs = candidate.attributes.as_ref()?;
    let raw = non_empty(&attrs.arrival_time).or_else(|| non_empty(&attrs.departure_time))?;
    let parsed = parse_timestamp(raw);
    if parsed.is_none() {
        debug!(raw, "dropping record with unparseable time");
    }
    parsed
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Parse an ISO 8601 date-time. Seconds are optional, the offset may be
/// `Z`, `+hh:mm` or `+hhmm`, and timestamps without an offset are UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts);
    }

    let zulu;
    let raw = match raw.strip_suffix(['Z', 'z']) {
        Some(local) => {
            zulu = format!("{local}+00:00");
            zulu.as_str()
        }
        None => raw,
    };

    if let Some(ts) = OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(raw, format).ok())
    {
        return Some(ts);
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Whole minutes from `as_of` until `time`, rounded down.
///
/// Negative when `time` is in the past: 30 seconds ago is -1.
pub fn compute_minutes(time: DateTime<FixedOffset>, as_of: DateTime<Utc>) -> i64 {
    let delta = time.signed_duration_since(as_of);
    match delta.num_nanoseconds() {
        Some(nanos) => nanos.div_euclid(NANOS_PER_MINUTE),
        // Only for deltas of centuries.
        None => delta.num_minutes(),
    }
}

/// Trip id from `relationships.trip.data.id`, if the structure is there.
pub fn trip_id(candidate: &Candidate) -> Option<String> {
    candidate
        .relationships
        .as_ref()?
        .pointer("/trip/data/id")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mbta::CandidateAttributes;
    use chrono::{Duration, TimeZone, Timelike};

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 13, 12, 34, 56).unwrap()
    }

    fn at(offset: Duration) -> DateTime<FixedOffset> {
        (as_of() + offset).fixed_offset()
    }

    #[test]
    fn uses_arrival_time() {
        let c = Candidate::new(Some("2026-02-13T12:41:00-05:00"), None, None);
        assert_eq!(resolve_timestamp(&c).unwrap().minute(), 41);
    }

    #[test]
    fn falls_back_to_departure() {
        let c = Candidate::new(None, Some("2026-02-13T12:45:00-05:00"), None);
        assert_eq!(resolve_timestamp(&c).unwrap().minute(), 45);
    }

    #[test]
    fn prefers_arrival_over_departure() {
        let c = Candidate::new(
            Some("2026-02-13T12:41:00-05:00"),
            Some("2026-02-13T12:42:00-05:00"),
            None,
        );
        assert_eq!(resolve_timestamp(&c).unwrap().minute(), 41);
    }

    #[test]
    fn empty_arrival_falls_back() {
        let c = Candidate::new(Some(""), Some("2026-02-13T12:42:00Z"), None);
        assert_eq!(resolve_timestamp(&c).unwrap().minute(), 42);
    }

    #[test]
    fn none_when_both_missing() {
        assert!(resolve_timestamp(&Candidate::new(None, None, None)).is_none());
        assert!(resolve_timestamp(&Candidate::default()).is_none());

        let empty_attrs = Candidate {
            attributes: Some(CandidateAttributes::default()),
            relationships: None,
        };
        assert!(resolve_timestamp(&empty_attrs).is_none());
    }

    #[test]
    fn unparseable_time_is_unusable() {
        let c = Candidate::new(Some("soon"), None, None);
        assert!(resolve_timestamp(&c).is_none());
        assert!(resolve(&c).is_none());
    }

    #[test]
    fn keeps_upstream_offset() {
        let ts = parse_timestamp("2026-02-13T07:41:00-05:00").unwrap();
        assert_eq!(ts.offset().local_minus_utc(), -5 * 3600);
        assert_eq!(ts.with_timezone(&Utc).hour(), 12);
    }

    #[test]
    fn naive_timestamps_are_utc() {
        let ts = parse_timestamp("2026-02-13T12:41:00").unwrap();
        assert_eq!(ts.offset().local_minus_utc(), 0);
        assert_eq!(ts, at(Duration::seconds(364)));

        let spaced = parse_timestamp("2026-02-13 12:41:00.500").unwrap();
        assert_eq!(spaced.nanosecond(), 500_000_000);
    }

    #[test]
    fn naive_without_seconds() {
        let ts = parse_timestamp("2026-02-13T12:41").unwrap();
        assert_eq!(ts.offset().local_minus_utc(), 0);
        assert_eq!(ts, at(Duration::seconds(364)));

        let spaced = parse_timestamp("2026-02-13 12:41").unwrap();
        assert_eq!(spaced, ts);
    }

    #[test]
    fn offset_without_seconds() {
        let ts = parse_timestamp("2026-02-13T12:41-05:00").unwrap();
        assert_eq!(ts.offset().local_minus_utc(), -5 * 3600);
        assert_eq!(ts.with_timezone(&Utc).hour(), 17);
        assert_eq!(ts.second(), 0);

        let compact = parse_timestamp("2026-02-13T12:41-0500").unwrap();
        assert_eq!(compact, ts);
    }

    #[test]
    fn offset_without_colon() {
        let ts = parse_timestamp("2026-02-13T12:41:00+0000").unwrap();
        assert_eq!(ts, at(Duration::seconds(364)));

        let fractional = parse_timestamp("2026-02-13T07:41:00.250-0500").unwrap();
        assert_eq!(fractional.nanosecond(), 250_000_000);
        assert_eq!(fractional.with_timezone(&Utc).hour(), 12);
    }

    #[test]
    fn zulu_without_seconds() {
        let ts = parse_timestamp("2026-02-13T12:41Z").unwrap();
        assert_eq!(ts, at(Duration::seconds(364)));
    }

    #[test]
    fn space_separated_with_offset() {
        let ts = parse_timestamp("2026-02-13 07:41:00-05:00").unwrap();
        assert_eq!(ts.with_timezone(&Utc), as_of() + Duration::seconds(364));
    }

    #[test]
    fn short_forms_resolve_through_candidates() {
        let c = Candidate::new(Some("2026-02-13T12:41-05:00"), None, None);
        assert!(resolve(&c).is_some());
    }

    #[test]
    fn minutes_simple() {
        assert_eq!(compute_minutes(at(Duration::minutes(7)), as_of()), 7);
    }

    #[test]
    fn minutes_floor() {
        let t = at(Duration::minutes(7) + Duration::seconds(45));
        assert_eq!(compute_minutes(t, as_of()), 7);
    }

    #[test]
    fn minutes_zero() {
        assert_eq!(compute_minutes(at(Duration::zero()), as_of()), 0);
        assert_eq!(compute_minutes(at(Duration::seconds(59)), as_of()), 0);
    }

    #[test]
    fn minutes_negative_for_past() {
        assert_eq!(compute_minutes(at(Duration::minutes(-3)), as_of()), -3);
        assert_eq!(compute_minutes(at(Duration::seconds(-30)), as_of()), -1);
        assert_eq!(compute_minutes(at(Duration::milliseconds(-1)), as_of()), -1);
    }

    #[test]
    fn minutes_across_offsets() {
        // 07:41-05:00 is 12:41Z, 6m04s after 12:34:56Z.
        let t = parse_timestamp("2026-02-13T07:41:00-05:00").unwrap();
        assert_eq!(compute_minutes(t, as_of()), 6);
    }

    #[test]
    fn trip_id_extracted() {
        let c = Candidate::new(None, None, Some("trip-9"));
        assert_eq!(trip_id(&c).as_deref(), Some("trip-9"));
    }

    #[test]
    fn trip_id_tolerates_malformed_relationships() {
        let shapes = [
            serde_json::json!("garbage"),
            serde_json::json!({}),
            serde_json::json!({"trip": null}),
            serde_json::json!({"trip": {"data": null}}),
            serde_json::json!({"trip": {"data": {"id": 42}}}),
            serde_json::json!({"trip": []}),
        ];
        for relationships in shapes {
            let c = Candidate {
                attributes: None,
                relationships: Some(relationships),
            };
            assert_eq!(trip_id(&c), None);
        }
        assert_eq!(trip_id(&Candidate::default()), None);
    }
}
