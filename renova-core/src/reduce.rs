//! Reduction of the raw calendar feed into one upcoming date per fraction.

use chrono::{NaiveDate, NaiveDateTime, ParseError as ChronoParseError};

use crate::model::{CalendarEntry, FractionId, ReducedCalendar};

/// How dates before the reference day are treated during reduction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReducePolicy {
    /// Discard dates strictly before the reference day before taking the
    /// minimum. A date on the reference day itself is kept.
    #[default]
    FutureOnly,
    /// Keep the minimum regardless of whether it already passed. Callers see
    /// past dates as a negative day count, not an error.
    IncludePast,
}

#[derive(thiserror::Error, Debug)]
#[error("malformed pickup date {raw:?} for fraction {fraction_id}: {source}")]
/// An unparsable date string in the feed.
///
/// The whole reduction call is void when this is returned; nothing is
/// silently dropped and the caller keeps its previous state.
pub struct MalformedDateError {
    /// The offending date string as received.
    pub raw: String,
    /// Fraction the bad entry belongs to.
    pub fraction_id: FractionId,
    /// Underlying chrono failure.
    #[source]
    pub source: ChronoParseError,
}

/// Fold calendar entries into the earliest date per fraction.
///
/// Duplicate entries for the same fraction merge; the minimum is taken over
/// every date supplied for that fraction across the whole input. Fractions
/// with no surviving dates are omitted from the result. Re-running with the
/// same input and reference day yields an identical map.
///
/// # Errors
///
/// Returns [`MalformedDateError`] on the first date string chrono cannot
/// parse.
pub fn reduce(
    entries: &[CalendarEntry],
    reference_day: NaiveDate,
    policy: ReducePolicy,
) -> Result<ReducedCalendar, MalformedDateError> {
    let mut reduced = ReducedCalendar::new();

    for entry in entries {
        for raw in &entry.pickup_dates {
            let date = parse_pickup_date(raw).map_err(|source| MalformedDateError {
                raw: raw.clone(),
                fraction_id: entry.fraction_id,
                source,
            })?;

            if policy == ReducePolicy::FutureOnly && date < reference_day {
                continue;
            }

            reduced
                .entry(entry.fraction_id)
                .and_modify(|current| {
                    if date < *current {
                        *current = date;
                    }
                })
                .or_insert(date);
        }
    }

    Ok(reduced)
}

/// Parse a feed date: the upstream `YYYY-MM-DDTHH:MM:SS` timestamp or a bare
/// `YYYY-MM-DD`. The time portion, when present, is dropped; all calendar
/// math downstream operates on whole days.
fn parse_pickup_date(raw: &str) -> Result<NaiveDate, ChronoParseError> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map(|timestamp| timestamp.date())
        .or_else(|_timestamp_err| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(fraction_id: i64, dates: &[&str]) -> CalendarEntry {
        CalendarEntry {
            fraction_id: FractionId(fraction_id),
            pickup_dates: dates.iter().map(|&raw| raw.to_owned()).collect(),
        }
    }

    fn day(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn keeps_minimum_date_regardless_of_input_order() {
        let entries = vec![entry(1, &["2025-08-13T00:00:00", "2025-07-28T00:00:00"])];
        let reduced = reduce(&entries, day("2025-07-20"), ReducePolicy::FutureOnly).unwrap();

        assert_eq!(reduced.get(&FractionId(1)), Some(&day("2025-07-28")));
    }

    #[test]
    fn merges_duplicate_entries_for_one_fraction() {
        let entries = vec![
            entry(1, &["2025-08-13T00:00:00"]),
            entry(1, &["2025-07-28T00:00:00"]),
        ];
        let reduced = reduce(&entries, day("2025-07-20"), ReducePolicy::FutureOnly).unwrap();

        assert_eq!(reduced.get(&FractionId(1)), Some(&day("2025-07-28")));
        assert_eq!(reduced.len(), 1, "duplicate fraction ids must merge");
    }

    #[test]
    fn future_only_discards_past_dates() {
        let entries = vec![entry(1, &["2025-07-10T00:00:00", "2025-07-28T00:00:00"])];
        let reduced = reduce(&entries, day("2025-07-20"), ReducePolicy::FutureOnly).unwrap();

        assert_eq!(reduced.get(&FractionId(1)), Some(&day("2025-07-28")));
    }

    #[test]
    fn future_only_keeps_the_reference_day_itself() {
        let entries = vec![entry(1, &["2025-07-20T00:00:00"])];
        let reduced = reduce(&entries, day("2025-07-20"), ReducePolicy::FutureOnly).unwrap();

        assert_eq!(reduced.get(&FractionId(1)), Some(&day("2025-07-20")));
    }

    #[test]
    fn fraction_with_only_past_dates_is_absent() {
        let entries = vec![
            entry(1, &["2025-07-10T00:00:00"]),
            entry(2, &["2025-07-28T00:00:00"]),
        ];
        let reduced = reduce(&entries, day("2025-07-20"), ReducePolicy::FutureOnly).unwrap();

        assert!(!reduced.contains_key(&FractionId(1)), "all-past fraction must be omitted");
        assert!(reduced.contains_key(&FractionId(2)), "future fraction must survive");
    }

    #[test]
    fn include_past_keeps_the_overall_minimum() {
        let entries = vec![entry(1, &["2025-07-10T00:00:00", "2025-07-28T00:00:00"])];
        let reduced = reduce(&entries, day("2025-07-20"), ReducePolicy::IncludePast).unwrap();

        assert_eq!(reduced.get(&FractionId(1)), Some(&day("2025-07-10")));
    }

    #[test]
    fn empty_date_list_is_not_an_error() {
        let entries = vec![entry(1, &[])];
        let reduced = reduce(&entries, day("2025-07-20"), ReducePolicy::FutureOnly).unwrap();

        assert!(reduced.is_empty());
    }

    #[test]
    fn malformed_date_voids_the_whole_call() {
        let entries = vec![
            entry(1, &["2025-07-28T00:00:00"]),
            entry(2, &["not-a-date"]),
        ];
        let err = reduce(&entries, day("2025-07-20"), ReducePolicy::FutureOnly).unwrap_err();

        assert_eq!(err.fraction_id, FractionId(2));
        assert_eq!(err.raw, "not-a-date");
    }

    #[test]
    fn accepts_bare_dates_without_time() {
        let entries = vec![entry(1, &["2025-07-28"])];
        let reduced = reduce(&entries, day("2025-07-20"), ReducePolicy::FutureOnly).unwrap();

        assert_eq!(reduced.get(&FractionId(1)), Some(&day("2025-07-28")));
    }

    #[test]
    fn reduction_is_idempotent() {
        let entries = vec![
            entry(1, &["2025-07-28T00:00:00", "2025-08-13T00:00:00"]),
            entry(3, &["2025-07-27T00:00:00"]),
        ];
        let reference = day("2025-07-20");

        let first = reduce(&entries, reference, ReducePolicy::FutureOnly).unwrap();
        let second = reduce(&entries, reference, ReducePolicy::FutureOnly).unwrap();

        assert_eq!(first, second);
    }
}
