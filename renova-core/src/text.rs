//! Locale-aware formatting of countdowns, pickup dates, and category lists.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Output language for formatted strings.
pub enum Locale {
    /// Norwegian (bokmål).
    #[default]
    #[serde(alias = "nb")]
    No,
    /// English.
    En,
}

/// Keyword table driving formatting and parsing for one locale.
///
/// Parsing walks every table, so countdown strings round-trip regardless of
/// which locale produced them.
struct LocaleTable {
    today: &'static str,
    tomorrow: &'static str,
    day_singular: &'static str,
    day_plural: &'static str,
    until: &'static str,
    conjunction: &'static str,
    weekdays: [&'static str; 7],
    months: [&'static str; 12],
}

const NO_TABLE: LocaleTable = LocaleTable {
    today: "I dag",
    tomorrow: "I morgen",
    day_singular: "dag",
    day_plural: "dager",
    until: "til",
    conjunction: "og",
    weekdays: ["man.", "tir.", "ons.", "tor.", "fre.", "lør.", "søn."],
    months: [
        "jan.", "feb.", "mar.", "apr.", "mai", "jun.", "jul.", "aug.", "sep.", "okt.", "nov.",
        "des.",
    ],
};

const EN_TABLE: LocaleTable = LocaleTable {
    today: "Today",
    tomorrow: "Tomorrow",
    day_singular: "day",
    day_plural: "days",
    until: "until",
    conjunction: "and",
    weekdays: ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
    months: [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ],
};

const ALL_TABLES: [&LocaleTable; 2] = [&NO_TABLE, &EN_TABLE];

impl Locale {
    const fn table(self) -> &'static LocaleTable {
        match self {
            Locale::No => &NO_TABLE,
            Locale::En => &EN_TABLE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Structured decomposition of a countdown string.
pub struct Countdown {
    /// Whole days until the pickup.
    pub days: i64,
    /// Trailing category/fraction phrase, exactly as it appeared.
    pub category_names: String,
}

impl Countdown {
    /// Pickup happens on the reference day itself.
    #[must_use]
    pub const fn is_today(&self) -> bool {
        self.days == 0
    }

    /// Pickup happens the day after the reference day.
    #[must_use]
    pub const fn is_tomorrow(&self) -> bool {
        self.days == 1
    }
}

/// Render a countdown to the next pickup.
///
/// Zero days uses the locale's "today" phrase and one day its "tomorrow"
/// phrase; anything else is the numeric form, e.g. `"2 dager til Restavfall"`.
#[must_use]
pub fn format_countdown(days: i64, category_name: &str, locale: Locale) -> String {
    let table = locale.table();
    match days {
        0 => format!("{}: {category_name}", table.today),
        1 => format!("{}: {category_name}", table.tomorrow),
        _ => format!("{days} {} {} {category_name}", table.day_plural, table.until),
    }
}

/// Parse a countdown string back into its structured form.
///
/// Recognizes the numeric form (singular or plural day word) and the
/// today/tomorrow forms in every known locale; the trailing category phrase
/// is returned unmodified. `None` when the text matches no known shape.
#[must_use]
pub fn parse_countdown(text: &str) -> Option<Countdown> {
    let trimmed = text.trim();

    for table in ALL_TABLES {
        if let Some(names) = strip_phrase(trimmed, table.today) {
            return Some(Countdown {
                days: 0,
                category_names: names.to_owned(),
            });
        }
        if let Some(names) = strip_phrase(trimmed, table.tomorrow) {
            return Some(Countdown {
                days: 1,
                category_names: names.to_owned(),
            });
        }
        if let Some(countdown) = parse_numeric(trimmed, table) {
            return Some(countdown);
        }
    }

    None
}

/// Strip a leading phrase plus its `":"` or whitespace separator,
/// case-insensitively. `None` when the phrase does not lead the text or runs
/// into a word boundary.
fn strip_phrase<'text>(text: &'text str, phrase: &str) -> Option<&'text str> {
    let head = text.get(..phrase.len())?;
    if !head.eq_ignore_ascii_case(phrase) {
        return None;
    }

    let rest = text.get(phrase.len()..)?;
    if rest.is_empty() {
        return Some(rest);
    }
    if !rest.starts_with(':') && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim_start_matches(':').trim_start())
}

/// Parse `"{n} {day-word} {until} {names}"` against one locale table.
fn parse_numeric(text: &str, table: &LocaleTable) -> Option<Countdown> {
    let (number, rest) = text.split_once(char::is_whitespace)?;
    let days: i64 = number.parse().ok()?;

    let (day_word, rest) = rest.trim_start().split_once(char::is_whitespace)?;
    if !day_word.eq_ignore_ascii_case(table.day_singular)
        && !day_word.eq_ignore_ascii_case(table.day_plural)
    {
        return None;
    }

    let (until_word, names) = rest.trim_start().split_once(char::is_whitespace)?;
    if !until_word.eq_ignore_ascii_case(table.until) {
        return None;
    }

    let names = names.trim_start();
    if names.is_empty() {
        return None;
    }

    Some(Countdown {
        days,
        category_names: names.to_owned(),
    })
}

/// Join names with commas and the locale's conjunction before the last item.
///
/// `["A", "B", "C"]` becomes `"A, B og C"` in Norwegian; there is no Oxford
/// comma.
#[must_use]
pub fn join_category_names(names: &[String], locale: Locale) -> String {
    let conjunction = locale.table().conjunction;
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [head @ .., last] => format!("{} {conjunction} {last}", head.join(", ")),
    }
}

/// Short date line for a category capability, e.g. `"man. 28. jul."`.
#[must_use]
pub fn format_pickup_date(date: NaiveDate, locale: Locale) -> String {
    let table = locale.table();
    let weekday = table
        .weekdays
        .get(date.weekday().num_days_from_monday() as usize)
        .copied()
        .unwrap_or_default();
    let month = table
        .months
        .get(date.month0() as usize)
        .copied()
        .unwrap_or_default();

    match locale {
        Locale::No => format!("{weekday} {}. {month}", date.day()),
        Locale::En => format!("{weekday} {} {month}", date.day()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_round_trips_in_norwegian() {
        let text = format_countdown(5, "Restavfall", Locale::No);
        assert_eq!(text, "5 dager til Restavfall");

        let parsed = parse_countdown(&text).unwrap();
        assert_eq!(parsed.days, 5);
        assert_eq!(parsed.category_names, "Restavfall");
    }

    #[test]
    fn countdown_round_trips_in_english() {
        let text = format_countdown(12, "General waste", Locale::En);
        assert_eq!(text, "12 days until General waste");

        let parsed = parse_countdown(&text).unwrap();
        assert_eq!(parsed.days, 12);
        assert_eq!(parsed.category_names, "General waste");
    }

    #[test]
    fn today_and_tomorrow_use_fixed_phrases() {
        assert_eq!(format_countdown(0, "Restavfall", Locale::No), "I dag: Restavfall");
        assert_eq!(format_countdown(1, "Restavfall", Locale::No), "I morgen: Restavfall");
        assert_eq!(format_countdown(0, "Glass", Locale::En), "Today: Glass");
    }

    #[test]
    fn parse_recognizes_today_and_tomorrow_forms() {
        let today = parse_countdown("I dag: Restavfall").unwrap();
        assert!(today.is_today());
        assert_eq!(today.category_names, "Restavfall");

        let tomorrow = parse_countdown("Tomorrow: Paper waste").unwrap();
        assert!(tomorrow.is_tomorrow());
        assert_eq!(tomorrow.category_names, "Paper waste");
    }

    #[test]
    fn parse_accepts_the_singular_day_form() {
        // Legacy capability texts used "1 dag til X" instead of the
        // tomorrow phrase.
        let parsed = parse_countdown("1 dag til Papiravfall").unwrap();
        assert_eq!(parsed.days, 1);
        assert_eq!(parsed.category_names, "Papiravfall");
    }

    #[test]
    fn parse_rejects_unknown_shapes() {
        assert_eq!(parse_countdown("garbage text"), None);
        assert_eq!(parse_countdown("5 weeks until Restavfall"), None);
        assert_eq!(parse_countdown(""), None);
        // Phrase prefixes only count at a word boundary.
        assert_eq!(parse_countdown("Todayish nonsense"), None);
    }

    #[test]
    fn join_uses_the_localized_conjunction() {
        let names: Vec<String> = ["A", "B", "C"].iter().map(|&name| name.to_owned()).collect();
        assert_eq!(join_category_names(&names, Locale::No), "A, B og C");
        assert_eq!(join_category_names(&names, Locale::En), "A, B and C");

        let pair: Vec<String> = ["A", "B"].iter().map(|&name| name.to_owned()).collect();
        assert_eq!(join_category_names(&pair, Locale::No), "A og B");

        let single = vec!["A".to_owned()];
        assert_eq!(join_category_names(&single, Locale::No), "A");
        assert_eq!(join_category_names(&[], Locale::No), "");
    }

    #[test]
    fn pickup_dates_render_per_locale() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 28).unwrap();
        assert_eq!(format_pickup_date(date, Locale::No), "man. 28. jul.");
        assert_eq!(format_pickup_date(date, Locale::En), "Mon 28 Jul");
    }
}
