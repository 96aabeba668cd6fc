//! Date text conversion
//!
//! Stored records never carry a native timestamp, so every write picks one of the
//! textual forms below and every read goes back through [`parse_date`].

use chrono::{NaiveDateTime, SubsecRound, Timelike};

use crate::{PlogError, Result};

/// Byte offset of the date/time separator in both accepted layouts
const SEPARATOR_AT: usize = 10;

/// Accepted layouts keyed by their separator byte.
/// `%.f` takes an optional fraction of up to nine digits.
const LAYOUTS: [(u8, &str); 2] = [
    (b' ', "%Y-%m-%d %H:%M:%S%.f"),
    (b'T', "%Y-%m-%dT%H:%M:%S%.f"),
];

/// ISO-8601 with microseconds
const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

const PLAIN_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const PLAIN_FORMAT_MICROS: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Pick the layout for `text` by its separator.
///
/// chrono lets a space in a format match any run of whitespace, including none,
/// so whitespace anywhere but the separator position is rejected up front.
fn layout_for(text: &str) -> Option<&'static str> {
    if text
        .char_indices()
        .any(|(idx, c)| c.is_whitespace() && idx != SEPARATOR_AT)
    {
        return None;
    }
    let separator = *text.as_bytes().get(SEPARATOR_AT)?;
    LAYOUTS
        .iter()
        .find(|(sep, _)| *sep == separator)
        .map(|(_, layout)| *layout)
}

/// Parse a stored date string
pub fn parse_date(text: &str) -> Result<NaiveDateTime> {
    layout_for(text)
        .and_then(|layout| NaiveDateTime::parse_from_str(text, layout).ok())
        .ok_or_else(|| PlogError::Parse {
            input: text.to_string(),
        })
}

/// ISO-8601 form used by the JSON, SQLite and in-memory backends
pub fn format_date(instant: &NaiveDateTime) -> String {
    instant.format(ISO_FORMAT).to_string()
}

/// Space-separated form used by the CSV backend: no fraction at zero
/// microseconds, otherwise exactly six digits
pub fn format_date_plain(instant: &NaiveDateTime) -> String {
    if instant.nanosecond() == 0 {
        instant.format(PLAIN_FORMAT).to_string()
    } else {
        instant.format(PLAIN_FORMAT_MICROS).to_string()
    }
}

/// Drop sub-microsecond precision so both textual forms round-trip exactly
pub fn truncate_to_micros(instant: NaiveDateTime) -> NaiveDateTime {
    instant.trunc_subsecs(6)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 7, 10)
            .unwrap()
            .and_hms_micro_opt(16, 5, 9, 123456)
            .unwrap()
    }

    #[test]
    fn test_parse_both_layouts() {
        assert_eq!(parse_date("2021-07-10 16:05:09.123456").unwrap(), sample());
        assert_eq!(parse_date("2021-07-10T16:05:09.123456").unwrap(), sample());
    }

    #[test]
    fn test_parse_without_fraction() {
        let parsed = parse_date("2021-07-10T16:05:09").unwrap();
        assert_eq!(parsed, sample().trunc_subsecs(0));
    }

    #[test]
    fn test_parse_rejects_other_layouts() {
        for input in [
            "10/07/2021 16:05:09",
            "2021-07-10",
            "",
            "2021-07-10T16:05:09Z",
            "2021-07-1016:05:09.123456",
            "2021-07-10  16:05:09.1",
            "2021-07-10   16:05:09.123456",
            "2021-07-10\t16:05:09",
            " 2021-07-10T16:05:09",
            "2021-07-10T16:05:09 ",
        ] {
            let err = parse_date(input).unwrap_err();
            assert!(matches!(err, PlogError::Parse { .. }), "{input}");
        }
    }

    #[test]
    fn test_format_date_is_iso() {
        assert_eq!(format_date(&sample()), "2021-07-10T16:05:09.123456");
        let whole = sample().trunc_subsecs(0);
        assert_eq!(format_date(&whole), "2021-07-10T16:05:09.000000");
    }

    #[test]
    fn test_plain_form_parses_back() {
        let plain = format_date_plain(&sample());
        assert_eq!(plain, "2021-07-10 16:05:09.123456");
        assert_eq!(parse_date(&plain).unwrap(), sample());

        let whole = sample().trunc_subsecs(0);
        assert_eq!(format_date_plain(&whole), "2021-07-10 16:05:09");
        assert_eq!(parse_date(&format_date_plain(&whole)).unwrap(), whole);
    }

    #[test]
    fn test_plain_form_always_prints_six_digits() {
        let millis = sample().with_nanosecond(123_000_000).unwrap();
        assert_eq!(format_date_plain(&millis), "2021-07-10 16:05:09.123000");
        assert_eq!(parse_date(&format_date_plain(&millis)).unwrap(), millis);
    }

    #[test]
    fn test_truncate_to_micros() {
        let precise = sample().with_nanosecond(123_456_789).unwrap();
        assert_eq!(truncate_to_micros(precise), sample());
    }
}
