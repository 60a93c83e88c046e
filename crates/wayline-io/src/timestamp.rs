//! Saved-route timestamp labels.
//!
//! Formats Unix timestamps as `DD/MM/YY, HH:MM` (UTC), the label shape
//! the saved-routes list displays. The civil-date conversion is the
//! standard days-from-epoch algorithm, implemented here (~15 lines) to
//! avoid pulling in a calendar crate for one label format.

use std::time::{SystemTime, UNIX_EPOCH};

/// Format `unix_seconds` as `DD/MM/YY, HH:MM` in UTC.
#[must_use]
pub fn format_timestamp(unix_seconds: i64) -> String {
    let days = unix_seconds.div_euclid(86_400);
    let secs_of_day = unix_seconds.rem_euclid(86_400);

    let (year, month, day) = civil_from_days(days);
    let hours = secs_of_day / 3600;
    let minutes = (secs_of_day % 3600) / 60;

    format!(
        "{day:02}/{month:02}/{:02}, {hours:02}:{minutes:02}",
        year.rem_euclid(100)
    )
}

/// A label for the present moment, for new saved routes.
#[must_use]
pub fn now_label() -> String {
    let unix_seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(0));
    format_timestamp(unix_seconds)
}

/// Convert days since 1970-01-01 to a civil `(year, month, day)` date
/// (proleptic Gregorian).
const fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch() {
        assert_eq!(format_timestamp(0), "01/01/70, 00:00");
    }

    #[test]
    fn millennium() {
        // 2000-01-01 00:00:00 UTC.
        assert_eq!(format_timestamp(946_684_800), "01/01/00, 00:00");
    }

    #[test]
    fn leap_day() {
        // 2024-02-29 12:34:00 UTC.
        assert_eq!(format_timestamp(1_709_210_040), "29/02/24, 12:34");
    }

    #[test]
    fn before_epoch() {
        assert_eq!(format_timestamp(-60), "31/12/69, 23:59");
    }

    #[test]
    fn now_label_has_expected_shape() {
        let label = now_label();
        // DD/MM/YY, HH:MM
        assert_eq!(label.len(), 15);
        assert_eq!(&label[2..3], "/");
        assert_eq!(&label[5..6], "/");
        assert_eq!(&label[8..10], ", ");
        assert_eq!(&label[12..13], ":");
    }
}
