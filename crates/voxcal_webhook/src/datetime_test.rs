#[cfg(test)]
mod tests {
    use crate::datetime::{duration_between, resolve, spoken_time, DateTimeError};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_resolve_iso_date() {
        let instant = resolve("2026-01-20", "14:00", None).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2026, 1, 20, 14, 0, 0).unwrap());
    }

    #[test]
    fn test_resolve_is_timezone_invariant() {
        // The hint is display-only: it must never shift the instant.
        let plain = resolve("2026-01-20", "14:00", None).unwrap();
        let tokyo = resolve("2026-01-20", "14:00", Some("Asia/Tokyo")).unwrap();
        let zurich = resolve("2026-01-20", "14:00", Some("Europe/Zurich")).unwrap();
        assert_eq!(plain, tokyo);
        assert_eq!(plain, zurich);
    }

    #[test]
    fn test_resolve_slash_date_month_first_when_ambiguous() {
        // Both components <= 12: the month-first guess wins.
        let instant = resolve("03/04/2026", "09:00", None).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap());
    }

    #[test]
    fn test_resolve_slash_date_day_first_when_unambiguous() {
        let instant = resolve("25/04/2026", "09:00", None).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2026, 4, 25, 9, 0, 0).unwrap());
    }

    #[test]
    fn test_resolve_twelve_hour_times() {
        let afternoon = resolve("2026-01-20", "2:30 PM", None).unwrap();
        assert_eq!(
            afternoon,
            Utc.with_ymd_and_hms(2026, 1, 20, 14, 30, 0).unwrap()
        );

        let midnight = resolve("2026-01-20", "12:00am", None).unwrap();
        assert_eq!(midnight, Utc.with_ymd_and_hms(2026, 1, 20, 0, 0, 0).unwrap());

        let noon = resolve("2026-01-20", "12:00 pm", None).unwrap();
        assert_eq!(noon, Utc.with_ymd_and_hms(2026, 1, 20, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_resolve_rejects_malformed_date() {
        assert!(matches!(
            resolve("January 20th", "14:00", None),
            Err(DateTimeError::InvalidDateFormat(_))
        ));
        assert!(matches!(
            resolve("2026-13-40", "14:00", None),
            Err(DateTimeError::InvalidDateFormat(_))
        ));
    }

    #[test]
    fn test_resolve_rejects_malformed_time() {
        assert!(matches!(
            resolve("2026-01-20", "2pm", None),
            Err(DateTimeError::InvalidTimeFormat(_))
        ));
        assert!(matches!(
            resolve("2026-01-20", "25:00", None),
            Err(DateTimeError::InvalidTimeFormat(_))
        ));
        assert!(matches!(
            resolve("2026-01-20", "13:00 pm", None),
            Err(DateTimeError::InvalidTimeFormat(_))
        ));
    }

    #[test]
    fn test_duration_between_simple() {
        assert_eq!(duration_between("09:00", "09:30").unwrap(), 30);
        assert_eq!(duration_between("9:00 AM", "10:15 AM").unwrap(), 75);
    }

    #[test]
    fn test_duration_between_rejects_non_positive() {
        assert!(matches!(
            duration_between("14:00", "13:00"),
            Err(DateTimeError::InvalidDuration(-60))
        ));
        assert!(matches!(
            duration_between("14:00", "14:00"),
            Err(DateTimeError::InvalidDuration(0))
        ));
    }

    #[test]
    fn test_spoken_time_labels() {
        let instant = Utc.with_ymd_and_hms(2026, 1, 20, 14, 0, 0).unwrap();
        let plain = spoken_time(instant, None);
        assert!(plain.contains("2:00 PM"));
        assert!(plain.ends_with("UTC"));

        // A valid hint changes the label only, not the wall clock.
        let hinted = spoken_time(instant, Some("Europe/Zurich"));
        assert!(hinted.contains("2:00 PM"));
        assert!(hinted.ends_with("Europe/Zurich"));

        // A bogus hint falls back to the UTC label.
        let bogus = spoken_time(instant, Some("Mars/Olympus"));
        assert!(bogus.ends_with("UTC"));
    }
}
