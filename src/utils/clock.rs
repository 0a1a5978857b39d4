use chrono::{Duration, Local, NaiveDate};

/// Today's date as stored on records, e.g. `2026-01-15`.
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Current wall-clock time as stored on messages, e.g. `14:05`.
pub fn now_time() -> String {
    Local::now().format("%H:%M").to_string()
}

pub fn today_plus_days(days: i64) -> String {
    (Local::now().date_naive() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_formats() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(format_date(date), "2026-03-09");
        assert_eq!(today().len(), 10);
        assert_eq!(now_time().len(), 5);
        assert!(today_plus_days(7) > today());
    }
}
