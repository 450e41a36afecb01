//! Due date input parsing and relative display.

use chrono::{Duration, Local, NaiveDate};

/// Parse user due date input.
///
/// Accepts `YYYY-MM-DD` plus the short forms "today", "tomorrow",
/// "in Nd" and "in Nw".
pub fn parse_due_input(s: &str) -> Option<NaiveDate> {
    parse_due_from(s, Local::now().date_naive())
}

fn parse_due_from(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(n) = rest.strip_suffix('d') {
            if let Ok(days) = n.trim().parse::<i64>() {
                return Some(today + Duration::days(days));
            }
        }
        if let Some(n) = rest.strip_suffix('w') {
            if let Ok(weeks) = n.trim().parse::<i64>() {
                return Some(today + Duration::weeks(weeks));
            }
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: NaiveDate, today: NaiveDate) -> String {
    let days = (due - today).num_days();
    match days {
        0 => "today".into(),
        1 => "tomorrow".into(),
        d if d > 1 => format!("in {d}d"),
        d => format!("{}d late", -d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_iso_dates() {
        let today = day(2024, 6, 15);
        assert_eq!(parse_due_from("2024-07-01", today), Some(day(2024, 7, 1)));
        assert_eq!(parse_due_from("  2024-07-01  ", today), Some(day(2024, 7, 1)));
    }

    #[test]
    fn parses_relative_forms() {
        let today = day(2024, 6, 15);
        assert_eq!(parse_due_from("today", today), Some(today));
        assert_eq!(parse_due_from("Tomorrow", today), Some(day(2024, 6, 16)));
        assert_eq!(parse_due_from("in 3d", today), Some(day(2024, 6, 18)));
        assert_eq!(parse_due_from("in 2w", today), Some(day(2024, 6, 29)));
    }

    #[test]
    fn rejects_garbage() {
        let today = day(2024, 6, 15);
        assert_eq!(parse_due_from("next sprint", today), None);
        assert_eq!(parse_due_from("2024-13-40", today), None);
        assert_eq!(parse_due_from("", today), None);
    }

    #[test]
    fn formats_relative_to_today() {
        let today = day(2024, 6, 15);
        assert_eq!(format_due_relative(today, today), "today");
        assert_eq!(format_due_relative(day(2024, 6, 16), today), "tomorrow");
        assert_eq!(format_due_relative(day(2024, 6, 20), today), "in 5d");
        assert_eq!(format_due_relative(day(2024, 6, 13), today), "2d late");
    }
}
