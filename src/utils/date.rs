//! 日期与星期的解析工具，全部按 UTC 计算

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};

const SECONDS_PER_DAY: i64 = 86_400;

/// 某一时刻所在 UTC 日零点的 Unix 秒
pub fn utc_day_start(at: DateTime<Utc>) -> i64 {
    at.timestamp().div_euclid(SECONDS_PER_DAY) * SECONDS_PER_DAY
}

fn date_to_day_start(date: NaiveDate) -> i64 {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
        .timestamp()
}

/// 解析授课日期：`YYYY-MM-DD` 或 RFC 3339，缺省为 `now`，结果截断到 UTC 日
pub fn parse_lesson_day(input: Option<&str>, now: DateTime<Utc>) -> Result<i64, String> {
    let Some(raw) = input.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(utc_day_start(now));
    };

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date_to_day_start(date));
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| utc_day_start(dt.with_timezone(&Utc)))
        .map_err(|_| format!("Invalid date '{raw}', expected YYYY-MM-DD or RFC 3339"))
}

/// 解析列表筛选用的日期 `YYYY-MM-DD`
pub fn parse_date(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{input}', expected YYYY-MM-DD"))
}

pub fn parse_day_filter(input: &str) -> Result<i64, String> {
    parse_date(input).map(date_to_day_start)
}

/// 解析星期：英文全称、三字母缩写或 ISO 序号 1..=7
pub fn parse_weekday(input: &str) -> Option<u32> {
    let value = input.trim().to_ascii_lowercase();
    if let Ok(n) = value.parse::<u32>() {
        return (1..=7).contains(&n).then_some(n);
    }
    let day = match value.as_str() {
        "monday" | "mon" => 1,
        "tuesday" | "tue" | "tues" => 2,
        "wednesday" | "wed" => 3,
        "thursday" | "thu" | "thur" | "thurs" => 4,
        "friday" | "fri" => 5,
        "saturday" | "sat" => 6,
        "sunday" | "sun" => 7,
        _ => return None,
    };
    Some(day)
}

pub fn weekday_name(day: u32) -> &'static str {
    match day {
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        6 => "Saturday",
        7 => "Sunday",
        _ => "Unknown",
    }
}

pub fn iso_weekday(date: NaiveDate) -> u32 {
    date.weekday().number_from_monday()
}

/// 本周（周一至周日）的首尾日零点
pub fn week_bounds(now: DateTime<Utc>) -> (i64, i64) {
    let today = now.date_naive();
    let monday = today - Duration::days(i64::from(iso_weekday(today)) - 1);
    let start = date_to_day_start(monday);
    (start, start + 6 * SECONDS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_lesson_day_truncates_to_utc_midnight() {
        let now = at("2024-03-05T16:45:00Z");
        let expected = at("2024-03-05T00:00:00Z").timestamp();
        assert_eq!(parse_lesson_day(None, now).unwrap(), expected);
        assert_eq!(parse_lesson_day(Some(""), now).unwrap(), expected);
        assert_eq!(parse_lesson_day(Some("2024-03-05"), now).unwrap(), expected);
        assert_eq!(
            parse_lesson_day(Some("2024-03-05T23:59:59Z"), now).unwrap(),
            expected
        );
        // 带时区的时刻先换算到 UTC
        assert_eq!(
            parse_lesson_day(Some("2024-03-06T01:00:00+07:00"), now).unwrap(),
            expected
        );
        assert!(parse_lesson_day(Some("05/03/2024"), now).is_err());
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("Monday"), Some(1));
        assert_eq!(parse_weekday("fri"), Some(5));
        assert_eq!(parse_weekday("7"), Some(7));
        assert_eq!(parse_weekday("0"), None);
        assert_eq!(parse_weekday("someday"), None);
        assert_eq!(weekday_name(3), "Wednesday");
    }

    #[test]
    fn test_week_bounds() {
        // 2024-03-07 是周四
        let (start, end) = week_bounds(at("2024-03-07T10:00:00Z"));
        assert_eq!(start, at("2024-03-04T00:00:00Z").timestamp());
        assert_eq!(end, at("2024-03-10T00:00:00Z").timestamp());
        assert_eq!(iso_weekday(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()), 7);
    }

    #[test]
    fn test_day_filter() {
        assert_eq!(
            parse_day_filter("2024-01-01").unwrap(),
            at("2024-01-01T00:00:00Z").timestamp()
        );
        assert!(parse_day_filter("2024-13-01").is_err());
    }
}
