use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::time::SystemTime;

/// 解析 front-matter 中的日期字符串，无法识别时返回 `None`
pub fn parse_date(date_str: &str) -> Option<DateTime<Utc>> {
    let s = date_str.trim();

    // RFC 3339: 2024-01-15T10:30:00+08:00
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // 带时间不带时区: 2024-01-15T10:30:00 / 2024-01-15 10:30:00
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc());
        }
    }
    // 纯日期: 2024-01-15 / 2024/01/15
    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }
    None
}

/// 文件修改时间截断到 UTC 日期 (YYYY-MM-DD)
pub fn mtime_day(mtime: SystemTime) -> String {
    DateTime::<Utc>::from(mtime).format("%Y-%m-%d").to_string()
}
