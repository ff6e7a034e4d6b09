//! 时间工具函数 — 场馆时区转换
//!
//! 所有日期→时间戳转换统一在 API handler / engine 层完成，
//! repository 层只接收 `i64` Unix millis。
//! "today" everywhere means the venue-timezone calendar day.

use chrono::NaiveDate;
use chrono_tz::Tz;

use super::{AppError, result::AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 日期 + 时分秒 → Unix millis (场馆时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn date_hms_to_millis(date: NaiveDate, hour: u32, min: u32, sec: u32, tz: Tz) -> i64 {
    let naive = date.and_hms_opt(hour, min, sec).unwrap();
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期开始 (00:00:00) → Unix millis (场馆时区)
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    date_hms_to_millis(date, 0, 0, 0, tz)
}

/// 日期结束 → 次日 00:00:00 的 Unix millis (场馆时区)
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    date_hms_to_millis(next_day, 0, 0, 0, tz)
}

/// 当前场馆日期 (场馆时区)
pub fn current_venue_date(tz: Tz) -> NaiveDate {
    chrono::Utc::now().with_timezone(&tz).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_bounds_are_half_open() {
        let tz: Tz = "America/New_York".parse().unwrap();
        let date = parse_date("2025-06-15").unwrap();
        let start = day_start_millis(date, tz);
        let end = day_end_millis(date, tz);
        // EDT is UTC-4 in June: exactly 24h between bounds
        assert_eq!(end - start, 24 * 3600 * 1000);
        // Midnight local maps to 04:00 UTC
        assert_eq!(start % (24 * 3600 * 1000), 4 * 3600 * 1000);
    }

    #[test]
    fn dst_day_is_23_hours() {
        let tz: Tz = "America/New_York".parse().unwrap();
        // Spring-forward date, 2025-03-09: local day loses one hour
        let date = parse_date("2025-03-09").unwrap();
        let start = day_start_millis(date, tz);
        let end = day_end_millis(date, tz);
        assert_eq!(end - start, 23 * 3600 * 1000);
    }

    #[test]
    fn rejects_malformed_date() {
        assert!(parse_date("15/06/2025").is_err());
        assert!(parse_date("2025-13-01").is_err());
    }
}
