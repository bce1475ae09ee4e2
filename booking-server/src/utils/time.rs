//! 时间工具函数: 日期与时段标签解析
//!
//! 所有字符串→类型的转换统一在 API handler 层完成，
//! 核心层只接收已验证的值。日期与时段在存储层保持字符串形式
//! ("YYYY-MM-DD" / "HH:MM")，便于与前端直通。

use chrono::{NaiveDate, NaiveTime};

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 解析时段标签 (HH:MM)
///
/// 只检查语法；标签是否落在服务时段网格上由调用方另行检查。
pub fn parse_slot_label(label: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(label, "%H:%M")
        .map_err(|_| AppError::validation(format!("Invalid time format: {}", label)))
}

/// 规范化日期为存储键 ("YYYY-MM-DD")
pub fn normalize_date(date: &str) -> AppResult<String> {
    Ok(parse_date(date)?.format("%Y-%m-%d").to_string())
}

/// 当前 Unix 毫秒时间戳
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2025-10-03").is_ok());
        assert!(parse_date("2025-13-03").is_err());
        assert!(parse_date("03/10/2025").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_parse_slot_label() {
        assert!(parse_slot_label("11:00").is_ok());
        assert!(parse_slot_label("21:00").is_ok());
        assert!(parse_slot_label("25:00").is_err());
        assert!(parse_slot_label("11h00").is_err());
    }

    #[test]
    fn test_normalize_date_is_stable() {
        assert_eq!(normalize_date("2025-10-03").unwrap(), "2025-10-03");
    }
}
