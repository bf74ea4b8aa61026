//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! 时间字段统一存储为 Unix 秒，转换为业务实体时还原为 UTC 时间。

pub mod prelude;

pub mod assignment_files;
pub mod assignment_submissions;
pub mod assignments;
pub mod class_enrollments;
pub mod classes;
pub mod meetings;
pub mod submission_files;
pub mod user_notification_preferences;
pub mod users;

use chrono::{DateTime, Utc};

pub(crate) fn from_timestamp(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

/// 解析存储的枚举字符串，无法识别时记录告警并使用回退值
pub(crate) fn parse_column<T>(raw: &str, fallback: T, column: &str, id: i64) -> T
where
    T: std::str::FromStr<Err = String> + std::fmt::Debug,
{
    raw.parse::<T>().unwrap_or_else(|e| {
        tracing::warn!(
            "Row {} has unrecognized {} value: {}; treating it as {:?}",
            id,
            column,
            e,
            fallback
        );
        fallback
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;

    #[test]
    fn test_parse_column_falls_back_on_unknown_value() {
        assert_eq!(
            parse_column("teacher", UserRole::Student, "users.role", 1),
            UserRole::Teacher
        );
        assert_eq!(
            parse_column("superuser", UserRole::Student, "users.role", 1),
            UserRole::Student
        );
    }
}
