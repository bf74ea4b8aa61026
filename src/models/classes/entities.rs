use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::UserSummary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct Class {
    pub id: i64,
    pub teacher_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    /// 为空表示不限人数
    pub capacity: Option<i32>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Class {
    /// 按当前有效选课人数判断是否还能加入
    pub fn has_room_for(&self, active_count: u64) -> bool {
        self.capacity
            .is_none_or(|capacity| active_count < capacity.max(0) as u64)
    }
}

/// 班级详情：附带教师摘要与有效选课人数
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub class: Class,
    pub teacher: Option<UserSummary>,
    pub enrollment_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_with_capacity(capacity: Option<i32>) -> Class {
        let now = chrono::Utc::now();
        Class {
            id: 1,
            teacher_id: 2,
            name: "Biology".into(),
            description: None,
            subject: None,
            capacity,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_capacity_room() {
        assert!(class_with_capacity(None).has_room_for(10_000));
        assert!(class_with_capacity(Some(2)).has_room_for(1));
        assert!(!class_with_capacity(Some(2)).has_room_for(2));
    }
}
