use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 用户通知偏好，没有记录时全部开启
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification-preferences.ts")]
pub struct NotificationPreferences {
    pub user_id: i64,
    pub email_notifications: bool,
    pub assignment_reminders: bool,
    pub grade_notifications: bool,
    pub meeting_reminders: bool,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl NotificationPreferences {
    pub fn defaults_for(user_id: i64) -> Self {
        Self {
            user_id,
            email_notifications: true,
            assignment_reminders: true,
            grade_notifications: true,
            meeting_reminders: true,
            updated_at: None,
        }
    }
}
