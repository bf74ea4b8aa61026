use serde::Deserialize;
use ts_rs::TS;

/// 只修改提供的字段
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification-preferences.ts")]
pub struct UpdateNotificationPreferencesRequest {
    pub email_notifications: Option<bool>,
    pub assignment_reminders: Option<bool>,
    pub grade_notifications: Option<bool>,
    pub meeting_reminders: Option<bool>,
}

impl UpdateNotificationPreferencesRequest {
    pub fn is_empty(&self) -> bool {
        self.email_notifications.is_none()
            && self.assignment_reminders.is_none()
            && self.grade_notifications.is_none()
            && self.meeting_reminders.is_none()
    }
}
