use super::{SeaOrmStorage, db_error};
use crate::entity::user_notification_preferences::{ActiveModel, Entity as Preferences};
use crate::errors::Result;
use crate::models::notification_preferences::{
    entities::NotificationPreferences, requests::UpdateNotificationPreferencesRequest,
};
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};

impl SeaOrmStorage {
    /// 未保存过偏好时返回默认值
    pub async fn get_notification_preferences_impl(
        &self,
        user_id: i64,
    ) -> Result<NotificationPreferences> {
        let row = Preferences::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(db_error("Failed to query notification preferences"))?;

        Ok(row
            .map(|m| m.into_preferences())
            .unwrap_or_else(|| NotificationPreferences::defaults_for(user_id)))
    }

    /// 合并更新，不存在时插入
    pub async fn update_notification_preferences_impl(
        &self,
        user_id: i64,
        update: UpdateNotificationPreferencesRequest,
    ) -> Result<NotificationPreferences> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        let existing = Preferences::find_by_id(user_id)
            .one(&txn)
            .await
            .map_err(db_error("Failed to query notification preferences"))?;

        let saved = match existing {
            Some(row) => {
                let mut model: ActiveModel = row.into();
                if let Some(v) = update.email_notifications {
                    model.email_notifications = Set(v);
                }
                if let Some(v) = update.assignment_reminders {
                    model.assignment_reminders = Set(v);
                }
                if let Some(v) = update.grade_notifications {
                    model.grade_notifications = Set(v);
                }
                if let Some(v) = update.meeting_reminders {
                    model.meeting_reminders = Set(v);
                }
                model.updated_at = Set(now);
                model
                    .update(&txn)
                    .await
                    .map_err(db_error("Failed to update notification preferences"))?
            }
            None => {
                let defaults = NotificationPreferences::defaults_for(user_id);
                ActiveModel {
                    user_id: Set(user_id),
                    email_notifications: Set(update
                        .email_notifications
                        .unwrap_or(defaults.email_notifications)),
                    assignment_reminders: Set(update
                        .assignment_reminders
                        .unwrap_or(defaults.assignment_reminders)),
                    grade_notifications: Set(update
                        .grade_notifications
                        .unwrap_or(defaults.grade_notifications)),
                    meeting_reminders: Set(update
                        .meeting_reminders
                        .unwrap_or(defaults.meeting_reminders)),
                    updated_at: Set(now),
                }
                .insert(&txn)
                .await
                .map_err(db_error("Failed to save notification preferences"))?
            }
        };

        txn.commit()
            .await
            .map_err(db_error("Failed to commit notification preferences"))?;

        Ok(saved.into_preferences())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support;
    use super::*;
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_defaults_then_partial_update() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let user = test_support::user(&storage, "student1", UserRole::Student).await;

        let prefs = storage
            .get_notification_preferences_impl(user.id)
            .await
            .expect("get");
        assert!(prefs.email_notifications && prefs.meeting_reminders);
        assert!(prefs.updated_at.is_none());

        storage
            .update_notification_preferences_impl(
                user.id,
                UpdateNotificationPreferencesRequest {
                    email_notifications: Some(false),
                    ..Default::default()
                },
            )
            .await
            .expect("insert");
        let prefs = storage
            .update_notification_preferences_impl(
                user.id,
                UpdateNotificationPreferencesRequest {
                    meeting_reminders: Some(false),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        assert!(!prefs.email_notifications);
        assert!(!prefs.meeting_reminders);
        assert!(prefs.grade_notifications);
        assert!(prefs.updated_at.is_some());
    }
}
