//! 用户通知偏好实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_notification_preferences")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    pub email_notifications: bool,
    pub assignment_reminders: bool,
    pub grade_notifications: bool,
    pub meeting_reminders: bool,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_preferences(
        self,
    ) -> crate::models::notification_preferences::entities::NotificationPreferences {
        crate::models::notification_preferences::entities::NotificationPreferences {
            user_id: self.user_id,
            email_notifications: self.email_notifications,
            assignment_reminders: self.assignment_reminders,
            grade_notifications: self.grade_notifications,
            meeting_reminders: self.meeting_reminders,
            updated_at: Some(super::from_timestamp(self.updated_at)),
        }
    }
}
