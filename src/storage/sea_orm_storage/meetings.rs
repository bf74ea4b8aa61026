use super::{SeaOrmStorage, db_error, fetch_page};
use crate::entity::meetings::{ActiveModel, Column, Entity as Meetings};
use crate::entity::prelude::{Classes, Enrollments};
use crate::entity::{class_enrollments, classes};
use crate::errors::Result;
use crate::models::{
    PaginationQuery,
    enrollments::entities::EnrollmentStatus,
    meetings::{
        entities::Meeting,
        requests::{MeetingListQuery, NewMeeting, UpdateMeetingRequest},
        responses::MeetingListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, QueryTrait, Select, Set,
};

/// 按角色视角和时间过滤会议（列表与首页统计共用）
pub(super) fn scoped_meetings(query: &MeetingListQuery) -> Select<Meetings> {
    let mut select = Meetings::find();

    if let Some(class_id) = query.class_id {
        select = select.filter(Column::ClassId.eq(class_id));
    }
    if let Some(teacher_id) = query.teacher_id {
        let own_classes = Classes::find()
            .select_only()
            .column(classes::Column::Id)
            .filter(classes::Column::TeacherId.eq(teacher_id))
            .into_query();
        select = select.filter(
            Condition::any()
                .add(Column::HostId.eq(teacher_id))
                .add(Column::ClassId.in_subquery(own_classes)),
        );
    }
    if let Some(student_id) = query.student_id {
        let enrolled = Enrollments::find()
            .select_only()
            .column(class_enrollments::Column::ClassId)
            .filter(class_enrollments::Column::StudentId.eq(student_id))
            .filter(class_enrollments::Column::Status.eq(EnrollmentStatus::ACTIVE))
            .into_query();
        select = select.filter(Column::ClassId.in_subquery(enrolled));
    }
    if let Some(after) = query.upcoming_after {
        select = select.filter(Column::EndTime.gt(after.timestamp()));
    }

    select
}

impl SeaOrmStorage {
    pub async fn create_meeting_impl(&self, meeting: NewMeeting) -> Result<Meeting> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            class_id: Set(meeting.class_id),
            host_id: Set(meeting.host_id),
            title: Set(meeting.title.trim().to_string()),
            description: Set(meeting.description),
            start_time: Set(meeting.start_time.timestamp()),
            end_time: Set(meeting.end_time.timestamp()),
            meeting_url: Set(meeting.meeting_url),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_error("Failed to create meeting"))?;

        Ok(result.into_meeting())
    }

    pub async fn get_meeting_by_id_impl(&self, meeting_id: i64) -> Result<Option<Meeting>> {
        let result = Meetings::find_by_id(meeting_id)
            .one(&self.db)
            .await
            .map_err(db_error("Failed to query meeting"))?;

        Ok(result.map(|m| m.into_meeting()))
    }

    /// 按开始时间升序
    pub async fn list_meetings_with_pagination_impl(
        &self,
        query: MeetingListQuery,
    ) -> Result<MeetingListResponse> {
        let (page, size) = PaginationQuery::normalized(query.page, query.size);

        let paginator = scoped_meetings(&query)
            .order_by_asc(Column::StartTime)
            .order_by_asc(Column::Id)
            .paginate(&self.db, size);
        let (meetings, pagination) =
            fetch_page(paginator, page, size, "Failed to list meetings").await?;

        Ok(MeetingListResponse {
            items: meetings.into_iter().map(|m| m.into_meeting()).collect(),
            pagination,
        })
    }

    pub async fn update_meeting_impl(
        &self,
        meeting_id: i64,
        update: UpdateMeetingRequest,
    ) -> Result<Option<Meeting>> {
        let Some(existing) = Meetings::find_by_id(meeting_id)
            .one(&self.db)
            .await
            .map_err(db_error("Failed to query meeting"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(chrono::Utc::now().timestamp());
        if let Some(title) = update.title {
            model.title = Set(title.trim().to_string());
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(start) = update.start_time {
            model.start_time = Set(start.timestamp());
        }
        if let Some(end) = update.end_time {
            model.end_time = Set(end.timestamp());
        }
        if let Some(url) = update.meeting_url {
            model.meeting_url = Set(Some(url));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(db_error("Failed to update meeting"))?;

        Ok(Some(updated.into_meeting()))
    }

    pub async fn delete_meeting_impl(&self, meeting_id: i64) -> Result<bool> {
        let result = Meetings::delete_by_id(meeting_id)
            .exec(&self.db)
            .await
            .map_err(db_error("Failed to delete meeting"))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::super::test_support;
    use super::*;
    use crate::models::users::entities::UserRole;
    use chrono::{Duration, Utc};

    pub(crate) fn new_meeting(class_id: i64, host_id: i64, starts_in: Duration) -> NewMeeting {
        let start = Utc::now() + starts_in;
        NewMeeting {
            class_id,
            host_id,
            title: "Office hours".into(),
            description: None,
            start_time: start,
            end_time: start + Duration::hours(1),
            meeting_url: Some("https://meet.example.com/room".into()),
        }
    }

    #[tokio::test]
    async fn test_role_scopes_and_upcoming() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let t1 = test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        let t2 = test_support::user(&storage, "teacher2", UserRole::Teacher).await;
        let student = test_support::user(&storage, "student1", UserRole::Student).await;
        let c1 = test_support::class(&storage, t1.id, None).await;
        let c2 = test_support::class(&storage, t2.id, None).await;
        storage
            .enroll_student_impl(c2.id, student.id, EnrollmentStatus::Active)
            .await
            .expect("enroll");

        // t1 在 t2 的班级主持一场过去的会议
        storage
            .create_meeting_impl(new_meeting(c2.id, t1.id, -Duration::days(2)))
            .await
            .expect("create");
        storage
            .create_meeting_impl(new_meeting(c1.id, t1.id, Duration::days(1)))
            .await
            .expect("create");
        storage
            .create_meeting_impl(new_meeting(c2.id, t2.id, Duration::days(1)))
            .await
            .expect("create");

        let hosted = storage
            .list_meetings_with_pagination_impl(MeetingListQuery {
                teacher_id: Some(t1.id),
                ..Default::default()
            })
            .await
            .expect("list");
        assert_eq!(hosted.pagination.total, 2);

        let owner = storage
            .list_meetings_with_pagination_impl(MeetingListQuery {
                teacher_id: Some(t2.id),
                ..Default::default()
            })
            .await
            .expect("list");
        assert_eq!(owner.pagination.total, 2);

        let upcoming = storage
            .list_meetings_with_pagination_impl(MeetingListQuery {
                student_id: Some(student.id),
                upcoming_after: Some(Utc::now()),
                ..Default::default()
            })
            .await
            .expect("list");
        assert_eq!(upcoming.items.len(), 1);
        assert_eq!(upcoming.items[0].host_id, t2.id);
    }

    #[tokio::test]
    async fn test_partial_update_and_delete() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let teacher = test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        let class = test_support::class(&storage, teacher.id, None).await;
        let meeting = storage
            .create_meeting_impl(new_meeting(class.id, teacher.id, Duration::days(1)))
            .await
            .expect("create");

        let updated = storage
            .update_meeting_impl(
                meeting.id,
                UpdateMeetingRequest {
                    title: Some("Review session".into()),
                    ..Default::default()
                },
            )
            .await
            .expect("update")
            .expect("exists");
        assert_eq!(updated.title, "Review session");
        assert_eq!(updated.start_time, meeting.start_time);

        assert!(storage.delete_meeting_impl(meeting.id).await.expect("delete"));
        assert!(storage.get_meeting_by_id_impl(meeting.id).await.expect("get").is_none());
    }
}
