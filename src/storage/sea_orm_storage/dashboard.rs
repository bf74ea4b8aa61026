//! 首页统计

use super::meetings::scoped_meetings;
use super::{SeaOrmStorage, db_error};
use crate::entity::prelude::{Assignments, Classes, Enrollments, Submissions, Users};
use crate::entity::{assignment_submissions, assignments, class_enrollments, classes, users};
use crate::errors::Result;
use crate::models::{
    dashboard::responses::{AdminDashboard, StudentDashboard, TeacherDashboard},
    enrollments::entities::EnrollmentStatus,
    meetings::requests::MeetingListQuery,
    submissions::entities::SubmissionStatus,
    users::entities::UserRole,
};
use chrono::{DateTime, TimeDelta, Utc};
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect, QueryTrait,
    sea_query::SelectStatement,
};

/// 学生视角下“即将到期”的时间窗口
const DUE_SOON_DAYS: i64 = 7;

fn own_class_ids(teacher_id: i64) -> SelectStatement {
    Classes::find()
        .select_only()
        .column(classes::Column::Id)
        .filter(classes::Column::TeacherId.eq(teacher_id))
        .into_query()
}

fn enrolled_class_ids(student_id: i64) -> SelectStatement {
    Enrollments::find()
        .select_only()
        .column(class_enrollments::Column::ClassId)
        .filter(class_enrollments::Column::StudentId.eq(student_id))
        .filter(class_enrollments::Column::Status.eq(EnrollmentStatus::ACTIVE))
        .into_query()
}

impl SeaOrmStorage {
    async fn count_users_with_role(&self, role: UserRole) -> Result<i64> {
        let n = Users::find()
            .filter(users::Column::Role.eq(role.as_str()))
            .count(&self.db)
            .await
            .map_err(db_error("Failed to count users"))?;
        Ok(n as i64)
    }

    pub async fn admin_dashboard_impl(&self, now: DateTime<Utc>) -> Result<AdminDashboard> {
        let ctx = "Failed to build admin dashboard";

        Ok(AdminDashboard {
            total_users: self.count_users_impl().await? as i64,
            students: self.count_users_with_role(UserRole::Student).await?,
            teachers: self.count_users_with_role(UserRole::Teacher).await?,
            admins: self.count_users_with_role(UserRole::Admin).await?,
            classes: Classes::find().count(&self.db).await.map_err(db_error(ctx))? as i64,
            assignments: Assignments::find()
                .count(&self.db)
                .await
                .map_err(db_error(ctx))? as i64,
            upcoming_meetings: scoped_meetings(&MeetingListQuery {
                upcoming_after: Some(now),
                ..Default::default()
            })
            .count(&self.db)
            .await
            .map_err(db_error(ctx))? as i64,
        })
    }

    pub async fn teacher_dashboard_impl(
        &self,
        teacher_id: i64,
        now: DateTime<Utc>,
    ) -> Result<TeacherDashboard> {
        let ctx = "Failed to build teacher dashboard";

        let classes = Classes::find()
            .filter(classes::Column::TeacherId.eq(teacher_id))
            .count(&self.db)
            .await
            .map_err(db_error(ctx))?;

        let assignments = Assignments::find()
            .filter(assignments::Column::ClassId.in_subquery(own_class_ids(teacher_id)))
            .count(&self.db)
            .await
            .map_err(db_error(ctx))?;

        let own_assignments = Assignments::find()
            .select_only()
            .column(assignments::Column::Id)
            .filter(assignments::Column::ClassId.in_subquery(own_class_ids(teacher_id)))
            .into_query();
        let submissions_to_grade = Submissions::find()
            .filter(assignment_submissions::Column::AssignmentId.in_subquery(own_assignments))
            .filter(assignment_submissions::Column::Status.ne(SubmissionStatus::Graded.as_str()))
            .count(&self.db)
            .await
            .map_err(db_error(ctx))?;

        let pending_enrollments = Enrollments::find()
            .filter(class_enrollments::Column::ClassId.in_subquery(own_class_ids(teacher_id)))
            .filter(class_enrollments::Column::Status.eq(EnrollmentStatus::PENDING))
            .count(&self.db)
            .await
            .map_err(db_error(ctx))?;

        let upcoming_meetings = scoped_meetings(&MeetingListQuery {
            teacher_id: Some(teacher_id),
            upcoming_after: Some(now),
            ..Default::default()
        })
        .count(&self.db)
        .await
        .map_err(db_error(ctx))?;

        Ok(TeacherDashboard {
            classes: classes as i64,
            assignments: assignments as i64,
            submissions_to_grade: submissions_to_grade as i64,
            pending_enrollments: pending_enrollments as i64,
            upcoming_meetings: upcoming_meetings as i64,
        })
    }

    pub async fn student_dashboard_impl(
        &self,
        student_id: i64,
        now: DateTime<Utc>,
    ) -> Result<StudentDashboard> {
        let ctx = "Failed to build student dashboard";

        let classes = Enrollments::find()
            .filter(class_enrollments::Column::StudentId.eq(student_id))
            .filter(class_enrollments::Column::Status.eq(EnrollmentStatus::ACTIVE))
            .count(&self.db)
            .await
            .map_err(db_error(ctx))?;

        let submitted = Submissions::find()
            .select_only()
            .column(assignment_submissions::Column::AssignmentId)
            .filter(assignment_submissions::Column::StudentId.eq(student_id))
            .into_query();
        let horizon = now + TimeDelta::days(DUE_SOON_DAYS);
        let assignments_due_soon = Assignments::find()
            .filter(assignments::Column::ClassId.in_subquery(enrolled_class_ids(student_id)))
            .filter(assignments::Column::DueDate.gt(now.timestamp()))
            .filter(assignments::Column::DueDate.lte(horizon.timestamp()))
            .filter(assignments::Column::Id.not_in_subquery(submitted))
            .count(&self.db)
            .await
            .map_err(db_error(ctx))?;

        let graded_submissions = Submissions::find()
            .filter(assignment_submissions::Column::StudentId.eq(student_id))
            .filter(assignment_submissions::Column::Status.eq(SubmissionStatus::Graded.as_str()))
            .count(&self.db)
            .await
            .map_err(db_error(ctx))?;

        let upcoming_meetings = scoped_meetings(&MeetingListQuery {
            student_id: Some(student_id),
            upcoming_after: Some(now),
            ..Default::default()
        })
        .count(&self.db)
        .await
        .map_err(db_error(ctx))?;

        Ok(StudentDashboard {
            classes: classes as i64,
            assignments_due_soon: assignments_due_soon as i64,
            graded_submissions: graded_submissions as i64,
            upcoming_meetings: upcoming_meetings as i64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::assignments::tests::input;
    use super::super::meetings::tests::new_meeting;
    use super::super::test_support;
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_dashboards_reflect_activity() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let _admin = test_support::user(&storage, "admin1", UserRole::Admin).await;
        let teacher = test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        let s1 = test_support::user(&storage, "student1", UserRole::Student).await;
        let s2 = test_support::user(&storage, "student2", UserRole::Student).await;
        let class = test_support::class(&storage, teacher.id, None).await;
        storage
            .enroll_student_impl(class.id, s1.id, EnrollmentStatus::Active)
            .await
            .expect("enroll");
        storage
            .enroll_student_impl(class.id, s2.id, EnrollmentStatus::Pending)
            .await
            .expect("request");

        let soon = storage
            .create_assignment_impl(teacher.id, input(class.id, "Essay", Duration::days(2)))
            .await
            .expect("create");
        storage
            .create_assignment_impl(teacher.id, input(class.id, "Project", Duration::days(30)))
            .await
            .expect("create");
        storage
            .create_meeting_impl(new_meeting(class.id, teacher.id, Duration::days(1)))
            .await
            .expect("meeting");

        let now = Utc::now();
        let student = storage.student_dashboard_impl(s1.id, now).await.expect("student");
        assert_eq!(student.classes, 1);
        assert_eq!(student.assignments_due_soon, 1);
        assert_eq!(student.upcoming_meetings, 1);

        storage
            .submit_assignment_impl(soon.id, s1.id, Some("done".into()), soon.due_date)
            .await
            .expect("submit");
        let student = storage.student_dashboard_impl(s1.id, now).await.expect("student");
        assert_eq!(student.assignments_due_soon, 0);

        let teacher_view = storage
            .teacher_dashboard_impl(teacher.id, now)
            .await
            .expect("teacher");
        assert_eq!(teacher_view.classes, 1);
        assert_eq!(teacher_view.assignments, 2);
        assert_eq!(teacher_view.submissions_to_grade, 1);
        assert_eq!(teacher_view.pending_enrollments, 1);

        let admin_view = storage.admin_dashboard_impl(now).await.expect("admin");
        assert_eq!(admin_view.total_users, 4);
        assert_eq!(admin_view.students, 2);
        assert_eq!(admin_view.admins, 1);
        assert_eq!(admin_view.upcoming_meetings, 1);
    }
}
