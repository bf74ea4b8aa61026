use super::{SeaOrmStorage, db_error, fetch_page};
use crate::entity::assignment_submissions::{ActiveModel, Column, Entity as Submissions};
use crate::entity::prelude::Users;
use crate::errors::{LmsError, Result};
use crate::models::{
    PaginationQuery,
    submissions::{
        entities::{Submission, SubmissionDetail, SubmissionStatus, SubmissionWithStudent},
        requests::{GradeInput, SubmissionListQuery},
        responses::SubmissionListResponse,
    },
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 每名学生每个作业一条提交；评分前可覆盖，评分后返回冲突
    pub async fn submit_assignment_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
        content: Option<String>,
        due_date: DateTime<Utc>,
    ) -> Result<Submission> {
        let now = Utc::now();
        let status = SubmissionStatus::for_submission_time(now, due_date);

        let txn = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        let existing = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&txn)
            .await
            .map_err(db_error("Failed to query submission"))?;

        let saved = match existing {
            Some(row) if row.status == SubmissionStatus::Graded.as_str() => {
                return Err(LmsError::conflict(format!(
                    "Submission {} has already been graded",
                    row.id
                )));
            }
            Some(row) => {
                let mut model: ActiveModel = row.into();
                model.content = Set(content);
                model.status = Set(status.to_string());
                model.submitted_at = Set(now.timestamp());
                model.updated_at = Set(now.timestamp());
                model
                    .update(&txn)
                    .await
                    .map_err(db_error("Failed to update submission"))?
            }
            None => ActiveModel {
                assignment_id: Set(assignment_id),
                student_id: Set(student_id),
                content: Set(content),
                status: Set(status.to_string()),
                submitted_at: Set(now.timestamp()),
                updated_at: Set(now.timestamp()),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(db_error("Failed to create submission"))?,
        };

        txn.commit()
            .await
            .map_err(db_error("Failed to commit submission"))?;

        Ok(saved.into_submission())
    }

    pub async fn get_submission_by_id_impl(&self, submission_id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(db_error("Failed to query submission"))?;

        Ok(result.map(|m| m.into_submission()))
    }

    pub async fn get_submission_detail_impl(
        &self,
        submission_id: i64,
    ) -> Result<Option<SubmissionDetail>> {
        let Some((submission, student)) = Submissions::find_by_id(submission_id)
            .find_also_related(Users)
            .one(&self.db)
            .await
            .map_err(db_error("Failed to query submission"))?
        else {
            return Ok(None);
        };

        let files = self.list_submission_files_impl(submission_id).await?;

        Ok(Some(SubmissionDetail {
            submission: submission.into_submission(),
            student: student.map(|s| s.into_summary()),
            files,
        }))
    }

    pub async fn get_submission_by_assignment_and_student_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(db_error("Failed to query submission"))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 分页列出某作业的提交，附带学生信息
    pub async fn list_submissions_with_pagination_impl(
        &self,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse> {
        let (page, size) = PaginationQuery::normalized(query.page, query.size);

        let mut select = Submissions::find().filter(Column::AssignmentId.eq(query.assignment_id));
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }

        let paginator = select
            .find_also_related(Users)
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let (rows, pagination) =
            fetch_page(paginator, page, size, "Failed to list submissions").await?;

        Ok(SubmissionListResponse {
            items: rows
                .into_iter()
                .map(|(submission, student)| SubmissionWithStudent {
                    submission: submission.into_submission(),
                    student: student.map(|s| s.into_summary()),
                })
                .collect(),
            pagination,
        })
    }

    /// 评分（可重复评分）
    pub async fn grade_submission_impl(
        &self,
        submission_id: i64,
        grade: GradeInput,
    ) -> Result<Option<Submission>> {
        let Some(existing) = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(db_error("Failed to query submission"))?
        else {
            return Ok(None);
        };

        let now = Utc::now().timestamp();
        let mut model: ActiveModel = existing.into();
        model.grade = Set(Some(grade.grade));
        model.feedback = Set(grade.feedback);
        model.graded_by = Set(Some(grade.graded_by));
        model.graded_at = Set(Some(now));
        model.status = Set(SubmissionStatus::Graded.to_string());
        model.updated_at = Set(now);

        let updated = model
            .update(&self.db)
            .await
            .map_err(db_error("Failed to grade submission"))?;

        Ok(Some(updated.into_submission()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::assignments::tests::input;
    use super::super::test_support;
    use super::*;
    use crate::models::users::entities::UserRole;
    use chrono::Duration;

    #[tokio::test]
    async fn test_resubmit_until_graded() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let teacher = test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        let student = test_support::user(&storage, "student1", UserRole::Student).await;
        let class = test_support::class(&storage, teacher.id, None).await;
        let assignment = storage
            .create_assignment_impl(teacher.id, input(class.id, "Essay", Duration::days(1)))
            .await
            .expect("create");

        let first = storage
            .submit_assignment_impl(assignment.id, student.id, Some("v1".into()), assignment.due_date)
            .await
            .expect("submit");
        assert_eq!(first.status, SubmissionStatus::Submitted);

        let second = storage
            .submit_assignment_impl(assignment.id, student.id, Some("v2".into()), assignment.due_date)
            .await
            .expect("resubmit");
        assert_eq!(second.id, first.id);
        assert_eq!(second.content.as_deref(), Some("v2"));

        let graded = storage
            .grade_submission_impl(
                first.id,
                GradeInput {
                    grade: 88.5,
                    feedback: Some("Good".into()),
                    graded_by: teacher.id,
                },
            )
            .await
            .expect("grade")
            .expect("exists");
        assert_eq!(graded.status, SubmissionStatus::Graded);
        assert_eq!(graded.grade, Some(88.5));
        assert_eq!(graded.graded_by, Some(teacher.id));
        assert!(graded.graded_at.is_some());

        let err = storage
            .submit_assignment_impl(assignment.id, student.id, Some("v3".into()), assignment.due_date)
            .await
            .expect_err("graded");
        assert!(matches!(err, LmsError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_late_submission_and_listing() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let teacher = test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        let s1 = test_support::user(&storage, "student1", UserRole::Student).await;
        let s2 = test_support::user(&storage, "student2", UserRole::Student).await;
        let class = test_support::class(&storage, teacher.id, None).await;
        let assignment = storage
            .create_assignment_impl(teacher.id, input(class.id, "Essay", -Duration::hours(1)))
            .await
            .expect("create");

        let late = storage
            .submit_assignment_impl(assignment.id, s1.id, None, assignment.due_date)
            .await
            .expect("submit");
        assert_eq!(late.status, SubmissionStatus::Late);
        storage
            .submit_assignment_impl(assignment.id, s2.id, Some("x".into()), assignment.due_date)
            .await
            .expect("submit");

        let own = storage
            .list_submissions_with_pagination_impl(SubmissionListQuery {
                assignment_id: assignment.id,
                student_id: Some(s2.id),
                ..Default::default()
            })
            .await
            .expect("list");
        assert_eq!(own.items.len(), 1);
        assert_eq!(own.items[0].student.as_ref().map(|s| s.id), Some(s2.id));

        let all = storage
            .list_submissions_with_pagination_impl(SubmissionListQuery {
                assignment_id: assignment.id,
                status: Some(SubmissionStatus::Late),
                ..Default::default()
            })
            .await
            .expect("list");
        assert_eq!(all.pagination.total, 2);

        let detail = storage
            .get_submission_detail_impl(late.id)
            .await
            .expect("detail")
            .expect("exists");
        assert!(detail.files.is_empty());
        assert_eq!(detail.student.map(|s| s.username), Some("student1".into()));
    }
}
