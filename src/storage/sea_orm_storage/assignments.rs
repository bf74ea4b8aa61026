use super::{SeaOrmStorage, db_error, fetch_page};
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::prelude::{AssignmentFiles, Classes, Enrollments, SubmissionFiles, Submissions};
use crate::entity::{
    assignment_files, assignment_submissions, class_enrollments, classes, submission_files,
};
use crate::errors::Result;
use crate::models::{
    PaginationQuery,
    assignments::{
        entities::Assignment,
        requests::{AssignmentInput, AssignmentListQuery},
        responses::AssignmentListResponse,
    },
    enrollments::entities::EnrollmentStatus,
};
use crate::storage::OrphanedKeys;
use crate::utils::sql::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, QueryTrait, Set, TransactionTrait,
};

/// 作业被删除后遗留的附件存储键（作业附件和提交附件）
pub(crate) async fn assignment_storage_keys<C: ConnectionTrait>(
    db: &C,
    assignment_ids: &[i64],
) -> Result<OrphanedKeys> {
    if assignment_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut keys: Vec<String> = AssignmentFiles::find()
        .select_only()
        .column(assignment_files::Column::StorageKey)
        .filter(assignment_files::Column::AssignmentId.is_in(assignment_ids.iter().copied()))
        .into_tuple()
        .all(db)
        .await
        .map_err(db_error("Failed to collect assignment files"))?;

    let submissions = Submissions::find()
        .select_only()
        .column(assignment_submissions::Column::Id)
        .filter(assignment_submissions::Column::AssignmentId.is_in(assignment_ids.iter().copied()))
        .into_query();
    let submitted: Vec<String> = SubmissionFiles::find()
        .select_only()
        .column(submission_files::Column::StorageKey)
        .filter(submission_files::Column::SubmissionId.in_subquery(submissions))
        .into_tuple()
        .all(db)
        .await
        .map_err(db_error("Failed to collect submission files"))?;

    keys.extend(submitted);
    Ok(keys)
}

impl SeaOrmStorage {
    /// teacher_id 为班级所属教师
    pub async fn create_assignment_impl(
        &self,
        teacher_id: i64,
        input: AssignmentInput,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            class_id: Set(input.class_id),
            teacher_id: Set(teacher_id),
            title: Set(input.title),
            description: Set(input.description),
            due_date: Set(input.due_date.timestamp()),
            points: Set(input.points),
            assignment_type: Set(input.assignment_type.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_error("Failed to create assignment"))?;

        Ok(result.into_assignment())
    }

    pub async fn get_assignment_by_id_impl(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(db_error("Failed to query assignment"))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 分页列出作业，按截止时间倒序
    pub async fn list_assignments_with_pagination_impl(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        let (page, size) = PaginationQuery::normalized(query.page, query.size);

        let mut select = Assignments::find();

        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(teacher_id) = query.teacher_id {
            let own_classes = Classes::find()
                .select_only()
                .column(classes::Column::Id)
                .filter(classes::Column::TeacherId.eq(teacher_id))
                .into_query();
            select = select.filter(Column::ClassId.in_subquery(own_classes));
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
        if let Some(search) = query.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            select = select.filter(Column::Title.like(contains_pattern(search)));
        }

        let paginator = select
            .order_by_desc(Column::DueDate)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let (assignments, pagination) =
            fetch_page(paginator, page, size, "Failed to list assignments").await?;

        Ok(AssignmentListResponse {
            items: assignments
                .into_iter()
                .map(|m| m.into_assignment())
                .collect(),
            pagination,
        })
    }

    /// 整体替换可编辑字段
    pub async fn update_assignment_impl(
        &self,
        assignment_id: i64,
        teacher_id: i64,
        input: AssignmentInput,
    ) -> Result<Option<Assignment>> {
        let Some(existing) = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(db_error("Failed to query assignment"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.class_id = Set(input.class_id);
        model.teacher_id = Set(teacher_id);
        model.title = Set(input.title);
        model.description = Set(input.description);
        model.due_date = Set(input.due_date.timestamp());
        model.points = Set(input.points);
        model.assignment_type = Set(input.assignment_type.to_string());
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&self.db)
            .await
            .map_err(db_error("Failed to update assignment"))?;

        Ok(Some(updated.into_assignment()))
    }

    /// 删除作业，附件与提交由外键级联
    pub async fn delete_assignment_impl(&self, assignment_id: i64) -> Result<Option<OrphanedKeys>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        if Assignments::find_by_id(assignment_id)
            .one(&txn)
            .await
            .map_err(db_error("Failed to query assignment"))?
            .is_none()
        {
            return Ok(None);
        }

        let keys = assignment_storage_keys(&txn, &[assignment_id]).await?;

        Assignments::delete_by_id(assignment_id)
            .exec(&txn)
            .await
            .map_err(db_error("Failed to delete assignment"))?;

        txn.commit()
            .await
            .map_err(db_error("Failed to commit assignment deletion"))?;

        Ok(Some(keys))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::super::test_support;
    use super::*;
    use crate::models::assignments::entities::AssignmentType;
    use crate::models::files::entities::NewFileRecord;
    use crate::models::users::entities::UserRole;
    use chrono::{Duration, Utc};

    pub(crate) fn input(class_id: i64, title: &str, due_in: Duration) -> AssignmentInput {
        AssignmentInput {
            class_id,
            title: title.to_string(),
            description: "Read chapter 3".to_string(),
            due_date: Utc::now() + due_in,
            points: 100,
            assignment_type: AssignmentType::Homework,
        }
    }

    fn file(key: &str) -> NewFileRecord {
        NewFileRecord {
            file_name: "notes.pdf".to_string(),
            storage_key: key.to_string(),
            file_size: 10,
            content_type: "application/pdf".to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_scoped_by_teacher_and_student() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let t1 = test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        let t2 = test_support::user(&storage, "teacher2", UserRole::Teacher).await;
        let student = test_support::user(&storage, "student1", UserRole::Student).await;
        let c1 = test_support::class(&storage, t1.id, None).await;
        let c2 = test_support::class(&storage, t2.id, None).await;
        storage
            .enroll_student_impl(c1.id, student.id, EnrollmentStatus::Active)
            .await
            .expect("enroll");

        storage
            .create_assignment_impl(t1.id, input(c1.id, "Lab_1 report", Duration::days(3)))
            .await
            .expect("create");
        storage
            .create_assignment_impl(t2.id, input(c2.id, "Essay", Duration::days(3)))
            .await
            .expect("create");

        let mine = storage
            .list_assignments_with_pagination_impl(AssignmentListQuery {
                teacher_id: Some(t2.id),
                ..Default::default()
            })
            .await
            .expect("list");
        assert_eq!(mine.items.len(), 1);
        assert_eq!(mine.items[0].title, "Essay");

        let visible = storage
            .list_assignments_with_pagination_impl(AssignmentListQuery {
                student_id: Some(student.id),
                ..Default::default()
            })
            .await
            .expect("list");
        assert_eq!(visible.items.len(), 1);
        assert_eq!(visible.items[0].class_id, c1.id);

        // 下划线按字面匹配
        let searched = storage
            .list_assignments_with_pagination_impl(AssignmentListQuery {
                search: Some("_1".into()),
                ..Default::default()
            })
            .await
            .expect("search");
        assert_eq!(searched.pagination.total, 1);
    }

    #[tokio::test]
    async fn test_delete_returns_orphaned_keys() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let teacher = test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        let student = test_support::user(&storage, "student1", UserRole::Student).await;
        let class = test_support::class(&storage, teacher.id, None).await;
        let assignment = storage
            .create_assignment_impl(teacher.id, input(class.id, "Essay", Duration::days(1)))
            .await
            .expect("create");
        storage
            .create_assignment_file_impl(assignment.id, teacher.id, file("a-key.pdf"))
            .await
            .expect("attach");
        let submission = storage
            .submit_assignment_impl(assignment.id, student.id, Some("done".into()), assignment.due_date)
            .await
            .expect("submit");
        storage
            .create_submission_file_impl(submission.id, file("s-key.pdf"))
            .await
            .expect("attach");

        let mut keys = storage
            .delete_assignment_impl(assignment.id)
            .await
            .expect("delete")
            .expect("existed");
        keys.sort();
        assert_eq!(keys, vec!["a-key.pdf".to_string(), "s-key.pdf".to_string()]);
        assert!(
            storage
                .get_submission_by_id_impl(submission.id)
                .await
                .expect("get")
                .is_none()
        );
        assert!(storage.delete_assignment_impl(assignment.id).await.expect("delete").is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let teacher = test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        let class = test_support::class(&storage, teacher.id, None).await;
        let created = storage
            .create_assignment_impl(teacher.id, input(class.id, "Essay", Duration::days(1)))
            .await
            .expect("create");

        let mut next = input(class.id, "Final exam", Duration::days(10));
        next.points = 50;
        next.assignment_type = AssignmentType::Exam;
        let updated = storage
            .update_assignment_impl(created.id, teacher.id, next)
            .await
            .expect("update")
            .expect("exists");

        assert_eq!(updated.title, "Final exam");
        assert_eq!(updated.points, 50);
        assert_eq!(updated.assignment_type, AssignmentType::Exam);
        assert!(updated.due_date > created.due_date);
    }
}
