use super::classes::active_enrollment_count;
use super::{SeaOrmStorage, db_error, fetch_page};
use crate::entity::class_enrollments::{ActiveModel, Column, Entity as Enrollments};
use crate::entity::prelude::{Classes, Users};
use crate::errors::{LmsError, Result};
use crate::models::{
    PaginationQuery,
    enrollments::{
        entities::{Enrollment, EnrollmentStatus, EnrollmentWithStudent},
        requests::EnrollmentListQuery,
        responses::EnrollmentListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

/// 锁定班级行并确认还有空位
async fn ensure_room<C: ConnectionTrait>(db: &C, class_id: i64) -> Result<()> {
    let class = Classes::find_by_id(class_id)
        .lock_exclusive()
        .one(db)
        .await
        .map_err(db_error("Failed to query class"))?
        .ok_or_else(|| LmsError::not_found(format!("Class {class_id} not found")))?
        .into_class();

    let active = active_enrollment_count(db, class_id).await?;
    if !class.has_room_for(active) {
        return Err(LmsError::capacity_exceeded(format!(
            "Class {class_id} is full ({active} active enrollments)"
        )));
    }
    Ok(())
}

impl SeaOrmStorage {
    /// 新建选课记录；active 直接占用名额，pending 在班级已满时同样拒绝
    pub async fn enroll_student_impl(
        &self,
        class_id: i64,
        student_id: i64,
        status: EnrollmentStatus,
    ) -> Result<Enrollment> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        ensure_room(&txn, class_id).await?;

        let duplicate = Enrollments::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&txn)
            .await
            .map_err(db_error("Failed to query enrollment"))?;
        if let Some(existing) = duplicate {
            return Err(LmsError::conflict(format!(
                "Student {student_id} already has a {} enrollment in class {class_id}",
                existing.status
            )));
        }

        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            class_id: Set(class_id),
            student_id: Set(student_id),
            status: Set(status.to_string()),
            enrolled_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        // 并发插入同一对时由唯一索引兜底，db_error 会保留 Conflict
        let result = model
            .insert(&txn)
            .await
            .map_err(db_error("Failed to create enrollment"))?;

        txn.commit()
            .await
            .map_err(db_error("Failed to commit enrollment"))?;

        Ok(result.into_enrollment())
    }

    pub async fn get_enrollment_by_id_impl(&self, enrollment_id: i64) -> Result<Option<Enrollment>> {
        let result = Enrollments::find_by_id(enrollment_id)
            .one(&self.db)
            .await
            .map_err(db_error("Failed to query enrollment"))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    pub async fn get_enrollment_impl(
        &self,
        class_id: i64,
        student_id: i64,
    ) -> Result<Option<Enrollment>> {
        let result = Enrollments::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(db_error("Failed to query enrollment"))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    pub async fn list_enrollments_with_pagination_impl(
        &self,
        class_id: i64,
        query: EnrollmentListQuery,
    ) -> Result<EnrollmentListResponse> {
        let (page, size) = PaginationQuery::normalized(query.page, query.size);

        let mut select = Enrollments::find().filter(Column::ClassId.eq(class_id));
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }

        let paginator = select
            .find_also_related(Users)
            .order_by_desc(Column::EnrolledAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let (rows, pagination) =
            fetch_page(paginator, page, size, "Failed to list enrollments").await?;

        Ok(EnrollmentListResponse {
            items: rows
                .into_iter()
                .map(|(enrollment, student)| EnrollmentWithStudent {
                    enrollment: enrollment.into_enrollment(),
                    student: student.map(|s| s.into_summary()),
                })
                .collect(),
            pagination,
        })
    }

    /// 审批通过：pending → active，名额在同一事务内检查
    pub async fn approve_enrollment_impl(&self, enrollment_id: i64) -> Result<Enrollment> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        let existing = Enrollments::find_by_id(enrollment_id)
            .one(&txn)
            .await
            .map_err(db_error("Failed to query enrollment"))?
            .ok_or_else(|| LmsError::not_found(format!("Enrollment {enrollment_id} not found")))?;

        if existing.status != EnrollmentStatus::PENDING {
            return Err(LmsError::validation(format!(
                "Enrollment {enrollment_id} is not pending"
            )));
        }

        ensure_room(&txn, existing.class_id).await?;

        let mut model: ActiveModel = existing.into();
        model.status = Set(EnrollmentStatus::Active.to_string());
        model.updated_at = Set(chrono::Utc::now().timestamp());
        let updated = model
            .update(&txn)
            .await
            .map_err(db_error("Failed to approve enrollment"))?;

        txn.commit()
            .await
            .map_err(db_error("Failed to commit enrollment approval"))?;

        Ok(updated.into_enrollment())
    }

    pub async fn delete_enrollment_impl(&self, enrollment_id: i64) -> Result<bool> {
        let result = Enrollments::delete_by_id(enrollment_id)
            .exec(&self.db)
            .await
            .map_err(db_error("Failed to delete enrollment"))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support;
    use super::*;
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_duplicate_enrollment_conflicts() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let teacher = test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        let student = test_support::user(&storage, "student1", UserRole::Student).await;
        let class = test_support::class(&storage, teacher.id, None).await;

        storage
            .enroll_student_impl(class.id, student.id, EnrollmentStatus::Pending)
            .await
            .expect("request");

        for status in [EnrollmentStatus::Active, EnrollmentStatus::Pending] {
            let err = storage
                .enroll_student_impl(class.id, student.id, status)
                .await
                .expect_err("duplicate");
            assert!(matches!(err, LmsError::Conflict(_)));
        }
    }

    #[tokio::test]
    async fn test_enroll_into_missing_class() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let student = test_support::user(&storage, "student1", UserRole::Student).await;

        let err = storage
            .enroll_student_impl(999, student.id, EnrollmentStatus::Active)
            .await
            .expect_err("missing class");
        assert!(matches!(err, LmsError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_capacity_counts_only_active() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let teacher = test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        let s1 = test_support::user(&storage, "student1", UserRole::Student).await;
        let s2 = test_support::user(&storage, "student2", UserRole::Student).await;
        let s3 = test_support::user(&storage, "student3", UserRole::Student).await;
        let class = test_support::class(&storage, teacher.id, Some(1)).await;

        // 待审批不占名额
        let pending = storage
            .enroll_student_impl(class.id, s1.id, EnrollmentStatus::Pending)
            .await
            .expect("request");
        storage
            .enroll_student_impl(class.id, s2.id, EnrollmentStatus::Active)
            .await
            .expect("enroll");

        let err = storage
            .enroll_student_impl(class.id, s3.id, EnrollmentStatus::Active)
            .await
            .expect_err("full");
        assert!(matches!(err, LmsError::CapacityExceeded(_)));

        let err = storage
            .enroll_student_impl(class.id, s3.id, EnrollmentStatus::Pending)
            .await
            .expect_err("full class rejects requests");
        assert!(matches!(err, LmsError::CapacityExceeded(_)));

        let err = storage
            .approve_enrollment_impl(pending.id)
            .await
            .expect_err("approval over capacity");
        assert!(matches!(err, LmsError::CapacityExceeded(_)));
        assert_eq!(storage.count_active_enrollments_impl(class.id).await.ok(), Some(1));
    }

    #[tokio::test]
    async fn test_approve_and_withdraw() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let teacher = test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        let student = test_support::user(&storage, "student1", UserRole::Student).await;
        let class = test_support::class(&storage, teacher.id, Some(3)).await;

        let pending = storage
            .enroll_student_impl(class.id, student.id, EnrollmentStatus::Pending)
            .await
            .expect("request");
        let approved = storage
            .approve_enrollment_impl(pending.id)
            .await
            .expect("approve");
        assert_eq!(approved.status, EnrollmentStatus::Active);

        let err = storage
            .approve_enrollment_impl(pending.id)
            .await
            .expect_err("already active");
        assert!(matches!(err, LmsError::Validation(_)));

        let listed = storage
            .list_enrollments_with_pagination_impl(
                class.id,
                EnrollmentListQuery {
                    status: Some(EnrollmentStatus::Active),
                    ..Default::default()
                },
            )
            .await
            .expect("list");
        assert_eq!(listed.items.len(), 1);
        assert_eq!(
            listed.items[0].student.as_ref().map(|s| s.username.as_str()),
            Some("student1")
        );

        assert!(storage.delete_enrollment_impl(pending.id).await.expect("delete"));
        assert!(!storage.delete_enrollment_impl(pending.id).await.expect("delete"));
    }
}
