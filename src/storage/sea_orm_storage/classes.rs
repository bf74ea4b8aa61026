use super::{SeaOrmStorage, db_error, fetch_page};
use crate::entity::class_enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::entity::prelude::Users;
use crate::entity::{assignments, prelude::Assignments};
use crate::errors::{LmsError, Result};
use crate::models::{
    PaginationQuery,
    classes::{
        entities::{Class, ClassDetail},
        requests::{ClassListQuery, NewClass, UpdateClassRequest},
        responses::ClassListResponse,
    },
    enrollments::entities::EnrollmentStatus,
};
use crate::storage::OrphanedKeys;
use crate::utils::sql::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, Set, TransactionTrait,
};

/// 班级有效（active）选课人数
pub(super) async fn active_enrollment_count<C: ConnectionTrait>(
    db: &C,
    class_id: i64,
) -> Result<u64> {
    Enrollments::find()
        .filter(EnrollmentColumn::ClassId.eq(class_id))
        .filter(EnrollmentColumn::Status.eq(EnrollmentStatus::ACTIVE))
        .count(db)
        .await
        .map_err(db_error("Failed to count enrollments"))
}

impl SeaOrmStorage {
    pub async fn create_class_impl(&self, class: NewClass) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            teacher_id: Set(class.teacher_id),
            name: Set(class.name.trim().to_string()),
            description: Set(class.description),
            subject: Set(class.subject),
            capacity: Set(class.capacity),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_error("Failed to create class"))?;

        Ok(result.into_class())
    }

    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(db_error("Failed to query class"))?;

        Ok(result.map(|m| m.into_class()))
    }

    pub async fn get_class_detail_impl(&self, class_id: i64) -> Result<Option<ClassDetail>> {
        let Some((class, teacher)) = Classes::find_by_id(class_id)
            .find_also_related(Users)
            .one(&self.db)
            .await
            .map_err(db_error("Failed to query class"))?
        else {
            return Ok(None);
        };

        let enrollment_count = active_enrollment_count(&self.db, class_id).await?;

        Ok(Some(ClassDetail {
            class: class.into_class(),
            teacher: teacher.map(|t| t.into_summary()),
            enrollment_count: enrollment_count as i64,
        }))
    }

    pub async fn count_active_enrollments_impl(&self, class_id: i64) -> Result<u64> {
        active_enrollment_count(&self.db, class_id).await
    }

    /// 分页列出班级
    pub async fn list_classes_with_pagination_impl(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        let (page, size) = PaginationQuery::normalized(query.page, query.size);

        let mut select = Classes::find();

        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(student_id) = query.student_id {
            let enrolled = Enrollments::find()
                .select_only()
                .column(EnrollmentColumn::ClassId)
                .filter(EnrollmentColumn::StudentId.eq(student_id))
                .filter(EnrollmentColumn::Status.eq(EnrollmentStatus::ACTIVE))
                .into_query();
            select = select.filter(Column::Id.in_subquery(enrolled));
        }
        if let Some(search) = query.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            select = select.filter(
                Condition::any()
                    .add(Column::Name.like(contains_pattern(search)))
                    .add(Column::Subject.like(contains_pattern(search))),
            );
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let (classes, pagination) =
            fetch_page(paginator, page, size, "Failed to list classes").await?;

        Ok(ClassListResponse {
            items: classes.into_iter().map(|m| m.into_class()).collect(),
            pagination,
        })
    }

    /// 部分更新；新容量不能低于当前有效人数
    pub async fn update_class_impl(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        let Some(existing) = Classes::find_by_id(class_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_error("Failed to query class"))?
        else {
            return Ok(None);
        };

        if let Some(Some(capacity)) = update.capacity {
            let active = active_enrollment_count(&txn, class_id).await?;
            if (capacity.max(0) as u64) < active {
                return Err(LmsError::capacity_exceeded(format!(
                    "Capacity {capacity} is below the {active} active enrollments"
                )));
            }
        }

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(chrono::Utc::now().timestamp());
        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(subject) = update.subject {
            model.subject = Set(Some(subject));
        }
        // Some(None) 取消容量限制
        if let Some(capacity) = update.capacity {
            model.capacity = Set(capacity);
        }

        let updated = model
            .update(&txn)
            .await
            .map_err(db_error("Failed to update class"))?;

        txn.commit()
            .await
            .map_err(db_error("Failed to commit class update"))?;

        Ok(Some(updated.into_class()))
    }

    /// 删除班级；选课记录显式删除，作业、提交、会议由外键级联
    pub async fn delete_class_impl(&self, class_id: i64) -> Result<Option<OrphanedKeys>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        if Classes::find_by_id(class_id)
            .one(&txn)
            .await
            .map_err(db_error("Failed to query class"))?
            .is_none()
        {
            return Ok(None);
        }

        let assignment_ids: Vec<i64> = Assignments::find()
            .select_only()
            .column(assignments::Column::Id)
            .filter(assignments::Column::ClassId.eq(class_id))
            .into_tuple()
            .all(&txn)
            .await
            .map_err(db_error("Failed to collect assignments"))?;
        let keys = super::assignments::assignment_storage_keys(&txn, &assignment_ids).await?;

        Enrollments::delete_many()
            .filter(EnrollmentColumn::ClassId.eq(class_id))
            .exec(&txn)
            .await
            .map_err(db_error("Failed to delete enrollments"))?;

        Classes::delete_by_id(class_id)
            .exec(&txn)
            .await
            .map_err(db_error("Failed to delete class"))?;

        txn.commit()
            .await
            .map_err(db_error("Failed to commit class deletion"))?;

        Ok(Some(keys))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support;
    use super::*;
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_delete_class_removes_enrollments() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let teacher = test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        let student = test_support::user(&storage, "student1", UserRole::Student).await;
        let class = test_support::class(&storage, teacher.id, None).await;
        storage
            .enroll_student_impl(class.id, student.id, EnrollmentStatus::Active)
            .await
            .expect("enroll");

        let keys = storage
            .delete_class_impl(class.id)
            .await
            .expect("delete")
            .expect("class existed");
        assert!(keys.is_empty());

        let remaining = Enrollments::find()
            .filter(EnrollmentColumn::ClassId.eq(class.id))
            .count(&storage.db)
            .await
            .expect("count");
        assert_eq!(remaining, 0);
        assert!(storage.get_class_by_id_impl(class.id).await.expect("get").is_none());
    }

    #[tokio::test]
    async fn test_capacity_cannot_drop_below_active_count() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let teacher = test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        let s1 = test_support::user(&storage, "student1", UserRole::Student).await;
        let s2 = test_support::user(&storage, "student2", UserRole::Student).await;
        let class = test_support::class(&storage, teacher.id, Some(5)).await;
        for s in [&s1, &s2] {
            storage
                .enroll_student_impl(class.id, s.id, EnrollmentStatus::Active)
                .await
                .expect("enroll");
        }

        let err = storage
            .update_class_impl(
                class.id,
                UpdateClassRequest {
                    capacity: Some(Some(1)),
                    ..Default::default()
                },
            )
            .await
            .expect_err("below active count");
        assert!(matches!(err, LmsError::CapacityExceeded(_)));

        let updated = storage
            .update_class_impl(
                class.id,
                UpdateClassRequest {
                    capacity: Some(Some(2)),
                    name: Some("Organic Chemistry".into()),
                    ..Default::default()
                },
            )
            .await
            .expect("update")
            .expect("exists");
        assert_eq!(updated.capacity, Some(2));
        assert_eq!(updated.name, "Organic Chemistry");

        let untouched = storage
            .update_class_impl(
                class.id,
                UpdateClassRequest {
                    subject: Some("Chemistry".into()),
                    ..Default::default()
                },
            )
            .await
            .expect("update")
            .expect("exists");
        assert_eq!(untouched.capacity, Some(2));

        let unlimited = storage
            .update_class_impl(
                class.id,
                UpdateClassRequest {
                    capacity: Some(None),
                    ..Default::default()
                },
            )
            .await
            .expect("update")
            .expect("exists");
        assert_eq!(unlimited.capacity, None);
    }

    #[tokio::test]
    async fn test_list_classes_by_role_scope() {
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
            .enroll_student_impl(c2.id, student.id, EnrollmentStatus::Pending)
            .await
            .expect("request");

        let own = storage
            .list_classes_with_pagination_impl(ClassListQuery {
                teacher_id: Some(t2.id),
                ..Default::default()
            })
            .await
            .expect("list");
        assert_eq!(own.items.len(), 1);
        assert_eq!(own.items[0].id, c2.id);

        // 待审批的班级不出现在学生列表中
        let enrolled = storage
            .list_classes_with_pagination_impl(ClassListQuery {
                student_id: Some(student.id),
                ..Default::default()
            })
            .await
            .expect("list");
        assert_eq!(enrolled.items.len(), 1);
        assert_eq!(enrolled.items[0].id, c1.id);

        let detail = storage
            .get_class_detail_impl(c1.id)
            .await
            .expect("detail")
            .expect("exists");
        assert_eq!(detail.enrollment_count, 1);
        assert_eq!(detail.teacher.map(|t| t.id), Some(t1.id));
    }
}
