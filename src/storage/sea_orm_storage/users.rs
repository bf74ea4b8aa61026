use super::{SeaOrmStorage, db_error, fetch_page};
use crate::entity::prelude::{AssignmentFiles, Assignments, Classes, SubmissionFiles, Submissions};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::entity::{assignment_files, assignment_submissions, assignments, classes, submission_files};
use crate::errors::Result;
use crate::models::{
    PaginationQuery,
    users::{
        entities::{User, UserStatus},
        requests::{NewUser, UserListQuery, UserUpdate},
        responses::UserListResponse,
    },
};
use crate::storage::OrphanedKeys;
use crate::utils::sql::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, user: NewUser) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(user.username),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            role: Set(user.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            full_name: Set(user.full_name),
            avatar_url: Set(user.avatar_url),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_error("Failed to create user"))?;

        Ok(result.into_user())
    }

    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("Failed to query user"))?;

        Ok(result.map(|m| m.into_user()))
    }

    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(db_error("Failed to query user"))?;

        Ok(result.map(|m| m.into_user()))
    }

    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_error("Failed to query user"))?;

        Ok(result.map(|m| m.into_user()))
    }

    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(db_error("Failed to query user"))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let (page, size) = PaginationQuery::normalized(query.page, query.size);

        let mut select = Users::find();

        if let Some(search) = query.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            select = select.filter(
                Condition::any()
                    .add(Column::Username.like(contains_pattern(search)))
                    .add(Column::Email.like(contains_pattern(search)))
                    .add(Column::FullName.like(contains_pattern(search))),
            );
        }
        if let Some(role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let (users, pagination) = fetch_page(paginator, page, size, "Failed to list users").await?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination,
        })
    }

    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_error("Failed to update last login"))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户信息，只写入提供的字段
    pub async fn update_user_impl(&self, id: i64, update: UserUpdate) -> Result<Option<User>> {
        if self.get_user_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(email) = update.email {
            model.email = Set(email);
        }
        if let Some(password_hash) = update.password_hash {
            model.password_hash = Set(password_hash);
        }
        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(full_name) = update.full_name {
            model.full_name = Set(Some(full_name));
        }
        if let Some(avatar_url) = update.avatar_url {
            model.avatar_url = Set(Some(avatar_url));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(db_error("Failed to update user"))?;

        Ok(Some(updated.into_user()))
    }

    /// 删除用户；外键级联删除其班级、选课、提交与偏好
    pub async fn delete_user_impl(&self, id: i64) -> Result<Option<OrphanedKeys>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        if Users::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_error("Failed to query user"))?
            .is_none()
        {
            return Ok(None);
        }

        let keys = user_storage_keys(&txn, id).await?;

        Users::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_error("Failed to delete user"))?;

        txn.commit()
            .await
            .map_err(db_error("Failed to commit user deletion"))?;

        Ok(Some(keys))
    }

    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(db_error("Failed to count users"))
    }
}

/// 删除用户后会失去记录的所有附件：
/// 其任教班级下作业的附件与提交附件、自己上传的作业附件、自己提交的附件
async fn user_storage_keys<C: ConnectionTrait>(db: &C, user_id: i64) -> Result<OrphanedKeys> {
    let class_ids = Classes::find()
        .select_only()
        .column(classes::Column::Id)
        .filter(classes::Column::TeacherId.eq(user_id))
        .into_query();
    let assignment_ids: Vec<i64> = Assignments::find()
        .select_only()
        .column(assignments::Column::Id)
        .filter(
            Condition::any()
                .add(assignments::Column::ClassId.in_subquery(class_ids))
                .add(assignments::Column::TeacherId.eq(user_id)),
        )
        .into_tuple()
        .all(db)
        .await
        .map_err(db_error("Failed to collect assignments"))?;

    let mut keys = super::assignments::assignment_storage_keys(db, &assignment_ids).await?;

    let uploaded: Vec<String> = AssignmentFiles::find()
        .select_only()
        .column(assignment_files::Column::StorageKey)
        .filter(assignment_files::Column::UploadedBy.eq(user_id))
        .into_tuple()
        .all(db)
        .await
        .map_err(db_error("Failed to collect uploaded files"))?;

    let own_submissions = Submissions::find()
        .select_only()
        .column(assignment_submissions::Column::Id)
        .filter(assignment_submissions::Column::StudentId.eq(user_id))
        .into_query();
    let submitted: Vec<String> = SubmissionFiles::find()
        .select_only()
        .column(submission_files::Column::StorageKey)
        .filter(submission_files::Column::SubmissionId.in_subquery(own_submissions))
        .into_tuple()
        .all(db)
        .await
        .map_err(db_error("Failed to collect submission files"))?;

    keys.extend(uploaded);
    keys.extend(submitted);
    keys.sort();
    keys.dedup();
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::super::test_support;
    use super::*;
    use crate::errors::LmsError;
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let storage = SeaOrmStorage::new_in_memory().await;
        test_support::user(&storage, "teacher1", UserRole::Teacher).await;

        let err = storage
            .create_user_impl(NewUser {
                username: "teacher1".into(),
                email: "other@school.test".into(),
                password_hash: "hash".into(),
                role: UserRole::Teacher,
                full_name: None,
                avatar_url: None,
            })
            .await
            .expect_err("duplicate username");
        assert!(matches!(err, LmsError::Conflict(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_list_users_filters_role_and_search() {
        let storage = SeaOrmStorage::new_in_memory().await;
        test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        test_support::user(&storage, "student1", UserRole::Student).await;
        test_support::user(&storage, "student_2", UserRole::Student).await;

        let students = storage
            .list_users_with_pagination_impl(UserListQuery {
                role: Some(UserRole::Student),
                ..Default::default()
            })
            .await
            .expect("list");
        assert_eq!(students.pagination.total, 2);

        // 下划线按字面匹配
        let literal = storage
            .list_users_with_pagination_impl(UserListQuery {
                search: Some("t_2".into()),
                ..Default::default()
            })
            .await
            .expect("list");
        assert_eq!(literal.items.len(), 1);
        assert_eq!(literal.items[0].username, "student_2");
    }

    #[tokio::test]
    async fn test_update_and_delete_user() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let user = test_support::user(&storage, "student1", UserRole::Student).await;

        let updated = storage
            .update_user_impl(
                user.id,
                UserUpdate {
                    status: Some(UserStatus::Suspended),
                    full_name: Some("Student One".into()),
                    ..Default::default()
                },
            )
            .await
            .expect("update")
            .expect("exists");
        assert_eq!(updated.status, UserStatus::Suspended);
        assert_eq!(updated.full_name.as_deref(), Some("Student One"));
        assert_eq!(updated.email, user.email);

        assert!(storage.delete_user_impl(user.id).await.expect("delete").is_some());
        assert!(storage.delete_user_impl(user.id).await.expect("delete").is_none());
        assert!(storage.get_user_by_id_impl(user.id).await.expect("get").is_none());
    }
}
