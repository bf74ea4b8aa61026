use super::{SeaOrmStorage, db_error};
use crate::entity::assignment_files::{ActiveModel, Column, Entity as AssignmentFiles};
use crate::errors::Result;
use crate::models::files::entities::{AssignmentFile, NewFileRecord};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_assignment_file_impl(
        &self,
        assignment_id: i64,
        uploaded_by: i64,
        file: NewFileRecord,
    ) -> Result<AssignmentFile> {
        let model = ActiveModel {
            assignment_id: Set(assignment_id),
            uploaded_by: Set(uploaded_by),
            file_name: Set(file.file_name),
            storage_key: Set(file.storage_key),
            file_size: Set(file.file_size),
            content_type: Set(file.content_type),
            uploaded_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_error("Failed to save assignment file"))?;

        Ok(result.into_assignment_file())
    }

    pub async fn list_assignment_files_impl(&self, assignment_id: i64) -> Result<Vec<AssignmentFile>> {
        let files = AssignmentFiles::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_asc(Column::UploadedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error("Failed to list assignment files"))?;

        Ok(files.into_iter().map(|m| m.into_assignment_file()).collect())
    }

    /// 文件必须属于该作业
    pub async fn get_assignment_file_impl(
        &self,
        assignment_id: i64,
        file_id: i64,
    ) -> Result<Option<AssignmentFile>> {
        let result = AssignmentFiles::find_by_id(file_id)
            .filter(Column::AssignmentId.eq(assignment_id))
            .one(&self.db)
            .await
            .map_err(db_error("Failed to query assignment file"))?;

        Ok(result.map(|m| m.into_assignment_file()))
    }

    pub async fn delete_assignment_file_impl(&self, file_id: i64) -> Result<bool> {
        let result = AssignmentFiles::delete_by_id(file_id)
            .exec(&self.db)
            .await
            .map_err(db_error("Failed to delete assignment file"))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::assignments::tests::input;
    use super::super::test_support;
    use super::*;
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_file_lookup_is_scoped_to_assignment() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let teacher = test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        let class = test_support::class(&storage, teacher.id, None).await;
        let a1 = storage
            .create_assignment_impl(teacher.id, input(class.id, "Essay", chrono::Duration::days(1)))
            .await
            .expect("create");
        let a2 = storage
            .create_assignment_impl(teacher.id, input(class.id, "Quiz", chrono::Duration::days(2)))
            .await
            .expect("create");

        let file = storage
            .create_assignment_file_impl(
                a1.id,
                teacher.id,
                NewFileRecord {
                    file_name: "brief.pdf".into(),
                    storage_key: "k1.pdf".into(),
                    file_size: 42,
                    content_type: "application/pdf".into(),
                },
            )
            .await
            .expect("save");
        assert!(file.url.ends_with("/api/v1/files/k1.pdf"));

        assert!(storage.get_assignment_file_impl(a2.id, file.id).await.expect("get").is_none());
        assert_eq!(
            storage.list_assignment_files_impl(a1.id).await.expect("list").len(),
            1
        );
        assert!(storage.delete_assignment_file_impl(file.id).await.expect("delete"));
        assert!(storage.list_assignment_files_impl(a1.id).await.expect("list").is_empty());
    }
}
