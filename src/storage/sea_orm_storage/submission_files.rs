use super::{SeaOrmStorage, db_error};
use crate::entity::submission_files::{ActiveModel, Column, Entity as SubmissionFiles};
use crate::errors::Result;
use crate::models::files::entities::{NewFileRecord, SubmissionFile};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_submission_file_impl(
        &self,
        submission_id: i64,
        file: NewFileRecord,
    ) -> Result<SubmissionFile> {
        let model = ActiveModel {
            submission_id: Set(submission_id),
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
            .map_err(db_error("Failed to save submission file"))?;

        Ok(result.into_submission_file())
    }

    pub async fn list_submission_files_impl(&self, submission_id: i64) -> Result<Vec<SubmissionFile>> {
        let files = SubmissionFiles::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .order_by_asc(Column::UploadedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error("Failed to list submission files"))?;

        Ok(files.into_iter().map(|m| m.into_submission_file()).collect())
    }

    pub async fn get_submission_file_impl(
        &self,
        submission_id: i64,
        file_id: i64,
    ) -> Result<Option<SubmissionFile>> {
        let result = SubmissionFiles::find_by_id(file_id)
            .filter(Column::SubmissionId.eq(submission_id))
            .one(&self.db)
            .await
            .map_err(db_error("Failed to query submission file"))?;

        Ok(result.map(|m| m.into_submission_file()))
    }

    pub async fn delete_submission_file_impl(&self, file_id: i64) -> Result<bool> {
        let result = SubmissionFiles::delete_by_id(file_id)
            .exec(&self.db)
            .await
            .map_err(db_error("Failed to delete submission file"))?;

        Ok(result.rows_affected > 0)
    }
}
