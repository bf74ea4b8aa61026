//! 按存储键反查文件归属

use super::{SeaOrmStorage, db_error};
use crate::entity::prelude::{AssignmentFiles, SubmissionFiles};
use crate::entity::{assignment_files, submission_files};
use crate::errors::Result;
use crate::models::files::entities::StoredFileRef;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

impl SeaOrmStorage {
    pub async fn find_file_by_storage_key_impl(
        &self,
        storage_key: &str,
    ) -> Result<Option<StoredFileRef>> {
        if let Some(file) = AssignmentFiles::find()
            .filter(assignment_files::Column::StorageKey.eq(storage_key))
            .one(&self.db)
            .await
            .map_err(db_error("Failed to query assignment file"))?
        {
            return Ok(Some(StoredFileRef::Assignment(file.into_assignment_file())));
        }

        let file = SubmissionFiles::find()
            .filter(submission_files::Column::StorageKey.eq(storage_key))
            .one(&self.db)
            .await
            .map_err(db_error("Failed to query submission file"))?;

        Ok(file.map(|f| StoredFileRef::Submission(f.into_submission_file())))
    }
}

#[cfg(test)]
mod tests {
    use super::super::assignments::tests::input;
    use super::super::test_support;
    use super::*;
    use crate::models::files::entities::NewFileRecord;
    use crate::models::users::entities::UserRole;

    fn record(key: &str) -> NewFileRecord {
        NewFileRecord {
            file_name: "answer.txt".into(),
            storage_key: key.into(),
            file_size: 3,
            content_type: "text/plain".into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_storage_key() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let teacher = test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        let student = test_support::user(&storage, "student1", UserRole::Student).await;
        let class = test_support::class(&storage, teacher.id, None).await;
        let assignment = storage
            .create_assignment_impl(teacher.id, input(class.id, "Essay", chrono::Duration::days(1)))
            .await
            .expect("create");
        storage
            .create_assignment_file_impl(assignment.id, teacher.id, record("brief.txt"))
            .await
            .expect("attach");
        let submission = storage
            .submit_assignment_impl(assignment.id, student.id, None, assignment.due_date)
            .await
            .expect("submit");
        storage
            .create_submission_file_impl(submission.id, record("answer.txt"))
            .await
            .expect("attach");

        assert!(matches!(
            storage.find_file_by_storage_key_impl("brief.txt").await.expect("find"),
            Some(StoredFileRef::Assignment(f)) if f.assignment_id == assignment.id
        ));
        assert!(matches!(
            storage.find_file_by_storage_key_impl("answer.txt").await.expect("find"),
            Some(StoredFileRef::Submission(f)) if f.submission_id == submission.id
        ));
        assert!(
            storage
                .find_file_by_storage_key_impl("missing.txt")
                .await
                .expect("find")
                .is_none()
        );
    }
}
