//! 提交附件实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submission_files")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub submission_id: i64,
    pub file_name: String,
    #[sea_orm(unique)]
    pub storage_key: String,
    pub file_size: i64,
    pub content_type: String,
    pub uploaded_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignment_submissions::Entity",
        from = "Column::SubmissionId",
        to = "super::assignment_submissions::Column::Id"
    )]
    Submission,
}

impl Related<super::assignment_submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_submission_file(self) -> crate::models::files::entities::SubmissionFile {
        use crate::models::files::entities::{SubmissionFile, public_url};

        SubmissionFile {
            id: self.id,
            submission_id: self.submission_id,
            file_name: self.file_name,
            url: public_url(&self.storage_key),
            storage_key: self.storage_key,
            file_size: self.file_size,
            content_type: self.content_type,
            uploaded_at: super::from_timestamp(self.uploaded_at),
        }
    }
}
