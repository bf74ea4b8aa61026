//! 作业附件实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignment_files")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub uploaded_by: i64,
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
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_assignment_file(self) -> crate::models::files::entities::AssignmentFile {
        use crate::models::files::entities::{AssignmentFile, public_url};

        AssignmentFile {
            id: self.id,
            assignment_id: self.assignment_id,
            uploaded_by: self.uploaded_by,
            file_name: self.file_name,
            url: public_url(&self.storage_key),
            storage_key: self.storage_key,
            file_size: self.file_size,
            content_type: self.content_type,
            uploaded_at: super::from_timestamp(self.uploaded_at),
        }
    }
}
