//! 作业提交实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignment_submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    pub status: String,
    #[sea_orm(column_type = "Double", nullable)]
    pub grade: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,
    pub graded_by: Option<i64>,
    pub submitted_at: i64,
    pub graded_at: Option<i64>,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id"
    )]
    Student,
    #[sea_orm(has_many = "super::submission_files::Entity")]
    Files,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::submission_files::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Files.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 状态损坏时按是否已有成绩回退，避免已评分的提交重新变为可修改
    fn parsed_status(&self) -> crate::models::submissions::entities::SubmissionStatus {
        use crate::models::submissions::entities::SubmissionStatus;

        let fallback = if self.grade.is_some() {
            SubmissionStatus::Graded
        } else {
            SubmissionStatus::Submitted
        };
        super::parse_column(&self.status, fallback, "assignment_submissions.status", self.id)
    }

    pub fn into_submission(self) -> crate::models::submissions::entities::Submission {
        use crate::models::submissions::entities::Submission;

        let status = self.parsed_status();
        Submission {
            id: self.id,
            assignment_id: self.assignment_id,
            student_id: self.student_id,
            content: self.content,
            status,
            grade: self.grade,
            feedback: self.feedback,
            graded_by: self.graded_by,
            submitted_at: super::from_timestamp(self.submitted_at),
            graded_at: self.graded_at.map(super::from_timestamp),
            updated_at: super::from_timestamp(self.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submissions::entities::SubmissionStatus;

    fn row(status: &str, grade: Option<f64>) -> Model {
        Model {
            id: 7,
            assignment_id: 1,
            student_id: 2,
            content: None,
            status: status.to_string(),
            grade,
            feedback: None,
            graded_by: None,
            submitted_at: 1_700_000_000,
            graded_at: None,
            updated_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_unknown_status_does_not_unlock_graded_submission() {
        assert_eq!(
            row("late", None).into_submission().status,
            SubmissionStatus::Late
        );
        assert_eq!(
            row("archived", Some(18.0)).into_submission().status,
            SubmissionStatus::Graded
        );
        assert_eq!(
            row("", None).into_submission().status,
            SubmissionStatus::Submitted
        );
    }
}
