use super::entities::SubmissionStatus;
use crate::models::ValidationErrors;
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

const CONTENT_MAX: usize = 50_000;
const FEEDBACK_MAX: usize = 5_000;

// 学生提交（或在评分前重新提交）
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmitAssignmentRequest {
    pub content: Option<String>,
}

impl SubmitAssignmentRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(content) = &self.content
            && content.chars().count() > CONTENT_MAX
        {
            errors.add(
                "content",
                format!("content must be at most {CONTENT_MAX} characters"),
            );
        }
        errors.into_result()
    }
}

// 评分请求，分数上限在服务层对照作业 points 检查
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct GradeSubmissionRequest {
    pub grade: f64,
    pub feedback: Option<String>,
}

impl GradeSubmissionRequest {
    pub fn validate(&self, max_points: i32) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !self.grade.is_finite() || self.grade < 0.0 || self.grade > f64::from(max_points) {
            errors.add(
                "grade",
                format!("grade must be between 0 and {max_points}"),
            );
        }
        if let Some(feedback) = &self.feedback
            && feedback.chars().count() > FEEDBACK_MAX
        {
            errors.add(
                "feedback",
                format!("feedback must be at most {FEEDBACK_MAX} characters"),
            );
        }
        errors.into_result()
    }
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<SubmissionStatus>,
}

// 存储层查询参数
#[derive(Debug, Clone, Default)]
pub struct SubmissionListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub assignment_id: i64,
    pub student_id: Option<i64>,
    pub status: Option<SubmissionStatus>,
}

// 存储层评分参数
#[derive(Debug, Clone)]
pub struct GradeInput {
    pub grade: f64,
    pub feedback: Option<String>,
    pub graded_by: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_range() {
        let ok = GradeSubmissionRequest {
            grade: 100.0,
            feedback: None,
        };
        assert!(ok.validate(100).is_ok());

        for grade in [-1.0, 100.5, f64::NAN] {
            let req = GradeSubmissionRequest {
                grade,
                feedback: None,
            };
            assert!(req.validate(100).is_err(), "{grade} accepted");
        }
    }
}
