use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::files::entities::SubmissionFile;
use crate::models::users::entities::UserSummary;

// 提交状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub enum SubmissionStatus {
    Submitted, // 按时提交
    Late,      // 逾期提交
    Graded,    // 已评分
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Submitted => "submitted",
            SubmissionStatus::Late => "late",
            SubmissionStatus::Graded => "graded",
        }
    }

    /// 根据提交时间和截止时间决定状态
    pub fn for_submission_time(
        submitted_at: chrono::DateTime<chrono::Utc>,
        due_date: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        if submitted_at > due_date {
            SubmissionStatus::Late
        } else {
            SubmissionStatus::Submitted
        }
    }
}

impl<'de> Deserialize<'de> for SubmissionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(SubmissionStatus::Submitted),
            "late" => Ok(SubmissionStatus::Late),
            "graded" => Ok(SubmissionStatus::Graded),
            _ => Err(format!(
                "invalid submission status: '{s}'. supported: submitted, late, graded"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: Option<String>,
    pub status: SubmissionStatus,
    pub grade: Option<f64>,
    pub feedback: Option<String>,
    pub graded_by: Option<i64>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Submission {
    pub fn is_graded(&self) -> bool {
        self.status == SubmissionStatus::Graded
    }
}

/// 列表项：提交与学生信息
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionWithStudent {
    #[serde(flatten)]
    #[ts(flatten)]
    pub submission: Submission,
    pub student: Option<UserSummary>,
}

/// 提交详情（含附件）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub submission: Submission,
    pub student: Option<UserSummary>,
    pub files: Vec<SubmissionFile>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Utc};

    #[test]
    fn test_status_for_submission_time() {
        let due = Utc::now();
        assert_eq!(
            SubmissionStatus::for_submission_time(due - TimeDelta::minutes(1), due),
            SubmissionStatus::Submitted
        );
        assert_eq!(
            SubmissionStatus::for_submission_time(due, due),
            SubmissionStatus::Submitted
        );
        assert_eq!(
            SubmissionStatus::for_submission_time(due + TimeDelta::seconds(1), due),
            SubmissionStatus::Late
        );
    }
}
