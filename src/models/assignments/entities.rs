use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::files::entities::AssignmentFile;

// 作业类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub enum AssignmentType {
    Homework,
    Quiz,
    Exam,
    Project,
}

impl AssignmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentType::Homework => "homework",
            AssignmentType::Quiz => "quiz",
            AssignmentType::Exam => "exam",
            AssignmentType::Project => "project",
        }
    }
}

impl<'de> Deserialize<'de> for AssignmentType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for AssignmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AssignmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "homework" => Ok(AssignmentType::Homework),
            "quiz" => Ok(AssignmentType::Quiz),
            "exam" => Ok(AssignmentType::Exam),
            "project" => Ok(AssignmentType::Project),
            _ => Err(format!(
                "invalid assignment type: '{s}'. supported: homework, quiz, exam, project"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub class_id: i64,
    /// 班级所属教师
    pub teacher_id: i64,
    pub title: String,
    pub description: String,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub points: i32,
    #[serde(rename = "type")]
    pub assignment_type: AssignmentType,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 作业详情（含附件）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub assignment: Assignment,
    pub files: Vec<AssignmentFile>,
}
