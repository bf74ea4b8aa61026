use super::entities::AssignmentType;
use crate::models::{IntInput, ValidationErrors};
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::lenient_opt_i64;
use crate::utils::validate::validate_text_length;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

const TITLE_MAX: usize = 200;
const DESCRIPTION_MAX: usize = 20_000;
const POINTS_MAX: i64 = 10_000;

/// 创建与编辑共用的作业表单
///
/// 所有字段都以可选形式接收，缺失或格式错误统一在 `validate` 中
/// 逐字段报告，而不是在反序列化阶段整体失败。
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    #[ts(type = "number | null")]
    pub class_id: Option<IntInput>,
    /// RFC 3339、`YYYY-MM-DDTHH:MM[:SS]`（按 UTC）或 `YYYY-MM-DD`（当天结束）
    pub due_date: Option<String>,
    #[serde(default)]
    #[ts(type = "number | null")]
    pub points: Option<IntInput>,
    #[serde(rename = "type")]
    pub assignment_type: Option<String>,
}

/// 校验通过的作业字段
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentInput {
    pub class_id: i64,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub points: i32,
    pub assignment_type: AssignmentType,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .map(|naive| naive.and_utc())
}

impl AssignmentRequest {
    pub fn validate(&self) -> Result<AssignmentInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = match non_blank(&self.title) {
            None => {
                errors.missing("title");
                None
            }
            Some(title) => match validate_text_length(title, TITLE_MAX) {
                Ok(()) => Some(title.to_string()),
                Err(msg) => {
                    errors.add("title", format!("title {msg}"));
                    None
                }
            },
        };

        let description = match non_blank(&self.description) {
            None => {
                errors.missing("description");
                None
            }
            Some(d) if d.chars().count() > DESCRIPTION_MAX => {
                errors.add(
                    "description",
                    format!("description must be at most {DESCRIPTION_MAX} characters"),
                );
                None
            }
            Some(d) => Some(d.to_string()),
        };

        let class_id = match self.class_id.map(IntInput::value) {
            None => {
                errors.missing("class_id");
                None
            }
            Some(Some(id)) if id > 0 => Some(id),
            Some(_) => {
                errors.add("class_id", "class_id must be a positive integer");
                None
            }
        };

        let due_date = match non_blank(&self.due_date) {
            None => {
                errors.missing("due_date");
                None
            }
            Some(raw) => {
                let parsed = parse_due_date(raw);
                if parsed.is_none() {
                    errors.add("due_date", "due_date must be a valid date or date-time");
                }
                parsed
            }
        };

        let points = match self.points.map(IntInput::value) {
            None => {
                errors.missing("points");
                None
            }
            Some(Some(p)) if (1..=POINTS_MAX).contains(&p) => Some(p as i32),
            Some(_) => {
                errors.add(
                    "points",
                    format!("points must be an integer between 1 and {POINTS_MAX}"),
                );
                None
            }
        };

        let assignment_type = match non_blank(&self.assignment_type) {
            None => {
                errors.missing("type");
                None
            }
            Some(raw) => match raw.parse::<AssignmentType>() {
                Ok(t) => Some(t),
                Err(msg) => {
                    errors.add("type", msg);
                    None
                }
            },
        };

        match (title, description, class_id, due_date, points, assignment_type) {
            (
                Some(title),
                Some(description),
                Some(class_id),
                Some(due_date),
                Some(points),
                Some(assignment_type),
            ) if errors.is_empty() => Ok(AssignmentInput {
                class_id,
                title,
                description,
                due_date,
                points,
                assignment_type,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub class_id: Option<i64>,
    pub search: Option<String>,
}

// 存储层查询参数
#[derive(Debug, Clone, Default)]
pub struct AssignmentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub class_id: Option<i64>,
    /// 教师视角：只看自己班级的作业
    pub teacher_id: Option<i64>,
    /// 学生视角：只看有效选课班级的作业
    pub student_id: Option<i64>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> AssignmentRequest {
        AssignmentRequest {
            title: Some("Lab report".into()),
            description: Some("Write up the titration lab".into()),
            class_id: Some(3.into()),
            due_date: Some("2030-05-01T12:00:00Z".into()),
            points: Some(100.into()),
            assignment_type: Some("project".into()),
        }
    }

    #[test]
    fn test_full_request_is_valid() {
        let input = full_request().validate().expect("valid");
        assert_eq!(input.class_id, 3);
        assert_eq!(input.points, 100);
        assert_eq!(input.assignment_type, AssignmentType::Project);
    }

    #[test]
    fn test_every_missing_field_is_reported() {
        let errors = AssignmentRequest::default()
            .validate()
            .expect_err("empty request");
        for field in ["title", "description", "class_id", "due_date", "points", "type"] {
            assert!(errors.has(field), "missing error for {field}");
        }
        assert_eq!(errors.errors.len(), 6);
    }

    #[test]
    fn test_blank_title_counts_as_missing() {
        let req = AssignmentRequest {
            title: Some("   ".into()),
            ..full_request()
        };
        let errors = req.validate().expect_err("blank title");
        assert_eq!(errors.errors[0].message, "title is required");
    }

    #[test]
    fn test_invalid_values_reported() {
        let req = AssignmentRequest {
            points: Some(0.into()),
            assignment_type: Some("essay".into()),
            due_date: Some("next friday".into()),
            ..full_request()
        };
        let errors = req.validate().expect_err("invalid");
        assert!(errors.has("points"));
        assert!(errors.has("type"));
        assert!(errors.has("due_date"));
        assert!(!errors.has("title"));
    }

    #[test]
    fn test_due_date_formats() {
        let end_of_day = parse_due_date("2030-01-02").expect("date");
        assert_eq!(end_of_day.to_rfc3339(), "2030-01-02T23:59:59+00:00");
        assert!(parse_due_date("2030-01-02T08:30").is_some());
        assert!(parse_due_date("2030-01-02T08:30:00+02:00").is_some());
        assert!(parse_due_date("02/01/2030").is_none());
    }

    #[test]
    fn test_mistyped_numbers_reported_per_field() {
        let req: AssignmentRequest = serde_json::from_str(
            r#"{"title":"Lab","description":"Write up","class_id":"3","due_date":"2030-05-01","points":"ten","type":"quiz"}"#,
        )
        .expect("mistyped numbers still deserialize");
        let errors = req.validate().expect_err("points is not a number");
        assert_eq!(errors.errors.len(), 1);
        assert_eq!(errors.errors[0].field, "points");

        let req: AssignmentRequest =
            serde_json::from_str(r#"{"class_id":[1],"points":null}"#).expect("deserialize");
        let errors = req.validate().expect_err("invalid");
        assert!(errors.has("class_id"));
        assert!(errors.has("points"));
    }

    #[test]
    fn test_type_field_name() {
        let req: AssignmentRequest =
            serde_json::from_str(r#"{"type":"quiz","points":5}"#).expect("deserialize");
        assert_eq!(req.assignment_type.as_deref(), Some("quiz"));
    }
}
