use crate::models::ValidationErrors;
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::lenient_opt_i64;
use crate::models::common::validation::nullable;
use crate::utils::validate::validate_text_length;
use serde::Deserialize;
use ts_rs::TS;

const NAME_MAX: usize = 100;
const SUBJECT_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 5000;

// 班级查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    /// 仅管理员生效
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub teacher_id: Option<i64>,
}

// 创建班级请求
//
// 教师创建时 teacher_id 可省略（默认为自己），填写时必须是自己；
// 管理员创建时必须指定，且该用户必须是教师。
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct CreateClassRequest {
    pub teacher_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub capacity: Option<i32>,
}

fn check_optional_fields(
    errors: &mut ValidationErrors,
    description: Option<&String>,
    subject: Option<&String>,
    capacity: Option<i32>,
) {
    if let Some(description) = description
        && description.chars().count() > DESCRIPTION_MAX
    {
        errors.add(
            "description",
            format!("description must be at most {DESCRIPTION_MAX} characters"),
        );
    }
    if let Some(subject) = subject
        && let Err(msg) = validate_text_length(subject, SUBJECT_MAX)
    {
        errors.add("subject", format!("subject {msg}"));
    }
    if let Some(capacity) = capacity
        && capacity <= 0
    {
        errors.add("capacity", "capacity must be greater than 0");
    }
}

impl CreateClassRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(msg) = validate_text_length(&self.name, NAME_MAX) {
            errors.add("name", format!("name {msg}"));
        }
        check_optional_fields(
            &mut errors,
            self.description.as_ref(),
            self.subject.as_ref(),
            self.capacity,
        );
        errors.into_result()
    }
}

// 更新班级请求（部分更新）
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub subject: Option<String>,
    /// 缺省表示不修改，显式 null 表示取消容量限制
    #[serde(default, deserialize_with = "nullable")]
    #[ts(type = "number | null")]
    pub capacity: Option<Option<i32>>,
}

impl UpdateClassRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name
            && let Err(msg) = validate_text_length(name, NAME_MAX)
        {
            errors.add("name", format!("name {msg}"));
        }
        check_optional_fields(
            &mut errors,
            self.description.as_ref(),
            self.subject.as_ref(),
            self.capacity.flatten(),
        );
        errors.into_result()
    }
}

// 存储层使用的新班级
#[derive(Debug, Clone)]
pub struct NewClass {
    pub teacher_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub capacity: Option<i32>,
}

// 班级列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ClassListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub teacher_id: Option<i64>,
    /// 只返回该学生有效选课的班级
    pub student_id: Option<i64>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_class_validation() {
        let req = CreateClassRequest {
            teacher_id: None,
            name: " ".into(),
            description: None,
            subject: None,
            capacity: Some(0),
        };
        let errors = req.validate().expect_err("invalid");
        assert!(errors.has("name"));
        assert!(errors.has("capacity"));
    }

    #[test]
    fn test_update_class_partial_ok() {
        let req = UpdateClassRequest {
            capacity: Some(Some(30)),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_class_capacity_null_clears_limit() {
        let req: UpdateClassRequest =
            serde_json::from_str(r#"{"capacity":null}"#).expect("deserialize");
        assert_eq!(req.capacity, Some(None));
        assert!(req.validate().is_ok());

        let req: UpdateClassRequest =
            serde_json::from_str(r#"{"name":"Physics"}"#).expect("deserialize");
        assert_eq!(req.capacity, None);

        let req: UpdateClassRequest =
            serde_json::from_str(r#"{"capacity":0}"#).expect("deserialize");
        assert!(req.validate().expect_err("invalid").has("capacity"));
    }
}
