use super::entities::{UserRole, UserStatus};
use crate::models::{ValidationErrors, common::PaginationQuery};
use crate::utils::validate::{
    validate_email, validate_full_name, validate_password_simple, validate_url, validate_username,
};
use serde::Deserialize;
use ts_rs::TS;

// 用户查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub search: Option<String>,
}

// 管理员创建用户请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(msg) = validate_username(&self.username) {
            errors.add("username", msg);
        }
        if let Err(msg) = validate_email(&self.email) {
            errors.add("email", msg);
        }
        if let Err(msg) = validate_password_simple(&self.password) {
            errors.add("password", msg);
        }
        if let Some(name) = &self.full_name
            && let Err(msg) = validate_full_name(name)
        {
            errors.add("full_name", msg);
        }
        if let Some(url) = &self.avatar_url
            && let Err(msg) = validate_url(url)
        {
            errors.add("avatar_url", msg);
        }
        errors.into_result()
    }
}

// 存储层使用的新用户（密码已哈希）
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

// 用户更新请求
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(email) = &self.email
            && let Err(msg) = validate_email(email)
        {
            errors.add("email", msg);
        }
        if let Some(password) = &self.password
            && let Err(msg) = validate_password_simple(password)
        {
            errors.add("password", msg);
        }
        if let Some(name) = &self.full_name
            && let Err(msg) = validate_full_name(name)
        {
            errors.add("full_name", msg);
        }
        if let Some(url) = &self.avatar_url
            && let Err(msg) = validate_url(url)
        {
            errors.add("avatar_url", msg);
        }
        errors.into_result()
    }
}

// 存储层使用的用户更新（密码已哈希）
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

// 用户列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_field_errors() {
        let req = CreateUserRequest {
            username: "ab".into(),
            email: "not-an-email".into(),
            password: "weak".into(),
            role: UserRole::Student,
            full_name: None,
            avatar_url: Some("ftp://x".into()),
        };
        let errors = req.validate().expect_err("should fail");
        assert!(errors.has("username"));
        assert!(errors.has("email"));
        assert!(errors.has("password"));
        assert!(errors.has("avatar_url"));
        assert!(!errors.has("full_name"));
    }

    #[test]
    fn test_update_user_empty_is_valid() {
        assert!(UpdateUserRequest::default().validate().is_ok());
    }
}
