use crate::models::ValidationErrors;
use crate::utils::validate::{
    validate_email, validate_full_name, validate_password_simple, validate_url, validate_username,
};
use serde::Deserialize;
use ts_rs::TS;

// 登录请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginRequest {
    /// 用户名或邮箱
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

// 自助注册请求，只能注册为学生
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

impl RegisterRequest {
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
        errors.into_result()
    }
}

// 修改个人资料
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(email) = &self.email
            && let Err(msg) = validate_email(email)
        {
            errors.add("email", msg);
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
        if let Some(password) = &self.new_password {
            if let Err(msg) = validate_password_simple(password) {
                errors.add("new_password", msg);
            }
            if self.current_password.as_deref().unwrap_or("").is_empty() {
                errors.missing("current_password");
            }
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_validation() {
        let ok = RegisterRequest {
            username: "student1".into(),
            email: "s1@school.edu".into(),
            password: "SecurePass123".into(),
            full_name: Some("Student One".into()),
        };
        assert!(ok.validate().is_ok());

        let bad = RegisterRequest {
            username: "s1".into(),
            email: "s1".into(),
            password: "short".into(),
            full_name: Some("  ".into()),
        };
        let errors = bad.validate().expect_err("invalid");
        assert_eq!(errors.errors.len(), 4);
    }

    #[test]
    fn test_password_change_needs_current_password() {
        let req = UpdateProfileRequest {
            new_password: Some("NewSecure123".into()),
            ..Default::default()
        };
        let errors = req.validate().expect_err("missing current password");
        assert!(errors.has("current_password"));
    }
}
