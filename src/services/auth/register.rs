use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use std::sync::Arc;
use tracing::{error, info};

use crate::errors::LmsError;
use crate::models::{
    ApiResponse, ErrorCode, ValidationErrors,
    auth::requests::RegisterRequest,
    users::{entities::UserRole, requests::NewUser},
};
use crate::services::{Outcome, conflict, error_response, storage_error};
use crate::storage::Storage;
use crate::utils::password::hash_password;

use super::AuthService;

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> Outcome {
    if let Err(errors) = register_request.validate() {
        return Err(ApiResponse::<ValidationErrors>::validation_failed(errors));
    }

    let storage = service.get_storage(request)?;

    // 1. 检查用户名、邮箱是否已存在
    ensure_unique(&storage, &register_request.username, &register_request.email).await?;

    // 2. 哈希密码
    let password_hash = hash_password(&register_request.password).map_err(|e| {
        error!("Password hashing failed: {}", e);
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::RegisterFailed,
            "Register failed",
        )
    })?;

    // 3. 创建学生账号
    let new_user = NewUser {
        username: register_request.username,
        email: register_request.email,
        password_hash,
        role: UserRole::Student,
        full_name: register_request.full_name,
        avatar_url: None,
    };

    match storage.create_user(new_user).await {
        Ok(user) => {
            info!("User {} registered", user.username);
            Ok(HttpResponse::Created().json(ApiResponse::success(user, "Registration successful")))
        }
        // 预检查与插入之间的并发注册由唯一索引兜底
        Err(LmsError::Conflict(_)) => Err(conflict(
            ErrorCode::UserNameAlreadyExists,
            "Username or email already exists",
        )),
        Err(e) => Err(storage_error("Register failed")(e)),
    }
}

/// 用户名和邮箱唯一性检查，管理员创建用户时同样使用
pub(crate) async fn ensure_unique(
    storage: &Arc<dyn Storage>,
    username: &str,
    email: &str,
) -> Result<(), HttpResponse> {
    if storage
        .get_user_by_username(username)
        .await
        .map_err(storage_error("Register failed"))?
        .is_some()
    {
        return Err(conflict(
            ErrorCode::UserNameAlreadyExists,
            "Username already exists",
        ));
    }
    if storage
        .get_user_by_email(email)
        .await
        .map_err(storage_error("Register failed"))?
        .is_some()
    {
        return Err(conflict(
            ErrorCode::UserEmailAlreadyExists,
            "Email already exists",
        ));
    }
    Ok(())
}
