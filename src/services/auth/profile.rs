use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use tracing::error;

use crate::models::{
    ApiResponse, ErrorCode, ValidationErrors,
    auth::requests::UpdateProfileRequest,
    users::requests::UserUpdate,
};
use crate::services::{
    Outcome, bad_request, conflict, current_user, error_response, forget_cached_user, not_found,
    storage_error,
};
use crate::utils::password::{hash_password, verify_password};

use super::AuthService;

pub async fn handle_update_profile(
    service: &AuthService,
    update: UpdateProfileRequest,
    request: &HttpRequest,
) -> Outcome {
    let current = current_user(request)?;
    if let Err(errors) = update.validate() {
        return Err(ApiResponse::<ValidationErrors>::validation_failed(errors));
    }

    let storage = service.get_storage(request)?;

    // 邮箱不能与其他用户重复
    if let Some(email) = &update.email
        && let Some(existing) = storage
            .get_user_by_email(email)
            .await
            .map_err(storage_error("Profile update failed"))?
        && existing.id != current.id
    {
        return Err(conflict(
            ErrorCode::UserEmailAlreadyExists,
            "Email already in use",
        ));
    }

    // 修改密码需要验证当前密码
    let password_hash = match &update.new_password {
        Some(new_password) => {
            // 缓存中的用户不含密码哈希，这里重新读取
            let stored = storage
                .get_user_by_id(current.id)
                .await
                .map_err(storage_error("Profile update failed"))?
                .ok_or_else(|| not_found(ErrorCode::UserNotFound, "User not found"))?;
            let current_password = update.current_password.as_deref().unwrap_or_default();
            if !verify_password(current_password, &stored.password_hash) {
                return Err(bad_request(
                    ErrorCode::AuthFailed,
                    "Current password is incorrect",
                ));
            }
            Some(hash_password(new_password).map_err(|e| {
                error!("Password hashing failed: {}", e);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalServerError,
                    "Profile update failed",
                )
            })?)
        }
        None => None,
    };

    // 角色和状态只能由管理员修改
    let user_update = UserUpdate {
        email: update.email,
        password_hash,
        role: None,
        status: None,
        full_name: update.full_name,
        avatar_url: update.avatar_url,
    };

    let user = storage
        .update_user(current.id, user_update)
        .await
        .map_err(storage_error("Profile update failed"))?
        .ok_or_else(|| not_found(ErrorCode::UserNotFound, "User not found"))?;
    forget_cached_user(request, user.id).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(user, "Profile updated")))
}
