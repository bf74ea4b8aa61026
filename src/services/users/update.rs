use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use tracing::error;

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode, ValidationErrors,
    users::requests::{UpdateUserRequest, UserUpdate},
};
use crate::services::{
    Outcome, conflict, error_response, forget_cached_user, not_found, storage_error,
};
use crate::utils::password::hash_password;

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> Outcome {
    if let Err(errors) = update_data.validate() {
        return Err(ApiResponse::<ValidationErrors>::validation_failed(errors));
    }

    let storage = service.get_storage(request)?;

    if let Some(email) = &update_data.email
        && let Some(existing) = storage
            .get_user_by_email(email)
            .await
            .map_err(storage_error("User update failed"))?
        && existing.id != user_id
    {
        return Err(conflict(
            ErrorCode::UserEmailAlreadyExists,
            "Email already in use",
        ));
    }

    let password_hash = match &update_data.password {
        Some(password) => Some(hash_password(password).map_err(|e| {
            error!("Password hashing failed: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "User update failed",
            )
        })?),
        None => None,
    };

    let update = UserUpdate {
        email: update_data.email,
        password_hash,
        role: update_data.role,
        status: update_data.status,
        full_name: update_data.full_name,
        avatar_url: update_data.avatar_url,
    };

    let user = storage
        .update_user(user_id, update)
        .await
        .map_err(storage_error("User update failed"))?
        .ok_or_else(|| not_found(ErrorCode::UserNotFound, "User not found"))?;

    // 角色或状态变化需要立即对已签发的 token 生效
    forget_cached_user(request, user_id).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(user, "User updated")))
}
