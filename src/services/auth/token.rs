use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use tracing::{error, info};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::responses::{RefreshTokenResponse, TokenVerificationResponse},
    users::entities::UserStatus,
};
use crate::services::{Outcome, current_user, error_response, storage_error};
use crate::utils::jwt::JwtUtils;

use super::AuthService;

// refresh 失败时顺便清掉浏览器里的 cookie
fn refresh_rejected(message: &str) -> HttpResponse {
    HttpResponse::Unauthorized()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::error_empty(ErrorCode::Unauthorized, message))
}

pub async fn handle_refresh_token(service: &AuthService, request: &HttpRequest) -> Outcome {
    let refresh_token = JwtUtils::extract_refresh_token_from_cookie(request)
        .ok_or_else(|| refresh_rejected("Refresh token missing"))?;

    let claims = JwtUtils::verify_refresh_token(&refresh_token).map_err(|e| {
        info!("Refresh token rejected: {}", e);
        refresh_rejected("Invalid or expired refresh token")
    })?;
    let user_id = claims
        .user_id()
        .ok_or_else(|| refresh_rejected("Invalid or expired refresh token"))?;

    // 重新读取用户，角色变化或账号停用要立即生效
    let storage = service.get_storage(request)?;
    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(storage_error("Token refresh failed"))?
        .ok_or_else(|| refresh_rejected("User no longer exists"))?;
    if user.status != UserStatus::Active {
        return Err(refresh_rejected("Account is not active"));
    }

    let access_token =
        JwtUtils::generate_access_token(user.id, user.role.as_str()).map_err(|e| {
            error!("Failed to generate access token: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Unable to generate token",
            )
        })?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        RefreshTokenResponse {
            access_token,
            expires_in: JwtUtils::access_token_ttl_secs(),
        },
        "Token refreshed",
    )))
}

// 能走到这里说明 JWT 中间件已经校验通过
pub fn handle_verify_token(request: &HttpRequest) -> Outcome {
    current_user(request)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TokenVerificationResponse { is_valid: true },
        "Token is valid",
    )))
}

pub fn handle_get_user(request: &HttpRequest) -> Outcome {
    let user = current_user(request)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(user, "Success")))
}
