use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use tracing::{error, info};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{requests::LoginRequest, responses::LoginResponse},
    users::entities::UserStatus,
};
use crate::services::{Outcome, error_response, forbidden, storage_error};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

use super::AuthService;

fn invalid_credentials() -> HttpResponse {
    error_response(
        StatusCode::UNAUTHORIZED,
        ErrorCode::AuthFailed,
        "Username or password is incorrect",
    )
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> Outcome {
    let storage = service.get_storage(request)?;

    // 1. 根据用户名或邮箱获取用户
    let user = storage
        .get_user_by_username_or_email(login_request.username.trim())
        .await
        .map_err(storage_error("Login failed"))?
        .ok_or_else(invalid_credentials)?;

    // 2. 验证密码
    if !verify_password(&login_request.password, &user.password_hash) {
        info!("Failed login attempt for {}", login_request.username);
        return Err(invalid_credentials());
    }

    // 3. 停用或暂停的账号不能登录
    if user.status != UserStatus::Active {
        return Err(forbidden(
            ErrorCode::AccountDisabled,
            "Account is not active",
        ));
    }

    // 4. 更新最后登录时间，失败不影响登录
    if let Err(e) = storage.update_last_login(user.id).await {
        error!("Failed to update last login for user {}: {}", user.id, e);
    }

    // 5. 生成令牌对
    let refresh_expiry = JwtUtils::refresh_expiry(login_request.remember_me);
    let token_pair = user.generate_token_pair(Some(refresh_expiry)).map_err(|e| {
        error!("Failed to generate JWT token: {}", e);
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
            "Login failed, unable to generate token",
        )
    })?;

    info!("User {} logged in successfully", user.username);

    let refresh_cookie =
        JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token, refresh_expiry);
    let response = LoginResponse {
        access_token: token_pair.access_token,
        expires_in: JwtUtils::access_token_ttl_secs(),
        user,
        created_at: chrono::Utc::now(),
    };

    Ok(HttpResponse::Ok()
        .cookie(refresh_cookie)
        .json(ApiResponse::success(response, "Login successful")))
}
