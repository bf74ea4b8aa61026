//! 业务逻辑层
//!
//! 每个领域一个 `XService`，路由层只做参数提取，
//! 权限判断和错误到 HTTP 响应的映射都在这里完成。

pub mod access;
pub mod assignments;
pub mod auth;
pub mod classes;
pub mod dashboard;
pub mod enrollments;
pub mod files;
pub mod meetings;
pub mod notification_preferences;
pub mod submissions;
pub mod system;
pub mod users;

pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use classes::ClassService;
pub use dashboard::DashboardService;
pub use enrollments::EnrollmentService;
pub use files::FileService;
pub use meetings::MeetingService;
pub use notification_preferences::NotificationPreferenceService;
pub use submissions::SubmissionService;
pub use system::SystemService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode, web};
use std::sync::Arc;
use tracing::{error, info};

use crate::cache::ObjectCache;
use crate::errors::LmsError;
use crate::middlewares::{ClassContext, RequireClassAccess, RequireJWT, require_jwt::user_cache_key};
use crate::models::{ApiResponse, ErrorCode, users::entities::User};
use crate::storage::Storage;

/// 处理结果，Err 中是已经构造好的错误响应
pub(crate) type Outcome = Result<HttpResponse, HttpResponse>;

pub(crate) fn finish(outcome: Outcome) -> ActixResult<HttpResponse> {
    Ok(outcome.unwrap_or_else(|resp| resp))
}

pub(crate) fn storage_from_request(request: &HttpRequest) -> Result<Arc<dyn Storage>, HttpResponse> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|s| s.get_ref().clone())
        .ok_or_else(|| {
            error!("Storage not found in app data");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Storage unavailable",
            )
        })
}

/// 当前登录用户，缺失时返回 401
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        )
    })
}

/// 班级访问中间件写入的上下文
pub(crate) fn class_context(request: &HttpRequest) -> Result<ClassContext, HttpResponse> {
    RequireClassAccess::extract_class_context(request).ok_or_else(|| {
        error!("Class context missing; route is not wrapped with RequireClassAccess");
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
            "Class context unavailable",
        )
    })
}

/// 用户资料或状态变化后清除认证缓存
pub(crate) async fn forget_cached_user(request: &HttpRequest, user_id: i64) {
    if let Some(cache) = request.app_data::<web::Data<Arc<dyn ObjectCache>>>() {
        cache.remove(&user_cache_key(user_id)).await;
    }
}

pub(crate) fn error_response(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse::error_empty(code, message))
}

pub(crate) fn not_found(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    error_response(StatusCode::NOT_FOUND, code, message)
}

pub(crate) fn forbidden(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    error_response(StatusCode::FORBIDDEN, code, message)
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    error_response(StatusCode::BAD_REQUEST, code, message)
}

pub(crate) fn conflict(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    error_response(StatusCode::CONFLICT, code, message)
}

/// 存储层错误到 HTTP 响应的映射
pub(crate) fn storage_error(context: &'static str) -> impl FnOnce(LmsError) -> HttpResponse {
    move |err| match &err {
        LmsError::NotFound(msg) => not_found(ErrorCode::NotFound, msg.as_str()),
        LmsError::Conflict(_) => {
            info!("{}: {}", context, err);
            conflict(ErrorCode::Conflict, format!("{context}: resource already exists"))
        }
        LmsError::CapacityExceeded(msg) => conflict(ErrorCode::ClassFull, msg.as_str()),
        LmsError::Validation(msg) => bad_request(ErrorCode::BadRequest, msg.as_str()),
        LmsError::Authorization(msg) => forbidden(ErrorCode::PermissionDenied, msg.as_str()),
        LmsError::Authentication(msg) => {
            error_response(StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized, msg.as_str())
        }
        _ => {
            error!("{}: {}", context, err);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                context,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_status_mapping() {
        let cases = [
            (LmsError::not_found("x"), StatusCode::NOT_FOUND),
            (LmsError::conflict("x"), StatusCode::CONFLICT),
            (LmsError::capacity_exceeded("x"), StatusCode::CONFLICT),
            (LmsError::validation("x"), StatusCode::BAD_REQUEST),
            (LmsError::authorization("x"), StatusCode::FORBIDDEN),
            (LmsError::database_operation("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(storage_error("ctx")(err).status(), status);
        }
    }
}
