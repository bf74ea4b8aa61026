use actix_web::{HttpRequest, HttpResponse};

use super::UserService;
use crate::models::{
    ApiResponse,
    users::{
        entities::UserRole,
        requests::{UserListParams, UserListQuery},
    },
};
use crate::services::{Outcome, current_user, storage_error};

pub async fn list_users(
    service: &UserService,
    query: UserListParams,
    request: &HttpRequest,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    // 教师只能检索学生（用于选课）
    let role = match user.role {
        UserRole::Admin => query.role,
        _ => Some(UserRole::Student),
    };

    let list_query = UserListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        role,
        status: query.status,
        search: query.search,
    };

    let response = storage
        .list_users_with_pagination(list_query)
        .await
        .map_err(storage_error("Failed to list users"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Success")))
}
