use actix_web::{HttpRequest, HttpResponse};

use super::ClassService;
use crate::models::{
    ApiResponse,
    classes::requests::{ClassListQuery, ClassQueryParams},
    users::entities::UserRole,
};
use crate::services::{Outcome, current_user, storage_error};

pub async fn list_classes(
    service: &ClassService,
    request: &HttpRequest,
    query: ClassQueryParams,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    // 按角色限定可见范围
    let (teacher_id, student_id) = match user.role {
        UserRole::Admin => (query.teacher_id, None),
        UserRole::Teacher => (Some(user.id), None),
        UserRole::Student => (None, Some(user.id)),
    };

    let list_query = ClassListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        teacher_id,
        student_id,
        search: query.search,
    };

    let response = storage
        .list_classes_with_pagination(list_query)
        .await
        .map_err(storage_error("Failed to list classes"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Success")))
}
