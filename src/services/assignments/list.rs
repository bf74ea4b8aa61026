use actix_web::{HttpRequest, HttpResponse};

use super::AssignmentService;
use crate::models::{
    ApiResponse,
    assignments::requests::{AssignmentListParams, AssignmentListQuery},
    users::entities::UserRole,
};
use crate::services::{Outcome, current_user, storage_error};

pub async fn list_assignments(
    service: &AssignmentService,
    request: &HttpRequest,
    query: AssignmentListParams,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let (teacher_id, student_id) = match user.role {
        UserRole::Admin => (None, None),
        UserRole::Teacher => (Some(user.id), None),
        UserRole::Student => (None, Some(user.id)),
    };

    let list_query = AssignmentListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        class_id: query.class_id,
        teacher_id,
        student_id,
        search: query.search,
    };
    let response = storage
        .list_assignments_with_pagination(list_query)
        .await
        .map_err(storage_error("Failed to list assignments"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Success")))
}
