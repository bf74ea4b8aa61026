use actix_web::{HttpRequest, HttpResponse};

use super::SubmissionService;
use crate::models::{
    ApiResponse, ErrorCode,
    submissions::requests::{SubmissionListParams, SubmissionListQuery},
    users::entities::UserRole,
};
use crate::services::assignments::load_assignment_access;
use crate::services::{Outcome, current_user, forbidden, storage_error};

pub async fn list_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    query: SubmissionListParams,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let (assignment, access) = load_assignment_access(&storage, &user, assignment_id).await?;

    // 管理者看全部，学生只看自己的
    let student_id = if access.can_manage() {
        None
    } else if user.role == UserRole::Student && access.can_view() {
        Some(user.id)
    } else {
        return Err(forbidden(
            ErrorCode::SubmissionPermissionDenied,
            "You do not have access to these submissions",
        ));
    };

    let list_query = SubmissionListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        assignment_id: assignment.id,
        student_id,
        status: query.status,
    };
    let response = storage
        .list_submissions_with_pagination(list_query)
        .await
        .map_err(storage_error("Failed to list submissions"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Success")))
}
