use actix_web::{HttpRequest, HttpResponse};

use super::{AssignmentService, load_assignment_access, require_managed_class};
use crate::models::{
    ApiResponse, ErrorCode, ValidationErrors, assignments::requests::AssignmentRequest,
};
use crate::services::{Outcome, current_user, forbidden, not_found, storage_error};

pub async fn update_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    body: AssignmentRequest,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let (assignment, access) = load_assignment_access(&storage, &user, assignment_id).await?;
    if !access.can_manage() {
        return Err(forbidden(
            ErrorCode::AssignmentPermissionDenied,
            "You cannot edit this assignment",
        ));
    }

    // 整体编辑：所有字段必填，逐字段报告错误
    let input = body
        .validate()
        .map_err(ApiResponse::<ValidationErrors>::validation_failed)?;

    // 移到其他班级时，目标班级也必须由当前用户管理
    let teacher_id = if input.class_id == assignment.class_id {
        assignment.teacher_id
    } else {
        require_managed_class(&storage, &user, input.class_id).await?
    };

    let updated = storage
        .update_assignment(assignment.id, teacher_id, input)
        .await
        .map_err(storage_error("Assignment update failed"))?
        .ok_or_else(|| not_found(ErrorCode::AssignmentNotFound, "Assignment not found"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "Assignment updated")))
}
