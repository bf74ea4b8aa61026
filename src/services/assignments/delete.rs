use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::AssignmentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::files::remove_objects;
use crate::services::{Outcome, current_user, forbidden, not_found, storage_error};

pub async fn delete_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> Outcome {
    let user = current_user(request)?;
    // 路由已限制为管理员，这里再确认一次
    if !user.is_admin() {
        return Err(forbidden(
            ErrorCode::AssignmentPermissionDenied,
            "Only administrators can delete assignments",
        ));
    }

    let storage = service.get_storage(request)?;
    let orphaned = storage
        .delete_assignment(assignment_id)
        .await
        .map_err(storage_error("Assignment deletion failed"))?
        .ok_or_else(|| not_found(ErrorCode::AssignmentNotFound, "Assignment not found"))?;
    remove_objects(&orphaned).await;

    info!("Assignment {} deleted by {}", assignment_id, user.username);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Assignment deleted")))
}
