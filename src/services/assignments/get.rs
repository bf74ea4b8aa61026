use actix_web::{HttpRequest, HttpResponse};

use super::{AssignmentService, load_assignment_access};
use crate::models::{ApiResponse, ErrorCode, assignments::entities::AssignmentDetail};
use crate::services::{Outcome, current_user, forbidden, storage_error};

pub async fn get_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let (assignment, access) = load_assignment_access(&storage, &user, assignment_id).await?;
    if !access.can_view() {
        return Err(forbidden(
            ErrorCode::AssignmentPermissionDenied,
            "You do not have access to this assignment",
        ));
    }

    let files = storage
        .list_assignment_files(assignment.id)
        .await
        .map_err(storage_error("Failed to load assignment files"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AssignmentDetail { assignment, files },
        "Success",
    )))
}
