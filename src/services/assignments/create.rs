use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::{AssignmentService, require_managed_class};
use crate::models::{ApiResponse, ValidationErrors, assignments::requests::AssignmentRequest};
use crate::services::{Outcome, current_user, storage_error};

pub async fn create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    body: AssignmentRequest,
) -> Outcome {
    let user = current_user(request)?;
    let input = body
        .validate()
        .map_err(ApiResponse::<ValidationErrors>::validation_failed)?;

    let storage = service.get_storage(request)?;
    // 作业归属班级教师，管理员代发时也是如此
    let teacher_id = require_managed_class(&storage, &user, input.class_id).await?;

    let assignment = storage
        .create_assignment(teacher_id, input)
        .await
        .map_err(storage_error("Assignment creation failed"))?;

    info!(
        "Assignment {} created in class {} by {}",
        assignment.id, assignment.class_id, user.username
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(assignment, "Assignment created")))
}
