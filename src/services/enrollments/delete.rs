use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::EnrollmentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::can_delete_enrollment;
use crate::services::{
    Outcome, class_context, current_user, forbidden, not_found, storage_error,
};

pub async fn delete_enrollment(
    service: &EnrollmentService,
    request: &HttpRequest,
    enrollment_id: i64,
) -> Outcome {
    let user = current_user(request)?;
    let ctx = class_context(request)?;
    let storage = service.get_storage(request)?;

    let enrollment = storage
        .get_enrollment_by_id(enrollment_id)
        .await
        .map_err(storage_error("Failed to load enrollment"))?
        .filter(|e| e.class_id == ctx.class.id)
        .ok_or_else(|| not_found(ErrorCode::EnrollmentNotFound, "Enrollment not found"))?;

    if !can_delete_enrollment(ctx.access, &user, &enrollment) {
        return Err(forbidden(
            ErrorCode::ClassPermissionDenied,
            "You cannot remove this enrollment",
        ));
    }

    if !storage
        .delete_enrollment(enrollment.id)
        .await
        .map_err(storage_error("Failed to delete enrollment"))?
    {
        return Err(not_found(ErrorCode::EnrollmentNotFound, "Enrollment not found"));
    }

    info!(
        "Enrollment {} (student {}) removed from class {} by {}",
        enrollment.id, enrollment.student_id, ctx.class.id, user.username
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Enrollment removed")))
}
