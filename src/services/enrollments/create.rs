use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::{EnrollmentService, enrollment_error};
use crate::models::{
    ApiResponse, ErrorCode,
    enrollments::{entities::EnrollmentStatus, requests::EnrollStudentRequest},
    users::entities::UserRole,
};
use crate::services::{
    Outcome, bad_request, class_context, current_user, forbidden, not_found, storage_error,
};

pub async fn enroll_student(
    service: &EnrollmentService,
    request: &HttpRequest,
    body: EnrollStudentRequest,
) -> Outcome {
    let ctx = class_context(request)?;
    let storage = service.get_storage(request)?;

    let student = storage
        .get_user_by_id(body.student_id)
        .await
        .map_err(storage_error("Enrollment failed"))?
        .ok_or_else(|| not_found(ErrorCode::UserNotFound, "Student not found"))?;
    if student.role != UserRole::Student {
        return Err(bad_request(
            ErrorCode::UserRoleInvalid,
            "Only students can be enrolled",
        ));
    }

    let enrollment = storage
        .enroll_student(ctx.class.id, student.id, EnrollmentStatus::Active)
        .await
        .map_err(enrollment_error)?;

    info!("Student {} enrolled in class {}", student.id, ctx.class.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(enrollment, "Student enrolled")))
}

pub async fn request_enrollment(service: &EnrollmentService, request: &HttpRequest) -> Outcome {
    let user = current_user(request)?;
    if user.role != UserRole::Student {
        return Err(forbidden(
            ErrorCode::PermissionDenied,
            "Only students can request enrollment",
        ));
    }
    let ctx = class_context(request)?;
    let storage = service.get_storage(request)?;

    let enrollment = storage
        .enroll_student(ctx.class.id, user.id, EnrollmentStatus::Pending)
        .await
        .map_err(enrollment_error)?;

    info!("Student {} requested to join class {}", user.id, ctx.class.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(
        enrollment,
        "Enrollment request submitted",
    )))
}
