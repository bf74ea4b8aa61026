use actix_web::{HttpRequest, HttpResponse};

use super::{EnrollmentService, enrollment_error};
use crate::errors::LmsError;
use crate::models::{
    ApiResponse, ErrorCode,
    enrollments::{entities::EnrollmentStatus, requests::UpdateEnrollmentRequest},
};
use crate::services::{Outcome, bad_request, class_context, not_found, storage_error};

pub async fn approve_enrollment(
    service: &EnrollmentService,
    request: &HttpRequest,
    enrollment_id: i64,
    body: UpdateEnrollmentRequest,
) -> Outcome {
    let ctx = class_context(request)?;
    if body.status != EnrollmentStatus::Active {
        return Err(bad_request(
            ErrorCode::EnrollmentStateInvalid,
            "Enrollments can only be approved",
        ));
    }

    let storage = service.get_storage(request)?;
    let enrollment = storage
        .get_enrollment_by_id(enrollment_id)
        .await
        .map_err(storage_error("Failed to load enrollment"))?
        .filter(|e| e.class_id == ctx.class.id)
        .ok_or_else(|| not_found(ErrorCode::EnrollmentNotFound, "Enrollment not found"))?;

    match storage.approve_enrollment(enrollment.id).await {
        Ok(enrollment) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            enrollment,
            "Enrollment approved",
        ))),
        Err(LmsError::Validation(msg)) => Err(bad_request(ErrorCode::EnrollmentStateInvalid, msg)),
        Err(e) => Err(enrollment_error(e)),
    }
}
