use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::SubmissionService;
use crate::models::{
    ApiResponse, ErrorCode, ValidationErrors,
    submissions::requests::{GradeInput, GradeSubmissionRequest},
};
use crate::services::assignments::load_assignment_access;
use crate::services::{Outcome, current_user, forbidden, not_found, storage_error};

pub async fn grade_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
    body: GradeSubmissionRequest,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let submission = storage
        .get_submission_by_id(submission_id)
        .await
        .map_err(storage_error("Failed to load submission"))?
        .ok_or_else(|| not_found(ErrorCode::SubmissionNotFound, "Submission not found"))?;
    let (assignment, access) =
        load_assignment_access(&storage, &user, submission.assignment_id).await?;
    if !access.can_manage() {
        return Err(forbidden(
            ErrorCode::SubmissionPermissionDenied,
            "Only the class teacher can grade this submission",
        ));
    }

    // 分数范围 0..=points
    if let Err(errors) = body.validate(assignment.points) {
        let code = if errors.has("grade") {
            ErrorCode::GradeOutOfRange
        } else {
            ErrorCode::ValidationFailed
        };
        return Err(HttpResponse::BadRequest().json(ApiResponse::<ValidationErrors>::error(
            code,
            errors,
            "Validation failed",
        )));
    }

    let graded = storage
        .grade_submission(
            submission.id,
            GradeInput {
                grade: body.grade,
                feedback: body.feedback,
                graded_by: user.id,
            },
        )
        .await
        .map_err(storage_error("Grading failed"))?
        .ok_or_else(|| not_found(ErrorCode::SubmissionNotFound, "Submission not found"))?;

    info!(
        "Submission {} graded {} by {}",
        graded.id, body.grade, user.username
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(graded, "Submission graded")))
}
