use actix_web::{HttpRequest, HttpResponse};

use super::{SubmissionService, load_submission_access};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::can_view_submission;
use crate::services::{Outcome, current_user, forbidden, not_found, storage_error};

pub async fn get_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let (submission, access) = load_submission_access(&storage, &user, submission_id).await?;
    if !can_view_submission(access, &user, &submission) {
        return Err(forbidden(
            ErrorCode::SubmissionPermissionDenied,
            "You do not have access to this submission",
        ));
    }

    let detail = storage
        .get_submission_detail(submission.id)
        .await
        .map_err(storage_error("Failed to load submission"))?
        .ok_or_else(|| not_found(ErrorCode::SubmissionNotFound, "Submission not found"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "Success")))
}
