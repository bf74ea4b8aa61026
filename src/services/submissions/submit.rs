use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::SubmissionService;
use crate::errors::LmsError;
use crate::models::{
    ApiResponse, ErrorCode, ValidationErrors, submissions::requests::SubmitAssignmentRequest,
};
use crate::services::access::ClassAccess;
use crate::services::assignments::load_assignment_access;
use crate::services::{Outcome, conflict, current_user, forbidden, storage_error};

pub async fn submit(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    body: SubmitAssignmentRequest,
) -> Outcome {
    let user = current_user(request)?;
    if let Err(errors) = body.validate() {
        return Err(ApiResponse::<ValidationErrors>::validation_failed(errors));
    }

    let storage = service.get_storage(request)?;
    let (assignment, access) = load_assignment_access(&storage, &user, assignment_id).await?;
    if access != ClassAccess::ActiveStudent {
        return Err(forbidden(
            ErrorCode::NotEnrolled,
            "Only students enrolled in the class can submit",
        ));
    }

    let existed = storage
        .get_submission_by_assignment_and_student(assignment.id, user.id)
        .await
        .map_err(storage_error("Submission failed"))?
        .is_some();

    let submission = match storage
        .submit_assignment(assignment.id, user.id, body.content, assignment.due_date)
        .await
    {
        Ok(submission) => submission,
        Err(LmsError::Conflict(_)) => {
            return Err(conflict(
                ErrorCode::SubmissionAlreadyGraded,
                "Submission has already been graded",
            ));
        }
        Err(e) => return Err(storage_error("Submission failed")(e)),
    };

    info!(
        "Student {} submitted assignment {} ({})",
        user.id, assignment.id, submission.status
    );
    if existed {
        Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "Submission updated")))
    } else {
        Ok(HttpResponse::Created().json(ApiResponse::success(submission, "Submission created")))
    }
}
