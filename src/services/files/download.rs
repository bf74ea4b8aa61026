use actix_web::{HttpRequest, HttpResponse, http::StatusCode, http::header};
use tracing::error;

use super::{FileService, store::object_path};
use crate::errors::LmsError;
use crate::models::{ErrorCode, files::entities::StoredFileRef};
use crate::services::access::can_view_submission;
use crate::services::assignments::load_assignment_access;
use crate::services::{Outcome, current_user, error_response, forbidden, not_found, storage_error};

pub async fn handle_download(
    service: &FileService,
    request: &HttpRequest,
    storage_key: String,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let file = storage
        .find_file_by_storage_key(&storage_key)
        .await
        .map_err(storage_error("File lookup failed"))?
        .ok_or_else(|| not_found(ErrorCode::FileNotFound, "File not found"))?;

    // 与所属作业或提交相同的访问规则
    let allowed = match &file {
        StoredFileRef::Assignment(f) => {
            let (_, access) = load_assignment_access(&storage, &user, f.assignment_id).await?;
            access.can_view()
        }
        StoredFileRef::Submission(f) => {
            let submission = storage
                .get_submission_by_id(f.submission_id)
                .await
                .map_err(storage_error("File lookup failed"))?
                .ok_or_else(|| not_found(ErrorCode::SubmissionNotFound, "Submission not found"))?;
            let (_, access) =
                load_assignment_access(&storage, &user, submission.assignment_id).await?;
            can_view_submission(access, &user, &submission)
        }
    };
    if !allowed {
        return Err(forbidden(
            ErrorCode::PermissionDenied,
            "You do not have access to this file",
        ));
    }

    let body = match tokio::fs::read(object_path(&storage_key)).await {
        Ok(body) => body,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            error!("Stored object missing for key {}", storage_key);
            return Err(not_found(ErrorCode::FileNotFound, "File not found"));
        }
        Err(e) => {
            error!("{}", LmsError::from(e));
            return Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "File read failed",
            ));
        }
    };

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, file.content_type().to_string()))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                file.file_name().replace(['"', '\\', '\r', '\n'], "_")
            ),
        ))
        .body(body))
}
