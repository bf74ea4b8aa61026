use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::{SubmissionService, load_submission_access};
use crate::models::{ApiResponse, ErrorCode, files::responses::FileUploadResponse};
use crate::services::access::{can_modify_submission_files, can_view_submission};
use crate::services::files::{discard, receive_upload};
use crate::services::{Outcome, conflict, current_user, forbidden, not_found, storage_error};

pub async fn upload_file(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
    payload: Multipart,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let (submission, access) = load_submission_access(&storage, &user, submission_id).await?;

    // 只有仍在班级中的提交者本人可以上传，教师和管理员也不行
    if !can_modify_submission_files(access, &user, &submission) {
        return Err(forbidden(
            ErrorCode::SubmissionPermissionDenied,
            "Only the submitting student can upload files",
        ));
    }
    if submission.is_graded() {
        return Err(conflict(
            ErrorCode::SubmissionAlreadyGraded,
            "Submission has already been graded",
        ));
    }

    let record = receive_upload(payload).await?;
    let storage_key = record.storage_key.clone();
    match storage.create_submission_file(submission.id, record).await {
        Ok(file) => {
            info!("File {} attached to submission {}", file.id, submission.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                FileUploadResponse::from(file),
                "File uploaded successfully",
            )))
        }
        Err(e) => {
            discard(&storage_key).await;
            Err(storage_error("Failed to save file metadata")(e))
        }
    }
}

pub async fn list_files(
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

    let files = storage
        .list_submission_files(submission.id)
        .await
        .map_err(storage_error("Failed to list files"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(files, "Success")))
}

pub async fn delete_file(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
    file_id: i64,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let (submission, access) = load_submission_access(&storage, &user, submission_id).await?;
    if !can_modify_submission_files(access, &user, &submission) {
        return Err(forbidden(
            ErrorCode::SubmissionPermissionDenied,
            "Only the submitting student can remove files",
        ));
    }
    if submission.is_graded() {
        return Err(conflict(
            ErrorCode::SubmissionAlreadyGraded,
            "Submission has already been graded",
        ));
    }

    let file = storage
        .get_submission_file(submission.id, file_id)
        .await
        .map_err(storage_error("Failed to load file"))?
        .ok_or_else(|| not_found(ErrorCode::FileNotFound, "File not found"))?;
    storage
        .delete_submission_file(file.id)
        .await
        .map_err(storage_error("Failed to delete file"))?;
    discard(&file.storage_key).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("File deleted")))
}
