use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::{AssignmentService, load_assignment_access};
use crate::models::{ApiResponse, ErrorCode, files::responses::FileUploadResponse};
use crate::services::files::{discard, receive_upload};
use crate::services::{Outcome, current_user, forbidden, not_found, storage_error};

pub async fn upload_file(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    payload: Multipart,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    // 先鉴权再接收文件，避免无权用户占用磁盘
    let (assignment, access) = load_assignment_access(&storage, &user, assignment_id).await?;
    if !access.can_manage() {
        return Err(forbidden(
            ErrorCode::AssignmentPermissionDenied,
            "You cannot attach files to this assignment",
        ));
    }

    let record = receive_upload(payload).await?;
    let storage_key = record.storage_key.clone();
    match storage
        .create_assignment_file(assignment.id, user.id, record)
        .await
    {
        Ok(file) => {
            info!("File {} attached to assignment {}", file.id, assignment.id);
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
        .map_err(storage_error("Failed to list files"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(files, "Success")))
}

pub async fn delete_file(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    file_id: i64,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let (assignment, access) = load_assignment_access(&storage, &user, assignment_id).await?;
    if !access.can_manage() {
        return Err(forbidden(
            ErrorCode::AssignmentPermissionDenied,
            "You cannot remove files from this assignment",
        ));
    }

    let file = storage
        .get_assignment_file(assignment.id, file_id)
        .await
        .map_err(storage_error("Failed to load file"))?
        .ok_or_else(|| not_found(ErrorCode::FileNotFound, "File not found"))?;
    storage
        .delete_assignment_file(file.id)
        .await
        .map_err(storage_error("Failed to delete file"))?;
    discard(&file.storage_key).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("File deleted")))
}
