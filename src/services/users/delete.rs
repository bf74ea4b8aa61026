use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::UserService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::files::remove_objects;
use crate::services::{
    Outcome, bad_request, current_user, forget_cached_user, not_found, storage_error,
};

pub async fn delete_user(service: &UserService, user_id: i64, request: &HttpRequest) -> Outcome {
    let current = current_user(request)?;
    if current.id == user_id {
        return Err(bad_request(
            ErrorCode::CanNotDeleteCurrentUser,
            "Cannot delete current user",
        ));
    }

    let storage = service.get_storage(request)?;
    let orphaned = storage
        .delete_user(user_id)
        .await
        .map_err(storage_error("User deletion failed"))?
        .ok_or_else(|| not_found(ErrorCode::UserNotFound, "User not found"))?;

    remove_objects(&orphaned).await;
    forget_cached_user(request, user_id).await;
    info!("User {} deleted by {}", user_id, current.username);

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("User deleted successfully")))
}
