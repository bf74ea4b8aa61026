use actix_web::{HttpRequest, HttpResponse};

use super::UserService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{Outcome, not_found, storage_error};

pub async fn get_user(service: &UserService, user_id: i64, request: &HttpRequest) -> Outcome {
    let storage = service.get_storage(request)?;

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(storage_error("Failed to get user"))?
        .ok_or_else(|| not_found(ErrorCode::UserNotFound, "User not found"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(user, "Success")))
}
