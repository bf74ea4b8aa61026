use actix_web::{HttpRequest, HttpResponse};

use super::ClassService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{Outcome, class_context, not_found, storage_error};

pub async fn get_class(service: &ClassService, request: &HttpRequest) -> Outcome {
    let ctx = class_context(request)?;
    let storage = service.get_storage(request)?;

    let detail = storage
        .get_class_detail(ctx.class.id)
        .await
        .map_err(storage_error("Failed to get class"))?
        .ok_or_else(|| not_found(ErrorCode::ClassNotFound, "Class not found"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "Success")))
}
