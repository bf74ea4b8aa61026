use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::ClassService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::files::remove_objects;
use crate::services::{Outcome, class_context, current_user, not_found, storage_error};

pub async fn delete_class(service: &ClassService, request: &HttpRequest) -> Outcome {
    let user = current_user(request)?;
    let ctx = class_context(request)?;
    let storage = service.get_storage(request)?;

    // 选课、作业、提交和会议随班级一起删除
    let orphaned = storage
        .delete_class(ctx.class.id)
        .await
        .map_err(storage_error("Class deletion failed"))?
        .ok_or_else(|| not_found(ErrorCode::ClassNotFound, "Class not found"))?;
    remove_objects(&orphaned).await;

    info!("Class {} deleted by {}", ctx.class.id, user.username);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Class deleted")))
}
