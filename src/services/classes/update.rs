use actix_web::{HttpRequest, HttpResponse};

use super::ClassService;
use crate::errors::LmsError;
use crate::models::{
    ApiResponse, ErrorCode, ValidationErrors, classes::requests::UpdateClassRequest,
};
use crate::services::{Outcome, class_context, conflict, not_found, storage_error};

pub async fn update_class(
    service: &ClassService,
    request: &HttpRequest,
    update_data: UpdateClassRequest,
) -> Outcome {
    let ctx = class_context(request)?;
    if let Err(errors) = update_data.validate() {
        return Err(ApiResponse::<ValidationErrors>::validation_failed(errors));
    }

    let storage = service.get_storage(request)?;
    match storage.update_class(ctx.class.id, update_data).await {
        Ok(Some(class)) => Ok(HttpResponse::Ok().json(ApiResponse::success(class, "Class updated"))),
        Ok(None) => Err(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(LmsError::CapacityExceeded(msg)) => {
            Err(conflict(ErrorCode::ClassCapacityTooLow, msg))
        }
        Err(e) => Err(storage_error("Class update failed")(e)),
    }
}
