use actix_web::{HttpRequest, HttpResponse};

use super::EnrollmentService;
use crate::models::{
    ApiResponse,
    enrollments::requests::{EnrollmentListParams, EnrollmentListQuery},
};
use crate::services::{Outcome, class_context, storage_error};

pub async fn list_enrollments(
    service: &EnrollmentService,
    request: &HttpRequest,
    query: EnrollmentListParams,
) -> Outcome {
    let ctx = class_context(request)?;
    let storage = service.get_storage(request)?;

    let list_query = EnrollmentListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        status: query.status,
    };
    let response = storage
        .list_enrollments_with_pagination(ctx.class.id, list_query)
        .await
        .map_err(storage_error("Failed to list enrollments"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Success")))
}
