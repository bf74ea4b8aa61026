use actix_web::{HttpRequest, HttpResponse};

use super::MeetingService;
use crate::models::{
    ApiResponse,
    meetings::requests::{MeetingListParams, MeetingListQuery},
    users::entities::UserRole,
};
use crate::services::{Outcome, current_user, storage_error};

pub async fn list_meetings(
    service: &MeetingService,
    request: &HttpRequest,
    query: MeetingListParams,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let (teacher_id, student_id) = match user.role {
        UserRole::Admin => (None, None),
        UserRole::Teacher => (Some(user.id), None),
        UserRole::Student => (None, Some(user.id)),
    };

    let list_query = MeetingListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        class_id: query.class_id,
        teacher_id,
        student_id,
        upcoming_after: query.upcoming.unwrap_or(false).then(chrono::Utc::now),
    };
    let response = storage
        .list_meetings_with_pagination(list_query)
        .await
        .map_err(storage_error("Failed to list meetings"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Success")))
}
