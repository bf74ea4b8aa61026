use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::MeetingService;
use crate::models::{
    ApiResponse, ErrorCode, ValidationErrors,
    meetings::requests::{CreateMeetingRequest, NewMeeting},
};
use crate::services::access::load_class_access;
use crate::services::{Outcome, current_user, forbidden, not_found, storage_error};

pub async fn create_meeting(
    service: &MeetingService,
    request: &HttpRequest,
    body: CreateMeetingRequest,
) -> Outcome {
    let user = current_user(request)?;
    if let Err(errors) = body.validate() {
        return Err(ApiResponse::<ValidationErrors>::validation_failed(errors));
    }

    let storage = service.get_storage(request)?;
    let (class, access) = load_class_access(&storage, &user, body.class_id)
        .await
        .map_err(storage_error("Failed to load class"))?
        .ok_or_else(|| not_found(ErrorCode::ClassNotFound, "Class not found"))?;
    if !access.can_manage() {
        return Err(forbidden(
            ErrorCode::ClassPermissionDenied,
            "You do not manage this class",
        ));
    }

    let meeting = storage
        .create_meeting(NewMeeting {
            class_id: class.id,
            host_id: user.id,
            title: body.title.trim().to_string(),
            description: body.description,
            start_time: body.start_time,
            end_time: body.end_time,
            meeting_url: body.meeting_url,
        })
        .await
        .map_err(storage_error("Meeting creation failed"))?;

    info!("Meeting {} scheduled for class {}", meeting.id, class.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(meeting, "Meeting created")))
}
