use actix_web::{HttpRequest, HttpResponse};

use super::{MeetingService, load_meeting_access};
use crate::models::{
    ApiResponse, ErrorCode, ValidationErrors, meetings::requests::UpdateMeetingRequest,
};
use crate::services::access::can_manage_meeting;
use crate::services::{Outcome, current_user, forbidden, not_found, storage_error};

pub async fn update_meeting(
    service: &MeetingService,
    request: &HttpRequest,
    meeting_id: i64,
    body: UpdateMeetingRequest,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let (meeting, access) = load_meeting_access(&storage, &user, meeting_id).await?;
    if !can_manage_meeting(access, &user, &meeting) {
        return Err(forbidden(
            ErrorCode::MeetingPermissionDenied,
            "You cannot edit this meeting",
        ));
    }

    // 与现有时间合并后再检查起止顺序
    if let Err(errors) = body.validate(meeting.start_time, meeting.end_time) {
        return Err(ApiResponse::<ValidationErrors>::validation_failed(errors));
    }

    let updated = storage
        .update_meeting(meeting.id, body)
        .await
        .map_err(storage_error("Meeting update failed"))?
        .ok_or_else(|| not_found(ErrorCode::MeetingNotFound, "Meeting not found"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "Meeting updated")))
}
