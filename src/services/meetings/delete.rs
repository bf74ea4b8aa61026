use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::{MeetingService, load_meeting_access};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::can_manage_meeting;
use crate::services::{Outcome, current_user, forbidden, not_found, storage_error};

pub async fn delete_meeting(
    service: &MeetingService,
    request: &HttpRequest,
    meeting_id: i64,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let (meeting, access) = load_meeting_access(&storage, &user, meeting_id).await?;
    if !can_manage_meeting(access, &user, &meeting) {
        return Err(forbidden(
            ErrorCode::MeetingPermissionDenied,
            "You cannot delete this meeting",
        ));
    }

    if !storage
        .delete_meeting(meeting.id)
        .await
        .map_err(storage_error("Meeting deletion failed"))?
    {
        return Err(not_found(ErrorCode::MeetingNotFound, "Meeting not found"));
    }

    info!("Meeting {} deleted by {}", meeting.id, user.username);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Meeting deleted")))
}
