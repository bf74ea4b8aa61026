use actix_web::{HttpRequest, HttpResponse};

use super::{MeetingService, load_meeting_access};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::can_view_meeting;
use crate::services::{Outcome, current_user, forbidden};

pub async fn get_meeting(
    service: &MeetingService,
    request: &HttpRequest,
    meeting_id: i64,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let (meeting, access) = load_meeting_access(&storage, &user, meeting_id).await?;
    if !can_view_meeting(access, &user, &meeting) {
        return Err(forbidden(
            ErrorCode::MeetingPermissionDenied,
            "You do not have access to this meeting",
        ));
    }
    Ok(HttpResponse::Ok().json(ApiResponse::success(meeting, "Success")))
}
