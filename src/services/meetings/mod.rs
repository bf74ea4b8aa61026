pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ErrorCode,
    meetings::{
        entities::Meeting,
        requests::{CreateMeetingRequest, MeetingListParams, UpdateMeetingRequest},
    },
    users::entities::User,
};
use crate::services::access::{ClassAccess, load_class_access};
use crate::storage::Storage;

use super::{finish, not_found, storage_error, storage_from_request};

pub struct MeetingService {
    storage: Option<Arc<dyn Storage>>,
}

impl MeetingService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(
        &self,
        request: &HttpRequest,
    ) -> Result<Arc<dyn Storage>, HttpResponse> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => storage_from_request(request),
        }
    }

    pub async fn list_meetings(
        &self,
        request: &HttpRequest,
        query: MeetingListParams,
    ) -> ActixResult<HttpResponse> {
        finish(list::list_meetings(self, request, query).await)
    }

    pub async fn create_meeting(
        &self,
        request: &HttpRequest,
        body: CreateMeetingRequest,
    ) -> ActixResult<HttpResponse> {
        finish(create::create_meeting(self, request, body).await)
    }

    pub async fn get_meeting(
        &self,
        request: &HttpRequest,
        meeting_id: i64,
    ) -> ActixResult<HttpResponse> {
        finish(get::get_meeting(self, request, meeting_id).await)
    }

    pub async fn update_meeting(
        &self,
        request: &HttpRequest,
        meeting_id: i64,
        body: UpdateMeetingRequest,
    ) -> ActixResult<HttpResponse> {
        finish(update::update_meeting(self, request, meeting_id, body).await)
    }

    pub async fn delete_meeting(
        &self,
        request: &HttpRequest,
        meeting_id: i64,
    ) -> ActixResult<HttpResponse> {
        finish(delete::delete_meeting(self, request, meeting_id).await)
    }
}

/// 加载会议并判定当前用户与其班级的关系
pub(crate) async fn load_meeting_access(
    storage: &Arc<dyn Storage>,
    user: &User,
    meeting_id: i64,
) -> Result<(Meeting, ClassAccess), HttpResponse> {
    let meeting = storage
        .get_meeting_by_id(meeting_id)
        .await
        .map_err(storage_error("Failed to load meeting"))?
        .ok_or_else(|| not_found(ErrorCode::MeetingNotFound, "Meeting not found"))?;
    let (_, access) = load_class_access(storage, user, meeting.class_id)
        .await
        .map_err(storage_error("Failed to load class"))?
        .ok_or_else(|| not_found(ErrorCode::ClassNotFound, "Class not found"))?;
    Ok((meeting, access))
}
