use super::entities::Meeting;
use crate::models::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/meeting.ts")]
pub struct MeetingListResponse {
    pub pagination: PaginationInfo,
    pub items: Vec<Meeting>,
}
