use super::entities::SubmissionWithStudent;
use crate::models::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionListResponse {
    pub pagination: PaginationInfo,
    pub items: Vec<SubmissionWithStudent>,
}
