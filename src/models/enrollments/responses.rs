use super::entities::EnrollmentWithStudent;
use crate::models::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentListResponse {
    pub pagination: PaginationInfo,
    pub items: Vec<EnrollmentWithStudent>,
}
