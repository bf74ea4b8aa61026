use super::entities::{AssignmentFile, SubmissionFile};
use serde::Serialize;
use ts_rs::TS;

/// 上传结果：公开地址与元数据记录 ID
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/file.ts")]
pub struct FileUploadResponse {
    pub id: i64,
    pub url: String,
    pub file_name: String,
    pub file_size: i64,
    pub content_type: String,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

impl From<AssignmentFile> for FileUploadResponse {
    fn from(f: AssignmentFile) -> Self {
        Self {
            id: f.id,
            url: f.url,
            file_name: f.file_name,
            file_size: f.file_size,
            content_type: f.content_type,
            uploaded_at: f.uploaded_at,
        }
    }
}

impl From<SubmissionFile> for FileUploadResponse {
    fn from(f: SubmissionFile) -> Self {
        Self {
            id: f.id,
            url: f.url,
            file_name: f.file_name,
            file_size: f.file_size,
            content_type: f.content_type,
            uploaded_at: f.uploaded_at,
        }
    }
}
