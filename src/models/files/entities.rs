use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::AppConfig;

/// 文件对外下载地址
pub fn public_url(storage_key: &str) -> String {
    format!(
        "{}/api/v1/files/{storage_key}",
        AppConfig::get().upload.public_base_url
    )
}

// 作业附件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/file.ts")]
pub struct AssignmentFile {
    pub id: i64,
    pub assignment_id: i64,
    pub uploaded_by: i64,
    pub file_name: String,
    pub storage_key: String,
    pub file_size: i64,
    pub content_type: String,
    pub url: String,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

// 提交附件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/file.ts")]
pub struct SubmissionFile {
    pub id: i64,
    pub submission_id: i64,
    pub file_name: String,
    pub storage_key: String,
    pub file_size: i64,
    pub content_type: String,
    pub url: String,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

/// 已写入磁盘、待登记元数据的文件
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    pub file_name: String,
    pub storage_key: String,
    pub file_size: i64,
    pub content_type: String,
}

/// 按存储键找到的文件及其归属
#[derive(Debug, Clone, PartialEq)]
pub enum StoredFileRef {
    Assignment(AssignmentFile),
    Submission(SubmissionFile),
}

impl StoredFileRef {
    pub fn file_name(&self) -> &str {
        match self {
            StoredFileRef::Assignment(f) => &f.file_name,
            StoredFileRef::Submission(f) => &f.file_name,
        }
    }

    pub fn content_type(&self) -> &str {
        match self {
            StoredFileRef::Assignment(f) => &f.content_type,
            StoredFileRef::Submission(f) => &f.content_type,
        }
    }
}
