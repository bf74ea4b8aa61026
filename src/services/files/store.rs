//! 上传文件落盘
//!
//! 作业附件和提交附件共用同一套流程：单个 `file` 字段、扩展名白名单、
//! 魔术字节校验、流式大小限制，最后以随机 UUID 作为存储键写入上传目录。

use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, http::StatusCode};
use futures_util::{StreamExt, TryStreamExt};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{error, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::errors::LmsError;
use crate::models::{ErrorCode, files::entities::NewFileRecord};
use crate::services::{bad_request, error_response};
use crate::utils::validate_magic_bytes;

const FILE_FIELD: &str = "file";
// 覆盖所有签名偏移所需的最少字节
const MAGIC_PROBE_LEN: usize = 16;
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

pub(crate) fn object_path(storage_key: &str) -> PathBuf {
    Path::new(&AppConfig::get().upload.dir).join(storage_key)
}

/// 取出小写扩展名（含点号），不在白名单内返回 None
pub(crate) fn allowed_extension(file_name: &str, allowed_types: &[String]) -> Option<String> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))?;
    allowed_types
        .iter()
        .any(|t| t.eq_ignore_ascii_case(&extension))
        .then_some(extension)
}

fn upload_failed(context: &str, err: impl std::fmt::Display) -> HttpResponse {
    error!("{}", LmsError::file_operation(format!("{context}: {err}")));
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorCode::FileUploadFailed,
        "File upload failed",
    )
}

/// 读取 multipart 请求并写入磁盘，返回待登记的元数据
///
/// 任意一步失败都会删除已写入的对象。
pub(crate) async fn receive_upload(mut payload: Multipart) -> Result<NewFileRecord, HttpResponse> {
    let config = &AppConfig::get().upload;
    tokio::fs::create_dir_all(&config.dir)
        .await
        .map_err(|e| upload_failed("create upload dir", e))?;

    let mut received: Option<NewFileRecord> = None;

    loop {
        let field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                if let Some(record) = &received {
                    discard(&record.storage_key).await;
                }
                return Err(bad_request(
                    ErrorCode::FileUploadFailed,
                    format!("Malformed multipart payload: {e}"),
                ));
            }
        };

        let Some(cd) = field.content_disposition() else {
            continue;
        };
        if cd.get_name() != Some(FILE_FIELD) {
            continue;
        }

        if let Some(record) = &received {
            discard(&record.storage_key).await;
            return Err(bad_request(
                ErrorCode::MultifileUploadNotAllowed,
                "Only one file can be uploaded at a time",
            ));
        }

        let file_name = cd
            .get_filename()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| bad_request(ErrorCode::FileUploadFailed, "File name is missing"))?;

        let extension = allowed_extension(&file_name, &config.allowed_types).ok_or_else(|| {
            bad_request(ErrorCode::FileTypeNotAllowed, "File type not allowed")
        })?;

        let content_type = field
            .content_type()
            .map(|ct| ct.to_string())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        let storage_key = format!("{}{}", Uuid::new_v4(), extension);
        let file_size = match write_field(field, &storage_key, &extension, config.max_size).await {
            Ok(size) => size,
            Err(resp) => {
                discard(&storage_key).await;
                return Err(resp);
            }
        };

        received = Some(NewFileRecord {
            file_name,
            storage_key,
            file_size,
            content_type,
        });
    }

    received.ok_or_else(|| {
        bad_request(
            ErrorCode::FileNotFound,
            "No file found in upload payload",
        )
    })
}

async fn write_field(
    mut field: Field,
    storage_key: &str,
    extension: &str,
    max_size: usize,
) -> Result<i64, HttpResponse> {
    let mut file = tokio::fs::File::create(object_path(storage_key))
        .await
        .map_err(|e| upload_failed("create object", e))?;

    // 凑够探测长度前先缓存，避免首个分片过短导致误判
    let mut probe: Option<Vec<u8>> = Some(Vec::with_capacity(MAGIC_PROBE_LEN));
    let mut total_size: usize = 0;

    while let Some(chunk) = field.next().await {
        let data = chunk.map_err(|e| {
            bad_request(
                ErrorCode::FileUploadFailed,
                format!("Upload interrupted: {e}"),
            )
        })?;

        total_size += data.len();
        if total_size > max_size {
            return Err(bad_request(
                ErrorCode::FileSizeExceeded,
                "File size exceeds the limit",
            ));
        }

        match probe.as_mut() {
            Some(head) => {
                head.extend_from_slice(&data);
                if head.len() >= MAGIC_PROBE_LEN {
                    let head = probe.take().unwrap_or_default();
                    check_magic(&head, extension)?;
                    file.write_all(&head)
                        .await
                        .map_err(|e| upload_failed("write object", e))?;
                }
            }
            None => file
                .write_all(&data)
                .await
                .map_err(|e| upload_failed("write object", e))?,
        }
    }

    // 小于探测长度的文件
    if let Some(head) = probe {
        check_magic(&head, extension)?;
        file.write_all(&head)
            .await
            .map_err(|e| upload_failed("write object", e))?;
    }

    file.flush()
        .await
        .map_err(|e| upload_failed("flush object", e))?;
    Ok(total_size as i64)
}

fn check_magic(head: &[u8], extension: &str) -> Result<(), HttpResponse> {
    if validate_magic_bytes(head, extension) {
        Ok(())
    } else {
        Err(bad_request(
            ErrorCode::FileTypeNotAllowed,
            "File content does not match its extension",
        ))
    }
}

/// 删除单个对象，不存在时忽略
pub(crate) async fn discard(storage_key: &str) {
    if let Err(e) = tokio::fs::remove_file(object_path(storage_key)).await
        && e.kind() != std::io::ErrorKind::NotFound
    {
        warn!("Failed to remove stored object {}: {}", storage_key, e);
    }
}

/// 记录删除后清理磁盘上的对象
pub(crate) async fn remove_objects(storage_keys: &[String]) {
    for key in storage_keys {
        discard(key).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        vec![".pdf".into(), ".PNG".into(), ".txt".into()]
    }

    #[test]
    fn test_allowed_extension_is_case_insensitive() {
        assert_eq!(
            allowed_extension("Report.PDF", &allowed()),
            Some(".pdf".to_string())
        );
        assert_eq!(
            allowed_extension("shot.png", &allowed()),
            Some(".png".to_string())
        );
    }

    #[test]
    fn test_disallowed_or_missing_extension() {
        assert_eq!(allowed_extension("run.exe", &allowed()), None);
        assert_eq!(allowed_extension("README", &allowed()), None);
        assert_eq!(allowed_extension("archive.tar.gz", &allowed()), None);
    }

    #[test]
    fn test_short_text_passes_magic_check() {
        assert!(check_magic(b"hi", ".txt").is_ok());
        assert!(check_magic(b"", ".txt").is_err());
        assert!(check_magic(b"not a pdf", ".pdf").is_err());
    }
}
