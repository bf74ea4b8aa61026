//! 路径参数提取器
//!
//! 直接使用 `web::Path<i64>` 时解析失败会返回纯文本 404，
//! 这里按参数名读取并在失败时返回统一的 JSON 400。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn invalid_path_param(name: &str) -> actix_web::Error {
    InternalError::from_response(
        format!("invalid path parameter {name}"),
        HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            format!("Invalid path parameter: {name}"),
        )),
    )
    .into()
}

/// 定义按名称读取的正整数路径参数提取器
#[macro_export]
macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub i64);

        impl actix_web::FromRequest for $name {
            type Error = actix_web::Error;
            type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

            fn from_request(
                req: &actix_web::HttpRequest,
                _payload: &mut actix_web::dev::Payload,
            ) -> Self::Future {
                futures_util::future::ready(
                    $crate::utils::extractor::parse_positive_i64(req, $param).map($name),
                )
            }
        }
    };
}

#[doc(hidden)]
pub fn parse_positive_i64(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    req.match_info()
        .get(name)
        .and_then(|raw| raw.parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| invalid_path_param(name))
}

define_safe_i64_extractor!(SafeIDI64, "id");
define_safe_i64_extractor!(SafeClassIdI64, "class_id");
define_safe_i64_extractor!(SafeEnrollmentIdI64, "enrollment_id");
define_safe_i64_extractor!(SafeAssignmentIdI64, "assignment_id");
define_safe_i64_extractor!(SafeSubmissionIdI64, "submission_id");
define_safe_i64_extractor!(SafeMeetingIdI64, "meeting_id");
define_safe_i64_extractor!(SafeFileIdI64, "file_id");

/// 上传文件的存储键（UUID v4 + 可选扩展名），拒绝任何路径分隔符
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeStorageKey(pub String);

impl SafeStorageKey {
    pub fn is_valid(key: &str) -> bool {
        let (stem, ext) = match key.split_once('.') {
            Some((stem, ext)) => (stem, Some(ext)),
            None => (key, None),
        };
        uuid::Uuid::parse_str(stem).is_ok()
            && stem.len() == 36
            && ext.is_none_or(|e| {
                !e.is_empty() && e.len() <= 10 && e.chars().all(|c| c.is_ascii_alphanumeric())
            })
    }
}

impl FromRequest for SafeStorageKey {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.match_info().get("storage_key") {
            Some(key) if Self::is_valid(key) => Ok(SafeStorageKey(key.to_string())),
            _ => Err(invalid_path_param("storage_key")),
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_positive_id_parsed() {
        let req = TestRequest::default()
            .param("class_id", "15")
            .to_http_request();
        assert_eq!(parse_positive_i64(&req, "class_id").ok(), Some(15));
    }

    #[test]
    fn test_invalid_ids_rejected() {
        for raw in ["0", "-3", "abc", "1.5"] {
            let req = TestRequest::default().param("id", raw).to_http_request();
            assert!(parse_positive_i64(&req, "id").is_err(), "{raw} accepted");
        }
        let req = TestRequest::default().to_http_request();
        assert!(parse_positive_i64(&req, "id").is_err());
    }

    #[test]
    fn test_storage_key_validation() {
        assert!(SafeStorageKey::is_valid(
            "0f8fad5b-d9cb-469f-a165-70867728950e.pdf"
        ));
        assert!(SafeStorageKey::is_valid(
            "0f8fad5b-d9cb-469f-a165-70867728950e"
        ));
        assert!(!SafeStorageKey::is_valid("../etc/passwd"));
        assert!(!SafeStorageKey::is_valid(
            "0f8fad5b-d9cb-469f-a165-70867728950e.tar.gz"
        ));
        assert!(!SafeStorageKey::is_valid(
            "0f8fad5bd9cb469fa16570867728950e.pdf"
        ));
    }
}
