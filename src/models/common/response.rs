use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{ErrorCode, ValidationErrors};

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    /// 失败时与 message 相同，成功时省略
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            error: None,
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            code: code as i32,
            error: Some(message.clone()),
            message,
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            error: None,
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            code: code as i32,
            error: Some(message.clone()),
            message,
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<ValidationErrors> {
    /// 400 + 字段级错误
    pub fn validation_failed(errors: ValidationErrors) -> HttpResponse {
        HttpResponse::BadRequest().json(Self::error(
            ErrorCode::ValidationFailed,
            errors,
            "Validation failed",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_carries_error_field() {
        let resp = ApiResponse::error_empty(ErrorCode::ClassNotFound, "Class not found");
        let json = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(json["error"], "Class not found");
        assert_eq!(json["code"], ErrorCode::ClassNotFound as i32);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_success_envelope_omits_error() {
        let resp = ApiResponse::success(3_i64, "ok");
        let json = serde_json::to_value(&resp).expect("serialize");
        assert!(json.get("error").is_none());
        assert_eq!(json["data"], 3);
    }
}
