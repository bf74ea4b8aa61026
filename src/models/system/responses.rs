use serde::Serialize;
use ts_rs::TS;

use crate::config::AppConfig;

/// 管理员可见的运行配置（不含密钥与连接串）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SystemSettingsResponse {
    pub system_name: String,
    pub environment: String,
    pub upload_max_size: i64,
    pub upload_allowed_types: Vec<String>,
    /// 分钟
    pub access_token_expiry: i64,
    /// 天
    pub refresh_token_expiry: i64,
    pub refresh_token_remember_me_expiry: i64,
    pub cache_type: String,
}

impl From<&AppConfig> for SystemSettingsResponse {
    fn from(config: &AppConfig) -> Self {
        Self {
            system_name: config.app.system_name.clone(),
            environment: config.app.environment.clone(),
            upload_max_size: config.upload.max_size as i64,
            upload_allowed_types: config.upload.allowed_types.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
            refresh_token_expiry: config.jwt.refresh_token_expiry,
            refresh_token_remember_me_expiry: config.jwt.refresh_token_remember_me_expiry,
            cache_type: config.cache.cache_type.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub uptime_seconds: i64,
}
