pub mod health;
pub mod settings;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::config::AppConfig;

use super::finish;

pub struct SystemService;

impl SystemService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 当前生效的非敏感配置
    pub async fn get_settings(&self, _request: &HttpRequest) -> ActixResult<HttpResponse> {
        finish(settings::get_settings(self))
    }

    // 存活检查
    pub async fn health(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        finish(health::health(request))
    }
}
