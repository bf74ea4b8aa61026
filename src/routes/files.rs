use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::services::FileService;
use crate::utils::SafeStorageKey;

// 懒加载的全局 FileService 实例
static FILE_SERVICE: Lazy<FileService> = Lazy::new(FileService::new_lazy);

pub async fn handle_download(
    req: HttpRequest,
    storage_key: SafeStorageKey,
) -> ActixResult<HttpResponse> {
    FILE_SERVICE.download(storage_key.0, &req).await
}

// 配置路由
pub fn configure_file_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/files")
            .wrap(RateLimit::api())
            .wrap(middlewares::RequireJWT)
            .route("/{storage_key}", web::get().to(handle_download)),
    );
}
