use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::services::SystemService;

// 懒加载的全局 SystemService 实例
static SYSTEM_SERVICE: Lazy<SystemService> = Lazy::new(SystemService::new_lazy);

pub async fn get_settings(req: HttpRequest) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.get_settings(&req).await
}

pub async fn health(req: HttpRequest) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.health(&req).await
}

// 配置路由
pub fn configure_system_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/system")
            // 存活检查不需要登录
            .route("/health", web::get().to(health))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .service(
                        web::resource("/settings")
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                            .route(web::get().to(get_settings)),
                    ),
            ),
    );
}
