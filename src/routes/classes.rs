use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, ClassAccess, RateLimit, RequireClassAccess};
use crate::models::classes::requests::{ClassQueryParams, CreateClassRequest, UpdateClassRequest};
use crate::models::users::entities::UserRole;
use crate::services::ClassService;

// 懒加载的全局 ClassService 实例
static CLASS_SERVICE: Lazy<ClassService> = Lazy::new(ClassService::new_lazy);

// 能查看班级详情的关系
const CLASS_VIEWERS: &[ClassAccess] = &[
    ClassAccess::Admin,
    ClassAccess::Owner,
    ClassAccess::ActiveStudent,
];

pub async fn list_classes(
    req: HttpRequest,
    query: web::Query<ClassQueryParams>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_classes(&req, query.into_inner()).await
}

pub async fn create_class(
    req: HttpRequest,
    class_data: web::Json<CreateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.create_class(&req, class_data.into_inner()).await
}

pub async fn get_class(req: HttpRequest) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.get_class(&req).await
}

pub async fn update_class(
    req: HttpRequest,
    update_data: web::Json<UpdateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .update_class(&req, update_data.into_inner())
        .await
}

pub async fn delete_class(req: HttpRequest) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.delete_class(&req).await
}

// 配置路由
pub fn configure_classes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/classes")
            .wrap(RateLimit::api())
            .wrap(middlewares::RequireJWT)
            .service(
                // 列表按角色限定范围
                web::resource("").route(web::get().to(list_classes)).route(
                    web::post()
                        .to(create_class)
                        // 教师创建自己的班级，管理员为指定教师创建
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                web::resource("/{class_id}")
                    .route(
                        web::get()
                            .to(get_class)
                            .wrap(RequireClassAccess::new_any(CLASS_VIEWERS)),
                    )
                    .route(
                        web::put()
                            .to(update_class)
                            .wrap(RequireClassAccess::new_any(ClassAccess::managers())),
                    )
                    .route(
                        web::delete()
                            .to(delete_class)
                            .wrap(RequireClassAccess::new_any(ClassAccess::managers())),
                    ),
            ),
    );
}
