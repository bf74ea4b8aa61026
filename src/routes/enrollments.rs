use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, ClassAccess, RateLimit, RequireClassAccess};
use crate::models::enrollments::requests::{
    EnrollStudentRequest, EnrollmentListParams, UpdateEnrollmentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::EnrollmentService;
use crate::utils::SafeEnrollmentIdI64;

// 懒加载的全局 EnrollmentService 实例
static ENROLLMENT_SERVICE: Lazy<EnrollmentService> = Lazy::new(EnrollmentService::new_lazy);

pub async fn list_enrollments(
    req: HttpRequest,
    query: web::Query<EnrollmentListParams>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .list_enrollments(&req, query.into_inner())
        .await
}

pub async fn enroll_student(
    req: HttpRequest,
    body: web::Json<EnrollStudentRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .enroll_student(&req, body.into_inner())
        .await
}

pub async fn request_enrollment(req: HttpRequest) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.request_enrollment(&req).await
}

pub async fn update_enrollment(
    req: HttpRequest,
    enrollment_id: SafeEnrollmentIdI64,
    body: web::Json<UpdateEnrollmentRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .update_enrollment(&req, enrollment_id.0, body.into_inner())
        .await
}

pub async fn delete_enrollment(
    req: HttpRequest,
    enrollment_id: SafeEnrollmentIdI64,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .delete_enrollment(&req, enrollment_id.0)
        .await
}

// 配置路由，需在班级路由之前注册
pub fn configure_enrollment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/classes/{class_id}/enrollments")
            .wrap(RateLimit::api())
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .wrap(RequireClassAccess::new_any(ClassAccess::managers()))
                    .route(web::get().to(list_enrollments))
                    .route(web::post().to(enroll_student)),
            )
            .service(
                web::resource("/request")
                    .wrap(RequireClassAccess::resolve())
                    .wrap(middlewares::RequireRole::new(&UserRole::Student))
                    .route(web::post().to(request_enrollment)),
            )
            .service(
                web::resource("/{enrollment_id}")
                    .route(
                        web::put()
                            .to(update_enrollment)
                            .wrap(RequireClassAccess::new_any(ClassAccess::managers())),
                    )
                    // 学生退出自己的选课，权限在服务层判断
                    .route(
                        web::delete()
                            .to(delete_enrollment)
                            .wrap(RequireClassAccess::resolve()),
                    ),
            ),
    );
}
