use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::assignments::requests::{AssignmentListParams, AssignmentRequest};
use crate::models::submissions::requests::{SubmissionListParams, SubmitAssignmentRequest};
use crate::models::users::entities::UserRole;
use crate::services::{AssignmentService, SubmissionService};
use crate::utils::{SafeAssignmentIdI64, SafeFileIdI64};

// 懒加载的全局服务实例
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

pub async fn list_assignments(
    req: HttpRequest,
    query: web::Query<AssignmentListParams>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .list_assignments(&req, query.into_inner())
        .await
}

pub async fn create_assignment(
    req: HttpRequest,
    body: web::Json<AssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .create_assignment(&req, body.into_inner())
        .await
}

pub async fn get_assignment(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.get_assignment(&req, assignment_id.0).await
}

pub async fn update_assignment(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
    body: web::Json<AssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .update_assignment(&req, assignment_id.0, body.into_inner())
        .await
}

pub async fn delete_assignment(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .delete_assignment(&req, assignment_id.0)
        .await
}

pub async fn upload_file(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .upload_file(&req, assignment_id.0, payload)
        .await
}

pub async fn list_files(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.list_files(&req, assignment_id.0).await
}

pub async fn delete_file(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
    file_id: SafeFileIdI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .delete_file(&req, assignment_id.0, file_id.0)
        .await
}

pub async fn submit(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
    body: web::Json<SubmitAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .submit(&req, assignment_id.0, body.into_inner())
        .await
}

pub async fn list_submissions(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
    query: web::Query<SubmissionListParams>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .list_submissions(&req, assignment_id.0, query.into_inner())
        .await
}

// 配置路由
pub fn configure_assignment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(RateLimit::api())
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to(list_assignments)).route(
                    web::post()
                        .to(create_assignment)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                web::resource("/{assignment_id}")
                    .route(web::get().to(get_assignment))
                    .route(
                        web::put()
                            .to(update_assignment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_assignment)
                            // 只有管理员可以删除作业
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{assignment_id}/files")
                    .route(web::get().to(list_files))
                    .route(
                        web::post()
                            .to(upload_file)
                            .wrap(RateLimit::file_upload())
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{assignment_id}/files/{file_id}").route(
                    web::delete()
                        .to(delete_file)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                web::resource("/{assignment_id}/submissions")
                    .route(web::get().to(list_submissions))
                    .route(
                        web::post()
                            .to(submit)
                            .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
                    ),
            ),
    );
}
