use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::submissions::requests::GradeSubmissionRequest;
use crate::models::users::entities::UserRole;
use crate::services::SubmissionService;
use crate::utils::{SafeFileIdI64, SafeSubmissionIdI64};

// 懒加载的全局 SubmissionService 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

pub async fn get_submission(
    req: HttpRequest,
    submission_id: SafeSubmissionIdI64,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.get_submission(&req, submission_id.0).await
}

pub async fn grade_submission(
    req: HttpRequest,
    submission_id: SafeSubmissionIdI64,
    body: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .grade_submission(&req, submission_id.0, body.into_inner())
        .await
}

pub async fn upload_file(
    req: HttpRequest,
    submission_id: SafeSubmissionIdI64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .upload_file(&req, submission_id.0, payload)
        .await
}

pub async fn list_files(
    req: HttpRequest,
    submission_id: SafeSubmissionIdI64,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.list_files(&req, submission_id.0).await
}

pub async fn delete_file(
    req: HttpRequest,
    submission_id: SafeSubmissionIdI64,
    file_id: SafeFileIdI64,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .delete_file(&req, submission_id.0, file_id.0)
        .await
}

// 配置路由
pub fn configure_submission_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/submissions")
            .wrap(RateLimit::api())
            .wrap(middlewares::RequireJWT)
            .route("/{submission_id}", web::get().to(get_submission))
            .route(
                "/{submission_id}/grade",
                web::put()
                    .to(grade_submission)
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .service(
                // 上传者身份在服务层检查，教师和管理员同样返回 403
                web::resource("/{submission_id}/files")
                    .route(web::get().to(list_files))
                    .route(web::post().to(upload_file).wrap(RateLimit::file_upload())),
            )
            .route(
                "/{submission_id}/files/{file_id}",
                web::delete().to(delete_file),
            ),
    );
}
