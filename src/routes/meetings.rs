use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::meetings::requests::{
    CreateMeetingRequest, MeetingListParams, UpdateMeetingRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::MeetingService;
use crate::utils::SafeMeetingIdI64;

// 懒加载的全局 MeetingService 实例
static MEETING_SERVICE: Lazy<MeetingService> = Lazy::new(MeetingService::new_lazy);

pub async fn list_meetings(
    req: HttpRequest,
    query: web::Query<MeetingListParams>,
) -> ActixResult<HttpResponse> {
    MEETING_SERVICE.list_meetings(&req, query.into_inner()).await
}

pub async fn create_meeting(
    req: HttpRequest,
    body: web::Json<CreateMeetingRequest>,
) -> ActixResult<HttpResponse> {
    MEETING_SERVICE.create_meeting(&req, body.into_inner()).await
}

pub async fn get_meeting(
    req: HttpRequest,
    meeting_id: SafeMeetingIdI64,
) -> ActixResult<HttpResponse> {
    MEETING_SERVICE.get_meeting(&req, meeting_id.0).await
}

pub async fn update_meeting(
    req: HttpRequest,
    meeting_id: SafeMeetingIdI64,
    body: web::Json<UpdateMeetingRequest>,
) -> ActixResult<HttpResponse> {
    MEETING_SERVICE
        .update_meeting(&req, meeting_id.0, body.into_inner())
        .await
}

pub async fn delete_meeting(
    req: HttpRequest,
    meeting_id: SafeMeetingIdI64,
) -> ActixResult<HttpResponse> {
    MEETING_SERVICE.delete_meeting(&req, meeting_id.0).await
}

// 配置路由
pub fn configure_meeting_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/meetings")
            .wrap(RateLimit::api())
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to(list_meetings)).route(
                    web::post()
                        .to(create_meeting)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                // 主持人或班级教师可修改，在服务层判断
                web::resource("/{meeting_id}")
                    .route(web::get().to(get_meeting))
                    .route(web::put().to(update_meeting))
                    .route(web::delete().to(delete_meeting)),
            ),
    );
}
