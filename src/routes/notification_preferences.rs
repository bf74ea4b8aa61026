use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::notification_preferences::requests::UpdateNotificationPreferencesRequest;
use crate::services::NotificationPreferenceService;

static PREFERENCE_SERVICE: Lazy<NotificationPreferenceService> =
    Lazy::new(NotificationPreferenceService::new_lazy);

pub async fn get_preferences(req: HttpRequest) -> ActixResult<HttpResponse> {
    PREFERENCE_SERVICE.get_preferences(&req).await
}

pub async fn update_preferences(
    req: HttpRequest,
    body: web::Json<UpdateNotificationPreferencesRequest>,
) -> ActixResult<HttpResponse> {
    PREFERENCE_SERVICE
        .update_preferences(&req, body.into_inner())
        .await
}

pub fn configure_notification_preference_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/notification-preferences")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(get_preferences))
            .route("", web::put().to(update_preferences)),
    );
}
