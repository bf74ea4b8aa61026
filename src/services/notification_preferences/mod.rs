use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, notification_preferences::requests::UpdateNotificationPreferencesRequest,
};
use crate::storage::Storage;

use super::{Outcome, current_user, finish, storage_error, storage_from_request};

pub struct NotificationPreferenceService {
    storage: Option<Arc<dyn Storage>>,
}

impl NotificationPreferenceService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(
        &self,
        request: &HttpRequest,
    ) -> Result<Arc<dyn Storage>, HttpResponse> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => storage_from_request(request),
        }
    }

    // 没有记录时返回全部开启的默认值
    pub async fn get_preferences(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        finish(self.handle_get(request).await)
    }

    pub async fn update_preferences(
        &self,
        request: &HttpRequest,
        body: UpdateNotificationPreferencesRequest,
    ) -> ActixResult<HttpResponse> {
        finish(self.handle_update(request, body).await)
    }

    async fn handle_get(&self, request: &HttpRequest) -> Outcome {
        let user = current_user(request)?;
        let storage = self.get_storage(request)?;
        let preferences = storage
            .get_notification_preferences(user.id)
            .await
            .map_err(storage_error("Failed to load notification preferences"))?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(preferences, "Success")))
    }

    async fn handle_update(
        &self,
        request: &HttpRequest,
        body: UpdateNotificationPreferencesRequest,
    ) -> Outcome {
        let user = current_user(request)?;
        let storage = self.get_storage(request)?;
        let preferences = storage
            .update_notification_preferences(user.id, body)
            .await
            .map_err(storage_error("Failed to update notification preferences"))?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            preferences,
            "Notification preferences updated",
        )))
    }
}
