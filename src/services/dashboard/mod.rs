use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, dashboard::responses::DashboardResponse, users::entities::UserRole,
};
use crate::storage::Storage;

use super::{Outcome, current_user, finish, storage_error, storage_from_request};

pub struct DashboardService {
    storage: Option<Arc<dyn Storage>>,
}

impl DashboardService {
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

    pub async fn get_dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        finish(self.handle_dashboard(request).await)
    }

    async fn handle_dashboard(&self, request: &HttpRequest) -> Outcome {
        let user = current_user(request)?;
        let storage = self.get_storage(request)?;
        let now = chrono::Utc::now();

        let dashboard = match user.role {
            UserRole::Admin => storage.admin_dashboard(now).await.map(DashboardResponse::Admin),
            UserRole::Teacher => storage
                .teacher_dashboard(user.id, now)
                .await
                .map(DashboardResponse::Teacher),
            UserRole::Student => storage
                .student_dashboard(user.id, now)
                .await
                .map(DashboardResponse::Student),
        }
        .map_err(storage_error("Failed to load dashboard"))?;

        Ok(HttpResponse::Ok().json(ApiResponse::success(dashboard, "Success")))
    }
}
