pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::classes::requests::{ClassQueryParams, CreateClassRequest, UpdateClassRequest};
use crate::storage::Storage;

use super::{finish, storage_from_request};

pub struct ClassService {
    storage: Option<Arc<dyn Storage>>,
}

impl ClassService {
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

    pub async fn list_classes(
        &self,
        request: &HttpRequest,
        query: ClassQueryParams,
    ) -> ActixResult<HttpResponse> {
        finish(list::list_classes(self, request, query).await)
    }

    pub async fn create_class(
        &self,
        request: &HttpRequest,
        class_data: CreateClassRequest,
    ) -> ActixResult<HttpResponse> {
        finish(create::create_class(self, request, class_data).await)
    }

    // 以下操作依赖 RequireClassAccess 写入的班级上下文
    pub async fn get_class(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        finish(get::get_class(self, request).await)
    }

    pub async fn update_class(
        &self,
        request: &HttpRequest,
        update_data: UpdateClassRequest,
    ) -> ActixResult<HttpResponse> {
        finish(update::update_class(self, request, update_data).await)
    }

    pub async fn delete_class(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        finish(delete::delete_class(self, request).await)
    }
}
