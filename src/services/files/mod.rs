pub mod download;
pub mod store;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

use super::{finish, storage_from_request};

pub(crate) use store::{discard, receive_upload, remove_objects};

pub struct FileService {
    storage: Option<Arc<dyn Storage>>,
}

impl FileService {
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

    // 按存储键下载
    pub async fn download(
        &self,
        storage_key: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        finish(download::handle_download(self, request, storage_key).await)
    }
}
