pub mod error_code;
pub mod pagination;
pub mod response;
pub mod validation;

pub use error_code::ErrorCode;
pub use pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use response::ApiResponse;
pub use validation::{FieldError, IntInput, ValidationErrors};

/// 程序启动时间，用于健康检查中的运行时长
#[derive(Debug, Clone, Copy)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
