//! 数据模型定义
//!
//! 每个领域按 entities / requests / responses 拆分，
//! 通过 ts-rs 导出给前端使用。

pub mod assignments;
pub mod auth;
pub mod classes;
pub mod common;
pub mod dashboard;
pub mod enrollments;
pub mod files;
pub mod meetings;
pub mod notification_preferences;
pub mod submissions;
pub mod system;
pub mod users;

pub use common::{
    ApiResponse, AppStartTime, ErrorCode, FieldError, IntInput, PaginatedResponse, PaginationInfo,
    PaginationQuery, ValidationErrors,
};
