use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 业务错误码
///
/// 1xxx 通用，2xxx 认证，3xxx 用户，4xxx 班级与选课，
/// 5xxx 作业与提交，6xxx 文件，7xxx 会议，9xxx 服务端。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    ValidationFailed = 1001,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,

    Unauthorized = 2001,
    AuthFailed = 2002,
    PermissionDenied = 2003,
    AccountDisabled = 2004,
    RegisterFailed = 2005,

    UserNotFound = 3001,
    UserNameAlreadyExists = 3005,
    UserEmailAlreadyExists = 3006,
    CanNotDeleteCurrentUser = 3007,
    UserRoleInvalid = 3008,

    ClassNotFound = 4001,
    ClassPermissionDenied = 4002,
    ClassCapacityTooLow = 4003,
    EnrollmentNotFound = 4101,
    AlreadyEnrolled = 4102,
    ClassFull = 4103,
    NotEnrolled = 4104,
    EnrollmentStateInvalid = 4105,

    AssignmentNotFound = 5001,
    AssignmentPermissionDenied = 5002,
    SubmissionNotFound = 5101,
    SubmissionPermissionDenied = 5102,
    SubmissionAlreadyGraded = 5103,
    GradeOutOfRange = 5104,

    FileNotFound = 6001,
    FileUploadFailed = 6002,
    FileTypeNotAllowed = 6003,
    FileSizeExceeded = 6004,
    MultifileUploadNotAllowed = 6005,

    MeetingNotFound = 7001,
    MeetingPermissionDenied = 7002,

    InternalServerError = 9000,
}
