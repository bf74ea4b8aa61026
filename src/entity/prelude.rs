//! 预导入模块，方便使用

pub use super::assignment_files::{
    ActiveModel as AssignmentFileActiveModel, Entity as AssignmentFiles,
    Model as AssignmentFileModel,
};
pub use super::assignment_submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::class_enrollments::{
    ActiveModel as EnrollmentActiveModel, Entity as Enrollments, Model as EnrollmentModel,
};
pub use super::classes::{ActiveModel as ClassActiveModel, Entity as Classes, Model as ClassModel};
pub use super::meetings::{
    ActiveModel as MeetingActiveModel, Entity as Meetings, Model as MeetingModel,
};
pub use super::submission_files::{
    ActiveModel as SubmissionFileActiveModel, Entity as SubmissionFiles,
    Model as SubmissionFileModel,
};
pub use super::user_notification_preferences::{
    ActiveModel as NotificationPreferenceActiveModel, Entity as NotificationPreferences,
    Model as NotificationPreferenceModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
