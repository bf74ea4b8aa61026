use crate::models::ValidationErrors;
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::{lenient_opt_bool, lenient_opt_i64};
use crate::utils::validate::{validate_text_length, validate_url};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

const TITLE_MAX: usize = 200;
const DESCRIPTION_MAX: usize = 5_000;

fn check_window(errors: &mut ValidationErrors, start: DateTime<Utc>, end: DateTime<Utc>) {
    if end <= start {
        errors.add("end_time", "end_time must be after start_time");
    }
}

fn check_common(
    errors: &mut ValidationErrors,
    title: Option<&str>,
    description: Option<&str>,
    meeting_url: Option<&str>,
) {
    if let Some(title) = title
        && let Err(msg) = validate_text_length(title, TITLE_MAX)
    {
        errors.add("title", format!("title {msg}"));
    }
    if let Some(description) = description
        && description.chars().count() > DESCRIPTION_MAX
    {
        errors.add(
            "description",
            format!("description must be at most {DESCRIPTION_MAX} characters"),
        );
    }
    if let Some(url) = meeting_url
        && let Err(msg) = validate_url(url)
    {
        errors.add("meeting_url", msg);
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/meeting.ts")]
pub struct CreateMeetingRequest {
    pub class_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub meeting_url: Option<String>,
}

impl CreateMeetingRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_common(
            &mut errors,
            Some(&self.title),
            self.description.as_deref(),
            self.meeting_url.as_deref(),
        );
        check_window(&mut errors, self.start_time, self.end_time);
        errors.into_result()
    }
}

// 部分更新；合并后的起止时间仍需满足 end > start
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/meeting.ts")]
pub struct UpdateMeetingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub meeting_url: Option<String>,
}

impl UpdateMeetingRequest {
    pub fn validate(
        &self,
        current_start: DateTime<Utc>,
        current_end: DateTime<Utc>,
    ) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_common(
            &mut errors,
            self.title.as_deref(),
            self.description.as_deref(),
            self.meeting_url.as_deref(),
        );
        check_window(
            &mut errors,
            self.start_time.unwrap_or(current_start),
            self.end_time.unwrap_or(current_end),
        );
        errors.into_result()
    }
}

// 存储层使用的新会议
#[derive(Debug, Clone)]
pub struct NewMeeting {
    pub class_id: i64,
    pub host_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub meeting_url: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/meeting.ts")]
pub struct MeetingListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub class_id: Option<i64>,
    /// 只看尚未结束的会议
    #[serde(default, deserialize_with = "lenient_opt_bool")]
    pub upcoming: Option<bool>,
}

// 存储层查询参数
#[derive(Debug, Clone, Default)]
pub struct MeetingListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub class_id: Option<i64>,
    /// 教师视角：自己主持或自己班级的会议
    pub teacher_id: Option<i64>,
    /// 学生视角：有效选课班级的会议
    pub student_id: Option<i64>,
    pub upcoming_after: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn test_create_meeting_window() {
        let start = Utc::now();
        let req = CreateMeetingRequest {
            class_id: 1,
            title: "Office hours".into(),
            description: None,
            start_time: start,
            end_time: start,
            meeting_url: Some("zoom.us/j/1".into()),
        };
        let errors = req.validate().expect_err("invalid");
        assert!(errors.has("end_time"));
        assert!(errors.has("meeting_url"));
    }

    #[test]
    fn test_update_merges_times() {
        let start = Utc::now();
        let end = start + TimeDelta::hours(1);
        let req = UpdateMeetingRequest {
            start_time: Some(end + TimeDelta::minutes(5)),
            ..Default::default()
        };
        assert!(req.validate(start, end).is_err());

        let req = UpdateMeetingRequest {
            end_time: Some(end + TimeDelta::hours(1)),
            ..Default::default()
        };
        assert!(req.validate(start, end).is_ok());
    }
}
