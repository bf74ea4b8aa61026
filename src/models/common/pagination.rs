use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

// 分页查询参数（查询字符串里的数字可能以字符串形式出现）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationQuery {
    #[serde(default = "default_page", deserialize_with = "lenient_i64")]
    pub page: i64,
    #[serde(default = "default_size", deserialize_with = "lenient_i64")]
    pub size: i64,
}

impl PaginationQuery {
    /// 规整后的 (page, size)，page 从 1 开始
    pub fn normalized(page: Option<i64>, size: Option<i64>) -> (u64, u64) {
        let page = page.unwrap_or(1).max(1) as u64;
        let size = size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE) as u64;
        (page, size)
    }
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

// 分页响应信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationInfo {
    pub fn new(page: u64, page_size: u64, total: u64, total_pages: u64) -> Self {
        Self {
            page: page as i64,
            page_size: page_size as i64,
            total: total as i64,
            total_pages: total_pages as i64,
        }
    }
}

// 分页列表响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginatedResponse<T: TS> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(i64),
    Text(String),
}

impl NumberOrString {
    fn into_i64<E: serde::de::Error>(self) -> Result<i64, E> {
        match self {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid integer: '{s}'"))),
        }
    }
}

// 接受整数或数字字符串
fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    NumberOrString::deserialize(deserializer)?.into_i64()
}

/// 可选整数，flatten 后查询串中的值都以字符串出现
pub fn lenient_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<NumberOrString>::deserialize(deserializer)?
        .map(NumberOrString::into_i64)
        .transpose()
}

/// 可选布尔值，接受 true/false 以及 "true"/"false"/"1"/"0"
pub fn lenient_opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        Text(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::Text(s)) => match s.trim() {
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            _ => Err(serde::de::Error::custom(format!("invalid boolean: '{s}'"))),
        },
    }
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_clamps() {
        assert_eq!(PaginationQuery::normalized(None, None), (1, 10));
        assert_eq!(PaginationQuery::normalized(Some(0), Some(1000)), (1, 100));
        assert_eq!(PaginationQuery::normalized(Some(3), Some(0)), (3, 1));
    }

    #[test]
    fn test_string_numbers_accepted() {
        let q: PaginationQuery =
            serde_json::from_str(r#"{"page":"2","size":25}"#).expect("deserialize");
        assert_eq!(q.page, 2);
        assert_eq!(q.size, 25);
    }

    #[test]
    fn test_flattened_optional_filters() {
        #[derive(Deserialize)]
        struct Params {
            #[serde(flatten)]
            pagination: PaginationQuery,
            #[serde(default, deserialize_with = "lenient_opt_i64")]
            class_id: Option<i64>,
            #[serde(default, deserialize_with = "lenient_opt_bool")]
            upcoming: Option<bool>,
        }

        let p: Params = serde_json::from_str(r#"{"class_id":"7","upcoming":"true","size":"5"}"#)
            .expect("deserialize");
        assert_eq!(p.class_id, Some(7));
        assert_eq!(p.upcoming, Some(true));
        assert_eq!(p.pagination.size, 5);

        let p: Params = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(p.class_id, None);
        assert_eq!(p.pagination.page, 1);
    }
}
