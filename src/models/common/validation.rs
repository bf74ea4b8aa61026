use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

/// 单个字段的校验错误
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// 字段级校验错误集合，作为 400 响应的 data 返回
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    /// 记录缺失的必填字段
    pub fn missing(&mut self, field: &str) {
        self.add(field, format!("{field} is required"));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// 没有错误时返回 Ok
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// 表单中的整数字段
///
/// 类型不对时不让整个请求体反序列化失败，留给 `validate` 按字段报告。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntInput {
    Value(i64),
    Invalid,
}

impl IntInput {
    pub fn value(self) -> Option<i64> {
        match self {
            IntInput::Value(v) => Some(v),
            IntInput::Invalid => None,
        }
    }
}

impl From<i64> for IntInput {
    fn from(v: i64) -> Self {
        IntInput::Value(v)
    }
}

impl<'de> Deserialize<'de> for IntInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        let parsed = match &raw {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        Ok(parsed.map_or(IntInput::Invalid, IntInput::Value))
    }
}

/// 部分更新中可置空的字段：缺省为 `None`，显式 `null` 为 `Some(None)`
///
/// 需要配合 `#[serde(default)]` 使用。
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
