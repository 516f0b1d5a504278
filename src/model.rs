use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Default list request when the table widget does not supply one.
pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Bounds of the sort weight accepted by the edit form.
pub const SORT_MIN: i64 = 1;
pub const SORT_MAX: i64 = 999_999;

/// Wire status. Codes other than 1 and 2 are kept as-is so an update sends
/// them back unchanged.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(from = "i64", into = "i64")]
pub enum NotificationStatus {
    #[default]
    Online,
    Offline,
    Other(i64),
}

impl NotificationStatus {
    pub fn code(&self) -> i64 {
        match self {
            NotificationStatus::Online => 1,
            NotificationStatus::Offline => 2,
            NotificationStatus::Other(code) => *code,
        }
    }
}

impl From<i64> for NotificationStatus {
    fn from(value: i64) -> Self {
        match value {
            1 => NotificationStatus::Online,
            2 => NotificationStatus::Offline,
            other => NotificationStatus::Other(other),
        }
    }
}

impl From<NotificationStatus> for i64 {
    fn from(status: NotificationStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationStatus::Online => f.write_str("online"),
            NotificationStatus::Offline => f.write_str("offline"),
            NotificationStatus::Other(code) => write!(f, "status {}", code),
        }
    }
}

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A backend timestamp. Values not in `YYYY-MM-DD HH:MM:SS` are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timestamp {
    At(NaiveDateTime),
    Raw(String),
}

impl Timestamp {
    pub fn parse(text: &str) -> Self {
        match NaiveDateTime::parse_from_str(text.trim(), TIME_FORMAT) {
            Ok(at) => Timestamp::At(at),
            Err(_) => Timestamp::Raw(text.to_string()),
        }
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(at: NaiveDateTime) -> Self {
        Timestamp::At(at)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::At(at) => write!(f, "{}", at.format(TIME_FORMAT)),
            Timestamp::Raw(raw) => f.write_str(raw),
        }
    }
}

mod backend_time {
    use super::Timestamp;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S>(value: &Option<Timestamp>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(t) => s.serialize_str(&t.to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<Timestamp>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(d)? {
            Value::Null => None,
            Value::String(text) if text.trim().is_empty() => None,
            Value::String(text) => Some(Timestamp::parse(&text)),
            other => Some(Timestamp::Raw(other.to_string())),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub content: String,
    pub status: NotificationStatus,
    pub sort: i64,
    #[serde(default, with = "backend_time", skip_serializing_if = "Option::is_none")]
    pub create_time: Option<Timestamp>,
    #[serde(default, with = "backend_time", skip_serializing_if = "Option::is_none")]
    pub update_time: Option<Timestamp>,
}

impl NotificationRecord {
    /// Seed used by the create form.
    pub fn blank() -> Self {
        Self {
            id: None,
            title: String::new(),
            content: String::new(),
            status: NotificationStatus::Online,
            sort: SORT_MIN,
            create_time: None,
            update_time: None,
        }
    }

    pub fn to_new(&self) -> NewNotification {
        NewNotification {
            title: self.title.clone(),
            content: self.content.clone(),
            status: self.status,
            sort: self.sort,
        }
    }
}

/// Body of a create request; the backend assigns the id and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewNotification {
    pub title: String,
    pub content: String,
    pub status: NotificationStatus,
    pub sort: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigEntry {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl ConfigEntry {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Body of a config write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub configs: Vec<ConfigEntry>,
}

/// Envelope every admin endpoint answers with. `code == 0` is success.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiResponse<T> {
    pub code: i64,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: 0,
            data: Some(data),
            message: None,
        }
    }

    pub fn failed(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == 0
    }
}

/// Reply to a mutation; whatever `data` the backend sends along is ignored.
pub type Ack = ApiResponse<Value>;

impl Ack {
    pub fn done() -> Self {
        Self {
            code: 0,
            data: None,
            message: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub count: u64,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            count: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListQuery {
    /// Zero counts as unspecified, like an unset pager.
    pub fn from_params(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE),
            page_size: page_size.filter(|s| *s > 0).unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }
}
