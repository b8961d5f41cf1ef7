//! Messages exchanged with the daemon. Every message is a single json object on its own line,
//! discriminated by the `type` field.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tracking::{
    categories::CategoryList, focus::ActiveSurface, ledger::DayUsage, weekly::WeeklySummary,
};

pub const UNKNOWN_REQUEST: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Message {
    GetToday,
    GetWeekly,
    GetCategories,
    SetCategories {
        #[serde(rename = "categoryList")]
        category_list: CategoryList,
    },
    /// The browser (container) became the foreground application. `active` is the surface that
    /// was in front at that moment, if the environment managed to find out.
    FocusGained {
        #[serde(default)]
        active: Option<ActiveSurface>,
    },
    FocusLost,
    SurfaceActivated {
        #[serde(default)]
        active: Option<ActiveSurface>,
    },
    /// A surface navigated somewhere. Only relevant once `loaded` is set.
    SurfaceUpdated {
        surface: ActiveSurface,
        #[serde(default)]
        loaded: bool,
    },
    #[serde(other)]
    Unknown,
}

impl Message {
    /// Parses one request line. Text that isn't json at all is an error, while json without a
    /// recognizable string `type` is an [Message::Unknown] request.
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(line)?;
        match value.get("type") {
            Some(Value::String(_)) => serde_json::from_value(value),
            _ => Ok(Message::Unknown),
        }
    }
}

/// Replies are shaped per request, so this is only ever serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Today { usage: DayUsage },
    Weekly(WeeklySummary),
    Categories(CategoryList),
    Ack { ok: bool },
    Error { error: String },
}

impl Response {
    pub fn ack() -> Self {
        Response::Ack { ok: true }
    }

    pub fn error(error: impl ToString) -> Self {
        Response::Error {
            error: error.to_string(),
        }
    }
}
