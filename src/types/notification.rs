use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub(crate) const FALLBACK_TITLE: &str = "Notification";
pub(crate) const FALLBACK_BODY: &str = "You have a new notification";

/// Notification content sent to the notify endpoint and decoded again in the
/// background script. Only `title` is required on the sending side; a missing
/// title on the receiving side decodes as empty and falls back at display time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_interaction: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub silent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renotify: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<NotificationAction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibrate: Option<Vibration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<NotificationDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Page opened when the notification is clicked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl NotificationPayload {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationDirection {
    Auto,
    Ltr,
    Rtl,
}

/// `vibrate` accepts either a single duration or an on/off pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Vibration {
    Single(u32),
    Pattern(Vec<u32>),
}

/// Options handed to `showNotification`. Absent fields stay absent so the
/// browser applies its own defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOptions {
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_interaction: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renotify: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<NotificationAction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vibrate: Option<Vibration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<NotificationDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Title and options to display for a decoded push payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayNotification {
    pub title: String,
    pub options: NotificationOptions,
}

impl DisplayNotification {
    /// Builds the notification from decoded push data. Fields are read one
    /// at a time: a field that is absent or has the wrong type is left out
    /// without affecting the others, and title and body fall back to
    /// generic text.
    pub fn from_push_data(data: &Value) -> Self {
        let empty = Map::new();
        let object = data.as_object().unwrap_or(&empty);

        let title = non_empty_str(object, "title").unwrap_or(FALLBACK_TITLE);
        let body = non_empty_str(object, "body").unwrap_or(FALLBACK_BODY);

        Self {
            title: title.to_string(),
            options: NotificationOptions {
                body: body.to_string(),
                icon: field(object, "icon"),
                badge: field(object, "badge"),
                image: field(object, "image"),
                tag: field(object, "tag"),
                require_interaction: field(object, "requireInteraction"),
                silent: field(object, "silent"),
                renotify: field(object, "renotify"),
                actions: field(object, "actions"),
                timestamp: field(object, "timestamp"),
                vibrate: field(object, "vibrate"),
                lang: field(object, "lang"),
                dir: field(object, "dir"),
                data: attached_data(field(object, "url"), field(object, "data")),
            },
        }
    }
}

impl From<NotificationPayload> for DisplayNotification {
    fn from(payload: NotificationPayload) -> Self {
        let data = serde_json::to_value(payload).unwrap_or(Value::Null);
        Self::from_push_data(&data)
    }
}

fn non_empty_str<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

fn field<T: DeserializeOwned>(object: &Map<String, Value>, key: &str) -> Option<T> {
    let value = object.get(key)?;
    if value.is_null() {
        return None;
    }
    serde_json::from_value(value.clone()).ok()
}

/// Custom data attached to the shown notification. A top-level `url` is
/// stored as `data.url` so the click handler finds it; it replaces any
/// `url` inside `data`, and non-object `data` gives way to it.
fn attached_data(url: Option<String>, data: Option<Value>) -> Option<Value> {
    let Some(url) = url.filter(|url| !url.is_empty()) else {
        return data;
    };
    let mut object = match data {
        Some(Value::Object(object)) => object,
        _ => Map::new(),
    };
    object.insert("url".to_string(), Value::String(url));
    Some(Value::Object(object))
}
