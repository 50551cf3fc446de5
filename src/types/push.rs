use serde::{Deserialize, Serialize};

use super::notification::NotificationPayload;

/// Browser-issued push subscription, shaped like `PushSubscription.toJSON()`.
///
/// The client never inspects it beyond forwarding it to the subscribe endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushSubscription {
    pub endpoint: String,
    #[serde(default)]
    pub expiration_time: Option<f64>,
    pub keys: SubscriptionKeys,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    Default,
}

impl Permission {
    pub fn from_browser(value: &str) -> Self {
        match value {
            "granted" => Permission::Granted,
            "denied" => Permission::Denied,
            _ => Permission::Default,
        }
    }

    pub fn is_granted(self) -> bool {
        matches!(self, Permission::Granted)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SubscribeRequest<'a> {
    pub(crate) device_id: &'a str,
    pub(crate) subscription: &'a PushSubscription,
}

#[derive(Debug, Serialize)]
pub(crate) struct NotifyRequest<'a> {
    pub(crate) device_ids: &'a [String],
    pub(crate) payload: &'a NotificationPayload,
}
