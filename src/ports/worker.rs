use serde_json::Value;

use crate::types::notification::NotificationOptions;

/// Service worker globals: `registration.showNotification`, `clients` and
/// `skipWaiting`.
pub trait WorkerContext {
    type Error: std::fmt::Display;

    fn show_notification(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> impl Future<Output = Result<(), Self::Error>>;

    fn open_window(&self, url: &str) -> impl Future<Output = Result<(), Self::Error>>;

    fn claim_clients(&self) -> impl Future<Output = Result<(), Self::Error>>;

    fn skip_waiting(&self) -> impl Future<Output = Result<(), Self::Error>>;
}

/// The notification carried by a `notificationclick` event.
pub trait ClickedNotification {
    fn close(&self);

    /// Data attached when the notification was shown, if any.
    fn data(&self) -> Option<Value>;
}
