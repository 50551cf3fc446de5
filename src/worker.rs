//! Background script event handling.
//!
//! Each handler runs to completion and never fails: platform errors are
//! logged and swallowed so the service worker keeps running. Callers are
//! expected to keep the triggering event alive (`waitUntil`) until the
//! returned future resolves.

use crate::logging::{LogEntry, Logger};
use crate::ports::{ClickedNotification, WorkerContext};
use crate::types::notification::DisplayNotification;

use serde_json::Value;

pub const SKIP_WAITING_MESSAGE: &str = "SKIP_WAITING";
const DEFAULT_CLICK_URL: &str = "/";

pub struct NotificationWorker<W> {
    context: W,
    logger: Logger,
}

impl<W: WorkerContext> NotificationWorker<W> {
    pub fn new(context: W, logger: Logger) -> Self {
        Self { context, logger }
    }

    /// Shows a notification for a push message. `data` is the raw message
    /// text; missing or undecodable data shows the fallback notification,
    /// and a mistyped optional field is dropped on its own.
    pub async fn handle_push(&self, data: Option<&str>) {
        let data = self.decode_payload(data);
        let display = DisplayNotification::from_push_data(&data);
        if let Err(err) = self
            .context
            .show_notification(&display.title, &display.options)
            .await
        {
            self.logger.error(
                LogEntry::new("Service worker: Error displaying notification")
                    .with("error", err.to_string()),
            );
        }
    }

    /// Closes the clicked notification, then opens its `data.url` (or `/`).
    pub async fn handle_notification_click<N: ClickedNotification>(&self, notification: &N) {
        notification.close();
        let url = click_target(notification.data());
        if let Err(err) = self.context.open_window(&url).await {
            self.logger.error(
                LogEntry::new("Service worker: Error handling notification click")
                    .with("error", err.to_string())
                    .with("url", url),
            );
        }
    }

    /// Takes control of open pages without waiting for a reload.
    pub async fn handle_activate(&self) {
        if let Err(err) = self.context.claim_clients().await {
            self.logger.error(
                LogEntry::new("Service worker: Error claiming clients").with("error", err.to_string()),
            );
        }
    }

    pub async fn handle_message(&self, message: &Value) {
        if message.as_str() != Some(SKIP_WAITING_MESSAGE) {
            return;
        }
        if let Err(err) = self.context.skip_waiting().await {
            self.logger.error(
                LogEntry::new("Service worker: Error skipping waiting").with("error", err.to_string()),
            );
        }
    }

    fn decode_payload(&self, data: Option<&str>) -> Value {
        let Some(text) = data.filter(|text| !text.trim().is_empty()) else {
            return Value::Null;
        };
        match serde_json::from_str(text) {
            Ok(value) => value,
            Err(err) => {
                self.logger.warn(
                    LogEntry::new("Service worker: Ignoring undecodable push data")
                        .with("error", err.to_string()),
                );
                Value::Null
            }
        }
    }
}

fn click_target(data: Option<Value>) -> String {
    data.as_ref()
        .and_then(|data| data.get("url"))
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .unwrap_or(DEFAULT_CLICK_URL)
        .to_string()
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use crate::types::notification::{FALLBACK_BODY, FALLBACK_TITLE, NotificationOptions};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    type Journal = Arc<Mutex<Vec<String>>>;

    #[derive(Clone, Default)]
    struct TestContext {
        journal: Journal,
        shown: Arc<Mutex<Vec<(String, NotificationOptions)>>>,
        fail: bool,
    }

    impl TestContext {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn record(&self, entry: String) -> Result<(), String> {
            self.journal.lock().expect("journal lock").push(entry);
            if self.fail {
                Err("InvalidStateError".to_string())
            } else {
                Ok(())
            }
        }

        fn journal(&self) -> Vec<String> {
            self.journal.lock().expect("journal lock").clone()
        }

        fn shown(&self) -> Vec<(String, NotificationOptions)> {
            self.shown.lock().expect("shown lock").clone()
        }
    }

    impl WorkerContext for TestContext {
        type Error = String;

        async fn show_notification(
            &self,
            title: &str,
            options: &NotificationOptions,
        ) -> Result<(), String> {
            self.shown
                .lock()
                .expect("shown lock")
                .push((title.to_string(), options.clone()));
            self.record(format!("show {title}"))
        }

        async fn open_window(&self, url: &str) -> Result<(), String> {
            self.record(format!("open {url}"))
        }

        async fn claim_clients(&self) -> Result<(), String> {
            self.record("claim".to_string())
        }

        async fn skip_waiting(&self) -> Result<(), String> {
            self.record("skip waiting".to_string())
        }
    }

    struct TestNotification {
        journal: Journal,
        data: Option<Value>,
    }

    impl ClickedNotification for TestNotification {
        fn close(&self) {
            self.journal
                .lock()
                .expect("journal lock")
                .push("close".to_string());
        }

        fn data(&self) -> Option<Value> {
            self.data.clone()
        }
    }

    fn worker(context: &TestContext) -> NotificationWorker<TestContext> {
        NotificationWorker::new(context.clone(), Logger::new(false))
    }

    #[tokio::test]
    async fn handle_push__should_show_fallback_for_missing_or_malformed_data() {
        let inputs = [
            None,
            Some(""),
            Some("not json"),
            Some("[1, 2, 3]"),
            Some("null"),
            Some(r#"{"title": 5}"#),
            Some("{}"),
        ];
        for input in inputs {
            // Given
            let context = TestContext::default();

            // When
            worker(&context).handle_push(input).await;

            // Then
            let shown = context.shown();
            assert_eq!(shown.len(), 1, "input {input:?}");
            assert_eq!(shown[0].0, FALLBACK_TITLE);
            assert_eq!(shown[0].1.body, FALLBACK_BODY);
        }
    }

    #[tokio::test]
    async fn handle_push__should_omit_absent_fields_for_title_only_payload() {
        // Given
        let context = TestContext::default();

        // When
        worker(&context)
            .handle_push(Some(r#"{"title":"Invoice paid"}"#))
            .await;

        // Then
        let shown = context.shown();
        assert_eq!(shown[0].0, "Invoice paid");
        let options = serde_json::to_value(&shown[0].1).expect("serialize options");
        assert_eq!(options, json!({ "body": FALLBACK_BODY }));
    }

    #[tokio::test]
    async fn handle_push__should_pass_through_supplied_fields() {
        // Given
        let context = TestContext::default();
        let data = json!({
            "title": "New comment",
            "body": "Ana replied to your post",
            "icon": "/icons/comment.png",
            "tag": "comment-7",
            "silent": true,
            "vibrate": 150,
            "lang": "en",
            "data": { "url": "/posts/7#comment" }
        })
        .to_string();

        // When
        worker(&context).handle_push(Some(&data)).await;

        // Then
        let options = serde_json::to_value(&context.shown()[0].1).expect("serialize options");
        assert_eq!(
            options,
            json!({
                "body": "Ana replied to your post",
                "icon": "/icons/comment.png",
                "tag": "comment-7",
                "silent": true,
                "vibrate": 150,
                "lang": "en",
                "data": { "url": "/posts/7#comment" }
            })
        );
    }

    #[tokio::test]
    async fn handle_push__should_keep_title_and_body_when_a_field_is_mistyped() {
        // Given
        let context = TestContext::default();
        let data = r#"{"title":"Order shipped","body":"Track it","dir":"LTR","tag":7,"timestamp":1712345678901.5}"#;

        // When
        worker(&context).handle_push(Some(data)).await;

        // Then
        let shown = context.shown();
        assert_eq!(shown[0].0, "Order shipped");
        let options = serde_json::to_value(&shown[0].1).expect("serialize options");
        assert_eq!(
            options,
            json!({ "body": "Track it", "timestamp": 1712345678901.5 })
        );
    }

    #[tokio::test]
    async fn handle_push__should_open_top_level_url_on_click() {
        // Given
        let context = TestContext::default();
        let worker = worker(&context);
        worker
            .handle_push(Some(r#"{"title":"New order","url":"/orders/7"}"#))
            .await;
        let attached = context.shown()[0].1.data.clone();
        let notification = TestNotification {
            journal: Arc::clone(&context.journal),
            data: attached,
        };

        // When
        worker.handle_notification_click(&notification).await;

        // Then
        assert_eq!(
            context.journal(),
            vec!["show New order", "close", "open /orders/7"]
        );
    }

    #[tokio::test]
    async fn handle_push__should_swallow_display_errors() {
        // Given
        let context = TestContext::failing();

        // When
        worker(&context).handle_push(Some(r#"{"title":"x"}"#)).await;

        // Then
        assert_eq!(context.journal(), vec!["show x"]);
    }

    #[tokio::test]
    async fn handle_notification_click__should_close_then_open_root_without_data() {
        // Given
        let context = TestContext::default();
        let notification = TestNotification {
            journal: Arc::clone(&context.journal),
            data: None,
        };

        // When
        worker(&context)
            .handle_notification_click(&notification)
            .await;

        // Then
        assert_eq!(context.journal(), vec!["close", "open /"]);
    }

    #[tokio::test]
    async fn handle_notification_click__should_open_attached_url() {
        // Given
        let context = TestContext::default();
        let notification = TestNotification {
            journal: Arc::clone(&context.journal),
            data: Some(json!({ "url": "/dashboard" })),
        };

        // When
        worker(&context)
            .handle_notification_click(&notification)
            .await;

        // Then
        assert_eq!(context.journal(), vec!["close", "open /dashboard"]);
    }

    #[tokio::test]
    async fn handle_notification_click__should_swallow_open_errors() {
        // Given
        let context = TestContext::failing();
        let notification = TestNotification {
            journal: Arc::clone(&context.journal),
            data: Some(json!({ "other": true })),
        };

        // When
        worker(&context)
            .handle_notification_click(&notification)
            .await;

        // Then
        assert_eq!(context.journal(), vec!["close", "open /"]);
    }

    #[tokio::test]
    async fn handle_activate__should_claim_clients() {
        // Given
        let context = TestContext::default();

        // When
        worker(&context).handle_activate().await;

        // Then
        assert_eq!(context.journal(), vec!["claim"]);
    }

    #[tokio::test]
    async fn handle_message__should_skip_waiting_only_on_request() {
        // Given
        let context = TestContext::default();
        let worker = worker(&context);

        // When
        worker.handle_message(&json!("PING")).await;
        worker.handle_message(&json!({ "type": SKIP_WAITING_MESSAGE })).await;
        worker.handle_message(&json!(SKIP_WAITING_MESSAGE)).await;

        // Then
        assert_eq!(context.journal(), vec!["skip waiting"]);
    }
}
