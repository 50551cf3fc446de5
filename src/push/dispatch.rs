use crate::client::PushServiceClient;
use crate::config::PushConfig;
use crate::error::PushError;
use crate::logging::{LogEntry, Logger};
use crate::types::notification::NotificationPayload;

/// Sends trigger requests to the notify endpoint on behalf of the page.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    client: PushServiceClient,
    logger: Logger,
}

impl NotificationDispatcher {
    pub fn new(config: &PushConfig) -> Self {
        Self::with_client(PushServiceClient::new(config), Logger::new(config.logging))
    }

    pub(crate) fn with_client(client: PushServiceClient, logger: Logger) -> Self {
        Self { client, logger }
    }

    /// Posts `payload` for `device_ids` in a single request. An empty
    /// recipient list fails without touching the network.
    pub async fn trigger(
        &self,
        payload: &NotificationPayload,
        device_ids: &[String],
    ) -> Result<(), PushError> {
        if device_ids.is_empty() {
            let err = PushError::NoDeviceIds;
            self.logger
                .error(LogEntry::new("Failed to trigger notification").with("error", err.to_string()));
            return Err(err);
        }

        match self.client.notify(device_ids, payload).await {
            Ok(()) => {
                self.logger.log(
                    LogEntry::new("Notification triggered")
                        .with("title", payload.title.as_str())
                        .with("recipients", device_ids.len()),
                );
                Ok(())
            }
            Err(err) => {
                self.logger
                    .error(LogEntry::new("Failed to trigger notification").with("error", err.to_string()));
                Err(err)
            }
        }
    }
}
