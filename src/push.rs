//! Page-side client: permission, service worker registration, push
//! subscription and forwarding the subscription to the subscribe endpoint.

use crate::client::PushServiceClient;
use crate::config::PushConfig;
use crate::device_id::get_or_create_device_id;
use crate::error::PushError;
use crate::logging::{LogEntry, Logger};
use crate::ports::{CookieStore, PushPlatform};
use crate::types::notification::NotificationPayload;
use crate::types::push::PushSubscription;

mod dispatch;
pub mod vapid;

pub use dispatch::NotificationDispatcher;
use vapid::url_base64_to_bytes;

pub struct PushNotifications<P, C> {
    config: PushConfig,
    platform: P,
    cookies: C,
    client: PushServiceClient,
    dispatcher: NotificationDispatcher,
    logger: Logger,
}

impl<P, C> PushNotifications<P, C>
where
    P: PushPlatform,
    C: CookieStore,
{
    pub fn new(config: PushConfig, platform: P, cookies: C) -> Self {
        let logger = Logger::new(config.logging);
        let client = PushServiceClient::new(&config);
        let dispatcher = NotificationDispatcher::with_client(client.clone(), logger);
        Self {
            config,
            platform,
            cookies,
            client,
            dispatcher,
            logger,
        }
    }

    /// Whether both service workers and the Push API exist. An unsupported
    /// environment stays unsupported; retrying is pointless.
    pub fn is_supported(&self) -> bool {
        self.platform.is_supported()
    }

    /// Runs the full subscription sequence once. Every failure, including
    /// platform exceptions, comes back as `Err`; nothing is retried.
    pub async fn subscribe(&self) -> Result<PushSubscription, PushError> {
        if !self.platform.is_supported() {
            if let Some(on_unsupported) = &self.config.on_unsupported {
                on_unsupported();
            }
            let err = PushError::Unsupported;
            self.report_failure(&err);
            return Err(err);
        }

        match self.subscribe_supported().await {
            Ok(subscription) => {
                self.logger.log(
                    LogEntry::new("Push subscription registered")
                        .with("endpoint", subscription.endpoint.as_str()),
                );
                Ok(subscription)
            }
            Err(err) => {
                self.report_failure(&err);
                Err(err)
            }
        }
    }

    async fn subscribe_supported(&self) -> Result<PushSubscription, PushError> {
        let registration = self
            .platform
            .register_worker(&self.config.service_worker_path)
            .await
            .map_err(|err| PushError::from_message(err.to_string(), PushError::Registration))?;

        let permission = self
            .platform
            .request_permission()
            .await
            .map_err(|err| PushError::from_message(err.to_string(), PushError::PermissionRequest))?;
        if !permission.is_granted() {
            if let Some(on_permission_denied) = &self.config.on_permission_denied {
                on_permission_denied();
            }
            return Err(PushError::PermissionDenied);
        }

        let device_id = get_or_create_device_id(&self.cookies, &self.config.cookie_name, &self.logger);

        let application_server_key = url_base64_to_bytes(&self.config.vapid_public_key)
            .map_err(|err| PushError::InvalidVapidKey(err.to_string()))?;
        let subscription = self
            .platform
            .subscribe(&registration, &application_server_key)
            .await
            .map_err(|err| PushError::from_message(err.to_string(), PushError::Subscription))?;

        self.client
            .register_subscription(&device_id, &subscription)
            .await?;

        if let Some(on_success) = &self.config.on_success {
            on_success(&subscription);
        }
        Ok(subscription)
    }

    pub async fn trigger(
        &self,
        payload: &NotificationPayload,
        device_ids: &[String],
    ) -> Result<(), PushError> {
        self.dispatcher.trigger(payload, device_ids).await
    }

    fn report_failure(&self, err: &PushError) {
        self.logger.error(
            LogEntry::new("Push notification setup failed")
                .with("error", err.to_string())
                .with("kind", format!("{:?}", err.kind())),
        );
    }
}
