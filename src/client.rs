//! HTTP transport to the remote push service.
//!
//! Both endpoints take a JSON body over POST and signal success with any 2xx
//! status. Response bodies are ignored.

use crate::config::PushConfig;
use crate::error::{HttpContext, PushError};
use crate::types::notification::NotificationPayload;
use crate::types::push::{NotifyRequest, PushSubscription, SubscribeRequest};

use reqwest::{Client, Response};
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct PushServiceClient {
    http: Client,
    subscribe_url: String,
    notify_url: String,
}

impl PushServiceClient {
    pub fn new(config: &PushConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(http: Client, config: &PushConfig) -> Self {
        Self {
            http,
            subscribe_url: config.subscribe_endpoint(),
            notify_url: config.notify_endpoint(),
        }
    }

    /// Stores the pairing of `device_id` and `subscription` on the server.
    pub async fn register_subscription(
        &self,
        device_id: &str,
        subscription: &PushSubscription,
    ) -> Result<(), PushError> {
        let body = SubscribeRequest {
            device_id,
            subscription,
        };
        let response = self.post(&self.subscribe_url, &body).await?;
        ensure_success(response, HttpContext::Subscribe)
    }

    /// Asks the server to push `payload` to every listed device.
    pub async fn notify(
        &self,
        device_ids: &[String],
        payload: &NotificationPayload,
    ) -> Result<(), PushError> {
        let body = NotifyRequest {
            device_ids,
            payload,
        };
        let response = self.post(&self.notify_url, &body).await?;
        ensure_success(response, HttpContext::Notify)
    }

    async fn post<B: Serialize>(&self, url: &str, body: &B) -> Result<Response, PushError> {
        let response = self.http.post(url).json(body).send().await?;
        Ok(response)
    }
}

fn ensure_success(response: Response, context: HttpContext) -> Result<(), PushError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    Err(PushError::Http {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        context,
    })
}
