use crate::types::push::PushSubscription;

pub const DEFAULT_SERVICE_WORKER_PATH: &str = "/worker.js";
pub const DEFAULT_DEVICE_ID_COOKIE: &str = "webpushkit_deviceId";

/// Client configuration. Endpoints and the VAPID key are explicit so each
/// environment can point at its own push service.
pub struct PushConfig {
    pub base_url: String,
    pub vapid_public_key: String,
    pub service_worker_path: String,
    pub cookie_name: String,
    pub logging: bool,
    pub on_success: Option<Box<dyn Fn(&PushSubscription)>>,
    pub on_permission_denied: Option<Box<dyn Fn()>>,
    pub on_unsupported: Option<Box<dyn Fn()>>,
}

impl PushConfig {
    pub fn new(base_url: impl Into<String>, vapid_public_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            vapid_public_key: vapid_public_key.into(),
            service_worker_path: DEFAULT_SERVICE_WORKER_PATH.to_string(),
            cookie_name: DEFAULT_DEVICE_ID_COOKIE.to_string(),
            logging: true,
            on_success: None,
            on_permission_denied: None,
            on_unsupported: None,
        }
    }

    pub fn with_service_worker_path(mut self, path: impl Into<String>) -> Self {
        self.service_worker_path = path.into();
        self
    }

    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.logging = enabled;
        self
    }

    pub fn on_success(mut self, callback: impl Fn(&PushSubscription) + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    pub fn on_permission_denied(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_permission_denied = Some(Box::new(callback));
        self
    }

    pub fn on_unsupported(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_unsupported = Some(Box::new(callback));
        self
    }

    pub fn subscribe_endpoint(&self) -> String {
        format!("{}/api/subscribe", self.base_url.trim_end_matches('/'))
    }

    pub fn notify_endpoint(&self) -> String {
        format!("{}/api/notify", self.base_url.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for PushConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushConfig")
            .field("base_url", &self.base_url)
            .field("vapid_public_key", &self.vapid_public_key)
            .field("service_worker_path", &self.service_worker_path)
            .field("cookie_name", &self.cookie_name)
            .field("logging", &self.logging)
            .finish_non_exhaustive()
    }
}
