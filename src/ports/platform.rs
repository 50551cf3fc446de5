use crate::types::push::{Permission, PushSubscription};

/// Page-side push capabilities: service worker registration, the permission
/// prompt and `PushManager.subscribe`.
pub trait PushPlatform {
    type Registration;
    type Error: std::fmt::Display;

    fn is_supported(&self) -> bool;

    fn register_worker(
        &self,
        script_path: &str,
    ) -> impl Future<Output = Result<Self::Registration, Self::Error>>;

    fn request_permission(&self) -> impl Future<Output = Result<Permission, Self::Error>>;

    /// Subscribes with `userVisibleOnly` set and the raw application server key.
    fn subscribe(
        &self,
        registration: &Self::Registration,
        application_server_key: &[u8],
    ) -> impl Future<Output = Result<PushSubscription, Self::Error>>;
}
