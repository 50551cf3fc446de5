//! Web push for the browser: subscribe a page to push messages, trigger
//! notifications through a remote push service, and render them from the
//! service worker.

#[cfg(target_arch = "wasm32")]
pub mod adapters;
pub mod client;
pub mod config;
pub mod device_id;
pub mod error;
pub mod logging;
pub mod ports;
pub mod push;
pub mod setup;
pub mod types;
pub mod worker;

pub use config::PushConfig;
pub use error::PushError;
pub use push::{NotificationDispatcher, PushNotifications};
pub use types::notification::NotificationPayload;
pub use types::push::PushSubscription;
pub use worker::NotificationWorker;
