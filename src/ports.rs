//! Capabilities the library needs from the browser. Browser builds use the
//! implementations in `adapters`; tests supply fakes.

pub mod cookies;
pub mod platform;
pub mod worker;

pub use cookies::CookieStore;
pub use platform::PushPlatform;
pub use worker::{ClickedNotification, WorkerContext};
