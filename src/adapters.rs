//! Browser implementations of the ports, plus the service worker entry
//! points called from `static/worker.js`.

use crate::logging::Logger;
use crate::ports;
use crate::types::notification::NotificationOptions;
use crate::types::push::{Permission, PushSubscription};
use crate::worker::NotificationWorker;

use js_sys::{Promise, Reflect};
use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, future_to_promise};

/// A rejected promise or thrown exception, reduced to its message.
#[derive(Debug, Clone)]
pub struct BrowserError(String);

impl BrowserError {
    fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl std::fmt::Display for BrowserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<JsValue> for BrowserError {
    fn from(value: JsValue) -> Self {
        if let Some(err) = value.dyn_ref::<js_sys::Error>() {
            return Self(String::from(err.message()));
        }
        Self(value.as_string().unwrap_or_default())
    }
}

fn window() -> Result<web_sys::Window, BrowserError> {
    web_sys::window().ok_or_else(|| BrowserError::new("No window available in this context"))
}

fn has_property(target: &JsValue, name: &str) -> bool {
    Reflect::has(target, &JsValue::from_str(name)).unwrap_or(false)
}

fn js_to_json(value: &JsValue) -> Option<Value> {
    if value.is_undefined() || value.is_null() {
        return None;
    }
    if let Some(text) = value.as_string() {
        return Some(Value::String(text));
    }
    let text = js_sys::JSON::stringify(value).ok()?;
    serde_json::from_str(&String::from(text)).ok()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserPlatform;

impl ports::PushPlatform for BrowserPlatform {
    type Registration = web_sys::ServiceWorkerRegistration;
    type Error = BrowserError;

    fn is_supported(&self) -> bool {
        let Ok(window) = window() else {
            return false;
        };
        let navigator = JsValue::from(window.navigator());
        has_property(&navigator, "serviceWorker") && has_property(&window, "PushManager")
    }

    async fn register_worker(
        &self,
        script_path: &str,
    ) -> Result<web_sys::ServiceWorkerRegistration, BrowserError> {
        let promise = window()?.navigator().service_worker().register(script_path);
        let registration = JsFuture::from(promise).await?;
        registration
            .dyn_into()
            .map_err(|_| BrowserError::new("Unexpected return value from serviceWorker.register"))
    }

    async fn request_permission(&self) -> Result<Permission, BrowserError> {
        let promise = web_sys::Notification::request_permission()?;
        let permission = JsFuture::from(promise).await?;
        Ok(Permission::from_browser(
            &permission.as_string().unwrap_or_default(),
        ))
    }

    async fn subscribe(
        &self,
        registration: &web_sys::ServiceWorkerRegistration,
        application_server_key: &[u8],
    ) -> Result<PushSubscription, BrowserError> {
        let options = js_sys::Object::new();
        Reflect::set(&options, &"userVisibleOnly".into(), &JsValue::TRUE)?;
        Reflect::set(
            &options,
            &"applicationServerKey".into(),
            &js_sys::Uint8Array::from(application_server_key),
        )?;

        let promise = registration
            .push_manager()?
            .subscribe_with_options(options.unchecked_ref())?;
        let subscription = JsFuture::from(promise).await?;
        let json = js_sys::JSON::stringify(&subscription)?;
        serde_json::from_str(&String::from(json)).map_err(|err| BrowserError::new(err.to_string()))
    }
}

/// `document.cookie` of the current page.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentCookies;

impl DocumentCookies {
    fn document() -> Result<web_sys::HtmlDocument, BrowserError> {
        window()?
            .document()
            .ok_or_else(|| BrowserError::new("No document available"))?
            .dyn_into()
            .map_err(|_| BrowserError::new("Document does not support cookies"))
    }
}

impl ports::CookieStore for DocumentCookies {
    type Error = BrowserError;

    fn read(&self) -> Result<String, BrowserError> {
        Ok(Self::document()?.cookie()?)
    }

    fn write(&self, cookie: &str) -> Result<(), BrowserError> {
        Ok(Self::document()?.set_cookie(cookie)?)
    }
}

/// The running service worker's global scope.
#[derive(Debug, Clone)]
pub struct ServiceWorkerScope {
    scope: web_sys::ServiceWorkerGlobalScope,
}

impl ServiceWorkerScope {
    pub fn current() -> Self {
        Self {
            scope: js_sys::global().unchecked_into(),
        }
    }
}

impl ports::WorkerContext for ServiceWorkerScope {
    type Error = BrowserError;

    async fn show_notification(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> Result<(), BrowserError> {
        let options =
            serde_json::to_string(options).map_err(|err| BrowserError::new(err.to_string()))?;
        let options = js_sys::JSON::parse(&options)?;
        let promise = self
            .scope
            .registration()
            .show_notification_with_options(title, options.unchecked_ref())?;
        JsFuture::from(promise).await?;
        Ok(())
    }

    async fn open_window(&self, url: &str) -> Result<(), BrowserError> {
        JsFuture::from(self.scope.clients().open_window(url)).await?;
        Ok(())
    }

    async fn claim_clients(&self) -> Result<(), BrowserError> {
        JsFuture::from(self.scope.clients().claim()).await?;
        Ok(())
    }

    async fn skip_waiting(&self) -> Result<(), BrowserError> {
        JsFuture::from(self.scope.skip_waiting()?).await?;
        Ok(())
    }
}

struct BrowserNotification(web_sys::Notification);

impl ports::ClickedNotification for BrowserNotification {
    fn close(&self) {
        self.0.close();
    }

    fn data(&self) -> Option<Value> {
        js_to_json(&self.0.data())
    }
}

fn notification_worker() -> NotificationWorker<ServiceWorkerScope> {
    NotificationWorker::new(ServiceWorkerScope::current(), Logger::default())
}

#[wasm_bindgen]
pub fn handle_push(event: web_sys::PushEvent) -> Promise {
    future_to_promise(async move {
        let data = event.data().map(|data| data.text());
        notification_worker().handle_push(data.as_deref()).await;
        Ok(JsValue::UNDEFINED)
    })
}

#[wasm_bindgen]
pub fn handle_notification_click(event: web_sys::NotificationEvent) -> Promise {
    future_to_promise(async move {
        let notification = BrowserNotification(event.notification());
        notification_worker()
            .handle_notification_click(&notification)
            .await;
        Ok(JsValue::UNDEFINED)
    })
}

#[wasm_bindgen]
pub fn handle_activate(_event: web_sys::ExtendableEvent) -> Promise {
    future_to_promise(async move {
        notification_worker().handle_activate().await;
        Ok(JsValue::UNDEFINED)
    })
}

#[wasm_bindgen]
pub fn handle_message(event: web_sys::ExtendableMessageEvent) -> Promise {
    future_to_promise(async move {
        let message = js_to_json(&event.data()).unwrap_or(Value::Null);
        notification_worker().handle_message(&message).await;
        Ok(JsValue::UNDEFINED)
    })
}
