use thiserror::Error;

/// Failure reported by a public client operation. The `Display` text is the
/// message surfaced to the host application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PushError {
    #[error("Push notifications are not supported in this browser")]
    Unsupported,

    #[error("Push notification permission denied")]
    PermissionDenied,

    /// The permission prompt itself failed, as opposed to the user saying no.
    #[error("{0}")]
    PermissionRequest(String),

    #[error("{0}")]
    Registration(String),

    #[error("Invalid VAPID public key: {0}")]
    InvalidVapidKey(String),

    #[error("{0}")]
    Subscription(String),

    #[error("{}HTTP {status}: {status_text}", .context.prefix())]
    Http {
        status: u16,
        status_text: String,
        context: HttpContext,
    },

    #[error("{0}")]
    Network(String),

    #[error("No device IDs provided")]
    NoDeviceIds,

    #[error("Unknown error during push notification setup")]
    Unknown,
}

/// Which request produced a non-2xx response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpContext {
    Subscribe,
    Notify,
}

impl HttpContext {
    fn prefix(self) -> &'static str {
        match self {
            HttpContext::Subscribe => "Failed to register subscription: ",
            HttpContext::Notify => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnsupportedEnvironment,
    PermissionDenied,
    Setup,
    Transport,
    Exception,
}

impl PushError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PushError::Unsupported => ErrorKind::UnsupportedEnvironment,
            PushError::PermissionDenied => ErrorKind::PermissionDenied,
            PushError::Registration(_)
            | PushError::PermissionRequest(_)
            | PushError::InvalidVapidKey(_)
            | PushError::Subscription(_) => ErrorKind::Setup,
            PushError::Http { .. } => ErrorKind::Transport,
            PushError::Network(_) | PushError::NoDeviceIds | PushError::Unknown => {
                ErrorKind::Exception
            }
        }
    }

    /// Builds an exception-style error from a platform message, using the
    /// generic placeholder when the platform gave nothing readable.
    pub(crate) fn from_message(message: impl Into<String>, wrap: fn(String) -> Self) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            PushError::Unknown
        } else {
            wrap(message)
        }
    }
}

impl From<reqwest::Error> for PushError {
    fn from(err: reqwest::Error) -> Self {
        PushError::from_message(err.to_string(), PushError::Network)
    }
}
