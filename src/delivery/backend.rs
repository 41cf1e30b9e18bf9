//! The platform seam for notification delivery.
//!
//! [`NotificationBackend`] abstracts whatever native notification surface the
//! host offers. Backends own the permission model and the live notification
//! resources; the [`Notifier`](super::Notifier) front end adds the
//! permission gate, auto-close timing and logging on top.

use std::sync::Arc;

use crate::models::Permission;

/// Callback invoked when the user clicks a delivered notification. Receives
/// the opaque `data` payload attached at show time.
pub type ClickHandler = Arc<dyn Fn(&serde_json::Value) + Send + Sync>;

/// Everything a backend needs to render one notification.
#[derive(Clone)]
pub struct DeliveryRequest {
    pub title: String,
    pub body: Option<String>,
    pub icon: Option<String>,
    /// Collapse key for the OS-level notification surface.
    pub tag: Option<String>,
    /// Keep the notification on screen until the user interacts with it.
    pub require_interaction: bool,
    /// Opaque payload handed to the click handler.
    pub data: serde_json::Value,
    pub on_click: Option<ClickHandler>,
}

impl std::fmt::Debug for DeliveryRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryRequest")
            .field("title", &self.title)
            .field("body", &self.body)
            .field("icon", &self.icon)
            .field("tag", &self.tag)
            .field("require_interaction", &self.require_interaction)
            .field("data", &self.data)
            .field("on_click", &self.on_click.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// A live, delivered notification. The handle only supports closing; click
/// handling is wired by the backend at delivery time.
pub trait NotificationHandle: Send + Sync {
    fn close(&self);
    fn is_closed(&self) -> bool;
}

/// Failure raised by a backend at delivery time.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("platform notification surface unavailable")]
    Unsupported,
    #[error("notification delivery failed: {0}")]
    Failed(String),
}

/// Platform notification surface.
#[async_trait::async_trait]
pub trait NotificationBackend: Send + Sync {
    /// Whether the host environment has a notification surface at all.
    fn is_supported(&self) -> bool;

    /// Current authorization state. Never prompts.
    fn permission(&self) -> Permission;

    /// Trigger the platform permission prompt once and resolve with the
    /// outcome. On platforms without a permission model this resolves
    /// immediately.
    async fn request_permission(&self) -> Permission;

    /// Render the notification. Only called with permission granted.
    fn deliver(&self, request: DeliveryRequest)
        -> Result<Arc<dyn NotificationHandle>, DeliveryError>;
}
