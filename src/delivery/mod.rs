//! Notification delivery.
//!
//! [`Notifier`] is the crate-facing front end: it gates every delivery on the
//! backend's permission state, applies the auto-close policy and wires click
//! handling. Permission denial and unsupported environments are never errors
//! here: `show` degrades to a logged no-op returning `None`, and the caller
//! decides what to tell the user.

pub mod backend;
pub mod backends;

use std::sync::Arc;
use std::time::Duration;

use crate::models::Permission;

pub use backend::{
    ClickHandler, DeliveryError, DeliveryRequest, NotificationBackend, NotificationHandle,
};
pub use backends::{ConsoleBackend, MemoryBackend, MemoryNotification};

/// Default auto-close delay for delivered notifications.
pub const DEFAULT_AUTO_CLOSE_DELAY: Duration = Duration::from_secs(5);

/// Presentation options for [`Notifier::show`].
#[derive(Clone)]
pub struct ShowOptions {
    pub body: Option<String>,
    pub icon: Option<String>,
    /// Collapse key for the OS-level notification surface.
    pub tag: Option<String>,
    pub require_interaction: bool,
    /// Close the notification automatically after `auto_close_delay`.
    pub auto_close: bool,
    pub auto_close_delay: Duration,
    /// Opaque payload handed to `on_click`.
    pub data: serde_json::Value,
    pub on_click: Option<ClickHandler>,
}

impl Default for ShowOptions {
    fn default() -> Self {
        Self {
            body: None,
            icon: None,
            tag: None,
            require_interaction: false,
            auto_close: true,
            auto_close_delay: DEFAULT_AUTO_CLOSE_DELAY,
            data: serde_json::Value::Null,
            on_click: None,
        }
    }
}

impl std::fmt::Debug for ShowOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShowOptions")
            .field("body", &self.body)
            .field("icon", &self.icon)
            .field("tag", &self.tag)
            .field("require_interaction", &self.require_interaction)
            .field("auto_close", &self.auto_close)
            .field("auto_close_delay", &self.auto_close_delay)
            .field("data", &self.data)
            .field("on_click", &self.on_click.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// A notification that reached the platform surface.
pub struct ActiveNotification {
    handle: Arc<dyn NotificationHandle>,
}

impl ActiveNotification {
    pub fn close(&self) {
        self.handle.close();
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_closed()
    }
}

/// Permission-aware front end over a [`NotificationBackend`].
#[derive(Clone)]
pub struct Notifier {
    backend: Arc<dyn NotificationBackend>,
}

impl Notifier {
    pub fn new(backend: Arc<dyn NotificationBackend>) -> Self {
        Self { backend }
    }

    /// Whether the host environment has a notification surface.
    pub fn is_supported(&self) -> bool {
        self.backend.is_supported()
    }

    /// Current authorization state. Never prompts.
    pub fn permission(&self) -> Permission {
        if !self.backend.is_supported() {
            return Permission::Unsupported;
        }
        self.backend.permission()
    }

    /// Trigger the platform permission prompt and resolve with the outcome.
    /// Real platforms require a user-gesture context for the prompt to
    /// appear; that is the caller's concern, not enforced here.
    pub async fn request_permission(&self) -> Permission {
        if !self.backend.is_supported() {
            return Permission::Unsupported;
        }
        self.backend.request_permission().await
    }

    /// Deliver a notification immediately if permission is granted.
    ///
    /// Returns `None` (and logs) when permission is missing or the backend
    /// fails, never an error. When `auto_close` is set and a tokio runtime
    /// is available, a detached task closes the notification after the
    /// configured delay.
    pub fn show(&self, title: &str, options: ShowOptions) -> Option<ActiveNotification> {
        let permission = self.permission();
        if permission != Permission::Granted {
            log::warn!("notification suppressed, permission is {permission}");
            return None;
        }

        let auto_close = options.auto_close;
        let auto_close_delay = options.auto_close_delay;
        let request = DeliveryRequest {
            title: title.to_string(),
            body: options.body,
            icon: options.icon,
            tag: options.tag,
            require_interaction: options.require_interaction,
            data: options.data,
            on_click: options.on_click,
        };

        let handle = match self.backend.deliver(request) {
            Ok(handle) => handle,
            Err(e) => {
                log::warn!("notification delivery failed: {e}");
                return None;
            }
        };

        if auto_close {
            match tokio::runtime::Handle::try_current() {
                Ok(runtime) => {
                    let handle = Arc::clone(&handle);
                    runtime.spawn(async move {
                        tokio::time::sleep(auto_close_delay).await;
                        handle.close();
                    });
                }
                Err(_) => {
                    log::debug!("no async runtime, skipping auto-close timer");
                }
            }
        }

        Some(ActiveNotification { handle })
    }

    /// Deliver a short-lived test notification so a settings screen can
    /// verify the pipeline end to end.
    pub fn show_test_notification(&self) -> Option<ActiveNotification> {
        let shown = self.show(
            "🧪 Test notification",
            ShowOptions {
                body: Some("Notifications are working!".to_string()),
                tag: Some("test-notification".to_string()),
                auto_close_delay: Duration::from_secs(3),
                ..Default::default()
            },
        );
        log::debug!(
            "test notification {}",
            if shown.is_some() { "sent" } else { "suppressed" }
        );
        shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn granted_notifier() -> (Notifier, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::with_permission(Permission::Granted));
        (Notifier::new(Arc::clone(&backend) as _), backend)
    }

    #[test]
    fn test_show_without_permission_returns_none() {
        let backend = Arc::new(MemoryBackend::new());
        let notifier = Notifier::new(Arc::clone(&backend) as _);

        assert!(notifier.show("hello", ShowOptions::default()).is_none());
        assert_eq!(backend.delivered_count(), 0);
    }

    #[test]
    fn test_show_with_denied_permission_returns_none() {
        let backend = Arc::new(MemoryBackend::with_permission(Permission::Denied));
        let notifier = Notifier::new(backend as _);
        assert!(notifier.show("hello", ShowOptions::default()).is_none());
    }

    #[test]
    fn test_unsupported_environment_degrades_everywhere() {
        let backend = Arc::new(MemoryBackend::unsupported());
        let notifier = Notifier::new(backend as _);

        assert!(!notifier.is_supported());
        assert_eq!(notifier.permission(), Permission::Unsupported);
        assert!(notifier.show("hello", ShowOptions::default()).is_none());
    }

    #[test]
    fn test_show_delivers_when_granted() {
        let (notifier, backend) = granted_notifier();
        let active = notifier.show(
            "🚗 Departure reminder",
            ShowOptions {
                body: Some("Leaving soon".to_string()),
                tag: Some("departure-r1".to_string()),
                auto_close: false,
                ..Default::default()
            },
        );

        assert!(active.is_some());
        let delivered = backend.delivered();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].title(), "🚗 Departure reminder");
        assert_eq!(delivered[0].tag(), Some("departure-r1"));
    }

    #[tokio::test]
    async fn test_request_permission_prompts_once() {
        let backend = Arc::new(MemoryBackend::new());
        let notifier = Notifier::new(Arc::clone(&backend) as _);

        assert_eq!(notifier.permission(), Permission::Default);
        assert_eq!(notifier.request_permission().await, Permission::Granted);
        assert_eq!(notifier.permission(), Permission::Granted);
    }

    #[tokio::test]
    async fn test_denied_prompt_outcome_sticks() {
        let backend = Arc::new(MemoryBackend::with_prompt_outcome(Permission::Denied));
        let notifier = Notifier::new(backend as _);

        assert_eq!(notifier.request_permission().await, Permission::Denied);
        // A later prompt does not override a decided state.
        assert_eq!(notifier.request_permission().await, Permission::Denied);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_auto_close_closes_after_delay() {
        let (notifier, backend) = granted_notifier();
        let active = notifier
            .show(
                "closing",
                ShowOptions {
                    auto_close_delay: Duration::from_millis(30),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(!active.is_closed());
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(active.is_closed());
        assert!(backend.delivered()[0].is_closed());
    }

    #[test]
    fn test_click_invokes_handler_with_payload_then_closes() {
        let (notifier, backend) = granted_notifier();
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);

        notifier.show(
            "clickable",
            ShowOptions {
                data: serde_json::json!({"plan_id": "p1"}),
                on_click: Some(Arc::new(move |data| {
                    *sink.lock() = Some(data.clone());
                })),
                auto_close: false,
                ..Default::default()
            },
        );

        let delivered = backend.delivered();
        delivered[0].click();
        assert_eq!(seen.lock().as_ref().unwrap()["plan_id"], "p1");
        assert!(delivered[0].is_closed());
    }

    #[test]
    fn test_show_test_notification_uses_test_tag() {
        let (notifier, backend) = granted_notifier();
        assert!(notifier.show_test_notification().is_some());
        assert_eq!(backend.delivered()[0].tag(), Some("test-notification"));
    }
}
