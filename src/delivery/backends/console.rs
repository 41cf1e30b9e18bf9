//! Log-based delivery backend for headless deployments.
//!
//! Renders notifications to the process log. There is no permission model on
//! this surface, so permission is always granted, the same stance desktop
//! environments take when no prompt exists.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::delivery::backend::{
    DeliveryError, DeliveryRequest, NotificationBackend, NotificationHandle,
};
use crate::models::Permission;

/// [`NotificationBackend`] that writes notifications to the log.
#[derive(Debug, Default)]
pub struct ConsoleBackend;

impl ConsoleBackend {
    pub fn new() -> Self {
        Self
    }
}

struct ConsoleNotification {
    closed: AtomicBool,
}

impl NotificationHandle for ConsoleNotification {
    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl NotificationBackend for ConsoleBackend {
    fn is_supported(&self) -> bool {
        true
    }

    fn permission(&self) -> Permission {
        Permission::Granted
    }

    async fn request_permission(&self) -> Permission {
        Permission::Granted
    }

    fn deliver(
        &self,
        request: DeliveryRequest,
    ) -> Result<Arc<dyn NotificationHandle>, DeliveryError> {
        match &request.body {
            Some(body) => log::info!("notification: {} - {}", request.title, body),
            None => log::info!("notification: {}", request.title),
        }
        Ok(Arc::new(ConsoleNotification {
            closed: AtomicBool::new(false),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_console_backend_is_always_granted() {
        let backend = ConsoleBackend::new();
        assert!(backend.is_supported());
        assert_eq!(backend.permission(), Permission::Granted);
        assert_eq!(backend.request_permission().await, Permission::Granted);
    }

    #[test]
    fn test_deliver_returns_open_handle() {
        let backend = ConsoleBackend::new();
        let handle = backend
            .deliver(DeliveryRequest {
                title: "t".to_string(),
                body: None,
                icon: None,
                tag: None,
                require_interaction: false,
                data: serde_json::Value::Null,
                on_click: None,
            })
            .unwrap();
        assert!(!handle.is_closed());
        handle.close();
        assert!(handle.is_closed());
    }
}
