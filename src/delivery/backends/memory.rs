//! In-memory delivery backend for unit testing.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::delivery::backend::{
    DeliveryError, DeliveryRequest, NotificationBackend, NotificationHandle,
};
use crate::models::Permission;

/// A delivered notification held by the [`MemoryBackend`]. Exposes test
/// helpers to inspect the request and to simulate a user click.
pub struct MemoryNotification {
    request: DeliveryRequest,
    closed: AtomicBool,
}

impl MemoryNotification {
    pub fn title(&self) -> &str {
        &self.request.title
    }

    pub fn body(&self) -> Option<&str> {
        self.request.body.as_deref()
    }

    pub fn tag(&self) -> Option<&str> {
        self.request.tag.as_deref()
    }

    pub fn data(&self) -> &serde_json::Value {
        &self.request.data
    }

    /// Simulate a user click: invoke the click handler with the attached
    /// payload, then close the notification (the surface's click contract).
    pub fn click(&self) {
        if let Some(on_click) = &self.request.on_click {
            on_click(&self.request.data);
        }
        self.close();
    }
}

impl NotificationHandle for MemoryNotification {
    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// In-memory [`NotificationBackend`] that records every delivery.
pub struct MemoryBackend {
    supported: bool,
    permission: RwLock<Permission>,
    /// What `request_permission` resolves to.
    prompt_outcome: Permission,
    delivered: RwLock<Vec<Arc<MemoryNotification>>>,
}

impl MemoryBackend {
    /// Backend in the initial `default` permission state; prompting grants.
    pub fn new() -> Self {
        Self {
            supported: true,
            permission: RwLock::new(Permission::Default),
            prompt_outcome: Permission::Granted,
            delivered: RwLock::new(Vec::new()),
        }
    }

    /// Backend already in the given permission state.
    pub fn with_permission(permission: Permission) -> Self {
        Self {
            permission: RwLock::new(permission),
            ..Self::new()
        }
    }

    /// Backend that reports an unsupported environment.
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }

    /// Backend whose permission prompt resolves to `outcome`.
    pub fn with_prompt_outcome(outcome: Permission) -> Self {
        Self {
            prompt_outcome: outcome,
            ..Self::new()
        }
    }

    /// Snapshot of every delivered notification, in delivery order.
    pub fn delivered(&self) -> Vec<Arc<MemoryNotification>> {
        self.delivered.read().clone()
    }

    /// Number of deliveries so far.
    pub fn delivered_count(&self) -> usize {
        self.delivered.read().len()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl NotificationBackend for MemoryBackend {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn permission(&self) -> Permission {
        if !self.supported {
            return Permission::Unsupported;
        }
        *self.permission.read()
    }

    async fn request_permission(&self) -> Permission {
        if !self.supported {
            return Permission::Unsupported;
        }
        let mut permission = self.permission.write();
        // The prompt only changes an undecided state, as the platform would.
        if *permission == Permission::Default {
            *permission = self.prompt_outcome;
        }
        *permission
    }

    fn deliver(
        &self,
        request: DeliveryRequest,
    ) -> Result<Arc<dyn NotificationHandle>, DeliveryError> {
        if !self.supported {
            return Err(DeliveryError::Unsupported);
        }
        let notification = Arc::new(MemoryNotification {
            request,
            closed: AtomicBool::new(false),
        });
        self.delivered.write().push(Arc::clone(&notification));
        Ok(notification)
    }
}
