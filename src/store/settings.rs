//! Persisted notification preferences.
//!
//! One JSON document holds the global settings plus per-plan and per-route
//! override patches. Reads merge with defaults so documents written by older
//! versions (or hand-edited ones with missing fields) stay readable. Lookup
//! precedence for an effective value: route patch, then plan patch, then the
//! global settings.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::Permission;

use super::kv::{self, keys, KeyValueStore};

/// User notification preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub enabled: bool,
    pub departure_reminder: bool,
    /// Lead time for departure reminders, in minutes.
    pub minutes_before: u32,
    pub traffic_updates: bool,
    pub weather_alerts: bool,
    pub sound: bool,
    pub vibrate: bool,
    pub auto_close: bool,
    pub auto_close_delay_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            departure_reminder: true,
            minutes_before: 30,
            traffic_updates: false,
            weather_alerts: false,
            sound: true,
            vibrate: true,
            auto_close: true,
            auto_close_delay_ms: 5000,
            last_updated: None,
        }
    }
}

/// Partial settings override stored per plan or per route. Absent fields
/// inherit from the layer below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_reminder: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes_before: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traffic_updates: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_alerts: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vibrate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_close: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_close_delay_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl SettingsPatch {
    /// Apply this patch on top of `base`.
    pub fn apply(&self, base: &NotificationSettings) -> NotificationSettings {
        NotificationSettings {
            enabled: self.enabled.unwrap_or(base.enabled),
            departure_reminder: self.departure_reminder.unwrap_or(base.departure_reminder),
            minutes_before: self.minutes_before.unwrap_or(base.minutes_before),
            traffic_updates: self.traffic_updates.unwrap_or(base.traffic_updates),
            weather_alerts: self.weather_alerts.unwrap_or(base.weather_alerts),
            sound: self.sound.unwrap_or(base.sound),
            vibrate: self.vibrate.unwrap_or(base.vibrate),
            auto_close: self.auto_close.unwrap_or(base.auto_close),
            auto_close_delay_ms: self.auto_close_delay_ms.unwrap_or(base.auto_close_delay_ms),
            last_updated: self.last_updated.or(base.last_updated),
        }
    }
}

/// Last-known permission status, persisted so the UI can render the state
/// without prompting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionStatus {
    pub status: Permission,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<DateTime<Utc>>,
}

impl Default for PermissionStatus {
    fn default() -> Self {
        Self {
            status: Permission::Default,
            last_checked: None,
        }
    }
}

/// On-disk shape: global settings at the top level, patches nested under
/// `plans` and `routes`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct SettingsDocument {
    #[serde(flatten)]
    global: NotificationSettings,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    plans: HashMap<String, SettingsPatch>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    routes: HashMap<String, SettingsPatch>,
}

/// Store for notification preferences and the persisted permission status.
pub struct SettingsStore {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl SettingsStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Global settings, merged with defaults.
    pub fn global(&self) -> NotificationSettings {
        self.load().global
    }

    /// Save the global settings, stamping `last_updated`. Per-plan and
    /// per-route patches are preserved.
    pub fn save_global(&self, mut settings: NotificationSettings) -> bool {
        settings.last_updated = Some(Utc::now());

        let _guard = self.write_lock.lock();
        let mut doc = self.load();
        doc.global = settings;
        self.persist(&doc)
    }

    /// Effective settings for a plan: global overlaid with the plan patch.
    pub fn plan(&self, plan_id: &str) -> NotificationSettings {
        let doc = self.load();
        match doc.plans.get(plan_id) {
            Some(patch) => patch.apply(&doc.global),
            None => doc.global.clone(),
        }
    }

    /// Store a per-plan override patch, stamping `last_updated`.
    pub fn save_plan(&self, plan_id: &str, mut patch: SettingsPatch) -> bool {
        patch.last_updated = Some(Utc::now());

        let _guard = self.write_lock.lock();
        let mut doc = self.load();
        doc.plans.insert(plan_id.to_string(), patch);
        self.persist(&doc)
    }

    /// Effective settings for a route: the plan (or global) settings overlaid
    /// with the route patch.
    pub fn route(&self, route_id: &str, plan_id: Option<&str>) -> NotificationSettings {
        let doc = self.load();
        let base = match plan_id.and_then(|plan| doc.plans.get(plan)) {
            Some(patch) => patch.apply(&doc.global),
            None => doc.global.clone(),
        };
        match doc.routes.get(route_id) {
            Some(patch) => patch.apply(&base),
            None => base,
        }
    }

    /// Store a per-route override patch, stamping `last_updated`.
    pub fn save_route(&self, route_id: &str, mut patch: SettingsPatch) -> bool {
        patch.last_updated = Some(Utc::now());

        let _guard = self.write_lock.lock();
        let mut doc = self.load();
        doc.routes.insert(route_id.to_string(), patch);
        self.persist(&doc)
    }

    /// Last persisted permission status, defaulting to `default`/never
    /// checked.
    pub fn permission_status(&self) -> PermissionStatus {
        kv::get_or(
            self.store.as_ref(),
            keys::PERMISSION,
            PermissionStatus::default(),
        )
    }

    /// Persist the current permission status with a `last_checked` stamp.
    pub fn save_permission_status(&self, status: Permission) -> bool {
        kv::set(
            self.store.as_ref(),
            keys::PERMISSION,
            &PermissionStatus {
                status,
                last_checked: Some(Utc::now()),
            },
        )
    }

    /// Clear settings, the scheduled-notification collection and the
    /// permission status in one pass.
    pub fn reset_all(&self) -> bool {
        let _guard = self.write_lock.lock();
        let a = kv::clear(self.store.as_ref(), keys::SETTINGS);
        let b = kv::clear(self.store.as_ref(), keys::SCHEDULED);
        let c = kv::clear(self.store.as_ref(), keys::PERMISSION);
        a && b && c
    }

    fn load(&self) -> SettingsDocument {
        kv::get_or(self.store.as_ref(), keys::SETTINGS, SettingsDocument::default())
    }

    fn persist(&self, doc: &SettingsDocument) -> bool {
        kv::set(self.store.as_ref(), keys::SETTINGS, doc)
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod settings_tests;
