//! # Trip Reminders
//!
//! Departure-reminder engine for a travel-planning application.
//!
//! This crate schedules "time to leave" notifications ahead of a trip's
//! departure time, keeps a durable registry of scheduled notifications that
//! survives process restarts, deduplicates and expires stale entries, and
//! records delivered notifications in a local inbox. An optional axum REST
//! API exposes the engine to a frontend.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Notification records, kind presets, fire-time computation
//! - [`store`]: Durable key-value storage, registry, settings and inbox
//! - [`scheduler`]: In-memory one-shot timers keyed by notification id
//! - [`delivery`]: Platform notification surface behind a backend trait
//! - [`services`]: The reminder flow, cleanup passes and reconciliation
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! ## Two sources of truth
//!
//! A live reminder is a persisted registry record *plus* an armed in-memory
//! timer. Timers do not survive a restart; the service layer's
//! [`services::ReminderService::rearm_pending`] re-arms eligible records at
//! startup, and the expiry pass collects records whose fire time passed while
//! the process was down.

pub mod delivery;
pub mod models;
pub mod scheduler;
pub mod services;
pub mod store;

#[cfg(feature = "http-server")]
pub mod http;
