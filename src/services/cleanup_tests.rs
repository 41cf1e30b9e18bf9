use super::*;
use crate::delivery::ShowOptions;
use crate::models::{NotificationStatus, ScheduledNotification};
use crate::scheduler::NotificationRequest;
use crate::store::MemoryStore;
use chrono::{DateTime, Duration as ChronoDuration};
use std::sync::Arc;
use std::time::Duration;

fn registry() -> ScheduledNotificationStore {
    ScheduledNotificationStore::new(Arc::new(MemoryStore::new()))
}

fn silent_scheduler() -> TimerScheduler {
    TimerScheduler::new(Arc::new(|_id, _request| {}))
}

fn record(
    id: &str,
    route: Option<&str>,
    plan: Option<&str>,
    kind: NotificationKind,
    created_at: DateTime<Utc>,
    scheduled_time: DateTime<Utc>,
) -> ScheduledNotification {
    ScheduledNotification {
        id: id.to_string(),
        title: format!("title-{id}"),
        body: "body".to_string(),
        scheduled_time,
        kind,
        route_id: route.map(str::to_string),
        plan_id: plan.map(str::to_string),
        status: NotificationStatus::Scheduled,
        created_at,
        updated_at: None,
    }
}

fn arm(scheduler: &TimerScheduler, id: &str) {
    scheduler.schedule(
        NotificationRequest {
            title: id.to_string(),
            options: ShowOptions::default(),
        },
        Duration::from_secs(60),
        id,
    );
}

#[tokio::test]
async fn test_duplicates_keep_newest_per_route_and_kind() {
    let registry = registry();
    let scheduler = silent_scheduler();
    let now = Utc::now();
    let future = now + ChronoDuration::hours(1);

    registry.replace_all(vec![
        record("old", Some("r1"), None, NotificationKind::Departure, now - ChronoDuration::minutes(3), future),
        record("mid", Some("r1"), None, NotificationKind::Departure, now - ChronoDuration::minutes(2), future),
        record("new", Some("r1"), None, NotificationKind::Departure, now - ChronoDuration::minutes(1), future),
        record("weather", Some("r1"), None, NotificationKind::Weather, now - ChronoDuration::minutes(5), future),
        record("other-route", Some("r2"), None, NotificationKind::Departure, now - ChronoDuration::minutes(5), future),
    ]);

    let removed = cleanup_duplicates(&registry, &scheduler, None);
    assert_eq!(removed, 2);

    let mut remaining: Vec<String> = registry.list(None).into_iter().map(|n| n.id).collect();
    remaining.sort();
    assert_eq!(remaining, ["new", "other-route", "weather"]);
}

#[tokio::test]
async fn test_duplicate_pass_cancels_stale_timers() {
    let registry = registry();
    let scheduler = silent_scheduler();
    let now = Utc::now();
    let future = now + ChronoDuration::hours(1);

    registry.replace_all(vec![
        record("a", Some("r1"), None, NotificationKind::Departure, now - ChronoDuration::minutes(2), future),
        record("b", Some("r1"), None, NotificationKind::Departure, now - ChronoDuration::minutes(1), future),
    ]);
    arm(&scheduler, "a");
    arm(&scheduler, "b");

    assert_eq!(cleanup_duplicates(&registry, &scheduler, None), 1);
    // Only the survivor's timer remains armed.
    assert_eq!(scheduler.len(), 1);
    assert_eq!(scheduler.active()[0].id, "b");
}

#[tokio::test]
async fn test_duplicates_scoped_to_plan() {
    let registry = registry();
    let scheduler = silent_scheduler();
    let now = Utc::now();
    let future = now + ChronoDuration::hours(1);

    registry.replace_all(vec![
        record("p1-old", Some("r1"), Some("p1"), NotificationKind::Departure, now - ChronoDuration::minutes(2), future),
        record("p1-new", Some("r1"), Some("p1"), NotificationKind::Departure, now - ChronoDuration::minutes(1), future),
        record("p2-old", Some("r1"), Some("p2"), NotificationKind::Departure, now - ChronoDuration::minutes(2), future),
        record("p2-new", Some("r1"), Some("p2"), NotificationKind::Departure, now - ChronoDuration::minutes(1), future),
    ]);

    assert_eq!(cleanup_duplicates(&registry, &scheduler, Some("p1")), 1);

    let mut remaining: Vec<String> = registry.list(None).into_iter().map(|n| n.id).collect();
    remaining.sort();
    // The other plan's duplicates are untouched.
    assert_eq!(remaining, ["p1-new", "p2-new", "p2-old"]);
}

#[tokio::test]
async fn test_sequential_saves_dedup_to_latest() {
    // The registry stamps created_at itself; two saves in sequence must
    // resolve to the second one.
    let registry = registry();
    let scheduler = silent_scheduler();
    let future = Utc::now() + ChronoDuration::hours(1);

    registry.save(crate::models::NewScheduledNotification {
        id: Some("n1".to_string()),
        title: "first".to_string(),
        body: String::new(),
        scheduled_time: future,
        kind: NotificationKind::Departure,
        route_id: Some("r1".to_string()),
        plan_id: None,
    });
    tokio::time::sleep(Duration::from_millis(5)).await;
    registry.save(crate::models::NewScheduledNotification {
        id: Some("n2".to_string()),
        title: "second".to_string(),
        body: String::new(),
        scheduled_time: future,
        kind: NotificationKind::Departure,
        route_id: Some("r1".to_string()),
        plan_id: None,
    });

    assert_eq!(cleanup_duplicates(&registry, &scheduler, None), 1);
    let remaining = registry.list(None);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, "n2");
}

#[tokio::test]
async fn test_expired_records_are_pruned() {
    let registry = registry();
    let scheduler = silent_scheduler();
    let now = Utc::now();

    registry.replace_all(vec![
        record("past", Some("r1"), None, NotificationKind::Departure, now, now - ChronoDuration::minutes(10)),
        record("future", Some("r2"), None, NotificationKind::Departure, now, now + ChronoDuration::minutes(10)),
    ]);
    arm(&scheduler, "past");
    arm(&scheduler, "future");

    assert_eq!(cleanup_expired(&registry, &scheduler, None), 1);

    let remaining = registry.list(None);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, "future");
    // The pruned record's timer is gone, the survivor's is not.
    assert_eq!(scheduler.len(), 1);
    assert_eq!(scheduler.active()[0].id, "future");
}

#[tokio::test]
async fn test_expired_prunes_regardless_of_status() {
    let registry = registry();
    let scheduler = silent_scheduler();
    let now = Utc::now();

    let mut fired = record(
        "fired",
        Some("r1"),
        None,
        NotificationKind::Departure,
        now,
        now - ChronoDuration::minutes(1),
    );
    fired.status = NotificationStatus::Fired;
    registry.replace_all(vec![fired]);

    assert_eq!(cleanup_expired(&registry, &scheduler, None), 1);
    assert!(registry.list(None).is_empty());
}

#[tokio::test]
async fn test_cleanup_all_reports_both_passes() {
    let registry = registry();
    let scheduler = silent_scheduler();
    let now = Utc::now();
    let future = now + ChronoDuration::hours(1);

    registry.replace_all(vec![
        record("dup-old", Some("r1"), None, NotificationKind::Departure, now - ChronoDuration::minutes(2), future),
        record("dup-new", Some("r1"), None, NotificationKind::Departure, now - ChronoDuration::minutes(1), future),
        record("expired", Some("r2"), None, NotificationKind::Departure, now, now - ChronoDuration::minutes(1)),
    ]);

    let report = cleanup_all(&registry, &scheduler, None);
    assert_eq!(report.duplicates_removed, 1);
    assert_eq!(report.expired_removed, 1);
    assert_eq!(report.total(), 2);
    assert_eq!(registry.list(None).len(), 1);
}

#[tokio::test]
async fn test_cleanup_on_empty_registry_is_zero() {
    let registry = registry();
    let scheduler = silent_scheduler();
    assert_eq!(cleanup_all(&registry, &scheduler, None), CleanupReport::default());
}
