use super::*;
use chrono::TimeZone;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

#[test]
fn test_past_departure_is_refused() {
    let now = fixed_now();
    let timing = calculate_at(now - ChronoDuration::minutes(1), 30, now);

    assert!(timing.is_in_past);
    assert!(!timing.is_immediate);
    assert_eq!(timing.notification_time, None);
    assert_eq!(timing.delay, Duration::ZERO);
}

#[test]
fn test_departure_exactly_now_is_refused() {
    let now = fixed_now();
    let timing = calculate_at(now, 30, now);
    assert!(timing.is_in_past);
}

#[test]
fn test_elapsed_lead_time_falls_back_to_immediate() {
    // Departure in 10 minutes, reminder requested 30 minutes ahead: the
    // regular fire time passed 20 minutes ago.
    let now = fixed_now();
    let timing = calculate_at(now + ChronoDuration::minutes(10), 30, now);

    assert!(!timing.is_in_past);
    assert!(timing.is_immediate);
    assert_eq!(timing.delay, IMMEDIATE_FALLBACK_DELAY);
    assert_eq!(
        timing.notification_time,
        Some(now + ChronoDuration::seconds(2))
    );
}

#[test]
fn test_five_minute_departure_with_thirty_minute_lead() {
    let now = fixed_now();
    let timing = calculate_at(now + ChronoDuration::minutes(5), 30, now);

    assert!(!timing.is_in_past);
    assert!(timing.is_immediate);
    assert_eq!(timing.delay, Duration::from_secs(2));
}

#[test]
fn test_future_lead_time_fires_at_departure_minus_lead() {
    let now = fixed_now();
    let departure = now + ChronoDuration::hours(2);
    let timing = calculate_at(departure, 30, now);

    assert!(!timing.is_in_past);
    assert!(!timing.is_immediate);
    assert_eq!(
        timing.notification_time,
        Some(departure - ChronoDuration::minutes(30))
    );
    assert_eq!(timing.delay, Duration::from_secs(90 * 60));
}

#[test]
fn test_zero_lead_time_fires_at_departure() {
    let now = fixed_now();
    let departure = now + ChronoDuration::minutes(45);
    let timing = calculate_at(departure, 0, now);

    assert_eq!(timing.notification_time, Some(departure));
    assert!(!timing.is_immediate);
}

#[test]
fn test_calculate_against_real_clock() {
    let timing = calculate(Utc::now() + ChronoDuration::minutes(10), 30);
    assert!(timing.is_immediate);
    // The fallback delay is a constant, not a clock-derived value.
    assert_eq!(timing.delay, Duration::from_secs(2));
}

#[test]
fn test_validate_accepts_reasonable_settings() {
    let outcome = validate_reminder_settings(30, Some(Utc::now() + ChronoDuration::hours(1)));
    assert!(outcome.is_valid());
    assert!(outcome.errors.is_empty());
}

#[test]
fn test_validate_rejects_oversized_lead_time() {
    let outcome = validate_reminder_settings(MAX_LEAD_MINUTES + 1, None);
    assert!(!outcome.is_valid());
    assert_eq!(outcome.errors.len(), 1);
}

#[test]
fn test_validate_rejects_past_departure() {
    let outcome = validate_reminder_settings(30, Some(Utc::now() - ChronoDuration::minutes(5)));
    assert!(!outcome.is_valid());
    assert!(outcome.errors[0].contains("past"));
}

#[test]
fn test_validate_collects_every_error() {
    let outcome =
        validate_reminder_settings(9999, Some(Utc::now() - ChronoDuration::minutes(5)));
    assert_eq!(outcome.errors.len(), 2);
}

#[test]
fn test_format_fire_time() {
    let time = Utc.with_ymd_and_hms(2025, 8, 6, 14, 30, 0).unwrap();
    assert_eq!(format_fire_time(time), "Aug 6, 02:30 PM");
}
