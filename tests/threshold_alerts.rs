//! Threshold alert flow against a real (in-memory) store.

use weatherwatch::manager_db::{StateStore, DB};
use weatherwatch::manager_summary::models::{SettingsEdit, UserAlertConfig};
use weatherwatch::manager_summary::process_batch;
use weatherwatch::manager_weather::models::CityWeather;
use weatherwatch::unit_conversion::Units;

fn record(city: &str, temp: f64) -> CityWeather {
    CityWeather {
        city: city.to_string(),
        country: "IN".to_string(),
        lat: 28.6667,
        lon: 77.2167,
        temp,
        feels_like: temp - 0.5,
        temp_min: temp - 2.0,
        temp_max: temp + 2.0,
        humidity: 20,
        wind_speed: 3.1,
        condition: "Haze".to_string(),
        icon: "50d".to_string(),
        observed: Default::default(),
        sunrise: Default::default(),
        sunset: Default::default(),
        utc_offset: 19800,
    }
}

fn store_with_watchlist(cities: &[&str]) -> DB {
    let db = DB::open_in_memory().expect("in-memory db");
    let config = UserAlertConfig {
        email: "watcher@example.com".to_string(),
        threshold: 35.0,
        unit: Units::Metric,
        cities: cities.iter().map(|c| c.to_string()).collect(),
        ..Default::default()
    };
    db.save_config(&config).expect("seed config");
    db
}

#[test]
fn first_breach_warns_second_breach_escalates() {
    let db = store_with_watchlist(&["Delhi"]);

    // First batch: Delhi averages 38 °C against a 35 °C threshold.
    let first = process_batch(&db, &[record("Delhi", 38.0)], Units::Metric).expect("first batch");
    assert_eq!(first.breaching, vec!["Delhi".to_string()]);
    assert_eq!(first.exceed_count, 1);
    assert!(!first.notify, "a single breach only warns locally");

    let config = db.load_config();
    assert_eq!(config.consecutive_exceed, 1);
    assert_eq!(config.alerts.len(), 1);
    assert_eq!(config.alerts[0].city, "Delhi");
    assert_eq!(config.alerts[0].count, 1);

    // Second consecutive breach: escalates to mail dispatch.
    let second = process_batch(&db, &[record("Delhi", 38.0)], Units::Metric).expect("second batch");
    assert_eq!(second.exceed_count, 2);
    assert!(second.notify, "the second consecutive breach dispatches mail");
    assert_eq!(second.email, "watcher@example.com");

    let config = db.load_config();
    assert_eq!(config.consecutive_exceed, 2);
    assert_eq!(config.alerts.len(), 1, "the existing record is updated, not duplicated");
    assert_eq!(config.alerts[0].count, 2);
}

#[test]
fn alert_state_survives_a_reload() {
    let db = store_with_watchlist(&[]);

    process_batch(&db, &[record("Delhi", 38.0)], Units::Metric).expect("batch");

    // A fresh read of the blob sees the updated state, so nothing depends on
    // in-process memory.
    let config = db.load_config();
    assert_eq!(config.consecutive_exceed, 1);
    assert_eq!(config.alerts[0].count, 1);

    let history = db.recent_summaries(10).expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].city, "Delhi");
    assert_eq!(history[0].temp_avg, 38.0);
}

#[test]
fn threshold_edit_restarts_escalation() {
    let db = store_with_watchlist(&["Delhi"]);

    let first = process_batch(&db, &[record("Delhi", 38.0)], Units::Metric).expect("first batch");
    assert_eq!(first.exceed_count, 1);

    // The user edits the threshold between batches.
    let mut config = db.load_config();
    config.apply_edit(&SettingsEdit { threshold: Some(30.0), ..Default::default() });
    db.save_config(&config).expect("save edit");
    assert_eq!(db.load_config().consecutive_exceed, 0);

    // The next breach starts over at 1 instead of escalating.
    let second = process_batch(&db, &[record("Delhi", 38.0)], Units::Metric).expect("second batch");
    assert_eq!(second.exceed_count, 1);
    assert!(!second.notify);
}

#[test]
fn imperial_threshold_applies_to_metric_batches() {
    let db = DB::open_in_memory().expect("in-memory db");
    let config = UserAlertConfig {
        threshold: 95.0, // 35 °C
        unit: Units::Imperial,
        ..Default::default()
    };
    db.save_config(&config).expect("seed config");

    let below = process_batch(&db, &[record("Delhi", 34.0)], Units::Metric).expect("batch");
    assert!(below.breaching.is_empty());

    let above = process_batch(&db, &[record("Delhi", 36.0)], Units::Metric).expect("batch");
    assert_eq!(above.breaching, vec!["Delhi".to_string()]);
}

#[test]
fn unwatched_cities_are_recorded_but_never_alert() {
    let db = store_with_watchlist(&["Chennai"]);

    let outcome = process_batch(
        &db,
        &[record("Delhi", 38.0), record("Chennai", 30.0)],
        Units::Metric,
    )
    .expect("batch");

    assert!(outcome.breaching.is_empty());
    assert_eq!(db.load_config().consecutive_exceed, 0);
    // Both summaries still land in the history.
    assert_eq!(db.recent_summaries(10).expect("history").len(), 2);
}
