pub mod models;

use chrono::{Local, Utc};
use log::warn;
use crate::manager_db::errors::DBError;
use crate::manager_db::StateStore;
use crate::manager_summary::models::{AlertRecord, DailySummary, UserAlertConfig};
use crate::manager_weather::models::CityWeather;
use crate::unit_conversion::{convert_temperature, Units};

/// Number of consecutive breaching batches that escalates from a local
/// warning to a mail dispatch
const NOTIFY_AFTER: u32 = 2;

/// Result of evaluating one summary batch against the alert configuration
pub struct Evaluation {
    pub config: UserAlertConfig,
    pub breaching: Vec<String>,
    pub notify: bool,
}

/// Result of processing one weather batch end to end
pub struct Outcome {
    pub summaries: Vec<DailySummary>,
    pub breaching: Vec<String>,
    pub exceed_count: u32,
    pub notify: bool,
    pub email: String,
}

/// Builds one daily summary per weather record
///
/// # Arguments
///
/// * 'records' - normalized weather records, one per city
/// * 'units' - unit system the records were fetched in
pub fn summarize(records: &[CityWeather], units: Units) -> Vec<DailySummary> {
    records.iter().map(|r| city_summary(r, units)).collect()
}

fn city_summary(record: &CityWeather, units: Units) -> DailySummary {
    DailySummary {
        date: Local::now().format("%Y-%m-%d").to_string(),
        city: record.city.clone(),
        temp_avg: (record.temp * 100.0).round() / 100.0,
        temp_max: record.temp_max,
        temp_min: record.temp_min,
        dominant_condition: record.condition.clone(),
        reason: condition_reason(&record.condition).to_string(),
        unit: units.symbol().to_string(),
    }
}

/// Short explanation for a dominant weather condition
pub fn condition_reason(condition: &str) -> &'static str {
    let condition = condition.to_lowercase();
    if condition.contains("rain") {
        "Frequent rainfall observed."
    } else if condition.contains("mist") || condition.contains("haze") {
        "Visibility is reduced due to mist/haze."
    } else if condition.contains("clear") {
        "Clear skies with no significant weather activity."
    } else if condition.contains("cloud") {
        "Overcast or partly cloudy conditions throughout the day."
    } else {
        "Dominant weather condition based on observed data."
    }
}

/// Evaluates one summary batch against the alert configuration.
///
/// A city breaches when it is on the watch list (or the watch list is empty)
/// and its average temperature strictly exceeds the threshold, converted into
/// 'target_unit' at full precision. A batch with at least one breach bumps
/// the consecutive-exceedance counter and upserts one alert record per
/// breaching city; a batch without breaches changes nothing. The counter
/// never decreases here, it only restarts on a settings edit.
///
/// # Arguments
///
/// * 'summaries' - the freshly built summary batch
/// * 'config' - current user alert configuration
/// * 'target_unit' - unit system the summaries were built in
pub fn evaluate(summaries: &[DailySummary], config: &UserAlertConfig, target_unit: Units) -> Evaluation {
    let threshold = convert_temperature(config.threshold, config.unit, target_unit);

    let breaching: Vec<String> = summaries
        .iter()
        .filter(|s| {
            (config.cities.is_empty() || config.cities.iter().any(|c| c == &s.city))
                && s.temp_avg > threshold
        })
        .map(|s| s.city.clone())
        .collect();

    if breaching.is_empty() {
        return Evaluation { config: config.clone(), breaching, notify: false };
    }

    let mut updated = config.clone();
    updated.consecutive_exceed += 1;

    let now = Utc::now().to_rfc3339();
    for city in &breaching {
        match updated.alerts.iter_mut().find(|a| &a.city == city) {
            Some(alert) => {
                alert.count += 1;
                alert.timestamp = now.clone();
            }
            None => updated.alerts.push(AlertRecord {
                city: city.clone(),
                count: 1,
                timestamp: now.clone(),
            }),
        }
    }

    let notify = updated.consecutive_exceed >= NOTIFY_AFTER;
    Evaluation { config: updated, breaching, notify }
}

/// Processes one weather batch: builds summaries, appends them to the
/// history, evaluates thresholds and persists the updated configuration
/// before returning, so a restart cannot lose alert state.
///
/// When the batch breaches but the escalation point is not reached yet, the
/// warning naming the breaching cities is raised here; dispatching mail on
/// escalation is left to the caller.
///
/// # Arguments
///
/// * 'store' - persisted state to read the configuration from and write
///   summaries and alert state back to
/// * 'records' - normalized weather records, one per city
/// * 'units' - unit system the records were fetched in
pub fn process_batch<S: StateStore>(store: &S, records: &[CityWeather], units: Units) -> Result<Outcome, DBError> {
    let summaries = summarize(records, units);
    store.append_summaries(&summaries)?;

    let config = store.load_config();
    let evaluation = evaluate(&summaries, &config, units);

    if !evaluation.breaching.is_empty() {
        store.save_config(&evaluation.config)?;

        if !evaluation.notify {
            warn!(
                "temperature exceeded in {}. Exceedance count: {}",
                evaluation.breaching.join(", "),
                evaluation.config.consecutive_exceed
            );
        }
    }

    Ok(Outcome {
        summaries,
        breaching: evaluation.breaching,
        exceed_count: evaluation.config.consecutive_exceed,
        notify: evaluation.notify,
        email: evaluation.config.email,
    })
}
