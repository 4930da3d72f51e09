use serde::{Deserialize, Serialize};
use crate::unit_conversion::Units;

const DEFAULT_THRESHOLD: f64 = 35.0;

/// Daily rollup for one city, appended to the persisted history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: String,
    pub city: String,
    pub temp_avg: f64,
    pub temp_max: f64,
    pub temp_min: f64,
    pub dominant_condition: String,
    pub reason: String,
    pub unit: String,
}

/// One alert bookkeeping entry per breaching city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub city: String,
    pub count: u32,
    pub timestamp: String,
}

/// The single persisted user alert configuration.
///
/// An empty watch list means every polled city is watched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAlertConfig {
    pub email: String,
    pub threshold: f64,
    pub unit: Units,
    pub cities: Vec<String>,
    pub consecutive_exceed: u32,
    pub alerts: Vec<AlertRecord>,
}

impl Default for UserAlertConfig {
    fn default() -> Self {
        UserAlertConfig {
            email: String::new(),
            threshold: DEFAULT_THRESHOLD,
            unit: Units::Metric,
            cities: Vec::new(),
            consecutive_exceed: 0,
            alerts: Vec::new(),
        }
    }
}

/// A settings update submitted by the user, all fields optional
#[derive(Debug, Default, Deserialize)]
pub struct SettingsEdit {
    pub email: Option<String>,
    pub threshold: Option<f64>,
    pub unit: Option<Units>,
    pub add_city: Option<String>,
}

impl UserAlertConfig {
    /// Applies a settings edit.
    ///
    /// Changing threshold, unit or email restarts the consecutive-exceedance
    /// tracking. Adding a watch-list city does not, and duplicate or blank
    /// city names are ignored.
    pub fn apply_edit(&mut self, edit: &SettingsEdit) {
        let mut edited = false;

        if let Some(email) = &edit.email {
            self.email = email.clone();
            edited = true;
        }
        if let Some(threshold) = edit.threshold {
            self.threshold = threshold;
            edited = true;
        }
        if let Some(unit) = edit.unit {
            self.unit = unit;
            edited = true;
        }
        if edited {
            self.consecutive_exceed = 0;
        }

        if let Some(city) = &edit.add_city {
            let city = city.trim();
            if !city.is_empty() && !self.cities.iter().any(|c| c == city) {
                self.cities.push(city.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_edit_resets_exceed_counter() {
        let mut config = UserAlertConfig { consecutive_exceed: 4, ..Default::default() };

        config.apply_edit(&SettingsEdit { threshold: Some(40.0), ..Default::default() });

        assert_eq!(config.threshold, 40.0);
        assert_eq!(config.consecutive_exceed, 0);
    }

    #[test]
    fn test_unit_and_email_edits_reset_exceed_counter() {
        let mut config = UserAlertConfig { consecutive_exceed: 2, ..Default::default() };
        config.apply_edit(&SettingsEdit { unit: Some(Units::Imperial), ..Default::default() });
        assert_eq!(config.consecutive_exceed, 0);

        config.consecutive_exceed = 3;
        config.apply_edit(&SettingsEdit { email: Some("a@b.com".to_string()), ..Default::default() });
        assert_eq!(config.consecutive_exceed, 0);
    }

    #[test]
    fn test_adding_city_keeps_exceed_counter() {
        let mut config = UserAlertConfig { consecutive_exceed: 1, ..Default::default() };

        config.apply_edit(&SettingsEdit { add_city: Some("Delhi".to_string()), ..Default::default() });

        assert_eq!(config.cities, vec!["Delhi".to_string()]);
        assert_eq!(config.consecutive_exceed, 1);
    }

    #[test]
    fn test_duplicate_or_blank_city_is_ignored() {
        let mut config = UserAlertConfig::default();

        config.apply_edit(&SettingsEdit { add_city: Some(" Delhi ".to_string()), ..Default::default() });
        config.apply_edit(&SettingsEdit { add_city: Some("Delhi".to_string()), ..Default::default() });
        config.apply_edit(&SettingsEdit { add_city: Some("   ".to_string()), ..Default::default() });

        assert_eq!(config.cities, vec!["Delhi".to_string()]);
    }
}
