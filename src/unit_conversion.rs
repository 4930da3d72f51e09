use serde::{Deserialize, Serialize};

/// Active unit system, matching the weather provider's units parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    /// Value used for the provider's units query parameter
    pub fn query_value(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    /// Display symbol for temperatures in this unit system
    pub fn symbol(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }
}

/// Converts a temperature value between unit systems.
///
/// The conversion keeps full precision so that threshold comparisons are not
/// distorted by rounding.
///
/// # Arguments
///
/// * 'value' - temperature value in the source unit system
/// * 'from' - source unit system
/// * 'to' - target unit system
pub fn convert_temperature(value: f64, from: Units, to: Units) -> f64 {
    if from == to {
        return value;
    }
    match from {
        Units::Metric => value * 9.0 / 5.0 + 32.0,
        Units::Imperial => (value - 32.0) * 5.0 / 9.0,
    }
}
