//! Raw Observation - categorical driving conditions as entered
//!
//! No enumeration is enforced here. Any string is accepted; only values that
//! have a schema column produce a set indicator.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The four categorical inputs, keyed by their training column prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalField {
    TimeOfDay,
    Area,
    Weather,
    RoadType,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 4] = [
        CategoricalField::TimeOfDay,
        CategoricalField::Area,
        CategoricalField::Weather,
        CategoricalField::RoadType,
    ];

    /// Column name used in the training frame.
    /// Indicator columns are `<prefix>_<value>`.
    pub fn column_prefix(&self) -> &'static str {
        match self {
            CategoricalField::TimeOfDay => "Time of Day",
            CategoricalField::Area => "Urban/Rural",
            CategoricalField::Weather => "Weather Conditions",
            CategoricalField::RoadType => "Road Type",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column_prefix() == prefix)
    }

    /// Candidate indicator column for a value
    pub fn indicator_column(&self, value: &str) -> String {
        format!("{}_{}", self.column_prefix(), value)
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_prefix())
    }
}

/// One request's worth of input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    pub time_of_day: String,
    pub area: String,
    pub weather: String,
    pub road_type: String,

    /// Values for passthrough numeric columns, by column name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub numeric: BTreeMap<String, f64>,
}

impl RawObservation {
    pub fn new(
        time_of_day: impl Into<String>,
        area: impl Into<String>,
        weather: impl Into<String>,
        road_type: impl Into<String>,
    ) -> Self {
        Self {
            time_of_day: time_of_day.into(),
            area: area.into(),
            weather: weather.into(),
            road_type: road_type.into(),
            numeric: BTreeMap::new(),
        }
    }

    pub fn with_numeric(mut self, column: impl Into<String>, value: f64) -> Self {
        self.numeric.insert(column.into(), value);
        self
    }

    /// Strip surrounding whitespace from the categorical values
    pub fn trimmed(self) -> Self {
        Self {
            time_of_day: self.time_of_day.trim().to_string(),
            area: self.area.trim().to_string(),
            weather: self.weather.trim().to_string(),
            road_type: self.road_type.trim().to_string(),
            numeric: self.numeric,
        }
    }

    pub fn value(&self, field: CategoricalField) -> &str {
        match field {
            CategoricalField::TimeOfDay => &self.time_of_day,
            CategoricalField::Area => &self.area,
            CategoricalField::Weather => &self.weather,
            CategoricalField::RoadType => &self.road_type,
        }
    }
}
