//! Condition definitions and the records they produce

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from parsing condition and action names
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("unknown state: {0}")]
    UnknownState(String),

    #[error("unknown state id: {0}")]
    UnknownId(u32),

    #[error("unknown action: {0} (expected water or light)")]
    UnknownAction(String),
}

/// The five canned plant conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Healthy,
    LightDeprived,
    Dehydrated,
    Stressed,
    Overwatered,
}

impl Condition {
    pub const ALL: [Condition; 5] = [
        Condition::Healthy,
        Condition::LightDeprived,
        Condition::Dehydrated,
        Condition::Stressed,
        Condition::Overwatered,
    ];

    /// Stable numeric id (1-5)
    pub fn id(self) -> u32 {
        match self {
            Condition::Healthy => 1,
            Condition::LightDeprived => 2,
            Condition::Dehydrated => 3,
            Condition::Stressed => 4,
            Condition::Overwatered => 5,
        }
    }

    pub fn from_id(id: u32) -> Result<Self, StateError> {
        Self::ALL
            .into_iter()
            .find(|c| c.id() == id)
            .ok_or(StateError::UnknownId(id))
    }

    /// Soil moisture percentage
    pub fn moisture(self) -> f32 {
        match self {
            Condition::Healthy => 65.0,
            Condition::LightDeprived => 60.0,
            Condition::Dehydrated => 25.0,
            Condition::Stressed => 20.0,
            Condition::Overwatered => 90.0,
        }
    }

    /// Light level in lux
    pub fn light(self) -> f32 {
        match self {
            Condition::Healthy => 800.0,
            Condition::LightDeprived => 150.0,
            Condition::Dehydrated => 700.0,
            Condition::Stressed => 100.0,
            Condition::Overwatered => 600.0,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Condition::Healthy => "Optimal conditions",
            Condition::LightDeprived => "Needs more light",
            Condition::Dehydrated => "Needs watering",
            Condition::Stressed => "Needs both water and light",
            Condition::Overwatered => "Too much water",
        }
    }

    /// snake_case name, as serialized
    pub fn name(self) -> &'static str {
        match self {
            Condition::Healthy => "healthy",
            Condition::LightDeprived => "light_deprived",
            Condition::Dehydrated => "dehydrated",
            Condition::Stressed => "stressed",
            Condition::Overwatered => "overwatered",
        }
    }

    /// Snapshot of this condition at `timestamp_ms`
    pub fn record(self, timestamp_ms: u64) -> StateRecord {
        StateRecord {
            id: self.id(),
            state: self,
            moisture: self.moisture(),
            light: self.light(),
            description: self.description().to_string(),
            timestamp_ms,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Condition {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| StateError::UnknownState(s.to_string()))
    }
}

/// A condition as observed at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    pub id: u32,
    pub state: Condition,
    pub moisture: f32,
    pub light: f32,
    pub description: String,
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: u64,
}
