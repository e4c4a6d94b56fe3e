use serde::{Deserialize, Serialize};
use std::fmt;

/// Health tier of an index value, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityTier {
    Good,
    Moderate,
    UnhealthyForSensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

/// Display color of a tier, carried in every [`IndexResult`] for charts
/// and map markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierColor {
    Green,
    Yellow,
    Orange,
    Red,
    Purple,
    Maroon,
}

impl SeverityTier {
    pub fn label(&self) -> &'static str {
        match self {
            SeverityTier::Good => "Good",
            SeverityTier::Moderate => "Moderate",
            SeverityTier::UnhealthyForSensitive => "Unhealthy for Sensitive",
            SeverityTier::Unhealthy => "Unhealthy",
            SeverityTier::VeryUnhealthy => "Very Unhealthy",
            SeverityTier::Hazardous => "Hazardous",
        }
    }

    pub fn identifier(&self) -> &'static str {
        match self {
            SeverityTier::Good => "good",
            SeverityTier::Moderate => "moderate",
            SeverityTier::UnhealthyForSensitive => "unhealthy_for_sensitive",
            SeverityTier::Unhealthy => "unhealthy",
            SeverityTier::VeryUnhealthy => "very_unhealthy",
            SeverityTier::Hazardous => "hazardous",
        }
    }

    pub fn color(&self) -> TierColor {
        match self {
            SeverityTier::Good => TierColor::Green,
            SeverityTier::Moderate => TierColor::Yellow,
            SeverityTier::UnhealthyForSensitive => TierColor::Orange,
            SeverityTier::Unhealthy => TierColor::Red,
            SeverityTier::VeryUnhealthy => TierColor::Purple,
            SeverityTier::Hazardous => TierColor::Maroon,
        }
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexResult {
    pub index: u16,
    pub category: String,
    pub tier: SeverityTier,
    pub color: TierColor,
}

impl IndexResult {
    pub fn new(index: u16, tier: SeverityTier) -> Self {
        Self {
            index,
            category: tier.label().to_string(),
            tier,
            color: tier.color(),
        }
    }

    pub fn summary(&self) -> String {
        format!("AQI {} ({})", self.index, self.category)
    }
}
