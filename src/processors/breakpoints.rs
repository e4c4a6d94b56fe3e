//! Concentration-to-index breakpoint tables.
//!
//! One immutable table per [`PollutantKind`], six tiers each, ascending and
//! non-overlapping. Consecutive tiers leave a small gap between one tier's
//! `c_high` and the next tier's `c_low` (e.g. 35.4 / 35.5 for PM2.5); see
//! [`IndexMapper`](crate::processors::IndexMapper) for how values in a gap
//! are mapped.

use crate::models::{PollutantKind, SeverityTier};

use SeverityTier::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub c_low: f64,
    pub c_high: f64,
    pub i_low: u16,
    pub i_high: u16,
    pub tier: SeverityTier,
}

impl Breakpoint {
    const fn new(c_low: f64, c_high: f64, i_low: u16, i_high: u16, tier: SeverityTier) -> Self {
        Self {
            c_low,
            c_high,
            i_low,
            i_high,
            tier,
        }
    }

    pub fn contains(&self, concentration: f64) -> bool {
        self.c_low <= concentration && concentration <= self.c_high
    }

    pub fn category(&self) -> &'static str {
        self.tier.label()
    }
}

static PM25_BREAKPOINTS: [Breakpoint; 6] = [
    Breakpoint::new(0.0, 12.0, 0, 50, Good),
    Breakpoint::new(12.1, 35.4, 51, 100, Moderate),
    Breakpoint::new(35.5, 55.4, 101, 150, UnhealthyForSensitive),
    Breakpoint::new(55.5, 150.4, 151, 200, Unhealthy),
    Breakpoint::new(150.5, 250.4, 201, 300, VeryUnhealthy),
    Breakpoint::new(250.5, 500.4, 301, 500, Hazardous),
];

static PM10_BREAKPOINTS: [Breakpoint; 6] = [
    Breakpoint::new(0.0, 54.0, 0, 50, Good),
    Breakpoint::new(55.0, 154.0, 51, 100, Moderate),
    Breakpoint::new(155.0, 254.0, 101, 150, UnhealthyForSensitive),
    Breakpoint::new(255.0, 354.0, 151, 200, Unhealthy),
    Breakpoint::new(355.0, 424.0, 201, 300, VeryUnhealthy),
    Breakpoint::new(425.0, 604.0, 301, 500, Hazardous),
];

// Simplified µg/m³ proxy; the regulatory O3 scale is ppm over 8 hours.
static O3_BREAKPOINTS: [Breakpoint; 6] = [
    Breakpoint::new(0.0, 100.0, 0, 50, Good),
    Breakpoint::new(101.0, 160.0, 51, 100, Moderate),
    Breakpoint::new(161.0, 214.0, 101, 150, UnhealthyForSensitive),
    Breakpoint::new(215.0, 404.0, 151, 200, Unhealthy),
    Breakpoint::new(405.0, 504.0, 201, 300, VeryUnhealthy),
    Breakpoint::new(505.0, 604.0, 301, 500, Hazardous),
];

// Simplified µg/m³ mapping.
static NO2_BREAKPOINTS: [Breakpoint; 6] = [
    Breakpoint::new(0.0, 40.0, 0, 50, Good),
    Breakpoint::new(41.0, 90.0, 51, 100, Moderate),
    Breakpoint::new(91.0, 120.0, 101, 150, UnhealthyForSensitive),
    Breakpoint::new(121.0, 230.0, 151, 200, Unhealthy),
    Breakpoint::new(231.0, 340.0, 201, 300, VeryUnhealthy),
    Breakpoint::new(341.0, 1000.0, 301, 500, Hazardous),
];

static REGISTRY: [(PollutantKind, &[Breakpoint]); 4] = [
    (PollutantKind::Pm25, &PM25_BREAKPOINTS),
    (PollutantKind::Pm10, &PM10_BREAKPOINTS),
    (PollutantKind::No2, &NO2_BREAKPOINTS),
    (PollutantKind::O3, &O3_BREAKPOINTS),
];

/// Breakpoint table for `kind`. Kinds without an entry use the PM2.5 table.
pub fn table(kind: PollutantKind) -> &'static [Breakpoint] {
    REGISTRY
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, table)| *table)
        .unwrap_or(&PM25_BREAKPOINTS)
}
