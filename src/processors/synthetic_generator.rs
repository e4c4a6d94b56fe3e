use crate::models::{Coordinate, LocationAverage, PollutantKind, SeriesPoint};
use crate::utils::constants::{
    BASELINE_OTHER, BASELINE_PM10, BASELINE_PM25, SYNTHETIC_MARKERS, SYNTHETIC_NOISE,
};
use crate::utils::coordinates::round_tenths;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// Typical ambient level used as the centre line of a synthetic series.
pub fn baseline(kind: PollutantKind) -> f64 {
    match kind {
        PollutantKind::Pm25 => BASELINE_PM25,
        PollutantKind::Pm10 => BASELINE_PM10,
        _ => BASELINE_OTHER,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Cosine,
}

/// Shape of a synthetic series. The periodic term is
/// `amplitude * wave(age / hours_per_radian)` where `age` counts hours back
/// from the newest point, plus uniform noise in `[-noise, +noise]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticProfile {
    pub waveform: Waveform,
    pub amplitude: f64,
    pub hours_per_radian: f64,
    pub noise: f64,
}

impl SyntheticProfile {
    /// Used for report fallbacks.
    pub const RECENT: Self = Self {
        waveform: Waveform::Sine,
        amplitude: 4.0,
        hours_per_radian: 3.0,
        noise: SYNTHETIC_NOISE,
    };

    /// Used when a forecast has to invent its own lookback window.
    pub const LOOKBACK: Self = Self {
        waveform: Waveform::Cosine,
        amplitude: 3.0,
        hours_per_radian: 4.0,
        noise: SYNTHETIC_NOISE,
    };

    fn periodic(&self, age: f64) -> f64 {
        let phase = age / self.hours_per_radian;
        let wave = match self.waveform {
            Waveform::Sine => phase.sin(),
            Waveform::Cosine => phase.cos(),
        };
        self.amplitude * wave
    }

    /// Largest distance a point can sit from the baseline.
    pub fn max_deviation(&self) -> f64 {
        self.amplitude.abs() + self.noise.abs()
    }
}

impl Default for SyntheticProfile {
    fn default() -> Self {
        Self::RECENT
    }
}

pub struct SyntheticSeriesGenerator {
    profile: SyntheticProfile,
}

impl SyntheticSeriesGenerator {
    pub fn new() -> Self {
        Self {
            profile: SyntheticProfile::RECENT,
        }
    }

    pub fn with_profile(profile: SyntheticProfile) -> Self {
        Self { profile }
    }

    /// `hours` hourly points ending at `now`, oldest first, using the
    /// thread-local random source.
    pub fn generate(
        &self,
        kind: PollutantKind,
        hours: u32,
        now: DateTime<Utc>,
    ) -> Vec<SeriesPoint> {
        self.generate_with_rng(kind, hours, now, &mut rand::thread_rng())
    }

    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        kind: PollutantKind,
        hours: u32,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Vec<SeriesPoint> {
        let base = baseline(kind);
        let noise = self.profile.noise.abs();

        (0..hours)
            .map(|i| {
                let age = hours - 1 - i;
                let jitter = rng.gen_range(-noise..=noise);
                let value = (base + self.profile.periodic(age as f64) + jitter).max(0.0);
                SeriesPoint::new(now - Duration::hours(age as i64), round_tenths(value))
            })
            .collect()
    }

    /// Map markers scattered around `center` when no real locations exist.
    pub fn locations(&self, kind: PollutantKind, center: Coordinate) -> Vec<LocationAverage> {
        self.locations_with_rng(kind, center, &mut rand::thread_rng())
    }

    pub fn locations_with_rng<R: Rng + ?Sized>(
        &self,
        kind: PollutantKind,
        center: Coordinate,
        rng: &mut R,
    ) -> Vec<LocationAverage> {
        let base = baseline(kind);

        SYNTHETIC_MARKERS
            .iter()
            .map(|&(span, offset)| {
                let half = span / 2.0;
                LocationAverage {
                    latitude: center.latitude + rng.gen_range(-half..=half),
                    longitude: center.longitude + rng.gen_range(-half..=half),
                    average: round_tenths(base + offset),
                    count: 1,
                }
            })
            .collect()
    }
}

impl Default for SyntheticSeriesGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Plausible fallback series for `kind`. Values are random; only the length,
/// spacing and bounds are stable between calls.
pub fn synthesize(kind: PollutantKind, hours: u32, now: DateTime<Utc>) -> Vec<SeriesPoint> {
    SyntheticSeriesGenerator::new().generate(kind, hours, now)
}
