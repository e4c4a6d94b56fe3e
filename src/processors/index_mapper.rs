use crate::models::{IndexResult, PollutantKind};
use crate::processors::breakpoints::{self, Breakpoint};

/// Converts a concentration into an index value by piecewise-linear
/// interpolation over the pollutant's breakpoint table.
///
/// Rounding is half away from zero (`f64::round`), so an exact `x.5`
/// always rounds up for the non-negative values a table produces.
///
/// Out-of-table concentrations never fail:
/// - above the last tier: the last tier's `i_high`
/// - below the first tier (negative, `-inf`, `NaN`): the first tier's `i_low`
/// - inside the gap between two tiers (e.g. PM2.5 35.45): the lower
///   tier's `i_high`
pub struct IndexMapper;

impl IndexMapper {
    pub fn new() -> Self {
        Self
    }

    pub fn compute(&self, kind: PollutantKind, concentration: f64) -> IndexResult {
        let table = breakpoints::table(kind);
        let first = &table[0];
        let last = &table[table.len() - 1];

        if concentration.is_nan() || concentration < first.c_low {
            return IndexResult::new(first.i_low, first.tier);
        }

        for (i, bp) in table.iter().enumerate() {
            if bp.contains(concentration) {
                return IndexResult::new(Self::interpolate(bp, concentration), bp.tier);
            }

            // Past the previous tier's upper bound but short of this one.
            if concentration < bp.c_low {
                let below = &table[i - 1];
                return IndexResult::new(below.i_high, below.tier);
            }
        }

        IndexResult::new(last.i_high, last.tier)
    }

    fn interpolate(bp: &Breakpoint, concentration: f64) -> u16 {
        let span = bp.c_high - bp.c_low;
        if span <= 0.0 {
            return bp.i_low;
        }

        let index = (bp.i_high - bp.i_low) as f64 / span * (concentration - bp.c_low)
            + bp.i_low as f64;
        index.round() as u16
    }
}

impl Default for IndexMapper {
    fn default() -> Self {
        Self::new()
    }
}

/// Index value, category and tier for one concentration.
pub fn compute_index(kind: PollutantKind, concentration: f64) -> IndexResult {
    IndexMapper::new().compute(kind, concentration)
}
