//! Randomized transaction parameters.
//!
//! Amounts are drawn on an 8-decimal grid and returned in wei; delays are
//! whole milliseconds. Every call is an independent draw.

use std::fmt::Display;
use std::time::Duration;

use alloy::primitives::U256;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{CycleError, Result};

/// Fractional digits kept when sampling an amount
pub const AMOUNT_DECIMALS: u32 = 8;

const NATIVE_DECIMALS: u32 = 18;
const UNITS_PER_WHOLE: f64 = 100_000_000.0;

/// Sampling bounds. `sample_amount` draws from `[min, max)`; `sample_delay` from `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomRange<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Display> RandomRange<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// Fails when `min > max` (or the bounds are unordered, e.g. NaN)
    pub fn check(&self) -> Result<()> {
        if self.min <= self.max {
            Ok(())
        } else {
            Err(CycleError::InvalidRange {
                min: self.min.to_string(),
                max: self.max.to_string(),
            })
        }
    }
}

fn wei_per_unit() -> U256 {
    U256::from(10u64).pow(U256::from(NATIVE_DECIMALS - AMOUNT_DECIMALS))
}

/// Smallest grid unit at or above `value`. Products within float noise of a
/// grid point stay on it.
fn units_at_or_above(value: f64) -> u64 {
    let scaled = value * UNITS_PER_WHOLE;
    let nearest = scaled.round();
    if (scaled - nearest).abs() < 1e-6 {
        nearest as u64
    } else {
        scaled.ceil() as u64
    }
}

/// Grid units `[start, end)` that lie inside the amount bounds.
///
/// Equal bounds yield the single nearest grid value. Otherwise the range must
/// contain at least one grid point.
pub fn amount_units(range: &RandomRange<f64>) -> Result<(u64, u64)> {
    range.check()?;
    if !(range.min >= 0.0 && range.max.is_finite()) {
        return Err(CycleError::Config(format!(
            "amount bounds must be finite and non-negative, got {}..{}",
            range.min, range.max
        )));
    }
    if range.min == range.max {
        let units = (range.min * UNITS_PER_WHOLE).round() as u64;
        return Ok((units, units.saturating_add(1)));
    }

    let start = units_at_or_above(range.min);
    let end = units_at_or_above(range.max);
    if start >= end {
        return Err(CycleError::Config(format!(
            "amount bounds {}..{} contain no {}-decimal value",
            range.min, range.max, AMOUNT_DECIMALS
        )));
    }
    Ok((start, end))
}

/// Draw an amount in `[min, max)` whole units, returned in wei
pub fn sample_amount(range: &RandomRange<f64>) -> Result<U256> {
    sample_amount_with(range, &mut rand::rng())
}

pub fn sample_amount_with<R: Rng + ?Sized>(range: &RandomRange<f64>, rng: &mut R) -> Result<U256> {
    let (start, end) = amount_units(range)?;
    Ok(U256::from(rng.random_range(start..end)) * wei_per_unit())
}

/// Draw a pause of `[min, max]` milliseconds
pub fn sample_delay(range: &RandomRange<u64>) -> Result<Duration> {
    sample_delay_with(range, &mut rand::rng())
}

pub fn sample_delay_with<R: Rng + ?Sized>(range: &RandomRange<u64>, rng: &mut R) -> Result<Duration> {
    range.check()?;
    Ok(Duration::from_millis(rng.random_range(range.min..=range.max)))
}

/// Render wei as whole units with exactly `decimals` fractional digits (truncating)
pub fn format_units(wei: U256, decimals: u32) -> String {
    let decimals = decimals.min(NATIVE_DECIMALS);
    let step = U256::from(10u64).pow(U256::from(NATIVE_DECIMALS - decimals));
    let scale = U256::from(10u64).pow(U256::from(decimals));
    let units = wei / step;
    let whole = units / scale;
    let frac = units % scale;

    if decimals == 0 {
        return whole.to_string();
    }
    format!("{}.{:0width$}", whole, frac.saturating_to::<u64>(), width = decimals as usize)
}

/// Render a sampled amount (8 fractional digits)
pub fn format_amount(wei: U256) -> String {
    format_units(wei, AMOUNT_DECIMALS)
}
