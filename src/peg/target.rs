use anchor_lang::prelude::*;

use crate::{
    constants::{BASIS_POINTS_DIVISOR, MIN_CATCHUP_FACTOR, RATIO_SCALE, SECONDS_PER_YEAR},
    errors::PegError,
    state::{GrowthAccrual, PathPoint, PathTip, TargetingConfig},
    utils::mul_div,
};

/// Number of whole path periods in a year
pub fn periods_per_year(path_update_interval: i64) -> Result<u128> {
    require_gt!(
        path_update_interval,
        0,
        PegError::InvalidPathUpdateInterval
    );

    let periods = SECONDS_PER_YEAR / path_update_interval;
    require_gt!(periods, 0, PegError::InvalidPathUpdateInterval);

    Ok(periods as u128)
}

/// Target value of `period` under linear growth from the genesis target
///
/// `Truncate`: `genesis * (10000 + (growth / periods_per_year) * n) / 10000`
/// `Fractional`: `genesis * (10000 * ppy + growth * n) / (10000 * ppy)`
pub fn target_value_for_period(
    genesis_target: u128,
    period: u64,
    config: &TargetingConfig,
) -> Result<u128> {
    let ppy = periods_per_year(config.path_update_interval)?;
    let growth = config.target_growth_rate as u128;
    let bps = BASIS_POINTS_DIVISOR as u128;
    let n = period as u128;

    match config.growth_accrual {
        GrowthAccrual::Truncate => {
            let period_rate_bps = growth / ppy;
            let factor = period_rate_bps
                .checked_mul(n)
                .and_then(|g| g.checked_add(bps))
                .ok_or(PegError::MathOverflow)?;

            mul_div(genesis_target, factor, bps, false)
        }
        GrowthAccrual::Fractional => {
            let denominator = bps.checked_mul(ppy).ok_or(PegError::MathOverflow)?;
            let factor = growth
                .checked_mul(n)
                .and_then(|g| g.checked_add(denominator))
                .ok_or(PegError::MathOverflow)?;

            mul_div(genesis_target, factor, denominator, false)
        }
    }
}

/// Signed deviation of `actual` from `target` in basis points, truncated toward zero
pub fn period_gap_bps(actual: u128, target: u128) -> Result<i64> {
    require_gt!(target, 0, PegError::DivideByZero);

    let actual = i128::try_from(actual).map_err(|_| PegError::MathOverflow)?;
    let target = i128::try_from(target).map_err(|_| PegError::MathOverflow)?;

    let gap = actual
        .checked_sub(target)
        .and_then(|d| d.checked_mul(BASIS_POINTS_DIVISOR as i128))
        .ok_or(PegError::MathOverflow)?
        / target;

    i64::try_from(gap).map_err(|_| PegError::MathOverflow.into())
}

/// Target over actual of `point`, scaled by 1000
/// Above 1000 the actual value trails the target
pub fn gap_ratio(point: &PathPoint) -> Result<u64> {
    let ratio = mul_div(
        point.target_value,
        RATIO_SCALE as u128,
        point.actual_value,
        false,
    )?;

    u64::try_from(ratio).map_err(|_| PegError::MathOverflow.into())
}

/// First-order approximation of `(base / 1000) ^ (exponent / 1000)`, scaled by 1000
///
/// Linear around 1.0: `1000 ± |base - 1000| * exponent / 1000`.
/// Below 1.0 the factor floors at `MIN_CATCHUP_FACTOR`, so a large overshoot
/// with a high exponent keeps a positive target.
pub fn power_approx(base: u64, exponent: u64) -> Result<u128> {
    let scale = RATIO_SCALE as u128;
    let base = base as u128;
    let exponent = exponent as u128;

    if base >= scale {
        let delta = mul_div(base - scale, exponent, scale, false)?;
        scale
            .checked_add(delta)
            .ok_or(PegError::MathOverflow.into())
    } else {
        let delta = mul_div(scale - base, exponent, scale, false)?;
        Ok(scale.saturating_sub(delta).max(MIN_CATCHUP_FACTOR))
    }
}

/// Path-dependent target: `base_target` scaled by the catch-up factor while the gap is open
/// Never below 1, so deviations stay measurable
pub fn adjusted_target(base_target: u128, tip: &PathTip, config: &TargetingConfig) -> Result<u128> {
    if tip.is_gap_closed || tip.cumulative_gap == 0 {
        return Ok(base_target);
    }

    let factor = power_approx(gap_ratio(&tip.latest)?, config.catchup_aggressiveness)?;

    Ok(mul_div(base_target, factor, RATIO_SCALE as u128, false)?.max(1))
}

/// `|price - target| * 10000 / target`
pub fn deviation_bps(price: u128, target: u128) -> Result<u64> {
    let deviation = mul_div(
        price.abs_diff(target),
        BASIS_POINTS_DIVISOR as u128,
        target,
        false,
    )?;

    u64::try_from(deviation).map_err(|_| PegError::MathOverflow.into())
}
