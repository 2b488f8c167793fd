use anchor_lang::prelude::*;

use crate::{constants::OPERATION_SIZE_SCALE, state::TargetingConfig, utils::mul_div};

/// Maps a deviation to a mint/burn amount
///
/// `min + max(0, deviation - peg_tolerance) * (max - min) / 1000`, clamped to `max`.
/// The 1000 divisor is independent of the basis-point scale of the deviation.
pub fn operation_size(deviation_bps: u64, config: &TargetingConfig) -> Result<u128> {
    let min = config.min_operation_amount;
    let max = config.max_operation_amount;
    let scale_factor = deviation_bps.saturating_sub(config.peg_tolerance);

    // Any excess of at least the scale already reaches max
    if scale_factor >= OPERATION_SIZE_SCALE {
        return Ok(max);
    }

    let extra = mul_div(
        scale_factor as u128,
        max.saturating_sub(min),
        OPERATION_SIZE_SCALE as u128,
        false,
    )?;

    Ok(min.saturating_add(extra).min(max))
}
