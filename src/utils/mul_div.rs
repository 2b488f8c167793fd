use anchor_lang::prelude::Result;

use crate::errors::PegError;

/// Safely computes (n0 * n1) / d with overflow protection
/// Returns error if d is 0 or the intermediate product overflows u128
/// # Arguments
/// * `n0` - The first multiplicand
/// * `n1` - The second multiplicand
/// * `d` - The divisor
/// * `round_up` - Whether to round up the result if there's a remainder
/// # Returns
/// * `Result<u128>` - The result of (n0 * n1) / d
#[inline(always)]
pub fn mul_div(n0: u128, n1: u128, d: u128, round_up: bool) -> Result<u128> {
    if d == 0 {
        return Err(PegError::DivideByZero.into());
    }

    let p = n0.checked_mul(n1).ok_or(PegError::MathOverflow)?;

    // ceil(a/b) = (a + b - 1) / b
    let c = if round_up { d - 1 } else { 0 };

    Ok(p.checked_add(c).ok_or(PegError::MathOverflow)? / d)
}
