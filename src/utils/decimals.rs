use anchor_lang::prelude::*;

use crate::errors::PegError;

/// Normalize an amount from one decimal precision to another
/// # Arguments
/// * `amount` - The amount to normalize
/// * `from_decimals` - The current decimal precision of the amount
/// * `to_decimals` - The target decimal precision to normalize to
/// * `round_up` - Whether to round up when precision is dropped
/// # Returns
/// * `Result<u128>` - The normalized amount
#[inline(always)]
pub fn normalize_decimals(
    amount: u128,
    from_decimals: u8,
    to_decimals: u8,
    round_up: bool,
) -> Result<u128> {
    if to_decimals > from_decimals {
        let m = 10u128
            .checked_pow((to_decimals - from_decimals) as u32)
            .ok_or(PegError::MathOverflow)?;

        amount
            .checked_mul(m)
            .ok_or(PegError::MathOverflow.into())
    } else if from_decimals > to_decimals {
        let d = 10u128
            .checked_pow((from_decimals - to_decimals) as u32)
            .ok_or(PegError::MathOverflow)?;

        // ceil(a/b) = (a + b - 1) / b
        let c = if round_up { d - 1 } else { 0 };

        Ok(amount.checked_add(c).ok_or(PegError::MathOverflow)? / d)
    } else {
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_up_pyth_price_to_18_decimals() {
        // 1.00000000 with exponent -8
        assert_eq!(
            normalize_decimals(100_000_000, 8, 18, false).unwrap(),
            1_000_000_000_000_000_000
        );
    }

    #[test]
    fn test_scale_down_to_token_decimals() {
        // 1.5 tokens at 18 decimals to 9 decimals
        assert_eq!(
            normalize_decimals(1_500_000_000_000_000_000, 18, 9, false).unwrap(),
            1_500_000_000
        );
    }

    #[test]
    fn test_scale_down_rounding() {
        assert_eq!(normalize_decimals(1_999, 3, 0, false).unwrap(), 1);
        assert_eq!(normalize_decimals(1_001, 3, 0, true).unwrap(), 2);
        assert_eq!(normalize_decimals(1_000, 3, 0, true).unwrap(), 1);
    }

    #[test]
    fn test_same_decimals_is_identity() {
        assert_eq!(normalize_decimals(42, 9, 9, true).unwrap(), 42);
    }

    #[test]
    fn test_scale_up_overflow() {
        assert!(normalize_decimals(u128::MAX, 0, 18, false).is_err());
    }
}
