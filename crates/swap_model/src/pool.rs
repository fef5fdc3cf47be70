//! Constant-product pool math (x·y=k), as applied by the deployed pair.
//!
//! These formulas reproduce the pair contract's integer arithmetic so the
//! harness can derive expected balances instead of trusting the node.

use crate::{ModelError, COMMISSION_RATE_DEN, COMMISSION_RATE_NUM};

/// Breakdown of a swap against the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapOutput {
    /// Ask-side amount paid out, net of commission (gross of tax)
    pub return_amount: u128,

    /// Price impact versus the pre-swap spot price
    pub spread_amount: u128,

    /// Commission retained by the pool
    pub commission_amount: u128,
}

/// LP units minted for the first deposit: `isqrt(deposit_a * deposit_b)`.
pub fn initial_liquidity(deposit_a: u128, deposit_b: u128) -> Result<u128, ModelError> {
    if deposit_a == 0 || deposit_b == 0 {
        return Err(ModelError::InvalidAmount);
    }
    let product = deposit_a
        .checked_mul(deposit_b)
        .ok_or(ModelError::Overflow)?;
    Ok(product.isqrt())
}

/// Swap `offer_amount` of the offer asset against the pool.
///
/// - `return_before = ask_pool - floor(k / (offer_pool + offer_amount))`
/// - `spread = floor(offer_amount * ask_pool / offer_pool) - return_before`
/// - `commission = floor(return_before * 3 / 1000)`, deducted from the
///   return and left in the pool
pub fn swap_output(
    offer_pool: u128,
    ask_pool: u128,
    offer_amount: u128,
) -> Result<SwapOutput, ModelError> {
    if offer_pool == 0 || ask_pool == 0 {
        return Err(ModelError::InvalidReserves);
    }
    if offer_amount == 0 {
        return Err(ModelError::InvalidAmount);
    }

    let k = offer_pool.checked_mul(ask_pool).ok_or(ModelError::Overflow)?;
    let new_offer_pool = offer_pool
        .checked_add(offer_amount)
        .ok_or(ModelError::Overflow)?;
    let return_before = ask_pool - k / new_offer_pool;

    // Return at the pre-swap spot price; the shortfall against it is the
    // spread. Flooring can land the ideal below the actual for dust-sized
    // offers, hence the saturation.
    let ideal_return = offer_amount
        .checked_mul(ask_pool)
        .ok_or(ModelError::Overflow)?
        / offer_pool;
    let spread_amount = ideal_return.saturating_sub(return_before);

    let commission_amount = return_before
        .checked_mul(COMMISSION_RATE_NUM)
        .ok_or(ModelError::Overflow)?
        / COMMISSION_RATE_DEN;

    Ok(SwapOutput {
        return_amount: return_before - commission_amount,
        spread_amount,
        commission_amount,
    })
}

/// Whether a swap's spread exceeds the tolerated fraction `num/den`.
///
/// The pair compares `spread / (return_before_commission + spread)` to the
/// caller's max spread; cross-multiplying keeps the comparison in integers.
pub fn exceeds_max_spread(
    spread_amount: u128,
    return_before_commission: u128,
    num: u128,
    den: u128,
) -> Result<bool, ModelError> {
    if den == 0 {
        return Err(ModelError::InvalidAmount);
    }
    let gross = return_before_commission
        .checked_add(spread_amount)
        .ok_or(ModelError::Overflow)?;
    let lhs = spread_amount.checked_mul(den).ok_or(ModelError::Overflow)?;
    let rhs = gross.checked_mul(num).ok_or(ModelError::Overflow)?;
    Ok(lhs > rhs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_deposit_mints_sqrt_of_product() {
        // 69 MIR + 420 UST
        assert_eq!(
            initial_liquidity(69_000_000, 420_000_000).unwrap(),
            170_235_131
        );
    }

    #[test]
    fn zero_deposit_is_rejected() {
        assert_eq!(
            initial_liquidity(0, 420_000_000),
            Err(ModelError::InvalidAmount)
        );
        assert_eq!(initial_liquidity(69_000_000, 0), Err(ModelError::InvalidAmount));
    }

    #[test]
    fn one_mir_swap_against_fresh_pool() {
        // k = 69e6 * 420e6; selling 1 MIR returns
        // 420_000_000 - k / 70_000_000 = 6_000_000 before commission.
        let out = swap_output(69_000_000, 420_000_000, 1_000_000).unwrap();
        assert_eq!(out.commission_amount, 18_000);
        assert_eq!(out.return_amount, 5_982_000);
        assert_eq!(out.spread_amount, 86_956);
    }

    #[test]
    fn large_swap_against_post_swap_pool() {
        // The slippage scenario: 50 MIR into the 70 MIR / 414_018_001 uusd
        // pool moves the price far past a 1% tolerance.
        let out = swap_output(70_000_000, 414_018_001, 50_000_000).unwrap();
        let return_before = out.return_amount + out.commission_amount;
        assert_eq!(return_before, 172_507_501);
        assert_eq!(out.spread_amount, 123_219_642);

        assert!(exceeds_max_spread(out.spread_amount, return_before, 1, 100).unwrap());
    }

    #[test]
    fn small_swap_fits_a_two_percent_tolerance() {
        let out = swap_output(69_000_000, 420_000_000, 1_000_000).unwrap();
        let return_before = out.return_amount + out.commission_amount;
        // spread / (return + spread) = 86_956 / 6_086_956 ≈ 1.43%
        assert!(exceeds_max_spread(out.spread_amount, return_before, 1, 100).unwrap());
        assert!(!exceeds_max_spread(out.spread_amount, return_before, 2, 100).unwrap());
    }

    #[test]
    fn degenerate_inputs_are_rejected() {
        assert_eq!(
            swap_output(0, 420_000_000, 1_000_000),
            Err(ModelError::InvalidReserves)
        );
        assert_eq!(
            swap_output(69_000_000, 0, 1_000_000),
            Err(ModelError::InvalidReserves)
        );
        assert_eq!(
            swap_output(69_000_000, 420_000_000, 0),
            Err(ModelError::InvalidAmount)
        );
        assert_eq!(
            exceeds_max_spread(1, 1, 1, 0),
            Err(ModelError::InvalidAmount)
        );
    }

    #[test]
    fn overflow_is_an_error_not_a_panic() {
        assert_eq!(
            swap_output(u128::MAX, u128::MAX, 1),
            Err(ModelError::Overflow)
        );
        assert_eq!(
            initial_liquidity(u128::MAX, u128::MAX),
            Err(ModelError::Overflow)
        );
    }
}
