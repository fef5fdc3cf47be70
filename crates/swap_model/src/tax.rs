//! Native-currency transfer tax: proportional up to a fixed cap.
//!
//! The network deducts `amount * rate / (1 + rate)` from every uusd
//! transfer, capped at [`TAX_CAP`]. `rate = 1/1000`, so the deliverable
//! part of a gross amount is `floor(amount * 1000 / 1001)`.

use crate::{ModelError, TAX_CAP, TAX_RATE_DEN, TAX_RATE_NUM};

/// Deliverable amount after tax when transferring `amount` gross.
///
/// `tax = min(amount - floor(amount * 1000 / 1001), TAX_CAP)`. The
/// `1000/1001` form inverts the network's `tax = amount * rate/(1+rate)`
/// without leaving the integer domain.
pub fn deduct_tax(amount: u128) -> Result<u128, ModelError> {
    let kept = amount
        .checked_mul(TAX_RATE_DEN)
        .ok_or(ModelError::Overflow)?
        / (TAX_RATE_DEN + TAX_RATE_NUM);
    let tax = (amount - kept).min(TAX_CAP);
    Ok(amount - tax)
}

/// Gross amount needed to deliver `amount` net of tax.
///
/// `tax = min(floor(amount / 1000), TAX_CAP)`. This is an approximate
/// inverse of [`deduct_tax`], not an exact one: the cap and integer
/// flooring leave round-trips off by a unit. Callers tolerate the
/// discrepancy.
pub fn add_tax(amount: u128) -> Result<u128, ModelError> {
    let tax = amount
        .checked_mul(TAX_RATE_NUM)
        .ok_or(ModelError::Overflow)?
        / TAX_RATE_DEN;
    amount
        .checked_add(tax.min(TAX_CAP))
        .ok_or(ModelError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_is_tax_free() {
        assert_eq!(deduct_tax(0).unwrap(), 0);
        assert_eq!(add_tax(0).unwrap(), 0);
    }

    #[test]
    fn deduct_tax_below_cap_scales_linearly() {
        // 1 UST: tax = 1_000_000 - floor(1e6 * 1000/1001) = 1000
        assert_eq!(deduct_tax(1_000_000).unwrap(), 999_000);
        // 1000 UST: tax = 999_001, still under the cap
        assert_eq!(deduct_tax(1_000_000_000).unwrap(), 999_000_999);
    }

    #[test]
    fn deduct_tax_cap_binds_at_one_thousand_and_one_ust() {
        // Exactly where amount/1001 reaches the cap
        assert_eq!(deduct_tax(1_001_000_000).unwrap(), 1_000_000_000);
        // Past the cap the tax is flat
        assert_eq!(deduct_tax(5_000_000_000).unwrap(), 4_999_000_000);
        assert_eq!(deduct_tax(10_000_000_000).unwrap(), 9_999_000_000);
    }

    #[test]
    fn add_tax_caps_out() {
        assert_eq!(add_tax(500_000).unwrap(), 500_500);
        assert_eq!(add_tax(2_000_000_000).unwrap(), 2_001_000_000);
    }

    #[test]
    fn swap_scenario_amounts() {
        // The documented swap: 5_982_000 uusd leaves the pool, the user
        // receives 5_976_023, and the pool is debited add_tax of that.
        assert_eq!(deduct_tax(5_982_000).unwrap(), 5_976_023);
        assert_eq!(add_tax(5_976_023).unwrap(), 5_981_999);
    }

    #[test]
    fn add_tax_is_not_an_exact_inverse() {
        // The asymmetry is load-bearing: downstream balance assertions
        // depend on these exact values.
        assert_eq!(deduct_tax(5_981_999).unwrap(), 5_976_022);
        assert_ne!(deduct_tax(add_tax(5_976_023).unwrap()).unwrap(), 5_976_023);
    }

    #[test]
    fn overflow_is_an_error_not_a_panic() {
        assert_eq!(deduct_tax(u128::MAX), Err(ModelError::Overflow));
        assert_eq!(add_tax(u128::MAX), Err(ModelError::Overflow));
    }

    proptest! {
        #[test]
        fn round_trip_is_within_one_unit(x in any::<u64>()) {
            let x = x as u128;
            let gross = add_tax(x).unwrap();
            let net = deduct_tax(gross).unwrap();
            prop_assert!(net <= x);
            prop_assert!(x - net <= 1);
        }

        #[test]
        fn deduct_tax_is_monotone(x in any::<u64>()) {
            let x = x as u128;
            prop_assert!(deduct_tax(x).unwrap() <= deduct_tax(x + 1).unwrap());
        }

        #[test]
        fn tax_never_exceeds_cap(x in any::<u64>()) {
            let x = x as u128;
            prop_assert!(x - deduct_tax(x).unwrap() <= TAX_CAP);
            prop_assert!(add_tax(x).unwrap() - x <= TAX_CAP);
        }
    }
}
