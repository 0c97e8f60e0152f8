//! Fixed-point fee computation.
//!
//! Converts a native-unit cost (plus any deferred debt) into a payment-token
//! amount using the 18-decimal cross price and a 1e6-scaled markup. All
//! intermediates stay in 256-bit unsigned arithmetic with checked operations;
//! the defined rounding rule is truncation toward zero, so systematic
//! under-collection by up to one token unit is an accepted property.

use alloy_primitives::U256;

use crate::{constants, ConfigError, FeeError};

/// Computes the payment-token amount owed for `native_cost` plus
/// `prior_debt` at `price`, with `markup` applied:
///
/// `(native_cost + prior_debt) * markup * price / (1e18 * 1e6)`
///
/// `price` is the 18-decimal cross price (token units per native unit) and
/// `markup` is scaled by [`constants::fee::MARKUP_DENOMINATOR`].
pub fn compute_token_fee(
    native_cost: U256,
    prior_debt: U256,
    price: U256,
    markup: u32,
) -> Result<U256, FeeError> {
    let total_cost = native_cost.checked_add(prior_debt).ok_or(FeeError::Overflow)?;
    let numerator = total_cost
        .checked_mul(U256::from(markup))
        .and_then(|v| v.checked_mul(price))
        .ok_or(FeeError::Overflow)?;
    Ok(numerator / constants::fee::FEE_DIVISOR)
}

/// Derives the cross price from the two oracle readings:
/// `native_price * 10^token_decimals / token_price`.
///
/// Both inputs are 18-decimal normalized readings, so their normalization
/// cancels and the result is an 18-decimal fixed-point rate of payment-token
/// units per native unit. `token_price` is strictly positive by the oracle
/// adapter's sign guard; a zero divisor can only mean that guard was
/// bypassed and is reported as overflow.
pub fn cross_price(
    native_price: U256,
    token_price: U256,
    token_decimals: u8,
) -> Result<U256, FeeError> {
    let token_unit = U256::from(10u64)
        .checked_pow(U256::from(token_decimals))
        .ok_or(FeeError::Overflow)?;
    native_price
        .checked_mul(token_unit)
        .and_then(|v| v.checked_div(token_price))
        .ok_or(FeeError::Overflow)
}

/// Checks a markup against the break-even floor and the configured ceiling.
/// Shared by engine construction and the admin markup update.
pub(crate) fn check_markup(markup: u32, limit: u32) -> Result<(), ConfigError> {
    if markup < constants::fee::MARKUP_DENOMINATOR {
        return Err(ConfigError::MarkupBelowBreakEven {
            markup,
            floor: constants::fee::MARKUP_DENOMINATOR,
        });
    }
    if markup > limit {
        return Err(ConfigError::MarkupExceedsLimit { markup, limit });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BREAK_EVEN: u32 = constants::fee::MARKUP_DENOMINATOR;

    fn e(base: u64, exp: u64) -> U256 {
        U256::from(base) * U256::from(10u64).pow(U256::from(exp))
    }

    #[test]
    fn break_even_with_no_debt_is_cost_times_price() {
        // At markup = 1e6 and zero debt the markup and its denominator
        // cancel: cost * price / 1e18, truncated.
        let cost = e(3, 15);
        let price = e(2, 9);
        let fee = compute_token_fee(cost, U256::ZERO, price, BREAK_EVEN).unwrap();
        assert_eq!(fee, cost * price / e(1, 18));
    }

    #[test]
    fn scenario_markup_110_percent() {
        // markup 110%, price 2000e18/1e6, cost 1e15, no debt.
        let cost = e(1, 15);
        let price = e(2000, 18) / e(1, 6);
        let fee = compute_token_fee(cost, U256::ZERO, price, 1_100_000).unwrap();
        // 1e15 * 1.1e6 * 2e15 / 1e24 = 2.2e12, exactly.
        assert_eq!(fee, e(22, 11));
    }

    #[test]
    fn prior_debt_is_charged_at_the_same_rate() {
        let price = e(2, 9);
        let base = compute_token_fee(e(1, 15), U256::ZERO, price, BREAK_EVEN).unwrap();
        let with_debt = compute_token_fee(e(1, 15), e(1, 15), price, BREAK_EVEN).unwrap();
        assert_eq!(with_debt, base * U256::from(2));
    }

    #[test]
    fn truncates_toward_zero() {
        // 3 wei at a price that does not divide evenly.
        let fee = compute_token_fee(
            U256::from(3),
            U256::ZERO,
            e(1, 18) / U256::from(2),
            BREAK_EVEN,
        )
        .unwrap();
        assert_eq!(fee, U256::from(1)); // 1.5 truncated
    }

    #[test]
    fn monotonic_in_every_argument() {
        let base =
            compute_token_fee(e(5, 14), e(1, 14), e(2, 9), 1_100_000).unwrap();
        for fee in [
            compute_token_fee(e(6, 14), e(1, 14), e(2, 9), 1_100_000).unwrap(),
            compute_token_fee(e(5, 14), e(2, 14), e(2, 9), 1_100_000).unwrap(),
            compute_token_fee(e(5, 14), e(1, 14), e(3, 9), 1_100_000).unwrap(),
            compute_token_fee(e(5, 14), e(1, 14), e(2, 9), 1_200_000).unwrap(),
        ] {
            assert!(fee >= base);
        }
    }

    #[test]
    fn overflow_is_reported_not_wrapped() {
        let err = compute_token_fee(U256::MAX, U256::ZERO, e(1, 18), BREAK_EVEN);
        assert_eq!(err, Err(FeeError::Overflow));
    }

    #[test]
    fn cross_price_cancels_oracle_normalization() {
        // native $2000, token $1, both 18-decimal normalized; 6-decimal token.
        let price = cross_price(e(2000, 18), e(1, 18), 6).unwrap();
        assert_eq!(price, e(2000, 6));
    }

    #[test]
    fn cross_price_with_non_dollar_token() {
        // token at $0.50: twice as many token units per native unit.
        let price = cross_price(e(2000, 18), e(5, 17), 6).unwrap();
        assert_eq!(price, e(4000, 6));
    }

    #[test]
    fn markup_bounds() {
        assert_eq!(
            check_markup(BREAK_EVEN - 1, 2_000_000),
            Err(ConfigError::MarkupBelowBreakEven { markup: BREAK_EVEN - 1, floor: BREAK_EVEN })
        );
        assert_eq!(
            check_markup(2_000_001, 2_000_000),
            Err(ConfigError::MarkupExceedsLimit { markup: 2_000_001, limit: 2_000_000 })
        );
        assert!(check_markup(BREAK_EVEN, 2_000_000).is_ok());
        assert!(check_markup(2_000_000, 2_000_000).is_ok());
    }
}
