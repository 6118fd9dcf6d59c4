use rust_decimal::Decimal;

use crate::error::{Error, MathError, StateError};
use crate::math::tick_math::{MAX_SQRT_PRICE_X64, get_sqrt_price_at_tick};

// 2^64 as a decimal: mantissa hi word = 1.
const Q64_DECIMAL: Decimal = Decimal::from_parts(0, 0, 1, false, 0);

/// Converts a Q64.64 sqrt price into the human price
/// `(sqrt / 2^64)^2 * 10^(decimals_a - decimals_b)`.
///
/// Display and impact math only: quote amounts never touch decimals.
pub fn sqrt_price_x64_to_price(
    sqrt_price_x64: u128,
    decimals_a: u8,
    decimals_b: u8,
) -> Result<Decimal, Error> {
    if sqrt_price_x64 == 0 {
        return Err(StateError::SqrtPriceIsZero.into());
    }
    if sqrt_price_x64 > MAX_SQRT_PRICE_X64 {
        return Err(StateError::SqrtPriceOutOfBounds.into());
    }

    // any valid sqrt price fits the 96-bit decimal mantissa exactly
    let sqrt = Decimal::try_from_i128_with_scale(sqrt_price_x64 as i128, 0)
        .map_err(|_| MathError::Overflow)?;
    let ratio = sqrt.checked_div(Q64_DECIMAL).ok_or(MathError::Overflow)?;
    let price = ratio.checked_mul(ratio).ok_or(MathError::Overflow)?;
    scale_by_decimals(price, decimals_a, decimals_b)
}

/// Human price at a tick index; the composition of the tick conversion
/// and [`sqrt_price_x64_to_price`].
pub fn tick_index_to_price(tick: i32, decimals_a: u8, decimals_b: u8) -> Result<Decimal, Error> {
    let sqrt_price = get_sqrt_price_at_tick(tick)?;
    sqrt_price_x64_to_price(sqrt_price, decimals_a, decimals_b)
}

/// Percentage move between the pre- and post-swap price:
/// `|pre - post| / pre * 100`.
pub fn price_impact_pct(
    pre_sqrt_price_x64: u128,
    post_sqrt_price_x64: u128,
    decimals_a: u8,
    decimals_b: u8,
) -> Result<Decimal, Error> {
    let pre = sqrt_price_x64_to_price(pre_sqrt_price_x64, decimals_a, decimals_b)?;
    let post = sqrt_price_x64_to_price(post_sqrt_price_x64, decimals_a, decimals_b)?;
    let diff = (pre - post).abs();
    let ratio = diff.checked_div(pre).ok_or(MathError::DivisionByZero)?;
    Ok(ratio
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(MathError::Overflow)?)
}

fn scale_by_decimals(price: Decimal, decimals_a: u8, decimals_b: u8) -> Result<Decimal, Error> {
    if decimals_a >= decimals_b {
        let diff = u32::from(decimals_a - decimals_b);
        if diff > 28 {
            return Err(MathError::Overflow.into());
        }
        let pow = Decimal::try_from_i128_with_scale(10i128.pow(diff), 0)
            .map_err(|_| MathError::Overflow)?;
        Ok(price.checked_mul(pow).ok_or(MathError::Overflow)?)
    } else {
        let diff = u32::from(decimals_b - decimals_a);
        if diff > 28 {
            return Err(MathError::Overflow.into());
        }
        Ok(price
            .checked_mul(Decimal::new(1, diff))
            .ok_or(MathError::Overflow)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const Q64_PRICE: u128 = 1 << 64;

    // ------------------------- price conversion ------------------------

    #[test]
    fn price_at_unit_sqrt_price() {
        // sqrt = 2^64 is exactly 1.0, squared stays 1.0
        let price = sqrt_price_x64_to_price(Q64_PRICE, 6, 6).unwrap();
        assert_eq!(price, Decimal::ONE);
    }

    #[test]
    fn price_squares_the_ratio() {
        // sqrt ratio 2.0 means price 4.0
        let price = sqrt_price_x64_to_price(2 * Q64_PRICE, 6, 6).unwrap();
        assert_eq!(price, Decimal::from(4u32));
    }

    #[test]
    fn price_applies_decimal_difference() {
        // 8 vs 6 decimals scales by 10^2, the reverse by 10^-2
        let price = sqrt_price_x64_to_price(Q64_PRICE, 8, 6).unwrap();
        assert_eq!(price, Decimal::from(100u32));

        let price = sqrt_price_x64_to_price(Q64_PRICE, 6, 8).unwrap();
        assert_eq!(price, Decimal::new(1, 2));
    }

    #[test]
    fn price_rejects_degenerate_sqrt() {
        assert!(matches!(
            sqrt_price_x64_to_price(0, 6, 6),
            Err(Error::StateError(StateError::SqrtPriceIsZero))
        ));
        assert!(matches!(
            sqrt_price_x64_to_price(MAX_SQRT_PRICE_X64 + 1, 6, 6),
            Err(Error::StateError(StateError::SqrtPriceOutOfBounds))
        ));
    }

    #[test]
    fn tick_price_composes_conversions() {
        let price = tick_index_to_price(0, 9, 9).unwrap();
        assert_eq!(price, Decimal::ONE);
    }

    // ------------------------- price impact ----------------------------

    #[test]
    fn impact_zero_for_unmoved_price() {
        let impact = price_impact_pct(Q64_PRICE, Q64_PRICE, 6, 6).unwrap();
        assert_eq!(impact, Decimal::ZERO);
    }

    #[test]
    fn impact_of_a_price_drop() {
        // price falls from 4.0 to 1.0: |4 - 1| / 4 * 100 = 75%
        let impact = price_impact_pct(2 * Q64_PRICE, Q64_PRICE, 6, 6).unwrap();
        assert_eq!(impact, Decimal::from(75u32));
    }

    #[test]
    fn impact_of_a_price_rise() {
        // price rises from 1.0 to 2.25: |1 - 2.25| / 1 * 100 = 125%
        let post = Q64_PRICE + (1u128 << 63);
        let impact = price_impact_pct(Q64_PRICE, post, 6, 6).unwrap();
        assert_eq!(impact, Decimal::from(125u32));
    }

    #[test]
    fn impact_is_decimal_invariant() {
        // the 10^k factor cancels in the ratio
        let a = price_impact_pct(2 * Q64_PRICE, Q64_PRICE, 6, 6).unwrap();
        let b = price_impact_pct(2 * Q64_PRICE, Q64_PRICE, 9, 6).unwrap();
        assert_eq!(a, b);
    }
}
