use crate::Q64;
use crate::error::{Error, MathError, StateError};
use crate::math::full_math::{checked_shlw, div_round, full_mul, mul_div_ceil, mul_div_floor};
use crate::math::tick_math::{MAX_SQRT_PRICE_X64, MIN_SQRT_PRICE_X64};
use alloy_primitives::U256;

/// Computes the token A amount moved between two sqrt prices for a given
/// liquidity, optionally rounding up.
///
/// This is the `L * (1/sqrt_lower - 1/sqrt_upper)` side of the curve and
/// is used by both exact-in and exact-out swap flows.
pub fn get_delta_a(
    mut sqrt_price_0: u128,
    mut sqrt_price_1: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u128, Error> {
    if sqrt_price_0 > sqrt_price_1 {
        (sqrt_price_0, sqrt_price_1) = (sqrt_price_1, sqrt_price_0)
    };

    if sqrt_price_0 == 0 {
        return Err(StateError::SqrtPriceIsZero.into());
    }

    let diff = sqrt_price_1 - sqrt_price_0;
    if diff == 0 || liquidity == 0 {
        return Ok(0);
    }

    let numerator = checked_shlw(full_mul(liquidity, diff))?;
    let denominator = full_mul(sqrt_price_0, sqrt_price_1);
    let quotient = div_round(numerator, denominator, round_up)?;
    Ok(u128::try_from(quotient).map_err(|_| MathError::Overflow)?)
}

/// Computes the token B amount moved between two sqrt prices for a given
/// liquidity, optionally rounding up.
///
/// This is the `L * (sqrt_upper - sqrt_lower)` side of the curve.
pub fn get_delta_b(
    mut sqrt_price_0: u128,
    mut sqrt_price_1: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u128, MathError> {
    if sqrt_price_0 > sqrt_price_1 {
        (sqrt_price_0, sqrt_price_1) = (sqrt_price_1, sqrt_price_0)
    };

    let diff = sqrt_price_1 - sqrt_price_0;
    if diff == 0 || liquidity == 0 {
        return Ok(0);
    }

    let product = full_mul(liquidity, diff);
    let shifted = u128::try_from(product >> 64).map_err(|_| MathError::Overflow)?;
    if round_up && product & U256::from(u64::MAX) != U256::ZERO {
        return shifted.checked_add(1).ok_or(MathError::Overflow);
    }
    Ok(shifted)
}

/// Computes the next sqrt price after moving `amount` of token A, rounding
/// the resulting price up. `by_amount_in` adds the amount to the pool,
/// otherwise it is removed.
///
/// This is the low-level primitive used by higher-level swap math.
pub fn get_next_sqrt_price_a_up(
    sqrt_price: u128,
    liquidity: u128,
    amount: u128,
    by_amount_in: bool,
) -> Result<u128, Error> {
    if amount == 0 {
        return Ok(sqrt_price);
    }

    let numerator = checked_shlw(full_mul(sqrt_price, liquidity))?;
    let liquidity_shl = U256::from(liquidity) << 64;
    let product = full_mul(amount, sqrt_price);

    let denominator = if by_amount_in {
        liquidity_shl + product
    } else {
        if product >= liquidity_shl {
            return Err(StateError::InsufficientReserves.into());
        }
        liquidity_shl - product
    };

    let next = u128::try_from(div_round(numerator, denominator, true)?)
        .map_err(|_| MathError::Overflow)?;
    if !(MIN_SQRT_PRICE_X64..=MAX_SQRT_PRICE_X64).contains(&next) {
        return Err(StateError::SqrtPriceOutOfBounds.into());
    }
    Ok(next)
}

/// Computes the next sqrt price after moving `amount` of token B. The
/// price delta rounds down when the amount is added and up when removed,
/// so the pool never under-collects.
pub fn get_next_sqrt_price_b_down(
    sqrt_price: u128,
    liquidity: u128,
    amount: u128,
    by_amount_in: bool,
) -> Result<u128, Error> {
    if liquidity == 0 {
        return Err(StateError::LiquidityIsZero.into());
    }

    let quotient = if amount <= u64::MAX as u128 {
        let shifted = amount << 64;
        let q = shifted / liquidity;
        if by_amount_in || shifted % liquidity == 0 {
            q
        } else {
            q + 1
        }
    } else if by_amount_in {
        mul_div_floor(amount, Q64, liquidity)?
    } else {
        mul_div_ceil(amount, Q64, liquidity)?
    };

    let next = if by_amount_in {
        sqrt_price
            .checked_add(quotient)
            .ok_or(MathError::Overflow)?
    } else {
        sqrt_price
            .checked_sub(quotient)
            .ok_or(StateError::InsufficientReserves)?
    };

    if !(MIN_SQRT_PRICE_X64..=MAX_SQRT_PRICE_X64).contains(&next) {
        return Err(StateError::SqrtPriceOutOfBounds.into());
    }
    Ok(next)
}

/// Computes the next sqrt price when swapping *into* the pool
/// (`amount_in`), choosing the token A/B branch from the direction.
pub fn get_next_sqrt_price_from_input(
    sqrt_price: u128,
    liquidity: u128,
    amount_in: u128,
    a_to_b: bool,
) -> Result<u128, Error> {
    if sqrt_price == 0 {
        return Err(StateError::SqrtPriceIsZero.into());
    }
    if liquidity == 0 {
        return Err(StateError::LiquidityIsZero.into());
    }

    if a_to_b {
        get_next_sqrt_price_a_up(sqrt_price, liquidity, amount_in, true)
    } else {
        get_next_sqrt_price_b_down(sqrt_price, liquidity, amount_in, true)
    }
}

/// Computes the next sqrt price when swapping *out of* the pool
/// (`amount_out`), choosing the token A/B branch from the direction.
pub fn get_next_sqrt_price_from_output(
    sqrt_price: u128,
    liquidity: u128,
    amount_out: u128,
    a_to_b: bool,
) -> Result<u128, Error> {
    if sqrt_price == 0 {
        return Err(StateError::SqrtPriceIsZero.into());
    }
    if liquidity == 0 {
        return Err(StateError::LiquidityIsZero.into());
    }

    if a_to_b {
        get_next_sqrt_price_b_down(sqrt_price, liquidity, amount_out, false)
    } else {
        get_next_sqrt_price_a_up(sqrt_price, liquidity, amount_out, false)
    }
}

/// Maximal input-side amount between two sqrt prices, rounded up so the
/// swapper always pays enough to move the price.
pub fn get_delta_up_from_input(
    current_sqrt_price: u128,
    target_sqrt_price: u128,
    liquidity: u128,
    a_to_b: bool,
) -> Result<u128, Error> {
    if a_to_b {
        get_delta_a(current_sqrt_price, target_sqrt_price, liquidity, true)
    } else {
        Ok(get_delta_b(current_sqrt_price, target_sqrt_price, liquidity, true)?)
    }
}

/// Maximal output-side amount between two sqrt prices, rounded down so
/// the pool never over-pays.
pub fn get_delta_down_from_output(
    current_sqrt_price: u128,
    target_sqrt_price: u128,
    liquidity: u128,
    a_to_b: bool,
) -> Result<u128, Error> {
    if a_to_b {
        Ok(get_delta_b(current_sqrt_price, target_sqrt_price, liquidity, false)?)
    } else {
        get_delta_a(current_sqrt_price, target_sqrt_price, liquidity, false)
    }
}
