//! Widening multiply/divide helpers over the u128 domain.
//!
//! Every product of two u128 values fits a [`U256`], so the helpers here
//! widen first and only narrow back at the very end, returning
//! [`MathError::Overflow`] instead of wrapping when the result does not fit.

use alloy_primitives::U256;

use crate::error::MathError;

/// Widening product. Cannot overflow.
#[inline(always)]
pub fn full_mul(a: u128, b: u128) -> U256 {
    U256::from(a) * U256::from(b)
}

/// `floor(a * b / denom)`.
#[inline(always)]
pub fn mul_div_floor(a: u128, b: u128, denom: u128) -> Result<u128, MathError> {
    if denom == 0 {
        return Err(MathError::DivisionByZero);
    }
    let r = full_mul(a, b) / U256::from(denom);
    u128::try_from(r).map_err(|_| MathError::Overflow)
}

/// `round(a * b / denom)`, half away from zero.
#[inline(always)]
pub fn mul_div_round(a: u128, b: u128, denom: u128) -> Result<u128, MathError> {
    if denom == 0 {
        return Err(MathError::DivisionByZero);
    }
    let r = (full_mul(a, b) + U256::from(denom >> 1)) / U256::from(denom);
    u128::try_from(r).map_err(|_| MathError::Overflow)
}

/// `ceil(a * b / denom)`.
#[inline(always)]
pub fn mul_div_ceil(a: u128, b: u128, denom: u128) -> Result<u128, MathError> {
    if denom == 0 {
        return Err(MathError::DivisionByZero);
    }
    let r = (full_mul(a, b) + U256::from(denom - 1)) / U256::from(denom);
    u128::try_from(r).map_err(|_| MathError::Overflow)
}

/// `(a * b) >> shift`, erroring when the shifted product exceeds u128.
#[inline(always)]
pub fn mul_shr(a: u128, b: u128, shift: u8) -> Result<u128, MathError> {
    let r = full_mul(a, b) >> usize::from(shift);
    u128::try_from(r).map_err(|_| MathError::Overflow)
}

/// 256-bit division with optional rounding up.
#[inline(always)]
pub fn div_round(num: U256, denom: U256, round_up: bool) -> Result<U256, MathError> {
    if denom.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let quotient = num / denom;
    if round_up && quotient * denom != num {
        Ok(quotient + U256::from(1u8))
    } else {
        Ok(quotient)
    }
}

/// Checked shift left by the fixed-point word (64 bits). The contract
/// aborts when the operand already occupies the top 64 bits; this mirrors
/// that as a typed overflow.
#[inline(always)]
pub fn checked_shlw(value: U256) -> Result<U256, MathError> {
    if (value >> 192) != U256::ZERO {
        return Err(MathError::Overflow);
    }
    Ok(value << 64)
}
