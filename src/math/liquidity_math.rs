use crate::error::MathError;

/// Applies a tick's `liquidity_net` to the active liquidity when the tick
/// is crossed. `liquidity_net` is defined for upward (B->A) crossings;
/// crossing downward (A->B) applies the opposite sign.
pub fn apply_liquidity_net(
    liquidity: u128,
    liquidity_net: i128,
    a_to_b: bool,
) -> Result<u128, MathError> {
    let add = (liquidity_net >= 0) != a_to_b;
    let magnitude = liquidity_net.unsigned_abs();
    if add {
        liquidity.checked_add(magnitude).ok_or(MathError::Overflow)
    } else {
        liquidity.checked_sub(magnitude).ok_or(MathError::Underflow)
    }
}
