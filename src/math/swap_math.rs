use crate::FEE_RATE_DENOMINATOR;
use crate::error::Error;
use crate::math::full_math::{mul_div_ceil, mul_div_floor};
use crate::math::sqrt_price_math::{
    get_delta_down_from_output, get_delta_up_from_input, get_next_sqrt_price_from_input,
    get_next_sqrt_price_from_output,
};

/// Computes a single fill step between the current sqrt price and one
/// bound, returning `(next_sqrt_price, amount_in, amount_out, fee_amount)`.
///
/// With `by_amount_in` the remaining amount is gross: the fee is carved
/// out first (floor), and on a partial fill the fee is the exact
/// complement so `amount_in + fee_amount == amount_remaining`. When the
/// bound is reached instead, the fee is grossed back up from the consumed
/// input (ceil). Exact-out steps always gross up from the computed input.
///
/// `amount_in` and `fee_amount` are reported separately; callers that want
/// the gross total add them.
pub fn compute_swap_step(
    current_sqrt_price: u128,
    target_sqrt_price: u128,
    liquidity: u128,
    amount_remaining: u128,
    fee_rate: u64,
    by_amount_in: bool,
) -> Result<(u128, u128, u128, u128), Error> {
    // an empty range is crossed for free
    if liquidity == 0 {
        return Ok((target_sqrt_price, 0, 0, 0));
    }

    let a_to_b = current_sqrt_price >= target_sqrt_price;
    let fee_rate = u128::from(fee_rate);
    let denom = u128::from(FEE_RATE_DENOMINATOR);

    if by_amount_in {
        let amount_net = mul_div_floor(amount_remaining, denom - fee_rate, denom)?;
        let max_amount_in =
            get_delta_up_from_input(current_sqrt_price, target_sqrt_price, liquidity, a_to_b)?;

        let (amount_in, fee_amount, next_sqrt_price) = if max_amount_in > amount_net {
            (
                amount_net,
                amount_remaining - amount_net,
                get_next_sqrt_price_from_input(current_sqrt_price, liquidity, amount_net, a_to_b)?,
            )
        } else {
            (
                max_amount_in,
                mul_div_ceil(max_amount_in, fee_rate, denom - fee_rate)?,
                target_sqrt_price,
            )
        };

        let amount_out =
            get_delta_down_from_output(current_sqrt_price, next_sqrt_price, liquidity, a_to_b)?;
        Ok((next_sqrt_price, amount_in, amount_out, fee_amount))
    } else {
        let max_amount_out =
            get_delta_down_from_output(current_sqrt_price, target_sqrt_price, liquidity, a_to_b)?;

        let (amount_out, next_sqrt_price) = if max_amount_out > amount_remaining {
            (
                amount_remaining,
                get_next_sqrt_price_from_output(
                    current_sqrt_price,
                    liquidity,
                    amount_remaining,
                    a_to_b,
                )?,
            )
        } else {
            (max_amount_out, target_sqrt_price)
        };

        let amount_in =
            get_delta_up_from_input(current_sqrt_price, next_sqrt_price, liquidity, a_to_b)?;
        let fee_amount = mul_div_ceil(amount_in, fee_rate, denom - fee_rate)?;
        Ok((next_sqrt_price, amount_in, amount_out, fee_amount))
    }
}
