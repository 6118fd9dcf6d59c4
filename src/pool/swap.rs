use crate::error::{Error, InputError, MathError};
use crate::math::liquidity_math::apply_liquidity_net;
use crate::math::swap_math::compute_swap_step;
use crate::math::tick_math::{MAX_SQRT_PRICE_X64, MIN_SQRT_PRICE_X64};
use crate::pool::snapshot::{PoolSnapshot, SwapDirection, TickData};

/// Hard price bound a swap may never pass in the given direction: the
/// protocol minimum sqrt price when selling A, the maximum when selling B.
#[inline(always)]
pub fn default_sqrt_price_limit(direction: SwapDirection) -> u128 {
    if direction.a_to_b() {
        MIN_SQRT_PRICE_X64
    } else {
        MAX_SQRT_PRICE_X64
    }
}

/// Raw outcome of replaying a swap against a snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwapResult {
    /// Gross input deducted from the trader, fees included.
    pub amount_in: u128,
    /// Output credited to the trader.
    pub amount_out: u128,
    /// Portion of `amount_in` kept by the pool as fees.
    pub fee_amount: u128,
    /// Pool sqrt price after the fill, Q64.64.
    pub next_sqrt_price: u128,
    /// Initialized ticks crossed during the fill.
    pub cross_tick_num: u32,
}

// the running state of the fill, folded into a SwapResult at the end
#[derive(Debug, Clone, Copy)]
struct SwapState {
    // the requested amount still to be filled, in input or output terms
    // depending on the fixed side
    amount_remaining: u128,
    // net input consumed so far, fees excluded until settlement
    amount_in: u128,
    // the output produced so far
    amount_out: u128,
    // the fees charged so far
    fee_amount: u128,
    // current sqrt price, Q64.64
    sqrt_price: u128,
    // the liquidity active at the current price
    liquidity: u128,
    // initialized ticks crossed so far
    cross_tick_num: u32,
}

#[derive(Debug, Clone, Copy, Default)]
struct StepComputations {
    // the price this step is allowed to reach
    target_sqrt_price: u128,
    // the price actually reached
    next_sqrt_price: u128,
    amount_in: u128,
    amount_out: u128,
    fee_amount: u128,
}

// Folds one step into the running totals. A step that consumed no input
// leaves the remaining amount untouched: zero-liquidity ranges are crossed
// for free, matching the contract.
fn settle_step(
    state: &mut SwapState,
    step: &StepComputations,
    by_amount_in: bool,
) -> Result<(), MathError> {
    if step.amount_in != 0 {
        let consumed = if by_amount_in {
            step.amount_in
                .checked_add(step.fee_amount)
                .ok_or(MathError::Overflow)?
        } else {
            step.amount_out
        };
        state.amount_remaining = state
            .amount_remaining
            .checked_sub(consumed)
            .ok_or(MathError::Underflow)?;
    }

    state.amount_in = state
        .amount_in
        .checked_add(step.amount_in)
        .ok_or(MathError::Overflow)?;
    state.amount_out = state
        .amount_out
        .checked_add(step.amount_out)
        .ok_or(MathError::Overflow)?;
    state.fee_amount = state
        .fee_amount
        .checked_add(step.fee_amount)
        .ok_or(MathError::Overflow)?;

    Ok(())
}

impl PoolSnapshot {
    /// Replays a swap against this snapshot, walking `ticks` in traversal
    /// order (see [`sort_ticks_for_swap`](crate::pool::snapshot::sort_ticks_for_swap))
    /// and stopping at `sqrt_price_limit`, at the requested amount, or at
    /// the end of available liquidity, whichever comes first.
    ///
    /// Once the tick list is exhausted the remainder is filled inside the
    /// current range up to the limit; callers that want the full pool depth
    /// pass [`default_sqrt_price_limit`].
    ///
    /// The returned `amount_in` is gross: net traded input plus fees. The
    /// snapshot itself is never mutated.
    pub fn compute_swap(
        &self,
        ticks: &[TickData],
        a_to_b: bool,
        by_amount_in: bool,
        amount: u128,
        sqrt_price_limit: u128,
    ) -> Result<SwapResult, Error> {
        if amount == 0 {
            return Err(InputError::AmountIsZero.into());
        }
        let wrong_side = if a_to_b {
            sqrt_price_limit > self.current_sqrt_price || sqrt_price_limit < MIN_SQRT_PRICE_X64
        } else {
            sqrt_price_limit < self.current_sqrt_price || sqrt_price_limit > MAX_SQRT_PRICE_X64
        };
        if wrong_side {
            return Err(InputError::InvalidSqrtPriceLimit(sqrt_price_limit).into());
        }

        let mut state = SwapState {
            amount_remaining: amount,
            amount_in: 0,
            amount_out: 0,
            fee_amount: 0,
            sqrt_price: self.current_sqrt_price,
            liquidity: self.liquidity,
            cross_tick_num: 0,
        };

        for tick in ticks {
            if state.amount_remaining == 0 || state.sqrt_price == sqrt_price_limit {
                break;
            }
            // ticks on the wrong side of the snapshot tick never bound a step
            if a_to_b && tick.index > self.current_tick_index {
                continue;
            }
            if !a_to_b && tick.index <= self.current_tick_index {
                continue;
            }

            let mut step = StepComputations {
                target_sqrt_price: if a_to_b {
                    tick.sqrt_price.max(sqrt_price_limit)
                } else {
                    tick.sqrt_price.min(sqrt_price_limit)
                },
                ..Default::default()
            };

            (
                step.next_sqrt_price,
                step.amount_in,
                step.amount_out,
                step.fee_amount,
            ) = compute_swap_step(
                state.sqrt_price,
                step.target_sqrt_price,
                state.liquidity,
                state.amount_remaining,
                self.fee_rate,
                by_amount_in,
            )?;

            settle_step(&mut state, &step, by_amount_in)?;

            if step.next_sqrt_price == tick.sqrt_price {
                // landed on the boundary: the tick is crossed and its
                // liquidity joins or leaves the active range
                state.liquidity = apply_liquidity_net(state.liquidity, tick.liquidity_net, a_to_b)?;
                state.cross_tick_num += 1;
            }
            state.sqrt_price = step.next_sqrt_price;
        }

        // tick list exhausted with amount left: fill the tail of the
        // current range up to the limit
        if state.amount_remaining > 0 && state.sqrt_price != sqrt_price_limit {
            let mut step = StepComputations {
                target_sqrt_price: sqrt_price_limit,
                ..Default::default()
            };

            (
                step.next_sqrt_price,
                step.amount_in,
                step.amount_out,
                step.fee_amount,
            ) = compute_swap_step(
                state.sqrt_price,
                step.target_sqrt_price,
                state.liquidity,
                state.amount_remaining,
                self.fee_rate,
                by_amount_in,
            )?;

            settle_step(&mut state, &step, by_amount_in)?;
            state.sqrt_price = step.next_sqrt_price;
        }

        // the trader pays fees on top of the net traded input
        let amount_in = state
            .amount_in
            .checked_add(state.fee_amount)
            .ok_or(MathError::Overflow)?;

        Ok(SwapResult {
            amount_in,
            amount_out: state.amount_out,
            fee_amount: state.fee_amount,
            next_sqrt_price: state.sqrt_price,
            cross_tick_num: state.cross_tick_num,
        })
    }
}
