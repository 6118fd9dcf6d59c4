use crate::FEE_RATE_DENOMINATOR;
use crate::error::InputError;
use crate::math::tick_math::{
    MAX_SQRT_PRICE_X64, MAX_TICK_INDEX, MIN_SQRT_PRICE_X64, MIN_TICK_INDEX,
};

/// Direction of a swap relative to the pool's coin ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDirection {
    /// Sell coin A for coin B; the sqrt price moves down.
    AToB,
    /// Sell coin B for coin A; the sqrt price moves up.
    BToA,
}

impl SwapDirection {
    #[inline(always)]
    pub fn a_to_b(self) -> bool {
        matches!(self, SwapDirection::AToB)
    }
}

/// A point-in-time copy of the on-chain pool fields the swap math reads.
///
/// Snapshots are plain data: hydrate one through the `fetch` module or build
/// it by hand for simulation, then call
/// [`quote_swap`](PoolSnapshot::quote_swap) with the pool's initialized
/// ticks.
#[derive(Debug, Clone)]
pub struct PoolSnapshot {
    pub coin_type_a: String,
    pub coin_type_b: String,
    /// Current sqrt price, Q64.64.
    pub current_sqrt_price: u128,
    pub current_tick_index: i32,
    /// Liquidity active in the range containing the current tick.
    pub liquidity: u128,
    /// Swap fee in parts per million of the input.
    pub fee_rate: u64,
    pub fee_growth_global_a: u128,
    pub fee_growth_global_b: u128,
    pub fee_protocol_coin_a: u64,
    pub fee_protocol_coin_b: u64,
    pub tick_spacing: u32,
}

/// One initialized tick as stored on chain.
#[derive(Debug, Clone)]
pub struct TickData {
    pub index: i32,
    /// Sqrt price at `index`, Q64.64.
    pub sqrt_price: u128,
    /// Signed liquidity delta applied when the tick is crossed left to right.
    pub liquidity_net: i128,
    pub liquidity_gross: u128,
    pub fee_growth_outside_a: u128,
    pub fee_growth_outside_b: u128,
    pub rewarders_growth_outside: Vec<u128>,
}

/// Caller-facing description of the swap to quote.
#[derive(Debug, Clone, Copy)]
pub struct SwapRequest {
    pub direction: SwapDirection,
    /// `true` fixes the input amount, `false` fixes the output amount.
    pub by_amount_in: bool,
    pub amount: u128,
    /// Decimal places of coin A, used only for price impact.
    pub decimals_a: u8,
    /// Decimal places of coin B, used only for price impact.
    pub decimals_b: u8,
}

impl PoolSnapshot {
    /// Checks the snapshot for values the on-chain contract could never
    /// hold. A failure here means the input was fetched incorrectly or
    /// fabricated, not that the swap is merely unfillable.
    pub fn validate(&self) -> Result<(), InputError> {
        if !(MIN_SQRT_PRICE_X64..=MAX_SQRT_PRICE_X64).contains(&self.current_sqrt_price) {
            return Err(InputError::SqrtPriceOutOfRange);
        }
        if self.tick_spacing == 0 {
            return Err(InputError::TickSpacingIsZero);
        }
        if self.fee_rate >= FEE_RATE_DENOMINATOR {
            return Err(InputError::FeeRateTooHigh(self.fee_rate));
        }
        if !(MIN_TICK_INDEX..=MAX_TICK_INDEX).contains(&self.current_tick_index) {
            return Err(InputError::TickIndexOutOfRange(self.current_tick_index));
        }
        Ok(())
    }
}

/// Orders ticks in the direction the swap walks them: descending indexes
/// when selling A, ascending when selling B.
pub fn sort_ticks_for_swap(ticks: &mut [TickData], a_to_b: bool) {
    if a_to_b {
        ticks.sort_unstable_by_key(|tick| std::cmp::Reverse(tick.index));
    } else {
        ticks.sort_unstable_by_key(|tick| tick.index);
    }
}

/// Validates a tick list that has already been ordered by
/// [`sort_ticks_for_swap`]. Catches indexes outside the protocol range,
/// indexes off the spacing grid, sqrt prices outside the representable
/// band and duplicate entries.
pub fn validate_ticks(ticks: &[TickData], tick_spacing: u32) -> Result<(), InputError> {
    if tick_spacing == 0 {
        return Err(InputError::TickSpacingIsZero);
    }
    for (i, tick) in ticks.iter().enumerate() {
        if !(MIN_TICK_INDEX..=MAX_TICK_INDEX).contains(&tick.index) {
            return Err(InputError::TickIndexOutOfRange(tick.index));
        }
        if tick.index % tick_spacing as i32 != 0 {
            return Err(InputError::UnalignedTickIndex(tick.index, tick_spacing));
        }
        if !(MIN_SQRT_PRICE_X64..=MAX_SQRT_PRICE_X64).contains(&tick.sqrt_price) {
            return Err(InputError::SqrtPriceOutOfRange);
        }
        // duplicates are adjacent once sorted, whichever direction
        if i > 0 && ticks[i - 1].index == tick.index {
            return Err(InputError::DuplicateTickIndex(tick.index));
        }
    }
    Ok(())
}
