use crate::error::Error;
use crate::math::price_math::price_impact_pct;
use crate::pool::snapshot::{
    PoolSnapshot, SwapRequest, TickData, sort_ticks_for_swap, validate_ticks,
};
use crate::pool::swap::default_sqrt_price_limit;
use rust_decimal::Decimal;

/// Crossing this many initialized ticks (or more) in one swap risks
/// blowing the on-chain compute budget; the quote is flagged instead of
/// trusted.
pub const MAX_TICK_CROSSINGS: u32 = 40;

/// Crossings up to this count fit in the default transaction budget.
pub const FREE_TICK_CROSSINGS: u32 = 6;

/// Compute units to budget for each crossing beyond the free allowance.
pub const EXTRA_COMPUTE_PER_CROSSING: u64 = 22000;

/// A fully assembled quote: the engine's fill plus the policy flags a
/// router inspects before building the real transaction.
#[derive(Debug, Clone, Copy)]
pub struct SwapQuote {
    /// Requested amount, echoed back.
    pub amount: u128,
    pub a_to_b: bool,
    pub by_amount_in: bool,
    /// Gross input the fill would consume, fees included.
    pub estimated_amount_in: u128,
    /// Output the fill would produce.
    pub estimated_amount_out: u128,
    /// Pool sqrt price after the fill, Q64.64.
    pub estimated_end_sqrt_price: u128,
    /// Fees contained in `estimated_amount_in`.
    pub estimated_fee_amount: u128,
    /// Set when the pool cannot honor the request: not enough liquidity
    /// before the price limit, or too many tick crossings.
    pub is_exceed: bool,
    /// Advisory extra compute units for the transaction budget.
    pub extra_compute_limit: u64,
    /// Initialized ticks the fill crosses.
    pub cross_tick_num: u32,
    /// Relative price move of the fill, in percent.
    pub price_impact_pct: Decimal,
}

fn extra_compute_limit(cross_tick_num: u32) -> u64 {
    if cross_tick_num > FREE_TICK_CROSSINGS && cross_tick_num < MAX_TICK_CROSSINGS {
        EXTRA_COMPUTE_PER_CROSSING * u64::from(cross_tick_num - FREE_TICK_CROSSINGS)
    } else {
        0
    }
}

impl PoolSnapshot {
    /// Quotes a swap end to end: validates the snapshot and tick list,
    /// replays the fill against the direction's default price limit and
    /// packages the result with `is_exceed`, the compute-budget hint and
    /// the price impact.
    ///
    /// `ticks` is the pool's initialized ticks in any order; ordering and
    /// deduplication checks happen here. Structural problems with the
    /// inputs are errors, a merely unfillable request is not: it comes
    /// back as a quote with `is_exceed` set.
    pub fn quote_swap(
        &self,
        mut ticks: Vec<TickData>,
        request: &SwapRequest,
    ) -> Result<SwapQuote, Error> {
        self.validate()?;

        let a_to_b = request.direction.a_to_b();
        sort_ticks_for_swap(&mut ticks, a_to_b);
        validate_ticks(&ticks, self.tick_spacing)?;

        let sqrt_price_limit = default_sqrt_price_limit(request.direction);
        let result = self.compute_swap(
            &ticks,
            a_to_b,
            request.by_amount_in,
            request.amount,
            sqrt_price_limit,
        )?;

        let realized = if request.by_amount_in {
            result.amount_in
        } else {
            result.amount_out
        };
        let is_exceed = realized < request.amount || result.cross_tick_num >= MAX_TICK_CROSSINGS;

        let price_impact = price_impact_pct(
            self.current_sqrt_price,
            result.next_sqrt_price,
            request.decimals_a,
            request.decimals_b,
        )?;

        Ok(SwapQuote {
            amount: request.amount,
            a_to_b,
            by_amount_in: request.by_amount_in,
            estimated_amount_in: result.amount_in,
            estimated_amount_out: result.amount_out,
            estimated_end_sqrt_price: result.next_sqrt_price,
            estimated_fee_amount: result.fee_amount,
            is_exceed,
            extra_compute_limit: extra_compute_limit(result.cross_tick_num),
            cross_tick_num: result.cross_tick_num,
            price_impact_pct: price_impact,
        })
    }
}
