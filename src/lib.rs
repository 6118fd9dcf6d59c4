//! Off-chain swap quoting for CLMM (concentrated liquidity) pools.
//!
//! This crate exposes:
//! - Low-level math primitives (`math::*`) for ticks, Q64.64 sqrt prices and
//!   per-step swap fills, matching the on-chain contract bit for bit.
//! - A [`PoolSnapshot`] that replays a swap against fetched pool state and
//!   tick data without touching the chain.
//! - Quote assembly (`quote`): fees, price impact and the compute-budget
//!   heuristics a router needs before submitting the real transaction.
//! - Optional `fetch` helpers to hydrate snapshots from a fullnode REST API.
//!
//! # Examples
//!
//! ## Pure math
//! ```no_run
//! use clmm_quoter::{math::tick_math, Q64};
//!
//! let sqrt_price = tick_math::get_sqrt_price_at_tick(0).unwrap();
//! assert_eq!(sqrt_price, Q64);
//! ```
//!
//! ## Quoting a swap against an in-memory snapshot
//! ```no_run
//! use clmm_quoter::{PoolSnapshot, SwapDirection, SwapRequest, Q64};
//!
//! let pool = PoolSnapshot {
//!     coin_type_a: "0x1::aptos_coin::AptosCoin".into(),
//!     coin_type_b: "0xdd89::usdc::Usdc".into(),
//!     current_sqrt_price: Q64,
//!     current_tick_index: 0,
//!     liquidity: 1_000_000_000_000u128,
//!     fee_rate: 2500, // 0.25%
//!     fee_growth_global_a: 0,
//!     fee_growth_global_b: 0,
//!     fee_protocol_coin_a: 0,
//!     fee_protocol_coin_b: 0,
//!     tick_spacing: 60,
//! };
//!
//! let request = SwapRequest {
//!     direction: SwapDirection::AToB,
//!     by_amount_in: true,
//!     amount: 1_000_000,
//!     decimals_a: 8,
//!     decimals_b: 6,
//! };
//!
//! // No initialized ticks: the whole fill happens inside the current range.
//! let quote = pool.quote_swap(Vec::new(), &request).unwrap();
//! println!(
//!     "out: {}, fee: {}, impact: {}%",
//!     quote.estimated_amount_out, quote.estimated_fee_amount, quote.price_impact_pct
//! );
//! ```

pub use alloy_primitives::U256;

pub mod cache;
pub mod error;
mod hash;
pub mod math;

pub use hash::FastMap;

pub mod pool;
pub mod quote;

#[cfg(feature = "fetch")]
pub mod fetch;

pub use pool::snapshot::{PoolSnapshot, SwapDirection, SwapRequest, TickData};
pub use pool::swap::SwapResult;
pub use quote::SwapQuote;

pub const RESOLUTION: u8 = 64;
pub const Q64: u128 = 1 << 64;

/// Fee rates are expressed in parts per million of the input amount.
pub const FEE_RATE_DENOMINATOR: u64 = 1_000_000;
