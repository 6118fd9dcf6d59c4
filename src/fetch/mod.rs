//! Ledger retrieval layer: transport abstraction, wire decoding and a
//! cached reader that turns on-chain pool state into engine snapshots.
//!
//! Everything here is optional; the quoting engine itself never touches
//! the network.

mod addr;
mod resources;
mod ticks;
mod transport;
mod types;

pub use addr::{compose_type, hex_to_utf8, normalize_address, split_generic_types};
pub use resources::{
    ClmmConfig, ClmmReader, GLOBAL_CONFIG_TTL, POOL_IDENTITY_TTL, POOL_STATE_TTL,
};
pub use ticks::{TICK_PAGE_SIZE, TickPager};
pub use transport::{HttpLedger, LedgerTransport};
pub use types::{GlobalConfig, Pool, PoolIdentity};
