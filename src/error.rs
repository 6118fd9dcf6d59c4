use thiserror::Error;

#[derive(Debug, Error)]
pub enum MathError {
    #[error("Math error - overflow")]
    Overflow,
    #[error("Math error - underflow")]
    Underflow,
    #[error("Math error - division by zero")]
    DivisionByZero,
}

#[derive(Debug, Error)]
pub enum StateError {
    #[error("State error - sqrtPrice out of bounds")]
    SqrtPriceOutOfBounds,
    #[error("State error - sqrtPrice is 0")]
    SqrtPriceIsZero,

    #[error("State error - tick out of bounds")]
    TickOutOfBounds,

    #[error("State error - liquidity is 0")]
    LiquidityIsZero,

    #[error("State error - requested amount exceeds pool reserves")]
    InsufficientReserves,
}

/// Structural violations in caller-supplied quote inputs, rejected before
/// any math runs. Business outcomes (under-fill, excessive tick traversal)
/// are never errors; they surface through the quote flags instead.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Input error - swap amount is 0")]
    AmountIsZero,
    #[error("Input error - fee rate {0} not below the fee rate denominator")]
    FeeRateTooHigh(u64),
    #[error("Input error - tick spacing is 0")]
    TickSpacingIsZero,
    #[error("Input error - duplicate tick index {0}")]
    DuplicateTickIndex(i32),
    #[error("Input error - tick index {0} not a multiple of spacing {1}")]
    UnalignedTickIndex(i32, u32),
    #[error("Input error - tick index {0} out of range")]
    TickIndexOutOfRange(i32),
    #[error("Input error - sqrtPrice out of range")]
    SqrtPriceOutOfRange,
    #[error("Input error - sqrtPrice limit {0} on the wrong side of the current price")]
    InvalidSqrtPriceLimit(u128),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    MathError(#[from] crate::error::MathError),

    #[error(transparent)]
    StateError(#[from] crate::error::StateError),

    #[error(transparent)]
    InputError(#[from] crate::error::InputError),
}

/// Ledger retrieval failures. `NotFound` is distinct from transport
/// problems: an uninitialized pool and an unreachable fullnode call for
/// different handling upstream.
#[cfg(feature = "fetch")]
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Fetch error - {0} not found on ledger")]
    NotFound(String),
    #[error("Fetch error - transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Fetch error - ledger returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Fetch error - decode: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Fetch error - malformed payload: {0}")]
    Malformed(String),
}
