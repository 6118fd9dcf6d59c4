use crate::error::FetchError;
use crate::fetch::addr::{compose_type, hex_to_utf8, normalize_address};
use crate::pool::snapshot::{PoolSnapshot, TickData};
use serde::Deserialize;

// ---------------- wire DTOs ----------------

/// Resource envelope as the REST API returns it.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ResourceDto {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub data: serde_json::Value,
}

/// Two's-complement signed integer wrapper; the ledger encodes `i64` and
/// `i128` values as the unsigned bit pattern in a string.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SignedBits {
    pub bits: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CoinValueDto {
    pub value: String,
}

/// Pool resource fields the snapshot needs; the ledger object carries
/// more (handles, positions, rewarders) that deserialization skips.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PoolResourceDto {
    pub coin_a: CoinValueDto,
    pub coin_b: CoinValueDto,
    pub tick_spacing: String,
    pub fee_rate: String,
    pub liquidity: String,
    pub current_sqrt_price: String,
    pub current_tick_index: SignedBits,
    pub fee_growth_global_a: String,
    pub fee_growth_global_b: String,
    pub fee_protocol_coin_a: String,
    pub fee_protocol_coin_b: String,
    pub is_pause: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GlobalConfigDto {
    pub protocol_fee_rate: String,
    pub is_pause: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RegistryDto {
    pub data: SimpleMapDto,
}

/// On-chain `SimpleMap` layout: a single `data` field holding the entries.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SimpleMapDto {
    pub data: Vec<RegistryEntryDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RegistryEntryDto {
    pub key: PoolKeyDto,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PoolKeyDto {
    pub coin_type_a: MoveStructNameDto,
    pub coin_type_b: MoveStructNameDto,
    pub tick_spacing: String,
}

/// Struct name triple with hex-encoded identifiers, as stored in the
/// registry.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MoveStructNameDto {
    pub account_address: String,
    pub module_name: String,
    pub struct_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FetchTicksResultDto {
    pub ticks: Vec<TickDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TickDto {
    pub index: SignedBits,
    pub sqrt_price: String,
    pub liquidity_net: SignedBits,
    pub liquidity_gross: String,
    pub fee_growth_outside_a: String,
    pub fee_growth_outside_b: String,
    pub rewarders_growth_outside: Vec<String>,
}

// ---------------- domain types ----------------

/// Pool identity from the factory registry. Stable for the pool's
/// lifetime, so safe to cache for a long time.
#[derive(Debug, Clone)]
pub struct PoolIdentity {
    pub address: String,
    pub coin_type_a: String,
    pub coin_type_b: String,
    pub tick_spacing: u32,
}

/// Protocol-wide settings held next to the pools.
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    pub protocol_fee_rate: u64,
    pub is_pause: bool,
}

/// On-ledger pool state resolved into engine types.
///
/// `is_pause` is the OR of the global pause switch and the pool's own
/// flag, so a `false` here means the pool actually accepts swaps.
#[derive(Debug, Clone)]
pub struct Pool {
    pub address: String,
    pub pool_type: String,
    pub coin_amount_a: u64,
    pub coin_amount_b: u64,
    pub is_pause: bool,
    snapshot: PoolSnapshot,
}

impl Pool {
    pub fn snapshot(&self) -> &PoolSnapshot {
        &self.snapshot
    }

    pub(crate) fn from_resource(
        address: String,
        pool_type: String,
        coin_type_a: String,
        coin_type_b: String,
        dto: PoolResourceDto,
        global_pause: bool,
    ) -> Result<Self, FetchError> {
        let snapshot = PoolSnapshot {
            coin_type_a,
            coin_type_b,
            current_sqrt_price: parse_u128(&dto.current_sqrt_price, "current_sqrt_price")?,
            current_tick_index: tick_index_from_bits(
                &dto.current_tick_index.bits,
                "current_tick_index",
            )?,
            liquidity: parse_u128(&dto.liquidity, "liquidity")?,
            fee_rate: parse_u64(&dto.fee_rate, "fee_rate")?,
            fee_growth_global_a: parse_u128(&dto.fee_growth_global_a, "fee_growth_global_a")?,
            fee_growth_global_b: parse_u128(&dto.fee_growth_global_b, "fee_growth_global_b")?,
            fee_protocol_coin_a: parse_u64(&dto.fee_protocol_coin_a, "fee_protocol_coin_a")?,
            fee_protocol_coin_b: parse_u64(&dto.fee_protocol_coin_b, "fee_protocol_coin_b")?,
            tick_spacing: parse_u32(&dto.tick_spacing, "tick_spacing")?,
        };

        Ok(Self {
            address,
            pool_type,
            coin_amount_a: parse_u64(&dto.coin_a.value, "coin_a")?,
            coin_amount_b: parse_u64(&dto.coin_b.value, "coin_b")?,
            is_pause: global_pause || dto.is_pause,
            snapshot,
        })
    }
}

impl TryFrom<GlobalConfigDto> for GlobalConfig {
    type Error = FetchError;

    fn try_from(dto: GlobalConfigDto) -> Result<Self, FetchError> {
        Ok(Self {
            protocol_fee_rate: parse_u64(&dto.protocol_fee_rate, "protocol_fee_rate")?,
            is_pause: dto.is_pause,
        })
    }
}

impl TryFrom<TickDto> for TickData {
    type Error = FetchError;

    fn try_from(dto: TickDto) -> Result<Self, FetchError> {
        let rewarders_growth_outside = dto
            .rewarders_growth_outside
            .iter()
            .map(|growth| parse_u128(growth, "rewarders_growth_outside"))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            index: tick_index_from_bits(&dto.index.bits, "tick index")?,
            sqrt_price: parse_u128(&dto.sqrt_price, "tick sqrt_price")?,
            liquidity_net: i128_from_bits(&dto.liquidity_net.bits, "liquidity_net")?,
            liquidity_gross: parse_u128(&dto.liquidity_gross, "liquidity_gross")?,
            fee_growth_outside_a: parse_u128(&dto.fee_growth_outside_a, "fee_growth_outside_a")?,
            fee_growth_outside_b: parse_u128(&dto.fee_growth_outside_b, "fee_growth_outside_b")?,
            rewarders_growth_outside,
        })
    }
}

impl RegistryEntryDto {
    pub(crate) fn into_identity(self) -> Result<PoolIdentity, FetchError> {
        Ok(PoolIdentity {
            address: normalize_address(&self.value)?,
            coin_type_a: self.key.coin_type_a.type_tag()?,
            coin_type_b: self.key.coin_type_b.type_tag()?,
            tick_spacing: parse_u32(&self.key.tick_spacing, "tick_spacing")?,
        })
    }
}

impl MoveStructNameDto {
    /// Registry identifiers arrive hex-encoded; the address is kept in
    /// the abbreviated form the ledger prints inside type tags.
    fn type_tag(&self) -> Result<String, FetchError> {
        Ok(compose_type(
            &self.account_address,
            &hex_to_utf8(&self.module_name)?,
            &hex_to_utf8(&self.struct_name)?,
        ))
    }
}

// ---------------- field parsing ----------------

pub(crate) fn parse_u128(value: &str, field: &'static str) -> Result<u128, FetchError> {
    value
        .parse()
        .map_err(|_| FetchError::Malformed(format!("{field}: {value:?} is not a u128")))
}

pub(crate) fn parse_u64(value: &str, field: &'static str) -> Result<u64, FetchError> {
    value
        .parse()
        .map_err(|_| FetchError::Malformed(format!("{field}: {value:?} is not a u64")))
}

pub(crate) fn parse_u32(value: &str, field: &'static str) -> Result<u32, FetchError> {
    value
        .parse()
        .map_err(|_| FetchError::Malformed(format!("{field}: {value:?} is not a u32")))
}

/// Reinterprets a 64-bit two's-complement pattern as a tick index.
pub(crate) fn tick_index_from_bits(bits: &str, field: &'static str) -> Result<i32, FetchError> {
    let raw: u64 = bits
        .parse()
        .map_err(|_| FetchError::Malformed(format!("{field}: {bits:?} is not a bit pattern")))?;

    i32::try_from(raw as i64)
        .map_err(|_| FetchError::Malformed(format!("{field}: {bits} does not fit a tick index")))
}

/// Reinterprets a 128-bit two's-complement pattern as an `i128`.
pub(crate) fn i128_from_bits(bits: &str, field: &'static str) -> Result<i128, FetchError> {
    let raw: u128 = bits
        .parse()
        .map_err(|_| FetchError::Malformed(format!("{field}: {bits:?} is not a bit pattern")))?;

    Ok(raw as i128)
}
