use crate::error::StateError;
use crate::math::full_math::mul_shr;

pub const MIN_TICK_INDEX: i32 = -443636;
pub const MAX_TICK_INDEX: i32 = -MIN_TICK_INDEX;

/// Sqrt price at `MIN_TICK_INDEX`, Q64.64.
pub const MIN_SQRT_PRICE_X64: u128 = 4295048016;
/// Sqrt price at `MAX_TICK_INDEX`, Q64.64.
pub const MAX_SQRT_PRICE_X64: u128 = 79226673515401279992447579055;

const BIT_PRECISION: u32 = 14;
const LOG_B_2_X32: i128 = 59543866431248;
const LOG_B_P_ERR_MARGIN_LOWER_X64: i128 = 184467440737095516;
const LOG_B_P_ERR_MARGIN_UPPER_X64: i128 = 15793534762490258745;

/// Lowest initializable tick for the given spacing.
#[inline(always)]
pub fn get_min_tick(tick_spacing: u32) -> i32 {
    MIN_TICK_INDEX / tick_spacing as i32 * tick_spacing as i32
}

/// Highest initializable tick for the given spacing.
#[inline(always)]
pub fn get_max_tick(tick_spacing: u32) -> i32 {
    MAX_TICK_INDEX / tick_spacing as i32 * tick_spacing as i32
}

/// Returns the sqrt price (Q64.64 fixed-point) at a given tick index, or
/// `StateError::TickOutOfBounds` if the tick is invalid.
///
/// Use this to convert from discrete ticks to the continuous price
/// representation used by the rest of the math. Results match the on-chain
/// contract bit for bit.
pub fn get_sqrt_price_at_tick(tick: i32) -> Result<u128, StateError> {
    if !(MIN_TICK_INDEX..=MAX_TICK_INDEX).contains(&tick) {
        return Err(StateError::TickOutOfBounds);
    }
    if tick >= 0 {
        sqrt_price_at_positive_tick(tick)
    } else {
        sqrt_price_at_negative_tick(tick)
    }
}

// Positive ticks accumulate in Q64.96 and drop to Q64.64 at the end; the
// extra headroom keeps per-bit truncation below one ulp of the result.
fn sqrt_price_at_positive_tick(tick: i32) -> Result<u128, StateError> {
    let bits = tick as u32;

    // Start with ratio based on bit 0
    let mut ratio: u128 = if bits & 1 != 0 {
        79232123823359799118286999567
    } else {
        79228162514264337593543950336
    };

    macro_rules! apply_multiplier {
        ($bit:expr, $multiplier:expr) => {
            if bits & $bit != 0 {
                // overflow would mean the price left the representable range
                ratio = mul_shr(ratio, $multiplier, 96)
                    .map_err(|_| StateError::SqrtPriceOutOfBounds)?;
            }
        };
    }

    apply_multiplier!(2, 79236085330515764027303304731);
    apply_multiplier!(4, 79244008939048815603706035061);
    apply_multiplier!(8, 79259858533276714757314932305);
    apply_multiplier!(16, 79291567232598584799939703904);
    apply_multiplier!(32, 79355022692464371645785046466);
    apply_multiplier!(64, 79482085999252804386437311141);
    apply_multiplier!(128, 79736823300114093921829183326);
    apply_multiplier!(256, 80248749790819932309965073892);
    apply_multiplier!(512, 81282483887344747381513967011);
    apply_multiplier!(1024, 83390072131320151908154831281);
    apply_multiplier!(2048, 87770609709833776024991924138);
    apply_multiplier!(4096, 97234110755111693312479820773);
    apply_multiplier!(8192, 119332217159966728226237229890);
    apply_multiplier!(16384, 179736315981702064433883588727);
    apply_multiplier!(32768, 407748233172238350107850275304);
    apply_multiplier!(65536, 2098478828474011932436660412517);
    apply_multiplier!(131072, 55581415166113811149459800483533);
    apply_multiplier!(262144, 38992368544603139932233054999993551);

    Ok(ratio >> 32)
}

// Negative ticks work directly in Q64.64 with reciprocal multipliers.
fn sqrt_price_at_negative_tick(tick: i32) -> Result<u128, StateError> {
    let bits = tick.unsigned_abs();

    // Start with ratio based on bit 0
    let mut ratio: u128 = if bits & 1 != 0 {
        18445821805675392311
    } else {
        18446744073709551616
    };

    macro_rules! apply_multiplier {
        ($bit:expr, $multiplier:expr) => {
            if bits & $bit != 0 {
                ratio = mul_shr(ratio, $multiplier, 64)
                    .map_err(|_| StateError::SqrtPriceOutOfBounds)?;
            }
        };
    }

    apply_multiplier!(2, 18444899583751176498);
    apply_multiplier!(4, 18443055278223354162);
    apply_multiplier!(8, 18439367220385604838);
    apply_multiplier!(16, 18431993317065449817);
    apply_multiplier!(32, 18417254355718160513);
    apply_multiplier!(64, 18387811781193591352);
    apply_multiplier!(128, 18329067761203520168);
    apply_multiplier!(256, 18212142134806087854);
    apply_multiplier!(512, 17980523815641551639);
    apply_multiplier!(1024, 17526086738831147013);
    apply_multiplier!(2048, 16651378430235024244);
    apply_multiplier!(4096, 15030750278693429944);
    apply_multiplier!(8192, 12247334978882834399);
    apply_multiplier!(16384, 8131365268884726200);
    apply_multiplier!(32768, 3584323654723342297);
    apply_multiplier!(65536, 696457651847595233);
    apply_multiplier!(131072, 26294789957452057);
    apply_multiplier!(262144, 37481735321082);

    Ok(ratio)
}

/// Computes the largest tick index whose sqrt price is <= the given
/// Q64.64 sqrt price, enforcing the protocol price bounds.
///
/// This is the primary reverse conversion used by the rest of the crate
/// and is intended to match the on-chain logic exactly.
pub fn get_tick_at_sqrt_price(sqrt_price_x64: u128) -> Result<i32, StateError> {
    if !(MIN_SQRT_PRICE_X64..=MAX_SQRT_PRICE_X64).contains(&sqrt_price_x64) {
        return Err(StateError::SqrtPriceOutOfBounds);
    }

    let msb = 127 - sqrt_price_x64.leading_zeros() as i32;
    let log2p_integer_x32 = (i128::from(msb) - 64) << 32;

    // Normalize the mantissa to [2^63, 2^64) and pull fractional log2 bits
    // by repeated squaring; 14 bits brackets the answer within one tick.
    let mut r: u128 = if msb >= 64 {
        sqrt_price_x64 >> (msb - 63)
    } else {
        sqrt_price_x64 << (63 - msb)
    };
    let mut bit: i128 = 0x8000_0000_0000_0000;
    let mut precision = 0;
    let mut log2p_fraction_x64: i128 = 0;
    while bit > 0 && precision < BIT_PRECISION {
        r *= r;
        let is_r_more_than_two = (r >> 127) as u32;
        r >>= 63 + is_r_more_than_two;
        log2p_fraction_x64 += bit * i128::from(is_r_more_than_two);
        bit >>= 1;
        precision += 1;
    }
    let log2p_fraction_x32 = log2p_fraction_x64 >> 32;
    let logbp_x64 = (log2p_integer_x32 + log2p_fraction_x32) * LOG_B_2_X32;

    let tick_low = ((logbp_x64 - LOG_B_P_ERR_MARGIN_LOWER_X64) >> 64) as i32;
    let tick_high = ((logbp_x64 + LOG_B_P_ERR_MARGIN_UPPER_X64) >> 64) as i32;

    Ok(if tick_low == tick_high {
        tick_low
    } else if get_sqrt_price_at_tick(tick_high)? <= sqrt_price_x64 {
        tick_high
    } else {
        tick_low
    })
}
