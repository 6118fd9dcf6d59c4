// shared between bench targets; each target uses a subset
#![allow(dead_code)]

use clmm_quoter::math::full_math::{mul_div_ceil, mul_div_floor, mul_shr};
use clmm_quoter::math::sqrt_price_math::{get_delta_a, get_delta_b, get_next_sqrt_price_from_input};
use clmm_quoter::math::swap_math::compute_swap_step;
use clmm_quoter::math::tick_math::{
    MAX_TICK_INDEX, MIN_TICK_INDEX, get_sqrt_price_at_tick, get_tick_at_sqrt_price,
};
use clmm_quoter::{PoolSnapshot, Q64, SwapDirection, SwapRequest, TickData};
use criterion::Criterion;
use std::hint::black_box;

pub fn bench_tick_math(c: &mut Criterion) {
    let ticks: Vec<i32> = (MIN_TICK_INDEX..=MAX_TICK_INDEX).step_by(14787).collect();

    c.bench_function("tick_math/get_sqrt_price_at_tick", |b| {
        b.iter(|| {
            for tick in &ticks {
                let _ = black_box(get_sqrt_price_at_tick(black_box(*tick)));
            }
        })
    });

    let prices: Vec<u128> = ticks
        .iter()
        .map(|tick| get_sqrt_price_at_tick(*tick).unwrap())
        .collect();

    c.bench_function("tick_math/get_tick_at_sqrt_price", |b| {
        b.iter(|| {
            for price in &prices {
                let _ = black_box(get_tick_at_sqrt_price(black_box(*price)));
            }
        })
    });
}

pub fn bench_sqrt_price_math(c: &mut Criterion) {
    let lower = get_sqrt_price_at_tick(-600).unwrap();
    let upper = get_sqrt_price_at_tick(600).unwrap();
    let liquidity = 50_000_000_000_000u128;

    c.bench_function("sqrt_price_math/get_delta_a", |b| {
        b.iter(|| {
            let _ = black_box(get_delta_a(
                black_box(lower),
                black_box(upper),
                black_box(liquidity),
                true,
            ));
        })
    });

    c.bench_function("sqrt_price_math/get_delta_b", |b| {
        b.iter(|| {
            let _ = black_box(get_delta_b(
                black_box(lower),
                black_box(upper),
                black_box(liquidity),
                false,
            ));
        })
    });

    c.bench_function("sqrt_price_math/next_price_from_input", |b| {
        b.iter(|| {
            let _ = black_box(get_next_sqrt_price_from_input(
                black_box(upper),
                black_box(liquidity),
                black_box(1_000_000u128),
                true,
            ));
        })
    });
}

pub fn bench_swap_math(c: &mut Criterion) {
    let current = Q64;
    let target = get_sqrt_price_at_tick(-300).unwrap();
    let liquidity = 50_000_000_000_000u128;

    c.bench_function("swap_math/compute_swap_step/by_amount_in", |b| {
        b.iter(|| {
            let _ = black_box(compute_swap_step(
                black_box(current),
                black_box(target),
                black_box(liquidity),
                black_box(75_000_000u128),
                2500,
                true,
            ));
        })
    });

    c.bench_function("swap_math/compute_swap_step/by_amount_out", |b| {
        b.iter(|| {
            let _ = black_box(compute_swap_step(
                black_box(current),
                black_box(target),
                black_box(liquidity),
                black_box(75_000_000u128),
                2500,
                false,
            ));
        })
    });
}

pub fn bench_full_math(c: &mut Criterion) {
    let a = 987_654_321_987_654_321u128;
    let b = 123_456_789_123_456_789u128;
    let denom = 1_000_003u128;

    c.bench_function("full_math/mul_div_floor", |bencher| {
        bencher.iter(|| {
            let _ = black_box(mul_div_floor(black_box(a), black_box(b), black_box(denom)));
        })
    });

    c.bench_function("full_math/mul_div_ceil", |bencher| {
        bencher.iter(|| {
            let _ = black_box(mul_div_ceil(black_box(a), black_box(b), black_box(denom)));
        })
    });

    c.bench_function("full_math/mul_shr", |bencher| {
        bencher.iter(|| {
            let _ = black_box(mul_shr(black_box(a), black_box(b), 64));
        })
    });
}

// pool with a ladder of single-spaced ticks around the current price
fn quote_fixture() -> (PoolSnapshot, Vec<TickData>) {
    let snapshot = PoolSnapshot {
        coin_type_a: "0x1::coin_a::A".to_string(),
        coin_type_b: "0x2::coin_b::B".to_string(),
        current_sqrt_price: Q64,
        current_tick_index: 0,
        liquidity: Q64,
        fee_rate: 2500,
        fee_growth_global_a: 0,
        fee_growth_global_b: 0,
        fee_protocol_coin_a: 0,
        fee_protocol_coin_b: 0,
        tick_spacing: 1,
    };

    let ticks: Vec<TickData> = (1..=30)
        .map(|i| TickData {
            index: i,
            sqrt_price: Q64 + 100 * i as u128,
            liquidity_net: 0,
            liquidity_gross: 1,
            fee_growth_outside_a: 0,
            fee_growth_outside_b: 0,
            rewarders_growth_outside: Vec::new(),
        })
        .collect();

    (snapshot, ticks)
}

pub fn bench_quote(c: &mut Criterion) {
    let (snapshot, ticks) = quote_fixture();

    let request = SwapRequest {
        direction: SwapDirection::BToA,
        by_amount_in: true,
        amount: 2_000,
        decimals_a: 8,
        decimals_b: 6,
    };

    c.bench_function("quote/quote_swap/30_ticks", |b| {
        b.iter(|| {
            let _ = black_box(
                black_box(&snapshot).quote_swap(black_box(ticks.clone()), black_box(&request)),
            );
        })
    });

    let no_tick_request = SwapRequest {
        direction: SwapDirection::AToB,
        by_amount_in: true,
        amount: 1_000_000,
        decimals_a: 8,
        decimals_b: 6,
    };

    c.bench_function("quote/quote_swap/no_ticks", |b| {
        b.iter(|| {
            let _ = black_box(
                black_box(&snapshot).quote_swap(Vec::new(), black_box(&no_tick_request)),
            );
        })
    });
}
