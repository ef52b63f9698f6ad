//! Property-based tests using `proptest` for StableSwap invariants.
//!
//! 1. **No-profit round trip**: base→pair→base returns at most the input.
//! 2. **Invariant growth**: any positive deposit strictly increases `D`.
//! 3. **Determinism**: identical inputs give identical quotes.
//! 4. **Share conservation**: after any operation sequence the pool's
//!    total shares equal the sum of bonded balances and every aggregate
//!    matches the position records.
//! 5. **Value conservation**: no operation creates or destroys tokens.
//! 6. **Unbonding monotonicity**: a larger exit never unbonds faster.

use proptest::prelude::*;

use crate::config::{EngineConfig, PoolConfig, StableswapConfig};
use crate::domain::{Address, BlockInfo, Coin, Dec, RateMultiplier, Route};
use crate::engine::Engine;
use crate::math::{calculate_invariant, compute_unbonding_period, A_PRECISION};
use crate::pools::StableswapController;
use crate::state::{Bank, MemoryBank};
use crate::traits::LiquidityController;

const ONE: u128 = 1_000_000_000_000_000_000;
const T0: i64 = 1_700_000_000;
const BASE: &str = "uusdn";
const PAIR: &str = "uusdc";

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn addr(b: u8) -> Address {
    Address::from_bytes([b; 32])
}

fn collector() -> Address {
    addr(0xfe)
}

fn stableswap_config(amp: u64, rewards_fee: u64, pair_rate: u128) -> StableswapConfig {
    let Ok(cfg) = StableswapConfig::new(
        50,
        rewards_fee,
        Dec::ZERO,
        amp,
        amp,
        0,
        [RateMultiplier::new(BASE, ONE), RateMultiplier::new(PAIR, pair_rate)],
    ) else {
        panic!("valid config");
    };
    cfg
}

fn make_controller(amp: u64, rewards_fee: u64, pair_rate: u128) -> StableswapController {
    let mut engine = make_engine();
    let Ok(id) = engine.create_pool(
        &PoolConfig::Stableswap(stableswap_config(amp, rewards_fee, pair_rate)),
        BlockInfo::new(1, T0),
    ) else {
        panic!("pool created");
    };
    let Ok(params) = engine.state().stableswap_pool(id) else {
        panic!("params stored");
    };
    let Ok(pool) = engine.pool(id) else {
        panic!("pool stored");
    };
    StableswapController::new(pool.clone(), params.clone())
}

fn make_engine() -> Engine<MemoryBank> {
    let Ok(config) = EngineConfig::new(BASE, collector()) else {
        panic!("valid engine config");
    };
    let Ok(engine) = Engine::new(config, MemoryBank::new()) else {
        panic!("engine");
    };
    engine
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Pool balances in [10^6, 10^12].
fn balance_strategy() -> impl Strategy<Value = u128> {
    1_000_000u128..=1_000_000_000_000u128
}

/// Amplification in [1, 5_000].
fn amplification_strategy() -> impl Strategy<Value = u64> {
    1u64..=5_000u64
}

/// Fee rates between 0 and 1% over `FEE_DENOMINATOR`.
fn fee_strategy() -> impl Strategy<Value = u64> {
    0u64..=100_000_000u64
}

/// Pair rate multipliers between 0.5 and 2.0.
fn rate_strategy() -> impl Strategy<Value = u128> {
    (50u128..=200u128).prop_map(|pct| ONE / 100 * pct)
}

/// One host-level action in a random operation sequence.
#[derive(Debug, Clone)]
enum Op {
    Add { provider: u8, base: u128, pair: u128 },
    Remove { provider: u8, percentage: i64 },
    Swap { amount: u128, to_pair: bool },
    Claim { provider: u8 },
    Advance { seconds: i64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1u8..=4, 1_000u128..=10_000_000_000, 1_000u128..=10_000_000_000)
            .prop_map(|(provider, base, pair)| Op::Add { provider, base, pair }),
        (1u8..=4, 1i64..=100).prop_map(|(provider, percentage)| Op::Remove {
            provider,
            percentage
        }),
        (1u128..=1_000_000_000, any::<bool>())
            .prop_map(|(amount, to_pair)| Op::Swap { amount, to_pair }),
        (1u8..=4).prop_map(|provider| Op::Claim { provider }),
        (1i64..=100_000).prop_map(|seconds| Op::Advance { seconds }),
    ]
}

/// Every account that can hold tokens in [`run_ops`].
fn accounts() -> Vec<Address> {
    let mut all: Vec<Address> = (1u8..=5).map(addr).collect();
    all.extend([collector(), Address::pool_account(0), Address::rewards_account(0)]);
    all
}

fn supply(bank: &MemoryBank, denom: &str) -> u128 {
    accounts().iter().map(|a| bank.balance(a, denom)).sum()
}

/// Plays `ops` against a fresh single-pool engine, one block per op.
///
/// Failed operations are rolled back and ignored.  Calls `check` after
/// every block.
fn run_ops(
    ops: &[Op],
    mut check: impl FnMut(&Engine<MemoryBank>) -> Result<(), TestCaseError>,
) -> Result<(), TestCaseError> {
    let mut engine = make_engine();
    let Ok(_) = engine.create_pool(
        &PoolConfig::Stableswap(stableswap_config(200, 4_000_000, ONE)),
        BlockInfo::new(1, T0),
    ) else {
        panic!("pool created");
    };
    for who in 1u8..=5 {
        for denom in [BASE, PAIR] {
            let Ok(()) = engine
                .bank_mut()
                .credit(&addr(who), &Coin::new(denom, 1_000_000_000_000))
            else {
                panic!("credit");
            };
        }
    }

    let mut time = T0;
    for (height, op) in (2u64..).zip(ops) {
        let block = BlockInfo::new(height, time);
        match op {
            Op::Add { provider, base, pair } => {
                let coins = [Coin::new(BASE, *base), Coin::new(PAIR, *pair)];
                let _ = engine.add_liquidity(&addr(*provider), 0, &coins, block);
            }
            Op::Remove { provider, percentage } => {
                let _ = engine.remove_liquidity(
                    &addr(*provider),
                    0,
                    Dec::from_integer(*percentage),
                    block,
                );
            }
            Op::Swap { amount, to_pair } => {
                let (from, to) = if *to_pair { (BASE, PAIR) } else { (PAIR, BASE) };
                let _ = engine.swap(
                    &addr(5),
                    &Coin::new(from, *amount),
                    &[Route::new(0, to)],
                    &Coin::new(to, 0),
                    block,
                );
            }
            Op::Claim { provider } => {
                let _ = engine.claim_rewards(&addr(*provider), 0, block);
            }
            Op::Advance { seconds } => time += seconds,
        }
        engine.end_block(block);
        check(&engine)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Property 1: No-profit round trip
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_round_trip_never_profits(
        base in balance_strategy(),
        pair in balance_strategy(),
        amp in amplification_strategy(),
        fee in fee_strategy(),
        divisor in 10u128..=10_000u128,
    ) {
        let controller = make_controller(amp, fee, ONE);
        let amp = u128::from(amp) * A_PRECISION;
        let swap_in = (base / divisor).max(1);

        let Ok(there) = controller.quote(&[base, pair], &Coin::new(BASE, swap_in), PAIR, amp, fee)
        else {
            return Ok(());
        };
        let out = there.output().amount();
        let Some(base_after) = (base + swap_in).checked_sub(there.total_fee()) else {
            return Ok(());
        };
        let after = [base_after, pair - out];
        let Ok(back) = controller.quote(&after, &Coin::new(PAIR, out), BASE, amp, fee) else {
            return Ok(());
        };

        prop_assert!(
            back.output().amount() <= swap_in,
            "round-trip should lose value: final={} > original={}",
            back.output().amount(), swap_in
        );
    }
}

// ---------------------------------------------------------------------------
// Property 2: Invariant growth on deposit
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_deposit_strictly_increases_invariant(
        base in balance_strategy(),
        pair in balance_strategy(),
        add_base in 0u128..=1_000_000_000u128,
        add_pair in 0u128..=1_000_000_000u128,
        amp in amplification_strategy(),
    ) {
        prop_assume!(add_base + add_pair > 0);
        let amp = u128::from(amp) * A_PRECISION;
        let dec = |v: u128| Dec::checked_from_integer(v).unwrap_or(Dec::ZERO);

        let Ok(d0) = calculate_invariant(&[dec(base), dec(pair)], amp) else {
            return Ok(());
        };
        let Ok(d1) = calculate_invariant(&[dec(base + add_base), dec(pair + add_pair)], amp) else {
            return Ok(());
        };
        prop_assert!(d1 > d0, "D did not grow: {} -> {}", d0, d1);
    }
}

// ---------------------------------------------------------------------------
// Property 3: Determinism
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_quotes_are_deterministic(
        base in balance_strategy(),
        pair in balance_strategy(),
        amp in amplification_strategy(),
        fee in fee_strategy(),
        rate in rate_strategy(),
        amount in 1u128..=1_000_000_000u128,
    ) {
        let first = make_controller(amp, fee, rate);
        let second = make_controller(amp, fee, rate);
        let amp = u128::from(amp) * A_PRECISION;
        let a = first.quote(&[base, pair], &Coin::new(PAIR, amount), BASE, amp, fee);
        let b = second.quote(&[base, pair], &Coin::new(PAIR, amount), BASE, amp, fee);
        prop_assert_eq!(a, b);
    }
}

// ---------------------------------------------------------------------------
// Properties 4 and 5: Conservation across random operation sequences
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_shares_are_conserved(ops in prop::collection::vec(op_strategy(), 1..40)) {
        run_ops(&ops, |engine| {
            prop_assert!(engine.check_invariants().is_ok());
            let Ok(controller) = engine.controller(0) else {
                return Err(TestCaseError::fail("pool disappeared"));
            };
            let bonded = engine
                .state()
                .bonded_positions()
                .try_fold(Dec::ZERO, |acc, (_, p)| acc.checked_add(&p.balance));
            prop_assert_eq!(bonded, Some(controller.total_shares()));
            prop_assert!(
                engine.state().pool_total_unbonding_shares(0) <= controller.total_shares()
            );
            Ok(())
        })?;
    }

    #[test]
    fn prop_tokens_are_never_created(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let minted = 5 * 1_000_000_000_000u128;
        run_ops(&ops, |engine| {
            prop_assert_eq!(supply(engine.bank(), BASE), minted);
            prop_assert_eq!(supply(engine.bank(), PAIR), minted);
            Ok(())
        })?;
    }
}

// ---------------------------------------------------------------------------
// Property 6: Unbonding period monotonicity
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_larger_exit_never_unbonds_faster(
        total in 1i64..=1_000_000_000,
        a in 1i64..=1_000_000_000,
        b in 1i64..=1_000_000_000,
    ) {
        let (small, large) = (a.min(b).min(total), a.max(b).min(total));
        let Ok(p_small) = compute_unbonding_period(Dec::from_integer(total), Dec::from_integer(small))
        else {
            return Err(TestCaseError::fail("valid inputs"));
        };
        let Ok(p_large) = compute_unbonding_period(Dec::from_integer(total), Dec::from_integer(large))
        else {
            return Err(TestCaseError::fail("valid inputs"));
        };
        prop_assert!(p_small <= p_large, "{} shares: {}s, {} shares: {}s", small, p_small, large, p_large);
    }
}
