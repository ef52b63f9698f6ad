//! Integration tests exercising the full system from config to settlement.
//!
//! These tests verify end-to-end flows through the public API:
//! pool registration, config validation, routed swaps, the bonding and
//! unbonding lifecycle, reward distribution, and fee withdrawal.

#![cfg(feature = "stableswap")]
#![allow(clippy::panic)]

use stableswap_engine::config::{EngineConfig, PoolConfig, StableswapConfig};
use stableswap_engine::domain::{Address, BlockInfo, Coin, Dec, RateMultiplier, Route};
use stableswap_engine::engine::Engine;
use stableswap_engine::error::AmmError;
use stableswap_engine::math::{A_PRECISION, TWENTY_FOUR_HOURS};
use stableswap_engine::state::{Bank, MemoryBank};
use stableswap_engine::traits::LiquidityController;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

const ONE: u128 = 1_000_000_000_000_000_000;
const T0: i64 = 1_700_000_000;
const BASE: &str = "uusdn";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn addr(b: u8) -> Address {
    Address::from_bytes([b; 32])
}

fn alice() -> Address {
    addr(1)
}

fn bob() -> Address {
    addr(2)
}

fn trader() -> Address {
    addr(3)
}

fn collector() -> Address {
    addr(0xfe)
}

fn treasury() -> Address {
    addr(0xfd)
}

fn at(height: u64, offset: i64) -> BlockInfo {
    BlockInfo::new(height, T0 + offset)
}

fn stableswap(
    pair: &str,
    pair_rate: u128,
    initial_a: u64,
    future_a: u64,
    future_a_time: i64,
) -> PoolConfig {
    let Ok(cfg) = StableswapConfig::new(
        50,
        2_500_000,
        Dec::ZERO,
        initial_a,
        future_a,
        future_a_time,
        [RateMultiplier::new(BASE, ONE), RateMultiplier::new(pair, pair_rate)],
    ) else {
        panic!("valid StableSwap config");
    };
    PoolConfig::Stableswap(cfg)
}

fn flat(pair: &str) -> PoolConfig {
    stableswap(pair, ONE, 1_000, 1_000, 0)
}

fn engine() -> Engine<MemoryBank> {
    let Ok(config) = EngineConfig::new(BASE, collector()) else {
        panic!("valid engine config");
    };
    let Ok(engine) = Engine::new(config, MemoryBank::new()) else {
        panic!("engine");
    };
    engine
}

fn fund(engine: &mut Engine<MemoryBank>, who: Address, coins: &[Coin]) {
    for coin in coins {
        let Ok(()) = engine.bank_mut().credit(&who, coin) else {
            panic!("credit");
        };
    }
}

fn create(engine: &mut Engine<MemoryBank>, config: &PoolConfig) -> u64 {
    let Ok(id) = engine.create_pool(config, at(1, 0)) else {
        panic!("pool created");
    };
    id
}

fn deposit(
    engine: &mut Engine<MemoryBank>,
    who: Address,
    pool_id: u64,
    coins: &[Coin],
    block: BlockInfo,
) {
    fund(engine, who, coins);
    let Ok(_) = engine.add_liquidity(&who, pool_id, coins, block) else {
        panic!("deposit should succeed");
    };
}

fn swap_one(
    engine: &mut Engine<MemoryBank>,
    pool_id: u64,
    input: Coin,
    denom_to: &str,
    block: BlockInfo,
) -> Coin {
    fund(engine, trader(), std::slice::from_ref(&input));
    let Ok(commitments) = engine.swap(
        &trader(),
        &input,
        &[Route::new(pool_id, denom_to)],
        &Coin::new(denom_to, 0),
        block,
    ) else {
        panic!("swap should succeed");
    };
    commitments[0].output().clone()
}

// ===========================================================================
// Suite 1: Registration
// ===========================================================================

#[test]
fn pools_get_sequential_ids_and_module_accounts() {
    let mut e = engine();
    let first = create(&mut e, &flat("uusdc"));
    let second = create(&mut e, &flat("uusdt"));
    assert_eq!((first, second), (0, 1));

    let Ok(pool) = e.pool(second) else {
        panic!("pool stored");
    };
    assert_eq!(pool.pair, "uusdt");
    assert_eq!(pool.address, Address::pool_account(1));
    assert!(!pool.paused);

    let Ok(liquidity) = e.liquidity(second) else {
        panic!("pool exists");
    };
    assert_eq!(liquidity, vec![Coin::new(BASE, 0), Coin::new("uusdt", 0)]);
}

#[test]
fn pool_must_pair_against_base_denom() {
    let mut e = engine();
    let Ok(cfg) = StableswapConfig::new(
        50,
        2_500_000,
        Dec::ZERO,
        100,
        100,
        0,
        [RateMultiplier::new("uusdc", ONE), RateMultiplier::new("uusdt", ONE)],
    ) else {
        panic!("config is valid in isolation");
    };
    let r = e.create_pool(&PoolConfig::Stableswap(cfg), at(1, 0));
    assert!(matches!(r, Err(AmmError::InvalidDenom(_))));
    assert_eq!(e.state().pools().count(), 0);
}

// ===========================================================================
// Suite 2: Config Validation
// ===========================================================================

#[test]
fn invalid_parameters_are_rejected() {
    let rm = || [RateMultiplier::new(BASE, ONE), RateMultiplier::new("uusdc", ONE)];
    assert!(matches!(
        StableswapConfig::new(101, 0, Dec::ZERO, 100, 100, 0, rm()),
        Err(AmmError::InvalidPercentage(_))
    ));
    assert!(StableswapConfig::new(50, 0, Dec::ZERO, 0, 100, 0, rm()).is_err());
    assert!(StableswapConfig::new(50, 0, Dec::ZERO, 100, 2_000_000, 0, rm()).is_err());
    assert!(StableswapConfig::new(50, 10_000_000_000, Dec::ZERO, 100, 100, 0, rm()).is_err());
    assert!(StableswapConfig::new(
        50,
        0,
        Dec::ZERO,
        100,
        100,
        0,
        [RateMultiplier::new(BASE, ONE), RateMultiplier::new(BASE, ONE)],
    )
    .is_err());
    assert!(StableswapConfig::new(
        50,
        0,
        Dec::ZERO,
        100,
        100,
        0,
        [RateMultiplier::new(BASE, ONE), RateMultiplier::new("uusdc", 0)],
    )
    .is_err());
}

#[test]
fn engine_config_round_trips_through_json() {
    let Ok(cfg) = EngineConfig::new(BASE, collector()) else {
        panic!("valid config");
    };
    let Ok(cfg) = cfg.with_unbonding_block_interval(5) else {
        panic!("valid interval");
    };
    let cfg = cfg.with_max_add_liquidity(1_000);
    let Ok(json) = serde_json::to_string(&cfg) else {
        panic!("serialize");
    };
    let Ok(back) = serde_json::from_str::<EngineConfig>(&json) else {
        panic!("deserialize");
    };
    assert_eq!(back, cfg);
}

// ===========================================================================
// Suite 3: Full Lifecycle
// ===========================================================================

#[test]
fn full_lifecycle_deposit_swap_claim_exit() {
    init_tracing();
    let mut e = engine();
    let pool = create(&mut e, &flat("uusdc"));
    let both = |n: u128| [Coin::new(BASE, n), Coin::new("uusdc", n)];

    deposit(&mut e, alice(), pool, &both(1_000_000_000), at(1, 0));
    deposit(&mut e, bob(), pool, &both(1_000_000_000), at(2, 500));
    let Ok(controller) = e.controller(pool) else {
        panic!("pool exists");
    };
    assert_eq!(controller.total_shares(), Dec::from_integer(4_000_000_000));

    // Swap: fees are charged in the input denom, split evenly.
    let out = swap_one(&mut e, pool, Coin::new(BASE, 100_000_000), "uusdc", at(3, 1_000));
    assert_eq!(out, Coin::new("uusdc", 99_974_999));
    assert_eq!(e.bank().balance(&collector(), BASE), 12_499);
    assert_eq!(e.bank().balance(&Address::rewards_account(pool), BASE), 12_499);
    assert_eq!(
        e.liquidity(pool),
        Ok(vec![
            Coin::new(BASE, 2_000_000_000 + 100_000_000 - 24_998),
            Coin::new("uusdc", 2_000_000_000 - 99_974_999),
        ])
    );

    // Alice held for the whole window and owns half the pool.
    let Ok(paid) = e.claim_rewards(&alice(), pool, at(4, 1_500)) else {
        panic!("alice claims");
    };
    assert_eq!(paid, vec![Coin::new(BASE, 6_249)]);
    // Bob joined 500s late: half of the remainder, weighted by 1000/1500.
    let Ok(paid) = e.claim_rewards(&bob(), pool, at(4, 1_500)) else {
        panic!("bob claims");
    };
    assert_eq!(paid, vec![Coin::new(BASE, 2_083)]);
    assert_eq!(
        e.bank().balance(&Address::rewards_account(pool), BASE),
        12_499 - 6_249 - 2_083
    );

    // Alice exits entirely: half the pool, the longest delay.
    let Ok(unbonding) = e.remove_liquidity(&alice(), pool, Dec::HUNDRED, at(5, 2_000)) else {
        panic!("alice exits");
    };
    assert_eq!(unbonding.end_time, T0 + 2_000 + TWENTY_FOUR_HOURS);
    assert_eq!(
        unbonding.amount,
        vec![Coin::new(BASE, 1_049_987_501), Coin::new("uusdc", 950_012_500)]
    );
    assert_eq!(
        e.remove_liquidity(&alice(), pool, Dec::HUNDRED, at(5, 2_001)),
        Err(AmmError::InvalidUnbondAmount("no shares available to unbond"))
    );

    // Nothing matures early.
    assert_eq!(e.end_block(at(6, 2_000 + TWENTY_FOUR_HOURS - 1)), 0);
    let reserve_before = e.bank().balance(&Address::rewards_account(pool), BASE);
    assert_eq!(e.end_block(at(7, 2_000 + TWENTY_FOUR_HOURS)), 1);
    let flushed = reserve_before - e.bank().balance(&Address::rewards_account(pool), BASE);

    assert_eq!(e.bank().balance(&alice(), BASE), 1_049_987_501 + 6_249 + flushed);
    assert_eq!(e.bank().balance(&alice(), "uusdc"), 950_012_500);
    assert!(flushed > 0);
    assert!(e.bonded_positions(&alice(), None).is_empty());
    assert!(e.unbonding_positions(&alice(), None).is_empty());

    let Ok(controller) = e.controller(pool) else {
        panic!("pool exists");
    };
    assert_eq!(controller.total_shares(), Dec::from_integer(2_000_000_000));
    assert!(e.check_invariants().is_ok());

    let Ok(fees) = e.withdraw_protocol_fees(&treasury(), at(8, 2_000 + TWENTY_FOUR_HOURS)) else {
        panic!("fees withdrawn");
    };
    assert_eq!(fees, vec![Coin::new(BASE, 12_499)]);
    assert_eq!(e.bank().balance(&collector(), BASE), 0);
}

#[test]
fn partial_exits_settle_across_positions() {
    init_tracing();
    let mut e = engine();
    let pool = create(&mut e, &flat("uusdc"));
    let both = |n: u128| [Coin::new(BASE, n), Coin::new("uusdc", n)];
    deposit(&mut e, alice(), pool, &both(1_000_000_000), at(1, 0));
    deposit(&mut e, alice(), pool, &both(500_000_000), at(2, 10));
    deposit(&mut e, bob(), pool, &both(500_000_000), at(2, 10));

    // 75% of alice's 3e9 shares spans both of her positions.
    let Ok(u) = e.remove_liquidity(&alice(), pool, Dec::from_integer(75), at(3, 20)) else {
        panic!("exit queued");
    };
    assert_eq!(u.shares, Dec::from_integer(2_250_000_000));
    assert_eq!(e.sweep_unbondings(at(4, 20 + TWENTY_FOUR_HOURS)), 1);

    let remaining = e.bonded_positions(&alice(), Some(pool));
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].0.timestamp, T0 + 10);
    assert_eq!(remaining[0].1.balance, Dec::from_integer(750_000_000));
    assert_eq!(
        e.state().user_total_bonded_shares(pool, alice()),
        Dec::from_integer(750_000_000)
    );
    assert!(e.check_invariants().is_ok());
}

#[test]
fn sweep_cadence_follows_block_interval() {
    let Ok(config) = EngineConfig::new(BASE, collector()) else {
        panic!("valid config");
    };
    let Ok(config) = config.with_unbonding_block_interval(3) else {
        panic!("valid interval");
    };
    let Ok(mut e) = Engine::new(config, MemoryBank::new()) else {
        panic!("engine");
    };
    let pool = create(&mut e, &flat("uusdc"));
    deposit(
        &mut e,
        alice(),
        pool,
        &[Coin::new(BASE, 1_000), Coin::new("uusdc", 1_000)],
        at(1, 0),
    );
    let Ok(_) = e.remove_liquidity(&alice(), pool, Dec::HUNDRED, at(1, 0)) else {
        panic!("exit queued");
    };
    let matured = TWENTY_FOUR_HOURS;
    assert_eq!(e.end_block(at(4, matured)), 0);
    assert_eq!(e.end_block(at(5, matured)), 0);
    assert_eq!(e.end_block(at(6, matured)), 1);
}

// ===========================================================================
// Suite 4: Routing and Pricing
// ===========================================================================

#[test]
fn two_hop_route_with_minimum() {
    let mut e = engine();
    let usdc = create(&mut e, &flat("uusdc"));
    let usdt = create(&mut e, &flat("uusdt"));
    let big = 1_000_000_000_000u128;
    deposit(&mut e, alice(), usdc, &[Coin::new(BASE, big), Coin::new("uusdc", big)], at(1, 0));
    deposit(&mut e, alice(), usdt, &[Coin::new(BASE, big), Coin::new("uusdt", big)], at(1, 0));

    let input = Coin::new("uusdc", 1_000_000);
    let routes = [Route::new(usdc, BASE), Route::new(usdt, "uusdt")];
    fund(&mut e, trader(), std::slice::from_ref(&input));

    let Ok(quoted) = e.simulate_swap(&input, &routes, at(2, 1)) else {
        panic!("simulation succeeds");
    };
    let expected = quoted[1].output().amount();
    assert!(expected > 999_000 && expected < 1_000_000);

    // A minimum one unit above the quote fails and changes nothing.
    let too_high = Coin::new("uusdt", expected + 1);
    let r = e.swap(&trader(), &input, &routes, &too_high, at(2, 1));
    assert!(matches!(r, Err(AmmError::SlippageExceeded(_))));
    assert_eq!(e.bank().balance(&trader(), "uusdc"), 1_000_000);

    let Ok(done) = e.swap(&trader(), &input, &routes, &Coin::new("uusdt", expected), at(2, 1))
    else {
        panic!("swap at quoted minimum");
    };
    assert_eq!(done, quoted);
    assert_eq!(e.bank().balance(&trader(), "uusdt"), expected);
    assert_eq!(e.bank().balance(&trader(), BASE), 0);
}

#[test]
fn rate_multiplier_prices_the_peg() {
    let mut e = engine();
    // One unit of the pair is worth two of the base.
    let pool = create(&mut e, &stableswap("ustake", 2 * ONE, 1_000, 1_000, 0));
    deposit(
        &mut e,
        alice(),
        pool,
        &[Coin::new(BASE, 2_000_000_000), Coin::new("ustake", 1_000_000_000)],
        at(1, 0),
    );

    let out = swap_one(&mut e, pool, Coin::new("ustake", 1_000_000), BASE, at(2, 1));
    assert!(out.amount() > 1_990_000 && out.amount() < 2_000_000, "got {out}");

    let Ok(rates) = e.rates(Some(pool), at(2, 1)) else {
        panic!("rates");
    };
    assert_eq!(rates[0].denom, "ustake");
    assert_eq!(rates[0].vs, BASE);
    assert!(rates[0].price > Dec::from_raw(Dec::SCALE * 19 / 10));
    assert!(rates[1].price < Dec::from_raw(Dec::SCALE * 6 / 10));
}

#[test]
fn deep_pool_at_max_amplification() {
    let mut e = engine();
    let max = stableswap_engine::config::MAX_A;
    let pool = create(&mut e, &stableswap("uusdc", ONE, max, max, 0));
    let side = 1_000_000_000_000_000u128;
    deposit(&mut e, alice(), pool, &[Coin::new(BASE, side), Coin::new("uusdc", side)], at(1, 0));

    let out = swap_one(&mut e, pool, Coin::new(BASE, 1_000_000_000_000), "uusdc", at(2, 1));
    assert!(out.amount() > 999_700_000_000 && out.amount() < 1_000_000_000_000, "got {out}");
    assert!(e.rates(Some(pool), at(2, 1)).is_ok());

    let Ok(exit) = e.remove_liquidity(&alice(), pool, Dec::from_integer(10), at(3, 2)) else {
        panic!("exit queued");
    };
    assert_eq!(exit.amount.len(), 2);
    assert!(e.check_invariants().is_ok());
}

#[test]
fn amplification_ramp_and_update() {
    let mut e = engine();
    let pool = create(&mut e, &stableswap("uusdc", ONE, 100, 1_000, T0 + 1_000));
    let current = |e: &Engine<MemoryBank>, offset: i64| {
        let Ok(a) = e.current_a(pool, T0 + offset) else {
            panic!("pool exists");
        };
        a
    };
    assert_eq!(current(&e, 0), 100 * A_PRECISION);
    assert_eq!(current(&e, 500), 550 * A_PRECISION);
    assert_eq!(current(&e, 1_000), 1_000 * A_PRECISION);

    // Retarget mid-ramp: the new ramp starts from 550.
    let Ok(()) = e.update_pool(pool, &stableswap("uusdc", ONE, 1, 50, T0 + 1_500), at(2, 500))
    else {
        panic!("update");
    };
    assert_eq!(current(&e, 500), 550 * A_PRECISION);
    assert_eq!(current(&e, 1_000), 300 * A_PRECISION);
    assert_eq!(current(&e, 1_500), 50 * A_PRECISION);

    assert!(matches!(
        e.update_pool(pool, &flat("uusdt"), at(3, 600)),
        Err(AmmError::InvalidDenom(_))
    ));
}

#[test]
fn pause_blocks_trading_but_not_exits() {
    let mut e = engine();
    let pool = create(&mut e, &flat("uusdc"));
    let both = [Coin::new(BASE, 1_000_000), Coin::new("uusdc", 1_000_000)];
    deposit(&mut e, alice(), pool, &both, at(1, 0));
    let Ok(()) = e.set_paused(pool, true, at(2, 1)) else {
        panic!("paused");
    };

    fund(&mut e, bob(), &both);
    assert_eq!(
        e.add_liquidity(&bob(), pool, &both, at(2, 1)),
        Err(AmmError::PoolPaused(pool))
    );
    assert!(e.simulate_swap(&Coin::new(BASE, 10), &[Route::new(pool, "uusdc")], at(2, 1)).is_ok());
    assert!(e.remove_liquidity(&alice(), pool, Dec::from_integer(50), at(2, 1)).is_ok());

    let Ok(()) = e.set_paused(pool, false, at(3, 2)) else {
        panic!("resumed");
    };
    assert!(e.add_liquidity(&bob(), pool, &both, at(3, 2)).is_ok());
}

#[test]
fn deposit_cap_limits_base_liquidity() {
    let Ok(config) = EngineConfig::new(BASE, collector()) else {
        panic!("valid config");
    };
    let Ok(mut e) = Engine::new(config.with_max_add_liquidity(1_500), MemoryBank::new()) else {
        panic!("engine");
    };
    let pool = create(&mut e, &flat("uusdc"));
    deposit(
        &mut e,
        alice(),
        pool,
        &[Coin::new(BASE, 1_000), Coin::new("uusdc", 1_000)],
        at(1, 0),
    );
    let extra = [Coin::new(BASE, 501), Coin::new("uusdc", 1)];
    fund(&mut e, bob(), &extra);
    assert!(matches!(
        e.add_liquidity(&bob(), pool, &extra, at(2, 1)),
        Err(AmmError::InvalidQuantity(_))
    ));
    assert_eq!(e.bank().balance(&bob(), BASE), 501);
}
