//! StableSwap engine walkthrough.
//!
//! Registers a USDN/USDC pool, bonds liquidity from two providers, routes
//! a swap, distributes the rewards fee, and settles an exit through the
//! end-of-block sweep.
//!
//! # Run
//!
//! ```bash
//! RUST_LOG=debug cargo run --example stableswap
//! ```

use stableswap_engine::config::{EngineConfig, PoolConfig, StableswapConfig};
use stableswap_engine::domain::{Address, BlockInfo, Coin, Dec, RateMultiplier, Route};
use stableswap_engine::engine::Engine;
use stableswap_engine::math::{A_PRECISION, TWENTY_FOUR_HOURS};
use stableswap_engine::state::{Bank, MemoryBank};

const ONE: u128 = 1_000_000_000_000_000_000;
const GENESIS: i64 = 1_700_000_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== StableSwap engine ===\n");

    let alice = Address::from_bytes([1u8; 32]);
    let bob = Address::from_bytes([2u8; 32]);
    let trader = Address::from_bytes([3u8; 32]);
    let collector = Address::from_bytes([0xfe; 32]);

    // ── 1. Fund accounts ────────────────────────────────────────────────
    let mut bank = MemoryBank::new();
    for who in [alice, bob] {
        bank.credit(&who, &Coin::new("uusdn", 10_000_000_000))?;
        bank.credit(&who, &Coin::new("uusdc", 10_000_000_000))?;
    }
    bank.credit(&trader, &Coin::new("uusdn", 500_000_000))?;

    // ── 2. Engine: sweep unbondings every 10 blocks ─────────────────────
    let config = EngineConfig::new("uusdn", collector)?.with_unbonding_block_interval(10)?;
    let mut engine = Engine::new(config, bank)?;

    // ── 3. Register the pool ────────────────────────────────────────────
    //    A ramps from 200 to 1000 over the first hour.
    //    rewards_fee = 4 · 10^6 / 10^10 = 0.04%, half to the protocol.
    let pool_config = PoolConfig::Stableswap(StableswapConfig::new(
        50,
        4_000_000,
        Dec::ZERO,
        200,
        1_000,
        GENESIS + 3_600,
        [
            RateMultiplier::new("uusdn", ONE),
            RateMultiplier::new("uusdc", ONE),
        ],
    )?);
    let pool = engine.create_pool(&pool_config, BlockInfo::new(1, GENESIS))?;
    println!("Pool {pool} registered ({pool_config})");

    // ── 4. Bond liquidity ───────────────────────────────────────────────
    let coins = [
        Coin::new("uusdn", 5_000_000_000),
        Coin::new("uusdc", 5_000_000_000),
    ];
    let a = engine.add_liquidity(&alice, pool, &coins, BlockInfo::new(2, GENESIS + 6))?;
    let b = engine.add_liquidity(&bob, pool, &coins, BlockInfo::new(3, GENESIS + 600))?;
    println!("\nAlice bonded {} shares, Bob bonded {} shares", a.balance, b.balance);

    // ── 5. Swap ─────────────────────────────────────────────────────────
    let block = BlockInfo::new(4, GENESIS + 1_800);
    let a_now = engine.current_a(pool, block.time)?;
    println!("\nAmplification at t+1800s: {}", a_now / A_PRECISION);

    let input = Coin::new("uusdn", 500_000_000);
    let routes = [Route::new(pool, "uusdc")];
    let quote = engine.simulate_swap(&input, &routes, block)?;
    let expected = quote[0].output().clone();
    let swaps = engine.swap(&trader, &input, &routes, &expected, block)?;
    let swap = &swaps[0];
    println!("\n--- Swap {input} ---");
    println!("  Output:        {}", swap.output());
    println!("  Protocol fee:  {}", swap.protocol_fee());
    println!("  Rewards fee:   {}", swap.rewards_fee());

    for rate in engine.rates(Some(pool), block)? {
        println!("  Rate:          {rate}");
    }

    // ── 6. Rewards ──────────────────────────────────────────────────────
    let block = BlockInfo::new(5, GENESIS + 3_600);
    for (name, who) in [("Alice", alice), ("Bob", bob)] {
        let paid = engine.claim_rewards(&who, pool, block)?;
        println!("\n{name} claimed {paid:?}");
    }

    // ── 7. Exit through the sweep ───────────────────────────────────────
    let unbonding = engine.remove_liquidity(&bob, pool, Dec::HUNDRED, block)?;
    println!(
        "\nBob unbonds {} shares until t+{}s, receiving {:?}",
        unbonding.shares,
        unbonding.end_time - GENESIS,
        unbonding.amount
    );

    let matured = BlockInfo::new(20, unbonding.end_time.max(GENESIS + 3_600 + TWENTY_FOUR_HOURS));
    let settled = engine.end_block(matured);
    println!("End block {}: settled {settled} unbonding(s)", matured.height);
    println!(
        "Bob now holds {} uusdn and {} uusdc",
        engine.bank().balance(&bob, "uusdn"),
        engine.bank().balance(&bob, "uusdc")
    );

    // ── 8. Protocol fees ────────────────────────────────────────────────
    let treasury = Address::from_bytes([0xfd; 32]);
    let fees = engine.withdraw_protocol_fees(&treasury, matured)?;
    println!("\nProtocol fees withdrawn: {fees:?}");

    engine.check_invariants()?;
    println!("\n=== Done ===");
    Ok(())
}
