//! # StableSwap Engine
//!
//! Deterministic StableSwap AMM engine: pool registry, Curve-style pricing
//! with rate multipliers, bonded liquidity with weighted unbonding delays,
//! and time-weighted distribution of swap fees to liquidity providers.
//!
//! Every operation is a pure function of the stored state, the bank
//! balances and the [`BlockInfo`](domain::BlockInfo) passed in by the host.
//! There is no floating point, no wall clock and no global store, so two
//! replicas applying the same calls reach byte-identical state.
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `stableswap` | yes | StableSwap controller (required) |
//!
//! # Quick Start
//!
//! ```rust
//! use stableswap_engine::config::{EngineConfig, PoolConfig, StableswapConfig};
//! use stableswap_engine::domain::{Address, BlockInfo, Coin, Dec, RateMultiplier, Route};
//! use stableswap_engine::engine::Engine;
//! use stableswap_engine::state::MemoryBank;
//!
//! const ONE: u128 = 1_000_000_000_000_000_000;
//! let provider = Address::from_bytes([1u8; 32]);
//! let trader = Address::from_bytes([2u8; 32]);
//!
//! // 1. Engine paired against "uusdn", fees collected by a fixed account
//! let config = EngineConfig::new("uusdn", Address::from_bytes([9u8; 32])).expect("valid");
//! let mut bank = MemoryBank::new();
//! bank.credit(&provider, &Coin::new("uusdn", 1_000_000_000)).expect("credit");
//! bank.credit(&provider, &Coin::new("uusdc", 1_000_000_000)).expect("credit");
//! bank.credit(&trader, &Coin::new("uusdn", 100_000_000)).expect("credit");
//! let mut engine = Engine::new(config, bank).expect("engine");
//!
//! // 2. A = 1000, 0.025% fee, half of it to the protocol
//! let pool = PoolConfig::Stableswap(
//!     StableswapConfig::new(
//!         50,
//!         2_500_000,
//!         Dec::ZERO,
//!         1_000,
//!         1_000,
//!         0,
//!         [RateMultiplier::new("uusdn", ONE), RateMultiplier::new("uusdc", ONE)],
//!     )
//!     .expect("valid pool"),
//! );
//! let block = BlockInfo::new(1, 1_700_000_000);
//! let pool_id = engine.create_pool(&pool, block).expect("pool created");
//!
//! // 3. Bond liquidity, then swap against it
//! let coins = [Coin::new("uusdn", 1_000_000_000), Coin::new("uusdc", 1_000_000_000)];
//! engine.add_liquidity(&provider, pool_id, &coins, block).expect("deposit");
//!
//! let swaps = engine
//!     .swap(
//!         &trader,
//!         &Coin::new("uusdn", 100_000_000),
//!         &[Route::new(pool_id, "uusdc")],
//!         &Coin::new("uusdc", 99_000_000),
//!         BlockInfo::new(2, 1_700_000_006),
//!     )
//!     .expect("swap succeeded");
//!
//! assert_eq!(swaps[0].output().amount(), 99_974_999);
//! assert_eq!(swaps[0].total_fee(), 24_998);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │    Host      │  supplies BlockInfo, owns the Bank
//! └──────┬──────┘
//!        │ Engine::{swap, add_liquidity, end_block, …}
//!        ▼
//! ┌─────────────┐
//! │   Engine     │  route checks, atomic Context, unbonding sweep
//! └──────┬──────┘
//!        │ Controller (enum dispatch)
//!        ▼
//! ┌─────────────┐
//! │ Controllers  │  StableswapController: pricing, bonding, rewards
//! └──────┬──────┘
//!        │ math + State + Bank
//!        ▼
//! ┌─────────────┐
//! │   Domain     │  Dec, Coin, Pool, BondedPosition, SwapCommitment, …
//! └─────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types and records: [`Dec`](domain::Dec), [`Coin`](domain::Coin), [`Pool`](domain::Pool), positions |
//! | [`traits`] | Controller seams: [`SwapController`](traits::SwapController), [`LiquidityController`](traits::LiquidityController), [`FromConfig`](traits::FromConfig) |
//! | [`config`] | [`EngineConfig`](config::EngineConfig) and the [`PoolConfig`](config::PoolConfig) blueprints |
//! | [`pools`]  | Feature-gated controllers and the [`Controller`](pools::Controller) dispatch enum |
//! | [`factory`] | [`DefaultPoolFactory`](factory::DefaultPoolFactory) for config-driven pool registration |
//! | [`state`]  | Keyed record store, running aggregates and the [`Bank`](state::Bank) seam |
//! | [`engine`] | [`Engine`](engine::Engine): the host-facing entry points |
//! | [`math`]   | Checked arithmetic, amplification ramp, invariant solvers, unbonding periods |
//! | [`error`]  | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports for common types and traits |

#[cfg(not(feature = "stableswap"))]
compile_error!("at least one pool algorithm feature must be enabled (\"stableswap\")");

pub mod config;
pub mod context;
pub mod domain;
pub mod engine;
pub mod error;
pub mod factory;
pub mod math;
pub mod pools;
pub mod prelude;
pub mod state;
pub mod traits;
