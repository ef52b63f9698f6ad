//! Core trait abstractions for pool controllers.
//!
//! This module defines the traits every pool algorithm must satisfy:
//! [`SwapController`] for pricing and swaps, [`LiquidityController`] for
//! the bonding lifecycle and rewards, and [`FromConfig`] for
//! configuration-driven construction of pool parameters.

mod from_config;
mod liquidity_controller;
mod swap_controller;

pub use from_config::FromConfig;
pub use liquidity_controller::LiquidityController;
pub use swap_controller::SwapController;
