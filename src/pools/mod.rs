//! Feature-gated pool controllers and the [`Controller`] dispatch enum.
//!
//! Each algorithm lives behind its own Cargo feature flag.  The
//! [`Controller`] enum provides static dispatch across all enabled
//! algorithms without `dyn` trait objects.
//!
//! # Algorithms
//!
//! | Feature | Controller | Style |
//! |---------|------------|-------|
//! | `stableswap` | [`StableswapController`] | Curve StableSwap |

#[cfg(feature = "stableswap")]
pub mod stableswap;

mod controller;

#[cfg(all(test, feature = "stableswap"))]
mod proptest_properties;

pub use controller::Controller;
#[cfg(feature = "stableswap")]
pub use stableswap::StableswapController;
