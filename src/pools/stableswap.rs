//! StableSwap controller (Curve style, two assets).
//!
//! # Mathematical Model
//!
//! Balances are first normalised by their rate multipliers
//! (`xp = raw × rate / 10^18`) so that assets of different intrinsic value
//! share one invariant `D`.  A swap of `dx` computes
//!
//! ```text
//! D   = calculate_invariant(xp, A)
//! y   = get_y(xp[in] + dx × rate_in / 10^18, A, D)
//! dy  = xp[out] − y
//! ```
//!
//! then carves the fee out of `dy` and converts the remainder back to raw
//! output units with `rate_out`.  The fee itself is charged in the input
//! denom: its adjusted value is converted with `rate_in` and paid out of the
//! coins the trader just sent in.
//!
//! # Liquidity Model
//!
//! Deposits mint `total × (D1 − D0) / D0` shares (`D1` for the first
//! deposit).  Withdrawals are two-phase: `remove_liquidity` fixes the
//! payout and queues the shares behind a weighted delay, and the sweep
//! settles them once matured.
//!
//! # Rewards
//!
//! The rewards fee of every swap accumulates in the pool's rewards
//! account.  A claim pays each bonded position
//! `reserve × balance / total × held / since_start`.

use tracing::{debug, error, info};

use crate::config::StableswapConfig;
use crate::context::Context;
use crate::domain::{
    Address, BondedPosition, Coin, Dec, Pool, Rate, StableswapPool, SwapCommitment,
    UnbondingPosition,
};
use crate::error::AmmError;
use crate::math::{
    calculate_invariant, compute_unbonding_period, get_a, get_y, CheckedArithmetic, A_PRECISION,
    FEE_DENOMINATOR, PRECISION,
};
use crate::state::{Bank, BondedKey, UnbondingKey};
use crate::traits::{FromConfig, LiquidityController, SwapController};

/// Input size used to quote rates: one whole unit of a six-decimal denom.
pub const RATE_QUOTE_AMOUNT: i128 = 1_000_000;

/// How a reward payout treats a zero-length accrual window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EmptyWindow {
    /// Fail with [`AmmError::PeriodTooShort`].
    Reject,
    /// Leave the empty window out of the payout.
    Skip,
}

/// StableSwap pricing and liquidity controller for one pool.
///
/// Holds a copy of the pool header and parameters; every mutating call
/// writes the parameters back to [`State`](crate::state::State).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StableswapController {
    pool: Pool,
    params: StableswapPool,
}

impl StableswapController {
    /// Wraps a pool header and its StableSwap parameters.
    #[must_use]
    pub const fn new(pool: Pool, params: StableswapPool) -> Self {
        Self { pool, params }
    }

    /// Returns the StableSwap parameters.
    #[must_use]
    pub const fn params(&self) -> &StableswapPool {
        &self.params
    }

    /// Amplification at `now`, scaled by [`A_PRECISION`].
    #[must_use]
    pub fn current_a(&self, now: i64) -> u128 {
        get_a(
            self.params.initial_a,
            self.params.future_a,
            self.params.initial_a_time,
            self.params.future_a_time,
            now,
        )
    }

    fn index_of(&self, denom: &str) -> Option<usize> {
        self.params
            .rate_multipliers
            .iter()
            .position(|m| m.denom == denom)
    }

    fn rate(&self, index: usize) -> Result<i128, AmmError> {
        i128::try_from(self.params.rate_multipliers[index].rate)
            .map_err(|_| AmmError::Overflow("rate multiplier exceeds decimal range"))
    }

    fn raw_balances<B: Bank>(&self, bank: &B) -> [u128; 2] {
        let [base, pair] = &self.params.rate_multipliers;
        [
            bank.balance(&self.pool.address, &base.denom),
            bank.balance(&self.pool.address, &pair.denom),
        ]
    }

    fn adjust(&self, raw: u128, index: usize) -> Result<Dec, AmmError> {
        Dec::checked_from_integer(raw)
            .ok_or(AmmError::Overflow("balance exceeds decimal range"))?
            .safe_mul_ratio(self.rate(index)?, PRECISION as i128)
    }

    fn adjusted(&self, raw: &[u128; 2]) -> Result<[Dec; 2], AmmError> {
        Ok([self.adjust(raw[0], 0)?, self.adjust(raw[1], 1)?])
    }

    fn to_raw(&self, adjusted: Dec, index: usize) -> Result<u128, AmmError> {
        adjusted
            .safe_mul_ratio(PRECISION as i128, self.rate(index)?)?
            .to_u128_truncated()
            .ok_or(AmmError::Underflow("negative swap amount"))
    }

    fn persist<B>(&self, ctx: &mut Context<'_, B>) {
        ctx.state.set_stableswap_pool(self.pool.id, self.params.clone());
    }

    /// Prices `input` against explicit raw `balances`.
    ///
    /// `amp` is the already interpolated amplification and `rewards_fee`
    /// the fee rate over [`FEE_DENOMINATOR`]; passing zero quotes the
    /// fee-less trade.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidDenom`] if either denom is foreign to the pool.
    /// - [`AmmError::InvalidRoute`] if both denoms are the same.
    /// - [`AmmError::EmptyPool`] if either balance is zero.
    /// - [`AmmError::InvalidQuantity`] if the input or the output is zero.
    /// - Solver errors from [`calculate_invariant`] and [`get_y`].
    pub fn quote(
        &self,
        balances: &[u128; 2],
        input: &Coin,
        denom_to: &str,
        amp: u128,
        rewards_fee: u64,
    ) -> Result<SwapCommitment, AmmError> {
        let i = self
            .index_of(input.denom())
            .ok_or(AmmError::InvalidDenom("input denom is not part of the pool"))?;
        let j = self
            .index_of(denom_to)
            .ok_or(AmmError::InvalidDenom("output denom is not part of the pool"))?;
        if i == j {
            return Err(AmmError::InvalidRoute("cannot swap a denom for itself"));
        }
        input.validate_positive()?;
        if balances[0] == 0 || balances[1] == 0 {
            return Err(AmmError::EmptyPool);
        }

        let xp = self.adjusted(balances)?;
        let d = calculate_invariant(&xp, amp)?;
        let x = xp[i].safe_add(&self.adjust(input.amount(), i)?)?;
        let y = get_y(x, amp, d)?;
        let dy = xp[j].safe_sub(&y)?;
        if !dy.is_positive() {
            return Err(AmmError::InvalidQuantity("swap output is zero"));
        }

        let mut fee = dy.safe_mul_ratio(i128::from(rewards_fee), i128::from(FEE_DENOMINATOR))?;
        if self.params.max_fee.is_positive() {
            fee = fee.min(self.params.max_fee);
        }
        let protocol = fee.safe_mul_ratio(i128::from(self.params.protocol_fee_percentage), 100)?;
        let rewards = fee.safe_sub(&protocol)?;
        let out = dy.safe_sub(&protocol)?.safe_sub(&rewards)?;

        SwapCommitment::new(
            self.pool.id,
            input.clone(),
            Coin::new(denom_to, self.to_raw(out, j)?),
            Coin::new(input.denom(), self.to_raw(protocol, i)?),
            Coin::new(input.denom(), self.to_raw(rewards, i)?),
        )
    }

    /// Applies new fee, ramp and rate parameters.
    ///
    /// The new ramp starts from the amplification in force at `now`, so `A`
    /// never jumps.  The pool's denoms cannot change.
    ///
    /// # Errors
    ///
    /// - Any validation error from [`StableswapConfig::validate`].
    /// - [`AmmError::InvalidDenom`] if the rate multipliers name other denoms.
    pub fn update_params<B: Bank + Clone>(
        &mut self,
        ctx: &mut Context<'_, B>,
        config: &StableswapConfig,
    ) -> Result<(), AmmError> {
        config.validate()?;
        let same_denoms = self
            .params
            .rate_multipliers
            .iter()
            .zip(config.rate_multipliers())
            .all(|(old, new)| old.denom == new.denom);
        if !same_denoms {
            return Err(AmmError::InvalidDenom("pool denoms are immutable"));
        }

        let now = ctx.now();
        let current = u64::try_from(self.current_a(now) / A_PRECISION)
            .map_err(|_| AmmError::Overflow("amplification exceeds u64"))?;

        self.params.protocol_fee_percentage = config.protocol_fee_percentage();
        self.params.rewards_fee = config.rewards_fee();
        self.params.max_fee = config.max_fee();
        self.params.initial_a = current;
        self.params.initial_a_time = now;
        self.params.future_a = config.future_a();
        self.params.future_a_time = config.future_a_time();
        self.params.rate_multipliers = config.rate_multipliers().clone();
        self.persist(ctx);

        info!(
            pool_id = self.pool.id,
            initial_a = current,
            future_a = config.future_a(),
            future_a_time = config.future_a_time(),
            "pool parameters updated"
        );
        Ok(())
    }

    /// Pauses or resumes swaps and deposits.
    pub fn set_paused<B>(&mut self, ctx: &mut Context<'_, B>, paused: bool) {
        self.pool.paused = paused;
        ctx.state.set_pool(self.pool.clone());
        info!(pool_id = self.pool.id, paused, "pool pause flag changed");
    }

    /// Pays `provider` its time-weighted share of the rewards account and
    /// restarts the reward window of every paid position.
    ///
    /// With [`EmptyWindow::Skip`] a position opened this block is left out
    /// instead of failing the whole payout, and a pool whose reward clock
    /// started this block pays nothing.
    fn pay_rewards<B: Bank + Clone>(
        &self,
        ctx: &mut Context<'_, B>,
        provider: &Address,
        empty: EmptyWindow,
    ) -> Result<Vec<Coin>, AmmError> {
        let pool_id = self.pool.id;
        let now = ctx.now();
        let total = self.params.total_shares;
        let mut positions = self.bonded_of(ctx, *provider);
        if positions.is_empty() || !total.is_positive() {
            return Ok(Vec::new());
        }

        let since_start = now.saturating_sub(self.params.initial_rewards_time);
        if since_start <= 0 {
            return match empty {
                EmptyWindow::Reject => {
                    Err(AmmError::PeriodTooShort("pool reward clock started this block"))
                }
                EmptyWindow::Skip => Ok(Vec::new()),
            };
        }
        if empty == EmptyWindow::Skip {
            positions.retain(|(_, p)| now > p.rewards_period_start);
        }
        let mut windows = Vec::with_capacity(positions.len());
        for (_, position) in &positions {
            let held = now.saturating_sub(position.rewards_period_start);
            if held <= 0 {
                return Err(AmmError::PeriodTooShort("position reward window is empty"));
            }
            windows.push(held);
        }

        let rewards_account = self.pool.rewards_address();
        let mut payout = Vec::new();
        for multiplier in &self.params.rate_multipliers {
            let reserve_amount = ctx.bank.balance(&rewards_account, &multiplier.denom);
            if reserve_amount == 0 {
                continue;
            }
            let reserve = Dec::checked_from_integer(reserve_amount)
                .ok_or(AmmError::Overflow("rewards exceed decimal range"))?;
            let mut owed = Dec::ZERO;
            for ((_, position), held) in positions.iter().zip(&windows) {
                let share = reserve
                    .safe_mul_ratio(position.balance.raw(), total.raw())?
                    .safe_mul_ratio(i128::from(*held), i128::from(since_start))?;
                owed = owed.safe_add(&share)?;
            }
            let amount = owed
                .to_u128_truncated()
                .ok_or(AmmError::Underflow("negative reward"))?
                .min(reserve_amount);
            if amount > 0 {
                payout.push(Coin::new(multiplier.denom.clone(), amount));
            }
        }

        if !payout.is_empty() {
            ctx.bank.transfer(&rewards_account, provider, &payout)?;
        }
        for (key, mut position) in positions {
            position.rewards_period_start = now;
            ctx.state.set_bonded_position(key, position);
        }

        debug!(pool_id, provider = %provider, coins = payout.len(), "rewards claimed");
        Ok(payout)
    }

    fn bonded_of<B>(&self, ctx: &Context<'_, B>, provider: Address) -> Vec<(BondedKey, BondedPosition)> {
        ctx.state
            .bonded_positions_by_provider(self.pool.id, provider)
            .map(|(k, p)| (*k, p.clone()))
            .collect()
    }
}

impl FromConfig<StableswapConfig> for StableswapPool {
    /// Builds fresh parameters: no shares, clocks at zero.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`StableswapConfig::validate`].
    fn from_config(config: &StableswapConfig) -> Result<Self, AmmError> {
        config.validate()?;
        Ok(Self {
            protocol_fee_percentage: config.protocol_fee_percentage(),
            rewards_fee: config.rewards_fee(),
            max_fee: config.max_fee(),
            initial_a: config.initial_a(),
            future_a: config.future_a(),
            initial_a_time: 0,
            future_a_time: config.future_a_time(),
            rate_multipliers: config.rate_multipliers().clone(),
            total_shares: Dec::ZERO,
            initial_rewards_time: 0,
        })
    }
}

impl SwapController for StableswapController {
    fn pool(&self) -> &Pool {
        &self.pool
    }

    fn liquidity<B: Bank>(&self, bank: &B) -> Vec<Coin> {
        let balances = self.raw_balances(bank);
        self.params
            .rate_multipliers
            .iter()
            .zip(balances)
            .map(|(m, amount)| Coin::new(m.denom.clone(), amount))
            .collect()
    }

    fn simulate_swap<B: Bank>(
        &self,
        bank: &B,
        input: &Coin,
        denom_to: &str,
        now: i64,
    ) -> Result<SwapCommitment, AmmError> {
        self.quote(
            &self.raw_balances(bank),
            input,
            denom_to,
            self.current_a(now),
            self.params.rewards_fee,
        )
    }

    /// Moves `input` into the pool, the output to `signer`, the protocol
    /// fee to the collector and the rewards fee to the rewards account.
    fn swap<B: Bank + Clone>(
        &mut self,
        ctx: &mut Context<'_, B>,
        signer: &Address,
        input: &Coin,
        denom_to: &str,
    ) -> Result<SwapCommitment, AmmError> {
        if self.pool.paused {
            return Err(AmmError::PoolPaused(self.pool.id));
        }
        let commitment = self.simulate_swap(&*ctx.bank, input, denom_to, ctx.now())?;

        let pool_address = self.pool.address;
        ctx.bank
            .transfer(signer, &pool_address, core::slice::from_ref(commitment.input()))?;
        ctx.bank
            .transfer(&pool_address, signer, core::slice::from_ref(commitment.output()))?;
        if !commitment.protocol_fee().is_zero() {
            ctx.bank.transfer(
                &pool_address,
                &ctx.config.protocol_fee_collector(),
                core::slice::from_ref(commitment.protocol_fee()),
            )?;
        }
        if !commitment.rewards_fee().is_zero() {
            ctx.bank.transfer(
                &pool_address,
                &self.pool.rewards_address(),
                core::slice::from_ref(commitment.rewards_fee()),
            )?;
        }

        debug!(
            pool_id = self.pool.id,
            signer = %signer,
            input = %commitment.input(),
            output = %commitment.output(),
            protocol_fee = %commitment.protocol_fee(),
            rewards_fee = %commitment.rewards_fee(),
            "swap executed"
        );
        Ok(commitment)
    }

    fn rates<B: Bank>(&self, bank: &B, now: i64) -> Result<Vec<Rate>, AmmError> {
        let balances = self.raw_balances(bank);
        let amp = self.current_a(now);
        let [base, pair] = &self.params.rate_multipliers;

        let mut rates = Vec::with_capacity(2);
        for (from, to) in [(pair, base), (base, pair)] {
            let unit = Coin::new(from.denom.clone(), RATE_QUOTE_AMOUNT.unsigned_abs());
            let quoted = self.quote(&balances, &unit, &to.denom, amp, 0)?;
            let price = Dec::checked_from_integer(quoted.output().amount())
                .ok_or(AmmError::Overflow("rate exceeds decimal range"))?
                .checked_quo_int(RATE_QUOTE_AMOUNT)
                .ok_or(AmmError::DivisionByZero)?;
            rates.push(Rate {
                pool_id: self.pool.id,
                denom: from.denom.clone(),
                vs: to.denom.clone(),
                price,
            });
        }
        Ok(rates)
    }
}

impl LiquidityController for StableswapController {
    fn add_liquidity<B: Bank + Clone>(
        &mut self,
        ctx: &mut Context<'_, B>,
        provider: &Address,
        coins: &[Coin],
    ) -> Result<BondedPosition, AmmError> {
        let pool_id = self.pool.id;
        if self.pool.paused {
            return Err(AmmError::PoolPaused(pool_id));
        }
        if coins.is_empty() {
            return Err(AmmError::InvalidQuantity("no coins deposited"));
        }
        let mut deposit = [0u128; 2];
        for coin in coins {
            coin.validate_positive()?;
            let index = self
                .index_of(coin.denom())
                .ok_or(AmmError::InvalidDenom("deposit denom is not part of the pool"))?;
            if deposit[index] != 0 {
                return Err(AmmError::InvalidDenom("deposit lists a denom twice"));
            }
            deposit[index] = coin.amount();
        }

        let now = ctx.now();
        let key = BondedKey::new(pool_id, *provider, now);
        if ctx.state.has_bonded_position(&key) {
            return Err(AmmError::DuplicateBondedPosition);
        }

        let before = self.raw_balances(&*ctx.bank);
        let after = [
            before[0]
                .checked_add(deposit[0])
                .ok_or(AmmError::Overflow("pool balance overflow"))?,
            before[1]
                .checked_add(deposit[1])
                .ok_or(AmmError::Overflow("pool balance overflow"))?,
        ];
        if after[0] == 0 || after[1] == 0 {
            return Err(AmmError::InvalidQuantity("pool liquidity must cover both denoms"));
        }
        let cap = ctx.config.max_add_liquidity();
        if cap > 0 && after[0] > cap {
            return Err(AmmError::InvalidQuantity("deposit exceeds the pool liquidity cap"));
        }

        let amp = self.current_a(now);
        let d0 = calculate_invariant(&self.adjusted(&before)?, amp)?;
        let d1 = calculate_invariant(&self.adjusted(&after)?, amp)?;
        if d1 <= d0 {
            error!(pool_id, d0 = %d0, d1 = %d1, "deposit did not increase the invariant");
            return Err(AmmError::InvariantNotIncreasing);
        }

        let total = self.params.total_shares;
        let minted = if total.is_positive() && d0.is_positive() {
            total.safe_mul_ratio(d1.safe_sub(&d0)?.raw(), d0.raw())?
        } else {
            d1
        };
        if !minted.is_positive() {
            return Err(AmmError::InvalidQuantity("deposit mints no shares"));
        }

        ctx.bank.transfer(provider, &self.pool.address, coins)?;

        let position = BondedPosition::new(minted, now);
        ctx.state.set_bonded_position(key, position.clone());
        ctx.state
            .adjust_user_total_bonded_shares(pool_id, *provider, minted)?;
        if total.is_zero() {
            // Liquidity returns from zero: restart the reward clock.
            self.params.initial_rewards_time = now;
        }
        self.params.total_shares = total.safe_add(&minted)?;
        self.persist(ctx);

        info!(pool_id, provider = %provider, shares = %minted, "liquidity added");
        Ok(position)
    }

    fn remove_liquidity<B: Bank + Clone>(
        &mut self,
        ctx: &mut Context<'_, B>,
        provider: &Address,
        percentage: Dec,
    ) -> Result<UnbondingPosition, AmmError> {
        if percentage.is_negative() || percentage > Dec::HUNDRED {
            return Err(AmmError::InvalidPercentage("percentage must be within [0, 100]"));
        }
        let pool_id = self.pool.id;
        let now = ctx.now();

        let available = ctx
            .state
            .user_total_bonded_shares(pool_id, *provider)
            .safe_sub(&ctx.state.user_total_unbonding_shares(pool_id, *provider))?;
        let shares = available.safe_mul_ratio(percentage.raw(), Dec::HUNDRED.raw())?;
        if !shares.is_positive() {
            return Err(AmmError::InvalidUnbondAmount("no shares available to unbond"));
        }

        let total = self.params.total_shares;
        let balances = self.raw_balances(&*ctx.bank);
        let mut amount = Vec::with_capacity(2);
        for (multiplier, raw) in self.params.rate_multipliers.iter().zip(balances) {
            let owed = Dec::checked_from_integer(raw)
                .ok_or(AmmError::Overflow("balance exceeds decimal range"))?
                .safe_mul_ratio(shares.raw(), total.raw())?
                .truncate_int();
            if owed > 0 {
                amount.push(Coin::new(multiplier.denom.clone(), owed.unsigned_abs()));
            }
        }

        let period = compute_unbonding_period(total, shares)?;
        let end_time = now
            .checked_add(period)
            .ok_or(AmmError::Overflow("unbonding end time overflow"))?;
        let key = UnbondingKey::new(end_time, *provider, pool_id);
        if ctx.state.has_unbonding_position(&key) {
            return Err(AmmError::DuplicateUnbondingKey);
        }

        let position = UnbondingPosition {
            shares,
            amount,
            end_time,
        };
        ctx.state.set_unbonding_position(key, position.clone());
        ctx.state.adjust_pool_total_unbonding_shares(pool_id, shares)?;
        ctx.state
            .adjust_user_total_unbonding_shares(pool_id, *provider, shares)?;

        info!(
            pool_id,
            provider = %provider,
            shares = %shares,
            end_time,
            "liquidity queued for unbonding"
        );
        Ok(position)
    }

    fn settle_unbonding<B: Bank + Clone>(
        &mut self,
        ctx: &mut Context<'_, B>,
        key: &UnbondingKey,
        position: &UnbondingPosition,
    ) -> Result<(), AmmError> {
        let pool_id = self.pool.id;
        let provider = key.provider;

        let payout: Vec<Coin> = position
            .amount
            .iter()
            .filter(|c| !c.is_zero())
            .cloned()
            .collect();
        if !payout.is_empty() {
            ctx.bank.transfer(&self.pool.address, &provider, &payout)?;
        }

        // Rewards accrue on the pre-settlement balances.
        self.pay_rewards(ctx, &provider, EmptyWindow::Skip)?;

        let shares = position.shares;
        let mut remaining = shares;
        for (bonded_key, mut bonded) in self.bonded_of(ctx, provider) {
            if !remaining.is_positive() {
                break;
            }
            if bonded.balance <= remaining {
                remaining = remaining.safe_sub(&bonded.balance)?;
                ctx.state.remove_bonded_position(&bonded_key);
            } else {
                bonded.balance = bonded.balance.safe_sub(&remaining)?;
                remaining = Dec::ZERO;
                ctx.state.set_bonded_position(bonded_key, bonded);
            }
        }
        if remaining.is_positive() {
            error!(
                pool_id,
                provider = %provider,
                shares = %shares,
                missing = %remaining,
                "bonded balances cannot cover settled shares"
            );
            return Err(AmmError::UnderflowMismatch(
                "bonded balances cannot cover the settled shares",
            ));
        }

        let burned = Dec::ZERO.safe_sub(&shares)?;
        self.params.total_shares = self.params.total_shares.safe_sub(&shares)?;
        if self.params.total_shares.is_negative() {
            return Err(AmmError::UnderflowMismatch("pool total shares turned negative"));
        }
        ctx.state.adjust_pool_total_unbonding_shares(pool_id, burned)?;
        ctx.state
            .adjust_user_total_bonded_shares(pool_id, provider, burned)?;
        ctx.state
            .adjust_user_total_unbonding_shares(pool_id, provider, burned)?;
        ctx.state.remove_unbonding_position(key);
        self.persist(ctx);

        info!(pool_id, provider = %provider, shares = %shares, "unbonding settled");
        Ok(())
    }

    fn claim_rewards<B: Bank + Clone>(
        &mut self,
        ctx: &mut Context<'_, B>,
        provider: &Address,
    ) -> Result<Vec<Coin>, AmmError> {
        self.pay_rewards(ctx, provider, EmptyWindow::Reject)
    }

    fn total_shares(&self) -> Dec {
        self.params.total_shares
    }
}
