#![allow(unexpected_cfgs)]
#![allow(deprecated)]

use anchor_lang::prelude::*;
pub mod constants;
pub mod errors;
pub mod events;
mod instructions;
pub mod peg;
pub mod state;
mod utils;

use instructions::*;
use peg::{OperationOutcome, OperationStats, PathStats, PegStatus};
use state::{GrowthAccrual, PathPoint, RoleType, SupplyAction, TargetingMode};

#[cfg(feature = "devnet")]
declare_id!("PegDev1UzGdkyfUuCvpzYCkoXQbB7DcqRwhyKfu8wEH");
#[cfg(feature = "testnet")]
declare_id!("PegTst6hBvrkZ4PpXaGUqJ7bRUzdNc9nNPQk1X3yGSm");
#[cfg(feature = "mainnet")]
declare_id!("PegMn4x5R9yfXcL2bhCUHtD6ejjNjTVi8p7Gva3KWqe");
#[cfg(not(any(feature = "mainnet", feature = "devnet", feature = "testnet")))]
declare_id!("9Sd8ScvUW5hF2q1LQNdkfHxGcg5ywK4m1xXW5zpEgtDB");

#[program]
pub mod peg_engine {
    use super::*;

    /// Initialize the peg engine state and price path
    ///
    /// Sets up the engine with default targeting parameters, the given targeting mode,
    /// the Pyth feed ids and the supply cap. The genesis path point is the initial
    /// target price at the current timestamp.
    /// Signer must have the ADMIN_ROLE_PEG_ENGINE role
    pub fn initialize_peg_engine(
        ctx: Context<InitializePegEngine>,
        initial_target_price: u128,
        targeting_mode: TargetingMode,
        fait_feed_id: [u8; 32],
        ngdp_feed_id: [u8; 32],
        max_supply: u64,
    ) -> Result<()> {
        ctx.accounts.initialize_peg_engine(
            initial_target_price,
            targeting_mode,
            fait_feed_id,
            ngdp_feed_id,
            max_supply,
            &ctx.bumps,
        )
    }

    /// Grants the specified role to a user
    /// The signer must be the upgrade authority of the program
    pub fn grant_role(ctx: Context<GrantRole>, role: RoleType, user: Pubkey) -> Result<()> {
        ctx.accounts.grant_role(role, user, &ctx.bumps)
    }

    /// Revokes the specified role from a user
    /// The signer must be the upgrade authority of the program
    pub fn revoke_role(ctx: Context<RevokeRole>, _role: RoleType) -> Result<()> {
        ctx.accounts.revoke_role()
    }

    /// Advance the price path if due, then mint into or burn from the treasury
    /// toward the gap-adjusted target
    ///
    /// Within peg tolerance no supply operation runs and the rate limit budget is
    /// not consumed.
    /// Signer must have the OPERATOR_ROLE_PEG_ENGINE role
    pub fn maintain_peg(ctx: Context<MaintainPeg>) -> Result<OperationOutcome> {
        ctx.accounts.maintain_peg()
    }

    /// Append every elapsed period to the price path without any supply operation
    /// Signer must have the OPERATOR_ROLE_PEG_ENGINE role
    pub fn update_path(ctx: Context<UpdatePath>) -> Result<()> {
        ctx.accounts.update_path()
    }

    /// Mint or burn an explicit amount with a recorded justification
    /// Skips deviation and rate limit checks
    /// Signer must have the EMERGENCY_ROLE_PEG_ENGINE role
    pub fn manual_intervention(
        ctx: Context<ManualInterventionContext>,
        action: SupplyAction,
        amount: u128,
        reason: String,
    ) -> Result<()> {
        ctx.accounts.manual_intervention(action, amount, &reason)
    }

    /// Overwrite the lifetime operation counters
    /// Signer must have the ADMIN_ROLE_PEG_ENGINE role
    pub fn migrate_state(
        ctx: Context<PegEngineAdmin>,
        total_minted: u128,
        total_burned: u128,
        operation_count: u64,
        last_operation_timestamp: i64,
    ) -> Result<()> {
        ctx.accounts.migrate_state(
            total_minted,
            total_burned,
            operation_count,
            last_operation_timestamp,
        )
    }

    /// Signer must have the ADMIN_ROLE_PEG_ENGINE role
    pub fn set_targeting_mode(ctx: Context<PegEngineAdmin>, mode: TargetingMode) -> Result<()> {
        ctx.accounts.set_targeting_mode(mode)
    }

    /// Signer must have the ADMIN_ROLE_PEG_ENGINE role
    pub fn set_target_growth_rate(ctx: Context<PegEngineAdmin>, rate_bps: u64) -> Result<()> {
        ctx.accounts.set_target_growth_rate(rate_bps)
    }

    /// Signer must have the ADMIN_ROLE_PEG_ENGINE role
    pub fn set_path_update_interval(ctx: Context<PegEngineAdmin>, interval: i64) -> Result<()> {
        ctx.accounts.set_path_update_interval(interval)
    }

    /// Signer must have the ADMIN_ROLE_PEG_ENGINE role
    pub fn set_catchup_aggressiveness(ctx: Context<PegEngineAdmin>, alpha: u64) -> Result<()> {
        ctx.accounts.set_catchup_aggressiveness(alpha)
    }

    /// Also re-evaluates whether the current cumulative gap counts as closed
    /// Signer must have the ADMIN_ROLE_PEG_ENGINE role
    pub fn set_gap_tolerance(ctx: Context<PegEngineGapAdmin>, tolerance_bps: u64) -> Result<()> {
        ctx.accounts.set_gap_tolerance(tolerance_bps)
    }

    /// Signer must have the ADMIN_ROLE_PEG_ENGINE role
    pub fn set_peg_tolerance(ctx: Context<PegEngineAdmin>, tolerance_bps: u64) -> Result<()> {
        ctx.accounts.set_peg_tolerance(tolerance_bps)
    }

    /// Signer must have the ADMIN_ROLE_PEG_ENGINE role
    pub fn set_operation_amounts(ctx: Context<PegEngineAdmin>, min: u128, max: u128) -> Result<()> {
        ctx.accounts.set_operation_amounts(min, max)
    }

    /// Signer must have the ADMIN_ROLE_PEG_ENGINE role
    pub fn set_operation_cooldown(ctx: Context<PegEngineAdmin>, cooldown: i64) -> Result<()> {
        ctx.accounts.set_operation_cooldown(cooldown)
    }

    /// Signer must have the ADMIN_ROLE_PEG_ENGINE role
    pub fn set_max_daily_operations(ctx: Context<PegEngineAdmin>, cap: u32) -> Result<()> {
        ctx.accounts.set_max_daily_operations(cap)
    }

    /// Signer must have the ADMIN_ROLE_PEG_ENGINE role
    pub fn set_growth_accrual(ctx: Context<PegEngineAdmin>, accrual: GrowthAccrual) -> Result<()> {
        ctx.accounts.set_growth_accrual(accrual)
    }

    /// Set the maximum age for oracle price data. When prices are more stale than
    /// `max_age` maintain_peg halts with InvalidPriceData.
    /// Signer must have the ADMIN_ROLE_PEG_ENGINE role
    pub fn set_oracle_max_age(ctx: Context<PegEngineAdmin>, max_age: u64) -> Result<()> {
        ctx.accounts.set_oracle_max_age(max_age)
    }

    /// Signer must have the ADMIN_ROLE_PEG_ENGINE role
    pub fn set_confidence_threshold(ctx: Context<PegEngineAdmin>, threshold: u64) -> Result<()> {
        ctx.accounts.set_confidence_threshold(threshold)
    }

    /// Signer must have the ADMIN_ROLE_PEG_ENGINE role
    pub fn set_max_supply(ctx: Context<PegEngineAdmin>, max_supply: u64) -> Result<()> {
        ctx.accounts.set_max_supply(max_supply)
    }

    /// Set the Pyth feed id backing FAIT_USD or NGDP_USD
    /// Signer must have the ADMIN_ROLE_PEG_ENGINE role
    pub fn set_oracle_feed_id(
        ctx: Context<PegEngineAdmin>,
        feed_name: String,
        feed_id: [u8; 32],
    ) -> Result<()> {
        ctx.accounts.set_oracle_feed_id(&feed_name, feed_id)
    }

    /// Enable or disable maintain_peg
    /// Signer must have the ADMIN_ROLE_PEG_ENGINE role
    pub fn set_auto_operations(ctx: Context<PegEngineAdmin>, enabled: bool) -> Result<()> {
        ctx.accounts.set_auto_operations(enabled)
    }

    /// Pause every state-mutating operation
    /// Signer must have the PAUSER_ROLE_PEG_ENGINE or ADMIN_ROLE_PEG_ENGINE role
    pub fn pause_peg_engine(ctx: Context<PegEngineAdmin>) -> Result<()> {
        ctx.accounts.pause()
    }

    /// Signer must have the ADMIN_ROLE_PEG_ENGINE role
    pub fn resume_peg_engine(ctx: Context<PegEngineAdmin>) -> Result<()> {
        ctx.accounts.resume()
    }

    /// Peg status against the live oracle price, without advancing the path
    /// Unpermissioned
    pub fn get_peg_status(ctx: Context<GetPegStatus>) -> Result<PegStatus> {
        ctx.accounts.get_peg_status()
    }

    /// Unpermissioned
    pub fn get_path_point(ctx: Context<PegEngineView>, period: u64) -> Result<PathPoint> {
        ctx.accounts.get_path_point(period)
    }

    /// Unpermissioned
    pub fn get_path_points(
        ctx: Context<PegEngineView>,
        start: u64,
        count: u64,
    ) -> Result<Vec<PathPoint>> {
        ctx.accounts.get_path_points(start, count)
    }

    /// Unpermissioned
    pub fn get_path_stats(ctx: Context<PegEngineView>) -> Result<PathStats> {
        ctx.accounts.get_path_stats()
    }

    /// Unpermissioned
    pub fn get_operation_stats(ctx: Context<PegEngineView>) -> Result<OperationStats> {
        ctx.accounts.get_operation_stats()
    }
}
