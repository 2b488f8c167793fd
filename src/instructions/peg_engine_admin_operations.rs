use anchor_lang::prelude::*;

use crate::{
    constants::{PEG_ENGINE_STATE_SEED, PRICE_PATH_SEED},
    instructions::RoleGate,
    peg::{EngineSettings, PegController},
    state::{GrowthAccrual, PegEngineState, PricePath, Roles, TargetingMode},
};

/// Admin operations over the engine state alone
/// Setters, migration and the auto-operations switch require `AdminRolePegEngine`
/// Pausing accepts `PauserRolePegEngine` or `AdminRolePegEngine`, resuming requires `AdminRolePegEngine`
#[derive(Accounts)]
pub struct PegEngineAdmin<'info> {
    /// The account with the authority to execute the operation
    pub authority: Signer<'info>,

    /// The Roles account of the authority
    /// # PDA Seeds
    /// - The role seed (from RoleType)
    /// - The authority's address
    #[account(
        seeds = [authority_role_account.role.seed(), authority.key().as_ref()],
        bump = authority_role_account.bump,
    )]
    pub authority_role_account: Account<'info, Roles>,

    /// The PegEngineState account to be modified
    /// # PDA Seeds
    /// - PEG_ENGINE_STATE_SEED
    #[account(
        mut,
        seeds = [PEG_ENGINE_STATE_SEED],
        bump = peg_engine_state.bump,
    )]
    pub peg_engine_state: Account<'info, PegEngineState>,
}

impl<'info> PegEngineAdmin<'info> {
    /// Run `operation` against the engine settings with a gate built from the role account
    fn with_settings<F>(&mut self, operation: F) -> Result<()>
    where
        F: FnOnce(&mut EngineSettings, &RoleGate) -> Result<()>,
    {
        let gate = RoleGate::new(
            self.authority.key(),
            self.authority_role_account.role,
            self.peg_engine_state.paused,
        );

        operation(&mut EngineSettings::new(&mut self.peg_engine_state), &gate)
    }

    /// Switch between FAIT, price level and nominal GDP level targeting
    pub fn set_targeting_mode(&mut self, mode: TargetingMode) -> Result<()> {
        self.with_settings(|settings, gate| settings.set_targeting_mode(mode, gate))
    }

    /// Set the annual target growth rate
    /// # Arguments
    /// * `rate_bps` - Annual growth in basis points (must be <= MAX_TARGET_GROWTH_RATE_BPS)
    pub fn set_target_growth_rate(&mut self, rate_bps: u64) -> Result<()> {
        self.with_settings(|settings, gate| settings.set_target_growth_rate(rate_bps, gate))
    }

    /// Set the period length of the price path
    /// # Arguments
    /// * `interval` - Seconds per period (between MIN_PATH_UPDATE_INTERVAL and MAX_PATH_UPDATE_INTERVAL)
    pub fn set_path_update_interval(&mut self, interval: i64) -> Result<()> {
        self.with_settings(|settings, gate| settings.set_path_update_interval(interval, gate))
    }

    /// Set how strongly the cumulative gap adjusts the target, 1000 = 1.0
    pub fn set_catchup_aggressiveness(&mut self, alpha: u64) -> Result<()> {
        self.with_settings(|settings, gate| settings.set_catchup_aggressiveness(alpha, gate))
    }

    /// Set the deviation below which maintain_peg takes no action
    pub fn set_peg_tolerance(&mut self, tolerance_bps: u64) -> Result<()> {
        self.with_settings(|settings, gate| settings.set_peg_tolerance(tolerance_bps, gate))
    }

    /// Set the operation size range, both 18 decimals
    pub fn set_operation_amounts(&mut self, min: u128, max: u128) -> Result<()> {
        self.with_settings(|settings, gate| settings.set_operation_amounts(min, max, gate))
    }

    pub fn set_operation_cooldown(&mut self, cooldown: i64) -> Result<()> {
        self.with_settings(|settings, gate| settings.set_operation_cooldown(cooldown, gate))
    }

    pub fn set_max_daily_operations(&mut self, cap: u32) -> Result<()> {
        self.with_settings(|settings, gate| settings.set_max_daily_operations(cap, gate))
    }

    pub fn set_growth_accrual(&mut self, accrual: GrowthAccrual) -> Result<()> {
        self.with_settings(|settings, gate| settings.set_growth_accrual(accrual, gate))
    }

    /// Set the maximum age for oracle price data
    /// # Arguments
    /// * `max_age` - The new maximum age in seconds (must be > 0 and <= MAX_AGE_UPPER_BOUND)
    pub fn set_oracle_max_age(&mut self, max_age: u64) -> Result<()> {
        self.with_settings(|settings, gate| settings.set_oracle_max_age(max_age, gate))
    }

    /// Set the maximum confidence interval as a percentage of the price
    pub fn set_confidence_threshold(&mut self, threshold: u64) -> Result<()> {
        self.with_settings(|settings, gate| settings.set_confidence_threshold(threshold, gate))
    }

    /// Set the cap on the mint's supply, in mint base units
    pub fn set_max_supply(&mut self, max_supply: u64) -> Result<()> {
        self.with_settings(|settings, gate| settings.set_max_supply(max_supply, gate))
    }

    /// Set the Pyth feed id backing `feed_name`
    /// # Arguments
    /// * `feed_name` - FAIT_USD or NGDP_USD
    /// * `feed_id` - The Pyth feed id, must not be all zeroes
    pub fn set_oracle_feed_id(&mut self, feed_name: &str, feed_id: [u8; 32]) -> Result<()> {
        self.with_settings(|settings, gate| {
            settings.set_oracle_feed_id(feed_name, feed_id, gate)
        })
    }

    /// Enable or disable maintain_peg
    pub fn set_auto_operations(&mut self, enabled: bool) -> Result<()> {
        self.with_settings(|settings, gate| settings.set_auto_operations(enabled, gate))
    }

    pub fn pause(&mut self) -> Result<()> {
        self.with_settings(|settings, gate| settings.set_paused(true, gate))
    }

    pub fn resume(&mut self) -> Result<()> {
        self.with_settings(|settings, gate| settings.set_paused(false, gate))
    }

    /// Import lifetime operation counters from a prior deployment
    pub fn migrate_state(
        &mut self,
        total_minted: u128,
        total_burned: u128,
        operation_count: u64,
        last_operation_timestamp: i64,
    ) -> Result<()> {
        self.with_settings(|settings, gate| {
            settings.migrate_state(
                total_minted,
                total_burned,
                operation_count,
                last_operation_timestamp,
                gate,
            )
        })
    }
}

/// Gap tolerance update, which also re-evaluates the closed flag on the price path
/// Requires the `AdminRolePegEngine` role
#[derive(Accounts)]
pub struct PegEngineGapAdmin<'info> {
    pub authority: Signer<'info>,

    #[account(
        seeds = [authority_role_account.role.seed(), authority.key().as_ref()],
        bump = authority_role_account.bump,
    )]
    pub authority_role_account: Account<'info, Roles>,

    #[account(
        mut,
        seeds = [PEG_ENGINE_STATE_SEED],
        bump = peg_engine_state.bump,
    )]
    pub peg_engine_state: Account<'info, PegEngineState>,

    /// The PricePath account
    /// # PDA Seeds
    /// - PRICE_PATH_SEED
    #[account(
        mut,
        seeds = [PRICE_PATH_SEED],
        bump = price_path.bump,
    )]
    pub price_path: Account<'info, PricePath>,
}

impl<'info> PegEngineGapAdmin<'info> {
    /// Set the cumulative gap below which the gap counts as closed
    pub fn set_gap_tolerance(&mut self, tolerance_bps: u64) -> Result<()> {
        let gate = RoleGate::new(
            self.authority.key(),
            self.authority_role_account.role,
            self.peg_engine_state.paused,
        );

        PegController::new(&mut self.peg_engine_state, &mut self.price_path)
            .set_gap_tolerance(tolerance_bps, &gate)
    }
}
