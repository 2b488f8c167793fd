use anchor_lang::prelude::*;

use crate::{
    constants::{
        DEFAULT_CATCHUP_AGGRESSIVENESS, DEFAULT_GAP_TOLERANCE_BPS, DEFAULT_MAX_DAILY_OPERATIONS,
        DEFAULT_MAX_OPERATION_AMOUNT, DEFAULT_MIN_OPERATION_AMOUNT, DEFAULT_OPERATION_COOLDOWN,
        DEFAULT_PATH_UPDATE_INTERVAL, DEFAULT_PEG_TOLERANCE_BPS, DEFAULT_TARGET_GROWTH_RATE_BPS,
        FAIT_FEED_NAME, MAX_CATCHUP_AGGRESSIVENESS, MAX_GAP_TOLERANCE_BPS, MAX_PATH_UPDATE_INTERVAL,
        MAX_PEG_TOLERANCE_BPS, MAX_TARGET_GROWTH_RATE_BPS, MIN_OPERATION_COOLDOWN,
        MIN_PATH_UPDATE_INTERVAL, NGDP_FEED_NAME,
    },
    errors::PegError,
};

/// Selects which oracle feed the peg is measured against
#[derive(Clone, Copy, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize, InitSpace)]
pub enum TargetingMode {
    FAIT,
    PriceLevelTargeting,
    NominalGDPLevelTargeting,
}

impl TargetingMode {
    pub const fn feed_name(&self) -> &'static str {
        match self {
            TargetingMode::FAIT | TargetingMode::PriceLevelTargeting => FAIT_FEED_NAME,
            TargetingMode::NominalGDPLevelTargeting => NGDP_FEED_NAME,
        }
    }

    /// Numeric code reported in `ParameterUpdated` events
    pub const fn code(&self) -> u128 {
        match self {
            TargetingMode::FAIT => 0,
            TargetingMode::PriceLevelTargeting => 1,
            TargetingMode::NominalGDPLevelTargeting => 2,
        }
    }
}

/// How the annual growth rate is spread across path periods
///
/// `Truncate` divides the annual rate by the number of periods per year in whole
/// basis points, so small rates at fine intervals accrue nothing. `Fractional`
/// keeps the remainder and accrues sub-basis-point growth across periods.
#[derive(Clone, Copy, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize, InitSpace)]
pub enum GrowthAccrual {
    Truncate,
    Fractional,
}

impl GrowthAccrual {
    pub const fn code(&self) -> u128 {
        match self {
            GrowthAccrual::Truncate => 0,
            GrowthAccrual::Fractional => 1,
        }
    }
}

/// Identifies the parameter in a `ParameterUpdated` event
#[derive(Clone, Copy, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub enum PegParameter {
    TargetingMode,
    TargetGrowthRate,
    PathUpdateInterval,
    CatchupAggressiveness,
    GapTolerance,
    PegTolerance,
    MinOperationAmount,
    MaxOperationAmount,
    OperationCooldown,
    MaxDailyOperations,
    GrowthAccrual,
    OracleMaxAge,
    ConfidenceThreshold,
    MaxSupply,
}

/// Admin-mutable peg targeting parameters
/// Every setter validates its bound before writing and returns the previous value
#[derive(Clone, Copy, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize, InitSpace)]
pub struct TargetingConfig {
    // Which oracle feed the peg tracks
    pub targeting_mode: TargetingMode,

    // Annual target growth in basis points, [0, 1000]
    pub target_growth_rate: u64,

    // Seconds between path snapshots
    pub path_update_interval: i64,

    // Catch-up aggressiveness (alpha), scaled by 1000, [0, 2000]
    pub catchup_aggressiveness: u64,

    // Cumulative gap in basis points at or below which the gap counts as closed
    pub gap_tolerance: u64,

    // Deviation in basis points at or below which no operation fires
    pub peg_tolerance: u64,

    // Bounds on a single automatic mint or burn (18 decimals)
    pub min_operation_amount: u128,
    pub max_operation_amount: u128,

    // Minimum seconds between automatic operations
    pub operation_cooldown: i64,

    // Automatic operations allowed per UTC day
    pub max_daily_operations: u32,

    // Per-period growth accrual policy
    pub growth_accrual: GrowthAccrual,
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            targeting_mode: TargetingMode::FAIT,
            target_growth_rate: DEFAULT_TARGET_GROWTH_RATE_BPS,
            path_update_interval: DEFAULT_PATH_UPDATE_INTERVAL,
            catchup_aggressiveness: DEFAULT_CATCHUP_AGGRESSIVENESS,
            gap_tolerance: DEFAULT_GAP_TOLERANCE_BPS,
            peg_tolerance: DEFAULT_PEG_TOLERANCE_BPS,
            min_operation_amount: DEFAULT_MIN_OPERATION_AMOUNT,
            max_operation_amount: DEFAULT_MAX_OPERATION_AMOUNT,
            operation_cooldown: DEFAULT_OPERATION_COOLDOWN,
            max_daily_operations: DEFAULT_MAX_DAILY_OPERATIONS,
            growth_accrual: GrowthAccrual::Truncate,
        }
    }
}

impl TargetingConfig {
    pub fn feed_name(&self) -> &'static str {
        self.targeting_mode.feed_name()
    }

    pub fn set_targeting_mode(&mut self, mode: TargetingMode) -> TargetingMode {
        std::mem::replace(&mut self.targeting_mode, mode)
    }

    pub fn set_target_growth_rate(&mut self, rate_bps: u64) -> Result<u64> {
        require_gte!(
            MAX_TARGET_GROWTH_RATE_BPS,
            rate_bps,
            PegError::InvalidGrowthRate
        );

        Ok(std::mem::replace(&mut self.target_growth_rate, rate_bps))
    }

    pub fn set_path_update_interval(&mut self, interval: i64) -> Result<i64> {
        require!(
            (MIN_PATH_UPDATE_INTERVAL..=MAX_PATH_UPDATE_INTERVAL).contains(&interval),
            PegError::InvalidPathUpdateInterval
        );

        Ok(std::mem::replace(&mut self.path_update_interval, interval))
    }

    pub fn set_catchup_aggressiveness(&mut self, alpha: u64) -> Result<u64> {
        require_gte!(
            MAX_CATCHUP_AGGRESSIVENESS,
            alpha,
            PegError::InvalidCatchupAggressiveness
        );

        Ok(std::mem::replace(&mut self.catchup_aggressiveness, alpha))
    }

    pub fn set_gap_tolerance(&mut self, tolerance_bps: u64) -> Result<u64> {
        require_gte!(
            MAX_GAP_TOLERANCE_BPS,
            tolerance_bps,
            PegError::InvalidGapTolerance
        );

        Ok(std::mem::replace(&mut self.gap_tolerance, tolerance_bps))
    }

    pub fn set_peg_tolerance(&mut self, tolerance_bps: u64) -> Result<u64> {
        require_gte!(
            MAX_PEG_TOLERANCE_BPS,
            tolerance_bps,
            PegError::InvalidPegTolerance
        );

        Ok(std::mem::replace(&mut self.peg_tolerance, tolerance_bps))
    }

    /// Sets both operation bounds together so `max >= min > 0` always holds
    /// # Returns
    /// * `Result<(u128, u128)>` - The previous (min, max) bounds
    pub fn set_operation_amounts(&mut self, min: u128, max: u128) -> Result<(u128, u128)> {
        require_gt!(min, 0, PegError::InvalidOperationAmounts);
        require_gte!(max, min, PegError::InvalidOperationAmounts);

        let old = (self.min_operation_amount, self.max_operation_amount);
        self.min_operation_amount = min;
        self.max_operation_amount = max;

        Ok(old)
    }

    pub fn set_operation_cooldown(&mut self, cooldown: i64) -> Result<i64> {
        require_gte!(
            cooldown,
            MIN_OPERATION_COOLDOWN,
            PegError::InvalidOperationCooldown
        );

        Ok(std::mem::replace(&mut self.operation_cooldown, cooldown))
    }

    pub fn set_max_daily_operations(&mut self, cap: u32) -> Result<u32> {
        require_gt!(cap, 0, PegError::InvalidMaxDailyOperations);

        Ok(std::mem::replace(&mut self.max_daily_operations, cap))
    }

    pub fn set_growth_accrual(&mut self, accrual: GrowthAccrual) -> GrowthAccrual {
        std::mem::replace(&mut self.growth_accrual, accrual)
    }

    /// Checks every bound at once, used when a config is supplied wholesale
    pub fn validate(&self) -> Result<()> {
        let mut scratch = *self;
        scratch.set_target_growth_rate(self.target_growth_rate)?;
        scratch.set_path_update_interval(self.path_update_interval)?;
        scratch.set_catchup_aggressiveness(self.catchup_aggressiveness)?;
        scratch.set_gap_tolerance(self.gap_tolerance)?;
        scratch.set_peg_tolerance(self.peg_tolerance)?;
        scratch.set_operation_amounts(self.min_operation_amount, self.max_operation_amount)?;
        scratch.set_operation_cooldown(self.operation_cooldown)?;
        scratch.set_max_daily_operations(self.max_daily_operations)?;

        Ok(())
    }
}
