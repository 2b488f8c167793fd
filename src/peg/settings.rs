use anchor_lang::prelude::*;

use crate::{
    errors::PegError,
    events::{
        AutoOperationsToggled, OracleFeedUpdated, ParameterUpdated, PegEnginePaused,
        StateMigrated,
    },
    peg::{authorize, AuthGate},
    state::{GrowthAccrual, PegEngineState, PegParameter, RoleType, TargetingMode},
};

/// Admin settings over the engine state alone
///
/// Every setter validates before it writes and announces the change with an event.
pub struct EngineSettings<'a> {
    state: &'a mut PegEngineState,
}

impl<'a> EngineSettings<'a> {
    pub fn new(state: &'a mut PegEngineState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &PegEngineState {
        self.state
    }

    /// Overwrite the lifetime operation counters
    pub fn migrate_state<G: AuthGate>(
        &mut self,
        total_minted: u128,
        total_burned: u128,
        operation_count: u64,
        last_operation_timestamp: i64,
        gate: &G,
    ) -> Result<()> {
        authorize(gate, RoleType::AdminRolePegEngine)?;

        self.state.record.migrate(
            total_minted,
            total_burned,
            operation_count,
            last_operation_timestamp,
        );

        emit!(StateMigrated {
            total_minted,
            total_burned,
            operation_count,
            last_operation_timestamp,
            migrated_by: gate.caller(),
        });

        Ok(())
    }

    /// Run an admin-gated update returning (old, new) and announce it
    pub(crate) fn update_parameter<G, F>(
        &mut self,
        gate: &G,
        parameter: PegParameter,
        update: F,
    ) -> Result<()>
    where
        G: AuthGate,
        F: FnOnce(&mut PegEngineState) -> Result<(u128, u128)>,
    {
        authorize(gate, RoleType::AdminRolePegEngine)?;

        let (old_value, new_value) = update(&mut *self.state)?;

        emit!(ParameterUpdated {
            parameter,
            old_value,
            new_value,
            updated_by: gate.caller(),
        });

        Ok(())
    }

    pub fn set_targeting_mode<G: AuthGate>(&mut self, mode: TargetingMode, gate: &G) -> Result<()> {
        self.update_parameter(gate, PegParameter::TargetingMode, |state| {
            let old = state.config.set_targeting_mode(mode);
            Ok((old.code(), mode.code()))
        })
    }

    pub fn set_target_growth_rate<G: AuthGate>(&mut self, rate_bps: u64, gate: &G) -> Result<()> {
        self.update_parameter(gate, PegParameter::TargetGrowthRate, |state| {
            let old = state.config.set_target_growth_rate(rate_bps)?;
            Ok((old as u128, rate_bps as u128))
        })
    }

    pub fn set_path_update_interval<G: AuthGate>(&mut self, interval: i64, gate: &G) -> Result<()> {
        self.update_parameter(gate, PegParameter::PathUpdateInterval, |state| {
            let old = state.config.set_path_update_interval(interval)?;
            Ok((old as u128, interval as u128))
        })
    }

    pub fn set_catchup_aggressiveness<G: AuthGate>(&mut self, alpha: u64, gate: &G) -> Result<()> {
        self.update_parameter(gate, PegParameter::CatchupAggressiveness, |state| {
            let old = state.config.set_catchup_aggressiveness(alpha)?;
            Ok((old as u128, alpha as u128))
        })
    }

    pub fn set_peg_tolerance<G: AuthGate>(&mut self, tolerance_bps: u64, gate: &G) -> Result<()> {
        self.update_parameter(gate, PegParameter::PegTolerance, |state| {
            let old = state.config.set_peg_tolerance(tolerance_bps)?;
            Ok((old as u128, tolerance_bps as u128))
        })
    }

    pub fn set_operation_amounts<G: AuthGate>(&mut self, min: u128, max: u128, gate: &G) -> Result<()> {
        authorize(gate, RoleType::AdminRolePegEngine)?;

        let (old_min, old_max) = self.state.config.set_operation_amounts(min, max)?;

        emit!(ParameterUpdated {
            parameter: PegParameter::MinOperationAmount,
            old_value: old_min,
            new_value: min,
            updated_by: gate.caller(),
        });
        emit!(ParameterUpdated {
            parameter: PegParameter::MaxOperationAmount,
            old_value: old_max,
            new_value: max,
            updated_by: gate.caller(),
        });

        Ok(())
    }

    pub fn set_operation_cooldown<G: AuthGate>(&mut self, cooldown: i64, gate: &G) -> Result<()> {
        self.update_parameter(gate, PegParameter::OperationCooldown, |state| {
            let old = state.config.set_operation_cooldown(cooldown)?;
            Ok((old as u128, cooldown as u128))
        })
    }

    pub fn set_max_daily_operations<G: AuthGate>(&mut self, cap: u32, gate: &G) -> Result<()> {
        self.update_parameter(gate, PegParameter::MaxDailyOperations, |state| {
            let old = state.config.set_max_daily_operations(cap)?;
            Ok((old as u128, cap as u128))
        })
    }

    pub fn set_growth_accrual<G: AuthGate>(&mut self, accrual: GrowthAccrual, gate: &G) -> Result<()> {
        self.update_parameter(gate, PegParameter::GrowthAccrual, |state| {
            let old = state.config.set_growth_accrual(accrual);
            Ok((old.code(), accrual.code()))
        })
    }

    pub fn set_oracle_max_age<G: AuthGate>(&mut self, max_age: u64, gate: &G) -> Result<()> {
        self.update_parameter(gate, PegParameter::OracleMaxAge, |state| {
            let old = state.oracle.set_max_age(max_age)?;
            Ok((old as u128, max_age as u128))
        })
    }

    pub fn set_confidence_threshold<G: AuthGate>(&mut self, threshold: u64, gate: &G) -> Result<()> {
        self.update_parameter(gate, PegParameter::ConfidenceThreshold, |state| {
            let old = state.oracle.set_confidence_threshold(threshold)?;
            Ok((old as u128, threshold as u128))
        })
    }

    pub fn set_max_supply<G: AuthGate>(&mut self, max_supply: u64, gate: &G) -> Result<()> {
        self.update_parameter(gate, PegParameter::MaxSupply, |state| {
            let old = state.set_max_supply(max_supply)?;
            Ok((old as u128, max_supply as u128))
        })
    }

    pub fn set_oracle_feed_id<G: AuthGate>(
        &mut self,
        feed_name: &str,
        feed_id: [u8; 32],
        gate: &G,
    ) -> Result<()> {
        authorize(gate, RoleType::AdminRolePegEngine)?;

        let old_feed_id = self.state.oracle.set_feed_id(feed_name, feed_id)?;

        emit!(OracleFeedUpdated {
            feed_name: feed_name.to_string(),
            old_feed_id,
            new_feed_id: feed_id,
            updated_by: gate.caller(),
        });

        Ok(())
    }

    pub fn set_auto_operations<G: AuthGate>(&mut self, enabled: bool, gate: &G) -> Result<()> {
        authorize(gate, RoleType::AdminRolePegEngine)?;

        self.state.auto_operations_enabled = enabled;

        emit!(AutoOperationsToggled {
            enabled,
            updated_by: gate.caller(),
        });

        Ok(())
    }

    /// Pausing needs the pauser or admin role, resuming needs admin
    /// Neither consults the current pause state
    pub fn set_paused<G: AuthGate>(&mut self, paused: bool, gate: &G) -> Result<()> {
        let authorized = if paused {
            gate.check(RoleType::PauserRolePegEngine) || gate.check(RoleType::AdminRolePegEngine)
        } else {
            gate.check(RoleType::AdminRolePegEngine)
        };
        require!(authorized, PegError::Unauthorized);

        self.state.paused = paused;

        emit!(PegEnginePaused {
            is_paused: paused,
            pauser: gate.caller(),
        });

        Ok(())
    }
}
