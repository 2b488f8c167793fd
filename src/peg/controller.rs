use anchor_lang::prelude::*;

use crate::{
    constants::MAX_REASON_LENGTH,
    errors::PegError,
    events::{ManualIntervention, PathUpdated, PegOperationExecuted},
    peg::{
        adjusted_target, authorize, deviation_bps, gap_ratio, operation_size, operation_stats,
        path_stats, peg_status, rate_limit_allows, AuthGate, EngineSettings, OperationOutcome,
        OperationStats, OracleFeed, PathStats, PegStatus, SupplyController,
    },
    state::{
        gap_within_tolerance, PathPoint, PegEngineState, PegParameter, PricePath, RoleType,
        SupplyAction,
    },
};

/// The level-targeting peg controller
///
/// Borrows the engine state and price path exclusively for the duration of a
/// call. Every mutating operation runs all of its validations and collaborator
/// calls before it writes to either account, so a failed call leaves both
/// untouched.
pub struct PegController<'a> {
    state: &'a mut PegEngineState,
    path: &'a mut PricePath,
}

impl<'a> PegController<'a> {
    pub fn new(state: &'a mut PegEngineState, path: &'a mut PricePath) -> Self {
        Self { state, path }
    }

    pub fn state(&self) -> &PegEngineState {
        self.state
    }

    pub fn path(&self) -> &PricePath {
        self.path
    }

    /// Append staged points and emit one `PathUpdated` per point
    fn commit_path(&mut self, pending: &[PathPoint]) {
        let first_period = self.path.current_period + 1;
        let gap_tolerance = self.state.config.gap_tolerance;
        self.path.append(pending, gap_tolerance);

        for (offset, point) in pending.iter().enumerate() {
            emit!(PathUpdated {
                period: first_period + offset as u64,
                period_timestamp: point.period_timestamp,
                target_value: point.target_value,
                actual_value: point.actual_value,
                cumulative_gap: point.cumulative_gap,
                gap_closed: gap_within_tolerance(point.cumulative_gap, gap_tolerance),
            });
        }
    }

    /// Advance the path if due, then mint or burn toward the gap-adjusted target
    ///
    /// Within peg tolerance the path still advances but no supply operation runs
    /// and the rate limiter budget is not consumed.
    /// # Arguments
    /// * `now` - The current timestamp
    /// * `oracle` - Price source for the configured targeting mode
    /// * `supply` - Treasury mint/burn collaborator
    /// * `gate` - Must grant `OperatorRolePegEngine`
    /// # Returns
    /// * `Result<OperationOutcome>` - What was done, Err if rejected
    pub fn maintain_peg<O, S, G>(
        &mut self,
        now: i64,
        oracle: &O,
        supply: &mut S,
        gate: &G,
    ) -> Result<OperationOutcome>
    where
        O: OracleFeed,
        S: SupplyController,
        G: AuthGate,
    {
        authorize(gate, RoleType::OperatorRolePegEngine)?;
        require!(
            self.state.auto_operations_enabled,
            PegError::OperationsDisabled
        );

        let config = self.state.config;
        let record = self.state.record;
        if !rate_limit_allows(now, &record, &config) {
            msg!(
                "Rate limited: last operation at {}, cooldown {}s, {}/{} operations today",
                record.last_operation_timestamp,
                config.operation_cooldown,
                record.operations_on(now),
                config.max_daily_operations
            );
            return err!(PegError::RateLimited);
        }

        let reading = oracle.get_latest(config.feed_name())?;
        let Some(current_price) = reading.usable_value() else {
            msg!(
                "Oracle reading for {} rejected: valid {}, value {}",
                config.feed_name(),
                reading.is_valid,
                reading.value
            );
            return err!(PegError::InvalidPriceData);
        };

        let pending = self.path.pending_points(now, &config, Some(current_price))?;
        let tip = self.path.tip_after(&pending, config.gap_tolerance);

        let base_target = tip.latest.target_value;
        let adjusted_target = adjusted_target(base_target, &tip, &config)?;
        let deviation_bps = deviation_bps(current_price, adjusted_target)?;

        if deviation_bps <= config.peg_tolerance {
            self.commit_path(&pending);
            return Ok(OperationOutcome::NoAction { deviation_bps });
        }

        let gap_ratio = gap_ratio(&tip.latest)?;
        let requested = operation_size(deviation_bps, &config)?;

        let (action, amount) = if current_price > adjusted_target {
            (SupplyAction::Mint, requested)
        } else {
            let balance = supply.balance_of_self()?;
            if balance < requested {
                msg!(
                    "Burn of {} clamped to treasury balance {}",
                    requested,
                    balance
                );
            }
            (SupplyAction::Burn, requested.min(balance))
        };

        // The executed amount never exceeds `amount`, so this bounds the final record
        record.with_operation(now, action, amount)?;

        let executed = match action {
            SupplyAction::Mint => supply.mint(amount)?,
            SupplyAction::Burn if amount > 0 => supply.burn(amount)?,
            SupplyAction::Burn => 0,
        };
        let next_record = record.with_operation(now, action, executed)?;

        self.commit_path(&pending);
        self.state.record = next_record;

        emit!(PegOperationExecuted {
            action,
            requested_amount: requested,
            executed_amount: executed,
            current_price,
            adjusted_target,
            deviation_bps,
            gap_ratio,
            timestamp: now,
        });

        Ok(match action {
            SupplyAction::Mint => OperationOutcome::Minted {
                amount: executed,
                deviation_bps,
                gap_ratio,
            },
            SupplyAction::Burn => OperationOutcome::Burned {
                requested,
                executed,
                deviation_bps,
                gap_ratio,
            },
        })
    }

    /// Advance the path without any supply operation
    /// An unusable oracle reading carries the previous actual value forward
    pub fn update_path<O: OracleFeed, G: AuthGate>(
        &mut self,
        now: i64,
        oracle: &O,
        gate: &G,
    ) -> Result<()> {
        authorize(gate, RoleType::OperatorRolePegEngine)?;

        let config = self.state.config;
        let observed = oracle.get_latest(config.feed_name())?.usable_value();

        let pending = self.path.pending_points(now, &config, observed)?;
        if observed.is_none() && !pending.is_empty() {
            msg!(
                "Oracle reading for {} unusable, carried forward previous actual value",
                config.feed_name()
            );
        }

        self.commit_path(&pending);

        Ok(())
    }

    /// Mint or burn an explicit amount, bypassing deviation and rate limit checks
    /// Burns are never clamped: the treasury must hold `amount`
    pub fn manual_intervention<S: SupplyController, G: AuthGate>(
        &mut self,
        now: i64,
        action: SupplyAction,
        amount: u128,
        reason: &str,
        supply: &mut S,
        gate: &G,
    ) -> Result<()> {
        authorize(gate, RoleType::EmergencyRolePegEngine)?;
        require_gt!(amount, 0, PegError::InvalidAmount);
        require!(
            !reason.trim().is_empty(),
            PegError::EmptyInterventionReason
        );
        require_gte!(
            MAX_REASON_LENGTH,
            reason.len(),
            PegError::InterventionReasonTooLong
        );

        self.state.record.with_operation(now, action, amount)?;

        let executed = match action {
            SupplyAction::Mint => supply.mint(amount)?,
            SupplyAction::Burn => {
                require_gte!(
                    supply.balance_of_self()?,
                    amount,
                    PegError::InsufficientBalance
                );
                supply.burn(amount)?
            }
        };
        // Nothing moved when the amount is below the token's smallest unit
        require_gt!(executed, 0, PegError::InvalidAmount);

        self.state.record = self.state.record.with_operation(now, action, executed)?;

        msg!("Manual intervention {:?} of {}: {}", action, executed, reason);
        emit!(ManualIntervention {
            action,
            amount: executed,
            reason: reason.to_string(),
            executed_by: gate.caller(),
            timestamp: now,
        });

        Ok(())
    }

    /// State-only settings, usable without the price path
    pub fn settings(&mut self) -> EngineSettings<'_> {
        EngineSettings::new(&mut *self.state)
    }

    /// Also re-evaluates whether the current gap counts as closed
    pub fn set_gap_tolerance<G: AuthGate>(&mut self, tolerance_bps: u64, gate: &G) -> Result<()> {
        self.settings()
            .update_parameter(gate, PegParameter::GapTolerance, |state| {
                let old = state.config.set_gap_tolerance(tolerance_bps)?;
                Ok((old as u128, tolerance_bps as u128))
            })?;
        self.path.refresh_gap_closed(tolerance_bps);

        Ok(())
    }

    pub fn peg_status<O: OracleFeed>(&self, now: i64, oracle: &O) -> Result<PegStatus> {
        peg_status(self.state, self.path, now, oracle)
    }

    pub fn path_stats(&self) -> PathStats {
        path_stats(self.state, self.path)
    }

    pub fn operation_stats(&self, now: i64) -> OperationStats {
        operation_stats(self.state, now)
    }

    pub fn path_point(&self, period: u64) -> Result<PathPoint> {
        self.path.get_point(period)
    }

    pub fn path_points(&self, start: u64, count: u64) -> Result<Vec<PathPoint>> {
        self.path.get_points(start, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constants::{NGDP_FEED_NAME, PRICE_PRECISION, SECONDS_PER_DAY, SECONDS_PER_HOUR},
        peg::mock::{MockGate, MockOracle, MockSupply},
        state::{OracleConfig, TargetingConfig, TargetingMode},
    };

    const ONE: u128 = PRICE_PRECISION;
    const T0: i64 = 1_700_006_400;
    const MIN_OP: u128 = 1_000 * ONE;
    const MAX_OP: u128 = 1_000_000 * ONE;

    fn engine() -> (PegEngineState, PricePath) {
        let key = Pubkey::new_unique();
        let oracle = OracleConfig::new([1; 32], [2; 32]).unwrap();
        let state = PegEngineState::new(
            key,
            key,
            key,
            TargetingConfig::default(),
            oracle,
            u64::MAX,
            0,
            0,
        )
        .unwrap();
        let path = PricePath::new(ONE, T0, 0).unwrap();

        (state, path)
    }

    /// 10 daily periods observed at 0.5 against a flat 1.0 target
    fn undershot_engine() -> (PegEngineState, PricePath) {
        let (mut state, mut path) = engine();
        let mut controller = PegController::new(&mut state, &mut path);
        let gate = MockGate::operator();
        let oracle = MockOracle::price(ONE / 2);

        for day in 1..=10 {
            controller
                .update_path(T0 + day * SECONDS_PER_DAY, &oracle, &gate)
                .unwrap();
        }

        (state, path)
    }

    #[test]
    fn test_no_action_within_tolerance_is_idempotent() {
        let (mut state, mut path) = engine();
        let (state_before, path_before) = (state.clone(), path.clone());
        let mut controller = PegController::new(&mut state, &mut path);
        let oracle = MockOracle::price(ONE * 1_005 / 1_000);
        let mut supply = MockSupply::default();
        let gate = MockGate::operator();

        for _ in 0..2 {
            let outcome = controller
                .maintain_peg(T0 + 10, &oracle, &mut supply, &gate)
                .unwrap();
            assert_eq!(outcome, OperationOutcome::NoAction { deviation_bps: 50 });
        }

        assert!(supply.mints.is_empty() && supply.burns.is_empty());
        assert_eq!(state, state_before);
        assert_eq!(path, path_before);
    }

    #[test]
    fn test_mints_when_price_above_target() {
        let (mut state, mut path) = engine();
        let mut controller = PegController::new(&mut state, &mut path);
        let mut supply = MockSupply::default();

        let outcome = controller
            .maintain_peg(
                T0 + 10,
                &MockOracle::price(ONE * 105 / 100),
                &mut supply,
                &MockGate::operator(),
            )
            .unwrap();

        // 400 bps over tolerance is 40% of the amount range
        let expected = MIN_OP + (MAX_OP - MIN_OP) * 400 / 1_000;
        assert_eq!(
            outcome,
            OperationOutcome::Minted {
                amount: expected,
                deviation_bps: 500,
                gap_ratio: 1_000,
            }
        );
        assert_eq!(supply.mints, vec![expected]);

        let stats = controller.operation_stats(T0 + 10);
        assert_eq!(stats.total_minted, expected);
        assert_eq!(stats.total_operations, 1);
        assert_eq!(stats.operations_today, 1);
        assert_eq!(stats.last_operation_timestamp, T0 + 10);
    }

    #[test]
    fn test_burn_clamps_to_balance() {
        let (mut state, mut path) = engine();
        let mut controller = PegController::new(&mut state, &mut path);
        let mut supply = MockSupply::with_balance(5_000 * ONE);

        let outcome = controller
            .maintain_peg(
                T0 + 10,
                &MockOracle::price(ONE * 95 / 100),
                &mut supply,
                &MockGate::operator(),
            )
            .unwrap();

        let requested = MIN_OP + (MAX_OP - MIN_OP) * 400 / 1_000;
        assert_eq!(
            outcome,
            OperationOutcome::Burned {
                requested,
                executed: 5_000 * ONE,
                deviation_bps: 500,
                gap_ratio: 1_000,
            }
        );
        assert_eq!(supply.burns, vec![5_000 * ONE]);
        assert_eq!(supply.balance, 0);
        assert_eq!(controller.state().record.total_burned, 5_000 * ONE);
    }

    #[test]
    fn test_burn_with_empty_treasury_still_counts() {
        let (mut state, mut path) = engine();
        let mut controller = PegController::new(&mut state, &mut path);
        let mut supply = MockSupply::default();

        let outcome = controller
            .maintain_peg(
                T0 + 10,
                &MockOracle::price(ONE * 90 / 100),
                &mut supply,
                &MockGate::operator(),
            )
            .unwrap();

        assert!(matches!(
            outcome,
            OperationOutcome::Burned { executed: 0, .. }
        ));
        assert!(supply.burns.is_empty());
        assert_eq!(controller.state().record.operation_count, 1);
        assert_eq!(controller.state().record.total_burned, 0);
        assert_eq!(controller.state().record.last_operation_timestamp, T0 + 10);
    }

    #[test]
    fn test_cooldown_boundary() {
        let (mut state, mut path) = engine();
        let mut controller = PegController::new(&mut state, &mut path);
        let oracle = MockOracle::price(ONE * 105 / 100);
        let mut supply = MockSupply::default();
        let gate = MockGate::operator();
        let cooldown = controller.state().config.operation_cooldown;

        controller
            .maintain_peg(T0 + 10, &oracle, &mut supply, &gate)
            .unwrap();

        let err = controller
            .maintain_peg(T0 + 10 + cooldown - 1, &oracle, &mut supply, &gate)
            .unwrap_err();
        assert_eq!(err, PegError::RateLimited.into());
        assert_eq!(controller.state().record.operation_count, 1);

        controller
            .maintain_peg(T0 + 10 + cooldown, &oracle, &mut supply, &gate)
            .unwrap();
        assert_eq!(controller.state().record.operation_count, 2);
    }

    #[test]
    fn test_daily_cap() {
        let (mut state, mut path) = engine();
        let mut controller = PegController::new(&mut state, &mut path);
        let admin = MockGate::admin();
        controller.settings().set_operation_cooldown(60, &admin).unwrap();
        controller.settings().set_max_daily_operations(2, &admin).unwrap();

        let oracle = MockOracle::price(ONE * 105 / 100);
        let mut supply = MockSupply::default();
        let gate = MockGate::operator();

        controller
            .maintain_peg(T0 + 10, &oracle, &mut supply, &gate)
            .unwrap();
        controller
            .maintain_peg(T0 + 70, &oracle, &mut supply, &gate)
            .unwrap();
        assert_eq!(
            controller
                .maintain_peg(T0 + 130, &oracle, &mut supply, &gate)
                .unwrap_err(),
            PegError::RateLimited.into()
        );

        // Next UTC day resets the counter
        controller
            .maintain_peg(T0 + SECONDS_PER_DAY, &oracle, &mut supply, &gate)
            .unwrap();
        assert_eq!(supply.mints.len(), 3);
    }

    #[test]
    fn test_no_action_does_not_consume_cooldown() {
        let (mut state, mut path) = engine();
        let mut controller = PegController::new(&mut state, &mut path);
        let mut supply = MockSupply::default();
        let gate = MockGate::operator();

        controller
            .maintain_peg(T0 + 10, &MockOracle::price(ONE), &mut supply, &gate)
            .unwrap();
        controller
            .maintain_peg(T0 + 11, &MockOracle::price(ONE * 2), &mut supply, &gate)
            .unwrap();

        assert_eq!(supply.mints, vec![MAX_OP]);
    }

    #[test]
    fn test_gates() {
        let (mut state, mut path) = engine();
        let mut controller = PegController::new(&mut state, &mut path);
        let oracle = MockOracle::price(ONE * 2);
        let mut supply = MockSupply::default();

        assert_eq!(
            controller
                .maintain_peg(T0, &oracle, &mut supply, &MockGate::admin())
                .unwrap_err(),
            PegError::Unauthorized.into()
        );
        assert_eq!(
            controller
                .maintain_peg(T0, &oracle, &mut supply, &MockGate::operator().paused())
                .unwrap_err(),
            PegError::SystemPaused.into()
        );

        controller
            .settings()
            .set_auto_operations(false, &MockGate::admin())
            .unwrap();
        assert_eq!(
            controller
                .maintain_peg(T0, &oracle, &mut supply, &MockGate::operator())
                .unwrap_err(),
            PegError::OperationsDisabled.into()
        );

        // update_path is independent of the auto-operation switch
        controller
            .update_path(T0 + SECONDS_PER_DAY, &oracle, &MockGate::operator())
            .unwrap();
        assert_eq!(controller.path().current_period, 1);
        assert!(supply.mints.is_empty());
    }

    #[test]
    fn test_invalid_price_leaves_everything_unchanged() {
        let (mut state, mut path) = engine();
        let (state_before, path_before) = (state.clone(), path.clone());
        let mut controller = PegController::new(&mut state, &mut path);
        let mut supply = MockSupply::default();

        // A period is due but must not be appended
        let err = controller
            .maintain_peg(
                T0 + 2 * SECONDS_PER_DAY,
                &MockOracle::invalid(),
                &mut supply,
                &MockGate::operator(),
            )
            .unwrap_err();
        assert_eq!(err, PegError::InvalidPriceData.into());

        assert_eq!(state, state_before);
        assert_eq!(path, path_before);
    }

    #[test]
    fn test_mint_failure_leaves_everything_unchanged() {
        let (mut state, mut path) = engine();
        let (state_before, path_before) = (state.clone(), path.clone());
        let mut controller = PegController::new(&mut state, &mut path);
        let mut supply = MockSupply::capped(MIN_OP);

        let err = controller
            .maintain_peg(
                T0 + SECONDS_PER_DAY + 1,
                &MockOracle::price(ONE * 2),
                &mut supply,
                &MockGate::operator(),
            )
            .unwrap_err();
        assert_eq!(err, PegError::MintCapExceeded.into());

        assert_eq!(state, state_before);
        assert_eq!(path, path_before);
    }

    #[test]
    fn test_maintain_peg_advances_path_with_observed_price() {
        let (mut state, mut path) = engine();
        let mut controller = PegController::new(&mut state, &mut path);
        let mut supply = MockSupply::default();

        controller
            .maintain_peg(
                T0 + 3 * SECONDS_PER_DAY + 5,
                &MockOracle::price(ONE * 102 / 100),
                &mut supply,
                &MockGate::operator(),
            )
            .unwrap();

        let stats = controller.path_stats();
        assert_eq!(stats.current_period, 3);
        assert_eq!(stats.total_periods, 4);
        assert_eq!(stats.cumulative_gap, 600);
        assert!(!stats.gap_closed);
        assert_eq!(
            controller.path_point(3).unwrap().period_timestamp,
            T0 + 3 * SECONDS_PER_DAY
        );
        assert_eq!(controller.path_points(1, 3).unwrap().len(), 3);
    }

    #[test]
    fn test_recovery_scenario() {
        let (mut state, mut path) = undershot_engine();

        let stats = path_stats(&state, &path);
        assert_eq!(stats.current_period, 10);
        assert_eq!(stats.cumulative_gap, -50_000);
        assert!(stats.cumulative_gap < -1_000);
        assert!(!stats.gap_closed);

        let mut controller = PegController::new(&mut state, &mut path);
        let now = T0 + 10 * SECONDS_PER_DAY + 1;
        let oracle = MockOracle::price(ONE);

        let status = controller.peg_status(now, &oracle).unwrap();
        assert_eq!(status.gap_ratio, 2_000);
        assert_eq!(status.base_target, ONE);
        assert_eq!(status.adjusted_target, ONE * 3 / 2);
        assert!(status.adjusted_target > status.base_target);
        assert_eq!(status.deviation_bps, 3_333);
        assert!(!status.peg_maintained);
        assert!(status.can_operate);

        // Price at the base target still reads as below the catch-up target
        let mut supply = MockSupply::with_balance(10_000 * ONE);
        let outcome = controller
            .maintain_peg(now, &oracle, &mut supply, &MockGate::operator())
            .unwrap();
        assert_eq!(
            outcome,
            OperationOutcome::Burned {
                requested: MAX_OP,
                executed: 10_000 * ONE,
                deviation_bps: 3_333,
                gap_ratio: 2_000,
            }
        );
    }

    #[test]
    fn test_overshoot_lowers_target() {
        let (mut state, mut path) = engine();
        let mut controller = PegController::new(&mut state, &mut path);
        let gate = MockGate::operator();

        controller
            .update_path(T0 + 2 * SECONDS_PER_DAY, &MockOracle::price(2 * ONE), &gate)
            .unwrap();

        let status = controller
            .peg_status(T0 + 2 * SECONDS_PER_DAY, &MockOracle::price(ONE))
            .unwrap();
        assert_eq!(status.gap_ratio, 500);
        assert_eq!(status.adjusted_target, ONE * 3 / 4);
        assert!(status.adjusted_target < status.base_target);
    }

    #[test]
    fn test_update_path_carries_actual_forward_on_invalid_oracle() {
        let (mut state, mut path) = undershot_engine();
        let mut controller = PegController::new(&mut state, &mut path);

        controller
            .update_path(
                T0 + 11 * SECONDS_PER_DAY,
                &MockOracle::invalid(),
                &MockGate::operator(),
            )
            .unwrap();

        let point = controller.path_point(11).unwrap();
        assert_eq!(point.actual_value, ONE / 2);
        assert_eq!(point.cumulative_gap, -55_000);
    }

    #[test]
    fn test_update_path_gates() {
        let (mut state, mut path) = engine();
        let mut controller = PegController::new(&mut state, &mut path);
        let oracle = MockOracle::price(ONE);

        assert_eq!(
            controller
                .update_path(T0 + SECONDS_PER_DAY, &oracle, &MockGate::emergency())
                .unwrap_err(),
            PegError::Unauthorized.into()
        );
        assert_eq!(
            controller
                .update_path(T0 + SECONDS_PER_DAY, &oracle, &MockGate::operator().paused())
                .unwrap_err(),
            PegError::SystemPaused.into()
        );
        assert_eq!(controller.path().current_period, 0);
    }

    #[test]
    fn test_ngdp_mode_reads_ngdp_feed() {
        let (mut state, mut path) = engine();
        let mut controller = PegController::new(&mut state, &mut path);
        controller
            .settings()
            .set_targeting_mode(TargetingMode::NominalGDPLevelTargeting, &MockGate::admin())
            .unwrap();

        let mut supply = MockSupply::default();
        let gate = MockGate::operator();

        assert_eq!(
            controller
                .maintain_peg(T0, &MockOracle::price(ONE), &mut supply, &gate)
                .unwrap_err(),
            PegError::UnknownOracleFeed.into()
        );
        controller
            .maintain_peg(
                T0,
                &MockOracle::price(ONE).for_feed(NGDP_FEED_NAME),
                &mut supply,
                &gate,
            )
            .unwrap();
        assert_eq!(
            controller.path_stats().targeting_mode,
            TargetingMode::NominalGDPLevelTargeting
        );
    }

    #[test]
    fn test_manual_intervention_updates_counters() {
        let (mut state, mut path) = engine();
        let mut controller = PegController::new(&mut state, &mut path);
        let mut supply = MockSupply::default();
        let gate = MockGate::emergency();

        // Bypasses the auto-operation switch and rate limits
        controller
            .settings()
            .set_auto_operations(false, &MockGate::admin())
            .unwrap();
        controller
            .manual_intervention(T0, SupplyAction::Mint, 7 * ONE, "seed treasury", &mut supply, &gate)
            .unwrap();
        controller
            .manual_intervention(T0 + 1, SupplyAction::Burn, 2 * ONE, "trim", &mut supply, &gate)
            .unwrap();

        let stats = controller.operation_stats(T0 + 1);
        assert_eq!(stats.total_minted, 7 * ONE);
        assert_eq!(stats.total_burned, 2 * ONE);
        assert_eq!(stats.total_operations, 2);
        assert_eq!(stats.operations_today, 2);
        assert_eq!(supply.balance, 5 * ONE);
    }

    #[test]
    fn test_manual_intervention_validation() {
        let (mut state, mut path) = engine();
        let state_before = state.clone();
        let mut controller = PegController::new(&mut state, &mut path);
        let mut supply = MockSupply::with_balance(ONE);
        let gate = MockGate::emergency();

        let cases = [
            (SupplyAction::Mint, 0, "reason".to_string(), PegError::InvalidAmount),
            (SupplyAction::Mint, ONE, "  ".to_string(), PegError::EmptyInterventionReason),
            (
                SupplyAction::Mint,
                ONE,
                "x".repeat(MAX_REASON_LENGTH + 1),
                PegError::InterventionReasonTooLong,
            ),
            (
                SupplyAction::Burn,
                2 * ONE,
                "reason".to_string(),
                PegError::InsufficientBalance,
            ),
        ];
        for (action, amount, reason, expected) in cases {
            assert_eq!(
                controller
                    .manual_intervention(T0, action, amount, &reason, &mut supply, &gate)
                    .unwrap_err(),
                expected.into()
            );
        }

        assert_eq!(
            controller
                .manual_intervention(
                    T0,
                    SupplyAction::Mint,
                    ONE,
                    "reason",
                    &mut supply,
                    &MockGate::operator()
                )
                .unwrap_err(),
            PegError::Unauthorized.into()
        );

        assert_eq!(controller.state(), &state_before);
        assert!(supply.mints.is_empty() && supply.burns.is_empty());
    }

    #[test]
    fn test_large_overshoot_with_high_aggressiveness_mints() {
        let (mut state, mut path) = engine();
        let mut controller = PegController::new(&mut state, &mut path);
        let oracle = MockOracle::price(3 * ONE);
        let mut supply = MockSupply::default();

        controller
            .settings()
            .set_catchup_aggressiveness(2_000, &MockGate::admin())
            .unwrap();
        controller
            .update_path(T0 + SECONDS_PER_DAY, &oracle, &MockGate::operator())
            .unwrap();
        assert!(!controller.path().is_gap_closed);

        // The catch-up factor floors instead of driving the target to zero
        let outcome = controller
            .maintain_peg(T0 + SECONDS_PER_DAY + 10, &oracle, &mut supply, &MockGate::operator())
            .unwrap();
        assert!(matches!(
            outcome,
            OperationOutcome::Minted { amount, gap_ratio: 333, .. } if amount == MAX_OP
        ));

        let status = controller
            .peg_status(T0 + SECONDS_PER_DAY + 10, &oracle)
            .unwrap();
        assert!(status.adjusted_target > 0);
        assert!(status.adjusted_target < status.base_target);
    }

    #[test]
    fn test_counters_record_executed_amount() {
        let (mut state, mut path) = engine();
        let mut controller = PegController::new(&mut state, &mut path);
        let mut supply = MockSupply::default().with_unit(1_000 * ONE);

        let outcome = controller
            .maintain_peg(
                T0 + 10,
                &MockOracle::price(ONE * 105 / 100),
                &mut supply,
                &MockGate::operator(),
            )
            .unwrap();

        // 400_600 requested, the supply only moves whole thousands
        let executed = 400_000 * ONE;
        assert_eq!(
            outcome,
            OperationOutcome::Minted {
                amount: executed,
                deviation_bps: 500,
                gap_ratio: 1_000,
            }
        );
        assert_eq!(supply.mints, vec![executed]);
        assert_eq!(controller.operation_stats(T0 + 10).total_minted, executed);
    }

    #[test]
    fn test_manual_intervention_below_supply_unit_fails() {
        let (mut state, mut path) = engine();
        let state_before = state.clone();
        let mut controller = PegController::new(&mut state, &mut path);
        let mut supply = MockSupply::with_balance(10 * ONE).with_unit(ONE);
        let gate = MockGate::emergency();

        for action in [SupplyAction::Mint, SupplyAction::Burn] {
            assert_eq!(
                controller
                    .manual_intervention(T0, action, ONE / 2, "dust", &mut supply, &gate)
                    .unwrap_err(),
                PegError::InvalidAmount.into()
            );
        }
        assert!(supply.mints.is_empty() && supply.burns.is_empty());
        assert_eq!(controller.state(), &state_before);

        controller
            .manual_intervention(T0, SupplyAction::Burn, ONE * 3 / 2, "partial unit", &mut supply, &gate)
            .unwrap();
        assert_eq!(supply.burns, vec![ONE]);
        assert_eq!(controller.operation_stats(T0).total_burned, ONE);
    }

    #[test]
    fn test_long_idle_path_catches_up_in_bounded_steps() {
        let (mut state, mut path) = engine();
        let mut controller = PegController::new(&mut state, &mut path);
        let oracle = MockOracle::price(ONE);
        let mut supply = MockSupply::default();
        let gate = MockGate::operator();

        controller
            .settings()
            .set_path_update_interval(SECONDS_PER_HOUR, &MockGate::admin())
            .unwrap();

        let now = T0 + 100 * SECONDS_PER_HOUR;
        let mut appended = Vec::new();
        while controller.path().current_period < 100 {
            let before = controller.path().current_period;
            controller
                .maintain_peg(now, &oracle, &mut supply, &gate)
                .unwrap();
            appended.push(controller.path().current_period - before);
        }

        assert_eq!(appended, vec![32, 32, 32, 4]);
        assert_eq!(controller.path().latest().period_timestamp, now);
        assert!(supply.mints.is_empty() && supply.burns.is_empty());
    }

    #[test]
    fn test_migrate_state_keeps_rate_limit_window() {
        let (mut state, mut path) = engine();
        let mut controller = PegController::new(&mut state, &mut path);
        let mut supply = MockSupply::default();

        controller
            .manual_intervention(T0, SupplyAction::Mint, ONE, "pre-migration", &mut supply, &MockGate::emergency())
            .unwrap();
        controller
            .settings()
            .migrate_state(500 * ONE, 200 * ONE, 42, T0 - 100, &MockGate::admin())
            .unwrap();

        let stats = controller.operation_stats(T0);
        assert_eq!(stats.total_minted, 500 * ONE);
        assert_eq!(stats.total_operations, 42);
        assert_eq!(stats.operations_today, 1);
    }

    #[test]
    fn test_gap_tolerance_rejects_out_of_bounds() {
        let (mut state, mut path) = engine();
        let (state_before, path_before) = (state.clone(), path.clone());
        let mut controller = PegController::new(&mut state, &mut path);

        assert!(controller
            .set_gap_tolerance(1_001, &MockGate::admin())
            .is_err());
        assert_eq!(
            controller
                .set_gap_tolerance(50, &MockGate::operator())
                .unwrap_err(),
            PegError::Unauthorized.into()
        );
        assert_eq!(controller.state(), &state_before);
        assert_eq!(controller.path(), &path_before);
    }

    #[test]
    fn test_gap_tolerance_change_refreshes_gap_closed() {
        let (mut state, mut path) = engine();
        let mut controller = PegController::new(&mut state, &mut path);

        controller
            .update_path(
                T0 + SECONDS_PER_DAY,
                &MockOracle::price(ONE * 102 / 100),
                &MockGate::operator(),
            )
            .unwrap();
        assert!(!controller.path().is_gap_closed);

        controller
            .set_gap_tolerance(200, &MockGate::admin())
            .unwrap();
        assert!(controller.path().is_gap_closed);
    }

    #[test]
    fn test_peg_status_reports_rate_limit_and_invalid_price() {
        let (mut state, mut path) = engine();
        let mut controller = PegController::new(&mut state, &mut path);
        let oracle = MockOracle::price(ONE * 2);
        let mut supply = MockSupply::default();

        controller
            .maintain_peg(T0, &oracle, &mut supply, &MockGate::operator())
            .unwrap();

        let status = controller.peg_status(T0 + 1, &oracle).unwrap();
        assert!(!status.can_operate);
        assert_eq!(status.deviation_bps, 10_000);
        assert!(status.gap_closed);

        assert_eq!(
            controller
                .peg_status(T0 + 1, &MockOracle::invalid())
                .unwrap_err(),
            PegError::InvalidPriceData.into()
        );
    }
}
