use anchor_lang::prelude::*;

use crate::{
    constants::{MAX_PERIODS_PER_ADVANCE, PATH_HISTORY_CAPACITY},
    errors::PegError,
    peg::{period_gap_bps, target_value_for_period},
    state::TargetingConfig,
};

/// Snapshot of target and observed value at one path period boundary
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, AnchorSerialize, AnchorDeserialize, InitSpace)]
pub struct PathPoint {
    // Period boundary, always genesis timestamp plus a whole number of intervals
    pub period_timestamp: i64,

    // Target value under the growth model (18 decimals)
    pub target_value: u128,

    // Observed value, or the previous actual when the oracle was unusable (18 decimals)
    pub actual_value: u128,

    // Signed running gap in basis points up to and including this period
    pub cumulative_gap: i64,
}

/// PricePath state account - the level-targeting trajectory
///
/// Holds the genesis point plus a window of the most recent
/// `PATH_HISTORY_CAPACITY` points. Every appended point is also emitted as a
/// `PathUpdated` event, so the complete history can be rebuilt from logs.
#[account]
#[derive(InitSpace, Debug, PartialEq, Eq)]
pub struct PricePath {
    // Period zero
    pub genesis: PathPoint,

    // Number of periods appended after genesis
    pub current_period: u64,

    // Mirrors the latest point's cumulative gap
    pub cumulative_gap: i64,

    // |cumulative_gap| <= gap_tolerance
    pub is_gap_closed: bool,

    // Most recent points, oldest first, period `current_period` last
    #[max_len(PATH_HISTORY_CAPACITY)]
    pub points: Vec<PathPoint>,

    // The bump used to derive the PDA for this account
    // Stored so we don't need to recalculate it later
    pub bump: u8,
}

/// Latest point of a path together with its gap state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathTip {
    pub latest: PathPoint,
    pub cumulative_gap: i64,
    pub is_gap_closed: bool,
}

/// Whether a cumulative gap is within tolerance
#[inline(always)]
pub fn gap_within_tolerance(cumulative_gap: i64, gap_tolerance: u64) -> bool {
    cumulative_gap.unsigned_abs() <= gap_tolerance
}

impl PricePath {
    /// Creates a path whose genesis target and actual both equal `initial_target_price`
    pub fn new(initial_target_price: u128, genesis_timestamp: i64, bump: u8) -> Result<Self> {
        require_gt!(initial_target_price, 0, PegError::InvalidInitialPrice);

        Ok(Self {
            genesis: PathPoint {
                period_timestamp: genesis_timestamp,
                target_value: initial_target_price,
                actual_value: initial_target_price,
                cumulative_gap: 0,
            },
            current_period: 0,
            cumulative_gap: 0,
            is_gap_closed: true,
            points: Vec::new(),
            bump,
        })
    }

    pub fn latest(&self) -> &PathPoint {
        self.points.last().unwrap_or(&self.genesis)
    }

    /// First period still held in `points`
    fn oldest_retained_period(&self) -> u64 {
        // `points` never holds more entries than periods appended
        self.current_period + 1 - self.points.len() as u64
    }

    /// Latest point with the path's current gap state
    pub fn tip(&self) -> PathTip {
        PathTip {
            latest: *self.latest(),
            cumulative_gap: self.cumulative_gap,
            is_gap_closed: self.is_gap_closed,
        }
    }

    /// Tip the path would have once `pending` is appended
    pub fn tip_after(&self, pending: &[PathPoint], gap_tolerance: u64) -> PathTip {
        match pending.last() {
            Some(last) => PathTip {
                latest: *last,
                cumulative_gap: last.cumulative_gap,
                is_gap_closed: gap_within_tolerance(last.cumulative_gap, gap_tolerance),
            },
            None => self.tip(),
        }
    }

    /// Computes the points due at `now` without writing anything
    ///
    /// One point per whole `path_update_interval` elapsed since the latest point,
    /// at most `MAX_PERIODS_PER_ADVANCE`; the rest stay due for the next call.
    /// Every point uses the same `observed` value, `None` reuses the latest actual value.
    /// # Returns
    /// * `Result<Vec<PathPoint>>` - The due points, oldest first
    pub fn pending_points(
        &self,
        now: i64,
        config: &TargetingConfig,
        observed: Option<u128>,
    ) -> Result<Vec<PathPoint>> {
        let interval = config.path_update_interval;
        require_gt!(interval, 0, PegError::InvalidPathUpdateInterval);

        let latest = *self.latest();
        let elapsed = now.saturating_sub(latest.period_timestamp);
        if elapsed < interval {
            return Ok(Vec::new());
        }

        let periods_due = (elapsed / interval) as u64;
        let periods_to_add = periods_due.min(MAX_PERIODS_PER_ADVANCE);
        if periods_due > periods_to_add {
            msg!(
                "Path is {} periods behind, appending {}",
                periods_due,
                periods_to_add
            );
        }
        let actual_value = observed.unwrap_or(latest.actual_value);

        let mut pending = Vec::with_capacity(periods_to_add as usize);
        let mut period = self.current_period;
        let mut period_timestamp = latest.period_timestamp;
        let mut cumulative_gap = self.cumulative_gap;

        for _ in 0..periods_to_add {
            period = period.checked_add(1).ok_or(PegError::MathOverflow)?;
            period_timestamp = period_timestamp
                .checked_add(interval)
                .ok_or(PegError::MathOverflow)?;

            let target_value = target_value_for_period(self.genesis.target_value, period, config)?;
            let gap = period_gap_bps(actual_value, target_value)?;
            cumulative_gap = cumulative_gap
                .checked_add(gap)
                .ok_or(PegError::MathOverflow)?;

            pending.push(PathPoint {
                period_timestamp,
                target_value,
                actual_value,
                cumulative_gap,
            });
        }

        Ok(pending)
    }

    /// Appends points computed by `pending_points`, dropping the oldest beyond capacity
    pub fn append(&mut self, pending: &[PathPoint], gap_tolerance: u64) {
        let Some(last) = pending.last() else {
            return;
        };

        let kept = &pending[pending.len().saturating_sub(PATH_HISTORY_CAPACITY)..];
        let overflow = (self.points.len() + kept.len()).saturating_sub(PATH_HISTORY_CAPACITY);
        self.points.drain(..overflow);
        self.points.reserve_exact(kept.len());
        self.points.extend_from_slice(kept);

        self.current_period += pending.len() as u64;
        self.cumulative_gap = last.cumulative_gap;
        self.is_gap_closed = gap_within_tolerance(last.cumulative_gap, gap_tolerance);
    }

    /// `pending_points` followed by `append`
    /// # Returns
    /// * `Result<Vec<PathPoint>>` - The appended points, oldest first
    pub fn advance_if_due(
        &mut self,
        now: i64,
        config: &TargetingConfig,
        observed: Option<u128>,
    ) -> Result<Vec<PathPoint>> {
        let pending = self.pending_points(now, config, observed)?;
        self.append(&pending, config.gap_tolerance);

        Ok(pending)
    }

    /// Re-evaluates `is_gap_closed` after the gap tolerance changes
    pub fn refresh_gap_closed(&mut self, gap_tolerance: u64) {
        self.is_gap_closed = gap_within_tolerance(self.cumulative_gap, gap_tolerance);
    }

    /// Look up a recorded period
    /// # Returns
    /// * `Result<PathPoint>` - `PathPointNotFound` past `current_period`,
    ///   `PathPointPruned` when the period fell out of the retained window
    pub fn get_point(&self, period: u64) -> Result<PathPoint> {
        if period == 0 {
            return Ok(self.genesis);
        }
        require_gte!(self.current_period, period, PegError::PathPointNotFound);

        let oldest = self.oldest_retained_period();
        require_gte!(period, oldest, PegError::PathPointPruned);

        self.points
            .get((period - oldest) as usize)
            .copied()
            .ok_or(PegError::PathPointNotFound.into())
    }

    /// Contiguous range of `count` recorded periods starting at `start`
    pub fn get_points(&self, start: u64, count: u64) -> Result<Vec<PathPoint>> {
        let end = start.checked_add(count).ok_or(PegError::MathOverflow)?;
        (start..end).map(|period| self.get_point(period)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{PRICE_PRECISION, SECONDS_PER_DAY, SECONDS_PER_HOUR};
    use proptest::prelude::*;

    const GENESIS_TS: i64 = 1_700_000_000;
    const ONE: u128 = PRICE_PRECISION;

    fn flat_config() -> TargetingConfig {
        TargetingConfig {
            target_growth_rate: 0,
            ..TargetingConfig::default()
        }
    }

    fn path() -> PricePath {
        PricePath::new(ONE, GENESIS_TS, 255).unwrap()
    }

    #[test]
    fn test_new_rejects_zero_price() {
        assert_eq!(
            PricePath::new(0, GENESIS_TS, 0).unwrap_err(),
            PegError::InvalidInitialPrice.into()
        );
    }

    #[test]
    fn test_genesis_point() {
        let path = path();
        let genesis = path.get_point(0).unwrap();
        assert_eq!(genesis.target_value, ONE);
        assert_eq!(genesis.actual_value, ONE);
        assert_eq!(genesis.cumulative_gap, 0);
        assert_eq!(path.latest(), &genesis);
        assert!(path.is_gap_closed);
    }

    #[test]
    fn test_advance_before_interval_is_noop() {
        let mut path = path();
        let before = path.clone();

        let appended = path
            .advance_if_due(GENESIS_TS + SECONDS_PER_DAY - 1, &flat_config(), Some(ONE / 2))
            .unwrap();
        assert!(appended.is_empty());
        assert_eq!(path, before);
    }

    #[test]
    fn test_advance_truncates_partial_periods() {
        let mut path = path();
        let config = flat_config();

        // Two and a half days appends two points
        let now = GENESIS_TS + 2 * SECONDS_PER_DAY + SECONDS_PER_DAY / 2;
        let appended = path.advance_if_due(now, &config, Some(ONE)).unwrap();
        assert_eq!(appended.len(), 2);
        assert_eq!(path.current_period, 2);
        assert_eq!(
            path.latest().period_timestamp,
            GENESIS_TS + 2 * SECONDS_PER_DAY
        );

        // The leftover half day counts toward the next boundary
        let appended = path
            .advance_if_due(GENESIS_TS + 3 * SECONDS_PER_DAY, &config, Some(ONE))
            .unwrap();
        assert_eq!(appended.len(), 1);
        assert_eq!(path.current_period, 3);
    }

    #[test]
    fn test_multi_period_catchup_reuses_one_observation() {
        let mut path = path();
        let appended = path
            .advance_if_due(GENESIS_TS + 3 * SECONDS_PER_DAY, &flat_config(), Some(ONE / 2))
            .unwrap();

        assert_eq!(appended.len(), 3);
        for (k, point) in appended.iter().enumerate() {
            assert_eq!(point.actual_value, ONE / 2);
            assert_eq!(point.cumulative_gap, -5_000 * (k as i64 + 1));
        }
        assert_eq!(path.cumulative_gap, -15_000);
        assert!(!path.is_gap_closed);
    }

    #[test]
    fn test_invalid_oracle_falls_back_to_previous_actual() {
        let mut path = path();
        let config = flat_config();
        path.advance_if_due(GENESIS_TS + SECONDS_PER_DAY, &config, Some(ONE * 11 / 10))
            .unwrap();

        let appended = path
            .advance_if_due(GENESIS_TS + 2 * SECONDS_PER_DAY, &config, None)
            .unwrap();
        assert_eq!(appended[0].actual_value, ONE * 11 / 10);
        assert_eq!(path.cumulative_gap, 2_000);
    }

    #[test]
    fn test_gap_closed_uses_tolerance() {
        let mut path = path();
        let config = TargetingConfig {
            gap_tolerance: 100,
            ..flat_config()
        };

        // 1% over target for one period
        path.advance_if_due(GENESIS_TS + SECONDS_PER_DAY, &config, Some(ONE * 101 / 100))
            .unwrap();
        assert_eq!(path.cumulative_gap, 100);
        assert!(path.is_gap_closed);

        path.advance_if_due(GENESIS_TS + 2 * SECONDS_PER_DAY, &config, None)
            .unwrap();
        assert_eq!(path.cumulative_gap, 200);
        assert!(!path.is_gap_closed);

        path.refresh_gap_closed(200);
        assert!(path.is_gap_closed);
    }

    #[test]
    fn test_growth_applies_to_targets() {
        let mut path = path();
        // 10% per year at yearly intervals gives 1000 bps per period
        let config = TargetingConfig {
            target_growth_rate: 1_000,
            path_update_interval: crate::constants::SECONDS_PER_YEAR,
            ..TargetingConfig::default()
        };
        let appended = path
            .advance_if_due(
                GENESIS_TS + 2 * crate::constants::SECONDS_PER_YEAR,
                &config,
                Some(ONE),
            )
            .unwrap();

        assert_eq!(appended[0].target_value, ONE * 11 / 10);
        assert_eq!(appended[1].target_value, ONE * 12 / 10);
        // (1.0 - 1.1) / 1.1 = -909 bps, (1.0 - 1.2) / 1.2 = -1666 bps
        assert_eq!(appended[1].cumulative_gap, -909 - 1_666);
    }

    #[test]
    fn test_retention_window_and_lookup() {
        let mut path = path();
        let config = TargetingConfig {
            path_update_interval: SECONDS_PER_HOUR,
            ..flat_config()
        };
        let total = PATH_HISTORY_CAPACITY as u64 + 10;
        let now = GENESIS_TS + total as i64 * SECONDS_PER_HOUR;
        while path.current_period < total {
            path.advance_if_due(now, &config, Some(ONE)).unwrap();
        }

        assert_eq!(path.current_period, total);
        assert_eq!(path.points.len(), PATH_HISTORY_CAPACITY);

        // Genesis is always retained
        assert_eq!(path.get_point(0).unwrap().period_timestamp, GENESIS_TS);
        assert_eq!(
            path.get_point(10).unwrap_err(),
            PegError::PathPointPruned.into()
        );
        assert_eq!(
            path.get_point(11).unwrap().period_timestamp,
            GENESIS_TS + 11 * SECONDS_PER_HOUR
        );
        assert_eq!(
            path.get_point(total).unwrap().period_timestamp,
            GENESIS_TS + total as i64 * SECONDS_PER_HOUR
        );
        assert_eq!(
            path.get_point(total + 1).unwrap_err(),
            PegError::PathPointNotFound.into()
        );
    }

    #[test]
    fn test_long_backlog_drains_over_several_advances() {
        let mut path = path();
        let config = TargetingConfig {
            path_update_interval: SECONDS_PER_HOUR,
            ..flat_config()
        };
        let behind = 100;
        let now = GENESIS_TS + behind * SECONDS_PER_HOUR;

        let pending = path.pending_points(now, &config, Some(ONE / 2)).unwrap();
        assert_eq!(pending.len() as u64, MAX_PERIODS_PER_ADVANCE);

        let mut calls = 0;
        while path.current_period < behind as u64 {
            let appended = path.advance_if_due(now, &config, Some(ONE / 2)).unwrap();
            assert!(!appended.is_empty());
            assert!(appended.len() as u64 <= MAX_PERIODS_PER_ADVANCE);
            calls += 1;
        }

        assert_eq!(calls, 4);
        assert_eq!(path.points.len(), behind as usize);
        assert_eq!(path.cumulative_gap, -5_000 * behind);
        assert_eq!(path.latest().period_timestamp, now);
        assert!(path.advance_if_due(now, &config, Some(ONE)).unwrap().is_empty());
    }

    #[test]
    fn test_pending_points_leave_path_untouched() {
        let path = path();
        let before = path.clone();
        let config = flat_config();

        let pending = path
            .pending_points(GENESIS_TS + 2 * SECONDS_PER_DAY, &config, Some(ONE * 2))
            .unwrap();
        assert_eq!(path, before);

        let tip = path.tip_after(&pending, config.gap_tolerance);
        assert_eq!(tip.latest, pending[1]);
        assert_eq!(tip.cumulative_gap, 20_000);
        assert!(!tip.is_gap_closed);
        assert_eq!(path.tip_after(&[], config.gap_tolerance), path.tip());
    }

    #[test]
    fn test_get_points_range() {
        let mut path = path();
        path.advance_if_due(GENESIS_TS + 3 * SECONDS_PER_DAY, &flat_config(), Some(ONE))
            .unwrap();

        let points = path.get_points(0, 4).unwrap();
        assert_eq!(points.len(), 4);
        assert_eq!(points[0], path.genesis);
        assert_eq!(points[3], *path.latest());

        assert!(path.get_points(2, 3).is_err());
        assert!(path.get_points(1, 0).unwrap().is_empty());
    }

    proptest! {
        #[test]
        fn prop_path_timestamps_are_interval_spaced(
            steps in prop::collection::vec((0i64..5 * SECONDS_PER_DAY, 1u128..3 * ONE), 1..20)
        ) {
            let mut path = path();
            let config = flat_config();
            let mut now = GENESIS_TS;

            for (advance, price) in steps {
                now += advance;
                path.advance_if_due(now, &config, Some(price)).unwrap();

                let latest = path.latest();
                prop_assert_eq!(
                    latest.period_timestamp,
                    GENESIS_TS + path.current_period as i64 * SECONDS_PER_DAY
                );
                prop_assert!(now - latest.period_timestamp < SECONDS_PER_DAY);
            }

            for window in path.points.windows(2) {
                prop_assert!(window[0].period_timestamp < window[1].period_timestamp);
            }
        }

        #[test]
        fn prop_cumulative_gap_is_sum_of_period_gaps(
            prices in prop::collection::vec(1u128..3 * ONE, 1..40),
            tolerance in 0u64..=1_000,
        ) {
            let mut path = path();
            let config = TargetingConfig { gap_tolerance: tolerance, ..TargetingConfig::default() };

            for (k, price) in prices.iter().enumerate() {
                let now = GENESIS_TS + (k as i64 + 1) * SECONDS_PER_DAY;
                path.advance_if_due(now, &config, Some(*price)).unwrap();
                prop_assert_eq!(path.is_gap_closed, path.cumulative_gap.unsigned_abs() <= tolerance);
            }

            let mut expected = 0i64;
            for point in &path.points {
                expected += period_gap_bps(point.actual_value, point.target_value).unwrap();
                prop_assert_eq!(point.cumulative_gap, expected);
            }
            prop_assert_eq!(path.cumulative_gap, expected);
        }
    }
}
