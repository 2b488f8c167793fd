use anchor_lang::prelude::*;

use crate::{
    errors::PegError,
    peg::{adjusted_target, deviation_bps, gap_ratio, rate_limit_allows, OracleFeed},
    state::{PegEngineState, PricePath, TargetingMode},
};

/// Snapshot of the peg against the live oracle price
#[derive(Clone, Copy, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct PegStatus {
    pub current_price: u128,
    pub base_target: u128,
    pub adjusted_target: u128,
    pub deviation_bps: u64,
    pub peg_maintained: bool,
    pub can_operate: bool,
    pub cumulative_gap: i64,
    pub gap_closed: bool,
    pub gap_ratio: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct PathStats {
    // Recorded periods including genesis
    pub total_periods: u64,
    pub current_period: u64,
    // Periods still readable through get_path_point
    pub retained_periods: u64,
    pub cumulative_gap: i64,
    pub gap_closed: bool,
    pub targeting_mode: TargetingMode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct OperationStats {
    pub total_operations: u64,
    pub total_minted: u128,
    pub total_burned: u128,
    pub last_operation_timestamp: i64,
    pub operations_today: u32,
}

/// Result of a successful `maintain_peg`
#[derive(Clone, Copy, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub enum OperationOutcome {
    /// Deviation within peg tolerance
    NoAction { deviation_bps: u64 },
    Minted {
        amount: u128,
        deviation_bps: u64,
        gap_ratio: u64,
    },
    /// `executed` is `requested` clamped to the treasury balance
    Burned {
        requested: u128,
        executed: u128,
        deviation_bps: u64,
        gap_ratio: u64,
    },
}

/// Reads the oracle and evaluates the stored path against it without mutating anything
pub fn peg_status<O: OracleFeed>(
    state: &PegEngineState,
    path: &PricePath,
    now: i64,
    oracle: &O,
) -> Result<PegStatus> {
    let reading = oracle.get_latest(state.config.feed_name())?;
    let current_price = reading.usable_value().ok_or(PegError::InvalidPriceData)?;

    let tip = path.tip();
    let base_target = tip.latest.target_value;
    let adjusted_target = adjusted_target(base_target, &tip, &state.config)?;
    let deviation_bps = deviation_bps(current_price, adjusted_target)?;

    Ok(PegStatus {
        current_price,
        base_target,
        adjusted_target,
        deviation_bps,
        peg_maintained: deviation_bps <= state.config.peg_tolerance,
        can_operate: state.auto_operations_enabled
            && !state.paused
            && rate_limit_allows(now, &state.record, &state.config),
        cumulative_gap: path.cumulative_gap,
        gap_closed: path.is_gap_closed,
        gap_ratio: gap_ratio(&tip.latest)?,
    })
}

pub fn path_stats(state: &PegEngineState, path: &PricePath) -> PathStats {
    PathStats {
        total_periods: path.current_period + 1,
        current_period: path.current_period,
        retained_periods: path.points.len() as u64 + 1,
        cumulative_gap: path.cumulative_gap,
        gap_closed: path.is_gap_closed,
        targeting_mode: state.config.targeting_mode,
    }
}

pub fn operation_stats(state: &PegEngineState, now: i64) -> OperationStats {
    let record = &state.record;

    OperationStats {
        total_operations: record.operation_count,
        total_minted: record.total_minted,
        total_burned: record.total_burned,
        last_operation_timestamp: record.last_operation_timestamp,
        operations_today: record.operations_on(now),
    }
}
