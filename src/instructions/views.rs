use anchor_lang::prelude::*;
use pyth_solana_receiver_sdk::price_update::PriceUpdateV2;

use crate::{
    constants::{PEG_ENGINE_STATE_SEED, PRICE_PATH_SEED},
    instructions::PythOracleFeed,
    peg::{operation_stats, path_stats, peg_status, OperationStats, PathStats, PegStatus},
    state::{PathPoint, PegEngineState, PricePath},
};

/// Read-only views over the peg engine accounts
/// Results are returned through the instruction return data
#[derive(Accounts)]
pub struct PegEngineView<'info> {
    #[account(
        seeds = [PEG_ENGINE_STATE_SEED],
        bump = peg_engine_state.bump,
    )]
    pub peg_engine_state: Account<'info, PegEngineState>,

    #[account(
        seeds = [PRICE_PATH_SEED],
        bump = price_path.bump,
    )]
    pub price_path: Account<'info, PricePath>,
}

impl<'info> PegEngineView<'info> {
    /// Path point for `period`, genesis is period 0
    pub fn get_path_point(&self, period: u64) -> Result<PathPoint> {
        self.price_path.get_point(period)
    }

    /// Up to `count` consecutive retained path points starting at `start`
    pub fn get_path_points(&self, start: u64, count: u64) -> Result<Vec<PathPoint>> {
        self.price_path.get_points(start, count)
    }

    pub fn get_path_stats(&self) -> Result<PathStats> {
        Ok(path_stats(&self.peg_engine_state, &self.price_path))
    }

    pub fn get_operation_stats(&self) -> Result<OperationStats> {
        let now = Clock::get()?.unix_timestamp;
        Ok(operation_stats(&self.peg_engine_state, now))
    }
}

/// Peg status against the live Pyth price
#[derive(Accounts)]
pub struct GetPegStatus<'info> {
    #[account(
        seeds = [PEG_ENGINE_STATE_SEED],
        bump = peg_engine_state.bump,
    )]
    pub peg_engine_state: Account<'info, PegEngineState>,

    #[account(
        seeds = [PRICE_PATH_SEED],
        bump = price_path.bump,
    )]
    pub price_path: Account<'info, PricePath>,

    /// The Pyth price update for the feed of the current targeting mode
    pub price_update: Account<'info, PriceUpdateV2>,
}

impl<'info> GetPegStatus<'info> {
    /// Evaluate the stored path against the current price without advancing it
    pub fn get_peg_status(&self) -> Result<PegStatus> {
        let clock = Clock::get()?;
        let oracle = PythOracleFeed::new(&self.price_update, self.peg_engine_state.oracle, &clock);

        peg_status(
            &self.peg_engine_state,
            &self.price_path,
            clock.unix_timestamp,
            &oracle,
        )
    }
}
