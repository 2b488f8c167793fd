use anchor_lang::prelude::*;

use crate::{
    constants::{
        DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_ORACLE_MAX_AGE, FAIT_FEED_NAME,
        MAX_AGE_UPPER_BOUND, MAX_CONFIDENCE_THRESHOLD, NGDP_FEED_NAME,
    },
    errors::PegError,
    state::{OperationRecord, TargetingConfig},
};

/// Pyth feeds and acceptance policy for oracle readings
#[derive(Clone, Copy, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize, InitSpace)]
pub struct OracleConfig {
    // Pyth feed id backing FAIT_USD
    pub fait_feed_id: [u8; 32],

    // Pyth feed id backing NGDP_USD
    pub ngdp_feed_id: [u8; 32],

    // The length of time (in seconds) that an oracle price is considered valid
    pub max_age: u64,

    // Maximum confidence interval as a percentage of the price
    pub confidence_threshold: u64,
}

impl OracleConfig {
    pub fn new(fait_feed_id: [u8; 32], ngdp_feed_id: [u8; 32]) -> Result<Self> {
        let mut config = Self {
            fait_feed_id: [0; 32],
            ngdp_feed_id: [0; 32],
            max_age: DEFAULT_ORACLE_MAX_AGE,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        };
        config.set_feed_id(FAIT_FEED_NAME, fait_feed_id)?;
        config.set_feed_id(NGDP_FEED_NAME, ngdp_feed_id)?;

        Ok(config)
    }

    pub fn feed_id_for(&self, feed_name: &str) -> Result<[u8; 32]> {
        match feed_name {
            FAIT_FEED_NAME => Ok(self.fait_feed_id),
            NGDP_FEED_NAME => Ok(self.ngdp_feed_id),
            _ => err!(PegError::UnknownOracleFeed),
        }
    }

    /// Replace the feed id backing `feed_name`, returning the previous id
    pub fn set_feed_id(&mut self, feed_name: &str, feed_id: [u8; 32]) -> Result<[u8; 32]> {
        require!(feed_id != [0; 32], PegError::InvalidOracleFeedId);

        let slot = match feed_name {
            FAIT_FEED_NAME => &mut self.fait_feed_id,
            NGDP_FEED_NAME => &mut self.ngdp_feed_id,
            _ => return err!(PegError::UnknownOracleFeed),
        };

        Ok(std::mem::replace(slot, feed_id))
    }

    pub fn set_max_age(&mut self, max_age: u64) -> Result<u64> {
        // Validate the new oracle price max age
        require_gt!(max_age, 0, PegError::InvalidOraclePriceMaxAge);

        // Ensure it does not exceed the upper bound
        require_gte!(
            MAX_AGE_UPPER_BOUND,
            max_age,
            PegError::InvalidOraclePriceMaxAge
        );

        Ok(std::mem::replace(&mut self.max_age, max_age))
    }

    pub fn set_confidence_threshold(&mut self, threshold: u64) -> Result<u64> {
        require_gt!(threshold, 0, PegError::InvalidConfidenceThreshold);
        require_gte!(
            MAX_CONFIDENCE_THRESHOLD,
            threshold,
            PegError::InvalidConfidenceThreshold
        );

        Ok(std::mem::replace(&mut self.confidence_threshold, threshold))
    }
}

/// PegEngineState state account - configuration and counters of the peg controller
#[account]
#[derive(InitSpace, Debug, PartialEq, Eq)]
pub struct PegEngineState {
    // The address that initialized the engine
    pub authority: Pubkey,

    // The supply-controlled mint
    pub mint: Pubkey,

    // Token account that receives mints and funds burns
    pub treasury: Pubkey,

    // Peg targeting parameters
    pub config: TargetingConfig,

    // Oracle feeds and acceptance policy
    pub oracle: OracleConfig,

    // Lifetime and daily operation counters
    pub record: OperationRecord,

    // Cap on the mint's total supply, in mint base units
    pub max_supply: u64,

    // Whether maintain_peg may run
    pub auto_operations_enabled: bool,

    // Whether the engine is paused
    pub paused: bool,

    // The bump used to derive the PDA for this account
    // Stored so we don't need to recalculate it later
    pub bump: u8,

    // The bump of the supply authority PDA that signs mints and burns
    pub supply_authority_bump: u8,
}

impl PegEngineState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        authority: Pubkey,
        mint: Pubkey,
        treasury: Pubkey,
        config: TargetingConfig,
        oracle: OracleConfig,
        max_supply: u64,
        bump: u8,
        supply_authority_bump: u8,
    ) -> Result<Self> {
        config.validate()?;
        require_gt!(max_supply, 0, PegError::InvalidMaxSupply);

        Ok(Self {
            authority,
            mint,
            treasury,
            config,
            oracle,
            record: OperationRecord::default(),
            max_supply,
            auto_operations_enabled: true,
            paused: false,
            bump,
            supply_authority_bump,
        })
    }

    pub fn set_max_supply(&mut self, max_supply: u64) -> Result<u64> {
        require_gt!(max_supply, 0, PegError::InvalidMaxSupply);

        Ok(std::mem::replace(&mut self.max_supply, max_supply))
    }
}
