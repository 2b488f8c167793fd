use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use pyth_solana_receiver_sdk::price_update::PriceUpdateV2;

use crate::{
    constants::{PEG_ENGINE_STATE_SEED, PRICE_PATH_SEED, SUPPLY_AUTHORITY_SEED},
    instructions::{PythOracleFeed, RoleGate, TreasurySupply},
    peg::{OperationOutcome, PegController},
    state::{PegEngineState, PricePath, Roles},
};

/// Automatic peg maintenance
/// Requires the `OperatorRolePegEngine` role
#[derive(Accounts)]
pub struct MaintainPeg<'info> {
    /// The operator triggering the peg check
    pub operator: Signer<'info>,

    /// The Roles account of the operator
    /// # PDA Seeds
    /// - The role seed (from RoleType)
    /// - The operator's address
    #[account(
        seeds = [authority_role_account.role.seed(), operator.key().as_ref()],
        bump = authority_role_account.bump,
    )]
    pub authority_role_account: Account<'info, Roles>,

    /// The PegEngineState account
    /// # PDA Seeds
    /// - PEG_ENGINE_STATE_SEED
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

    /// The Pyth price update for the feed of the current targeting mode
    /// The feed id is checked against the stored oracle configuration when read
    pub price_update: Account<'info, PriceUpdateV2>,

    /// The supply authority PDA
    /// # PDA Seeds
    /// - SUPPLY_AUTHORITY_SEED
    ///
    /// CHECK: Signs mints and burns. Its address is fixed by the seeds.
    #[account(
        seeds = [SUPPLY_AUTHORITY_SEED],
        bump = peg_engine_state.supply_authority_bump,
    )]
    pub supply_authority: UncheckedAccount<'info>,

    /// The supply-controlled mint
    #[account(
        mut,
        address = peg_engine_state.mint,
        mint::token_program = token_program,
    )]
    pub mint: InterfaceAccount<'info, Mint>,

    /// The treasury token account
    #[account(
        mut,
        address = peg_engine_state.treasury,
    )]
    pub treasury: InterfaceAccount<'info, TokenAccount>,

    /// The token program of `mint`
    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> MaintainPeg<'info> {
    /// Advance the price path if due and mint or burn toward the adjusted target
    /// # Returns
    /// * `Result<OperationOutcome>` - The action taken, Err if rejected
    pub fn maintain_peg(&mut self) -> Result<OperationOutcome> {
        let clock = Clock::get()?;

        let gate = RoleGate::new(
            self.operator.key(),
            self.authority_role_account.role,
            self.peg_engine_state.paused,
        );
        let oracle = PythOracleFeed::new(&self.price_update, self.peg_engine_state.oracle, &clock);
        let mut supply = TreasurySupply {
            mint: &mut self.mint,
            treasury: &mut self.treasury,
            supply_authority: &self.supply_authority,
            token_program: &self.token_program,
            supply_authority_bump: self.peg_engine_state.supply_authority_bump,
            max_supply: self.peg_engine_state.max_supply,
        };

        PegController::new(&mut self.peg_engine_state, &mut self.price_path).maintain_peg(
            clock.unix_timestamp,
            &oracle,
            &mut supply,
            &gate,
        )
    }
}

/// Standalone price path advancement
/// Requires the `OperatorRolePegEngine` role
#[derive(Accounts)]
pub struct UpdatePath<'info> {
    /// The operator triggering the update
    pub operator: Signer<'info>,

    /// The Roles account of the operator
    /// # PDA Seeds
    /// - The role seed (from RoleType)
    /// - The operator's address
    #[account(
        seeds = [authority_role_account.role.seed(), operator.key().as_ref()],
        bump = authority_role_account.bump,
    )]
    pub authority_role_account: Account<'info, Roles>,

    /// The PegEngineState account
    /// # PDA Seeds
    /// - PEG_ENGINE_STATE_SEED
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

    /// The Pyth price update supplying the actual value of new periods
    pub price_update: Account<'info, PriceUpdateV2>,
}

impl<'info> UpdatePath<'info> {
    /// Append every period that has elapsed since the latest path point
    /// # Returns
    /// * `Result<()>` - Ok if the path is current, Err otherwise
    pub fn update_path(&mut self) -> Result<()> {
        let clock = Clock::get()?;

        let gate = RoleGate::new(
            self.operator.key(),
            self.authority_role_account.role,
            self.peg_engine_state.paused,
        );
        let oracle = PythOracleFeed::new(&self.price_update, self.peg_engine_state.oracle, &clock);

        PegController::new(&mut self.peg_engine_state, &mut self.price_path).update_path(
            clock.unix_timestamp,
            &oracle,
            &gate,
        )
    }
}
