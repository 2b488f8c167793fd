use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::{
    constants::{PEG_ENGINE_STATE_SEED, PRICE_PATH_SEED, SUPPLY_AUTHORITY_SEED},
    instructions::{RoleGate, TreasurySupply},
    peg::PegController,
    state::{PegEngineState, PricePath, Roles, SupplyAction},
};

/// Emergency mint or burn of an explicit amount
/// Requires the `EmergencyRolePegEngine` role
#[derive(Accounts)]
pub struct ManualInterventionContext<'info> {
    /// The account executing the intervention
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

impl<'info> ManualInterventionContext<'info> {
    /// Mint into or burn from the treasury, bypassing deviation and rate limit checks
    /// # Arguments
    /// * `action` - Mint or Burn
    /// * `amount` - Amount in 18 decimals, must be > 0
    /// * `reason` - Non-empty justification of at most MAX_REASON_LENGTH bytes
    /// # Returns
    /// * `Result<()>` - Ok if the supply operation succeeded, Err otherwise
    pub fn manual_intervention(
        &mut self,
        action: SupplyAction,
        amount: u128,
        reason: &str,
    ) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;

        let gate = RoleGate::new(
            self.authority.key(),
            self.authority_role_account.role,
            self.peg_engine_state.paused,
        );
        let mut supply = TreasurySupply {
            mint: &mut self.mint,
            treasury: &mut self.treasury,
            supply_authority: &self.supply_authority,
            token_program: &self.token_program,
            supply_authority_bump: self.peg_engine_state.supply_authority_bump,
            max_supply: self.peg_engine_state.max_supply,
        };

        PegController::new(&mut self.peg_engine_state, &mut self.price_path).manual_intervention(
            now,
            action,
            amount,
            reason,
            &mut supply,
            &gate,
        )
    }
}
