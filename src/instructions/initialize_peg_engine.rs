use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::{
    constants::{PEG_ENGINE_STATE_SEED, PRICE_PATH_SEED, SUPPLY_AUTHORITY_SEED},
    events::PegEngineInitialized,
    state::{OracleConfig, PegEngineState, PricePath, RoleType, Roles, TargetingConfig, TargetingMode},
};

/// Initialize the PegEngineState and PricePath accounts
/// Requires the `AdminRolePegEngine` role
#[derive(Accounts)]
pub struct InitializePegEngine<'info> {
    /// Pays for account creation
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The account with the authority to initialize the peg engine
    pub authority: Signer<'info>,

    /// The Roles account verifying the authority has the `AdminRolePegEngine` role
    /// # PDA Seeds
    /// - ADMIN_ROLE_PEG_ENGINE
    /// - The authority's address
    #[account(
        seeds = [RoleType::ADMIN_ROLE_PEG_ENGINE, authority.key().as_ref()],
        bump = authority_role_account.bump,
    )]
    pub authority_role_account: Account<'info, Roles>,

    /// The supply authority PDA
    /// # PDA Seeds
    /// - SUPPLY_AUTHORITY_SEED
    ///
    /// CHECK: This account is used to verify the mint authority and treasury owner.
    /// Does not need to be checked for correctness as it is uninitialized.
    #[account(
        seeds = [SUPPLY_AUTHORITY_SEED],
        bump,
    )]
    pub supply_authority: UncheckedAccount<'info>,

    /// The supply-controlled mint
    /// Must have `supply_authority` as its mint authority
    #[account(
        mint::authority = supply_authority,
        mint::token_program = token_program,
    )]
    pub mint: InterfaceAccount<'info, Mint>,

    /// The treasury token account receiving mints and funding burns
    /// Must be owned by `supply_authority`
    #[account(
        token::mint = mint,
        token::authority = supply_authority,
        token::token_program = token_program,
    )]
    pub treasury: InterfaceAccount<'info, TokenAccount>,

    /// The PegEngineState account to be initialized
    /// # PDA Seeds
    /// - PEG_ENGINE_STATE_SEED
    #[account(
        init,
        payer = payer,
        space = 8 + PegEngineState::INIT_SPACE,
        seeds = [PEG_ENGINE_STATE_SEED],
        bump
    )]
    pub peg_engine_state: Account<'info, PegEngineState>,

    /// The PricePath account to be initialized
    /// # PDA Seeds
    /// - PRICE_PATH_SEED
    #[account(
        init,
        payer = payer,
        space = 8 + PricePath::INIT_SPACE,
        seeds = [PRICE_PATH_SEED],
        bump
    )]
    pub price_path: Account<'info, PricePath>,

    /// The token program of `mint`
    pub token_program: Interface<'info, TokenInterface>,

    /// The system program
    pub system_program: Program<'info, System>,
}

impl<'info> InitializePegEngine<'info> {
    /// Initialize the peg engine with the default targeting parameters
    /// # Arguments
    /// * `initial_target_price` - Genesis target price, 18 decimals, must be > 0
    /// * `targeting_mode` - The initial targeting mode
    /// * `fait_feed_id` - Pyth feed id backing FAIT_USD
    /// * `ngdp_feed_id` - Pyth feed id backing NGDP_USD
    /// * `max_supply` - Cap on the mint's supply in base units, must be > 0
    /// * `bumps` - The PDA bumps for account derivation
    /// # Returns
    /// * `Result<()>` - Ok if both accounts are initialized, Err otherwise
    pub fn initialize_peg_engine(
        &mut self,
        initial_target_price: u128,
        targeting_mode: TargetingMode,
        fait_feed_id: [u8; 32],
        ngdp_feed_id: [u8; 32],
        max_supply: u64,
        bumps: &InitializePegEngineBumps,
    ) -> Result<()> {
        let genesis_timestamp = Clock::get()?.unix_timestamp;

        let config = TargetingConfig {
            targeting_mode,
            ..TargetingConfig::default()
        };

        self.peg_engine_state.set_inner(PegEngineState::new(
            self.authority.key(),
            self.mint.key(),
            self.treasury.key(),
            config,
            OracleConfig::new(fait_feed_id, ngdp_feed_id)?,
            max_supply,
            bumps.peg_engine_state,
            bumps.supply_authority,
        )?);

        self.price_path.set_inner(PricePath::new(
            initial_target_price,
            genesis_timestamp,
            bumps.price_path,
        )?);

        emit!(PegEngineInitialized {
            mint: self.mint.key(),
            treasury: self.treasury.key(),
            initial_target_price,
            genesis_timestamp,
        });

        Ok(())
    }
}
