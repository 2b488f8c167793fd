use anchor_lang::prelude::*;

use crate::{
    errors::PegError,
    events::{RoleGranted, RoleRevoked},
    state::{RoleType, Roles},
};

/// The program upgrade authority and the ProgramData account proving it
/// Shared by every role administration instruction
#[derive(Accounts)]
pub struct UpgradeAuthority<'info> {
    /// Must be the upgrade authority recorded in `program_data`
    pub authority: Signer<'info>,

    /// The peg engine program
    #[account(address = crate::ID)]
    pub program: Program<'info, crate::program::PegEngine>,

    /// The ProgramData account of the peg engine program
    #[account(
        constraint =
            program_data.upgrade_authority_address == Some(authority.key()) @ PegError::InvalidUser
    )]
    pub program_data: Account<'info, ProgramData>,
}

impl UpgradeAuthority<'_> {
    /// Fails unless `program_data` belongs to this program, returns the authority
    fn verify(&self) -> Result<Pubkey> {
        check_program_data(self.program.programdata_address()?, self.program_data.key())?;
        Ok(self.authority.key())
    }
}

/// `supplied` must be the ProgramData address of an upgradeable program
fn check_program_data(expected: Option<Pubkey>, supplied: Pubkey) -> Result<()> {
    let expected = expected.ok_or(PegError::ProgramMismatch)?;
    require_keys_eq!(expected, supplied, PegError::ProgramMismatch);
    Ok(())
}

/// Create the `Roles` account giving `user` the `role`
#[derive(Accounts)]
#[instruction(role: RoleType, user: Pubkey)]
pub struct GrantRole<'info> {
    /// Pays for the Roles account
    #[account(mut)]
    pub payer: Signer<'info>,

    pub upgrade_authority: UpgradeAuthority<'info>,

    /// # PDA Seeds
    /// - The role seed (from RoleType)
    /// - The user's address
    #[account(
        init,
        payer = payer,
        space = Roles::INIT_SPACE,
        seeds = [role.seed(), user.as_ref()],
        bump
    )]
    pub role_to_grant: Account<'info, Roles>,

    pub system_program: Program<'info, System>,
}

impl<'info> GrantRole<'info> {
    /// Fails if the user already holds `role`
    pub fn grant_role(&mut self, role: RoleType, user: Pubkey, bumps: &GrantRoleBumps) -> Result<()> {
        let granter = self.upgrade_authority.verify()?;

        self.role_to_grant.set_inner(Roles {
            address: user,
            role,
            bump: bumps.role_to_grant,
        });

        msg!("Granted {:?} to {}", role, user);
        emit!(RoleGranted {
            role,
            grantee: user,
            granter,
        });

        Ok(())
    }
}

/// Close a `Roles` account, refunding its rent to `recipient`
#[derive(Accounts)]
#[instruction(role: RoleType)]
pub struct RevokeRole<'info> {
    #[account(mut)]
    pub recipient: SystemAccount<'info>,

    pub upgrade_authority: UpgradeAuthority<'info>,

    /// # PDA Seeds
    /// - The role seed (from RoleType)
    /// - The holder's address
    #[account(
        mut,
        close = recipient,
        seeds = [role.seed(), role_to_revoke.address.as_ref()],
        bump = role_to_revoke.bump
    )]
    pub role_to_revoke: Account<'info, Roles>,

    pub system_program: Program<'info, System>,
}

impl<'info> RevokeRole<'info> {
    pub fn revoke_role(&mut self) -> Result<()> {
        let revoker = self.upgrade_authority.verify()?;
        let (address, role) = (self.role_to_revoke.address, self.role_to_revoke.role);

        msg!("Revoked {:?} from {}", role, address);
        emit!(RoleRevoked {
            role,
            grantee: address,
            revoker,
        });

        Ok(())
    }
}
