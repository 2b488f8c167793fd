use anchor_lang::prelude::*;

/// Roles state account - tracks role assignments for addresses
#[account]
pub struct Roles {
    // The address assigned to the role
    pub address: Pubkey,

    // The type of role assigned
    pub role: RoleType,

    // The bump used to derive the PDA for this account
    // Stored so we don't need to recalculate it later
    pub bump: u8,
}

impl Space for Roles {
    const INIT_SPACE: usize = 8 + size_of::<Roles>();
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, AnchorDeserialize, AnchorSerialize)]
pub enum RoleType {
    AdminRolePegEngine,
    OperatorRolePegEngine,
    EmergencyRolePegEngine,
    PauserRolePegEngine,
}

impl RoleType {
    pub const ADMIN_ROLE_PEG_ENGINE: &[u8] = b"AdminRolePegEngine";
    pub const OPERATOR_ROLE_PEG_ENGINE: &[u8] = b"OperatorRolePegEngine";
    pub const EMERGENCY_ROLE_PEG_ENGINE: &[u8] = b"EmergencyRolePegEngine";
    pub const PAUSER_ROLE_PEG_ENGINE: &[u8] = b"PauserRolePegEngine";

    pub const fn seed(&self) -> &'static [u8] {
        match self {
            RoleType::AdminRolePegEngine => Self::ADMIN_ROLE_PEG_ENGINE,
            RoleType::OperatorRolePegEngine => Self::OPERATOR_ROLE_PEG_ENGINE,
            RoleType::EmergencyRolePegEngine => Self::EMERGENCY_ROLE_PEG_ENGINE,
            RoleType::PauserRolePegEngine => Self::PAUSER_ROLE_PEG_ENGINE,
        }
    }
}
