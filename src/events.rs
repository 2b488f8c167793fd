use anchor_lang::prelude::*;

use crate::state::{PegParameter, RoleType, SupplyAction};

/// Event emitted when a role is granted to a user
/// Fields:
/// - role: The role that was granted
/// - grantee: The public key of the user who was granted the role
/// - granter: The public key of the user who granted the role
#[event]
pub struct RoleGranted {
    pub role: RoleType,
    pub grantee: Pubkey,
    pub granter: Pubkey,
}

/// Event emitted when a role is revoked from a user
/// Fields:
/// - role: The role that was revoked
/// - grantee: The public key of the user who had the role revoked
/// - revoker: The public key of the user who revoked the role
#[event]
pub struct RoleRevoked {
    pub role: RoleType,
    pub grantee: Pubkey,
    pub revoker: Pubkey,
}

/// Event emitted when the peg engine is initialized
/// Fields:
/// - mint: The supply-controlled token mint
/// - treasury: The token account mints land in and burns draw from
/// - initial_target_price: The genesis target and actual value (18 decimals)
/// - genesis_timestamp: The timestamp of the genesis path point
#[event]
pub struct PegEngineInitialized {
    pub mint: Pubkey,
    pub treasury: Pubkey,
    pub initial_target_price: u128,
    pub genesis_timestamp: i64,
}

/// Event emitted for every period appended to the price path
#[event]
pub struct PathUpdated {
    pub period: u64,
    pub period_timestamp: i64,
    pub target_value: u128,
    pub actual_value: u128,
    pub cumulative_gap: i64,
    pub gap_closed: bool,
}

/// Event emitted when maintain_peg mints or burns
/// Fields:
/// - action: Mint or Burn
/// - requested_amount: The sized operation amount
/// - executed_amount: The amount actually minted or burned (burns clamp to balance)
/// - current_price: The oracle price the decision was made on
/// - adjusted_target: The gap-adjusted target price
/// - deviation_bps: Deviation from the adjusted target before the operation
/// - gap_ratio: Target/actual ratio of the latest path point, scaled by 1000
#[event]
pub struct PegOperationExecuted {
    pub action: SupplyAction,
    pub requested_amount: u128,
    pub executed_amount: u128,
    pub current_price: u128,
    pub adjusted_target: u128,
    pub deviation_bps: u64,
    pub gap_ratio: u64,
    pub timestamp: i64,
}

/// Event emitted when an administrative parameter changes
#[event]
pub struct ParameterUpdated {
    pub parameter: PegParameter,
    pub old_value: u128,
    pub new_value: u128,
    pub updated_by: Pubkey,
}

/// Event emitted when the Pyth feed id backing a feed name changes
#[event]
pub struct OracleFeedUpdated {
    pub feed_name: String,
    pub old_feed_id: [u8; 32],
    pub new_feed_id: [u8; 32],
    pub updated_by: Pubkey,
}

/// Event emitted when automatic peg operations are enabled or disabled
#[event]
pub struct AutoOperationsToggled {
    pub enabled: bool,
    pub updated_by: Pubkey,
}

/// Event emitted when the peg engine is paused or resumed
/// Fields:
/// - is_paused: Boolean indicating if the engine is paused
/// - pauser: The address of the operator who performed the pause/resume action
#[event]
pub struct PegEnginePaused {
    pub is_paused: bool,
    pub pauser: Pubkey,
}

/// Event emitted when an emergency operator mints or burns directly
#[event]
pub struct ManualIntervention {
    pub action: SupplyAction,
    pub amount: u128,
    pub reason: String,
    pub executed_by: Pubkey,
    pub timestamp: i64,
}

/// Event emitted when operation counters are imported from a prior engine
#[event]
pub struct StateMigrated {
    pub total_minted: u128,
    pub total_burned: u128,
    pub operation_count: u64,
    pub last_operation_timestamp: i64,
    pub migrated_by: Pubkey,
}
