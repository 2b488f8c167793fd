use anchor_lang::prelude::*;

use crate::{errors::PegError, state::RoleType};

/// A single oracle observation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OracleReading {
    // Price in 18-decimal fixed point
    pub value: u128,

    // Publish time of the observation
    pub timestamp: i64,

    // 0-100, higher is tighter
    pub confidence: u8,

    // False when stale, under-confident or otherwise unusable
    pub is_valid: bool,
}

impl OracleReading {
    pub fn invalid() -> Self {
        Self::default()
    }

    /// The price if it may be acted on
    pub fn usable_value(&self) -> Option<u128> {
        (self.is_valid && self.value > 0).then_some(self.value)
    }
}

/// Source of price observations by feed name
pub trait OracleFeed {
    /// Latest reading for `feed_name`
    /// Staleness and confidence failures are reported as `is_valid = false`;
    /// `Err` is reserved for misconfiguration such as an unknown feed
    fn get_latest(&self, feed_name: &str) -> Result<OracleReading>;
}

/// Mints into and burns from the engine's own treasury
/// Amounts are 18-decimal fixed point
pub trait SupplyController {
    /// Returns the amount actually minted, which the token's precision may round below `amount`
    fn mint(&mut self, amount: u128) -> Result<u128>;

    /// Returns the amount actually burned, which the token's precision may round below `amount`
    fn burn(&mut self, amount: u128) -> Result<u128>;

    fn balance_of_self(&self) -> Result<u128>;
}

/// Authorization and circuit breaker consulted before every mutation
pub trait AuthGate {
    fn caller(&self) -> Pubkey;

    fn check(&self, role: RoleType) -> bool;

    fn is_paused(&self) -> bool;
}

/// Requires `role` and an unpaused engine
pub fn authorize<G: AuthGate>(gate: &G, role: RoleType) -> Result<()> {
    require!(gate.check(role), PegError::Unauthorized);
    require!(!gate.is_paused(), PegError::SystemPaused);
    Ok(())
}
