use anchor_lang::prelude::*;

use crate::{
    constants::FAIT_FEED_NAME,
    errors::PegError,
    peg::{AuthGate, OracleFeed, OracleReading, SupplyController},
    state::RoleType,
};

/// Oracle serving one fixed reading for one feed name
pub struct MockOracle {
    pub feed_name: &'static str,
    pub reading: OracleReading,
}

impl MockOracle {
    pub fn price(value: u128) -> Self {
        Self {
            feed_name: FAIT_FEED_NAME,
            reading: OracleReading {
                value,
                timestamp: 0,
                confidence: 100,
                is_valid: true,
            },
        }
    }

    pub fn invalid() -> Self {
        Self {
            feed_name: FAIT_FEED_NAME,
            reading: OracleReading::invalid(),
        }
    }

    pub fn for_feed(mut self, feed_name: &'static str) -> Self {
        self.feed_name = feed_name;
        self
    }
}

impl OracleFeed for MockOracle {
    fn get_latest(&self, feed_name: &str) -> Result<OracleReading> {
        require!(feed_name == self.feed_name, PegError::UnknownOracleFeed);
        Ok(self.reading)
    }
}

/// In-memory treasury with an optional supply cap
#[derive(Default)]
pub struct MockSupply {
    pub balance: u128,
    pub total_supply: u128,
    pub max_supply: Option<u128>,
    // Smallest movable amount, 0 moves amounts exactly
    pub unit: u128,
    pub mints: Vec<u128>,
    pub burns: Vec<u128>,
}

impl MockSupply {
    pub fn with_balance(balance: u128) -> Self {
        Self {
            balance,
            total_supply: balance,
            ..Self::default()
        }
    }

    pub fn capped(max_supply: u128) -> Self {
        Self {
            max_supply: Some(max_supply),
            ..Self::default()
        }
    }

    /// Rounds every mint and burn down to a multiple of `unit`
    pub fn with_unit(mut self, unit: u128) -> Self {
        self.unit = unit;
        self
    }

    fn movable(&self, amount: u128) -> u128 {
        match self.unit {
            0 => amount,
            unit => amount - amount % unit,
        }
    }
}

impl SupplyController for MockSupply {
    fn mint(&mut self, amount: u128) -> Result<u128> {
        let amount = self.movable(amount);
        if amount == 0 {
            return Ok(0);
        }
        let total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(PegError::MathOverflow)?;
        if let Some(max_supply) = self.max_supply {
            require_gte!(max_supply, total_supply, PegError::MintCapExceeded);
        }

        self.total_supply = total_supply;
        self.balance += amount;
        self.mints.push(amount);
        Ok(amount)
    }

    fn burn(&mut self, amount: u128) -> Result<u128> {
        let amount = self.movable(amount);
        if amount == 0 {
            return Ok(0);
        }
        require_gte!(self.balance, amount, PegError::InsufficientBalance);

        self.balance -= amount;
        self.total_supply -= amount;
        self.burns.push(amount);
        Ok(amount)
    }

    fn balance_of_self(&self) -> Result<u128> {
        Ok(self.balance)
    }
}

pub struct MockGate {
    pub caller: Pubkey,
    pub roles: Vec<RoleType>,
    pub paused: bool,
}

impl MockGate {
    pub fn with_roles(roles: &[RoleType]) -> Self {
        Self {
            caller: Pubkey::new_unique(),
            roles: roles.to_vec(),
            paused: false,
        }
    }

    pub fn operator() -> Self {
        Self::with_roles(&[RoleType::OperatorRolePegEngine])
    }

    pub fn admin() -> Self {
        Self::with_roles(&[RoleType::AdminRolePegEngine])
    }

    pub fn emergency() -> Self {
        Self::with_roles(&[RoleType::EmergencyRolePegEngine])
    }

    pub fn paused(mut self) -> Self {
        self.paused = true;
        self
    }
}

impl AuthGate for MockGate {
    fn caller(&self) -> Pubkey {
        self.caller
    }

    fn check(&self, role: RoleType) -> bool {
        self.roles.contains(&role)
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}
