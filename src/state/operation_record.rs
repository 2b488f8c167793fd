use anchor_lang::prelude::*;

use crate::{errors::PegError, peg::day_index};

/// Direction of a supply operation
#[derive(Clone, Copy, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub enum SupplyAction {
    Mint,
    Burn,
}

/// Aggregate counters over every mint and burn the engine has performed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, AnchorSerialize, AnchorDeserialize, InitSpace)]
pub struct OperationRecord {
    // Total amount minted (18 decimals)
    pub total_minted: u128,

    // Total amount burned (18 decimals)
    pub total_burned: u128,

    // Number of operations executed, burns of zero included
    pub operation_count: u64,

    // Timestamp of the most recent operation
    pub last_operation_timestamp: i64,

    // UTC day index that `operations_today` counts
    pub operations_day: i64,

    // Operations executed during `operations_day`
    pub operations_today: u32,
}

impl OperationRecord {
    /// Operations already counted against the daily cap for the day containing `now`
    pub fn operations_on(&self, now: i64) -> u32 {
        if self.operations_day == day_index(now) {
            self.operations_today
        } else {
            0
        }
    }

    /// Returns the record as it would be after one more operation at `now`
    /// Leaves `self` untouched so callers can finish every fallible step before committing
    pub fn with_operation(&self, now: i64, action: SupplyAction, amount: u128) -> Result<Self> {
        let mut next = *self;

        match action {
            SupplyAction::Mint => {
                next.total_minted = next
                    .total_minted
                    .checked_add(amount)
                    .ok_or(PegError::MathOverflow)?;
            }
            SupplyAction::Burn => {
                next.total_burned = next
                    .total_burned
                    .checked_add(amount)
                    .ok_or(PegError::MathOverflow)?;
            }
        }

        next.operation_count = next
            .operation_count
            .checked_add(1)
            .ok_or(PegError::MathOverflow)?;
        next.operations_today = self
            .operations_on(now)
            .checked_add(1)
            .ok_or(PegError::MathOverflow)?;
        next.operations_day = day_index(now);
        next.last_operation_timestamp = now;

        Ok(next)
    }

    /// Overwrites the lifetime counters with values carried over from a prior engine
    pub fn migrate(
        &mut self,
        total_minted: u128,
        total_burned: u128,
        operation_count: u64,
        last_operation_timestamp: i64,
    ) {
        self.total_minted = total_minted;
        self.total_burned = total_burned;
        self.operation_count = operation_count;
        self.last_operation_timestamp = last_operation_timestamp;
    }
}
