use crate::{
    constants::SECONDS_PER_DAY,
    state::{OperationRecord, TargetingConfig},
};

/// UTC day index of `timestamp`
#[inline(always)]
pub fn day_index(timestamp: i64) -> i64 {
    timestamp.div_euclid(SECONDS_PER_DAY)
}

/// Whether an automatic operation may run at `now`
/// # Arguments
/// * `now` - The current timestamp
/// * `last_operation_timestamp` - Timestamp of the previous operation
/// * `operations_today` - Operations already counted for the day containing `now`
/// * `cooldown` - Minimum seconds between operations
/// * `daily_cap` - Maximum operations per UTC day
pub fn can_operate(
    now: i64,
    last_operation_timestamp: i64,
    operations_today: u32,
    cooldown: i64,
    daily_cap: u32,
) -> bool {
    if now < last_operation_timestamp.saturating_add(cooldown) {
        return false;
    }

    operations_today < daily_cap
}

/// `can_operate` against the stored counters and configuration
pub fn rate_limit_allows(now: i64, record: &OperationRecord, config: &TargetingConfig) -> bool {
    can_operate(
        now,
        record.last_operation_timestamp,
        record.operations_on(now),
        config.operation_cooldown,
        config.max_daily_operations,
    )
}
