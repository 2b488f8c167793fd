use anchor_lang::prelude::*;

#[error_code]
pub enum PegError {
    #[msg("Caller does not hold the required role")]
    Unauthorized,
    #[msg("Peg engine is paused")]
    SystemPaused,
    #[msg("Automatic peg operations are disabled")]
    OperationsDisabled,
    #[msg("Operation cooldown or daily operation cap not satisfied")]
    RateLimited,
    #[msg("Oracle reported invalid or stale price data")]
    InvalidPriceData,
    #[msg("Insufficient balance for burn")]
    InsufficientBalance,
    #[msg("Mint would exceed the maximum supply")]
    MintCapExceeded,
    #[msg("Invalid Amount")]
    InvalidAmount,
    #[msg("Invalid initial target price")]
    InvalidInitialPrice,
    #[msg("Target growth rate exceeds 1000 bps")]
    InvalidGrowthRate,
    #[msg("Path update interval must be between one hour and one year")]
    InvalidPathUpdateInterval,
    #[msg("Catch-up aggressiveness exceeds 2000")]
    InvalidCatchupAggressiveness,
    #[msg("Gap tolerance exceeds 1000 bps")]
    InvalidGapTolerance,
    #[msg("Peg tolerance exceeds 1000 bps")]
    InvalidPegTolerance,
    #[msg("Operation amounts must satisfy max >= min > 0")]
    InvalidOperationAmounts,
    #[msg("Operation cooldown must be at least 60 seconds")]
    InvalidOperationCooldown,
    #[msg("Max daily operations must be greater than zero")]
    InvalidMaxDailyOperations,
    #[msg("Max supply must be greater than zero")]
    InvalidMaxSupply,
    #[msg("Invalid oracle price max age provided")]
    InvalidOraclePriceMaxAge,
    #[msg("Invalid oracle confidence threshold provided")]
    InvalidConfidenceThreshold,
    #[msg("Invalid oracle feed id provided")]
    InvalidOracleFeedId,
    #[msg("Unknown oracle feed name")]
    UnknownOracleFeed,
    #[msg("Path point has not been recorded")]
    PathPointNotFound,
    #[msg("Path point is outside the retained history window")]
    PathPointPruned,
    #[msg("Manual intervention requires a reason")]
    EmptyInterventionReason,
    #[msg("Manual intervention reason too long")]
    InterventionReasonTooLong,
    #[msg("Invalid User")]
    InvalidUser,
    #[msg("ProgramMismatch")]
    ProgramMismatch,
    #[msg("Math Overflow")]
    MathOverflow,
    #[msg("Divide by zero")]
    DivideByZero,
}
