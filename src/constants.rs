/// 24 * 60 * 60 - Number of seconds in a day
pub const SECONDS_PER_DAY: i64 = 86400; // 24 * 60 * 60
/// 60 * 60 - Number of seconds in an hour
pub const SECONDS_PER_HOUR: i64 = 3600; // 60 * 60
/// 365 * 24 * 60 * 60 - Number of seconds in a (non-leap) year
pub const SECONDS_PER_YEAR: i64 = 365 * SECONDS_PER_DAY;

// PDA SEEDS

/// Seed for the PegEngineState PDA
pub const PEG_ENGINE_STATE_SEED: &[u8] = b"peg_engine";
/// Seed for the PricePath PDA
pub const PRICE_PATH_SEED: &[u8] = b"price_path";
/// Seed for the supply authority PDA (mint authority and treasury owner)
pub const SUPPLY_AUTHORITY_SEED: &[u8] = b"supply_authority";

// SCALING FACTORS

/// Number of fractional digits carried by prices and amounts
pub const PRICE_DECIMALS: u8 = 18;
/// 10^18 - One unit in 18-decimal fixed point
pub const PRICE_PRECISION: u128 = 1_000_000_000_000_000_000;
/// 10,000 basis points = 100% - Divisor for basis point calculations
pub const BASIS_POINTS_DIVISOR: u64 = 10_000;
/// 1,000 = ratio of 1.0 for gap ratios and catch-up factors
pub const RATIO_SCALE: u64 = 1_000;
/// Divisor applied to the excess deviation when sizing an operation
pub const OPERATION_SIZE_SCALE: u64 = 1_000;
/// Smallest catch-up factor (0.001 at RATIO_SCALE) applied to an overshooting target
pub const MIN_CATCHUP_FACTOR: u128 = 1;

// ORACLE FEEDS

/// Feed consulted under FAIT and price-level targeting
pub const FAIT_FEED_NAME: &str = "FAIT_USD";
/// Feed consulted under nominal GDP level targeting
pub const NGDP_FEED_NAME: &str = "NGDP_USD";
pub const MAX_AGE_UPPER_BOUND: u64 = SECONDS_PER_DAY as u64;
/// Confidence interval may not exceed this percentage of the price
pub const MAX_CONFIDENCE_THRESHOLD: u64 = 100;

// PARAMETER BOUNDS

pub const MAX_TARGET_GROWTH_RATE_BPS: u64 = 1_000;
pub const MIN_PATH_UPDATE_INTERVAL: i64 = SECONDS_PER_HOUR;
pub const MAX_PATH_UPDATE_INTERVAL: i64 = SECONDS_PER_YEAR;
pub const MAX_CATCHUP_AGGRESSIVENESS: u64 = 2_000;
pub const MAX_GAP_TOLERANCE_BPS: u64 = 1_000;
pub const MAX_PEG_TOLERANCE_BPS: u64 = 1_000;
pub const MIN_OPERATION_COOLDOWN: i64 = 60;

/// Maximum length of a manual intervention reason
pub const MAX_REASON_LENGTH: usize = 256;

/// Number of most recent path points kept in the PricePath account
pub const PATH_HISTORY_CAPACITY: usize = 128;

/// Periods appended by a single path advance, a longer backlog drains over later calls
/// Bounds the heap used for staged points and PathUpdated events in one instruction
pub const MAX_PERIODS_PER_ADVANCE: u64 = 32;

// DEFAULTS

pub const DEFAULT_TARGET_GROWTH_RATE_BPS: u64 = 200;
pub const DEFAULT_PATH_UPDATE_INTERVAL: i64 = SECONDS_PER_DAY;
pub const DEFAULT_CATCHUP_AGGRESSIVENESS: u64 = 500;
pub const DEFAULT_GAP_TOLERANCE_BPS: u64 = 100;
pub const DEFAULT_PEG_TOLERANCE_BPS: u64 = 100;
pub const DEFAULT_MIN_OPERATION_AMOUNT: u128 = 1_000 * PRICE_PRECISION;
pub const DEFAULT_MAX_OPERATION_AMOUNT: u128 = 1_000_000 * PRICE_PRECISION;
pub const DEFAULT_OPERATION_COOLDOWN: i64 = SECONDS_PER_HOUR;
pub const DEFAULT_MAX_DAILY_OPERATIONS: u32 = 24;
pub const DEFAULT_ORACLE_MAX_AGE: u64 = SECONDS_PER_HOUR as u64;
pub const DEFAULT_CONFIDENCE_THRESHOLD: u64 = 1;
