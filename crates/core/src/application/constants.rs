// Queue constants (No magic values)

/// Estimated minutes of waiting contributed by each position ahead
pub const MINUTES_PER_POSITION: u32 = 5;

/// A waiting customer passed over this many times is evicted as a no-show
pub const MAX_POSITIONS_PASSED: u32 = 3;

/// Position at which the customer view raises an "almost your turn" notice
pub const ALMOST_YOUR_TURN_POSITION: u32 = 3;

/// One day in milliseconds (analytics windows)
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Analytics window sizes in days
pub const DAILY_WINDOW_DAYS: i64 = 1;
pub const WEEKLY_WINDOW_DAYS: i64 = 7;
pub const MONTHLY_WINDOW_DAYS: i64 = 30;
