/// Minimum adjacent-reel match count that can appear in a paytable.
pub const MIN_MATCH: u8 = 3;

/// Reel-set mode sampled during free spins.
pub const FREESPIN_REEL_MODE: &str = "free";

/// Tolerance when checking that distribution quotas within a bet mode sum to 1.0.
pub const QUOTA_EPSILON: f64 = 1e-6;

/// Tolerance when checking that bet-mode RTP sub-targets sum to the game RTP.
pub const RTP_SHARE_EPSILON: f64 = 1e-6;

/// Relative tolerance for the fitted RTP of a completed run (±0.1%).
pub const RTP_FIT_TOLERANCE: f64 = 1e-3;
