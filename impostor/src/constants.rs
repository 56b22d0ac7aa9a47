// Game rules and size limits.
pub const GAME_NAME: &str = "Impostor";
pub const MIN_PLAYERS: usize = 3;
pub const DEFAULT_ROSTER_SIZE: usize = 3;
pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 18;
pub const MAX_CUSTOM_CATEGORY_LEN: usize = 24;
pub const MAX_CUSTOM_WORD_LEN: usize = 32;
pub const DEFAULT_CUSTOM_CATEGORY: &str = "General";
pub const DEFAULT_CUSTOM_WORD: &str = "Secreto";
pub const SKIP_TARGET: &str = "skip";
pub const SHORT_DISCUSSION_SECS: u64 = 60;
pub const LONG_DISCUSSION_SECS: u64 = 120;
pub const TIMER_POLL_MS: u64 = 500;
pub const TIMER_GRACE_MS: u64 = 1_000;
pub const MAX_DISCUSSION_SECS: u64 = 3_600;
pub const MAX_TIMER_GRACE_MS: u64 = 10_000;
