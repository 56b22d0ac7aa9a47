use crate::constants::*;
use crate::error::{GameError, GameResult};
use crate::game::TiePolicyKind;
use crate::types::DiscussionDuration;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for a game session. Every field is optional in the JSON form; missing fields take
/// the built-in defaults.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub timer_poll_ms: u64,
    /// Added to the countdown end so the first poll still shows the full duration.
    pub timer_grace_ms: u64,
    pub short_discussion_secs: u64,
    pub long_discussion_secs: u64,
    pub min_name_len: usize,
    pub max_name_len: usize,
    pub custom_category_max_len: usize,
    pub custom_word_max_len: usize,
    pub default_roster_size: usize,
    pub tie_policy: TiePolicyKind,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            timer_poll_ms: TIMER_POLL_MS,
            timer_grace_ms: TIMER_GRACE_MS,
            short_discussion_secs: SHORT_DISCUSSION_SECS,
            long_discussion_secs: LONG_DISCUSSION_SECS,
            min_name_len: MIN_NAME_LEN,
            max_name_len: MAX_NAME_LEN,
            custom_category_max_len: MAX_CUSTOM_CATEGORY_LEN,
            custom_word_max_len: MAX_CUSTOM_WORD_LEN,
            default_roster_size: DEFAULT_ROSTER_SIZE,
            tie_policy: TiePolicyKind::default(),
        }
    }
}

impl GameConfig {
    pub fn from_json_str(raw: &str) -> GameResult<Self> {
        let config: GameConfig =
            serde_json::from_str(raw).map_err(|e| GameError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> GameResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| GameError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> GameResult<()> {
        if self.timer_poll_ms == 0 {
            return Err(GameError::Config("timer_poll_ms must be positive".into()));
        }
        if self.short_discussion_secs == 0 || self.long_discussion_secs == 0 {
            return Err(GameError::Config(
                "discussion durations must be positive".into(),
            ));
        }
        if self.short_discussion_secs > MAX_DISCUSSION_SECS
            || self.long_discussion_secs > MAX_DISCUSSION_SECS
        {
            return Err(GameError::Config(format!(
                "discussion durations must not exceed {} seconds",
                MAX_DISCUSSION_SECS
            )));
        }
        if self.timer_grace_ms > MAX_TIMER_GRACE_MS {
            return Err(GameError::Config(format!(
                "timer_grace_ms must not exceed {}",
                MAX_TIMER_GRACE_MS
            )));
        }
        if self.min_name_len == 0 || self.max_name_len < self.min_name_len {
            return Err(GameError::Config(
                "name limits need 0 < min_name_len <= max_name_len".into(),
            ));
        }
        if self.custom_category_max_len == 0 || self.custom_word_max_len == 0 {
            return Err(GameError::Config(
                "custom secret limits must be positive".into(),
            ));
        }
        if self.default_roster_size < MIN_PLAYERS {
            return Err(GameError::Config(format!(
                "default_roster_size must be at least {}",
                MIN_PLAYERS
            )));
        }
        Ok(())
    }

    pub fn discussion_secs(&self, duration: DiscussionDuration) -> u64 {
        match duration {
            DiscussionDuration::Short => self.short_discussion_secs,
            DiscussionDuration::Long => self.long_discussion_secs,
        }
    }
}
