use crate::types::PhaseKind;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("need at least {required} players to start, have {found}")]
    NotEnoughPlayers { found: usize, required: usize },
    #[error("player name must have at least {min} characters")]
    InvalidName { min: usize },
    #[error("invalid roster: {0}")]
    InvalidRoster(String),
    #[error("player {0} is not part of this round")]
    UnknownPlayer(String),
    #[error("invalid vote: {0}")]
    InvalidVote(&'static str),
    #[error("action {action} not allowed during {phase}")]
    InvalidTransition {
        phase: PhaseKind,
        action: &'static str,
    },
    #[error("discussion timer is already running")]
    TimerRunning,
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type GameResult<T> = Result<T, GameError>;
