//! Round engine and phase controller for Impostor, a pass-the-device party game. One player
//! secretly lacks the word everyone else shares; the group discusses, votes, and the result says
//! whether the impostor was caught.

pub mod action;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod game;
pub mod rng;
pub mod roster;
pub mod snapshot;
pub mod timer;
pub mod types;

pub use action::Action;
pub use catalog::CategorySelection;
pub use config::GameConfig;
pub use controller::{Phase, PhaseController, Transition};
pub use error::{GameError, GameResult};
pub use game::{start_round, FinishedRound, RoundState, TiePolicy, TiePolicyKind, Verdict};
pub use rng::{PcgSource, RandomEventKind, RandomSource};
pub use roster::Roster;
pub use snapshot::GameSnapshot;
pub use timer::{Clock, DiscussionTimer, ManualClock, SystemClock, TimerTick};
pub use types::*;
