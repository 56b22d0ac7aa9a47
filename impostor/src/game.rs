use crate::catalog::{find_category, word_bank, word_pool, CategorySelection};
use crate::config::GameConfig;
use crate::constants::*;
use crate::error::{GameError, GameResult};
use crate::rng::{RandomEventKind, RandomSource};
use crate::roster::sanitize_text;
use crate::types::*;
use serde::{Deserialize, Serialize};

// Round engine: role and word assignment, reveal and vote cursors, and outcome computation. The
// controller decides when each operation may run; this module only guards the round invariants.

const LOG_TARGET: &str = "impostor::round";

/// One round, from assignment until the last vote. The player order is fixed at start and drives
/// both the reveal and the vote sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundState {
    players: Vec<Player>,
    impostor_id: String,
    secret: Secret,
    reveal_index: usize,
    vote_index: usize,
    votes: Vec<Vote>,
}

pub fn start_round<R: RandomSource>(
    roster: &[Player],
    categories: &CategorySelection,
    custom_secret: Option<&CustomSecret>,
    config: &GameConfig,
    rng: &mut R,
) -> GameResult<RoundState> {
    if roster.len() < MIN_PLAYERS {
        tracing::debug!(target: LOG_TARGET, found = roster.len(), "not enough players");
        return Err(GameError::NotEnoughPlayers {
            found: roster.len(),
            required: MIN_PLAYERS,
        });
    }
    let mut players = roster.to_vec();
    rng.shuffle(&mut players, RandomEventKind::ShuffleRoster);
    let impostor_id = players[rng.pick_index(players.len(), RandomEventKind::PickImpostor)]
        .id
        .clone();
    let custom = custom_secret.and_then(|c| resolve_custom_secret(c, config));
    let is_custom = custom.is_some();
    let secret = match custom {
        Some(secret) => secret,
        None => pick_secret(categories, rng),
    };
    tracing::info!(
        target: LOG_TARGET,
        players = players.len(),
        category = %secret.category,
        custom = is_custom,
        "round started"
    );
    tracing::debug!(target: LOG_TARGET, %impostor_id, "impostor assigned");
    Ok(RoundState {
        players,
        impostor_id,
        secret,
        reveal_index: 0,
        vote_index: 0,
        votes: Vec::new(),
    })
}

/// Sanitizes a manual secret. Blank fields take the placeholder defaults; when both fields are
/// blank there is no override and the catalog is used instead.
pub fn resolve_custom_secret(custom: &CustomSecret, config: &GameConfig) -> Option<Secret> {
    let category = sanitize_text(&custom.category, config.custom_category_max_len);
    let word = sanitize_text(&custom.word, config.custom_word_max_len);
    if category.is_empty() && word.is_empty() {
        return None;
    }
    if category.is_empty() || word.is_empty() {
        tracing::debug!(target: LOG_TARGET, "custom secret field blank, using placeholder");
    }
    Some(Secret {
        category: if category.is_empty() {
            DEFAULT_CUSTOM_CATEGORY.to_string()
        } else {
            category
        },
        word: if word.is_empty() {
            DEFAULT_CUSTOM_WORD.to_string()
        } else {
            word
        },
    })
}

pub fn pick_secret<R: RandomSource>(categories: &CategorySelection, rng: &mut R) -> Secret {
    draw_word(word_pool(categories), rng)
}

fn draw_word<R: RandomSource>(mut pool: Vec<&'static WordEntry>, rng: &mut R) -> Secret {
    if pool.is_empty() {
        tracing::warn!(target: LOG_TARGET, "no words for selected categories, using full catalog");
        pool = word_bank().iter().collect();
    }
    let entry = pool[rng.pick_index(pool.len(), RandomEventKind::PickWord)];
    let category = find_category(entry.category)
        .map(|c| c.label.clone())
        .unwrap_or_else(|| DEFAULT_CUSTOM_CATEGORY.to_string());
    Secret {
        category,
        word: entry.word.clone(),
    }
}

impl RoundState {
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn impostor_id(&self) -> &str {
        &self.impostor_id
    }

    pub fn impostor(&self) -> Option<&Player> {
        self.find_player(&self.impostor_id)
    }

    pub fn is_impostor(&self, player_id: &str) -> bool {
        self.impostor_id == player_id
    }

    pub fn secret(&self) -> &Secret {
        &self.secret
    }

    pub fn find_player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn reveal_index(&self) -> usize {
        self.reveal_index
    }

    pub fn vote_index(&self) -> usize {
        self.vote_index
    }

    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    pub fn current_revealer(&self) -> Option<&Player> {
        self.players.get(self.reveal_index)
    }

    pub fn current_voter(&self) -> Option<&Player> {
        self.players.get(self.vote_index)
    }

    pub fn reveal_complete(&self) -> bool {
        self.reveal_index >= self.players.len()
    }

    pub fn voting_complete(&self) -> bool {
        self.vote_index >= self.players.len()
    }

    pub fn advance_reveal(&mut self) -> usize {
        self.reveal_index = (self.reveal_index + 1).min(self.players.len());
        self.reveal_index
    }

    pub fn begin_voting(&mut self) {
        self.vote_index = 0;
    }

    /// Records `voter_id`'s choice, replacing any earlier vote by the same voter. Order is not
    /// checked here.
    pub fn cast_vote(&mut self, voter_id: &str, target: VoteTarget) -> GameResult<()> {
        if self.find_player(voter_id).is_none() {
            return Err(GameError::UnknownPlayer(voter_id.to_string()));
        }
        if let VoteTarget::Player(target_id) = &target {
            if self.find_player(target_id).is_none() {
                return Err(GameError::UnknownPlayer(target_id.clone()));
            }
        }
        self.votes.retain(|v| v.voter_id != voter_id);
        tracing::trace!(target: LOG_TARGET, voter = voter_id, %target, "vote recorded");
        self.votes.push(Vote {
            voter_id: voter_id.to_string(),
            target,
        });
        Ok(())
    }

    pub fn advance_vote(&mut self) -> usize {
        self.vote_index = (self.vote_index + 1).min(self.players.len());
        self.vote_index
    }

    /// Choices offered to `voter_id`: every other player in round order, then skip.
    pub fn ballot_for(&self, voter_id: &str) -> Vec<VoteTarget> {
        self.players
            .iter()
            .filter(|p| p.id != voter_id)
            .map(|p| VoteTarget::player(p.id.clone()))
            .chain(std::iter::once(VoteTarget::Skip))
            .collect()
    }

    /// Vote counts keyed by target, in order of each target's first appearance.
    pub fn tally(&self) -> Vec<Tally> {
        let mut tallies: Vec<Tally> = Vec::new();
        for vote in self.votes.iter() {
            match tallies.iter_mut().find(|t| t.target == vote.target) {
                Some(t) => t.count += 1,
                None => tallies.push(Tally {
                    target: vote.target.clone(),
                    count: 1,
                }),
            }
        }
        tallies
    }

    pub fn compute_result(&self, policy: TiePolicy) -> RoundResult {
        let tally = self.tally();
        let verdict = policy(&tally);
        let outcome = classify(&verdict, &self.impostor_id);
        let impostor_name = self
            .impostor()
            .map(|p| p.name.clone())
            .unwrap_or_default();
        RoundResult {
            outcome,
            impostor_id: self.impostor_id.clone(),
            impostor_name,
            secret_category: self.secret.category.clone(),
            secret_word: self.secret.word.clone(),
            top_target: if verdict.tie { None } else { verdict.top },
            tally,
        }
    }

    /// Closes the round. The returned value only offers read access.
    pub fn finish(self, policy: TiePolicy) -> FinishedRound {
        let result = self.compute_result(policy);
        tracing::info!(
            target: LOG_TARGET,
            outcome = ?result.outcome,
            votes = self.votes.len(),
            "round finished"
        );
        FinishedRound {
            round: self,
            result,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FinishedRound {
    round: RoundState,
    result: RoundResult,
}

impl FinishedRound {
    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn result(&self) -> &RoundResult {
        &self.result
    }
}

/// Leading target of a tally and whether the lead is shared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub top: Option<VoteTarget>,
    pub tie: bool,
}

/// Tie rule applied to a tally in insertion order.
pub type TiePolicy = fn(&[Tally]) -> Verdict;

/// Single scan keeping a running maximum. A count equal to the running maximum flags a tie; a
/// later, higher count takes the lead and clears the flag.
pub fn running_max_tie(tallies: &[Tally]) -> Verdict {
    let mut top: Option<&VoteTarget> = None;
    let mut max_votes: i64 = -1;
    let mut tie = false;
    for t in tallies {
        let count = t.count as i64;
        if count > max_votes {
            top = Some(&t.target);
            max_votes = count;
            tie = false;
        } else if count == max_votes {
            tie = true;
        }
    }
    Verdict {
        top: top.cloned(),
        tie,
    }
}

/// Global maximum must be held by exactly one target.
pub fn strict_unique_max(tallies: &[Tally]) -> Verdict {
    let Some(max) = tallies.iter().map(|t| t.count).max() else {
        return Verdict {
            top: None,
            tie: false,
        };
    };
    let mut leaders = tallies.iter().filter(|t| t.count == max);
    let top = leaders.next().map(|t| t.target.clone());
    Verdict {
        top,
        tie: leaders.next().is_some(),
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TiePolicyKind {
    #[default]
    RunningMax,
    StrictUniqueMax,
}

impl TiePolicyKind {
    pub fn policy(&self) -> TiePolicy {
        match self {
            TiePolicyKind::RunningMax => running_max_tie,
            TiePolicyKind::StrictUniqueMax => strict_unique_max,
        }
    }
}

/// Nobody voting at all counts as no ejection.
pub fn classify(verdict: &Verdict, impostor_id: &str) -> Outcome {
    if verdict.tie {
        return Outcome::Tie;
    }
    match &verdict.top {
        None | Some(VoteTarget::Skip) => Outcome::NoEjection,
        Some(VoteTarget::Player(id)) if id == impostor_id => Outcome::Caught,
        Some(VoteTarget::Player(_)) => Outcome::InnocentEjected,
    }
}
