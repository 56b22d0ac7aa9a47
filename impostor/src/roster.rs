use crate::config::GameConfig;
use crate::constants::SKIP_TARGET;
use crate::error::{GameError, GameResult};
use crate::types::Player;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const LOG_TARGET: &str = "impostor::roster";

/// Trims, collapses inner whitespace runs to one space and truncates to `max_len` characters.
pub fn sanitize_text(raw: &str, max_len: usize) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(max_len).collect::<String>().trim_end().to_string()
}

/// Live player list edited between rounds. Rounds copy it; they never hold a reference.
/// Serialized as the bare player list; ids are checked on the way in.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(try_from = "Vec<Player>", into = "Vec<Player>")]
pub struct Roster {
    players: Vec<Player>,
    next_id: u64,
}

impl Roster {
    pub fn new() -> Self {
        Self {
            players: Vec::new(),
            next_id: 1,
        }
    }

    /// Placeholder players so a quick game can start without setup.
    pub fn with_default_players(count: usize) -> Self {
        let mut roster = Self::new();
        for n in 1..=count {
            let id = roster.allocate_id();
            roster.players.push(Player {
                id,
                name: format!("Jugador {}", n),
            });
        }
        roster
    }

    /// Adds a player under the configured name limits.
    pub fn add_player(&mut self, raw_name: &str, config: &GameConfig) -> GameResult<&Player> {
        let name = sanitize_text(raw_name, config.max_name_len);
        if name.chars().count() < config.min_name_len {
            tracing::debug!(target: LOG_TARGET, raw = raw_name, "rejected player name");
            return Err(GameError::InvalidName {
                min: config.min_name_len,
            });
        }
        let id = self.allocate_id();
        tracing::debug!(target: LOG_TARGET, %id, %name, "player added");
        self.players.push(Player { id, name });
        let idx = self.players.len() - 1;
        Ok(&self.players[idx])
    }

    pub fn remove_player(&mut self, id: &str) -> Option<Player> {
        let idx = self.players.iter().position(|p| p.id == id)?;
        let removed = self.players.remove(idx);
        tracing::debug!(target: LOG_TARGET, id, name = %removed.name, "player removed");
        Some(removed)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    fn allocate_id(&mut self) -> String {
        if self.next_id == 0 {
            self.next_id = 1;
        }
        let id = format!("player-{}", self.next_id);
        self.next_id += 1;
        id
    }
}

fn check_ids(players: &[Player]) -> GameResult<()> {
    let mut seen: HashSet<&str> = HashSet::new();
    for player in players.iter() {
        if player.id.is_empty() || player.id == SKIP_TARGET {
            return Err(GameError::InvalidRoster(format!(
                "reserved player id {:?}",
                player.id
            )));
        }
        if !seen.insert(player.id.as_str()) {
            return Err(GameError::InvalidRoster(format!(
                "duplicate player id {}",
                player.id
            )));
        }
    }
    Ok(())
}

/// Rebuilds a roster from outside data. Ids must be non-empty, unique, and must not collide with
/// the skip ballot choice.
impl TryFrom<Vec<Player>> for Roster {
    type Error = GameError;

    fn try_from(players: Vec<Player>) -> GameResult<Self> {
        check_ids(&players)?;
        let highest = players
            .iter()
            .filter_map(|p| p.id.strip_prefix("player-")?.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Ok(Self {
            next_id: highest.max(players.len() as u64) + 1,
            players,
        })
    }
}

impl From<Roster> for Vec<Player> {
    fn from(roster: Roster) -> Self {
        roster.players
    }
}
