//! Registry of running games.
//!
//! The registry is an ordinary value owned by the host, not a global. All
//! games share one board through the rules' `Arc`.

use rustc_hash::FxHashMap;
use tracing::{info, warn};

use super::game::{GameId, GameSession};
use super::{RegistryError, SessionError};
use crate::core::{Action, DiceSource, Millis, PlayerId, RulesConfig};
use crate::events::GameEvent;
use crate::rules::Monopoly;

/// All games hosted by one process.
#[derive(Debug)]
pub struct GameRegistry {
    rules: Monopoly,
    games: FxHashMap<GameId, GameSession>,
    next_id: u64,
}

impl GameRegistry {
    /// Host games on the standard board with `config`.
    #[must_use]
    pub fn new(config: RulesConfig) -> Self {
        Self::with_rules(Monopoly::new(config))
    }

    /// Host games under the given rules.
    #[must_use]
    pub fn with_rules(rules: Monopoly) -> Self {
        Self {
            rules,
            games: FxHashMap::default(),
            next_id: 1,
        }
    }

    /// Start a new game.
    pub fn create<S: AsRef<str>>(
        &mut self,
        names: &[S],
        dice: Box<dyn DiceSource + Send>,
        now: Millis,
    ) -> Result<GameId, RegistryError> {
        let id = GameId(self.next_id);
        let session = GameSession::new(id, self.rules.clone(), names, dice, now)?;

        self.next_id += 1;
        self.games.insert(id, session);
        Ok(id)
    }

    /// Look up a game.
    #[must_use]
    pub fn get(&self, id: GameId) -> Option<&GameSession> {
        self.games.get(&id)
    }

    /// Look up a game for mutation.
    pub fn get_mut(&mut self, id: GameId) -> Option<&mut GameSession> {
        self.games.get_mut(&id)
    }

    /// Stop hosting a game.
    pub fn remove(&mut self, id: GameId) -> Option<GameSession> {
        let removed = self.games.remove(&id);
        if removed.is_some() {
            info!(%id, "game removed");
        }
        removed
    }

    /// Number of hosted games.
    #[must_use]
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Whether no games are hosted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Hosted game ids, ascending.
    #[must_use]
    pub fn ids(&self) -> Vec<GameId> {
        let mut ids: Vec<_> = self.games.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Route a player action to its game.
    pub fn apply(
        &mut self,
        id: GameId,
        player: PlayerId,
        action: Action,
        now: Millis,
    ) -> Result<Vec<GameEvent>, RegistryError> {
        let session = self.games.get_mut(&id).ok_or(RegistryError::UnknownGame(id))?;
        Ok(session.apply(player, action, now)?)
    }

    /// Fire due timers in every game.
    ///
    /// Games are independent: a fatal error in one is logged and reported
    /// without stopping the others.
    pub fn tick_all(&mut self, now: Millis) -> Vec<(GameId, Result<Vec<GameEvent>, SessionError>)> {
        let mut results = Vec::new();
        for id in self.ids() {
            let Some(session) = self.games.get_mut(&id) else {
                continue;
            };
            let result = session.tick(now);
            match &result {
                Ok(events) if events.is_empty() => continue,
                Err(err) => warn!(%id, %err, "tick failed"),
                Ok(_) => {}
            }
            results.push((id, result));
        }
        results
    }

    /// Drop every game that has a winner. Returns how many were removed.
    pub fn reap_finished(&mut self) -> usize {
        let before = self.games.len();
        self.games.retain(|_, session| session.result().is_none());
        before - self.games.len()
    }
}
