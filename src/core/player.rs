//! Player identification and per-player ledger state.
//!
//! ## PlayerId
//!
//! Type-safe seat identifier. Seats are fixed at game creation and
//! double as turn order, so a `PlayerId` is also an index into
//! `GameState::players`.
//!
//! ## PlayerState
//!
//! Balance, position, jail status and an optional open debt. Bankrupt
//! players are flagged, never removed, so index arithmetic stays valid.

use serde::{Deserialize, Serialize};

use crate::board::TileId;

/// Seat identifier for 2-4 players.
///
/// Player indices are 0-based: the first seat is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all seats for a game with `player_count` players.
    ///
    /// ```
    /// use monopoly_engine::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(players, vec![PlayerId::new(0), PlayerId::new(1), PlayerId::new(2)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// What an open debt was incurred for.
///
/// Decides where the money goes once the debt settles: rent goes to the
/// creditor, tax to the free-parking pot, everything else to the bank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebtCause {
    Rent,
    Tax,
    Card,
    JailFine,
}

/// An obligation the player could not pay when it arose.
///
/// The owed amount has *not* been deducted yet. The player must raise
/// cash (mortgage, sell, break houses, trade) or go bankrupt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtResolution {
    /// Amount owed.
    pub amount: i64,
    /// Player owed. `None` when the bank (or pot) is owed.
    pub creditor: Option<PlayerId>,
    /// Why the debt exists.
    pub cause: DebtCause,
}

/// Per-player ledger entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub name: String,
    /// Board position, 0-39.
    pub position: TileId,
    /// Cash on hand. Signed so that arithmetic on it never wraps.
    pub money: i64,
    pub in_jail: bool,
    /// Failed attempts to roll out of jail.
    pub jail_turns: u8,
    pub is_bankrupt: bool,
    /// Open debt. A player with a debt may only liquidate assets, trade
    /// or declare bankruptcy.
    pub debt: Option<DebtResolution>,
}

impl PlayerState {
    /// Create a player on GO with the given starting cash.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, money: i64) -> Self {
        Self {
            id,
            name: name.into(),
            position: TileId::GO,
            money,
            in_jail: false,
            jail_turns: 0,
            is_bankrupt: false,
            debt: None,
        }
    }

    /// Whether the player can take ordinary turn actions.
    #[must_use]
    pub fn is_free_to_act(&self) -> bool {
        !self.is_bankrupt && self.debt.is_none()
    }

    /// Whether the player could pay `amount` right now.
    #[must_use]
    pub fn can_afford(&self, amount: i64) -> bool {
        self.money >= amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        let p0 = PlayerId::new(0);
        let p3 = PlayerId::new(3);

        assert_eq!(p0.index(), 0);
        assert_eq!(p3.index(), 3);
        assert_eq!(format!("{}", p3), "Player 3");
    }

    #[test]
    fn test_new_player_starts_on_go() {
        let player = PlayerState::new(PlayerId::new(1), "Ada", 1500);

        assert_eq!(player.position, TileId::GO);
        assert_eq!(player.money, 1500);
        assert!(player.is_free_to_act());
        assert!(player.debt.is_none());
    }

    #[test]
    fn test_debt_blocks_acting() {
        let mut player = PlayerState::new(PlayerId::new(0), "Ada", 10);
        player.debt = Some(DebtResolution {
            amount: 50,
            creditor: Some(PlayerId::new(1)),
            cause: DebtCause::Rent,
        });

        assert!(!player.is_free_to_act());
        assert!(!player.can_afford(50));
    }

    #[test]
    fn test_player_serialization() {
        let player = PlayerState::new(PlayerId::new(2), "Bo", 1500);
        let json = serde_json::to_string(&player).unwrap();
        let back: PlayerState = serde_json::from_str(&json).unwrap();
        assert_eq!(player, back);
    }
}
