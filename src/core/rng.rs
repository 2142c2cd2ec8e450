//! Dice sources.
//!
//! ## Key Features
//!
//! - **Unbiased**: every die is drawn from a single random byte with
//!   rejection sampling, so no face is favoured by modulo bias
//! - **Deterministic**: `GameRng` with the same seed rolls the same sequence
//! - **Secure**: `SecureDice` uses ChaCha20 seeded from OS entropy
//! - **Scriptable**: `ScriptedDice` replays fixed rolls for tests and replay
//!
//! ## Usage
//!
//! ```
//! use monopoly_engine::core::{DiceSource, GameRng};
//!
//! let mut a = GameRng::new(7);
//! let mut b = GameRng::new(7);
//!
//! let roll = a.roll();
//! assert_eq!(roll, b.roll());
//! assert!((2..=12).contains(&roll.sum()));
//! ```

use std::collections::VecDeque;

use rand::{RngCore, SeedableRng};
use rand_chacha::{ChaCha20Rng, ChaCha8Rng};
use serde::{Deserialize, Serialize};

/// Largest multiple of 6 that fits in a byte. Bytes at or above it are
/// redrawn.
const REJECTION_LIMIT: u8 = 252;

/// A pair of six-sided dice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceRoll {
    pub die1: u8,
    pub die2: u8,
}

impl DiceRoll {
    /// Create a roll. Panics if either die is outside 1-6.
    #[must_use]
    pub fn new(die1: u8, die2: u8) -> Self {
        assert!((1..=6).contains(&die1) && (1..=6).contains(&die2), "Dice must be 1-6");
        Self { die1, die2 }
    }

    /// Total pips.
    #[must_use]
    pub const fn sum(self) -> u8 {
        self.die1 + self.die2
    }

    /// Whether both dice show the same face.
    #[must_use]
    pub const fn is_double(self) -> bool {
        self.die1 == self.die2
    }
}

/// Anything that can roll a pair of dice.
pub trait DiceSource {
    /// Roll two dice.
    fn roll(&mut self) -> DiceRoll;
}

/// Draw one die face from `rng` using byte rejection sampling.
fn draw_die<R: RngCore>(rng: &mut R) -> u8 {
    let mut byte = [0u8; 1];
    loop {
        rng.fill_bytes(&mut byte);
        if byte[0] < REJECTION_LIMIT {
            return byte[0] % 6 + 1;
        }
    }
}

fn roll_with<R: RngCore>(rng: &mut R) -> DiceRoll {
    let die1 = draw_die(rng);
    let die2 = draw_die(rng);
    DiceRoll { die1, die2 }
}

/// Deterministic seeded dice.
///
/// Uses ChaCha8 for speed while keeping high quality output. The full
/// generator position can be captured with [`GameRng::state`] and
/// restored later, which lets a paused game resume the same sequence.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self { inner, seed: state.seed }
    }
}

impl DiceSource for GameRng {
    fn roll(&mut self) -> DiceRoll {
        roll_with(&mut self.inner)
    }
}

/// Serializable RNG state for checkpointing.
///
/// Uses the ChaCha8 word position so capture and restore are O(1)
/// regardless of how many dice have been rolled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

/// Production dice: ChaCha20 seeded from operating system entropy.
#[derive(Clone, Debug)]
pub struct SecureDice {
    inner: ChaCha20Rng,
}

impl SecureDice {
    /// Seed a new generator from the OS.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha20Rng::from_entropy(),
        }
    }
}

impl Default for SecureDice {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl DiceSource for SecureDice {
    fn roll(&mut self) -> DiceRoll {
        roll_with(&mut self.inner)
    }
}

/// Dice that return a fixed script of rolls.
///
/// Panics when rolled past the end of the script: a test that rolls
/// more than it scripted is a broken test.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDice {
    rolls: VecDeque<DiceRoll>,
}

impl ScriptedDice {
    /// Script the given `(die1, die2)` pairs.
    #[must_use]
    pub fn new(rolls: impl IntoIterator<Item = (u8, u8)>) -> Self {
        Self {
            rolls: rolls.into_iter().map(|(a, b)| DiceRoll::new(a, b)).collect(),
        }
    }

    /// Script a single roll.
    #[must_use]
    pub fn once(roll: DiceRoll) -> Self {
        Self {
            rolls: VecDeque::from([roll]),
        }
    }

    /// Rolls not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl DiceSource for ScriptedDice {
    fn roll(&mut self) -> DiceRoll {
        self.rolls.pop_front().expect("scripted dice exhausted")
    }
}
