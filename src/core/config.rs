//! Game configuration.
//!
//! Rule constants live here rather than in the engine so that house-rule
//! variants can be configured at startup:
//! - `RulesConfig`: money, jail and purchase rules
//! - `TimerConfig`: inactivity and auction delays
//!
//! Both deserialize from JSON with every field optional.

use serde::{Deserialize, Serialize};

/// Smallest supported table.
pub const MIN_PLAYERS: usize = 2;

/// Largest supported table.
pub const MAX_PLAYERS: usize = 4;

/// How landing on an unowned property is handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseMode {
    /// Open a buy prompt; declining starts an auction.
    #[default]
    Prompt,
    /// Buy immediately when affordable, otherwise auction.
    Auto,
}

/// Delays for timer-driven transitions, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Idle time before the obligated player is warned.
    pub warning_delay_ms: u64,
    /// Idle time before a kick vote opens.
    pub voteout_delay_ms: u64,
    /// Time without a new bid before an auction resolves.
    pub auction_timeout_ms: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            warning_delay_ms: 30_000,
            voteout_delay_ms: 60_000,
            auction_timeout_ms: 15_000,
        }
    }
}

/// Rule constants.
///
/// ## Example
///
/// ```
/// use monopoly_engine::core::{PurchaseMode, RulesConfig};
///
/// let config = RulesConfig::default()
///     .with_starting_money(2000)
///     .with_purchase_mode(PurchaseMode::Auto);
///
/// assert_eq!(config.starting_money, 2000);
/// assert_eq!(config.go_bonus, 200);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Cash each player starts with.
    pub starting_money: i64,
    /// Paid for passing or landing on GO.
    pub go_bonus: i64,
    /// Paid to leave jail early, or forced after the last failed roll.
    pub jail_fine: i64,
    /// Failed doubles attempts before the fine is forced.
    pub max_jail_turns: u8,
    /// Consecutive doubles that send a player to jail.
    pub doubles_to_jail: u8,
    /// Buy prompt or automatic purchase.
    pub purchase_mode: PurchaseMode,
    /// Timer delays.
    pub timers: TimerConfig,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            starting_money: 1500,
            go_bonus: 200,
            jail_fine: 50,
            max_jail_turns: 3,
            doubles_to_jail: 3,
            purchase_mode: PurchaseMode::Prompt,
            timers: TimerConfig::default(),
        }
    }
}

impl RulesConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set starting cash.
    #[must_use]
    pub fn with_starting_money(mut self, money: i64) -> Self {
        self.starting_money = money;
        self
    }

    /// Set the purchase mode.
    #[must_use]
    pub fn with_purchase_mode(mut self, mode: PurchaseMode) -> Self {
        self.purchase_mode = mode;
        self
    }

    /// Set timer delays.
    #[must_use]
    pub fn with_timers(mut self, timers: TimerConfig) -> Self {
        self.timers = timers;
        self
    }
}
