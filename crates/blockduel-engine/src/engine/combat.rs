use serde::{Deserialize, Serialize};

/// The two sides of a duel.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, derive_more::IsVariant,
    Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    #[display("player")]
    Player,
    #[display("enemy")]
    Enemy,
}

/// Whether the duel has been decided.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TerminalState {
    /// Neither pool is depleted.
    #[default]
    Ongoing,
    /// The player's pool is depleted.
    Lose,
    /// The enemy's pool is depleted and the player's is not.
    Win,
}

impl TerminalState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !self.is_ongoing()
    }
}

/// What happens to damage once the duel has been decided.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AfterTerminal {
    /// Damage keeps applying.
    #[default]
    Apply,
    /// Damage is ignored.
    Suppress,
}

/// Health of one actor.
///
/// Health is not floored: it may drop below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthPool {
    actor: Actor,
    starting_hp: i32,
    hp: i32,
}

impl HealthPool {
    #[must_use]
    pub const fn new(actor: Actor, starting_hp: i32) -> Self {
        Self {
            actor,
            starting_hp,
            hp: starting_hp,
        }
    }

    #[must_use]
    pub const fn actor(&self) -> Actor {
        self.actor
    }

    #[must_use]
    pub const fn hp(&self) -> i32 {
        self.hp
    }

    #[must_use]
    pub const fn starting_hp(&self) -> i32 {
        self.starting_hp
    }

    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.hp <= 0
    }

    pub const fn damage(&mut self, amount: i32) {
        self.hp = self.hp.saturating_sub(amount);
    }

    pub const fn reset(&mut self) {
        self.hp = self.starting_hp;
    }
}

/// Player and enemy health pools.
///
/// # Example
///
/// ```
/// use blockduel_engine::{AfterTerminal, CombatSystem, TerminalState};
///
/// let mut combat = CombatSystem::new(10, 10, AfterTerminal::Apply);
/// combat.damage_enemy(4);
/// assert_eq!(combat.enemy().hp(), 6);
/// assert_eq!(combat.check_terminal(), TerminalState::Ongoing);
///
/// combat.damage_player(10);
/// assert_eq!(combat.check_terminal(), TerminalState::Lose);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatSystem {
    player: HealthPool,
    enemy: HealthPool,
    after_terminal: AfterTerminal,
}

impl CombatSystem {
    #[must_use]
    pub const fn new(
        starting_player_hp: i32,
        starting_enemy_hp: i32,
        after_terminal: AfterTerminal,
    ) -> Self {
        Self {
            player: HealthPool::new(Actor::Player, starting_player_hp),
            enemy: HealthPool::new(Actor::Enemy, starting_enemy_hp),
            after_terminal,
        }
    }

    #[must_use]
    pub const fn player(&self) -> &HealthPool {
        &self.player
    }

    #[must_use]
    pub const fn enemy(&self) -> &HealthPool {
        &self.enemy
    }

    #[must_use]
    pub const fn pool(&self, actor: Actor) -> &HealthPool {
        match actor {
            Actor::Player => &self.player,
            Actor::Enemy => &self.enemy,
        }
    }

    /// Subtracts `amount` from the target's health.
    ///
    /// Returns `false` when the damage was suppressed by
    /// [`AfterTerminal::Suppress`].
    pub fn damage(&mut self, target: Actor, amount: i32) -> bool {
        if self.after_terminal == AfterTerminal::Suppress && self.check_terminal().is_terminal() {
            return false;
        }
        match target {
            Actor::Player => self.player.damage(amount),
            Actor::Enemy => self.enemy.damage(amount),
        }
        true
    }

    pub fn damage_player(&mut self, amount: i32) -> bool {
        self.damage(Actor::Player, amount)
    }

    pub fn damage_enemy(&mut self, amount: i32) -> bool {
        self.damage(Actor::Enemy, amount)
    }

    /// A depleted player loses even if the enemy is depleted too.
    #[must_use]
    pub const fn check_terminal(&self) -> TerminalState {
        if self.player.is_depleted() {
            TerminalState::Lose
        } else if self.enemy.is_depleted() {
            TerminalState::Win
        } else {
            TerminalState::Ongoing
        }
    }

    /// Restores both pools to their starting health.
    pub const fn reset(&mut self) {
        self.player.reset();
        self.enemy.reset();
    }
}
