use serde::{Deserialize, Serialize};

use crate::{
    GeometryError,
    core::{
        board::BoardGeometry,
        line_catalog::{LineCatalog, LineCatalogError, LineDefinition},
    },
};

use super::{
    combat::{Actor, AfterTerminal},
    placement::ShapeMatching,
};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("{_0}")]
    Geometry(GeometryError),
    #[display("{_0}")]
    LineCatalog(LineCatalogError),
    #[display("starting {actor} health must be positive, got {hp}")]
    NonPositiveStartingHp { actor: Actor, hp: i32 },
    #[display("{rule} damage must not be negative, got {amount}")]
    NegativeDamage { rule: &'static str, amount: i32 },
    #[display("shape batch size must be at least 1")]
    ZeroBatchSize,
}

/// Health lost on each trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageRules {
    /// Player damage when the last shape of a batch is placed.
    pub exhaustion: i32,
    /// Enemy damage per cleared line.
    pub per_line: i32,
    /// Player damage for a manual board reset.
    pub reset: i32,
}

impl Default for DamageRules {
    fn default() -> Self {
        Self {
            exhaustion: 1,
            per_line: 2,
            reset: 2,
        }
    }
}

/// Game configuration.
///
/// Every field has a default, so a configuration file only needs to list the
/// values it changes.
///
/// # Example
///
/// ```
/// use blockduel_engine::{GameConfig, LineDefinition};
///
/// let config: GameConfig =
///     serde_json::from_str(r#"{"starting_enemy_hp": 20, "line_catalog": []}"#).unwrap();
/// assert_eq!(config.rows, 8);
/// assert_eq!(config.starting_enemy_hp, 20);
/// assert!(config.line_catalog.is_empty());
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: usize,
    pub columns: usize,
    pub starting_player_hp: i32,
    pub starting_enemy_hp: i32,
    /// Extra line sources. Row lines are always included.
    pub line_catalog: Vec<LineDefinition>,
    pub damage: DamageRules,
    pub shape_matching: ShapeMatching,
    pub after_terminal: AfterTerminal,
    /// Shapes requested per batch.
    pub batch_size: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 8,
            columns: 8,
            starting_player_hp: 10,
            starting_enemy_hp: 10,
            line_catalog: vec![LineDefinition::Columns],
            damage: DamageRules::default(),
            shape_matching: ShapeMatching::default(),
            after_terminal: AfterTerminal::default(),
            batch_size: 3,
        }
    }
}

impl GameConfig {
    pub fn geometry(&self) -> Result<BoardGeometry, ConfigError> {
        BoardGeometry::new(self.rows, self.columns).map_err(ConfigError::Geometry)
    }

    pub fn build_catalog(&self) -> Result<LineCatalog, ConfigError> {
        LineCatalog::from_definitions(self.geometry()?, &self.line_catalog)
            .map_err(ConfigError::LineCatalog)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.build_catalog()?;
        for (actor, hp) in [
            (Actor::Player, self.starting_player_hp),
            (Actor::Enemy, self.starting_enemy_hp),
        ] {
            if hp <= 0 {
                return Err(ConfigError::NonPositiveStartingHp { actor, hp });
            }
        }
        for (rule, amount) in [
            ("exhaustion", self.damage.exhaustion),
            ("per-line", self.damage.per_line),
            ("reset", self.damage.reset),
        ] {
            if amount < 0 {
                return Err(ConfigError::NegativeDamage { rule, amount });
            }
        }
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        Ok(())
    }
}
