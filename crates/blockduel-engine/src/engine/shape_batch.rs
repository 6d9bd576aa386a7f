use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::IndexedRandom as _,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::shape::ShapeDefinition;

const BUILTIN_SHAPES: &[(&str, &[&str])] = &[
    ("dot", &["#"]),
    ("domino_h", &["##"]),
    ("domino_v", &["#", "#"]),
    ("i3_h", &["###"]),
    ("i3_v", &["#", "#", "#"]),
    ("corner_ne", &["##", ".#"]),
    ("corner_nw", &["##", "#."]),
    ("corner_se", &[".#", "##"]),
    ("corner_sw", &["#.", "##"]),
    ("i4_h", &["####"]),
    ("i4_v", &["#", "#", "#", "#"]),
    ("square", &["##", "##"]),
    ("l", &["##", "#.", "#."]),
    ("l_flat", &["###", "..#"]),
    ("j", &["##", ".#", ".#"]),
    ("j_flat", &["#..", "###"]),
    ("t_down", &["###", ".#."]),
    ("t_up", &[".#.", "###"]),
    ("s", &[".##", "##."]),
    ("z", &["##.", ".##"]),
    ("i5_h", &["#####"]),
    ("i5_v", &["#", "#", "#", "#", "#"]),
    ("big_corner", &["###", "#..", "#.."]),
    ("big_square", &["###", "###", "###"]),
];

/// Seed for deterministic shape batches.
///
/// A 128-bit value, serialized as a 32-character hex string.
///
/// ```
/// use blockduel_engine::BatchSeed;
///
/// let seed: BatchSeed = "0123456789abcdef0123456789abcdef".parse().unwrap();
/// assert_eq!(seed.to_string(), "0123456789abcdef0123456789abcdef");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchSeed([u8; 16]);

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed {input:?}: expected 32 hex characters")]
pub struct ParseBatchSeedError {
    input: String,
}

impl fmt::Display for BatchSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for BatchSeed {
    type Err = ParseBatchSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseBatchSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| err())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for BatchSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BatchSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<BatchSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> BatchSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        BatchSeed(seed)
    }
}

/// The set of shapes batches are drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeCatalog {
    shapes: Vec<ShapeDefinition>,
}

impl Default for ShapeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ShapeCatalog {
    /// Monomino to pentomino shapes, each fixed orientation listed separately.
    #[must_use]
    pub fn builtin() -> Self {
        let shapes = BUILTIN_SHAPES
            .iter()
            .map(|&(name, rows)| {
                ShapeDefinition::parse(name, rows).expect("builtin shapes should be well-formed")
            })
            .collect();
        Self { shapes }
    }

    /// A catalog of caller-supplied shapes. It may be empty.
    #[must_use]
    pub fn new(shapes: Vec<ShapeDefinition>) -> Self {
        Self { shapes }
    }

    #[must_use]
    pub fn shapes(&self) -> &[ShapeDefinition] {
        &self.shapes
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ShapeDefinition> {
        self.shapes.iter().find(|shape| shape.name() == name)
    }
}

/// Draws batches of shapes uniformly from a [`ShapeCatalog`].
///
/// # Example
///
/// ```
/// use blockduel_engine::{BatchSeed, ShapeBatchGenerator, ShapeCatalog};
/// use rand::Rng as _;
///
/// let seed: BatchSeed = rand::rng().random();
/// let mut a = ShapeBatchGenerator::with_seed(ShapeCatalog::builtin(), seed);
/// let mut b = ShapeBatchGenerator::with_seed(ShapeCatalog::builtin(), seed);
/// assert_eq!(a.next_batch(3), b.next_batch(3));
/// ```
#[derive(Debug, Clone)]
pub struct ShapeBatchGenerator {
    rng: Pcg32,
    catalog: ShapeCatalog,
}

impl ShapeBatchGenerator {
    /// Creates a generator with a random seed.
    #[must_use]
    pub fn new(catalog: ShapeCatalog) -> Self {
        Self::with_seed(catalog, rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(catalog: ShapeCatalog, seed: BatchSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            catalog,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &ShapeCatalog {
        &self.catalog
    }

    /// Draws `size` shapes. Returns an empty batch if the catalog is empty.
    pub fn next_batch(&mut self, size: usize) -> Vec<ShapeDefinition> {
        (0..size)
            .map_while(|_| self.catalog.shapes.choose(&mut self.rng).cloned())
            .collect()
    }
}
