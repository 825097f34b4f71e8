use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single bot's result for one generation.
///
/// Only `fitness` is interpreted; every other field is carried through
/// untouched so a record can be reported back in full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotRecord {
    pub fitness: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BotRecord {
    /// Create a record carrying nothing but a fitness score
    #[must_use]
    pub fn with_fitness(fitness: f64) -> Self {
        Self {
            fitness,
            extra: Map::new(),
        }
    }
}

/// One population snapshot: the bot records of a single generation file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Generation {
    bots: Vec<BotRecord>,
    #[serde(skip)]
    source: Option<PathBuf>,
}

impl Generation {
    #[must_use]
    pub fn new(bots: Vec<BotRecord>) -> Self {
        Self { bots, source: None }
    }

    /// Build a generation from raw fitness values (useful for tests)
    #[must_use]
    pub fn from_fitness(values: &[f64]) -> Self {
        Self::new(values.iter().copied().map(BotRecord::with_fitness).collect())
    }

    /// Load a generation from a JSON array of bot records
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not an array of objects with a numeric `fitness`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a generation from raw file bytes. Invalid UTF-8 is a parse error.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a JSON array of objects with a numeric `fitness`.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    #[must_use]
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    #[must_use]
    pub fn bots(&self) -> &[BotRecord] {
        &self.bots
    }

    /// File this generation was read from, if it came from disk.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bots.is_empty()
    }

    pub fn fitness_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.bots.iter().map(|bot| bot.fitness)
    }
}

// Where a generation was loaded from does not change what it contains.
impl PartialEq for Generation {
    fn eq(&self, other: &Self) -> bool {
        self.bots == other.bots
    }
}

/// Every generation of one simulation run, in generation order.
///
/// Position `i` holds generation number `i + 1`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunResults {
    generations: Vec<Generation>,
}

impl RunResults {
    #[must_use]
    pub fn new(generations: Vec<Generation>) -> Self {
        Self { generations }
    }

    #[must_use]
    pub fn generations(&self) -> &[Generation] {
        &self.generations
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.generations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    /// Generations paired with their 1-based generation numbers.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &Generation)> {
        self.generations
            .iter()
            .enumerate()
            .map(|(idx, generation)| (idx + 1, generation))
    }

    /// Total bot records across every generation.
    #[must_use]
    pub fn bot_count(&self) -> usize {
        self.generations.iter().map(Generation::len).sum()
    }
}

impl From<Vec<Generation>> for RunResults {
    fn from(generations: Vec<Generation>) -> Self {
        Self::new(generations)
    }
}
