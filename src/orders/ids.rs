//! Order Ids

use std::fmt::{Debug, Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order identifier, handed to the customer for tracking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Create an order id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Source of fresh order ids.
pub trait OrderIdGenerator: Debug {
    /// Returns an id that this generator has not returned before.
    fn next_id(&mut self) -> OrderId;
}

/// Counts up from a starting number, rendered with at least six digits.
#[derive(Debug, Clone)]
pub struct SequentialOrderIds {
    next: u64,
}

impl SequentialOrderIds {
    /// The first id handed out by default.
    pub const FIRST: u64 = 100_000;

    /// Create a generator starting at [`Self::FIRST`].
    pub fn new() -> Self {
        Self::starting_at(Self::FIRST)
    }

    /// Create a generator starting at the given number.
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }
}

impl Default for SequentialOrderIds {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderIdGenerator for SequentialOrderIds {
    fn next_id(&mut self) -> OrderId {
        let id = OrderId::new(format!("{:06}", self.next));

        self.next = self.next.saturating_add(1);

        id
    }
}

/// Time-ordered UUID v7 ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidOrderIds;

impl OrderIdGenerator for UuidOrderIds {
    fn next_id(&mut self) -> OrderId {
        OrderId::new(Uuid::now_v7().to_string())
    }
}

/// Which order id generator to use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OrderIdStrategy {
    /// Six digit counter, starting at 100000.
    #[default]
    Sequential,

    /// Time-ordered UUID v7
    Uuid,
}

impl OrderIdStrategy {
    /// Build a generator for this strategy.
    pub fn generator(self) -> Box<dyn OrderIdGenerator> {
        match self {
            Self::Sequential => Box::new(SequentialOrderIds::new()),
            Self::Uuid => Box::new(UuidOrderIds),
        }
    }
}
