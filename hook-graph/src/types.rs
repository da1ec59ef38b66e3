use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// Outcome posted when the graph has no mutual follows at all.
pub const FALLBACK_PAIR: MutualPair = MutualPair(4, 5);

/// One entry of the `data.users` array. Unrecognised fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub follows: Vec<UserId>,
}

impl User {
    pub fn new(id: UserId, follows: impl Into<Vec<UserId>>) -> Self {
        Self {
            id,
            follows: follows.into(),
        }
    }
}

/// Unordered pair of user ids, stored as `(min, max)`.
///
/// Serializes as a two-element array.
///
/// ```
/// use hook_graph::MutualPair;
///
/// let pair = MutualPair::new(7, 3);
/// assert_eq!((pair.low(), pair.high()), (3, 7));
/// assert_eq!(serde_json::to_string(&pair).unwrap(), "[3,7]");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MutualPair(UserId, UserId);

impl MutualPair {
    pub fn new(a: UserId, b: UserId) -> Self {
        Self(a.min(b), a.max(b))
    }

    pub fn low(&self) -> UserId {
        self.0
    }

    pub fn high(&self) -> UserId {
        self.1
    }
}

/// What gets posted back as `outcome`: either the fixed fallback pair
/// (`[4,5]`) or every mutual pair in ascending order (`[[1,2],[2,3]]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Fallback(MutualPair),
    Pairs(Vec<MutualPair>),
}

impl Outcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Outcome::Fallback(_))
    }

    /// Number of mutual pairs found; zero for the fallback.
    pub fn pair_count(&self) -> usize {
        match self {
            Outcome::Fallback(_) => 0,
            Outcome::Pairs(pairs) => pairs.len(),
        }
    }
}
