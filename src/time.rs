use serde::{Deserialize, Serialize};

/// Logical arrival clock. Advances once per enqueue; it has no relation to wall-clock time.
#[derive(Debug, Clone, Copy, Default, Ord, Eq, PartialEq, Hash, Serialize, Deserialize, PartialOrd)]
pub struct Tick(pub u64);

impl Tick {
    /// The tick after `self`, or `None` once the clock has run out.
    pub fn next(self) -> Option<Tick> {
        self.0.checked_add(1).map(Tick)
    }
}

impl std::fmt::Display for Tick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "T+{}", self.0)
    }
}
