use anyhow::ensure;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const FIRST_WEEK: u8 = 1;
pub const LAST_WEEK: u8 = 18;

/// A scoring period of the regular season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Week(u8);

impl Week {
    pub fn new(n: u8) -> anyhow::Result<Self> {
        ensure!(
            (FIRST_WEEK..=LAST_WEEK).contains(&n),
            "week must be {FIRST_WEEK}..={LAST_WEEK} (got {n})"
        );
        Ok(Self(n))
    }

    pub fn first() -> Self {
        Self(FIRST_WEEK)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn prev(self) -> Self {
        Self(self.0.saturating_sub(1).max(FIRST_WEEK))
    }

    pub fn next(self) -> Self {
        Self((self.0 + 1).min(LAST_WEEK))
    }
}

impl TryFrom<u8> for Week {
    type Error = anyhow::Error;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<Week> for u8 {
    fn from(week: Week) -> u8 {
        week.0
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
