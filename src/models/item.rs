//! Catalog item references as seen by the portal

use serde::{Deserialize, Serialize};
use std::{fmt, num::ParseIntError, str::FromStr};

/// Identifier of a catalog entry on the remote API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(ItemId)
    }
}

impl From<i32> for ItemId {
    fn from(v: i32) -> Self {
        ItemId(v)
    }
}

/// Wishlist membership of an item for the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Membership {
    Saved,
    #[default]
    NotSaved,
}

impl Membership {
    pub fn is_saved(self) -> bool {
        matches!(self, Membership::Saved)
    }

    pub fn toggled(self) -> Self {
        match self {
            Membership::Saved => Membership::NotSaved,
            Membership::NotSaved => Membership::Saved,
        }
    }
}

impl From<bool> for Membership {
    fn from(saved: bool) -> Self {
        if saved {
            Membership::Saved
        } else {
            Membership::NotSaved
        }
    }
}
