//! The rank of an application within a search result list.

use std::{fmt, num::NonZeroU32};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A 1-based position in the upstream result list.
///
/// "Not found" is modelled as `Option<Rank>::None` everywhere; it is a normal
/// outcome and never an error.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Rank(NonZeroU32);

impl Rank {
  /// Build a rank from a 1-based position. Returns `None` for zero.
  pub fn new(position: u32) -> Option<Self> { NonZeroU32::new(position).map(Self) }

  /// Build a rank from a 0-based index into a result list.
  pub fn from_index(index: usize) -> Option<Self> {
    u32::try_from(index)
      .ok()
      .and_then(|i| i.checked_add(1))
      .and_then(Self::new)
  }

  pub fn get(self) -> u32 { self.0.get() }
}

impl TryFrom<i64> for Rank {
  type Error = Error;

  fn try_from(v: i64) -> Result<Self> {
    if v == 0 {
      return Err(Error::ZeroRank(v));
    }
    u32::try_from(v)
      .ok()
      .and_then(Self::new)
      .ok_or(Error::RankOutOfRange(v))
  }
}

impl From<Rank> for i64 {
  fn from(r: Rank) -> Self { i64::from(r.get()) }
}

impl fmt::Display for Rank {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn index_is_converted_to_one_based_position() {
    assert_eq!(Rank::from_index(0).map(Rank::get), Some(1));
    assert_eq!(Rank::from_index(2).map(Rank::get), Some(3));
  }

  #[test]
  fn zero_is_not_a_rank() {
    assert!(Rank::new(0).is_none());
    assert!(matches!(Rank::try_from(0_i64), Err(Error::ZeroRank(0))));
    assert!(matches!(Rank::try_from(-4_i64), Err(Error::RankOutOfRange(-4))));
  }

  #[test]
  fn not_found_differs_from_every_rank() {
    let found: Option<Rank> = Rank::new(1);
    assert_ne!(found, None);
    assert_eq!(None::<Rank>, None);
  }
}
