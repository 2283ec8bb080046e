//! Surrogate keys assigned by the store.
//!
//! Each entity table uses an auto-incrementing integer primary key. The
//! newtypes keep an application id from being passed where a keyword id is
//! expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! surrogate_id {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    )]
    #[serde(transparent)]
    pub struct $name(pub i64);

    impl $name {
      pub fn get(self) -> i64 { self.0 }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
      }
    }

    impl From<i64> for $name {
      fn from(v: i64) -> Self { Self(v) }
    }
  };
}

surrogate_id!(
  /// Row id in the `apps` table.
  ApplicationId
);
surrogate_id!(
  /// Row id in the `keywords` table.
  KeywordId
);
surrogate_id!(
  /// Row id in the `scans` table.
  ScanId
);
