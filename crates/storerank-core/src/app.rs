//! Tracked applications.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, ids::ApplicationId, keyword::KeywordList};

/// An application whose keyword ranks are tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
  pub id:          ApplicationId,
  /// The store-assigned identifier (the iTunes `trackId`).
  pub external_id: String,
  pub name:        String,
  /// Storefront country code, e.g. `us` or `de`.
  pub country:     String,
  pub keywords:    KeywordList,
}

/// Input to [`crate::store::RankStore::add_application`].
/// The `id` is always assigned by the store.
#[derive(Debug, Clone)]
pub struct NewApplication {
  pub external_id: String,
  pub name:        String,
  pub country:     String,
  pub keywords:    KeywordList,
}

impl NewApplication {
  /// Build an input from raw operator strings, trimming every field.
  pub fn new(
    external_id: impl AsRef<str>,
    name: impl AsRef<str>,
    country: impl AsRef<str>,
    keywords_csv: &str,
  ) -> Result<Self> {
    let input = Self {
      external_id: external_id.as_ref().trim().to_owned(),
      name:        name.as_ref().trim().to_owned(),
      country:     country.as_ref().trim().to_lowercase(),
      keywords:    KeywordList::parse(keywords_csv),
    };
    input.validate()?;
    Ok(input)
  }

  pub fn validate(&self) -> Result<()> {
    for (field, value) in [
      ("external id", &self.external_id),
      ("name", &self.name),
      ("country", &self.country),
    ] {
      if value.trim().is_empty() {
        return Err(Error::EmptyField { field });
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_trims_and_lowercases_country() {
    let input = NewApplication::new(" 999 ", " Brew ", " US ", "coffee, tea").unwrap();
    assert_eq!(input.external_id, "999");
    assert_eq!(input.name, "Brew");
    assert_eq!(input.country, "us");
    assert_eq!(input.keywords.as_slice(), &["coffee", "tea"]);
  }

  #[test]
  fn blank_fields_are_rejected() {
    let err = NewApplication::new("999", "  ", "us", "coffee").unwrap_err();
    assert!(matches!(err, Error::EmptyField { field: "name" }));
  }
}
