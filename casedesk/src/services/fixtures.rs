//! Seed data for the mock backends

use crate::error::ServiceError;
use crate::model::{Case, CaseNationality, Client};
use serde::{Deserialize, Serialize};

const BUNDLED: &str = include_str!("fixtures.json");

/// Records a backend starts with
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Fixtures {
    /// Clients
    #[serde(default)]
    pub clients: Vec<Client>,
    /// Cases
    #[serde(default)]
    pub cases: Vec<Case>,
    /// Nationality records of immigration cases
    #[serde(default)]
    pub nationalities: Vec<CaseNationality>,
}

impl Fixtures {
    /// Five clients, four cases and one nationality record
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Fixture`] if the bundled document does not parse.
    pub fn bundled() -> Result<Self, ServiceError> {
        Self::from_json(BUNDLED)
    }

    /// Parse fixtures from a JSON document
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Fixture`] if `json` is malformed.
    pub fn from_json(json: &str) -> Result<Self, ServiceError> {
        Ok(serde_json::from_str(json)?)
    }

    /// No records at all
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}
