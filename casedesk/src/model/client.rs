//! Client entity

use super::{ClientId, ExtraData};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Legal nature of a client
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientType {
    /// Natural person
    Fisico,
    /// Legal entity (company, association)
    Juridico,
}

impl ClientType {
    /// Every client type, in menu order
    pub const ALL: [Self; 2] = [Self::Fisico, Self::Juridico];

    /// Wire tag (`"FISICO"`, `"JURIDICO"`)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fisico => "FISICO",
            Self::Juridico => "JURIDICO",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fisico => "Físico",
            Self::Juridico => "Jurídico",
        }
    }
}

impl fmt::Display for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A client of the practice
///
/// `dni_nie`, `phone` and `email` are carried in readable form; the data
/// service is responsible for anything stored at rest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Unique id within the client collection
    pub id: ClientId,
    /// National identity document (DNI/NIE, or CIF for companies)
    pub dni_nie: String,
    /// Given name (company name for legal entities)
    pub first_name: String,
    /// Surnames (company suffix for legal entities)
    pub last_name: String,
    /// Contact phone
    #[serde(default)]
    pub phone: Option<String>,
    /// Contact email
    #[serde(default)]
    pub email: Option<String>,
    /// Street and number
    #[serde(default)]
    pub address_street: Option<String>,
    /// City
    #[serde(default)]
    pub address_city: Option<String>,
    /// Province
    #[serde(default)]
    pub address_province: Option<String>,
    /// Postal code
    #[serde(default)]
    pub address_zip: Option<String>,
    /// Nationality, as written on the intake form
    #[serde(default)]
    pub nationality: Option<String>,
    /// Natural person or legal entity
    pub client_type: ClientType,
    /// Free-form extension fields
    #[serde(default)]
    pub extra_data: Option<ExtraData>,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// Last modification
    pub updated_at: DateTime<Utc>,
    /// Set when the client has been soft-deleted
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Client {
    /// Builds a client from a draft, stamping id and both timestamps
    #[must_use]
    pub fn from_draft(id: ClientId, draft: NewClient, now: DateTime<Utc>) -> Self {
        Self {
            id,
            dni_nie: draft.dni_nie,
            first_name: draft.first_name,
            last_name: draft.last_name,
            phone: draft.phone,
            email: draft.email,
            address_street: draft.address_street,
            address_city: draft.address_city,
            address_province: draft.address_province,
            address_zip: draft.address_zip,
            nationality: draft.nationality,
            client_type: draft.client_type,
            extra_data: draft.extra_data,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// `"first last"`
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns true if the client has been soft-deleted
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Fully populated client form, before the data service assigns identity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewClient {
    /// National identity document
    pub dni_nie: String,
    /// Given name
    pub first_name: String,
    /// Surnames
    pub last_name: String,
    /// Contact phone
    #[serde(default)]
    pub phone: Option<String>,
    /// Contact email
    #[serde(default)]
    pub email: Option<String>,
    /// Street and number
    #[serde(default)]
    pub address_street: Option<String>,
    /// City
    #[serde(default)]
    pub address_city: Option<String>,
    /// Province
    #[serde(default)]
    pub address_province: Option<String>,
    /// Postal code
    #[serde(default)]
    pub address_zip: Option<String>,
    /// Nationality
    #[serde(default)]
    pub nationality: Option<String>,
    /// Natural person or legal entity
    pub client_type: ClientType,
    /// Free-form extension fields
    #[serde(default)]
    pub extra_data: Option<ExtraData>,
}

impl NewClient {
    /// A natural-person draft with only the required fields set
    #[must_use]
    pub fn person(
        dni_nie: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            dni_nie: dni_nie.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: None,
            email: None,
            address_street: None,
            address_city: None,
            address_province: None,
            address_zip: None,
            nationality: None,
            client_type: ClientType::Fisico,
            extra_data: None,
        }
    }

    /// Set the nationality
    #[must_use]
    pub fn with_nationality(mut self, nationality: impl Into<String>) -> Self {
        self.nationality = Some(nationality.into());
        self
    }

    /// Set the contact email
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the client type
    #[must_use]
    pub const fn with_client_type(mut self, client_type: ClientType) -> Self {
        self.client_type = client_type;
        self
    }

    /// Names of required fields left blank
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("dni_nie", &self.dni_nie),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_from_draft_stamps_identity() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single();
        let Some(now) = now else {
            unreachable!("valid timestamp");
        };

        let client = Client::from_draft(
            ClientId::from("client-1"),
            NewClient::person("X1234567L", "Lucía", "Romero").with_nationality("Peruana"),
            now,
        );

        assert_eq!(client.id.as_str(), "client-1");
        assert_eq!(client.created_at, now);
        assert_eq!(client.updated_at, now);
        assert!(!client.is_deleted());
        assert_eq!(client.full_name(), "Lucía Romero");
        assert_eq!(client.nationality.as_deref(), Some("Peruana"));
    }

    #[test]
    fn test_missing_fields() {
        let draft = NewClient::person(" ", "Ana", "");
        assert_eq!(draft.missing_fields(), vec!["dni_nie", "last_name"]);
        assert!(NewClient::person("1", "Ana", "Ruiz").missing_fields().is_empty());
    }

    #[test]
    fn test_client_type_wire_tags() {
        assert_eq!(
            serde_json::to_string(&ClientType::Juridico).ok().as_deref(),
            Some("\"JURIDICO\"")
        );
        assert_eq!(ClientType::Fisico.label(), "Físico");
    }
}
