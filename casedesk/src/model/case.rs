//! Case (expediente) entity

use super::{CaseId, ClientId, ExtraData};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Legal category of a case
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Matter {
    /// Civil law
    Civil,
    /// Employment law
    Laboral,
    /// Family law
    Familiar,
    /// Immigration law; carries a [`CaseNationality`](super::CaseNationality) record
    Extranjeria,
    /// Traffic law
    Trafico,
    /// Criminal law
    Penal,
}

impl Matter {
    /// Every matter, in menu order
    pub const ALL: [Self; 6] = [
        Self::Civil,
        Self::Laboral,
        Self::Familiar,
        Self::Extranjeria,
        Self::Trafico,
        Self::Penal,
    ];

    /// Wire tag
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Civil => "CIVIL",
            Self::Laboral => "LABORAL",
            Self::Familiar => "FAMILIAR",
            Self::Extranjeria => "EXTRANJERIA",
            Self::Trafico => "TRAFICO",
            Self::Penal => "PENAL",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Civil => "Civil",
            Self::Laboral => "Laboral",
            Self::Familiar => "Familiar",
            Self::Extranjeria => "Extranjería",
            Self::Trafico => "Tráfico",
            Self::Penal => "Penal",
        }
    }
}

impl fmt::Display for Matter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Procedural status of a case
///
/// Declaration order follows the usual lifecycle, but any status may follow
/// any other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseStatus {
    /// Newly opened
    Abierto,
    /// Being processed
    EnTramitacion,
    /// Administrative claim filed before going to court
    ReclamacionPrevia,
    /// In court
    Judicializado,
    /// Closed
    Cerrado,
}

impl CaseStatus {
    /// Every status, in lifecycle order
    pub const ALL: [Self; 5] = [
        Self::Abierto,
        Self::EnTramitacion,
        Self::ReclamacionPrevia,
        Self::Judicializado,
        Self::Cerrado,
    ];

    /// Wire tag
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Abierto => "ABIERTO",
            Self::EnTramitacion => "EN_TRAMITACION",
            Self::ReclamacionPrevia => "RECLAMACION_PREVIA",
            Self::Judicializado => "JUDICIALIZADO",
            Self::Cerrado => "CERRADO",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Abierto => "Abierto",
            Self::EnTramitacion => "En Trámite",
            Self::ReclamacionPrevia => "Reclamación Previa",
            Self::Judicializado => "Judicializado",
            Self::Cerrado => "Cerrado",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A legal case
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Case {
    /// Unique id within the case collection
    pub id: CaseId,
    /// Human-readable number, e.g. `2024-001`
    pub case_number: String,
    /// Sequence within the case number
    pub sequence_number: u32,
    /// Owning client
    pub client_id: ClientId,
    /// Legal category
    pub matter: Matter,
    /// Procedural status
    pub status: CaseStatus,
    /// When the case was opened
    pub opened_at: DateTime<Utc>,
    /// When the case was closed
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    /// Free-text notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Matter-specific extension fields
    #[serde(default)]
    pub specific_data: Option<ExtraData>,
    /// Assigned court representative
    #[serde(default)]
    pub procurador_id: Option<String>,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// Last modification
    pub updated_at: DateTime<Utc>,
    /// Set when the case has been soft-deleted
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Case {
    /// Builds a case from a draft, stamping id and timestamps
    ///
    /// `opened_at` defaults to `now` when the draft leaves it unset.
    #[must_use]
    pub fn from_draft(id: CaseId, draft: NewCase, now: DateTime<Utc>) -> Self {
        Self {
            id,
            case_number: draft.case_number,
            sequence_number: draft.sequence_number,
            client_id: draft.client_id,
            matter: draft.matter,
            status: draft.status,
            opened_at: draft.opened_at.unwrap_or(now),
            closed_at: None,
            notes: draft.notes,
            specific_data: draft.specific_data,
            procurador_id: draft.procurador_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Returns true if this case carries a nationality record
    #[must_use]
    pub fn requires_nationality(&self) -> bool {
        self.matter == Matter::Extranjeria
    }

    /// Returns true once the case is closed
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status == CaseStatus::Cerrado || self.closed_at.is_some()
    }
}

/// Fully populated case form, before the data service assigns identity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewCase {
    /// Human-readable number
    pub case_number: String,
    /// Sequence within the case number
    pub sequence_number: u32,
    /// Owning client
    pub client_id: ClientId,
    /// Legal category
    pub matter: Matter,
    /// Procedural status
    pub status: CaseStatus,
    /// Opening date; defaults to the creation time
    #[serde(default)]
    pub opened_at: Option<DateTime<Utc>>,
    /// Free-text notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Matter-specific extension fields
    #[serde(default)]
    pub specific_data: Option<ExtraData>,
    /// Assigned court representative
    #[serde(default)]
    pub procurador_id: Option<String>,
}

impl NewCase {
    /// An open case draft with sequence number 1
    #[must_use]
    pub fn open(case_number: impl Into<String>, client_id: ClientId, matter: Matter) -> Self {
        Self {
            case_number: case_number.into(),
            sequence_number: 1,
            client_id,
            matter,
            status: CaseStatus::Abierto,
            opened_at: None,
            notes: None,
            specific_data: None,
            procurador_id: None,
        }
    }

    /// Set the notes
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Names of required fields left blank
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.case_number.trim().is_empty() {
            missing.push("case_number");
        }
        if self.client_id.as_str().trim().is_empty() {
            missing.push("client_id");
        }
        missing
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_order_follows_lifecycle() {
        let mut sorted = CaseStatus::ALL;
        sorted.sort();
        assert_eq!(sorted, CaseStatus::ALL);
        assert!(CaseStatus::Abierto < CaseStatus::Cerrado);
    }

    #[test]
    fn test_wire_tags() {
        assert_eq!(
            serde_json::to_string(&CaseStatus::EnTramitacion).unwrap(),
            "\"EN_TRAMITACION\""
        );
        assert_eq!(
            serde_json::from_str::<Matter>("\"EXTRANJERIA\"").unwrap(),
            Matter::Extranjeria
        );
        for matter in Matter::ALL {
            assert_eq!(
                serde_json::to_string(&matter).unwrap(),
                format!("\"{}\"", matter.as_str())
            );
        }
    }

    #[test]
    fn test_from_draft_defaults_opened_at() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let case = Case::from_draft(
            CaseId::from("case-9"),
            NewCase::open("2025-001", ClientId::from("1"), Matter::Extranjeria),
            now,
        );

        assert_eq!(case.opened_at, now);
        assert_eq!(case.status, CaseStatus::Abierto);
        assert!(case.requires_nationality());
        assert!(!case.is_closed());
    }

    #[test]
    fn test_missing_fields() {
        let draft = NewCase::open("", ClientId::from(""), Matter::Civil);
        assert_eq!(draft.missing_fields(), vec!["case_number", "client_id"]);
    }
}
