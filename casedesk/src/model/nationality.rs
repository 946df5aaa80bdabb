//! Nationality record of an immigration case
//!
//! One record per [`Matter::Extranjeria`](super::Matter::Extranjeria) case,
//! tracking parents, residence, exams and the progress of the filing.

use super::CaseId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Legal basis of the applicant's residence
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResidenceType {
    /// Ordinary residence permit
    Residencia,
    /// Settlement (arraigo)
    Arraigo,
    /// Family member of an EU citizen
    FamiliarUe,
    /// Anything else
    Otro,
}

/// DELE Spanish-language certificate level
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DeleLevel {
    /// A2
    A2,
    /// B1
    B1,
    /// B2
    B2,
    /// C1
    C1,
    /// C2
    C2,
}

/// Stage of the nationality filing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NationalityStage {
    /// Filed
    Presentado,
    /// Additional documents requested
    Requerido,
    /// Under review
    EnEstudio,
    /// Granted
    ResueltoFavorable,
    /// Denied
    ResueltoDesfavorable,
    /// Appeal filed
    Recurso,
    /// Appeal decided
    ResueltoRecurso,
    /// Rejected without review
    InadmitidoATramite,
    /// Dismissed
    Desestimado,
    /// Contentious-administrative lawsuit
    DemandaContenciosaAdministrativa,
    /// Anything else
    Otro,
}

/// Highest possible CCSE score
pub const CCSE_MAX_SCORE: u8 = 100;

/// Earliest accepted residence start year
pub const MIN_RESIDENCE_YEAR: u16 = 1900;

/// Immigration-specific extension of a case
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseNationality {
    /// Case this record belongs to
    pub case_id: CaseId,
    /// Father's full name
    #[serde(default)]
    pub father_fullname: Option<String>,
    /// Father's nationality
    #[serde(default)]
    pub father_nationality: Option<String>,
    /// Father's identity document
    #[serde(default)]
    pub father_doc: Option<String>,
    /// Mother's full name
    #[serde(default)]
    pub mother_fullname: Option<String>,
    /// Mother's nationality
    #[serde(default)]
    pub mother_nationality: Option<String>,
    /// Mother's identity document
    #[serde(default)]
    pub mother_doc: Option<String>,
    /// Year legal residence in Spain began
    #[serde(default)]
    pub residence_start_year: Option<u16>,
    /// Legal basis of residence
    #[serde(default)]
    pub residence_type: Option<ResidenceType>,
    /// DELE level obtained
    #[serde(default)]
    pub exam_dele_level: Option<DeleLevel>,
    /// Date of the DELE exam
    #[serde(default)]
    pub exam_dele_date: Option<NaiveDate>,
    /// CCSE constitutional knowledge exam score, 0 to 100
    #[serde(default)]
    pub exam_ccse_score: Option<u8>,
    /// Date the CCSE exam was passed
    #[serde(default)]
    pub exam_ccse_passed_at: Option<NaiveDate>,
    /// Date the filing was submitted
    #[serde(default)]
    pub submission_date: Option<NaiveDate>,
    /// Current stage of the filing
    #[serde(default)]
    pub current_stage: Option<NationalityStage>,
    /// Immigration office handling the filing
    #[serde(default)]
    pub oficina_extranjeria: Option<String>,
}

impl CaseNationality {
    /// An empty record for `case_id`
    #[must_use]
    pub fn for_case(case_id: CaseId) -> Self {
        Self {
            case_id,
            ..Self::default()
        }
    }

    /// Out-of-range values, as `(field, reason)` pairs
    #[must_use]
    pub fn range_errors(&self) -> Vec<(&'static str, String)> {
        let mut errors = Vec::new();
        if let Some(year) = self.residence_start_year {
            if year < MIN_RESIDENCE_YEAR {
                errors.push((
                    "residence_start_year",
                    format!("must be at least {MIN_RESIDENCE_YEAR}"),
                ));
            }
        }
        if let Some(score) = self.exam_ccse_score {
            if score > CCSE_MAX_SCORE {
                errors.push(("exam_ccse_score", format!("must be at most {CCSE_MAX_SCORE}")));
            }
        }
        errors
    }
}
