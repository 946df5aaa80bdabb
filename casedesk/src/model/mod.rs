//! Domain types for the case-management store.
//!
//! Entities are plain serde records. Each slice keeps them behind `Arc` so
//! an unchanged record can be detected by pointer.

pub mod case;
pub mod client;
pub mod ids;
pub mod nationality;

pub use case::{Case, CaseStatus, Matter, NewCase};
pub use client::{Client, ClientType, NewClient};
pub use ids::{CaseId, ClientId};
pub use nationality::{CaseNationality, DeleLevel, NationalityStage, ResidenceType};

/// Free-form extension fields carried by clients and cases
pub type ExtraData = serde_json::Map<String, serde_json::Value>;
