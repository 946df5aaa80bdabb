//! Cases slice
//!
//! Owns the case list and, keyed by case id, the nationality records of
//! immigration cases.

pub mod actions;
pub mod effects;
pub mod reducer;
pub mod selectors;
pub mod state;

pub use actions::CasesAction;
pub use reducer::{CasesEnvironment, CasesReducer};
pub use selectors::{CaseFilter, CaseSelectors};
pub use state::{CaseList, CasesState, NationalityMap};
