//! Mapping of service results onto result actions

use crate::services::ServiceResult;
use std::fmt::Debug;

/// Turns a service result into the matching success or failure action
///
/// The failure action carries the error's display text. Failures are logged
/// here so individual effects don't have to.
pub(crate) fn settle<T, A: Debug>(
    operation: &'static str,
    result: ServiceResult<T>,
    on_success: impl FnOnce(T) -> A,
    on_failure: impl FnOnce(String) -> A,
) -> Option<A> {
    match result {
        Ok(value) => Some(on_success(value)),
        Err(error) => {
            tracing::warn!(operation, %error, "Request failed");
            Some(on_failure(error.to_string()))
        },
    }
}
