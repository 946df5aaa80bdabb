//! Declarative macros for ergonomic effect construction
//!
//! These macros reduce boilerplate when creating `Effect` variants from
//! async service calls.

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use casedesk_core::async_effect;
///
/// async_effect! {
///     match service.fetch_all().await {
///         Ok(clients) => Some(ClientsAction::LoadSuccess { clients }),
///         Err(error) => Some(ClientsAction::LoadFailure { error: error.to_string() }),
///     }
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Cancellable` around an async block
///
/// A new effect started under the same id supersedes the previous one.
///
/// # Example
///
/// ```rust,ignore
/// use casedesk_core::cancellable_effect;
///
/// cancellable_effect! {
///     id: "clients.load",
///     async {
///         match service.fetch_all().await {
///             Ok(clients) => Some(ClientsAction::LoadSuccess { clients }),
///             Err(error) => Some(ClientsAction::LoadFailure { error: error.to_string() }),
///         }
///     }
/// }
/// ```
#[macro_export]
macro_rules! cancellable_effect {
    (
        id: $id:expr,
        async { $($body:tt)* }
    ) => {
        $crate::effect::Effect::Cancellable {
            id: ::std::convert::Into::into($id),
            effect: ::std::boxed::Box::new($crate::async_effect! { $($body)* }),
        }
    };
}
