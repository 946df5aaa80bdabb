//! Derive macros for casedesk
//!
//! This crate provides procedural macros to reduce boilerplate when declaring
//! the action vocabulary of a state slice.
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Generates classification helpers for action enums
//!
//! # Example
//!
//! ```ignore
//! use casedesk_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! #[action(scope = "Clients")]
//! enum ClientsAction {
//!     #[request]
//!     Load,
//!
//!     #[success]
//!     LoadSuccess { clients: Vec<Client> },
//!
//!     #[failure]
//!     LoadFailure { error: String },
//!
//!     ClearSelection,
//! }
//!
//! // Generated methods:
//! assert!(ClientsAction::Load.is_request());
//! assert_eq!(ClientsAction::Load.action_type(), "[Clients] Load");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitStr, Variant};

/// Role of a variant in the request/response protocol
#[derive(Clone, Copy, PartialEq, Eq)]
enum Role {
    Request,
    Success,
    Failure,
}

impl Role {
    const ALL: [(Self, &'static str); 3] = [
        (Self::Request, "request"),
        (Self::Success, "success"),
        (Self::Failure, "failure"),
    ];
}

/// Derive macro for Action enums
///
/// Generates helper methods for action enums:
/// - `is_request()` - Returns true if this variant starts an asynchronous operation
/// - `is_success()` - Returns true if this variant reports a successful result
/// - `is_failure()` - Returns true if this variant reports a failed result
/// - `is_terminal()` - Returns true for success or failure variants
/// - `action_type()` - Returns a `"[Scope] Variant"` label for logging
///
/// # Attributes
///
/// - `#[action(scope = "Name")]` on the enum - Label prefix (defaults to the
///   enum name without its `Action` suffix)
/// - `#[request]`, `#[success]`, `#[failure]` on variants - The variant role.
///   Untagged variants are synchronous and belong to none of the groups.
///
/// # Errors
///
/// Produces a compile error if:
/// - Applied to a non-enum type
/// - A variant carries more than one role attribute
/// - The `action` attribute is malformed
///
/// # Example
///
/// ```ignore
/// #[derive(Action, Clone, Debug)]
/// #[action(scope = "Cases")]
/// enum CasesAction {
///     #[request]
///     LoadByClient { client_id: ClientId },
///
///     #[success]
///     LoadSuccess { cases: Vec<Case>, nationalities: Vec<CaseNationality> },
///
///     #[failure]
///     LoadFailure { error: String },
/// }
///
/// let action = CasesAction::LoadFailure { error: "network down".into() };
/// assert!(action.is_terminal());
/// assert_eq!(action.action_type(), "[Cases] LoadFailure");
/// ```
#[proc_macro_derive(Action, attributes(action, request, success, failure))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_action(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_action(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "#[derive(Action)] can only be used on enums",
        ));
    };

    let scope = scope_label(input)?;

    let mut request_arms = Vec::new();
    let mut success_arms = Vec::new();
    let mut failure_arms = Vec::new();
    let mut type_arms = Vec::new();

    for variant in &data_enum.variants {
        let pattern = variant_pattern(variant);
        let label = format!("[{scope}] {}", variant.ident);
        type_arms.push(quote! { #pattern => #label, });

        match variant_role(variant)? {
            Some(Role::Request) => request_arms.push(pattern),
            Some(Role::Success) => success_arms.push(pattern),
            Some(Role::Failure) => failure_arms.push(pattern),
            None => {},
        }
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let is_request = any_of(&request_arms);
    let is_success = any_of(&success_arms);
    let is_failure = any_of(&failure_arms);

    Ok(quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            /// Returns true if this action starts an asynchronous operation
            #[must_use]
            pub const fn is_request(&self) -> bool {
                #is_request
            }

            /// Returns true if this action reports a successful result
            #[must_use]
            pub const fn is_success(&self) -> bool {
                #is_success
            }

            /// Returns true if this action reports a failed result
            #[must_use]
            pub const fn is_failure(&self) -> bool {
                #is_failure
            }

            /// Returns true if this action resolves a request
            #[must_use]
            pub const fn is_terminal(&self) -> bool {
                self.is_success() || self.is_failure()
            }

            /// Returns the `"[Scope] Variant"` label of this action
            #[must_use]
            pub const fn action_type(&self) -> &'static str {
                match self {
                    #(#type_arms)*
                }
            }
        }
    })
}

/// Reads `#[action(scope = "...")]`, falling back to the enum name
fn scope_label(input: &DeriveInput) -> syn::Result<String> {
    let mut scope = None;

    for attr in input.attrs.iter().filter(|a| a.path().is_ident("action")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("scope") {
                let value: LitStr = meta.value()?.parse()?;
                scope = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported action attribute, expected `scope`"))
            }
        })?;
    }

    Ok(scope.unwrap_or_else(|| {
        let name = input.ident.to_string();
        name.strip_suffix("Action")
            .filter(|s| !s.is_empty())
            .map_or_else(|| name.clone(), str::to_string)
    }))
}

fn variant_role(variant: &Variant) -> syn::Result<Option<Role>> {
    let mut found = None;

    for (role, attr_name) in Role::ALL {
        if has_attribute(&variant.attrs, attr_name) {
            if found.is_some() {
                return Err(syn::Error::new_spanned(
                    variant,
                    "Variant can carry only one of #[request], #[success] or #[failure]",
                ));
            }
            found = Some(role);
        }
    }

    Ok(found)
}

/// `matches!` over the given patterns, or `false` when there are none
fn any_of(patterns: &[TokenStream2]) -> TokenStream2 {
    if patterns.is_empty() {
        quote! { false }
    } else {
        quote! { matches!(self, #(#patterns)|*) }
    }
}

fn variant_pattern(variant: &Variant) -> TokenStream2 {
    let ident = &variant.ident;
    match &variant.fields {
        Fields::Named(_) => quote! { Self::#ident { .. } },
        Fields::Unnamed(_) => quote! { Self::#ident(..) },
        Fields::Unit => quote! { Self::#ident },
    }
}

/// Helper function to check if an attribute list contains a specific attribute
fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
