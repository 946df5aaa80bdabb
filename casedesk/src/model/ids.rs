//! Identifiers
//!
//! Ids are opaque strings: fixtures use short literals (`"1"`, `"case-1"`),
//! generated ids look like `client-1735689600000-k3j9x0a1b`.

use casedesk_core::SelectorKey;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an existing id
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the id as a string slice
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the id, returning the inner string
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl SelectorKey for $name {
            fn same(&self, other: &Self) -> bool {
                self == other
            }
        }
    };
}

string_id!(
    /// Unique identifier of a client
    ClientId
);

string_id!(
    /// Unique identifier of a case
    CaseId
);
