// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ID generation and newtype wrappers for opaque identifiers.

/// Define a newtype ID wrapper around `String`.
///
/// Generates `new()` (random v4 UUID), `from_raw()`, `as_str()`, `Display`,
/// `From<String>`, `From<&str>`, and `PartialEq<str>` implementations.
#[macro_export]
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub struct $name(pub String);

        impl $name {
            /// Generate a new random opaque id.
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            /// Wrap an existing id string (e.g. one assigned by a backend).
            pub fn from_raw(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }
    };
}

crate::define_id! {
    /// Opaque session identifier (§3 Data Model: Session.id).
    pub struct SessionId;
}

crate::define_id! {
    /// Backend-assigned breakpoint identifier (§3: Breakpoint Registry value).
    pub struct BackendBreakpointId;
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
