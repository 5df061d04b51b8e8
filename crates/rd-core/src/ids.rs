//! Strongly typed string identifiers.
//!
//! Vehicle and target ids come from configuration files and external feeds,
//! so they are strings rather than indices.  Wrapping them keeps a
//! `VehicleId` from ever being passed where a `TargetId` is expected.

use std::fmt;

use crate::CoreError;

/// Generate a typed wrapper around an owned, non-empty string.
macro_rules! string_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(String);

        impl $name {
            /// Wrap `id`.  Empty ids are accepted here; use
            /// [`parse`](Self::parse) for input that must be validated.
            #[inline]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Wrap `id`, rejecting empty or all-whitespace strings.
            pub fn parse(id: impl Into<String>) -> Result<Self, CoreError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(CoreError::InvalidId(id));
                }
                Ok(Self(id))
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            #[inline]
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            #[inline]
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id! {
    /// Session-stable identifier of a response unit.
    pub struct VehicleId;
}

string_id! {
    /// Identifier of a dispatch target (incident or danger zone).
    pub struct TargetId;
}
