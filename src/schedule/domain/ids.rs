//! Opaque identifiers issued by the backend.
//!
//! Identifiers are carried verbatim; the only local rule is that they are
//! not blank.

macro_rules! backend_identifier {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a validated identifier.
            ///
            /// # Errors
            ///
            /// Returns
            /// [`ScheduleDomainError::EmptyIdentifier`](crate::schedule::domain::ScheduleDomainError::EmptyIdentifier)
            /// when the value is blank.
            pub fn new(
                value: impl Into<String>,
            ) -> Result<Self, $crate::schedule::domain::ScheduleDomainError> {
                let raw = value.into();
                let normalized = raw.trim();
                if normalized.is_empty() {
                    return Err($crate::schedule::domain::ScheduleDomainError::EmptyIdentifier(
                        $label,
                    ));
                }
                Ok(Self(normalized.to_owned()))
            }

            /// Returns the identifier as `str`.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::schedule::domain::ScheduleDomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

pub(crate) use backend_identifier;

backend_identifier!(
    /// Identifier of a schedulable item (appointment, production order or
    /// assembly task).
    ItemId,
    "item"
);

backend_identifier!(
    /// Identifier of a customer job.
    JobId,
    "job"
);

backend_identifier!(
    /// Identifier of a job role (production discipline such as PVC or glass).
    RoleId,
    "role"
);

backend_identifier!(
    /// Identifier of an assembly team.
    TeamId,
    "team"
);

backend_identifier!(
    /// Identifier of a staff member.
    PersonId,
    "person"
);
