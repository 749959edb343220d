//! Strongly-typed ID wrappers for all entity types
//!
//! Using newtype wrappers prevents accidentally mixing up IDs from different
//! entity types at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, &self.0.to_string()[..8])
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if let Ok(uuid) = Uuid::parse_str(s) {
                    return Ok(Self(uuid));
                }
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(FinancingSourceId, "fs-");
define_id!(ProjectCategoryId, "pc-");
define_id!(ExpenditureArticleId, "art-");
define_id!(PaymentTypeId, "pt-");
define_id!(ExpenditureId, "exp-");
define_id!(CommitmentId, "com-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        let id = FinancingSourceId::new();
        let display = format!("{}", id);
        assert!(display.starts_with("fs-"));
        assert_eq!(display.len(), 11); // "fs-" + 8 chars
    }

    #[test]
    fn test_id_equality() {
        let id1 = ExpenditureId::new();
        let id2 = id1;
        assert_eq!(id1, id2);
        assert_ne!(id1, ExpenditureId::new());
    }

    #[test]
    fn test_id_serialization() {
        let id = ProjectCategoryId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: ProjectCategoryId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_id_parse() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id = PaymentTypeId::parse(uuid_str).unwrap();
        assert_eq!(id.as_uuid().to_string(), uuid_str);
        let prefixed: CommitmentId = format!("com-{}", uuid_str).parse().unwrap();
        assert_eq!(prefixed.as_uuid().to_string(), uuid_str);
    }
}
