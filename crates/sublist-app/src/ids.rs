// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! entity_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Trims surrounding whitespace; returns `None` for blank input.
            pub fn parse(value: &str) -> Option<Self> {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(Self(trimmed.to_owned()))
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

entity_id!(SubgroupId);
entity_id!(DatasetId);
entity_id!(SampleId);
entity_id!(UserId);

#[cfg(test)]
mod tests {
    use super::{SampleId, SubgroupId};

    #[test]
    fn parse_trims_and_rejects_blank() {
        assert_eq!(
            SubgroupId::parse("  g-1 \n").map(|id| id.as_str().to_owned()),
            Some("g-1".to_owned())
        );
        assert!(SubgroupId::parse("   ").is_none());
        assert!(SampleId::parse("").is_none());
    }
}
