//! Subscription tier hierarchy.
//!
//! Access is defined by **containment sets** rather than a numeric compare:
//! each tier names exactly the asset tiers it unlocks. The relation is
//! reflexive (every tier unlocks itself) and transitive by construction.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use tiervault_core::DomainError;

/// Subscription tier. Wire form is the display string ("Creator+", ...).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "Creator")]
    Creator,
    #[serde(rename = "Creator+")]
    CreatorPlus,
    #[serde(rename = "Creator++")]
    CreatorPlusPlus,
}

impl Tier {
    /// All tiers, lowest first. This is the closed set admin selectors offer.
    pub const ALL: [Tier; 3] = [Tier::Creator, Tier::CreatorPlus, Tier::CreatorPlusPlus];

    /// The asset tiers this subscription tier unlocks.
    pub fn unlocks(&self) -> &'static [Tier] {
        match self {
            Tier::Creator => &[Tier::Creator],
            Tier::CreatorPlus => &[Tier::Creator, Tier::CreatorPlus],
            Tier::CreatorPlusPlus => &[Tier::Creator, Tier::CreatorPlus, Tier::CreatorPlusPlus],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Creator => "Creator",
            Tier::CreatorPlus => "Creator+",
            Tier::CreatorPlusPlus => "Creator++",
        }
    }

    /// Parse a stored tier value. Unknown values yield `None`: tier strings
    /// originate from user-editable external storage and must never widen
    /// access or abort a fetch.
    pub fn parse(s: &str) -> Option<Tier> {
        match s {
            "Creator" => Some(Tier::Creator),
            "Creator+" => Some(Tier::CreatorPlus),
            "Creator++" => Some(Tier::CreatorPlusPlus),
            _ => None,
        }
    }
}

impl core::fmt::Display for Tier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::parse(s).ok_or_else(|| DomainError::validation(format!("unknown tier '{s}'")))
    }
}

/// Whether a user's tier grants access to an asset of the given tier.
///
/// `None` means the user's tier is absent or was unrecognized in storage;
/// both deny. No side effects, never panics.
pub fn tier_grants_access(user_tier: Option<Tier>, asset_tier: Tier) -> bool {
    match user_tier {
        Some(tier) => tier.unlocks().contains(&asset_tier),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tier_unlocks_itself() {
        for tier in Tier::ALL {
            assert!(tier_grants_access(Some(tier), tier), "{tier} must unlock itself");
        }
    }

    #[test]
    fn lower_tier_does_not_unlock_higher() {
        assert!(!tier_grants_access(Some(Tier::Creator), Tier::CreatorPlus));
        assert!(!tier_grants_access(Some(Tier::Creator), Tier::CreatorPlusPlus));
        assert!(!tier_grants_access(Some(Tier::CreatorPlus), Tier::CreatorPlusPlus));
    }

    #[test]
    fn top_tier_unlocks_everything() {
        for tier in Tier::ALL {
            assert!(tier_grants_access(Some(Tier::CreatorPlusPlus), tier));
        }
    }

    #[test]
    fn absent_tier_denies() {
        for tier in Tier::ALL {
            assert!(!tier_grants_access(None, tier));
        }
    }

    #[test]
    fn parse_round_trips_and_rejects_unknown() {
        for tier in Tier::ALL {
            assert_eq!(Tier::parse(tier.as_str()), Some(tier));
        }
        assert_eq!(Tier::parse("creator"), None);
        assert_eq!(Tier::parse("Creator+++"), None);
        assert_eq!(Tier::parse(""), None);
    }

    #[test]
    fn wire_form_is_display_string() {
        let json = serde_json::to_string(&Tier::CreatorPlus).unwrap();
        assert_eq!(json, "\"Creator+\"");
        let back: Tier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Tier::CreatorPlus);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn any_tier() -> impl Strategy<Value = Tier> {
            prop::sample::select(Tier::ALL.to_vec())
        }

        proptest! {
            /// Property: containment is transitive (a grants b and b grants c
            /// implies a grants c).
            #[test]
            fn containment_is_transitive(a in any_tier(), b in any_tier(), c in any_tier()) {
                if tier_grants_access(Some(a), b) && tier_grants_access(Some(b), c) {
                    prop_assert!(tier_grants_access(Some(a), c));
                }
            }

            /// Property: the relation is antisymmetric on distinct tiers.
            #[test]
            fn containment_is_antisymmetric(a in any_tier(), b in any_tier()) {
                if a != b && tier_grants_access(Some(a), b) {
                    prop_assert!(!tier_grants_access(Some(b), a));
                }
            }
        }
    }
}
