//! trust tiers and the capability policy gated on them (spec.md 4.3)

use std::fmt;

/// one base token, 10^18 minor units — the `u` unit spec.md's stake table
/// is denominated in.
pub const UNIT: u128 = 1_000_000_000_000_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Tier {
    Newcomer,
    Apprentice,
    Builder,
    Guardian,
    Sage,
    Lunar,
}

impl Tier {
    /// contiguous, non-overlapping `[min, max]` score range (spec.md I5)
    pub fn range(&self) -> (u32, u32) {
        match self {
            Self::Newcomer => (0, 199),
            Self::Apprentice => (200, 399),
            Self::Builder => (400, 599),
            Self::Guardian => (600, 799),
            Self::Sage => (800, 899),
            Self::Lunar => (900, 1000),
        }
    }

    /// tier is a pure function of score (spec.md I5); ranges above are
    /// exhaustive and disjoint over `[0,1000]` so this never falls through.
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=199 => Self::Newcomer,
            200..=399 => Self::Apprentice,
            400..=599 => Self::Builder,
            600..=799 => Self::Guardian,
            800..=899 => Self::Sage,
            _ => Self::Lunar,
        }
    }

    /// minimum stake requirement, in minor units (spec.md 4.3)
    pub fn stake_requirement(&self) -> u128 {
        match self {
            Self::Newcomer => UNIT / 20,       // 0.05u
            Self::Apprentice => UNIT / 10,     // 0.10u
            Self::Builder => UNIT / 4,         // 0.25u
            Self::Guardian => UNIT / 2,        // 0.50u
            Self::Sage => UNIT,                // 1.0u
            Self::Lunar => UNIT * 2,           // 2.0u
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// gated capabilities named in spec.md 4.3's tier table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Action {
    JoinSmallCircle,
    JoinMediumCircle,
    JoinLargeCircle,
    CreateSmallCircle,
    CreateMediumCircle,
    CreateLargeCircle,
    Guarantor,
    Vote,
    ProtocolPropose,
    CrossChainBenefits,
}

/// `may(tier, action)` — callers MUST consult this before any
/// capability-gated write (spec.md 4.3).
pub fn may(tier: Tier, action: Action) -> bool {
    use Action::*;
    use Tier::*;
    match action {
        JoinSmallCircle => true,
        JoinMediumCircle => tier >= Apprentice,
        JoinLargeCircle => tier >= Builder,
        CreateSmallCircle => tier >= Builder,
        CreateMediumCircle => tier >= Guardian,
        CreateLargeCircle => tier >= Sage,
        Guarantor => tier >= Guardian,
        Vote => tier >= Guardian,
        ProtocolPropose => tier >= Sage,
        CrossChainBenefits => tier >= Lunar,
    }
}
