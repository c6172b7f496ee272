//! Identity keys, spaces and body attributes
//!
//! A body is identified by the pair (space, id). Spaces partition identities
//! and double as the coarse category collision filters select on; attributes
//! are finer per-body tags that change how contacts are resolved.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain category of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Space {
    /// No owner / unknown category
    Unknown,
    /// Player-controlled characters
    Player,
    /// Static level geometry
    Wall,
    /// Bullets, grenades and other thrown things
    Projectile,
    /// Collectibles
    Pickup,
    /// Equipment held by another body
    Equip,
}

impl Space {
    /// Every space except `Unknown`
    pub const ALL: [Self; 5] = [
        Self::Player,
        Self::Wall,
        Self::Projectile,
        Self::Pickup,
        Self::Equip,
    ];

    /// Mask bit for this space
    pub const fn mask(self) -> SpaceMask {
        match self {
            Self::Unknown => SpaceMask::UNKNOWN,
            Self::Player => SpaceMask::PLAYER,
            Self::Wall => SpaceMask::WALL,
            Self::Projectile => SpaceMask::PROJECTILE,
            Self::Pickup => SpaceMask::PICKUP,
            Self::Equip => SpaceMask::EQUIP,
        }
    }
}

bitflags! {
    /// Set of spaces, used as the allow-list of a collider filter
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct SpaceMask: u32 {
        /// Unknown space
        const UNKNOWN = 1 << 0;
        /// Player space
        const PLAYER = 1 << 1;
        /// Wall space
        const WALL = 1 << 2;
        /// Projectile space
        const PROJECTILE = 1 << 3;
        /// Pickup space
        const PICKUP = 1 << 4;
        /// Equip space
        const EQUIP = 1 << 5;
    }
}

impl SpaceMask {
    /// Whether a space is part of the set
    pub const fn has(self, space: Space) -> bool {
        self.contains(space.mask())
    }
}

impl FromIterator<Space> for SpaceMask {
    fn from_iter<I: IntoIterator<Item = Space>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |acc, space| acc | space.mask())
    }
}

bitflags! {
    /// Per-body tags consulted by filters and by snap overrides
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Attributes: u32 {
        /// Blocks movement (plain wall)
        const SOLID = 1 << 0;
        /// One-way platform: only stops approach from above
        const PLATFORM = 1 << 1;
        /// Step that can be climbed instead of blocking horizontally
        const STAIR = 1 << 2;
        /// Slope: resolved vertically when pushing up
        const RAMP = 1 << 3;
        /// Body is dead and usually filtered out of queries
        const DEAD = 1 << 4;
        /// Body is temporarily non-colliding
        const INTANGIBLE = 1 << 5;
    }
}

/// Identity key: unique within its space
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Id {
    space: Space,
    id: u32,
}

impl Id {
    /// Sentinel for "no owner"
    pub const NONE: Self = Self {
        space: Space::Unknown,
        id: 0,
    };

    /// Create an id in a space
    pub const fn new(space: Space, id: u32) -> Self {
        Self { space, id }
    }

    /// The space this id belongs to
    pub const fn space(&self) -> Space {
        self.space
    }

    /// Numeric part of the id
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// False for ids in the unknown space
    pub fn is_valid(&self) -> bool {
        self.space != Space::Unknown
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}#{}", self.space, self.id)
    }
}
