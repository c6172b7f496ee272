//! Spatial partitioning for broad-phase queries
//!
//! A uniform grid buckets bodies by the tiles their bounds touch; queries
//! return candidates in a priority queue so the narrow phase can handle the
//! deepest contact first.

mod candidate_queue;
mod grid;

pub use candidate_queue::{Candidate, CandidateQueue};
pub use grid::{Grid, LineHit, TileKey};

use crate::physics::collision::Profile;
use crate::physics::id::{Attributes, Id};

/// A profile registered under an id, with its attribute tags
#[derive(Debug, Clone)]
pub struct Body {
    /// Identity key
    pub id: Id,
    /// Shape and motion
    pub profile: Profile,
    /// Tags consulted by filters and snap overrides
    pub attributes: Attributes,
}

impl Body {
    /// Create a body
    pub fn new(id: Id, profile: Profile, attributes: Attributes) -> Self {
        Self {
            id,
            profile,
            attributes,
        }
    }
}
