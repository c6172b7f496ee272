//! Collision geometry and queries
//!
//! # Module Organization
//!
//! - [`primitives`] - Line segments and axis-aligned boxes
//! - [`results`] - Mergeable answers returned by profile queries
//! - [`shape`] - Polygon and composite shape data
//! - [`profile`] - Kinematic state plus shape, and all geometric queries
//!
//! # Key Types
//!
//! - [`Profile`] - The unit the grid indexes and snap resolves
//! - [`Shape`] - Closed set of shape variants
//! - [`SnapResult`] - Aggregated outcome of one snap pass

pub mod primitives;
pub mod profile;
pub mod results;
pub mod shape;

pub use primitives::{Aabb, Line};
pub use profile::{box_adjustment, Profile, ProfileDelta};
pub use results::{
    abs_max, Axes, BoxAdjustment, ContainsResult, IntersectResult, OverlapResult, SnapResult,
};
pub use shape::{Attachment, Composite, Polygon, Shape, SubProfile};
