//! ray_octree - concurrent point octree with segment proximity queries
//!
//! Stores `(position, payload)` entries in a cubic region of 3D space and
//! finds the ones lying near a ray segment without scanning every entry.
//!
//! # Features
//!
//! - **Capacity-driven subdivision**: leaves split into eight octants when
//!   they overflow, down to a configurable depth cap
//! - **Concurrent inserts and queries**: per-node locks, all operations take
//!   `&self`
//! - **Ray queries**: visit only the leaves a segment touches, filter by
//!   distance to the segment's line
//! - **Debug outlines**: lazy line-list vertices for occupied leaves
//!
//! # Example
//!
//! ```
//! use glam::DVec3;
//! use ray_octree::OctreeIndex;
//!
//! let index = OctreeIndex::new(DVec3::ZERO, 100.0, 8).unwrap();
//! index.add(DVec3::new(5.0, 1.0, 0.0), "crate");
//! index.add(DVec3::new(5.0, 9.0, 0.0), "barrel");
//!
//! let hits = index.get_ray_hits(DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0), 1.0, 0.0);
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].payload, "crate");
//! ```

pub mod error;
pub use error::ConfigError;

// Octree storage, insertion and queries
pub mod octree;
pub use octree::{
  create_root, BoundsRenderer, DAabb3, Entry, NodeId, OctreeConfig, OctreeIndex, OctreeStats,
  RayHit, RaySegment,
};
