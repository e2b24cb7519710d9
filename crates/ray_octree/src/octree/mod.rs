//! Octree module: a concurrent point octree queried with line segments.
//!
//! Every node owns a cube. A leaf stores up to `capacity` entries directly;
//! the entry that would exceed it splits the leaf into eight children at the
//! cube's center. Queries walk the leaves a segment touches and keep entries
//! close to the segment's supporting line.
//!
//! # Octant Convention
//!
//! ```text
//! octant = x_bit * 4 + y_bit * 2 + z_bit
//! bit    = 1 if coordinate >= center else 0
//! ```
//!
//! # Module Structure
//!
//! - [`bounds`]: `DAabb3` - cube math, octant split, segment intersection
//! - [`segment`]: `RaySegment` - point-to-line distance
//! - [`config`]: `OctreeConfig` - root region, capacity, depth cap
//! - [`node`]: `Node` / `NodeId` - arena nodes, leaf or internal
//! - [`index`]: `OctreeIndex` - insertion and subdivision
//! - [`query`]: ray traversal and distance filtering
//! - [`stats`]: `OctreeStats` - tree shape summary
//! - [`outline`]: `BoundsRenderer` - debug outlines of occupied leaves

pub mod bounds;
pub mod config;
pub mod index;
pub mod node;
pub mod outline;
pub mod query;
pub mod segment;
pub mod stats;

// Re-exports
pub use bounds::{octant_index, DAabb3};
pub use config::{OctreeConfig, DEFAULT_CAPACITY, DEFAULT_MAX_DEPTH};
pub use index::{create_root, OctreeIndex};
pub use node::{Entry, Node, NodeId};
pub use outline::BoundsRenderer;
pub use query::RayHit;
pub use segment::RaySegment;
pub use stats::OctreeStats;
