//! Tree shape statistics.
//!
//! Gathered on demand by walking down from the root; nothing is tracked on
//! the insert path besides the total entry count.

use super::OctreeIndex;

/// Number of depth buckets in [`OctreeStats::leaves_per_depth`].
/// Deeper leaves are counted in the last bucket.
pub const DEPTH_BUCKETS: usize = 16;

/// Snapshot of the tree's shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OctreeStats {
	/// Entries stored across all leaves.
	pub entries: usize,
	/// Allocated nodes, internal and leaf.
	pub nodes: usize,
	/// Nodes without children.
	pub leaves: usize,
	/// Leaves holding at least one entry.
	pub occupied_leaves: usize,
	/// Deepest node depth (root = 0).
	pub max_depth: u32,
	/// Leaves at the depth cap holding more than `capacity` entries.
	pub overfull_leaves: usize,
	/// Leaf count per depth level (index = depth).
	pub leaves_per_depth: [usize; DEPTH_BUCKETS],
}

impl OctreeStats {
	/// Nodes with eight children.
	#[inline]
	pub fn internal_nodes(&self) -> usize {
		self.nodes - self.leaves
	}

	/// Average entries per occupied leaf.
	pub fn mean_occupancy(&self) -> f64 {
		if self.occupied_leaves == 0 {
			0.0
		} else {
			self.entries as f64 / self.occupied_leaves as f64
		}
	}
}

impl<T> OctreeIndex<T> {
	/// Walk the tree from the root and summarise its shape.
	///
	/// Safe to call while other threads insert. Every entry added before the
	/// call is counted once; entries added during it may or may not be.
	#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "octree::stats"))]
	pub fn stats(&self) -> OctreeStats {
		let capacity = self.config().capacity;
		let mut stats = OctreeStats::default();

		for visit in self.walk() {
			let depth = visit.node.depth();
			stats.nodes += 1;
			stats.max_depth = stats.max_depth.max(depth);

			if let Some(len) = visit.leaf_len {
				stats.leaves += 1;
				stats.entries += len;
				if len > 0 {
					stats.occupied_leaves += 1;
				}
				if len > capacity {
					stats.overfull_leaves += 1;
				}
				let bucket = (depth as usize).min(DEPTH_BUCKETS - 1);
				stats.leaves_per_depth[bucket] += 1;
			}
		}

		stats
	}

	/// Number of nodes without children.
	pub fn leaf_count(&self) -> usize {
		self.walk().filter(|visit| visit.leaf_len.is_some()).count()
	}
}
