//! Ray queries - leaf collection along a segment and distance filtering.
//!
//! Traversal prunes by the finite segment: only leaves whose cube the
//! segment touches are visited. Filtering then measures each entry against
//! the infinite line through the segment, so an entry sitting past an
//! endpoint still counts as close if its leaf was visited.

use glam::DVec3;
use smallvec::SmallVec;

use super::node::{Entry, NodeId, NodeState};
use super::{OctreeIndex, RaySegment};

/// One entry accepted by a ray query.
#[derive(Clone, Debug, PartialEq)]
pub struct RayHit<T> {
  /// Stored position.
  pub position: DVec3,
  /// Stored payload.
  pub payload: T,
  /// Distance from `position` to the query line.
  pub distance: f64,
}

impl<T> OctreeIndex<T> {
  /// Depth-first walk over every leaf whose cube touches `segment`, in
  /// child index order 0..7.
  ///
  /// `visit` runs under the leaf's read lock, so it sees the leaf's entries
  /// as one consistent snapshot. Internal nodes the segment misses are
  /// skipped along with their whole subtree.
  pub(crate) fn visit_leaves_along<F>(&self, segment: &RaySegment, mut visit: F)
  where
    F: FnMut(NodeId, &[Entry<T>]),
  {
    let mut stack: SmallVec<[NodeId; 64]> = SmallVec::new();
    stack.push(NodeId::ROOT);

    while let Some(id) = stack.pop() {
      let node = self.resolve(id);
      if !segment.intersects(node.bounds()) {
        continue;
      }
      match &*node.state.read() {
        NodeState::Leaf(entries) => visit(id, entries.as_slice()),
        // Reversed so child 0 is popped first.
        NodeState::Internal(children) => stack.extend(children.iter().rev().copied()),
      };
    }
  }

  /// Leaves whose bounding cube intersects the segment `start..=end`.
  ///
  /// Empty leaves are included. Order follows a depth-first walk with
  /// children visited 0..7.
  pub fn collect_intersecting_leaves(&self, start: DVec3, end: DVec3) -> Vec<NodeId> {
    let segment = RaySegment::new(start, end);
    let mut leaves = Vec::new();
    self.visit_leaves_along(&segment, |id, _| leaves.push(id));
    leaves
  }
}

impl<T: Clone> OctreeIndex<T> {
  /// Entries within `max_distance` of the line through `start` and `end`.
  ///
  /// Candidate leaves come from [`Self::collect_intersecting_leaves`]'s
  /// walk; the distance is measured to the infinite line, not the segment.
  ///
  /// The distance comes straight from the normalized direction and a dot
  /// product, with no snapping. A point exactly on an axis-aligned line
  /// measures `0.0`, but on an oblique line rounding can leave a few ulps
  /// (about `1e-16` near the origin), which a `max_distance` of `0.0`
  /// rejects. Pass a small tolerance to catch points lying on the line.
  ///
  /// `radius_expand` is accepted for interface compatibility and currently
  /// has no effect on either traversal or filtering.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "octree::get_ray_hits"))]
  pub fn get_ray_hits(
    &self,
    start: DVec3,
    end: DVec3,
    max_distance: f64,
    radius_expand: f64,
  ) -> Vec<RayHit<T>> {
    let _ = radius_expand;
    self.ray_hits(&RaySegment::new(start, end), max_distance)
  }

  /// [`Self::get_ray_hits`] with a prebuilt segment.
  pub fn ray_hits(&self, segment: &RaySegment, max_distance: f64) -> Vec<RayHit<T>> {
    let mut hits = Vec::new();
    #[cfg(feature = "tracing")]
    let mut leaves_visited = 0usize;

    self.visit_leaves_along(segment, |_, entries| {
      #[cfg(feature = "tracing")]
      {
        leaves_visited += 1;
      }
      hits.extend(entries.iter().filter_map(|entry| {
        let distance = segment.distance_to_line(entry.position);
        (distance <= max_distance).then(|| RayHit {
          position: entry.position,
          payload: entry.payload.clone(),
          distance,
        })
      }));
    });

    #[cfg(feature = "tracing")]
    tracing::trace!(leaves_visited, hits = hits.len(), "octree ray query");

    hits
  }
}

#[cfg(test)]
#[path = "query_test.rs"]
mod query_test;
