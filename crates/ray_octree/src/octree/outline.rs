//! Debug outlines of occupied leaves, for an external line renderer.
//!
//! The core never draws anything itself. It hands a renderer a lazy stream of
//! line-list vertices: 12 edges × 2 endpoints for every leaf cube holding at
//! least one entry.

use glam::DVec3;

use super::{DAabb3, OctreeIndex};

/// Vertices emitted per occupied leaf.
pub const VERTICES_PER_LEAF: usize = 24;

/// Callback interface for whatever draws debug lines.
///
/// # Example
///
/// ```ignore
/// struct GizmoLines<'a>(&'a mut Gizmos);
///
/// impl BoundsRenderer for GizmoLines<'_> {
///     fn draw_lines(&mut self, vertices: &mut dyn Iterator<Item = DVec3>) {
///         while let (Some(a), Some(b)) = (vertices.next(), vertices.next()) {
///             self.0.line(a.as_vec3(), b.as_vec3(), Color::WHITE);
///         }
///     }
/// }
/// ```
pub trait BoundsRenderer {
  /// Consume line-list vertices (pairs of endpoints). The iterator is
  /// finite and cannot be restarted.
  fn draw_lines(&mut self, vertices: &mut dyn Iterator<Item = DVec3>);
}

impl<T> OctreeIndex<T> {
  /// Bounds of every leaf holding at least one entry, depth-first from the
  /// root in octant order.
  ///
  /// Lazy: each node is inspected only when the iterator reaches it. Leaves
  /// that split mid-iteration are followed into their children.
  pub fn occupied_leaf_bounds(&self) -> impl Iterator<Item = DAabb3> + '_ {
    self
      .walk()
      .filter(|visit| visit.leaf_len.is_some_and(|len| len > 0))
      .map(|visit| *visit.node.bounds())
  }

  /// Line-list vertices outlining every occupied leaf.
  pub fn debug_line_vertices(&self) -> impl Iterator<Item = DVec3> + '_ {
    self
      .occupied_leaf_bounds()
      .flat_map(|bounds| bounds.line_vertices())
  }

  /// Push the occupied-leaf outlines to `renderer`.
  pub fn draw_bounds<R: BoundsRenderer + ?Sized>(&self, renderer: &mut R) {
    renderer.draw_lines(&mut self.debug_line_vertices());
  }
}
