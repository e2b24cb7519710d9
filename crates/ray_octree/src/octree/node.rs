//! Node - one cubic region of the octree, stored in the index's arena.
//!
//! A node is either a leaf holding entries directly or an internal node
//! holding the ids of its eight children, never both. The switch from leaf to
//! internal happens once, under the node's own write lock.

use glam::DVec3;
use parking_lot::RwLock;

use super::bounds::{octant_direction, octant_index};
use super::DAabb3;

/// Index of a node in the arena. The root is always [`NodeId::ROOT`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
  /// The root node, created with the index.
  pub const ROOT: Self = Self(0);

  pub(crate) fn from_index(index: usize) -> Self {
    Self(index)
  }

  /// Position in the arena.
  #[inline]
  pub fn index(self) -> usize {
    self.0
  }
}

/// A stored `(position, payload)` pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry<T> {
  /// Where the payload lives.
  pub position: DVec3,
  /// Caller data.
  pub payload: T,
}

impl<T> Entry<T> {
  pub fn new(position: DVec3, payload: T) -> Self {
    Self { position, payload }
  }
}

/// Mutable part of a node, guarded by the node's lock.
#[derive(Debug)]
pub(crate) enum NodeState<T> {
  /// Entries held directly.
  Leaf(Vec<Entry<T>>),
  /// Eight children in octant order.
  Internal([NodeId; 8]),
}

/// One octree node.
///
/// Region and depth are fixed at creation; only `state` changes.
#[derive(Debug)]
pub struct Node<T> {
  center: DVec3,
  size: f64,
  depth: u32,
  bounds: DAabb3,
  pub(crate) state: RwLock<NodeState<T>>,
}

impl<T> Node<T> {
  /// Create an empty leaf covering the cube at `center` with edge `size`.
  pub(crate) fn new(center: DVec3, size: f64, depth: u32) -> Self {
    Self {
      center,
      size,
      depth,
      bounds: DAabb3::cube(center, size),
      state: RwLock::new(NodeState::Leaf(Vec::new())),
    }
  }

  /// Child occupying `octant` of this node's cube, as an empty leaf.
  pub(crate) fn child(&self, octant: u8) -> Self {
    let quarter = self.size * 0.25;
    Self::new(
      self.center + octant_direction(octant) * quarter,
      self.size * 0.5,
      self.depth + 1,
    )
  }

  #[inline]
  pub fn center(&self) -> DVec3 {
    self.center
  }

  #[inline]
  pub fn size(&self) -> f64 {
    self.size
  }

  #[inline]
  pub fn half_size(&self) -> f64 {
    self.size * 0.5
  }

  /// Depth below the root (root = 0).
  #[inline]
  pub fn depth(&self) -> u32 {
    self.depth
  }

  /// Cached bounding cube.
  #[inline]
  pub fn bounds(&self) -> &DAabb3 {
    &self.bounds
  }

  /// Octant (0-7) that `position` routes to from this node.
  #[inline]
  pub fn octant_of(&self, position: DVec3) -> u8 {
    octant_index(self.center, position)
  }

  /// Closed-interval containment test on every axis.
  #[inline]
  pub fn is_inside(&self, position: DVec3) -> bool {
    self.bounds.contains_point(position)
  }

  /// Whether the node currently has no children.
  pub fn is_leaf(&self) -> bool {
    matches!(*self.state.read(), NodeState::Leaf(_))
  }

  /// Entries held directly (0 for internal nodes).
  pub fn count(&self) -> usize {
    match &*self.state.read() {
      NodeState::Leaf(entries) => entries.len(),
      NodeState::Internal(_) => 0,
    }
  }

  /// Child ids, or `None` for a leaf.
  pub fn children(&self) -> Option<[NodeId; 8]> {
    match &*self.state.read() {
      NodeState::Leaf(_) => None,
      NodeState::Internal(children) => Some(*children),
    }
  }
}

impl<T: Clone> Node<T> {
  /// Copy of the entries held directly (empty for internal nodes).
  pub fn entries(&self) -> Vec<Entry<T>> {
    match &*self.state.read() {
      NodeState::Leaf(entries) => entries.clone(),
      NodeState::Internal(_) => Vec::new(),
    }
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
