//! OctreeIndex - the tree handle: node arena, insertion and subdivision.
//!
//! # Storage
//!
//! Nodes live in an append-only arena and refer to their children by
//! [`NodeId`]. Resolving an id takes the arena lock only long enough to clone
//! the node's `Arc`; all real work happens under the node's own lock.
//!
//! # Locking
//!
//! - Leaf check-and-append runs under the leaf's write lock, so concurrent
//!   inserts can never push a leaf past `capacity` together.
//! - Subdivision also runs under that write lock. The eight children are
//!   fully populated before the parent flips to internal, so readers see
//!   either the old leaf or the finished children.
//! - Internal nodes are only read-locked long enough to copy the child id.
//!
//! Locks are taken parent before child and never held while waiting on the
//! arena, so there is no lock cycle.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use glam::DVec3;
use parking_lot::RwLock;
use rayon::prelude::*;
use smallvec::{smallvec, SmallVec};

use super::node::{Entry, Node, NodeId, NodeState};
use super::{DAabb3, OctreeConfig};
use crate::error::ConfigError;

/// Concurrent point octree.
///
/// All operations take `&self`; share it across threads with `Arc` or
/// scoped threads.
#[derive(Debug)]
pub struct OctreeIndex<T> {
  config: OctreeConfig,
  nodes: RwLock<Vec<Arc<Node<T>>>>,
  len: AtomicUsize,
}

impl<T> OctreeIndex<T> {
  /// Build an empty tree whose root covers the cube at `center` with edge
  /// `size`, splitting leaves that would exceed `capacity` entries.
  pub fn new(center: DVec3, size: f64, capacity: usize) -> Result<Self, ConfigError> {
    Self::with_config(OctreeConfig::new(center, size, capacity))
  }

  /// Build an empty tree from a full config.
  pub fn with_config(config: OctreeConfig) -> Result<Self, ConfigError> {
    config.validate()?;
    let root = Node::new(config.center, config.size, 0);
    Ok(Self {
      config,
      nodes: RwLock::new(vec![Arc::new(root)]),
      len: AtomicUsize::new(0),
    })
  }

  /// Configuration the tree was built with.
  pub fn config(&self) -> &OctreeConfig {
    &self.config
  }

  /// Total entries inserted.
  pub fn len(&self) -> usize {
    self.len.load(Ordering::Acquire)
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Nodes allocated so far (root plus eight per subdivision).
  pub fn node_count(&self) -> usize {
    self.nodes.read().len()
  }

  /// Root region.
  pub fn bounds(&self) -> DAabb3 {
    *self.root().bounds()
  }

  /// Closed-interval containment test against the root cube.
  pub fn is_inside(&self, position: DVec3) -> bool {
    self.root().is_inside(position)
  }

  /// Octant of the root that `position` routes to.
  pub fn octant_of(&self, position: DVec3) -> u8 {
    self.root().octant_of(position)
  }

  /// The root node.
  pub fn root(&self) -> Arc<Node<T>> {
    self.resolve(NodeId::ROOT)
  }

  /// Node by id, if it exists.
  pub fn node(&self, id: NodeId) -> Option<Arc<Node<T>>> {
    self.nodes.read().get(id.index()).cloned()
  }

  /// Arena lookup for ids handed out by this tree.
  #[inline]
  pub(crate) fn resolve(&self, id: NodeId) -> Arc<Node<T>> {
    Arc::clone(&self.nodes.read()[id.index()])
  }

  /// Depth-first walk from the root, children in octant order.
  ///
  /// Each node's state is read once, under one lock, to both record its
  /// leaf size and find its children. A leaf that splits after being read
  /// was already counted with its old entries; one split before being read
  /// is followed into its children. Either way every entry inserted before
  /// the walk started is seen exactly once.
  pub(crate) fn walk(&self) -> impl Iterator<Item = NodeVisit<T>> + '_ {
    let mut stack: SmallVec<[NodeId; 64]> = smallvec![NodeId::ROOT];
    std::iter::from_fn(move || {
      let id = stack.pop()?;
      let node = self.resolve(id);
      let leaf_len = match &*node.state.read() {
        NodeState::Leaf(entries) => Some(entries.len()),
        NodeState::Internal(children) => {
          stack.extend(children.iter().rev().copied());
          None
        }
      };
      Some(NodeVisit { node, leaf_len })
    })
  }

  /// Insert one entry.
  ///
  /// Routing never checks that `position` lies inside the root; points
  /// outside still land deterministically in the octant their coordinates
  /// compare into.
  pub fn add(&self, position: DVec3, payload: T) {
    self.insert_at(NodeId::ROOT, Entry::new(position, payload));
    self.len.fetch_add(1, Ordering::AcqRel);
  }

  /// Walk down from `id` to the leaf owning `entry.position` and store it
  /// there, subdividing if the leaf is full.
  fn insert_at(&self, mut id: NodeId, entry: Entry<T>) {
    loop {
      let node = self.resolve(id);

      if let NodeState::Internal(children) = &*node.state.read() {
        id = children[node.octant_of(entry.position) as usize];
        continue;
      }

      let mut state = node.state.write();
      let entries = match &mut *state {
        // Split by another writer between our read and write lock.
        NodeState::Internal(children) => {
          id = children[node.octant_of(entry.position) as usize];
          continue;
        }
        NodeState::Leaf(entries) => entries,
      };

      if entries.len() < self.config.capacity {
        entries.push(entry);
        return;
      }

      if node.depth() >= self.config.max_depth {
        #[cfg(feature = "tracing")]
        tracing::debug!(
          depth = node.depth(),
          count = entries.len() + 1,
          "octree leaf at depth cap, storing past capacity"
        );
        entries.push(entry);
        return;
      }

      let displaced = std::mem::take(entries);
      let children = self.subdivide(&node, displaced, entry);
      *state = NodeState::Internal(children);
      return;
    }
  }

  /// Allocate the eight children of `node` and distribute `displaced` plus
  /// the incoming `entry` among them.
  ///
  /// Called with `node`'s write lock held. The children are not reachable
  /// by any other thread until the caller publishes them.
  fn subdivide(&self, node: &Node<T>, displaced: Vec<Entry<T>>, entry: Entry<T>) -> [NodeId; 8] {
    #[cfg(feature = "tracing")]
    tracing::trace!(
      depth = node.depth(),
      center = ?node.center(),
      entries = displaced.len() + 1,
      "octree subdivide"
    );

    let children: [NodeId; 8] = {
      let mut nodes = self.nodes.write();
      let base = nodes.len();
      nodes.extend((0..8u8).map(|octant| Arc::new(node.child(octant))));
      std::array::from_fn(|i| NodeId::from_index(base + i))
    };

    for entry in displaced.into_iter().chain(std::iter::once(entry)) {
      let octant = node.octant_of(entry.position);
      self.insert_at(children[octant as usize], entry);
    }

    children
  }
}

impl<T: Send + Sync> OctreeIndex<T> {
  /// Insert many entries in parallel on rayon's thread pool.
  ///
  /// Equivalent to calling [`Self::add`] for each item; the resulting tree
  /// shape may differ from sequential insertion only in entry order within
  /// a leaf.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "octree::add_batch"))]
  pub fn add_batch<I>(&self, items: I)
  where
    I: IntoParallelIterator<Item = (DVec3, T)>,
  {
    items
      .into_par_iter()
      .for_each(|(position, payload)| self.add(position, payload));
  }
}

/// One node reached by [`OctreeIndex::walk`].
pub(crate) struct NodeVisit<T> {
  pub node: Arc<Node<T>>,
  /// Entry count if the node was a leaf when visited.
  pub leaf_len: Option<usize>,
}

/// Build an empty tree rooted at `center` with edge `size`.
///
/// Fails fast on `capacity < 1` or a non-positive size.
pub fn create_root<T>(center: DVec3, size: f64, capacity: usize) -> Result<OctreeIndex<T>, ConfigError> {
  OctreeIndex::new(center, size, capacity)
}

#[cfg(test)]
#[path = "index_test.rs"]
mod index_test;
