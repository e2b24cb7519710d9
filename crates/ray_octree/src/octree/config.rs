//! OctreeConfig - root region, leaf capacity and depth cap.

use glam::DVec3;

use crate::error::ConfigError;

/// Default maximum subdivision depth below the root.
///
/// At 32 levels a 1 km root reaches sub-nanometre cells, well past the point
/// where distinct f64 positions stop separating.
pub const DEFAULT_MAX_DEPTH: u32 = 32;

/// Default number of entries a leaf holds before it subdivides.
pub const DEFAULT_CAPACITY: usize = 8;

/// Configuration shared by every node of one tree.
#[derive(Clone, Debug, PartialEq)]
pub struct OctreeConfig {
  /// Center of the root cube.
  pub center: DVec3,

  /// Edge length of the root cube.
  pub size: f64,

  /// Maximum entries a leaf holds before it must subdivide.
  pub capacity: usize,

  /// Deepest level at which nodes may still be created (root = 0).
  /// Leaves at this depth keep accepting entries past `capacity`.
  pub max_depth: u32,
}

impl OctreeConfig {
  /// Config for a root cube with the default depth cap.
  pub fn new(center: DVec3, size: f64, capacity: usize) -> Self {
    Self {
      center,
      size,
      capacity,
      max_depth: DEFAULT_MAX_DEPTH,
    }
  }

  /// Replace the depth cap.
  pub fn with_max_depth(mut self, max_depth: u32) -> Self {
    self.max_depth = max_depth;
    self
  }

  /// Reject configs that would produce an unusable tree.
  ///
  /// `capacity == 0` would subdivide on the very first insert, and a zero or
  /// negative size gives every node the same degenerate region.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.capacity < 1 {
      return Err(ConfigError::ZeroCapacity);
    }
    if !self.size.is_finite() || self.size <= 0.0 {
      return Err(ConfigError::InvalidSize(self.size));
    }
    if !self.center.is_finite() {
      return Err(ConfigError::NonFiniteCenter(self.center));
    }
    Ok(())
  }
}

impl Default for OctreeConfig {
  fn default() -> Self {
    Self {
      center: DVec3::ZERO,
      size: 1024.0,
      capacity: DEFAULT_CAPACITY,
      max_depth: DEFAULT_MAX_DEPTH,
    }
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
