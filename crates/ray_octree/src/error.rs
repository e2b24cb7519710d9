//! Errors raised when building an octree from an invalid configuration.

use glam::DVec3;
use thiserror::Error;

/// Rejected [`OctreeConfig`](crate::octree::OctreeConfig).
///
/// Trees are only ever built from a validated config; once built, `add` and
/// the queries are total and never fail.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
  /// A leaf must be able to hold at least one entry before subdividing.
  #[error("leaf capacity must be at least 1")]
  ZeroCapacity,

  /// Root edge length must be finite and strictly positive.
  #[error("root size must be finite and > 0, got {0}")]
  InvalidSize(f64),

  /// Root center must have finite coordinates.
  #[error("root center must be finite, got {0}")]
  NonFiniteCenter(DVec3),
}
