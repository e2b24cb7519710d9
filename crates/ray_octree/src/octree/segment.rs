//! RaySegment - the query shape for proximity lookups.

use glam::DVec3;

use super::DAabb3;

/// A finite segment used to query the octree.
///
/// Traversal uses the finite segment (which leaf boxes it touches), while
/// the distance filter uses the infinite line through both endpoints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaySegment {
  /// First endpoint.
  pub start: DVec3,
  /// Second endpoint.
  pub end: DVec3,
  /// `normalize(start - end)`, or zero for a degenerate segment.
  dir: DVec3,
}

impl RaySegment {
  /// Create a segment between two points.
  pub fn new(start: DVec3, end: DVec3) -> Self {
    Self {
      start,
      end,
      dir: (start - end).normalize_or_zero(),
    }
  }

  /// Unit direction of the supporting line, pointing from `end` to `start`.
  ///
  /// Zero when `start == end`.
  #[inline]
  pub fn direction(&self) -> DVec3 {
    self.dir
  }

  /// Whether the segment has zero length.
  #[inline]
  pub fn is_degenerate(&self) -> bool {
    self.dir == DVec3::ZERO
  }

  /// Closest point to `point` on the infinite line through the segment.
  ///
  /// A degenerate segment has no line, so this collapses to `start`.
  #[inline]
  pub fn closest_point_on_line(&self, point: DVec3) -> DVec3 {
    let d = (point - self.start).dot(self.dir);
    self.start + self.dir * d
  }

  /// Perpendicular distance from `point` to the infinite line.
  ///
  /// Points past either endpoint are measured against the extended line,
  /// not against the nearest endpoint.
  #[inline]
  pub fn distance_to_line(&self, point: DVec3) -> f64 {
    point.distance(self.closest_point_on_line(point))
  }

  /// Whether the finite segment touches `bounds`.
  #[inline]
  pub fn intersects(&self, bounds: &DAabb3) -> bool {
    bounds.intersects_segment(self.start, self.end)
  }
}
