//! Axis-aligned bounding box with double precision, plus the cube helpers the
//! octree needs (octant split, segment intersection, edge list).

use glam::DVec3;

/// Double-precision axis-aligned bounding box.
///
/// Every octree node owns one of these as its cached region. Both corners are
/// inclusive, so neighbouring octants share their common face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DAabb3 {
	/// Minimum corner (inclusive).
	pub min: DVec3,
	/// Maximum corner (inclusive).
	pub max: DVec3,
}

impl DAabb3 {
	/// Create a new AABB from center and half-extents.
	pub fn from_center_half_extents(center: DVec3, half_extents: DVec3) -> Self {
		Self {
			min: center - half_extents,
			max: center + half_extents,
		}
	}

	/// Create a cube of edge length `size` centered on `center`.
	pub fn cube(center: DVec3, size: f64) -> Self {
		Self::from_center_half_extents(center, DVec3::splat(size * 0.5))
	}

	/// Check if this AABB contains a point (closed on both ends).
	#[inline]
	pub fn contains_point(&self, point: DVec3) -> bool {
		point.x >= self.min.x
			&& point.x <= self.max.x
			&& point.y >= self.min.y
			&& point.y <= self.max.y
			&& point.z >= self.min.z
			&& point.z <= self.max.z
	}

	/// Get the size of the AABB (max - min).
	#[inline]
	pub fn size(&self) -> DVec3 {
		self.max - self.min
	}

	/// Get the center of the AABB.
	#[inline]
	pub fn center(&self) -> DVec3 {
		(self.min + self.max) * 0.5
	}

	/// Octant index of `point` relative to this box's center. See [`octant_index`].
	#[inline]
	pub fn octant_of(&self, point: DVec3) -> u8 {
		octant_index(self.center(), point)
	}

	/// Sub-box covering `octant` (0-7), using the same bit layout as
	/// [`octant_index`].
	pub fn octant(&self, octant: u8) -> Self {
		let quarter = self.size() * 0.25;
		Self::from_center_half_extents(self.center() + octant_direction(octant) * quarter, quarter)
	}

	/// Test whether the closed segment `start..=end` touches this box.
	///
	/// Slab test clipped to the segment's parameter range `[0, 1]`. Axes the
	/// segment does not move along only need the origin inside that slab.
	pub fn intersects_segment(&self, start: DVec3, end: DVec3) -> bool {
		let dir = end - start;
		let mut t_near = 0.0f64;
		let mut t_far = 1.0f64;

		for axis in 0..3 {
			let origin = start[axis];
			let d = dir[axis];
			let slab_min = self.min[axis];
			let slab_max = self.max[axis];

			if d == 0.0 {
				if origin < slab_min || origin > slab_max {
					return false;
				}
				continue;
			}

			let inv = 1.0 / d;
			let mut t0 = (slab_min - origin) * inv;
			let mut t1 = (slab_max - origin) * inv;
			if t0 > t1 {
				std::mem::swap(&mut t0, &mut t1);
			}
			t_near = t_near.max(t0);
			t_far = t_far.min(t1);
			if t_far < t_near {
				return false;
			}
		}
		true
	}

	/// The eight corners, indexed with the octant bit layout.
	pub fn corners(&self) -> [DVec3; 8] {
		std::array::from_fn(|i| {
			DVec3::new(
				if i & 4 == 0 { self.min.x } else { self.max.x },
				if i & 2 == 0 { self.min.y } else { self.max.y },
				if i & 1 == 0 { self.min.z } else { self.max.z },
			)
		})
	}

	/// The twelve edges as pairs of corner points.
	pub fn edges(&self) -> [(DVec3, DVec3); 12] {
		let c = self.corners();
		// Corner pairs differing in exactly one bit.
		const PAIRS: [(usize, usize); 12] = [
			(0, 4),
			(1, 5),
			(2, 6),
			(3, 7),
			(0, 2),
			(1, 3),
			(4, 6),
			(5, 7),
			(0, 1),
			(2, 3),
			(4, 5),
			(6, 7),
		];
		PAIRS.map(|(a, b)| (c[a], c[b]))
	}

	/// Edge endpoints flattened into a line-list vertex buffer (24 vertices).
	pub fn line_vertices(&self) -> [DVec3; 24] {
		let edges = self.edges();
		std::array::from_fn(|i| {
			let (a, b) = edges[i / 2];
			if i % 2 == 0 {
				a
			} else {
				b
			}
		})
	}
}

/// Octant index of `point` relative to `center`.
///
/// `x_bit * 4 + y_bit * 2 + z_bit`, where a bit is 1 when the coordinate is
/// `>=` the center on that axis. Index 0 is the all-low octant, 7 the
/// all-high one. Points outside any particular box still get a deterministic
/// index.
#[inline]
pub fn octant_index(center: DVec3, point: DVec3) -> u8 {
	let x_bit = (point.x >= center.x) as u8;
	let y_bit = (point.y >= center.y) as u8;
	let z_bit = (point.z >= center.z) as u8;
	(x_bit << 2) | (y_bit << 1) | z_bit
}

/// Unit step (-1 or +1 per axis) from a center towards `octant`.
#[inline]
pub fn octant_direction(octant: u8) -> DVec3 {
	debug_assert!(octant < 8, "octant must be in 0..8");
	let sign = |bit: u8| if (octant >> bit) & 1 == 0 { -1.0 } else { 1.0 };
	DVec3::new(sign(2), sign(1), sign(0))
}
