use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use super::*;

// =========================================================================
// OctreeIndex: construction, insertion, subdivision
// =========================================================================

fn index(capacity: usize) -> OctreeIndex<u32> {
  OctreeIndex::new(DVec3::ZERO, 64.0, capacity).expect("valid config")
}

/// Corner-ish points that land in distinct octants of the root.
fn separated_points() -> Vec<DVec3> {
  (0..8u8)
    .map(|octant| crate::octree::bounds::octant_direction(octant) * 16.0)
    .collect()
}

/// All payloads stored anywhere in the tree.
fn stored_payloads(index: &OctreeIndex<u32>) -> Vec<u32> {
  let mut payloads: Vec<u32> = index
    .walk()
    .flat_map(|visit| visit.node.entries())
    .map(|entry| entry.payload)
    .collect();
  payloads.sort_unstable();
  payloads
}

#[test]
fn test_create_root_validates_config() {
  assert_eq!(
    create_root::<u32>(DVec3::ZERO, 10.0, 0).err(),
    Some(ConfigError::ZeroCapacity)
  );
  assert_eq!(
    create_root::<u32>(DVec3::ZERO, 0.0, 4).err(),
    Some(ConfigError::InvalidSize(0.0))
  );
  assert_eq!(
    create_root::<u32>(DVec3::ZERO, -5.0, 4).err(),
    Some(ConfigError::InvalidSize(-5.0))
  );

  let root = create_root::<u32>(DVec3::new(1.0, 2.0, 3.0), 10.0, 4).expect("valid config");
  assert!(root.is_empty());
  assert_eq!(root.node_count(), 1);
  assert_eq!(root.root().center(), DVec3::new(1.0, 2.0, 3.0));
  assert_eq!(root.root().size(), 10.0);
  assert_eq!(root.config().capacity, 4);
}

/// Center is inside; anything past half_size on an axis is outside.
#[test]
fn test_is_inside_root() {
  let index = index(4);
  assert!(index.is_inside(DVec3::ZERO));
  for axis in [DVec3::X, DVec3::Y, DVec3::Z] {
    assert!(index.is_inside(axis * 32.0));
    assert!(!index.is_inside(axis * (32.0 + 1e-9)));
    assert!(!index.is_inside(-axis * (32.0 + 1e-9)));
  }
}

#[test]
fn test_octant_of_root() {
  let index = index(4);
  assert_eq!(index.octant_of(DVec3::splat(-1.0)), 0);
  assert_eq!(index.octant_of(DVec3::ZERO), 7);
  assert_eq!(index.octant_of(DVec3::new(1.0, -1.0, -1.0)), 4);
}

/// Exactly `capacity` points keep the root a leaf.
#[test]
fn test_fill_to_capacity_stays_leaf() {
  let index = index(4);
  for (i, point) in separated_points().into_iter().take(4).enumerate() {
    index.add(point, i as u32);
  }

  let root = index.root();
  assert!(root.is_leaf());
  assert_eq!(root.count(), 4);
  assert_eq!(index.len(), 4);
  assert_eq!(index.node_count(), 1);
}

/// The capacity+1-th point splits the root; every point ends up in exactly
/// one child and the root holds nothing.
#[test]
fn test_overflow_subdivides() {
  let index = index(4);
  let points = separated_points();
  for (i, point) in points.iter().take(5).enumerate() {
    index.add(*point, i as u32);
  }

  let root = index.root();
  assert!(!root.is_leaf());
  assert_eq!(root.count(), 0);
  assert!(root.entries().is_empty());
  assert_eq!(index.node_count(), 9);

  let children = root.children().expect("root has children");
  for (i, point) in points.iter().take(5).enumerate() {
    let holders: Vec<u8> = (0..8u8)
      .filter(|&octant| {
        let child = index.node(children[octant as usize]).expect("child exists");
        child.entries().iter().any(|entry| entry.payload == i as u32)
      })
      .collect();
    assert_eq!(holders, vec![root.octant_of(*point)], "point {} placement", i);
  }
}

/// Children cover the parent's octants at half size, one level deeper.
#[test]
fn test_children_regions() {
  let index = index(1);
  index.add(DVec3::splat(5.0), 0);
  index.add(DVec3::splat(-5.0), 1);

  let root = index.root();
  let children = root.children().expect("root split");
  for (octant, id) in children.iter().enumerate() {
    let child = index.node(*id).expect("child exists");
    assert_eq!(child.size(), 32.0);
    assert_eq!(child.depth(), 1);
    assert_eq!(*child.bounds(), root.bounds().octant(octant as u8));
    assert!(child.is_leaf());
  }
}

/// Entries always sit inside the cube of the leaf holding them.
#[test]
fn test_entries_within_leaf_bounds() {
  let index = index(2);
  for i in 0..500u32 {
    let t = i as f64;
    index.add(
      DVec3::new((t * 1.3).sin() * 31.0, (t * 0.7).cos() * 31.0, (t * 2.1).sin() * 31.0),
      i,
    );
  }

  for node in index.walk().map(|visit| visit.node) {
    for entry in node.entries() {
      assert!(
        node.is_inside(entry.position),
        "{:?} outside leaf {:?}",
        entry.position,
        node.bounds()
      );
    }
    if !node.is_leaf() {
      assert_eq!(node.count(), 0, "internal node holds entries");
    }
    assert!(node.count() <= 2, "leaf above capacity");
  }
  assert_eq!(stored_payloads(&index), (0..500).collect::<Vec<_>>());
}

/// Duplicate positions split until the depth cap, then pile up there.
#[test]
fn test_duplicates_stop_at_depth_cap() {
  let config = OctreeConfig::new(DVec3::ZERO, 64.0, 2).with_max_depth(4);
  let index = OctreeIndex::with_config(config).expect("valid config");
  for i in 0..10u32 {
    index.add(DVec3::splat(3.0), i);
  }

  let stats = index.stats();
  assert_eq!(stats.max_depth, 4);
  assert_eq!(stats.entries, 10);
  assert_eq!(stats.overfull_leaves, 1);
  assert_eq!(index.node_count(), 1 + 8 * 4);

  let hits = index.get_ray_hits(DVec3::new(0.0, 3.0, 3.0), DVec3::new(6.0, 3.0, 3.0), 0.0, 0.0);
  assert_eq!(hits.len(), 10);
}

/// A small cluster that needs several levels to separate splits in one
/// insert call.
#[test]
fn test_nested_subdivision() {
  let index = index(1);
  index.add(DVec3::new(1.0, 1.0, 1.0), 0);
  index.add(DVec3::new(1.5, 1.0, 1.0), 1);

  let stats = index.stats();
  assert!(stats.max_depth >= 5, "cluster should force deep split");
  assert_eq!(stats.occupied_leaves, 2);
  assert_eq!(stored_payloads(&index), vec![0, 1]);
}

/// Out-of-region points still route deterministically and stay findable.
#[test]
fn test_insert_outside_root_region() {
  let index = index(4);
  let outside = DVec3::new(100.0, 0.0, 0.0);
  index.add(outside, 42);

  assert!(!index.is_inside(outside));
  assert_eq!(index.len(), 1);
  assert_eq!(index.root().entries()[0].position, outside);
}

#[test]
fn test_node_lookup_out_of_range() {
  let index = index(4);
  assert!(index.node(NodeId::ROOT).is_some());
  assert!(index.node(NodeId::from_index(1)).is_none());
}

#[test]
fn test_add_batch_matches_sequential() {
  let points: Vec<(DVec3, u32)> = (0..1000u32)
    .map(|i| {
      let t = i as f64;
      (DVec3::new((t * 0.9).sin() * 30.0, (t * 0.4).cos() * 30.0, (t * 0.05) - 25.0), i)
    })
    .collect();

  let index = index(4);
  index.add_batch(points.clone());

  assert_eq!(index.len(), points.len());
  assert_eq!(stored_payloads(&index), (0..1000).collect::<Vec<_>>());
}

// =========================================================================
// Concurrency
// =========================================================================

/// Many threads inserting into one tree: nothing lost, nothing duplicated,
/// no leaf pushed past capacity.
#[test]
fn test_concurrent_inserts_keep_every_entry() {
  const THREADS: u32 = 8;
  const PER_THREAD: u32 = 500;
  const CAPACITY: usize = 3;

  let index = Arc::new(OctreeIndex::new(DVec3::ZERO, 1024.0, CAPACITY).expect("valid config"));

  let handles: Vec<_> = (0..THREADS)
    .map(|thread_id| {
      let index = Arc::clone(&index);
      thread::spawn(move || {
        for i in 0..PER_THREAD {
          let id = thread_id * PER_THREAD + i;
          // Distinct lattice point per id.
          let position = DVec3::new(
            (id % 16) as f64 * 30.0 - 240.0,
            ((id / 16) % 16) as f64 * 30.0 - 240.0,
            (id / 256) as f64 * 30.0 - 240.0,
          );
          index.add(position, id);
        }
      })
    })
    .collect();
  for handle in handles {
    handle.join().expect("insert thread panicked");
  }

  let total = (THREADS * PER_THREAD) as usize;
  assert_eq!(index.len(), total);

  let payloads = stored_payloads(&index);
  assert_eq!(payloads.len(), total, "entries lost or duplicated");
  let unique: HashSet<u32> = payloads.iter().copied().collect();
  assert_eq!(unique.len(), total);

  let stats = index.stats();
  assert_eq!(stats.entries, total);
  assert_eq!(stats.overfull_leaves, 0);
  for node in index.walk().map(|visit| visit.node) {
    assert!(node.count() <= CAPACITY);
  }
}

/// Queries running during inserts only ever see whole entries, and after
/// the writers finish every entry is visible.
#[test]
fn test_queries_during_inserts() {
  const POINTS: u32 = 2000;

  let index = Arc::new(OctreeIndex::new(DVec3::ZERO, 256.0, 2).expect("valid config"));

  thread::scope(|scope| {
    for half in 0..2u32 {
      let index = Arc::clone(&index);
      scope.spawn(move || {
        for i in (half..POINTS).step_by(2) {
          // Every point on the line y = z = 1, at exactly representable x.
          index.add(DVec3::new(i as f64 * 0.0625 - 62.5, 1.0, 1.0), i);
        }
      });
    }

    let reader = Arc::clone(&index);
    scope.spawn(move || {
      let mut last = 0;
      for _ in 0..200 {
        let hits = reader.get_ray_hits(DVec3::new(-70.0, 1.0, 1.0), DVec3::new(70.0, 1.0, 1.0), 0.0, 0.0);
        let unique: HashSet<u32> = hits.iter().map(|hit| hit.payload).collect();
        assert_eq!(unique.len(), hits.len(), "query saw an entry twice");
        assert!(hits.len() >= last, "entries disappeared between queries");
        last = hits.len();
      }
    });
  });

  let hits = index.get_ray_hits(DVec3::new(-70.0, 1.0, 1.0), DVec3::new(70.0, 1.0, 1.0), 0.0, 0.0);
  assert_eq!(hits.len(), POINTS as usize);
}

#[test]
fn test_index_is_send_and_sync() {
  fn assert_send_sync<S: Send + Sync>() {}
  assert_send_sync::<OctreeIndex<u32>>();
  assert_send_sync::<OctreeIndex<String>>();
}
