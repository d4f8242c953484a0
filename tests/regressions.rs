use bitprobe::{HashMap, HashSet, Status};
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn reserve_shrink_add() {
    let mut map = HashMap::new();
    map.reserve(18303);
    map.shrink_to_fit();
    map.insert(-94i8, -96i8);
    assert_eq!(map.get(&-94), Some(&-96));
}

#[test]
fn shrink_then_grow_from_nothing() {
    let mut set = HashSet::with_capacity(7);
    set.shrink_to_fit();
    assert_eq!(set.capacity(), 0);
    assert!(set.insert(0u8));
    assert!(set.contains(&0));
}

#[test]
fn lookup_past_removed_slot() {
    // Removals leave gaps in probe runs that later keys must be found across.
    let mut map = HashMap::with_capacity(64);
    for i in 0..40u32 {
        map.insert(i, i);
    }
    for i in (0..40u32).step_by(2) {
        assert_eq!(map.remove(&i), Some(i));
    }
    for i in (1..40u32).step_by(2) {
        assert_eq!(map.get(&i), Some(&i));
    }
    assert_eq!(map.len(), 20);
}

#[test]
fn zero_keys_and_values() {
    let mut map = HashMap::new();
    map.insert(0u64, 0u64);
    map.insert(1, 0);
    assert_eq!(map.get(&0), Some(&0));
    assert_eq!(map.status(), Status::Success);
    assert_eq!(map.len(), 2);
    assert_eq!(map.remove(&0), Some(0));
    assert_eq!(map.get(&0), None);
}

static COMPARISONS: AtomicUsize = AtomicUsize::new(0);

struct Counted(u32);

impl PartialEq for Counted {
    fn eq(&self, other: &Self) -> bool {
        COMPARISONS.fetch_add(1, Ordering::Relaxed);
        self.0 == other.0
    }
}

impl Eq for Counted {}

impl Hash for Counted {
    fn hash<H: Hasher>(&self, h: &mut H) {
        self.0.hash(h);
    }
}

#[test]
fn insert_after_remove_stays_local() {
    let mut map = HashMap::with_capacity(1 << 16);
    for i in 0..20_000 {
        map.insert(Counted(i), ());
    }
    map.remove(&Counted(7));

    COMPARISONS.store(0, Ordering::Relaxed);
    assert_eq!(map.insert(Counted(1_000_000), ()), None);
    assert!(map.get(&Counted(2_000_000)).is_none());
    assert!(COMPARISONS.load(Ordering::Relaxed) < 100);
    assert_eq!(map.capacity(), 1 << 16);
}
