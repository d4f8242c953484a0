#![cfg(not(miri))]

#[macro_use]
extern crate quickcheck;

use bitprobe::HashMap as ProbeMap;
use bitprobe::{Bitset, Status};

use quickcheck::Arbitrary;
use quickcheck::Gen;

use fnv::FnvHasher;
use std::hash::{BuildHasher, BuildHasherDefault};
type FnvBuilder = BuildHasherDefault<FnvHasher>;
type ProbeMapFnv<K, V> = ProbeMap<K, V, FnvBuilder>;

use std::cmp::min;
use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;
use std::iter::FromIterator;
use std::ops::Deref;

fn set<'a, T: 'a, I>(iter: I) -> HashSet<T>
where
    I: IntoIterator<Item = &'a T>,
    T: Copy + Hash + Eq,
{
    iter.into_iter().cloned().collect()
}

quickcheck! {
    fn contains(insert: Vec<u32>) -> bool {
        let mut map = ProbeMap::new();
        for &key in &insert {
            map.insert(key, ());
        }
        insert.iter().all(|&key| map.get(&key).is_some())
    }

    fn contains_not(insert: Vec<u8>, not: Vec<u8>) -> bool {
        let mut map = ProbeMap::new();
        for &key in &insert {
            map.insert(key, ());
        }
        let nots = &set(&not) - &set(&insert);
        nots.iter().all(|&key| map.get(&key).is_none() && map.status() == Status::NotFound)
    }

    fn insert_remove(insert: Vec<u8>, remove: Vec<u8>) -> bool {
        let mut map = ProbeMap::new();
        for &key in &insert {
            map.insert(key, ());
        }
        for &key in &remove {
            map.remove(&key);
        }
        let elements = &set(&insert) - &set(&remove);
        map.len() == elements.len() && map.iter().count() == elements.len() &&
            elements.iter().all(|k| map.get(k).is_some())
    }

    fn insert_retain(insert: Vec<u8>, retain: Vec<u8>) -> bool {
        let mut map = ProbeMap::new();
        for &key in &insert {
            map.insert(key, ());
        }
        let retain = set(&retain);
        map.retain(|k, _| retain.contains(k));
        let elements = &set(&insert) & &retain;
        map.len() == elements.len() && map.iter().count() == elements.len() &&
            elements.iter().all(|k| map.get(k).is_some())
    }

    fn with_cap(cap: u16) -> bool {
        let map: ProbeMap<u8, u8> = ProbeMap::with_capacity(cap as usize);
        map.capacity() == cap as usize
    }

    fn never_over_capacity(insert: Vec<u16>, remove: Vec<u16>) -> bool {
        let mut map = ProbeMap::with_capacity(1);
        for (&a, &r) in insert.iter().zip(remove.iter().chain(std::iter::repeat(&0))) {
            map.insert(a, a);
            map.remove(&r);
            if map.len() > map.capacity() {
                return false;
            }
        }
        true
    }

    fn bitset_matches_reference(max: u16, ops: Vec<(bool, u16)>) -> bool {
        let max = max as usize + 1;
        let mut bits = Bitset::new(max).unwrap();
        let mut reference = HashSet::new();
        for (add, key) in ops {
            let key = key as usize % max;
            if add {
                bits.add(key);
                reference.insert(key);
            } else {
                bits.remove(key);
                reference.remove(&key);
            }
        }
        bits.count_ones() == reference.len() && (0..max).all(|k| bits.contains(k) == reference.contains(&k))
    }
}

use Op::*;
#[derive(Copy, Clone, Debug)]
enum Op<K, V> {
    Add(K, V),
    Remove(K),
    ShrinkToFit,
    ReplaceWithClone,
    Reserve(u16),
    Resize(u16),
    Drain,
}

impl<K, V> Arbitrary for Op<K, V>
where
    K: Arbitrary,
    V: Arbitrary,
{
    fn arbitrary(g: &mut Gen) -> Self {
        match u32::arbitrary(g) % 16 {
            0..=5 => Add(K::arbitrary(g), V::arbitrary(g)),
            6..=10 => Remove(K::arbitrary(g)),
            11 => ShrinkToFit,
            12 => ReplaceWithClone,
            13 => Reserve(u16::arbitrary(g) % 1024),
            14 => Resize(u16::arbitrary(g) % 1024),
            _ => Drain,
        }
    }
}

fn do_ops<K, V, S>(ops: &[Op<K, V>], a: &mut ProbeMap<K, V, S>, b: &mut HashMap<K, V>)
where
    K: Hash + Eq + Clone,
    V: Clone + PartialEq + Debug,
    S: BuildHasher + Clone,
{
    for op in ops {
        match *op {
            Add(ref k, ref v) => {
                assert_eq!(a.insert(k.clone(), v.clone()), b.insert(k.clone(), v.clone()));
            }
            Remove(ref k) => {
                assert_eq!(a.remove(k), b.remove(k));
            }
            ShrinkToFit => {
                a.shrink_to_fit();
                b.shrink_to_fit();
                assert_eq!(a.capacity(), b.len());
            }
            ReplaceWithClone => {
                *a = a.clone();
                *b = b.clone();
            }
            Reserve(n) => {
                a.reserve(n as usize);
                b.reserve(n as usize);
                assert!(a.capacity() >= a.len() + n as usize);
            }
            Resize(n) => {
                let n = n as usize;
                let allowed = n != 0 && n >= a.len();
                assert_eq!(a.resize(n).is_ok(), allowed);
                if allowed {
                    assert_eq!(a.capacity(), n);
                } else {
                    assert_eq!(a.status(), Status::InvalidRequest);
                }
            }
            Drain => {
                assert_eq!(a.drain().count(), b.len());
                b.clear();
            }
        }
        assert!(a.len() <= a.capacity());
    }
}

fn assert_maps_equivalent<K, V, S>(a: &ProbeMap<K, V, S>, b: &HashMap<K, V>) -> bool
where
    K: Hash + Eq + Debug,
    V: Eq + Debug,
    S: BuildHasher,
{
    assert_eq!(a.len(), b.len());
    assert_eq!(a.iter().next().is_some(), b.iter().next().is_some());
    for key in a.keys() {
        assert!(b.contains_key(key), "b does not contain {:?}", key);
    }
    for key in b.keys() {
        assert!(a.get(key).is_some(), "a does not contain {:?}", key);
    }
    for key in a.keys() {
        assert_eq!(a[key], b[key]);
    }
    true
}

quickcheck! {
    fn operations_i8(ops: Large<Vec<Op<i8, i8>>>) -> bool {
        let mut map = ProbeMap::new();
        let mut reference = HashMap::new();
        do_ops(&ops, &mut map, &mut reference);
        assert_maps_equivalent(&map, &reference)
    }

    fn operations_fnv(ops: Large<Vec<Op<u16, i8>>>) -> bool {
        let mut map = ProbeMapFnv::default();
        let mut reference = HashMap::new();
        do_ops(&ops, &mut map, &mut reference);
        assert_maps_equivalent(&map, &reference)
    }

    fn operations_string(ops: Vec<Op<Alpha, i8>>) -> bool {
        let mut map = ProbeMap::new();
        let mut reference = HashMap::new();
        do_ops(&ops, &mut map, &mut reference);
        assert_maps_equivalent(&map, &reference)
    }

    fn keys_values(ops: Large<Vec<Op<i8, i8>>>) -> bool {
        let mut map = ProbeMap::new();
        let mut reference = HashMap::new();
        do_ops(&ops, &mut map, &mut reference);
        let mut visit = ProbeMap::new();
        for (k, v) in map.keys().zip(map.values()) {
            assert_eq!(&map[k], v);
            assert!(!visit.contains_key(k));
            visit.insert(*k, *v);
        }
        assert_eq!(visit.len(), reference.len());
        true
    }

    fn keys_values_mut(ops: Large<Vec<Op<i8, i8>>>) -> bool {
        let mut map = ProbeMap::new();
        let mut reference = HashMap::new();
        do_ops(&ops, &mut map, &mut reference);
        let mut visit = ProbeMap::new();
        let keys = Vec::from_iter(map.keys().cloned());
        for (k, v) in keys.iter().zip(map.values_mut()) {
            assert_eq!(&reference[k], v);
            assert!(!visit.contains_key(k));
            visit.insert(*k, *v);
        }
        assert_eq!(visit.len(), reference.len());
        true
    }

    fn equality(ops1: Vec<Op<i8, i8>>, removes: Vec<usize>) -> bool {
        let mut map = ProbeMap::new();
        let mut reference = HashMap::new();
        do_ops(&ops1, &mut map, &mut reference);
        let mut ops2 = ops1.clone();
        for &r in &removes {
            if !ops2.is_empty() {
                let i = r % ops2.len();
                ops2.remove(i);
            }
        }
        let mut map2 = ProbeMapFnv::default();
        let mut reference2 = HashMap::new();
        do_ops(&ops2, &mut map2, &mut reference2);
        let should = reference == reference2;
        assert_eq!(map.len() == map2.len() && map.iter().all(|(k, v)| {
            map2.get(k).map_or(false, |v2| v2 == v)
        }), should);
        true
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
struct Alpha(String);

impl Deref for Alpha {
    type Target = String;
    fn deref(&self) -> &String {
        &self.0
    }
}

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

impl Arbitrary for Alpha {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = u32::arbitrary(g) as usize % (g.size() + 1);
        let len = min(len, 16);
        Alpha(
            (0..len)
                .map(|_| *g.choose(ALPHABET).unwrap() as char)
                .collect(),
        )
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new((**self).shrink().map(Alpha))
    }
}

/// quickcheck Arbitrary adaptor -- make a larger vec
#[derive(Clone, Debug)]
struct Large<T>(T);

impl<T> Deref for Large<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> Arbitrary for Large<Vec<T>>
where
    T: Arbitrary,
{
    fn arbitrary(g: &mut Gen) -> Self {
        let len = u32::arbitrary(g) as usize % (g.size() * 10 + 1);
        Large((0..len).map(|_| T::arbitrary(g)).collect())
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new((**self).shrink().map(Large))
    }
}
