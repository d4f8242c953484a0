//! Growth policies for the hash containers.

/// Decides when a table has become crowded enough that it should grow.
///
/// The table consults its policy after every insertion of a new key. Growth happens regardless
/// of the policy once `entries` would exceed `capacity`, so a policy can only make a table grow
/// *earlier*.
///
/// Plain functions and closures of the right shape are policies too:
///
/// ```
/// use bitprobe::{DefaultHashBuilder, HashMap};
///
/// // Never grow until the table is completely full.
/// let mut map = HashMap::with_capacity_hasher_and_load(
///     4,
///     DefaultHashBuilder::default(),
///     |_entries: usize, _capacity: usize| false,
/// );
/// for i in 0..4 {
///     map.insert(i, i);
/// }
/// assert_eq!(map.capacity(), 4);
/// ```
pub trait LoadPolicy {
    /// Returns `true` if a table holding `entries` items in `capacity` slots should grow.
    fn should_grow(&self, entries: usize, capacity: usize) -> bool;
}

/// Grows once more than three quarters of the slots are occupied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefaultLoad;

impl LoadPolicy for DefaultLoad {
    #[inline]
    fn should_grow(&self, entries: usize, capacity: usize) -> bool {
        // entries / capacity > 3 / 4, without the float.
        entries.saturating_mul(4) > capacity.saturating_mul(3)
    }
}

/// Grows once the fraction of occupied slots exceeds the given factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoadFactor(pub f32);

impl LoadPolicy for LoadFactor {
    #[inline]
    fn should_grow(&self, entries: usize, capacity: usize) -> bool {
        capacity == 0 || entries as f32 / capacity as f32 > self.0
    }
}

impl<F> LoadPolicy for F
where
    F: Fn(usize, usize) -> bool,
{
    #[inline]
    fn should_grow(&self, entries: usize, capacity: usize) -> bool {
        self(entries, capacity)
    }
}
