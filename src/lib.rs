//! Type-erased building blocks and an open-addressing hash map built from them.
//!
//! The crate is layered. At the bottom is [`DynaBuf`], a zero-initialized allocation of
//! `capacity` equally sized units that knows nothing about what it stores. On top of it sit
//! [`Bitset`], a bit vector, and [`Array`], an unordered growable array. Finally [`HashMap`] and
//! [`HashSet`] store their entries in a `DynaBuf` and track which slots are in use with a
//! `Bitset`.
//!
//! The hash map is deliberately simple:
//!
//!  - Collisions are resolved by linear probing: a key lives in the first free slot at or after
//!    `hash % capacity`, wrapping around at the end of the table.
//!  - There are no tombstones. Whether a slot is occupied is recorded only in the bitmap, so a
//!    slot whose key and value are all zero bytes is still a perfectly good entry.
//!  - When the table is full, or when its [`LoadPolicy`] says it is too crowded, it is rebuilt
//!    with `2 * capacity + 1` slots, rehashing every entry.
//!  - Every lookup and mutation records a [`Status`] that can be read back afterwards, in
//!    addition to the usual `Option` and `Result` returns.
//!
//! ```
//! use bitprobe::HashMap;
//!
//! let mut scores = HashMap::new();
//! scores.insert("alpha", 10);
//! scores.insert("beta", 3);
//! assert_eq!(scores.insert("alpha", 11), Some(10));
//! assert_eq!(scores.len(), 2);
//! assert_eq!(scores["alpha"], 11);
//! ```
//!
//! The crate is `no_std` but requires `alloc`. Diagnostics go through the [`log`] facade; no
//! logger is installed by the crate itself.
//!
//! [`log`]: https://docs.rs/log

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(test)]
#[macro_use]
extern crate std;

extern crate alloc;

mod array;
mod bitset;
mod dynabuf;
mod error;
mod external_trait_impls;
mod load;
mod map;
pub mod raw;
mod set;

pub mod hash_map {
    //! A hash map implemented with linear probing over an occupancy bitmap.
    pub use crate::map::*;

    #[cfg(feature = "rayon")]
    /// [rayon]-based parallel iterator types for hash maps.
    /// You will rarely need to interact with it directly unless you have need
    /// to name one of the iterator types.
    ///
    /// [rayon]: https://docs.rs/rayon/1.0/rayon
    pub mod rayon {
        pub use crate::external_trait_impls::rayon::map::*;
    }
}

pub mod hash_set {
    //! A hash set implemented as a `HashMap` where the value is `()`.
    pub use crate::set::*;

    #[cfg(feature = "rayon")]
    /// [rayon]-based parallel collection for hash sets.
    ///
    /// [rayon]: https://docs.rs/rayon/1.0/rayon
    pub mod rayon {
        pub use crate::external_trait_impls::rayon::set::*;
    }
}

pub use crate::array::Array;
pub use crate::bitset::Bitset;
pub use crate::dynabuf::DynaBuf;
pub use crate::error::{Error, Status};
pub use crate::load::{DefaultLoad, LoadFactor, LoadPolicy};
pub use crate::map::HashMap;
pub use crate::raw::IterStatus;
pub use crate::set::HashSet;

/// Default hasher for `HashMap` and `HashSet`.
#[cfg(feature = "ahash")]
pub type DefaultHashBuilder = ahash_::RandomState;

/// Dummy default hasher for `HashMap` and `HashSet`.
#[cfg(not(feature = "ahash"))]
pub enum DefaultHashBuilder {}
