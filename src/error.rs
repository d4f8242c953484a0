use core::alloc::Layout;

/// The error type for fallible container operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Error due to the computed capacity exceeding the collection's maximum
    /// (usually `isize::MAX` bytes).
    #[error("capacity overflow")]
    CapacityOverflow,

    /// The memory allocator returned an error.
    #[error("memory allocation of {} bytes failed", .layout.size())]
    AllocError {
        /// The layout of the allocation request that failed.
        layout: Layout,
    },

    /// A slot index past the end of the buffer.
    #[error("index {index} out of bounds for length {len}")]
    OutOfBounds {
        /// The index that was requested.
        index: usize,
        /// The number of slots available.
        len: usize,
    },

    /// A sequential write that does not fit inside its slot.
    #[error("span of {len} bytes at offset {offset} does not fit in a {unit}-byte slot")]
    SpanOutOfSlot {
        /// Where the write would have started.
        offset: usize,
        /// How many bytes would have been written.
        len: usize,
        /// The size of one slot.
        unit: usize,
    },

    /// A whole-slot write whose input is not exactly one slot long.
    #[error("expected {unit} bytes, got {got}")]
    WrongUnitSize {
        /// The size of one slot.
        unit: usize,
        /// The length of the input.
        got: usize,
    },

    /// A resize below the number of stored elements.
    #[error("cannot resize to {requested} slots while holding {entries} entries")]
    InvalidRequest {
        /// The requested number of slots.
        requested: usize,
        /// The number of live entries.
        entries: usize,
    },

    /// The key was not present.
    #[error("key not found")]
    NotFound,
}

impl Error {
    /// The status class this error belongs to.
    pub fn status(&self) -> Status {
        match self {
            Error::CapacityOverflow | Error::AllocError { .. } => Status::NoMem,
            Error::OutOfBounds { .. }
            | Error::SpanOutOfSlot { .. }
            | Error::WrongUnitSize { .. } => Status::Invalid,
            Error::InvalidRequest { .. } => Status::InvalidRequest,
            Error::NotFound => Status::NotFound,
        }
    }

    /// Diverges on allocation failure the way the standard collections do.
    #[cold]
    pub(crate) fn abort(self) -> ! {
        match self {
            Error::AllocError { layout } => alloc::alloc::handle_alloc_error(layout),
            Error::CapacityOverflow => panic!("capacity overflow"),
            e => panic!("{}", e),
        }
    }
}

/// Outcome of the most recent operation on a container.
///
/// Every lookup and mutation records one of these, so callers that do not want to thread a
/// `Result` through every call site can inspect the last outcome after the fact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Status {
    /// The operation completed.
    #[default]
    Success,
    /// The request addressed something outside the structure.
    Invalid,
    /// The key was not present.
    NotFound,
    /// Growing the structure failed; it was left unchanged.
    NoMem,
    /// A resize was asked to go below the number of live entries.
    InvalidRequest,
}

impl Status {
    /// Returns `true` for [`Status::Success`].
    pub fn is_success(self) -> bool {
        self == Status::Success
    }
}

impl<T> From<&Result<T, Error>> for Status {
    fn from(r: &Result<T, Error>) -> Self {
        match r {
            Ok(_) => Status::Success,
            Err(e) => e.status(),
        }
    }
}
