//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;

/// SmallVec for the CRUD buckets of one operation (at most two).
pub type SmallVec2<T> = SmallVec<[T; 2]>;
