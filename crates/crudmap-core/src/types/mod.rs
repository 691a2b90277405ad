//! Collections and identifier types.

pub mod collections;
pub mod identifiers;

pub use collections::{FxHashMap, FxHashSet, SmallVec};
pub use identifiers::{ClassId, MethodId, NameId};
