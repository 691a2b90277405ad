//! Reachability from an entry class: bounded BFS over resolved calls,
//! collecting the table references of every method reached.

pub mod bfs;
pub mod types;

pub use bfs::ReachabilityTraverser;
pub use types::*;
