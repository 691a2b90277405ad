//! Graph walks over the resolved call graph.

pub mod reachability;
