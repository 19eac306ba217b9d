//! View layer
//!
//! Everything here assumes it runs on the single thread that owns the tree.

pub mod trace_tree;
