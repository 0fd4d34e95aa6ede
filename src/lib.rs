//! A local, single-user version control engine.
//!
//! Snapshots of a working directory are stored as an immutable DAG of
//! content-addressed objects (blobs, trees, commits, tags) under `.vcs/`,
//! bridged to the working tree by a persistent staging index.

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
