//! Data structures and algorithms
//!
//! - `config`: author/committer identity resolution
//! - `hasher`: SHA-256 hashing over buffers, files, and framed objects
//! - `ignore`: `.myignore` pattern list
//! - `index`: staging index entry types and binary layout
//! - `objects`: object types (blob, tree, commit, tag)
//! - `path_tree`: flat path list folded into a directory trie
//! - `status`: three-way change classification

pub mod config;
pub mod hasher;
pub mod ignore;
pub mod index;
pub mod objects;
pub mod path_tree;
pub mod status;
