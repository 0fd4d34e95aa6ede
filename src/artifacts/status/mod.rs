//! Working-tree status
//!
//! Classifies every path seen in any of {working tree, index, HEAD tree}
//! along two axes: index vs HEAD ("changes to be committed") and working
//! tree vs index ("changes not staged").

pub mod file_change;
pub mod inspector;
pub mod status_info;
