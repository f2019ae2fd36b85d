//! blocklab tree builder: converts a placed-block sequence into a program tree.
//!
//! Also hosts the two producers of block sequences: the hydration adapter
//! for generated workspaces and the [`Workspace`] editor model.

mod builder;
pub mod hydrate;
pub mod workspace;

pub use builder::{build_tree, TreeBuilder};
pub use hydrate::{ensure_entry, hydrate, hydrate_blocks};
pub use workspace::{find_matching_end, indentation_guides, IndentGuides, Workspace};
