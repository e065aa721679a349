// Chordal decomposition of PSD constraints: sparsity analysis,
// supernodal elimination trees, clique merging and the PSD
// completion of decomposed duals.
#![allow(clippy::needless_range_loop)]

pub(crate) type VertexSet = indexmap::IndexSet<usize>;

mod chordal_info;
mod decomp;
mod merge;
mod sparsity_pattern;
mod supernode_tree;

pub(crate) use chordal_info::*;
pub(crate) use merge::*;
pub(crate) use sparsity_pattern::*;
pub(crate) use supernode_tree::*;
