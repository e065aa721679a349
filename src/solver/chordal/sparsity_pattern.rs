#![allow(non_snake_case)]
use crate::algebra::*;
use crate::solver::chordal::*;
use crate::solver::implementations::default::DefaultSettings;

// ---------------------------
// Clique and sparsity data for a single decomposed PSD constraint
// ---------------------------

#[derive(Debug)]
pub(crate) struct SparsityPattern {
    pub(crate) sntree: SuperNodeTree,
    // maps vertices of the (permuted) tree back to rows of the
    // original constraint data
    pub(crate) ordering: Vec<usize>,
    // original index of the cone being decomposed
    pub(crate) orig_index: usize,
}

impl SparsityPattern {
    pub(crate) fn new<T: FloatT>(
        L: CscMatrix<f64>,
        mut ordering: Vec<usize>,
        orig_index: usize,
        settings: &DefaultSettings<T>,
    ) -> Self {
        let mut sntree = SuperNodeTree::new(&L);

        // a single clique leaves nothing to merge
        if sntree.n_cliques > 1 {
            let mut strategy = merge_strategy(settings);
            strategy.merge_cliques(&mut sntree);
        }

        // consecutive vertex numbering within the supernodes gives the
        // clique blocks equal column structure for the psd completion
        sntree.reorder_snd_consecutively(&mut ordering);
        sntree.calculate_block_dimensions();

        Self {
            sntree,
            ordering,
            orig_index,
        }
    }
}

// strategy selection.  Unknown names were already rejected when the
// settings were validated at setup.
fn merge_strategy<T: FloatT>(settings: &DefaultSettings<T>) -> Box<dyn MergeStrategy> {
    match settings.merge_method.as_str() {
        "clique_graph" => Box::new(CliqueGraphMergeStrategy::new()),
        "parent_child" => Box::new(ParentChildMergeStrategy::new(
            settings.merge_t_fill,
            settings.merge_t_size,
        )),
        "none" => Box::new(NoMergeStrategy::new()),
        other => unreachable!("merge method {:?} escaped settings validation", other),
    }
}
